use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("Failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("Parser produced no syntax tree")]
    NoTree,
}
