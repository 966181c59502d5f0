pub mod file;
pub mod id;
pub mod lines;

pub use file::SourceFile;
pub use id::{SourceId, VIRTUAL_PREFIX};
pub use lines::LineStore;
