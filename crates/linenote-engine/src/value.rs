use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Anything that can be recorded: debuggable, owned and shareable.
pub trait Recordable: fmt::Debug + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: fmt::Debug + Any + Send + Sync> Recordable for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A recorded value, type-erased until it is rendered.
pub struct Value(Box<dyn Recordable>);

impl Value {
    pub fn new<T: Recordable>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// What a recording with no arguments stores.
    pub fn nothing() -> Self {
        Self::new(())
    }

    /// Borrow the value as `T`, if that is what was recorded.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        // Deref first: the box itself is `Recordable` too.
        self.0.as_ref().as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_ref(), f)
    }
}

type RenderFn = dyn Fn(&Value) -> String + Send + Sync;

/// How values are turned into text when emitted.
#[derive(Clone, Default)]
pub enum Inspect {
    /// `{:#?}`
    #[default]
    Pretty,
    /// `{:?}`
    Debug,
    /// A caller-supplied renderer.
    Custom(Arc<RenderFn>),
}

impl Inspect {
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(render))
    }

    pub fn render(&self, value: &Value) -> String {
        match self {
            Self::Pretty => format!("{value:#?}"),
            Self::Debug => format!("{value:?}"),
            Self::Custom(render) => render(value),
        }
    }
}

impl fmt::Debug for Inspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("Pretty"),
            Self::Debug => f.write_str("Debug"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown inspect mode '{0}'; expected: pretty, debug")]
pub struct UnknownInspect(pub String);

impl FromStr for Inspect {
    type Err = UnknownInspect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "debug" => Ok(Self::Debug),
            _ => Err(UnknownInspect(s.to_string())),
        }
    }
}
