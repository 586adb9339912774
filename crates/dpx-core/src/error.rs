use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    EmptyImage,
    EdgeNotFound { a: usize, b: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::EmptyImage => write!(f, "image has zero width or height"),
            Self::EdgeNotFound { a, b } => {
                write!(f, "marked edge ({a}, {b}) is not in the graph")
            }
        }
    }
}

impl std::error::Error for Error {}
