use core::fmt;

use gm_register::RegisterError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrainError {
    /// Boundary mask and scalar field disagree on the cropped shape.
    ShapeMismatch {
        mask: (usize, usize),
        field: (usize, usize),
    },
    /// A geometric query hit a grain with no pixels. Cannot occur for
    /// registry grains produced by segmentation.
    EmptyGrain,
    /// A registry query was issued before segmentation produced any grains.
    EmptyRegistry,
    GrainIndexOutOfRange { index: usize, len: usize },
    Register(RegisterError),
}

impl fmt::Display for GrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { mask, field } => write!(
                f,
                "boundary mask shape {}x{} does not match scalar field shape {}x{}",
                mask.0, mask.1, field.0, field.1
            ),
            Self::EmptyGrain => write!(f, "grain has an empty coordinate list"),
            Self::EmptyRegistry => write!(f, "grain registry is empty"),
            Self::GrainIndexOutOfRange { index, len } => {
                write!(f, "grain index {index} out of range for registry of {len}")
            }
            Self::Register(e) => write!(f, "registration error: {e}"),
        }
    }
}

impl std::error::Error for GrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Register(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegisterError> for GrainError {
    fn from(e: RegisterError) -> Self {
        Self::Register(e)
    }
}
