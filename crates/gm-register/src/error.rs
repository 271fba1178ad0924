use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    PointCountMismatch { deformed: usize, reference: usize },
    TooFewPoints { got: usize },
    DegenerateGeometry,
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointCountMismatch {
                deformed,
                reference,
            } => write!(
                f,
                "homologous point lists differ in length: {deformed} deformed vs {reference} reference"
            ),
            Self::TooFewPoints { got } => {
                write!(f, "affine estimation needs at least 3 point pairs, got {got}")
            }
            Self::DegenerateGeometry => {
                write!(f, "degenerate point geometry: affine transform is not invertible")
            }
        }
    }
}

impl std::error::Error for RegisterError {}
