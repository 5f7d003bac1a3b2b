//! Fatal error kinds for an analysis unit.
//!
//! Only failures that abort a whole unit live here. Estimator-local outcomes
//! (inapplicable estimator, non-converged solver) are `None` estimates, not
//! errors, and never cross an estimator boundary as a panic.

use std::fmt;

/// Error that aborts one analysis unit.
#[derive(Debug)]
pub enum Error {
    /// The input file could not be read.
    Input(std::io::Error),
    /// Fewer samples than the required minimum.
    InsufficientSamples { got: usize, need: usize },
    /// Every sample has the same value; no entropy can be awarded.
    DegenerateAlphabet,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "input unreadable: {e}"),
            Self::InsufficientSamples { got, need } => {
                write!(f, "insufficient samples: got {got}, need at least {need}")
            }
            Self::DegenerateAlphabet => {
                write!(f, "symbol alphabet consists of 1 symbol; no entropy awarded")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Input(e)
    }
}
