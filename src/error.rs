use std::fmt;

/// Why a candidate word or guess was rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidWordReason {
    WrongLength { expected: usize, found: usize },
    NotLowercaseAscii,
}

impl fmt::Display for InvalidWordReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidWordReason::WrongLength { expected, found } => write!(
                f,
                "expected a {expected}-letter word, but found {found} letters"
            ),
            InvalidWordReason::NotLowercaseAscii => {
                write!(f, "words must contain only lowercase ascii letters a-z")
            }
        }
    }
}

/// Errors surfaced at the boundary of the solver. Internal invariant
/// violations (e.g. a malformed `Query` reaching the trie walk) are
/// programmer errors and panic instead, per the error-handling design.
#[derive(Debug)]
pub enum SolverError {
    InvalidWord {
        word: String,
        reason: InvalidWordReason,
    },
    NotInAllowedList {
        word: String,
    },
    EmptyPossibleSet,
    GameOver,
    Io(std::io::Error),
    MalformedCache(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidWord { word, reason } => {
                write!(f, "invalid word {word:?}: {reason}")
            }
            SolverError::NotInAllowedList { word } => {
                write!(f, "{word:?} is not in the allowed guess list")
            }
            SolverError::EmptyPossibleSet => {
                write!(f, "no possible word remains to sample a target from")
            }
            SolverError::GameOver => write!(f, "the game is already over"),
            SolverError::Io(err) => write!(f, "i/o error: {err}"),
            SolverError::MalformedCache(reason) => write!(f, "malformed cache: {reason}"),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        SolverError::Io(err)
    }
}

/// Absolute tolerance used for all floating point comparisons in the solver.
pub const EPSILON: f64 = 1e-6;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
