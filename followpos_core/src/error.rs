use std::fmt::{Display, Formatter};
use std::fmt;

/// Every failure the construction pipeline can report.
/// All of them are raised where they are detected and nothing is retried, a construction either
/// returns a complete value or one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructionError {
    /// A caller supplied something the tree model can't represent (empty union, end marker or
    /// non ASCII symbol used as input, malformed character class...).
    InvalidArgument(String),
    /// The tree has no leaf carrying the end marker.
    MissingEndMarker,
    /// An automaton is unusable as it is (no states, inconsistent raw tables).
    InvalidState(String),
}

impl Display for ConstructionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::InvalidArgument(x) => write!(f, "invalid argument: {}", x),
            ConstructionError::MissingEndMarker => f.write_str("no leaf carries the end marker"),
            ConstructionError::InvalidState(x) => write!(f, "invalid state: {}", x),
        }
    }
}

impl std::error::Error for ConstructionError {}
