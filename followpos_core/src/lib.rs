pub mod automaton;
pub mod error;
pub mod render;
pub mod report;
pub mod syntax;
pub mod util;

pub use error::ConstructionError;
pub use util::{Position, PositionSet};
