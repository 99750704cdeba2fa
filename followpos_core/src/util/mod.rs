mod char_iter;
mod position_set;

pub use char_iter::{char_range_inclusive, CharRange};
pub use position_set::{Position, PositionSet};
