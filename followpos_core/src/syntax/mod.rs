mod alphabet;
mod direct;
mod tree;

pub use alphabet::CharClass;
pub use direct::{
    attribute_table, compute_followpos, firstpos, followpos, lastpos, nullable,
    FollowposTable, NodeAttributes,
};
pub use tree::{
    balanced_union, identifier_tree, java_identifier_tree, Node, NodeKind, TreeBuilder, END_MARKER,
};
