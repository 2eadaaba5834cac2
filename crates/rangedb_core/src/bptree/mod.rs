//! B+Tree parameters and assembly.
//!
//! Only what the builders need lives here: computing the order for a block
//! size and formatting (or attaching to) the root of a tree.

mod params;
mod tree;

pub use params::{
    BPlusTreeParams, BLOCK_HEADER_SIZE, MIN_ORDER, POINTER_SIZE, RECORD_BLOCK_HEADER_SIZE,
};
pub use tree::BPlusTree;
