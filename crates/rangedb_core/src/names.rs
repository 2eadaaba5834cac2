//! Extensions that tell the stores at one location apart.

/// Tree node blocks.
pub const EXT_TREE_NODES: &str = "idn";

/// Tree record blocks.
pub const EXT_TREE_RECORDS: &str = "dat";

/// Append-only value log.
pub const EXT_OBJECTS: &str = "obj";
