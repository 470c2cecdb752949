use crate::primitive::{Point, Region};
use crate::tree::{NodeIndex, ObjectIndex};

/// Failure of a tree operation. None of these leave the tree in an inconsistent state; the
/// only variant that changes anything is [`Error::MovedOutOfBounds`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("object shape {shape:?} at {pos:?} does not fit in region {region:?}")]
    OutOfBounds {
        shape: Region,
        pos: Point,
        region: Region,
    },

    #[error("object is not indexed")]
    NotIndexed,

    #[error("object is already indexed by node {0:?}")]
    AlreadyIndexed(NodeIndex),

    #[error("object handle does not refer to a live object")]
    InvalidObject,

    #[error("owner node {0:?} does not list the object")]
    StaleOwner(NodeIndex),

    /// The object was removed from its node but could not be re-inserted at its new position.
    /// It is left unindexed; its previous position is not restored.
    #[error("object shape {shape:?} at {pos:?} left the root region and is now unindexed")]
    MovedOutOfBounds { shape: Region, pos: Point },

    #[error("object is still indexed by node {0:?}")]
    StillIndexed(NodeIndex),
}

/// A broken structural invariant, reported by `Tree::__debug_verify_tree_state`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeStateError {
    #[error("node {0:?} is referenced but does not exist")]
    MissingNode(NodeIndex),

    #[error("object {0:?} is listed by a node but does not exist")]
    MissingObject(ObjectIndex),

    #[error("children of node {node:?} do not tile its region {region:?}")]
    BadChildTiling { node: NodeIndex, region: Region },

    #[error("object {object:?} with bound {bound:?} is outside its node {node:?} {region:?}")]
    ObjectOutside {
        object: ObjectIndex,
        node: NodeIndex,
        bound: Region,
        region: Region,
    },

    #[error("object {object:?} listed by node {node:?} reports owner {owner:?}")]
    OwnerMismatch {
        object: ObjectIndex,
        node: NodeIndex,
        owner: Option<NodeIndex>,
    },

    #[error("object {0:?} is listed more than once")]
    DuplicateObject(ObjectIndex),

    #[error("object {0:?} has an owner but no node lists it")]
    DanglingOwner(ObjectIndex),

    #[error("node {0:?} is not reachable from root")]
    UnreachableNode(NodeIndex),

    #[error("indexed count is {counted}, but the tree records {recorded}")]
    CountMismatch { counted: usize, recorded: usize },
}
