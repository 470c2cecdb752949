use enum_as_inner::EnumAsInner;

use super::NodeIndex;
use crate::primitive::{Point, Region};

/// Whether an object is currently held by a node.
#[derive(EnumAsInner, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectStatus {
    Unindexed,

    /// Held directly in the object list of this exact node, never an ancestor of it.
    Indexed(NodeIndex),
}

/// An object tracked by a [`Tree`](super::Tree): a fixed local shape, the position it was last
/// placed at, and the node that holds it.
///
/// The caller payload is reachable through `Deref`, the spatial part is read-only from outside
/// and only changes through tree operations.
#[derive(Debug)]
pub struct TrackedObject<T> {
    data: T,

    shape: Region,
    pos: Point,

    /// `shape` translated by `pos`, cached when the position is accepted.
    bound: Region,

    // Back-reference to the owning node. Removal and moves start from here instead of searching
    // the tree, so it MUST be updated on every relink.
    status: ObjectStatus,
}

impl<T> TrackedObject<T> {
    pub(super) fn new(shape: Region, data: T) -> Self {
        Self {
            data,
            shape,
            pos: Point::ZERO,
            bound: shape,
            status: ObjectStatus::Unindexed,
        }
    }

    /// Local shape, relative to the anchor position. Never changes after creation.
    pub fn shape(&self) -> Region {
        self.shape
    }

    /// Anchor position the object was last inserted or moved to.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// World-space bound: the local shape translated by the current position.
    pub fn bound(&self) -> Region {
        self.bound
    }

    /// World-space bound the object would have at `pos`, or `None` if it does not fit in the
    /// coordinate range at all.
    pub fn bound_at(&self, pos: Point) -> Option<Region> {
        self.shape.translated(pos)
    }

    pub fn status(&self) -> ObjectStatus {
        self.status
    }

    pub fn owner(&self) -> Option<NodeIndex> {
        self.status.as_indexed().copied()
    }

    pub fn is_indexed(&self) -> bool {
        self.status.is_indexed()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub(super) fn link(&mut self, node: NodeIndex, pos: Point, bound: Region) {
        self.pos = pos;
        self.bound = bound;
        self.status = ObjectStatus::Indexed(node);
    }

    pub(super) fn unlink(&mut self) {
        debug_assert!(self.status.is_indexed());
        self.status = ObjectStatus::Unindexed;
    }

    pub(super) fn set_pos(&mut self, pos: Point, bound: Region) {
        self.pos = pos;
        self.bound = bound;
    }
}

impl<T> std::ops::Deref for TrackedObject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> std::ops::DerefMut for TrackedObject<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
