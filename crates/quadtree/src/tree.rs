mod object;
mod verify;

use enum_as_inner::EnumAsInner;
use slotmap::SlotMap;
use tap::Tap;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::param::TreeParameter;
use crate::primitive::{Point, Quadrant, Region};

pub use object::{ObjectStatus, TrackedObject};

/* ---------------------------------------------------------------------------------------------- */
/*                                            QUADTREE                                            */
/* ---------------------------------------------------------------------------------------------- */

/// A mutable region quadtree.
///
/// Nodes and objects both live in arenas owned by the tree and refer to each other through
/// handles: a node lists the objects it holds directly, and every indexed object points back at
/// that node. This makes [`Tree::remove`] and [`Tree::move_to`] independent of tree depth.
///
/// Objects are created unindexed with [`Tree::create`], and their payload survives any number
/// of insert/remove cycles until [`Tree::destroy`] is called.
///
/// Mutation requires `&mut self`, so the tree may be shared for concurrent searches but every
/// modification is exclusive.
pub struct Tree<T> {
    nodes: SlotMap<NodeIndex, TreeNode>,
    objects: SlotMap<ObjectIndex, TrackedObject<T>>,
    root: NodeIndex,
    param: TreeParameter,

    /// Number of indexed objects
    len: usize,
}

struct TreeNode {
    region: Region,
    depth: u16,

    /// Objects held directly by this node, in insertion order.
    objects: Vec<ObjectIndex>,
    children: NodeChildren,
}

/// A node is either a leaf or split into exactly four quadrants; there is no partial split.
#[derive(EnumAsInner, Debug, Clone, Copy, PartialEq, Eq)]
enum NodeChildren {
    Leaf,
    Split([NodeIndex; 4]),
}

impl TreeNode {
    fn new(region: Region, depth: u16) -> Self {
        Self {
            region,
            depth,
            objects: Vec::new(),
            children: NodeChildren::Leaf,
        }
    }
}

/* --------------------------------------- Public Tree API -------------------------------------- */

impl<T> Tree<T> {
    /// Creates a tree covering `region` whose nodes split once they hold more than `capacity`
    /// objects.
    pub fn new(region: Region, capacity: usize) -> Self {
        Self::with_parameter(region, TreeParameter::with_capacity(capacity))
    }

    pub fn with_parameter(region: Region, param: TreeParameter) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(param.reserve_nodes);
        let root = nodes.insert(TreeNode::new(region, 0));

        Self {
            nodes,
            objects: SlotMap::with_capacity_and_key(param.reserve_objects),
            root,
            param,
            len: 0,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The region covered by the whole tree.
    pub fn region(&self) -> Region {
        self.nodes[self.root].region
    }

    pub fn parameter(&self) -> &TreeParameter {
        &self.param
    }

    /// Number of indexed objects.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live objects, indexed or not.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /* ---------------------------------------- Objects ----------------------------------------- */

    /// Creates an unindexed object with the given local shape, positioned at origin.
    pub fn create(&mut self, shape: Region, data: T) -> ObjectIndex {
        self.objects.insert(TrackedObject::new(shape, data))
    }

    /// Creates an unindexed object whose local shape is `(0,0)-(width,height)`.
    pub fn create_sized(&mut self, width: i32, height: i32, data: T) -> ObjectIndex {
        self.create(Region::from_size(width, height), data)
    }

    /// Frees an object and returns its payload. Indexed objects must be removed first.
    pub fn destroy(&mut self, id: ObjectIndex) -> Result<T, Error> {
        let elem = self.objects.get(id).ok_or(Error::InvalidObject)?;

        if let Some(owner) = elem.owner() {
            return Err(Error::StillIndexed(owner));
        }

        self.objects
            .remove(id)
            .map(TrackedObject::into_data)
            .ok_or(Error::InvalidObject)
    }

    pub fn contains(&self, id: ObjectIndex) -> bool {
        self.objects.contains_key(id)
    }

    pub fn get(&self, id: ObjectIndex) -> Option<&TrackedObject<T>> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectIndex) -> Option<&mut TrackedObject<T>> {
        self.objects.get_mut(id)
    }

    /// Iterates every live object, indexed or not.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectIndex, &TrackedObject<T>)> {
        self.objects.iter()
    }

    /* ---------------------------------------- Indexing ---------------------------------------- */

    /// Places an unindexed object at `pos`.
    ///
    /// Fails with [`Error::OutOfBounds`] without touching anything if the object's bound at
    /// `pos` does not fit in the tree's region, or leaves the coordinate range altogether.
    pub fn insert(&mut self, id: ObjectIndex, pos: Point) -> Result<(), Error> {
        let elem = self.objects.get(id).ok_or(Error::InvalidObject)?;

        if let Some(owner) = elem.owner() {
            return Err(Error::AlreadyIndexed(owner));
        }

        let shape = elem.shape();
        let accepted = elem
            .bound_at(pos)
            .is_some_and(|bound| self.insert_at(self.root, id, pos, bound));

        if accepted == false {
            let region = self.region();

            debug!(?id, ?shape, ?pos, ?region, "insert rejected");
            return Err(Error::OutOfBounds { shape, pos, region });
        }

        self.len += 1;
        Ok(())
    }

    /// Unindexes an object through its owner back-reference. The object itself stays alive.
    ///
    /// Never merges nodes; a split is permanent.
    pub fn remove(&mut self, id: ObjectIndex) -> Result<(), Error> {
        let owner = self
            .objects
            .get(id)
            .ok_or(Error::InvalidObject)?
            .owner()
            .ok_or(Error::NotIndexed)?;

        self.unlink(owner, id)
    }

    /// Relocates an indexed object to `pos`.
    ///
    /// If the new bound still fits in the owning node, only the position changes. Otherwise
    /// the object is unlinked and re-inserted from the root, which may split nodes.
    ///
    /// # Errors
    ///
    /// When the new bound does not fit in the tree at all, [`Error::MovedOutOfBounds`] is
    /// returned and the object is left **unindexed** at its previous position. Re-insert it
    /// explicitly to keep tracking it.
    pub fn move_to(&mut self, id: ObjectIndex, pos: Point) -> Result<(), Error> {
        let elem = self.objects.get(id).ok_or(Error::InvalidObject)?;
        let owner = elem.owner().ok_or(Error::NotIndexed)?;
        let shape = elem.shape();
        let bound = elem.bound_at(pos);

        if let Some(bound) = bound.filter(|b| self.nodes[owner].region.contains_region(b)) {
            self.objects[id].set_pos(pos, bound);
            return Ok(());
        }

        debug!(?id, ?owner, ?bound, "object left its node; reinserting from root");
        self.unlink(owner, id)?;

        if bound.is_some_and(|bound| self.insert_at(self.root, id, pos, bound)) == false {
            warn!(?id, ?shape, ?pos, "moved out of tree region; object dropped from index");
            return Err(Error::MovedOutOfBounds { shape, pos });
        }

        self.len += 1;
        Ok(())
    }

    /// Unindexes every object and tears down the node structure, leaving a single root leaf
    /// over the same region. Objects and their payloads are kept.
    pub fn clear(&mut self) {
        let region = self.region();

        self.nodes.clear();
        self.root = self.nodes.insert(TreeNode::new(region, 0));

        for (_, elem) in self.objects.iter_mut().filter(|(_, e)| e.is_indexed()) {
            elem.unlink();
        }

        self.len = 0;
    }

    /* ----------------------------------------- Nodes ------------------------------------------ */

    pub fn node_region(&self, node: NodeIndex) -> Option<Region> {
        self.nodes.get(node).map(|n| n.region)
    }

    pub fn node_depth(&self, node: NodeIndex) -> Option<u16> {
        self.nodes.get(node).map(|n| n.depth)
    }

    /// Returns `None` if `node` does not exist.
    pub fn is_leaf(&self, node: NodeIndex) -> Option<bool> {
        self.nodes.get(node).map(|n| n.children.is_leaf())
    }

    /// Children of a split node, in [`Quadrant::ALL`] order.
    pub fn children(&self, node: NodeIndex) -> Option<[NodeIndex; 4]> {
        self.nodes.get(node)?.children.as_split().copied()
    }

    pub fn child(&self, node: NodeIndex, quadrant: Quadrant) -> Option<NodeIndex> {
        self.children(node).map(|c| c[quadrant as usize])
    }

    /// Number of objects held directly by `node`, excluding its descendants.
    pub fn node_len(&self, node: NodeIndex) -> usize {
        self.nodes.get(node).map_or(0, |n| n.objects.len())
    }

    /// Objects held directly by `node`.
    pub fn node_objects(&self, node: NodeIndex) -> impl Iterator<Item = ObjectIndex> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.objects.iter().copied())
    }

    /// Pre-order walk over every node with its depth.
    pub fn visit_nodes(&self, mut visit: impl FnMut(&Self, NodeIndex, u16)) {
        let mut stack = vec![self.root];

        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            visit(self, node, n.depth);

            if let NodeChildren::Split(children) = n.children {
                // Reversed, so top-left pops first.
                stack.extend(children.into_iter().rev());
            }
        }
    }
}

/* -------------------------------------------- Query ------------------------------------------- */

impl<T> Tree<T> {
    /// Collects every indexed object whose bound overlaps `region`. Each object appears once;
    /// the order is unspecified.
    pub fn search(&self, region: &Region) -> Vec<ObjectIndex> {
        Vec::new().tap_mut(|hits| self.query_region(region, |id, _| hits.push(id)))
    }

    /// Invokes `on_query_hit` for every indexed object whose bound overlaps `region`.
    pub fn query_region(
        &self,
        region: &Region,
        mut on_query_hit: impl FnMut(ObjectIndex, &TrackedObject<T>),
    ) {
        self.query_nodes(region, |tree, node| {
            for &id in &tree.nodes[node].objects {
                let elem = &tree.objects[id];

                if elem.bound().intersects(region) {
                    on_query_hit(id, elem);
                }
            }
        });
    }

    /// Invokes `on_node_hit` for every node whose region overlaps `region`, children before
    /// their parent.
    ///
    /// Subtrees whose region does not overlap the query are skipped entirely, together with
    /// the objects they hold.
    pub fn query_nodes(&self, region: &Region, mut on_node_hit: impl FnMut(&Self, NodeIndex)) {
        recurse(self, self.root, region, &mut on_node_hit);

        fn recurse<T>(
            tree: &Tree<T>,
            node: NodeIndex,
            region: &Region,
            on_node_hit: &mut impl FnMut(&Tree<T>, NodeIndex),
        ) {
            let n = &tree.nodes[node];

            if !n.region.intersects(region) {
                return;
            }

            if let NodeChildren::Split(children) = n.children {
                for child in children {
                    recurse(tree, child, region, on_node_hit);
                }
            }

            on_node_hit(tree, node);
        }
    }
}

/* ---------------------------------------- Internal APIs --------------------------------------- */

impl<T> Tree<T> {
    /// Places `id` at `pos`, where its world bound is `bound`, somewhere in the subtree of
    /// `node`. Split nodes try their children first and keep the object themselves only if no
    /// single child can hold it. Leaves append it and split if they go over capacity.
    ///
    /// Returns `false`, with nothing mutated, if `bound` does not fit `node`.
    fn insert_at(&mut self, node: NodeIndex, id: ObjectIndex, pos: Point, bound: Region) -> bool {
        let n = &self.nodes[node];

        if !n.region.contains_region(&bound) {
            return false;
        }

        if let NodeChildren::Split(children) = n.children {
            if children
                .into_iter()
                .any(|child| self.insert_at(child, id, pos, bound))
            {
                return true;
            }
        }

        let n = &mut self.nodes[node];
        n.objects.push(id);
        self.objects[id].link(node, pos, bound);

        let n = &self.nodes[node];
        if n.objects.len() > self.param.capacity
            && n.children.is_leaf()
            && n.region.is_divisible()
            && n.depth < self.param.max_depth
        {
            self.split(node);
        }

        true
    }

    /// Turns leaf `node` into four quadrant children and pushes down every object that fits
    /// in one of them, re-inserting at the object's own recorded position.
    fn split(&mut self, node: NodeIndex) {
        let n = &self.nodes[node];
        let (region, depth) = (n.region, n.depth);
        debug_assert!(n.children.is_leaf());

        let children = region
            .quadrants()
            .map(|quad| self.nodes.insert(TreeNode::new(quad, depth + 1)));

        let n = &mut self.nodes[node];
        n.children = NodeChildren::Split(children);
        let pending = std::mem::take(&mut n.objects);
        let total = pending.len();

        let kept: Vec<_> = pending
            .into_iter()
            .filter(|&id| {
                let elem = &self.objects[id];
                let (pos, bound) = (elem.pos(), elem.bound());

                !children
                    .into_iter()
                    .any(|child| self.insert_at(child, id, pos, bound))
            })
            .collect();

        trace!(
            ?node,
            ?region,
            depth,
            pushed = total - kept.len(),
            kept = kept.len(),
            "node split"
        );

        self.nodes[node].objects = kept;
    }

    /// Removes `id` from the object list of `node` only. Not recursive.
    fn unlink(&mut self, node: NodeIndex, id: ObjectIndex) -> Result<(), Error> {
        let list = &mut self
            .nodes
            .get_mut(node)
            .ok_or(Error::StaleOwner(node))?
            .objects;

        let at = list
            .iter()
            .position(|&x| x == id)
            .ok_or(Error::StaleOwner(node))?;

        list.remove(at);
        self.objects[id].unlink();
        self.len -= 1;

        Ok(())
    }
}

/* ------------------------------------------ Indexing ------------------------------------------ */

impl<T> std::ops::Index<ObjectIndex> for Tree<T> {
    type Output = TrackedObject<T>;

    fn index(&self, id: ObjectIndex) -> &Self::Output {
        &self.objects[id]
    }
}

impl<T> std::ops::IndexMut<ObjectIndex> for Tree<T> {
    fn index_mut(&mut self, id: ObjectIndex) -> &mut Self::Output {
        &mut self.objects[id]
    }
}

static_assertions::assert_impl_all!(Tree<u32>: Send, Sync);

/* ------------------------------------------ Id Types ------------------------------------------ */

slotmap::new_key_type! {
    /// Index of tree node
    pub struct NodeIndex;

    /// Index of tracked object
    pub struct ObjectIndex;
}

/* ---------------------------------------------------------------------------------------------- */
/*                                              TESTS                                             */
/* ---------------------------------------------------------------------------------------------- */
