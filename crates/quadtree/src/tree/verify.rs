use slotmap::SecondaryMap;

use super::{NodeChildren, NodeIndex, ObjectIndex, Tree};
use crate::error::TreeStateError;

impl<T> Tree<T> {
    /// Walks the whole tree and checks its structural invariants:
    ///
    /// - every split node has four children tiling its region in quadrant order,
    /// - every listed object exists, is listed exactly once, points back at the listing node
    ///   and lies within that node's region,
    /// - every object with an owner is actually listed, and every node is reachable,
    /// - the recorded indexed count matches.
    ///
    /// > Intended for tests and debug builds; cost is linear in tree size.
    #[doc(hidden)]
    pub fn __debug_verify_tree_state(&self) -> Result<(), TreeStateError> {
        let mut visited_nodes = SecondaryMap::<NodeIndex, ()>::new();
        let mut listed_by = SecondaryMap::<ObjectIndex, NodeIndex>::new();
        let mut stack = vec![self.root];

        while let Some(node) = stack.pop() {
            let n = self
                .nodes
                .get(node)
                .ok_or(TreeStateError::MissingNode(node))?;
            visited_nodes.insert(node, ());

            if let NodeChildren::Split(children) = n.children {
                let quads = n.region.quadrants();

                for (child, quad) in children.into_iter().zip(quads) {
                    let c = self
                        .nodes
                        .get(child)
                        .ok_or(TreeStateError::MissingNode(child))?;

                    if c.region != quad || c.depth != n.depth + 1 {
                        return Err(TreeStateError::BadChildTiling {
                            node,
                            region: n.region,
                        });
                    }
                }

                stack.extend(children);
            }

            for &object in &n.objects {
                let elem = self
                    .objects
                    .get(object)
                    .ok_or(TreeStateError::MissingObject(object))?;

                if listed_by.insert(object, node).is_some() {
                    return Err(TreeStateError::DuplicateObject(object));
                }

                if elem.owner() != Some(node) {
                    return Err(TreeStateError::OwnerMismatch {
                        object,
                        node,
                        owner: elem.owner(),
                    });
                }

                let bound = elem.bound();
                if !n.region.contains_region(&bound) {
                    return Err(TreeStateError::ObjectOutside {
                        object,
                        node,
                        bound,
                        region: n.region,
                    });
                }
            }
        }

        if let Some(node) = self.nodes.keys().find(|k| !visited_nodes.contains_key(*k)) {
            return Err(TreeStateError::UnreachableNode(node));
        }

        if let Some((object, _)) = self
            .objects
            .iter()
            .find(|(k, e)| e.is_indexed() && !listed_by.contains_key(*k))
        {
            return Err(TreeStateError::DanglingOwner(object));
        }

        if listed_by.len() != self.len {
            return Err(TreeStateError::CountMismatch {
                counted: listed_by.len(),
                recorded: self.len,
            });
        }

        Ok(())
    }
}
