#![allow(clippy::bool_comparison)]

//! A mutable region quadtree over integer rectangles.
//!
//! Objects have a fixed local shape and a position. The tree keeps each object in the deepest
//! node whose region fully contains it, splits a leaf into four quadrants once it goes over
//! capacity, and answers rectangle-overlap queries while pruning untouched subtrees.
//!
//! Every indexed object keeps a handle to the node holding it, so removal and moves never
//! search the tree. Small moves that stay within the same node only update the position.
//!
//! ```
//! use quadtree::{Point, Region, Tree};
//!
//! let mut tree = Tree::new(Region::from_size(100, 100), 4);
//! let ship = tree.create_sized(2, 2, "ship");
//!
//! tree.insert(ship, Point::new(10, 10)).unwrap();
//! tree.move_to(ship, Point::new(60, 70)).unwrap();
//!
//! let hits = tree.search(&Region::from_coords(50, 50, 100, 100));
//! assert_eq!(hits, [ship]);
//! assert_eq!(*tree[ship], "ship");
//!
//! tree.remove(ship).unwrap();
//! assert_eq!(tree.destroy(ship), Ok("ship"));
//! ```

pub mod error;
pub mod param;
pub mod primitive;
pub mod tree;

pub use error::{Error, TreeStateError};
pub use param::TreeParameter;
pub use primitive::{Coord, Point, Quadrant, Region};
pub use tree::{NodeIndex, ObjectIndex, ObjectStatus, TrackedObject, Tree};

// Reexport necessary items.
pub use slotmap::new_key_type as define_key;
pub use slotmap::Key;
