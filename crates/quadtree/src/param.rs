/// Construction parameters of a [`Tree`](crate::Tree).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeParameter {
    /// Number of objects a leaf holds directly before it splits. A leaf splits once its object
    /// count goes strictly above this value. Every node of the tree shares the same capacity.
    ///
    /// `0` is accepted and makes any non-empty leaf split as long as its region is still
    /// divisible.
    pub capacity: usize,

    /// Depth at which splitting stops regardless of capacity. The root sits at depth 0.
    ///
    /// Splitting is independently suppressed when a region is too small to halve on either
    /// axis, so the default leaves the depth unbounded in practice.
    pub max_depth: u16,

    /// Initial node arena capacity.
    pub reserve_nodes: usize,

    /// Initial object arena capacity.
    pub reserve_objects: usize,
}

impl Default for TreeParameter {
    fn default() -> Self {
        Self::with_capacity(8)
    }
}

impl TreeParameter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            max_depth: u16::MAX,
            reserve_nodes: 0,
            reserve_objects: 0,
        }
    }

    pub fn with(mut self, visit: impl FnOnce(&mut Self)) -> Self {
        visit(&mut self);
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn load_from_toml() {
        let param: TreeParameter = toml::from_str(
            r#"
                capacity = 4
                reserve_objects = 1024
            "#,
        )
        .unwrap();

        assert_eq!(param.capacity, 4);
        assert_eq!(param.max_depth, u16::MAX);
        assert_eq!(param.reserve_nodes, 0);
        assert_eq!(param.reserve_objects, 1024);
    }
}
