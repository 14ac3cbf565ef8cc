//! Hierarchical clipping solution. A [PolyTree] preserves the nesting relationships between
//! outer boundaries and the holes (and islands within holes) they contain, and is the only
//! result form that can carry open path results.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::path::{Path64, Paths64};

/// One polygon (or open polyline) in a [PolyTree], owning the indices of the nodes nested
/// directly inside it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct PolyNode {
    /// Contour of this node (empty for the hidden root).
    pub polygon: Path64,
    /// Child node indices into the owning tree, outermost first in discovery order.
    pub children: Vec<usize>,
    pub(crate) parent: Option<usize>,
    pub(crate) is_open: bool,
}

impl PolyNode {
    /// True when this node holds an open polyline rather than a closed contour.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// Tree of clipping results. Node index 0 is a hidden root whose children are the top level
/// (outermost) contours.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct PolyTree {
    nodes: Vec<PolyNode>,
}

impl Default for PolyTree {
    fn default() -> Self {
        PolyTree {
            nodes: vec![PolyNode::default()],
        }
    }
}

impl PolyTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of contours held (the hidden root is not counted).
    #[inline]
    pub fn total(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Indices of the outermost (top level) nodes.
    #[inline]
    pub fn top_level(&self) -> &[usize] {
        &self.nodes[0].children
    }

    #[inline]
    pub fn node(&self, idx: usize) -> &PolyNode {
        &self.nodes[idx]
    }

    /// True when the node at `idx` is a hole (nested at odd depth below the root).
    pub fn is_hole(&self, idx: usize) -> bool {
        let mut result = true;
        let mut parent = self.nodes[idx].parent;
        while let Some(p) = parent {
            result = !result;
            parent = self.nodes[p].parent;
        }
        result
    }

    /// Append a node under `parent` (0 for top level) and return its index.
    pub(crate) fn add_child(&mut self, parent: usize, polygon: Path64, is_open: bool) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(PolyNode {
            polygon,
            children: Vec::new(),
            parent: Some(parent),
            is_open,
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Create a node without linking it into the tree; pair with [attach](PolyTree::attach).
    /// Needed because a hole's containing contour may be created after the hole itself.
    pub(crate) fn add_detached(&mut self, polygon: Path64, is_open: bool) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(PolyNode {
            polygon,
            children: Vec::new(),
            parent: None,
            is_open,
        });
        idx
    }

    /// Link a detached node under `parent` (0 for top level).
    pub(crate) fn attach(&mut self, child: usize, parent: usize) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Depth first (pre-order) iteration over all nodes, root excluded.
    pub fn iter(&self) -> PolyTreeIter<'_> {
        let mut stack = Vec::new();
        stack.extend(self.nodes[0].children.iter().rev());
        PolyTreeIter { tree: self, stack }
    }
}

pub struct PolyTreeIter<'a> {
    tree: &'a PolyTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for PolyTreeIter<'a> {
    type Item = (usize, &'a PolyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = &self.tree.nodes[idx];
        self.stack.extend(node.children.iter().rev());
        Some((idx, node))
    }
}

/// Flatten every contour of the tree (closed and open) into a path list.
pub fn polytree_to_paths(tree: &PolyTree) -> Paths64 {
    tree.iter()
        .filter(|(_, node)| !node.polygon.is_empty())
        .map(|(_, node)| node.polygon.clone())
        .collect()
}

/// Extract only the closed contours of the tree.
pub fn closed_paths_from_polytree(tree: &PolyTree) -> Paths64 {
    tree.iter()
        .filter(|(_, node)| !node.is_open && !node.polygon.is_empty())
        .map(|(_, node)| node.polygon.clone())
        .collect()
}

/// Extract only the open polylines of the tree (open paths are always top level).
pub fn open_paths_from_polytree(tree: &PolyTree) -> Paths64 {
    tree.top_level()
        .iter()
        .map(|&idx| tree.node(idx))
        .filter(|node| node.is_open)
        .map(|node| node.polygon.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::point64;

    fn rect(l: i64, t: i64, r: i64, b: i64) -> Path64 {
        vec![point64(l, t), point64(r, t), point64(r, b), point64(l, b)]
    }

    #[test]
    fn nesting_and_holes() {
        let mut tree = PolyTree::new();
        let outer = tree.add_child(0, rect(0, 0, 100, 100), false);
        let hole = tree.add_child(outer, rect(20, 20, 80, 80), false);
        let island = tree.add_child(hole, rect(40, 40, 60, 60), false);

        assert_eq!(tree.total(), 3);
        assert_eq!(tree.top_level(), &[outer]);
        assert!(!tree.is_hole(outer));
        assert!(tree.is_hole(hole));
        assert!(!tree.is_hole(island));

        let all = polytree_to_paths(&tree);
        assert_eq!(all.len(), 3);
        // pre-order: outer before its hole before the island
        assert_eq!(all[0][0], point64(0, 0));
        assert_eq!(all[1][0], point64(20, 20));
    }

    #[test]
    fn open_path_extraction() {
        let mut tree = PolyTree::new();
        tree.add_child(0, rect(0, 0, 10, 10), false);
        tree.add_child(0, vec![point64(0, 5), point64(10, 5)], true);

        assert_eq!(closed_paths_from_polytree(&tree).len(), 1);
        let open = open_paths_from_polytree(&tree);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_derives_cover_public_types() {
        fn assert_impl<T: serde::Serialize + serde::de::DeserializeOwned>() {}
        assert_impl::<crate::Point64>();
        assert_impl::<crate::ClipType>();
        assert_impl::<crate::FillRule>();
        assert_impl::<crate::PathType>();
        assert_impl::<crate::PointInPolygonResult>();
        assert_impl::<PolyNode>();
        assert_impl::<PolyTree>();
    }
}
