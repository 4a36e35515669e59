// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening the scene into the ordered list of interactive nodes.
//!
//! ## Ordering
//!
//! The root comes first (when it is interactive), followed by a depth-first walk that visits each
//! node's children last-to-first. Since later children draw on top, the resulting list puts
//! top-most nodes before the ones they cover within every sibling group. Every dispatch loop
//! iterates this list in order, so first-match rules in dispatch follow it.
//!
//! ## Rules
//!
//! - Hidden nodes are skipped together with their subtrees.
//! - An interactive node is appended, marks its nearest interactive ancestor as having an
//!   interactive descendant, and becomes the anchor for its own subtree.
//! - A non-interactive node is transparent: its subtree is walked with the current anchor.
//! - If the root is not interactive nothing is collected at all.
//!
//! The list, the descendant markers and the parent table are rebuilt from scratch each time, so
//! markers on ancestors whose interactive children went away never linger.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::types::InteractionScene;

/// Ordered set of interactive nodes plus derived ancestry data.
#[derive(Clone, Debug)]
pub struct InteractiveSet<K> {
    items: Vec<K>,
    /// Interactive nodes with at least one interactive descendant.
    with_descendants: HashSet<K>,
    /// Interactive node -> nearest interactive ancestor.
    parents: HashMap<K, K>,
}

impl<K> Default for InteractiveSet<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            with_descendants: HashSet::new(),
            parents: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> InteractiveSet<K> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the scene's current structure.
    pub fn rebuild<S>(&mut self, scene: &S)
    where
        S: InteractionScene<NodeId = K> + ?Sized,
    {
        self.items.clear();
        self.with_descendants.clear();
        self.parents.clear();

        let root = scene.root();
        if !scene.is_interactive(root) {
            return;
        }
        self.items.push(root);
        self.collect(scene, root, root);
    }

    fn collect<S>(&mut self, scene: &S, node: K, anchor: K)
    where
        S: InteractionScene<NodeId = K> + ?Sized,
    {
        for &child in scene.children(node).iter().rev() {
            if !scene.is_visible(child) {
                continue;
            }
            let has_children = !scene.children(child).is_empty();
            if scene.is_interactive(child) {
                self.with_descendants.insert(anchor);
                self.parents.insert(child, anchor);
                self.items.push(child);
                if has_children {
                    self.collect(scene, child, child);
                }
            } else if has_children {
                self.collect(scene, child, anchor);
            }
        }
    }

    /// Interactive nodes in dispatch order.
    pub fn items(&self) -> &[K] {
        &self.items
    }

    /// Number of collected nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if `node` is collected.
    pub fn contains(&self, node: K) -> bool {
        self.items.contains(&node)
    }

    /// Whether `node` has at least one interactive descendant in the current set.
    pub fn has_interactive_descendant(&self, node: K) -> bool {
        self.with_descendants.contains(&node)
    }

    /// Nearest interactive ancestor of a collected node (`None` for the root and unknown nodes).
    pub fn interactive_parent(&self, node: K) -> Option<K> {
        self.parents.get(&node).copied()
    }

    /// Chain of interactive ancestors from the root down to `node` (inclusive).
    ///
    /// Returns an empty path for nodes that are not collected.
    pub fn interactive_path(&self, node: K) -> Vec<K> {
        if !self.contains(node) {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            path.push(n);
            current = self.interactive_parent(n);
        }
        path.reverse();
        path
    }
}

#[cfg(all(test, feature = "scene_adapter"))]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_scene::{NodeFlags, Scene, SceneNode};

    fn interactive_scene() -> Scene {
        Scene::with_root(SceneNode::interactive())
    }

    #[test]
    fn non_interactive_root_collects_nothing() {
        let mut scene = Scene::new();
        scene.insert(scene.root(), SceneNode::interactive());
        let mut set = InteractiveSet::new();
        set.rebuild(&scene);
        assert!(set.is_empty());
    }

    #[test]
    fn children_visited_last_first() {
        let mut scene = interactive_scene();
        let root = scene.root();
        let a = scene.insert(root, SceneNode::interactive());
        let b = scene.insert(root, SceneNode::interactive());
        let a1 = scene.insert(a, SceneNode::interactive());
        let b1 = scene.insert(b, SceneNode::interactive());

        let mut set = InteractiveSet::new();
        set.rebuild(&scene);
        assert_eq!(set.items(), &[root, b, b1, a, a1]);
        assert!(set.has_interactive_descendant(root));
        assert!(set.has_interactive_descendant(a));
        assert!(!set.has_interactive_descendant(a1));
    }

    #[test]
    fn hidden_subtrees_are_skipped() {
        let mut scene = interactive_scene();
        let root = scene.root();
        let hidden = scene.insert(
            root,
            SceneNode {
                flags: NodeFlags::INTERACTIVE,
                ..SceneNode::default()
            },
        );
        scene.insert(hidden, SceneNode::interactive());

        let mut set = InteractiveSet::new();
        set.rebuild(&scene);
        assert_eq!(set.items(), &[root]);
        assert!(!set.has_interactive_descendant(root));
    }

    #[test]
    fn non_interactive_nodes_pass_the_anchor_through() {
        let mut scene = interactive_scene();
        let root = scene.root();
        let panel = scene.insert(root, SceneNode::interactive());
        let plain = scene.insert(panel, SceneNode::default());
        let button = scene.insert(plain, SceneNode::interactive());

        let mut set = InteractiveSet::new();
        set.rebuild(&scene);
        assert_eq!(set.items(), &[root, panel, button]);
        assert!(!set.contains(plain));
        assert_eq!(set.interactive_parent(button), Some(panel));
        assert_eq!(set.interactive_parent(panel), Some(root));
        assert_eq!(set.interactive_parent(root), None);
        assert_eq!(set.interactive_path(button), vec![root, panel, button]);
        assert!(set.interactive_path(plain).is_empty());
    }

    #[test]
    fn rebuild_clears_stale_descendant_markers() {
        let mut scene = interactive_scene();
        let root = scene.root();
        let panel = scene.insert(root, SceneNode::interactive());
        let button = scene.insert(panel, SceneNode::interactive());

        let mut set = InteractiveSet::new();
        set.rebuild(&scene);
        assert!(set.has_interactive_descendant(panel));

        scene.remove(button);
        set.rebuild(&scene);
        assert!(!set.has_interactive_descendant(panel));
        assert_eq!(set.interactive_parent(button), None);
        assert_eq!(set.items(), &[root, panel]);
    }
}
