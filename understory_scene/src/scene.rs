// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, updates, and the transform pass.

use alloc::{vec, vec::Vec};
use kurbo::Affine;

use crate::hit_area::HitArea;
use crate::types::{Extent, NodeFlags, NodeId, SceneNode};

/// Retained-mode scene graph with a single root.
///
/// Changes to local node data (transform, visibility) do **not** take effect in world space
/// immediately. They are applied when [`Scene::commit`] runs the transform pass, which also
/// advances the frame counter and stamps every reachable visible node with it.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Affine, Vec2};
/// use understory_scene::{Scene, SceneNode};
///
/// let mut scene = Scene::new();
/// let child = scene.insert(scene.root(), SceneNode::default());
/// scene.set_local_transform(child, Affine::translate(Vec2::new(10.0, 0.0)));
///
/// // World data only changes on commit.
/// assert_eq!(scene.world_transform(child), Some(Affine::IDENTITY));
/// scene.commit();
/// assert_eq!(scene.world_transform(child), Some(Affine::translate(Vec2::new(10.0, 0.0))));
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    frame: u64,
    interactivity_revision: u64,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("root", &self.root)
            .field("frame", &self.frame)
            .field("interactivity_revision", &self.interactivity_revision)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: SceneNode,
    world_transform: Affine,
    /// Frame of the last transform pass that reached this node.
    world_visible_frame: Option<u64>,
}

impl Node {
    fn new(generation: u32, local: SceneNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world_transform: Affine::IDENTITY,
            world_visible_frame: None,
        }
    }
}

impl Scene {
    /// Create a scene whose root is a visible, non-interactive node.
    pub fn new() -> Self {
        Self::with_root(SceneNode::default())
    }

    /// Create a scene with explicit root data.
    pub fn with_root(root: SceneNode) -> Self {
        Self {
            nodes: vec![Some(Node::new(1, root))],
            generations: vec![1],
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            frame: 0,
            interactivity_revision: 0,
        }
    }

    /// The root node. It is always live.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Frame counter of the most recent [`Scene::commit`]; 0 before the first commit.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Revision counter bumped whenever the set of interactive nodes may have changed.
    pub fn interactivity_revision(&self) -> u64 {
        self.interactivity_revision
    }

    /// Insert a new node as the last (top-most) child of `parent`.
    ///
    /// If `parent` is stale the node is created detached; it stays unreachable from the root and
    /// is never stamped by the transform pass.
    pub fn insert(&mut self, parent: NodeId, local: SceneNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if self.is_alive(parent) {
            self.link_parent(id, parent);
        }
        self.bump_interactivity();
        id
    }

    /// Remove a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.is_alive(id) {
            return;
        }
        self.remove_subtree(id);
        self.bump_interactivity();
    }

    /// Move `id` to the end of `new_parent`'s children.
    ///
    /// Does nothing if either id is stale, if `id` is the root, or if `new_parent` lies inside
    /// the subtree of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) {
        if id == self.root || !self.is_alive(id) || !self.is_alive(new_parent) {
            return;
        }
        let mut cursor = Some(new_parent);
        while let Some(ancestor) = cursor {
            if ancestor == id {
                return;
            }
            cursor = self.parent_of(ancestor);
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.link_parent(id, new_parent);
        self.bump_interactivity();
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.flags != flags
        {
            n.local.flags = flags;
            self.bump_interactivity();
        }
    }

    /// Show or hide a node (and therefore its subtree).
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(flags) = self.flags(id) {
            self.set_flags(id, flags.difference(NodeFlags::VISIBLE) | visible_bit(visible));
        }
    }

    /// Opt a node in or out of interaction dispatch.
    pub fn set_interactive(&mut self, id: NodeId, interactive: bool) {
        if let Some(mut flags) = self.flags(id) {
            flags.set(NodeFlags::INTERACTIVE, interactive);
            self.set_flags(id, flags);
        }
    }

    /// Replace a node's explicit hit area.
    pub fn set_hit_area(&mut self, id: NodeId, hit_area: Option<HitArea>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.hit_area = hit_area;
        }
    }

    /// Replace a node's visual extent.
    pub fn set_extent(&mut self, id: NodeId, extent: Option<Extent>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.extent = extent;
        }
    }

    /// Run the transform pass and return the new frame counter.
    ///
    /// Walks the tree depth-first from the root, skipping hidden subtrees, and for every node
    /// reached recomputes its node-to-world transform and stamps it with the new frame.
    pub fn commit(&mut self) -> u64 {
        self.frame = self.frame.wrapping_add(1).max(1);
        let frame = self.frame;
        let mut stack = vec![(self.root, Affine::IDENTITY)];

        while let Some((id, parent_tf)) = stack.pop() {
            let Some(node) = self.node_opt_mut(id) else {
                continue;
            };
            if !node.local.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            node.world_transform = parent_tf * node.local.local_transform;
            node.world_visible_frame = Some(frame);
            // Pushed in reverse so children are visited in declaration order.
            for &child in node.children.iter().rev() {
                stack.push((child, node.world_transform));
            }
        }

        frame
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&SceneNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Explicit hit area of a live node, if any.
    pub fn hit_area(&self, id: NodeId) -> Option<&HitArea> {
        self.node_opt(id).and_then(|n| n.local.hit_area.as_ref())
    }

    /// Visual extent of a live node, if any.
    pub fn extent(&self, id: NodeId) -> Option<Extent> {
        self.node_opt(id).and_then(|n| n.local.extent)
    }

    /// Node-to-world transform as of the last [`Scene::commit`] that reached the node.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| n.world_transform)
    }

    /// Frame stamp of the last transform pass that reached the node.
    ///
    /// `None` for stale ids and for nodes no pass has reached yet, so a node whose world
    /// transform was never computed matches no frame.
    pub fn world_visible_frame(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id).and_then(|n| n.world_visible_frame)
    }

    /// Parent of a live node, or `None` for the root, detached nodes and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a node in draw order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    // --- internals ---

    fn bump_interactivity(&mut self) {
        self.interactivity_revision = self.interactivity_revision.wrapping_add(1);
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

fn visible_bit(visible: bool) -> NodeFlags {
    if visible {
        NodeFlags::VISIBLE
    } else {
        NodeFlags::empty()
    }
}
