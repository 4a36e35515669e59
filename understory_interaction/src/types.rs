// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: the scene collaborator trait, pointer identities, and per-node state.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Affine, Point, Rect};

/// Read-only view of a retained scene graph, as seen by the interaction core.
///
/// The scene owns its nodes and their transforms; the interaction core only references nodes by
/// id and tolerates ids going stale at any time. Every accessor therefore answers "nothing" for a
/// node that is no longer alive.
///
/// Transform freshness is expressed with generations: the scene stamps each node reached by its
/// transform pass with the pass's generation ([`world_visible_generation`]), and reports the latest
/// pass as [`frame_generation`]. Hit tests reject nodes whose stamp differs from the expected
/// generation.
///
/// [`world_visible_generation`]: InteractionScene::world_visible_generation
/// [`frame_generation`]: InteractionScene::frame_generation
pub trait InteractionScene {
    /// Node handle type.
    type NodeId: Copy + Eq + Hash + Debug;

    /// The root ("stage") node.
    fn root(&self) -> Self::NodeId;

    /// Returns `true` if `node` is still alive.
    fn contains(&self, node: Self::NodeId) -> bool;

    /// Children of `node` in draw order (last is top-most). Empty for stale ids.
    fn children(&self, node: Self::NodeId) -> &[Self::NodeId];

    /// Whether `node` itself is flagged visible.
    fn is_visible(&self, node: Self::NodeId) -> bool;

    /// Whether `node` opted into interaction dispatch.
    fn is_interactive(&self, node: Self::NodeId) -> bool;

    /// Node-to-world transform as of the last transform pass that reached `node`.
    fn world_transform(&self, node: Self::NodeId) -> Option<Affine>;

    /// Generation of the last transform pass that reached `node`.
    ///
    /// `None` for stale ids and for nodes no pass has reached yet.
    fn world_visible_generation(&self, node: Self::NodeId) -> Option<u64>;

    /// Generation of the most recent transform pass.
    fn frame_generation(&self) -> u64;

    /// Test a local-space point against the node's explicit hit area.
    ///
    /// Returns `None` when the node has no explicit hit area.
    fn hit_area_contains(&self, node: Self::NodeId, local: Point) -> Option<bool>;

    /// Default local-space hit rectangle derived from the node's visual extent, if it has one.
    fn default_hit_rect(&self, node: Self::NodeId) -> Option<Rect>;

    /// Counter that changes whenever the set of interactive nodes may have changed.
    fn interactivity_revision(&self) -> u64;
}

/// Host-assigned touch identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

/// Identity of the pointer a session tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerId {
    /// The persistent mouse/primary pointer.
    Primary,
    /// A touch contact.
    Touch(TouchId),
}

/// Whether a hit on a node ends a press or release pass.
///
/// Exclusive nodes consume the event: iteration stops (press) or the inside latch closes
/// (release) after them. Permeable nodes let nodes later in iteration order receive the event too.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Exclusive unless the node has interactive descendants.
    #[default]
    Auto,
    /// Always consume.
    Exclusive,
    /// Never consume.
    Permeable,
}

impl DispatchPolicy {
    /// Resolve the policy for a node given whether it has interactive descendants.
    pub const fn is_exclusive(self, has_interactive_descendant: bool) -> bool {
        match self {
            Self::Auto => !has_interactive_descendant,
            Self::Exclusive => true,
            Self::Permeable => false,
        }
    }
}

/// Per-node interaction state owned by the interaction core.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// The primary pointer is currently over the node.
    pub is_over: bool,
    /// A press (mouse or touch) landed on the node and has not been released yet.
    pub is_pressed: bool,
    /// Outcome of the most recent hit test against the node.
    pub last_hit: bool,
    /// Touch that pressed the node, until that touch ends.
    pub active_touch: Option<TouchId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_policy_follows_tree_shape() {
        assert!(DispatchPolicy::Auto.is_exclusive(false));
        assert!(!DispatchPolicy::Auto.is_exclusive(true));
        assert!(DispatchPolicy::Exclusive.is_exclusive(true));
        assert!(!DispatchPolicy::Permeable.is_exclusive(false));
    }
}
