// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node handler slots.
//!
//! A node "may implement" any of the event kinds in [`HandlerKind`]. Which ones it implements is
//! summarised by [`NodeHandlers::capabilities`], and the dispatcher only hit-tests nodes whose
//! capabilities are relevant to the event at hand.
//!
//! Handlers receive the scene mutably, so they may move, hide or remove nodes, including the node
//! they were registered on. The dispatcher skips nodes that are gone by the time it reaches them.

use alloc::boxed::Box;

use crate::data::InteractionData;
use crate::types::{DispatchPolicy, InteractionScene};

/// Boxed handler callback.
pub type Handler<S, E> =
    Box<dyn FnMut(&mut S, &InteractionData<<S as InteractionScene>::NodeId, E>)>;

bitflags::bitflags! {
    /// Set of handler kinds a node implements.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HandlerMask: u16 {
        /// [`HandlerKind::PointerMove`].
        const POINTER_MOVE      = 1 << 0;
        /// [`HandlerKind::PointerOver`].
        const POINTER_OVER      = 1 << 1;
        /// [`HandlerKind::PointerOut`].
        const POINTER_OUT       = 1 << 2;
        /// [`HandlerKind::PointerDown`].
        const POINTER_DOWN      = 1 << 3;
        /// [`HandlerKind::PointerUp`].
        const POINTER_UP        = 1 << 4;
        /// [`HandlerKind::PointerUpOutside`].
        const POINTER_UP_OUTSIDE = 1 << 5;
        /// [`HandlerKind::Click`].
        const CLICK             = 1 << 6;
        /// [`HandlerKind::TouchStart`].
        const TOUCH_START       = 1 << 7;
        /// [`HandlerKind::TouchMove`].
        const TOUCH_MOVE        = 1 << 8;
        /// [`HandlerKind::TouchEnd`].
        const TOUCH_END         = 1 << 9;
        /// [`HandlerKind::TouchEndOutside`].
        const TOUCH_END_OUTSIDE = 1 << 10;
        /// [`HandlerKind::Tap`].
        const TAP               = 1 << 11;

        /// Kinds that make a node take part in hover tracking.
        const HOVER = Self::POINTER_OVER.bits() | Self::POINTER_OUT.bits();
        /// Kinds that make a node take part in a mouse press pass.
        const PRESS = Self::POINTER_DOWN.bits() | Self::CLICK.bits();
        /// Kinds that make a node take part in a mouse release pass.
        const RELEASE = Self::POINTER_UP.bits() | Self::POINTER_UP_OUTSIDE.bits() | Self::CLICK.bits();
        /// Kinds that make a node take part in a touch start pass.
        const TOUCH_PRESS = Self::TOUCH_START.bits() | Self::TAP.bits();
        /// Kinds that make a node take part in a touch end pass.
        const TOUCH_RELEASE = Self::TOUCH_END.bits() | Self::TOUCH_END_OUTSIDE.bits() | Self::TAP.bits();
    }
}

/// Event kinds a node can handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// The primary pointer moved anywhere over the surface.
    PointerMove,
    /// The primary pointer started hovering the node.
    PointerOver,
    /// The primary pointer stopped hovering the node.
    PointerOut,
    /// A mouse press landed on the node.
    PointerDown,
    /// A mouse release landed on the node.
    PointerUp,
    /// A mouse press that landed on the node was released elsewhere.
    PointerUpOutside,
    /// A mouse press and release both landed on the node.
    Click,
    /// A touch started on the node.
    TouchStart,
    /// A touch moved anywhere over the surface.
    TouchMove,
    /// A touch that started on the node ended on it.
    TouchEnd,
    /// A touch that started on the node ended elsewhere.
    TouchEndOutside,
    /// A touch started and ended on the node.
    Tap,
}

impl HandlerKind {
    const COUNT: usize = 12;

    /// The single-bit mask for this kind.
    pub const fn mask(self) -> HandlerMask {
        match self {
            Self::PointerMove => HandlerMask::POINTER_MOVE,
            Self::PointerOver => HandlerMask::POINTER_OVER,
            Self::PointerOut => HandlerMask::POINTER_OUT,
            Self::PointerDown => HandlerMask::POINTER_DOWN,
            Self::PointerUp => HandlerMask::POINTER_UP,
            Self::PointerUpOutside => HandlerMask::POINTER_UP_OUTSIDE,
            Self::Click => HandlerMask::CLICK,
            Self::TouchStart => HandlerMask::TOUCH_START,
            Self::TouchMove => HandlerMask::TOUCH_MOVE,
            Self::TouchEnd => HandlerMask::TOUCH_END,
            Self::TouchEndOutside => HandlerMask::TOUCH_END_OUTSIDE,
            Self::Tap => HandlerMask::TAP,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Handlers and dispatch settings registered for one node.
pub struct NodeHandlers<S: InteractionScene, E> {
    slots: [Option<Handler<S, E>>; HandlerKind::COUNT],
    mask: HandlerMask,
    pointer_affordant: bool,
    policy: Option<DispatchPolicy>,
}

impl<S: InteractionScene, E> core::fmt::Debug for NodeHandlers<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeHandlers")
            .field("capabilities", &self.mask)
            .field("pointer_affordant", &self.pointer_affordant)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: InteractionScene, E> Default for NodeHandlers<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InteractionScene, E> NodeHandlers<S, E> {
    /// No handlers, not pointer-affordant, manager-default policy.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            mask: HandlerMask::empty(),
            pointer_affordant: false,
            policy: None,
        }
    }

    /// Kinds with a registered handler.
    pub fn capabilities(&self) -> HandlerMask {
        self.mask
    }

    /// Whether a handler for `kind` is registered.
    pub fn handles(&self, kind: HandlerKind) -> bool {
        self.mask.contains(kind.mask())
    }

    /// Whether hovering this node should switch the cursor to the pointer cursor.
    pub fn pointer_affordant(&self) -> bool {
        self.pointer_affordant
    }

    /// Explicit dispatch policy, if one was set.
    pub fn policy(&self) -> Option<DispatchPolicy> {
        self.policy
    }

    /// Whether the node takes part in hover tracking.
    pub fn tracks_hover(&self) -> bool {
        self.pointer_affordant || self.mask.intersects(HandlerMask::HOVER)
    }

    /// Register (or replace) the handler for `kind`.
    pub fn set(
        &mut self,
        kind: HandlerKind,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.slots[kind.slot()] = Some(Box::new(handler));
        self.mask.insert(kind.mask());
        self
    }

    /// Remove the handler for `kind`.
    pub fn clear(&mut self, kind: HandlerKind) -> &mut Self {
        self.slots[kind.slot()] = None;
        self.mask.remove(kind.mask());
        self
    }

    /// Mark the node as pointer-affordant (shows the pointer cursor while hovered).
    pub fn set_pointer_affordant(&mut self, affordant: bool) -> &mut Self {
        self.pointer_affordant = affordant;
        self
    }

    /// Override the manager's default dispatch policy for this node.
    pub fn set_policy(&mut self, policy: DispatchPolicy) -> &mut Self {
        self.policy = Some(policy);
        self
    }

    /// Register a [`HandlerKind::PointerMove`] handler.
    pub fn on_pointer_move(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::PointerMove, handler)
    }

    /// Register a [`HandlerKind::PointerOver`] handler.
    pub fn on_pointer_over(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::PointerOver, handler)
    }

    /// Register a [`HandlerKind::PointerOut`] handler.
    pub fn on_pointer_out(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::PointerOut, handler)
    }

    /// Register a [`HandlerKind::PointerDown`] handler.
    pub fn on_pointer_down(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::PointerDown, handler)
    }

    /// Register a [`HandlerKind::PointerUp`] handler.
    pub fn on_pointer_up(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::PointerUp, handler)
    }

    /// Register a [`HandlerKind::PointerUpOutside`] handler.
    pub fn on_pointer_up_outside(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::PointerUpOutside, handler)
    }

    /// Register a [`HandlerKind::Click`] handler.
    pub fn on_click(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::Click, handler)
    }

    /// Register a [`HandlerKind::TouchStart`] handler.
    pub fn on_touch_start(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::TouchStart, handler)
    }

    /// Register a [`HandlerKind::TouchMove`] handler.
    pub fn on_touch_move(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::TouchMove, handler)
    }

    /// Register a [`HandlerKind::TouchEnd`] handler.
    pub fn on_touch_end(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::TouchEnd, handler)
    }

    /// Register a [`HandlerKind::TouchEndOutside`] handler.
    pub fn on_touch_end_outside(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::TouchEndOutside, handler)
    }

    /// Register a [`HandlerKind::Tap`] handler.
    pub fn on_tap(
        &mut self,
        handler: impl FnMut(&mut S, &InteractionData<S::NodeId, E>) + 'static,
    ) -> &mut Self {
        self.set(HandlerKind::Tap, handler)
    }

    /// Invoke the handler for `kind`, if registered. Returns whether one ran.
    pub(crate) fn invoke(
        &mut self,
        kind: HandlerKind,
        scene: &mut S,
        data: &InteractionData<S::NodeId, E>,
    ) -> bool {
        match self.slots[kind.slot()].as_mut() {
            Some(handler) => {
                log::trace!("invoking {kind:?} for {:?}", data.target);
                handler(scene, data);
                true
            }
            None => false,
        }
    }
}

#[cfg(all(test, feature = "scene_adapter"))]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use understory_scene::Scene;

    use crate::types::PointerId;

    type Handlers = NodeHandlers<Scene, ()>;

    #[test]
    fn capabilities_follow_registration() {
        let mut h = Handlers::new();
        assert!(h.capabilities().is_empty());
        assert!(!h.tracks_hover());

        h.on_click(|_, _| {}).on_pointer_over(|_, _| {});
        assert!(h.handles(HandlerKind::Click));
        assert!(h.capabilities().intersects(HandlerMask::PRESS));
        assert!(h.capabilities().intersects(HandlerMask::RELEASE));
        assert!(!h.capabilities().intersects(HandlerMask::TOUCH_PRESS));
        assert!(h.tracks_hover());

        h.clear(HandlerKind::PointerOver);
        assert!(!h.tracks_hover());
        h.set_pointer_affordant(true);
        assert!(h.tracks_hover());
    }

    #[test]
    fn invoke_runs_only_registered_slot() {
        let count = Rc::new(Cell::new(0_u32));
        let mut h = Handlers::new();
        let c = Rc::clone(&count);
        h.on_tap(move |_, _| c.set(c.get() + 1));

        let mut scene = Scene::new();
        let data = InteractionData::new(PointerId::Primary);
        assert!(h.invoke(HandlerKind::Tap, &mut scene, &data));
        assert!(!h.invoke(HandlerKind::TouchEnd, &mut scene, &data));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn policy_defaults_to_none() {
        let mut h = Handlers::new();
        assert_eq!(h.policy(), None);
        h.set_policy(DispatchPolicy::Permeable);
        assert_eq!(h.policy(), Some(DispatchPolicy::Permeable));
    }
}
