// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction manager: turns raw pointer and touch input into per-node handler calls.
//!
//! ## Passes
//!
//! Every dispatch loop walks the [`InteractiveSet`] in order and skips nodes that are no longer
//! alive, since handlers may restructure the scene while a pass is running.
//!
//! - **Move**: the move handler of every registrant runs (no hit test), then the hover pass runs.
//! - **Hover** (on move and on each update tick): nodes tracking hover are hit-tested and their
//!   `is_over` latch flips with over/out handler calls. The pass also decides the cursor mode.
//! - **Press** (mouse down, touch start): hit nodes become pressed; the pass stops after the first
//!   exclusive hit.
//! - **Release** (mouse up, touch end): the first hit in iteration order is the only inside
//!   recipient and gets up (plus click or tap if it was pressed), whatever its dispatch policy.
//!   Every other node that was pressed gets up-outside.
//!
//! ## Update tick
//!
//! [`InteractionManager::update`] is throttled to [`InteractionConfig::update_rate_hz`]. A tick
//! rebuilds the interactive set when it was marked dirty or the scene's interactivity revision
//! changed, reruns the hover pass and applies the resulting cursor mode. Event handlers only use
//! the set as of the last tick.

use alloc::boxed::Box;

use hashbrown::HashMap;
use kurbo::{Point, Size};

use crate::collect::InteractiveSet;
use crate::config::{ConfigError, InteractionConfig, UpdateThrottle};
use crate::cursor::{CursorMode, CursorPolicy, CursorStyle};
use crate::data::InteractionData;
use crate::handlers::{HandlerKind, HandlerMask, NodeHandlers};
use crate::hit::hit_test;
use crate::session::SessionPool;
use crate::surface::{PointerInput, Surface, SurfaceBinding, TouchInput};
use crate::types::{InteractionScene, InteractionState, TouchId};

type Hook<E> = Option<Box<dyn FnMut(&E)>>;

/// Pointer and touch dispatcher for one scene.
///
/// `S` is the scene the manager dispatches over and `E` the host's raw event type, which is
/// handed back to handlers through [`InteractionData::original_event`].
pub struct InteractionManager<S: InteractionScene, E> {
    config: InteractionConfig,
    set: InteractiveSet<S::NodeId>,
    dirty: bool,
    seen_revision: Option<u64>,
    states: HashMap<S::NodeId, InteractionState>,
    handlers: HashMap<S::NodeId, NodeHandlers<S, E>>,
    sessions: SessionPool<S::NodeId, E>,
    cursor: CursorPolicy,
    cursor_candidate: CursorMode,
    surface: Option<SurfaceBinding>,
    throttle: UpdateThrottle,
    enter_hook: Hook<E>,
    leave_hook: Hook<E>,
    release_hook: Hook<E>,
}

impl<S: InteractionScene, E> core::fmt::Debug for InteractionManager<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractionManager")
            .field("config", &self.config)
            .field("interactive", &self.set.items())
            .field("dirty", &self.dirty)
            .field("states", &self.states)
            .field("handlers", &self.handlers.len())
            .field("active_touches", &self.sessions.active_len())
            .field("cursor", &self.cursor.mode())
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl<S: InteractionScene, E> Default for InteractionManager<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InteractionScene, E> InteractionManager<S, E> {
    /// Manager with the default configuration.
    pub fn new() -> Self {
        Self::build(InteractionConfig::default())
    }

    /// Manager with a validated configuration.
    pub fn with_config(config: InteractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: InteractionConfig) -> Self {
        Self {
            config,
            set: InteractiveSet::new(),
            dirty: true,
            seen_revision: None,
            states: HashMap::new(),
            handlers: HashMap::new(),
            sessions: SessionPool::new(),
            cursor: CursorPolicy::new(),
            cursor_candidate: CursorMode::Default,
            surface: None,
            throttle: UpdateThrottle::new(config.update_rate_hz),
            enter_hook: None,
            leave_hook: None,
            release_hook: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    // --- registration ---

    /// Handlers for `node`, created empty on first access.
    pub fn handlers_mut(&mut self, node: S::NodeId) -> &mut NodeHandlers<S, E> {
        self.handlers.entry(node).or_default()
    }

    /// Handlers registered for `node`, if any.
    pub fn handlers(&self, node: S::NodeId) -> Option<&NodeHandlers<S, E>> {
        self.handlers.get(&node)
    }

    /// Drop all handlers and state kept for `node`.
    pub fn remove_handlers(&mut self, node: S::NodeId) -> Option<NodeHandlers<S, E>> {
        self.states.remove(&node);
        self.handlers.remove(&node)
    }

    /// Replace the presentation of [`CursorMode::Default`].
    pub fn set_default_cursor(&mut self, style: CursorStyle) {
        self.cursor.set_default_cursor(style);
    }

    /// Replace the presentation of [`CursorMode::Pointer`].
    pub fn set_pointer_cursor(&mut self, style: CursorStyle) {
        self.cursor.set_pointer_cursor(style);
    }

    /// Called with the raw event when the pointer enters the surface.
    pub fn set_surface_enter_hook(&mut self, hook: impl FnMut(&E) + 'static) {
        self.enter_hook = Some(Box::new(hook));
    }

    /// Called with the raw event after the pointer left the surface.
    pub fn set_surface_leave_hook(&mut self, hook: impl FnMut(&E) + 'static) {
        self.leave_hook = Some(Box::new(hook));
    }

    /// Called with the raw event after every mouse release and touch end pass.
    pub fn set_release_hook(&mut self, hook: impl FnMut(&E) + 'static) {
        self.release_hook = Some(Box::new(hook));
    }

    // --- surface ---

    /// Bind the input surface, detaching and returning the previously bound one.
    ///
    /// `scene_size` is the resolution the scene renders at; device positions are scaled from the
    /// surface's bounding rectangle to it.
    pub fn bind_surface(
        &mut self,
        mut surface: Box<dyn Surface>,
        scene_size: Size,
    ) -> Option<Box<dyn Surface>> {
        let previous = self.unbind_surface();
        surface.attach();
        let binding = SurfaceBinding::new(surface, scene_size);
        log::debug!("bound surface {binding:?}");
        self.surface = Some(binding);
        previous
    }

    /// Detach and return the bound surface.
    pub fn unbind_surface(&mut self) -> Option<Box<dyn Surface>> {
        let mut surface = self.surface.take()?.into_surface();
        surface.detach();
        log::debug!("unbound surface");
        Some(surface)
    }

    /// Whether a surface is bound.
    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    /// Map a device position to scene coordinates.
    ///
    /// Without a bound surface device coordinates are taken as scene coordinates.
    pub fn map_position(&self, device: Point) -> Point {
        match &self.surface {
            Some(binding) => binding.map(device),
            None => device,
        }
    }

    // --- queries ---

    /// Interactive nodes in dispatch order, as of the last rebuild.
    pub fn interactive_nodes(&self) -> &[S::NodeId] {
        self.set.items()
    }

    /// The interactive set, as of the last rebuild.
    pub fn interactive_set(&self) -> &InteractiveSet<S::NodeId> {
        &self.set
    }

    /// Interaction state of `node`, if it took part in any pass yet.
    pub fn state(&self, node: S::NodeId) -> Option<InteractionState> {
        self.states.get(&node).copied()
    }

    /// The primary (mouse) session.
    pub fn primary(&self) -> &InteractionData<S::NodeId, E> {
        self.sessions.primary()
    }

    /// The live session for a touch.
    pub fn touch(&self, id: TouchId) -> Option<&InteractionData<S::NodeId, E>> {
        self.sessions.get(id)
    }

    /// All pointer sessions.
    pub fn sessions(&self) -> &SessionPool<S::NodeId, E> {
        &self.sessions
    }

    /// Cursor mode last applied.
    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor.mode()
    }

    /// Cursor mode computed by the most recent hover pass; applied on the next update tick.
    pub fn cursor_candidate(&self) -> CursorMode {
        self.cursor_candidate
    }

    // --- update tick ---

    /// Request a rebuild of the interactive set on the next update tick.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Periodic tick at host time `now_ms`.
    ///
    /// Does nothing without a bound surface or when called faster than the configured rate.
    /// Returns whether a pass ran.
    pub fn update(&mut self, scene: &mut S, now_ms: u64) -> bool {
        if self.surface.is_none() {
            return false;
        }
        if !self.throttle.ready(now_ms) {
            return false;
        }
        self.run_update(scene);
        true
    }

    /// Run an update pass now, ignoring the throttle and the surface binding.
    pub fn force_update(&mut self, scene: &mut S) {
        self.run_update(scene);
    }

    fn run_update(&mut self, scene: &mut S) {
        self.refresh_set(scene);
        let generation = scene.frame_generation();
        let mode = self.hover_pass(scene, generation);
        self.cursor_candidate = mode;
        self.apply_cursor(mode);
    }

    fn refresh_set(&mut self, scene: &S) {
        let revision = scene.interactivity_revision();
        if !self.dirty && self.seen_revision == Some(revision) {
            return;
        }
        self.dirty = false;
        self.seen_revision = Some(revision);
        self.set.rebuild(scene);
        self.states.retain(|&node, _| scene.contains(node));
        self.handlers.retain(|&node, _| scene.contains(node));
        log::debug!("rebuilt interactive set: {} nodes", self.set.len());
    }

    fn apply_cursor(&mut self, mode: CursorMode) {
        let applied = match self.surface.as_mut() {
            Some(binding) => self.cursor.set_mode(mode, Some(binding.surface.as_mut())),
            None => self.cursor.set_mode(mode, None),
        };
        if applied {
            log::debug!("cursor mode -> {mode:?}");
        }
    }

    fn is_exclusive(&self, node: S::NodeId, handlers: &NodeHandlers<S, E>) -> bool {
        handlers
            .policy()
            .unwrap_or(self.config.default_policy)
            .is_exclusive(self.set.has_interactive_descendant(node))
    }

    /// Hover pass for the primary pointer. Returns the cursor mode it calls for.
    fn hover_pass(&mut self, scene: &mut S, generation: u64) -> CursorMode {
        let mut mode = CursorMode::Default;
        let point = self.sessions.primary().global;
        for i in 0..self.set.len() {
            let node = self.set.items()[i];
            if !scene.contains(node) {
                continue;
            }
            let Some(handlers) = self.handlers.get_mut(&node) else {
                continue;
            };
            if !handlers.tracks_hover() {
                continue;
            }
            let target = hit_test(&*scene, node, point, generation);
            let state = self.states.entry(node).or_default();
            state.last_hit = target.is_some();
            if target.is_some() {
                if handlers.pointer_affordant() {
                    mode = CursorMode::Pointer;
                }
                if !state.is_over {
                    state.is_over = true;
                    self.sessions.primary_mut().target = target;
                    handlers.invoke(HandlerKind::PointerOver, scene, self.sessions.primary());
                }
            } else if state.is_over {
                state.is_over = false;
                self.sessions.primary_mut().target = Some(node);
                handlers.invoke(HandlerKind::PointerOut, scene, self.sessions.primary());
            }
        }
        mode
    }

    // --- mouse ---

    fn record_primary(&mut self, position: Point, event: E) {
        let position = self.map_position(position);
        let primary = self.sessions.primary_mut();
        primary.global = position;
        primary.original_event = Some(event);
    }

    /// The primary pointer moved.
    pub fn on_pointer_move(&mut self, scene: &mut S, input: PointerInput<E>) {
        self.record_primary(input.position, input.event);
        log::trace!("pointer move at {:?}", self.sessions.primary().global);

        for i in 0..self.set.len() {
            let node = self.set.items()[i];
            if !scene.contains(node) {
                continue;
            }
            if let Some(handlers) = self.handlers.get_mut(&node) {
                handlers.invoke(HandlerKind::PointerMove, scene, self.sessions.primary());
            }
        }

        let generation = scene.frame_generation();
        self.cursor_candidate = self.hover_pass(scene, generation);
    }

    /// A mouse button was pressed.
    pub fn on_pointer_down(&mut self, scene: &mut S, input: PointerInput<E>) {
        self.record_primary(input.position, input.event);
        let point = self.sessions.primary().global;
        let generation = scene.frame_generation();
        log::trace!("pointer down at {point:?}");

        for i in 0..self.set.len() {
            let node = self.set.items()[i];
            if !scene.contains(node) {
                continue;
            }
            let Some(handlers) = self.handlers.get(&node) else {
                continue;
            };
            if !handlers.capabilities().intersects(HandlerMask::PRESS) {
                continue;
            }
            let exclusive = self.is_exclusive(node, handlers);
            let target = hit_test(&*scene, node, point, generation);
            let state = self.states.entry(node).or_default();
            state.last_hit = target.is_some();
            if target.is_none() {
                continue;
            }
            state.is_pressed = true;
            self.sessions.primary_mut().target = target;
            if let Some(handlers) = self.handlers.get_mut(&node) {
                handlers.invoke(HandlerKind::PointerDown, scene, self.sessions.primary());
            }
            if exclusive {
                break;
            }
        }
    }

    /// A mouse button was released.
    pub fn on_pointer_up(&mut self, scene: &mut S, input: PointerInput<E>) {
        self.record_primary(input.position, input.event);
        let point = self.sessions.primary().global;
        let generation = scene.frame_generation();
        log::trace!("pointer up at {point:?}");

        let mut latched = false;
        for i in 0..self.set.len() {
            let node = self.set.items()[i];
            if !scene.contains(node) {
                continue;
            }
            let Some(handlers) = self.handlers.get(&node) else {
                continue;
            };
            if !handlers.capabilities().intersects(HandlerMask::RELEASE) {
                continue;
            }
            let target = hit_test(&*scene, node, point, generation);
            let state = self.states.entry(node).or_default();
            state.last_hit = target.is_some();
            let was_pressed = state.is_pressed;
            state.is_pressed = false;

            let Some(handlers) = self.handlers.get_mut(&node) else {
                continue;
            };
            match target {
                Some(target) if !latched => {
                    self.sessions.primary_mut().target = Some(target);
                    handlers.invoke(HandlerKind::PointerUp, scene, self.sessions.primary());
                    if was_pressed {
                        handlers.invoke(HandlerKind::Click, scene, self.sessions.primary());
                    }
                    latched = true;
                }
                _ => {
                    if was_pressed {
                        self.sessions.primary_mut().target = Some(node);
                        handlers.invoke(
                            HandlerKind::PointerUpOutside,
                            scene,
                            self.sessions.primary(),
                        );
                    }
                }
            }
        }

        if let Some(hook) = self.release_hook.as_mut()
            && let Some(event) = self.sessions.primary().original_event.as_ref()
        {
            hook(event);
        }
    }

    /// The pointer left the surface: the cursor resets and every hovered node gets an out call.
    pub fn on_pointer_leave_surface(&mut self, scene: &mut S, event: E) {
        self.cursor_candidate = CursorMode::Default;
        self.apply_cursor(CursorMode::Default);

        for i in 0..self.set.len() {
            let node = self.set.items()[i];
            if !scene.contains(node) {
                continue;
            }
            let Some(state) = self.states.get_mut(&node) else {
                continue;
            };
            if !state.is_over {
                continue;
            }
            state.is_over = false;
            self.sessions.primary_mut().target = Some(node);
            if let Some(handlers) = self.handlers.get_mut(&node) {
                handlers.invoke(HandlerKind::PointerOut, scene, self.sessions.primary());
            }
        }

        if let Some(hook) = self.leave_hook.as_mut() {
            hook(&event);
        }
    }

    /// The pointer entered the surface.
    pub fn on_pointer_enter_surface(&mut self, event: E) {
        if let Some(hook) = self.enter_hook.as_mut() {
            hook(&event);
        }
    }
}

impl<S: InteractionScene, E: Clone> InteractionManager<S, E> {
    /// Touches started. Each changed contact gets a session and runs its own press pass.
    pub fn on_touch_start(&mut self, scene: &mut S, input: TouchInput<E>) {
        let generation = scene.frame_generation();
        for touch in &input.changed {
            let point = self.map_position(touch.position);
            let session = self.sessions.acquire(touch.id);
            session.global = point;
            session.original_event = Some(input.event.clone());
            log::trace!("touch {:?} start at {point:?}", touch.id);

            for i in 0..self.set.len() {
                let node = self.set.items()[i];
                if !scene.contains(node) {
                    continue;
                }
                let Some(handlers) = self.handlers.get(&node) else {
                    continue;
                };
                if !handlers.capabilities().intersects(HandlerMask::TOUCH_PRESS) {
                    continue;
                }
                let exclusive = self.is_exclusive(node, handlers);
                let target = hit_test(&*scene, node, point, generation);
                let state = self.states.entry(node).or_default();
                state.last_hit = target.is_some();
                if target.is_none() {
                    continue;
                }
                state.is_pressed = true;
                state.active_touch = Some(touch.id);
                if let Some(session) = self.sessions.get_mut(touch.id) {
                    session.target = target;
                }
                if let (Some(handlers), Some(session)) =
                    (self.handlers.get_mut(&node), self.sessions.get(touch.id))
                {
                    handlers.invoke(HandlerKind::TouchStart, scene, session);
                }
                if exclusive {
                    break;
                }
            }
        }
    }

    /// Touches moved. Every touch-move registrant hears about every moved contact.
    pub fn on_touch_move(&mut self, scene: &mut S, input: TouchInput<E>) {
        for touch in &input.changed {
            let point = self.map_position(touch.position);
            let Some(session) = self.sessions.get_mut(touch.id) else {
                log::debug!("ignoring move for unknown touch {:?}", touch.id);
                continue;
            };
            session.global = point;
            session.original_event = Some(input.event.clone());

            for i in 0..self.set.len() {
                let node = self.set.items()[i];
                if !scene.contains(node) {
                    continue;
                }
                if let (Some(handlers), Some(session)) =
                    (self.handlers.get_mut(&node), self.sessions.get(touch.id))
                {
                    handlers.invoke(HandlerKind::TouchMove, scene, session);
                }
            }
        }
    }

    /// Touches ended. Only nodes pressed by the ending contact take part in its release pass.
    pub fn on_touch_end(&mut self, scene: &mut S, input: TouchInput<E>) {
        let generation = scene.frame_generation();
        for touch in &input.changed {
            let point = self.map_position(touch.position);
            let Some(session) = self.sessions.get_mut(touch.id) else {
                log::debug!("ignoring end for unknown touch {:?}", touch.id);
                continue;
            };
            session.global = point;
            session.original_event = Some(input.event.clone());
            log::trace!("touch {:?} end at {point:?}", touch.id);

            let mut latched = false;
            for i in 0..self.set.len() {
                let node = self.set.items()[i];
                if !scene.contains(node) {
                    continue;
                }
                if self.states.get(&node).map(|s| s.active_touch) != Some(Some(touch.id)) {
                    continue;
                }
                let Some(handlers) = self.handlers.get(&node) else {
                    continue;
                };
                if !handlers
                    .capabilities()
                    .intersects(HandlerMask::TOUCH_RELEASE)
                {
                    continue;
                }
                let target = hit_test(&*scene, node, point, generation);
                let state = self.states.entry(node).or_default();
                state.last_hit = target.is_some();
                state.active_touch = None;
                let was_pressed = state.is_pressed;
                state.is_pressed = false;

                let (Some(handlers), Some(session)) =
                    (self.handlers.get_mut(&node), self.sessions.get_mut(touch.id))
                else {
                    continue;
                };
                match target {
                    Some(target) if !latched => {
                        session.target = Some(target);
                        handlers.invoke(HandlerKind::TouchEnd, scene, session);
                        if was_pressed {
                            handlers.invoke(HandlerKind::Tap, scene, session);
                        }
                        latched = true;
                    }
                    _ => {
                        if was_pressed {
                            session.target = Some(node);
                            handlers.invoke(HandlerKind::TouchEndOutside, scene, session);
                        }
                    }
                }
            }

            // Nodes pressed by this touch that sat out the release pass.
            for state in self.states.values_mut() {
                if state.active_touch == Some(touch.id) {
                    state.active_touch = None;
                    state.is_pressed = false;
                }
            }
            self.sessions.release(touch.id);
        }

        if let Some(hook) = self.release_hook.as_mut() {
            hook(&input.event);
        }
    }
}
