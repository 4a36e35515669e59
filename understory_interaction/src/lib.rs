// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Interaction: pointer and touch dispatch for retained scene graphs.
//!
//! ## Overview
//!
//! The [`InteractionManager`] sits between a host input surface and a scene. It receives raw mouse
//! and touch input, maps device positions into scene coordinates, hit-tests interactive nodes and
//! calls per-node handlers with [`InteractionData`] describing the pointer. It also tracks hover
//! and press state per node and switches the cursor between a default and a pointer style.
//!
//! The scene is reached through the [`InteractionScene`] trait; the `scene_adapter` feature
//! (enabled by default) implements it for `understory_scene::Scene`.
//!
//! ## Pieces
//!
//! - [`hit`]: recursive hit testing with explicit hit areas, default extents and transform
//!   generations.
//! - [`collect`]: flattening the scene into the ordered [`InteractiveSet`].
//! - [`handlers`]: per-node handler slots, capability masks and dispatch policies.
//! - [`session`]: the primary pointer session and pooled touch sessions.
//! - [`cursor`] and [`surface`]: cursor hints and the host surface binding.
//! - [`manager`]: the dispatcher tying everything together.
//!
//! ## Timing
//!
//! Hit tests trust node transforms only when they were produced by the scene's most recent
//! transform pass. Hosts run that pass (for `understory_scene`, `Scene::commit`) before feeding
//! input, and call [`InteractionManager::update`] once per frame so hover state follows nodes that
//! move under a still pointer.
//!
//! ## Example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use kurbo::{Affine, Size, Vec2};
//! use understory_interaction::{InteractionManager, PointerInput};
//! use understory_scene::{Extent, Scene, SceneNode};
//!
//! let mut scene = Scene::with_root(SceneNode::interactive());
//! let button = scene.insert(
//!     scene.root(),
//!     SceneNode {
//!         local_transform: Affine::translate(Vec2::new(20.0, 20.0)),
//!         extent: Some(Extent::new(Size::new(80.0, 30.0))),
//!         ..SceneNode::interactive()
//!     },
//! );
//! scene.commit();
//!
//! let clicks = Rc::new(Cell::new(0));
//! let mut manager = InteractionManager::<Scene, ()>::new();
//! let counter = Rc::clone(&clicks);
//! manager
//!     .handlers_mut(button)
//!     .set_pointer_affordant(true)
//!     .on_click(move |_, _| counter.set(counter.get() + 1));
//! manager.force_update(&mut scene);
//!
//! manager.on_pointer_down(&mut scene, PointerInput::new((50.0, 30.0), ()));
//! manager.on_pointer_up(&mut scene, PointerInput::new((50.0, 30.0), ()));
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod collect;
pub mod config;
pub mod cursor;
pub mod data;
pub mod handlers;
pub mod hit;
pub mod manager;
pub mod session;
pub mod surface;
pub mod types;

pub use collect::InteractiveSet;
pub use config::{ConfigError, InteractionConfig};
pub use cursor::{CursorMode, CursorStyle};
pub use data::InteractionData;
pub use handlers::{HandlerKind, HandlerMask, NodeHandlers};
pub use manager::InteractionManager;
pub use surface::{PointerInput, Surface, TouchInput, TouchPoint};
pub use types::{DispatchPolicy, InteractionScene, InteractionState, PointerId, TouchId};
