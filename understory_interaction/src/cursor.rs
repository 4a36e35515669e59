// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor hint policy.
//!
//! The hover pass decides between two modes; the policy turns a mode change into either a style
//! string written to the bound [`Surface`] or a call to a host hook. Nothing is applied when the
//! mode does not change.

use alloc::borrow::Cow;
use alloc::boxed::Box;

use crate::surface::Surface;

/// The two cursor modes the dispatcher can request.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorMode {
    /// Nothing pointer-affordant is hovered.
    #[default]
    Default,
    /// A pointer-affordant node is hovered.
    Pointer,
}

/// How a cursor mode is presented.
pub enum CursorStyle {
    /// Style string handed to [`Surface::set_cursor`].
    Style(Cow<'static, str>),
    /// Host callback invoked instead of touching the surface.
    Hook(Box<dyn FnMut(CursorMode)>),
}

impl CursorStyle {
    /// A style string, e.g. `"pointer"`.
    pub fn style(style: impl Into<Cow<'static, str>>) -> Self {
        Self::Style(style.into())
    }

    /// A host callback.
    pub fn hook(hook: impl FnMut(CursorMode) + 'static) -> Self {
        Self::Hook(Box::new(hook))
    }
}

impl core::fmt::Debug for CursorStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Style(s) => f.debug_tuple("Style").field(s).finish(),
            Self::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

/// Tracks the applied cursor mode and how each mode is presented.
#[derive(Debug)]
pub struct CursorPolicy {
    mode: CursorMode,
    default_cursor: CursorStyle,
    pointer_cursor: CursorStyle,
}

impl Default for CursorPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorPolicy {
    /// `"default"` and `"pointer"` style strings, starting in [`CursorMode::Default`].
    pub fn new() -> Self {
        Self {
            mode: CursorMode::Default,
            default_cursor: CursorStyle::style("default"),
            pointer_cursor: CursorStyle::style("pointer"),
        }
    }

    /// Last applied mode.
    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Replace the presentation of [`CursorMode::Default`].
    pub fn set_default_cursor(&mut self, style: CursorStyle) {
        self.default_cursor = style;
    }

    /// Replace the presentation of [`CursorMode::Pointer`].
    pub fn set_pointer_cursor(&mut self, style: CursorStyle) {
        self.pointer_cursor = style;
    }

    /// Apply `mode` if it differs from the last applied one. Returns whether anything was applied.
    ///
    /// Style strings need a surface; without one the mode is still recorded.
    pub fn set_mode(&mut self, mode: CursorMode, surface: Option<&mut dyn Surface>) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        let presentation = match mode {
            CursorMode::Default => &mut self.default_cursor,
            CursorMode::Pointer => &mut self.pointer_cursor,
        };
        match presentation {
            CursorStyle::Hook(hook) => hook(mode),
            CursorStyle::Style(style) => match surface {
                Some(surface) => surface.set_cursor(style),
                None => log::debug!("cursor mode {mode:?} recorded without a bound surface"),
            },
        }
        true
    }
}
