// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layer transitions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the manager
//! calls as requests are resolved, layers change state, and sweeps complete. All method
//! bodies default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional boxed [`TraceSink`]. When the `trace` feature is **off**,
//! every `Tracer` method compiles to nothing and installed sinks are dropped. When **on**,
//! each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;

use crate::types::{LayerId, LayerRequest};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Which state change a layer went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// The `setup` hook ran and the layer is now set up.
    Setup,
    /// The `activate` hook ran and the layer is now active.
    Activate,
    /// The `deactivate` hook ran and the layer is now inactive.
    Deactivate,
    /// The layer was scheduled for teardown.
    MarkDead,
    /// The layer was destroyed and removed from the registry.
    TearDown,
}

/// Emitted for every request the manager applies.
#[derive(Clone, Copy, Debug)]
pub struct RequestEvent<'a> {
    /// Number of completed sweeps when the request was applied.
    pub frame_index: u64,
    /// The request.
    pub request: &'a LayerRequest,
    /// Whether the target name matched a live layer.
    pub resolved: bool,
}

/// Emitted when a layer changes state.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent<'a> {
    /// Number of completed sweeps when the transition happened.
    pub frame_index: u64,
    /// Handle of the layer.
    pub layer: LayerId,
    /// Registry name of the layer.
    pub name: &'a str,
    /// What happened.
    pub kind: TransitionKind,
}

/// Emitted when a layer is registered.
#[derive(Clone, Copy, Debug)]
pub struct RegisterEvent<'a> {
    /// Handle of the new layer.
    pub layer: LayerId,
    /// Registry name of the new layer.
    pub name: &'a str,
    /// Whether a previous holder of the name was torn down to make room.
    pub replaced: bool,
}

/// Emitted at the end of each update sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepSummary {
    /// Index of the sweep, starting at 1.
    pub frame_index: u64,
    /// Layers whose `update` hook ran.
    pub updated: usize,
    /// Dead layers destroyed by this sweep.
    pub removed: usize,
    /// Layers left in the registry.
    pub remaining: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the manager.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layer is registered.
    fn on_register(&mut self, e: &RegisterEvent<'_>) {
        _ = e;
    }

    /// Called for every applied request, resolved or not.
    fn on_request(&mut self, e: &RequestEvent<'_>) {
        _ = e;
    }

    /// Called when a layer changes state.
    fn on_transition(&mut self, e: &TransitionEvent<'_>) {
        _ = e;
    }

    /// Called at the end of each update sweep.
    fn on_sweep(&mut self, s: &SweepSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional boxed [`TraceSink`].
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        let mut tracer = Self::default();
        tracer.set_sink(Some(sink));
        tracer
    }

    /// Installs or removes the sink.
    #[inline]
    pub fn set_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        #[cfg(feature = "trace")]
        {
            self.sink = sink;
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
        }
    }

    /// Emits a [`RegisterEvent`].
    #[inline]
    pub fn register(&mut self, e: &RegisterEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_register(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RequestEvent`].
    #[inline]
    pub fn request(&mut self, e: &RequestEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_request(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SweepSummary`].
    #[inline]
    pub fn sweep(&mut self, s: &SweepSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_sweep(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;
    use crate::types::RequestKind;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Counting(Rc<RefCell<Vec<&'static str>>>);

    impl TraceSink for Counting {
        fn on_request(&mut self, e: &RequestEvent<'_>) {
            self.0
                .borrow_mut()
                .push(if e.resolved { "resolved" } else { "unresolved" });
        }

        fn on_sweep(&mut self, _s: &SweepSummary) {
            self.0.borrow_mut().push("sweep");
        }
    }

    #[test]
    fn tracer_forwards_to_sink() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(Counting(log.clone())));
        let req = LayerRequest::new(RequestKind::Activate, "Nope", None);
        tracer.request(&RequestEvent {
            frame_index: 0,
            request: &req,
            resolved: false,
        });
        tracer.sweep(&SweepSummary {
            frame_index: 1,
            updated: 0,
            removed: 0,
            remaining: 0,
        });
        assert_eq!(*log.borrow(), ["unresolved", "sweep"], "both events arrive in order");
    }

    #[test]
    fn removing_the_sink_silences_the_tracer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(Counting(log.clone())));
        tracer.set_sink(None);
        tracer.sweep(&SweepSummary {
            frame_index: 1,
            updated: 0,
            removed: 0,
            remaining: 0,
        });
        assert!(log.borrow().is_empty(), "no sink, no events");
    }

    #[test]
    fn none_tracer_accepts_events() {
        let mut tracer = Tracer::none();
        tracer.sweep(&SweepSummary {
            frame_index: 1,
            updated: 2,
            removed: 0,
            remaining: 2,
        });
        let mut noop = NoopSink;
        noop.on_sweep(&SweepSummary {
            frame_index: 1,
            updated: 2,
            removed: 0,
            remaining: 2,
        });
    }
}
