// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer manager implementation.
//!
//! ## Overview
//!
//! Owns every registered layer, resolves transition requests by name, and routes host
//! events to the layers that should see them.
//!
//! ## Registry
//!
//! - Layers live in a generational slot arena; [`LayerId`] handles go stale when a layer
//!   is destroyed and never alias a later occupant of the same slot.
//! - A name index maps each name to its handle. Registry order is ascending name order;
//!   every walk (sweep, draw, fan-out, [`LayerManager::active_layer`]) follows it.
//!
//! ## Requests
//!
//! - Requests from layers and from the host share one FIFO queue.
//! - The queue is drained after every hook call, before the next layer is visited, so a
//!   request takes effect before any other layer is dispatched to.
//! - Requests raised while a request is being applied wait for it to finish. A `setup`
//!   hook that activates a sibling sees the sibling set up after its own activation.
//! - Unknown names and dead targets are ignored.
//!
//! ## Sweep
//!
//! [`LayerManager::update`] walks a snapshot of the registry, re-reading each layer's flags
//! as it reaches it. Dead layers are deactivated (if active), exited (if set up), and
//! removed; active layers are updated. A layer marked dead earlier in the same walk is
//! removed, never updated.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::AddLayerError;
use crate::event::HostEvent;
use crate::layer::{Context, Layer};
use crate::profile::{Desktop, InputProfile};
use crate::source::{Detached, EventSource};
use crate::trace::{
    RegisterEvent, RequestEvent, SweepSummary, TraceSink, Tracer, TransitionEvent, TransitionKind,
};
use crate::types::{
    Audience, DuplicatePolicy, LayerFlags, LayerId, LayerRequest, RequestKind, Topics,
};

struct Slot<D> {
    generation: u32,
    name: String,
    flags: LayerFlags,
    layer: Box<dyn Layer<D>>,
}

/// Registry and lifecycle driver for named layers.
///
/// ## Usage
///
/// - Construct with [`LayerManager::new`] when the host drives the manager directly, or
///   with [`LayerManager::with_source`] to subscribe to a host [`EventSource`] using an
///   [`InputProfile`].
/// - Register layers with [`LayerManager::add_layer`]. Setup is deferred until a layer is
///   first activated.
/// - Call [`LayerManager::switch_layer`] (or one of the other transition methods) to pick
///   the starting layer.
/// - Each frame, call [`LayerManager::update`] and [`LayerManager::draw`], or forward host
///   events through [`LayerManager::handle_event`].
/// - Call [`LayerManager::exit`] on shutdown. Dropping the manager does the same.
pub struct LayerManager<D = (), S: EventSource = Detached> {
    slots: Vec<Option<Slot<D>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    names: BTreeMap<String, LayerId>,
    shared: D,
    source: S,
    profile: Box<dyn InputProfile>,
    subscribed: Topics,
    duplicates: DuplicatePolicy,
    outbox: VecDeque<LayerRequest>,
    tracer: Tracer,
    frame_index: u64,
}

impl<D, S: EventSource> core::fmt::Debug for LayerManager<D, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayerManager")
            .field("layers", &self.names)
            .field("free_list", &self.free_list.len())
            .field("profile", &self.profile)
            .field("subscribed", &self.subscribed)
            .field("duplicates", &self.duplicates)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl<D> LayerManager<D, Detached> {
    /// Create a manager with the [`Desktop`] profile and no host subscription.
    pub fn new(shared: D) -> Self {
        Self::with_source(shared, Detached, Desktop)
    }
}

impl<D: Default> Default for LayerManager<D, Detached> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D, S: EventSource> LayerManager<D, S> {
    /// Create a manager subscribed to `source` for the app set and `profile`'s input set.
    pub fn with_source(shared: D, source: S, profile: impl InputProfile + 'static) -> Self {
        let mut manager = Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            names: BTreeMap::new(),
            shared,
            source,
            profile: Box::new(profile),
            subscribed: Topics::empty(),
            duplicates: DuplicatePolicy::default(),
            outbox: VecDeque::new(),
            tracer: Tracer::none(),
            frame_index: 0,
        };
        let input = manager.profile.topics();
        manager.subscribe(Topics::APP | input);
        manager
    }

    /// Set the policy for names that are already registered.
    pub fn set_duplicate_policy(&mut self, policy: DuplicatePolicy) {
        self.duplicates = policy;
    }

    /// Current policy for names that are already registered.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Install or remove a trace sink. Events are only emitted with the `trace` feature.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.tracer.set_sink(sink);
    }

    /// The input profile chosen at construction.
    pub fn profile(&self) -> &dyn InputProfile {
        &*self.profile
    }

    /// Topics currently subscribed on the event source.
    pub fn subscriptions(&self) -> Topics {
        self.subscribed
    }

    /// The host event source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The host event source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Shared application data lent to every hook.
    pub fn shared_app_data(&self) -> &D {
        &self.shared
    }

    /// Shared application data, mutably.
    pub fn shared_app_data_mut(&mut self) -> &mut D {
        &mut self.shared
    }

    /// Replace the shared application data, returning the previous value.
    pub fn set_shared_app_data(&mut self, shared: D) -> D {
        core::mem::replace(&mut self.shared, shared)
    }

    /// Number of completed update sweeps.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Subscribe to the app set (update, draw, exit).
    pub fn enable(&mut self) {
        self.subscribe(Topics::APP);
    }

    /// Unsubscribe from the app set. Input subscriptions are kept.
    pub fn disable(&mut self) {
        self.unsubscribe(Topics::APP);
    }

    fn subscribe(&mut self, topics: Topics) {
        let fresh = topics.difference(self.subscribed);
        if !fresh.is_empty() {
            self.source.subscribe(fresh);
            self.subscribed |= fresh;
        }
    }

    fn unsubscribe(&mut self, topics: Topics) {
        let held = topics.intersection(self.subscribed);
        if !held.is_empty() {
            self.source.unsubscribe(held);
            self.subscribed.remove(held);
        }
    }

    // --- registration ---

    /// Register a layer under its [`name`](Layer::name). The manager takes ownership.
    ///
    /// The layer's `setup` hook is not run until it is first activated.
    pub fn add_layer<L: Layer<D> + 'static>(&mut self, layer: L) -> Result<LayerId, AddLayerError> {
        self.add_boxed_layer(Box::new(layer))
    }

    /// Register an already boxed layer. See [`add_layer`](Self::add_layer).
    pub fn add_boxed_layer(&mut self, layer: Box<dyn Layer<D>>) -> Result<LayerId, AddLayerError> {
        let name = String::from(layer.name());
        if name.is_empty() {
            return Err(AddLayerError::EmptyName);
        }
        let mut replaced = false;
        if let Some(&previous) = self.names.get(&name) {
            match self.duplicates {
                DuplicatePolicy::Reject => return Err(AddLayerError::DuplicateName(name)),
                DuplicatePolicy::Replace => {
                    self.tear_down(previous);
                    self.pump();
                    replaced = true;
                }
            }
        }
        let id = self.allocate(name.clone(), layer);
        self.names.insert(name, id);
        if let Some(Some(slot)) = self.slots.get(id.idx()) {
            self.tracer.register(&RegisterEvent {
                layer: id,
                name: &slot.name,
                replaced,
            });
        }
        Ok(id)
    }

    fn allocate(&mut self, name: String, layer: Box<dyn Layer<D>>) -> LayerId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(None);
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        self.slots[idx] = Some(Slot {
            generation,
            name,
            flags: LayerFlags::empty(),
            layer,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "LayerId uses 32-bit indices by design."
        )]
        LayerId::new(idx as u32, generation)
    }

    // --- queries ---

    /// Returns true if `id` refers to a registered layer.
    pub fn is_alive(&self, id: LayerId) -> bool {
        self.slot(id).is_some()
    }

    /// Returns true if a layer named `name` is registered.
    pub fn contains_layer(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Handle of the layer named `name`.
    pub fn layer_id(&self, name: &str) -> Option<LayerId> {
        self.names.get(name).copied()
    }

    /// Registered names, in registry order.
    pub fn layer_names(&self) -> Vec<String> {
        self.names.keys().cloned().collect()
    }

    /// Number of registered layers, dead ones included until the sweep removes them.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no layer is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lifecycle flags of the layer named `name`.
    pub fn flags(&self, name: &str) -> Option<LayerFlags> {
        self.flags_of(self.layer_id(name)?)
    }

    /// Lifecycle flags of the layer behind `id`.
    pub fn flags_of(&self, id: LayerId) -> Option<LayerFlags> {
        self.slot(id).map(|s| s.flags)
    }

    /// The layer named `name`.
    pub fn layer(&self, name: &str) -> Option<&dyn Layer<D>> {
        let slot = self.slot(self.layer_id(name)?)?;
        Some(&*slot.layer)
    }

    /// The first active layer in registry order.
    pub fn active_layer(&self) -> Option<&dyn Layer<D>> {
        self.names
            .values()
            .filter_map(|&id| self.slot(id))
            .find(|s| s.flags.is_active())
            .map(|s| &*s.layer)
    }

    /// Name of the first active layer in registry order.
    pub fn active_layer_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|&(_, &id)| self.flags_of(id).is_some_and(LayerFlags::is_active))
            .map(|(name, _)| name.as_str())
    }

    fn slot(&self, id: LayerId) -> Option<&Slot<D>> {
        let slot = self.slots.get(id.idx())?.as_ref()?;
        (slot.generation == id.1).then_some(slot)
    }

    fn slot_mut(&mut self, id: LayerId) -> Option<&mut Slot<D>> {
        let slot = self.slots.get_mut(id.idx())?.as_mut()?;
        (slot.generation == id.1).then_some(slot)
    }

    fn order(&self) -> Vec<LayerId> {
        self.names.values().copied().collect()
    }

    // --- transitions ---

    /// Set up (if needed) and activate `name`, leaving other layers as they are.
    pub fn activate_layer(&mut self, name: impl Into<String>) {
        self.submit(LayerRequest::new(RequestKind::Activate, name, None));
    }

    /// Run `name`'s `deactivate` hook and clear its ACTIVE flag, whatever its state.
    pub fn deactivate_layer(&mut self, name: impl Into<String>) {
        self.submit(LayerRequest::new(RequestKind::Deactivate, name, None));
    }

    /// Schedule `name` for teardown on the next [`update`](Self::update).
    pub fn delete_layer(&mut self, name: impl Into<String>) {
        self.submit(LayerRequest::new(RequestKind::Delete, name, None));
    }

    /// Deactivate every other set-up layer, then set up (if needed) and activate `name`.
    pub fn switch_layer(&mut self, name: impl Into<String>) {
        self.submit(LayerRequest::new(RequestKind::Switch, name, None));
    }

    /// Like [`switch_layer`](Self::switch_layer), handing `message` to the target.
    pub fn switch_layer_with_message(
        &mut self,
        name: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.submit(LayerRequest::new(RequestKind::Switch, name, None).with_message(message));
    }

    /// Switch to the layer behind `id`. Stale handles are ignored.
    pub fn switch_to(&mut self, id: LayerId) {
        if let Some(name) = self.slot(id).map(|s| s.name.clone()) {
            self.switch_layer(name);
        }
    }

    /// Apply `request` and everything it causes before returning.
    pub fn submit(&mut self, request: LayerRequest) {
        self.outbox.push_back(request);
        self.pump();
    }

    fn pump(&mut self) {
        while let Some(request) = self.outbox.pop_front() {
            self.apply(&request);
        }
    }

    fn apply(&mut self, request: &LayerRequest) {
        let target = self.names.get(&request.target).copied();
        self.tracer.request(&RequestEvent {
            frame_index: self.frame_index,
            request,
            resolved: target.is_some(),
        });
        let Some(id) = target else {
            return;
        };
        match request.kind {
            RequestKind::Activate => self.bring_up(id, Some(request)),
            RequestKind::Deactivate => self.take_down(id, Some(request)),
            RequestKind::Delete => self.mark_dead(id),
            RequestKind::Switch => {
                if self.flags_of(id).is_none_or(LayerFlags::is_dead) {
                    return;
                }
                for other in self.order() {
                    if other == id {
                        continue;
                    }
                    if self.flags_of(other).is_some_and(LayerFlags::is_setup) {
                        self.take_down(other, Some(request));
                    }
                }
                self.bring_up(id, Some(request));
            }
        }
    }

    fn bring_up(&mut self, id: LayerId, cause: Option<&LayerRequest>) {
        let Some(flags) = self.flags_of(id) else {
            return;
        };
        if flags.is_dead() {
            return;
        }
        if !flags.is_setup() {
            self.invoke(id, cause, |layer, cx| layer.setup(cx));
            self.set_flag(id, LayerFlags::SETUP, true);
            self.trace_transition(id, TransitionKind::Setup);
        }
        self.invoke(id, cause, |layer, cx| layer.activate(cx));
        self.set_flag(id, LayerFlags::ACTIVE, true);
        self.trace_transition(id, TransitionKind::Activate);
    }

    /// Run `deactivate` and clear ACTIVE. Inactive and never set up layers get the hook too.
    fn take_down(&mut self, id: LayerId, cause: Option<&LayerRequest>) {
        if !self.is_alive(id) {
            return;
        }
        self.invoke(id, cause, |layer, cx| layer.deactivate(cx));
        self.set_flag(id, LayerFlags::ACTIVE, false);
        self.trace_transition(id, TransitionKind::Deactivate);
    }

    fn mark_dead(&mut self, id: LayerId) {
        if self.flags_of(id).is_none_or(LayerFlags::is_dead) {
            return;
        }
        self.set_flag(id, LayerFlags::DEAD, true);
        self.trace_transition(id, TransitionKind::MarkDead);
    }

    /// Deactivate (if active), exit (if set up), and remove a layer. Requests raised by its
    /// hooks stay queued.
    fn tear_down(&mut self, id: LayerId) {
        let Some(flags) = self.flags_of(id) else {
            return;
        };
        if flags.is_setup() {
            if flags.is_active() {
                self.take_down(id, None);
            }
            self.invoke(id, None, |layer, cx| layer.exit(cx));
        }
        self.remove(id);
    }

    fn remove(&mut self, id: LayerId) {
        self.trace_transition(id, TransitionKind::TearDown);
        if let Some(slot) = self.slots.get_mut(id.idx()).and_then(Option::take) {
            if self.names.get(&slot.name) == Some(&id) {
                self.names.remove(&slot.name);
            }
            self.free_list.push(id.idx());
        }
    }

    fn set_flag(&mut self, id: LayerId, flag: LayerFlags, value: bool) {
        if let Some(slot) = self.slot_mut(id) {
            slot.flags.set(flag, value);
        }
    }

    fn trace_transition(&mut self, id: LayerId, kind: TransitionKind) {
        if let Some(Some(slot)) = self.slots.get(id.idx()) {
            self.tracer.transition(&TransitionEvent {
                frame_index: self.frame_index,
                layer: id,
                name: &slot.name,
                kind,
            });
        }
    }

    fn invoke<R>(
        &mut self,
        id: LayerId,
        cause: Option<&LayerRequest>,
        f: impl FnOnce(&mut dyn Layer<D>, &mut Context<'_, D>) -> R,
    ) -> Option<R> {
        let slot = self.slots.get_mut(id.idx())?.as_mut()?;
        if slot.generation != id.1 {
            return None;
        }
        let mut cx = Context::new(&slot.name, &mut self.shared, &mut self.outbox, cause);
        Some(f(&mut *slot.layer, &mut cx))
    }

    // --- frame ---

    /// Run one sweep: destroy dead layers and update active ones, in registry order.
    pub fn update(&mut self) {
        self.frame_index += 1;
        let mut updated = 0;
        let mut removed = 0;
        for id in self.order() {
            let Some(flags) = self.flags_of(id) else {
                continue;
            };
            if flags.is_dead() {
                self.tear_down(id);
                removed += 1;
            } else if flags.is_active() {
                self.invoke(id, None, |layer, cx| layer.update(cx));
                updated += 1;
            } else {
                continue;
            }
            self.pump();
        }
        self.tracer.sweep(&SweepSummary {
            frame_index: self.frame_index,
            updated,
            removed,
            remaining: self.names.len(),
        });
    }

    /// Draw every active layer, in registry order.
    pub fn draw(&mut self) {
        for id in self.order() {
            if self.flags_of(id).is_some_and(LayerFlags::is_active) {
                self.invoke(id, None, |layer, cx| layer.draw(cx));
                self.pump();
            }
        }
    }

    /// Unsubscribe from the host and destroy every layer, dead or alive.
    ///
    /// Set-up layers get their `exit` hook; active layers are not deactivated first.
    /// Requests issued by those hooks are discarded. Calling this again does nothing.
    pub fn exit(&mut self) {
        let subscribed = self.subscribed;
        self.unsubscribe(subscribed);
        for id in self.order() {
            if self.flags_of(id).is_some_and(LayerFlags::is_setup) {
                self.invoke(id, None, |layer, cx| layer.exit(cx));
                self.outbox.clear();
            }
            self.remove(id);
        }
    }

    // --- host events ---

    /// Handle one host event.
    ///
    /// Events on topics the manager is not subscribed to are ignored. Frame events run
    /// [`update`](Self::update), [`draw`](Self::draw), or [`exit`](Self::exit). Input and
    /// platform events go to the layers the profile's [`Audience`] selects.
    ///
    /// Returns the answer of the responding layer for [`Audience::FirstActive`] events,
    /// `false` when no layer is active, and `false` for every other event.
    pub fn handle_event(&mut self, event: &HostEvent) -> bool {
        if !self.subscribed.intersects(event.topic()) {
            return false;
        }
        match event {
            HostEvent::Update => self.update(),
            HostEvent::Draw => self.draw(),
            HostEvent::Exit => self.exit(),
            _ => {
                if let Some(audience) = self.profile.audience(event) {
                    return self.dispatch(event, audience);
                }
            }
        }
        false
    }

    fn dispatch(&mut self, event: &HostEvent, audience: Audience) -> bool {
        for id in self.order() {
            let Some(flags) = self.flags_of(id) else {
                continue;
            };
            let eligible = match audience {
                Audience::Active | Audience::FirstActive => flags.is_active(),
                Audience::Setup => flags.is_setup(),
            };
            if !eligible {
                continue;
            }
            let answer = self
                .invoke(id, None, |layer, cx| deliver(layer, event, cx))
                .unwrap_or(false);
            self.pump();
            if audience == Audience::FirstActive {
                return answer;
            }
        }
        false
    }
}

impl<D, S: EventSource> Drop for LayerManager<D, S> {
    fn drop(&mut self) {
        self.exit();
    }
}

fn deliver<D>(layer: &mut dyn Layer<D>, event: &HostEvent, cx: &mut Context<'_, D>) -> bool {
    match event {
        HostEvent::Touch(e) => layer.touch(e, cx),
        HostEvent::Pointer(e) => layer.pointer(e, cx),
        HostEvent::Key(e) => layer.key(e, cx),
        HostEvent::WindowResized(size) => layer.window_resized(*size, cx),
        HostEvent::Lifecycle(e) => return layer.lifecycle(e, cx),
        HostEvent::Update | HostEvent::Draw | HostEvent::Exit => {}
    }
    false
}
