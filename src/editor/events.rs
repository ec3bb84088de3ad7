// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Change notifications for the host.
//!
//! Handlers subscribe by event name and are called synchronously, in
//! subscription order, after the mutation they describe has been applied.

use crate::model::{EditorFeature, FeatureId, Position};
use crate::modes::ModeId;

/// Names handlers can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ModeChange,
    Create,
    Update,
    Delete,
    SelectionChange,
    Undo,
    Redo,
    DrawChange,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::ModeChange,
        EventKind::Create,
        EventKind::Update,
        EventKind::Delete,
        EventKind::SelectionChange,
        EventKind::Undo,
        EventKind::Redo,
        EventKind::DrawChange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::ModeChange => "mode.change",
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
            EventKind::SelectionChange => "selection.change",
            EventKind::Undo => "undo",
            EventKind::Redo => "redo",
            EventKind::DrawChange => "draw.change",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A change notification
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ModeChange { mode: ModeId, previous: ModeId },
    Create { features: Vec<EditorFeature> },
    Update { features: Vec<EditorFeature> },
    Delete { features: Vec<EditorFeature> },
    SelectionChange { selected: Vec<FeatureId> },
    Undo { features: Vec<EditorFeature> },
    Redo { features: Vec<EditorFeature> },
    /// The in-progress drawing changed; `vertices` placed so far
    DrawChange { vertices: Vec<Position> },
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::ModeChange { .. } => EventKind::ModeChange,
            EditorEvent::Create { .. } => EventKind::Create,
            EditorEvent::Update { .. } => EventKind::Update,
            EditorEvent::Delete { .. } => EventKind::Delete,
            EditorEvent::SelectionChange { .. } => EventKind::SelectionChange,
            EditorEvent::Undo { .. } => EventKind::Undo,
            EditorEvent::Redo { .. } => EventKind::Redo,
            EditorEvent::DrawChange { .. } => EventKind::DrawChange,
        }
    }
}

/// Handle returned by [`EventBus::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler = Box<dyn FnMut(&EditorEvent)>;

#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(SubscriptionId, EventKind, Handler)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event by name; `None` for unknown names
    pub fn on(
        &mut self,
        name: &str,
        handler: impl FnMut(&EditorEvent) + 'static,
    ) -> Option<SubscriptionId> {
        let Some(kind) = EventKind::from_name(name) else {
            tracing::debug!("[events] ignoring subscription to unknown event '{name}'");
            return None;
        };
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, kind, Box::new(handler)));
        Some(id)
    }

    /// Unsubscribe; returns false if the id was not subscribed
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, ..)| *sub != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent) {
        let kind = event.kind();
        tracing::debug!("[events] emit {}", kind.name());
        for (_, subscribed, handler) in &mut self.handlers {
            if *subscribed == kind {
                handler(&event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
