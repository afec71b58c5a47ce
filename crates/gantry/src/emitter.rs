//! Typed publish/subscribe registry for drag lifecycle events.
//!
//! Emission is synchronous, single-threaded fan-out: every listener
//! registered for the event's kind runs, in registration order, before
//! [`EventEmitter::emit`] returns. Listener panics are not caught; they
//! unwind to whoever fed the triggering input, matching normal call-stack
//! semantics.

use gantry_core::tree::ElementId;

/// Closed catalogue of event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Cloned,
    Drag,
    DragEnd,
    Drop,
    Cancel,
    Remove,
    Shadow,
    Over,
    Out,
}

impl EventKind {
    /// All kinds, in catalogue order. Handy for recorders.
    pub const ALL: [EventKind; 9] = [
        EventKind::Cloned,
        EventKind::Drag,
        EventKind::DragEnd,
        EventKind::Drop,
        EventKind::Cancel,
        EventKind::Remove,
        EventKind::Shadow,
        EventKind::Over,
        EventKind::Out,
    ];
}

/// What a clone stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneKind {
    /// The floating visual that follows the pointer.
    Mirror,
    /// A duplicate that becomes the actual moving object.
    Copy,
}

/// A drag lifecycle event with its fixed argument contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// An element was cloned, either as the mirror or as a copy.
    Cloned {
        clone: ElementId,
        original: ElementId,
        kind: CloneKind,
    },
    /// A drag started. `item` is always the untouched original.
    Drag { item: ElementId, source: ElementId },
    /// The session ended, whatever the outcome. Always the last event.
    DragEnd { item: ElementId },
    /// The moving item was committed to `target`.
    Drop {
        item: ElementId,
        target: ElementId,
        source: ElementId,
        sibling: Option<ElementId>,
    },
    /// The drag was called off. `container` is `None` only when an
    /// unplaced copy was discarded.
    Cancel {
        item: ElementId,
        container: Option<ElementId>,
    },
    /// A real item was removed from the tree.
    Remove {
        item: ElementId,
        container: ElementId,
    },
    /// Insertion-point preview: the moving item was relocated while the
    /// drag is still in flight.
    Shadow {
        item: ElementId,
        container: ElementId,
        source: ElementId,
    },
    /// The pointer entered a prospective drop container.
    Over {
        item: ElementId,
        container: ElementId,
        source: ElementId,
    },
    /// The pointer left the container it was previously over.
    Out {
        item: ElementId,
        container: ElementId,
        source: ElementId,
    },
}

impl DragEvent {
    /// The catalogue name of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            DragEvent::Cloned { .. } => EventKind::Cloned,
            DragEvent::Drag { .. } => EventKind::Drag,
            DragEvent::DragEnd { .. } => EventKind::DragEnd,
            DragEvent::Drop { .. } => EventKind::Drop,
            DragEvent::Cancel { .. } => EventKind::Cancel,
            DragEvent::Remove { .. } => EventKind::Remove,
            DragEvent::Shadow { .. } => EventKind::Shadow,
            DragEvent::Over { .. } => EventKind::Over,
            DragEvent::Out { .. } => EventKind::Out,
        }
    }
}

/// Subscription handle returned by [`EventEmitter::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    kind: EventKind,
    callback: Box<dyn FnMut(&DragEvent)>,
}

/// Listener registry with synchronous fan-out.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<ListenerEntry>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind. Listeners for the same
    /// kind run in registration order.
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&DragEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Unregister a listener. Returns false if the id was unknown.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invoke all listeners registered for the event's kind before
    /// returning.
    pub fn emit(&mut self, event: &DragEvent) {
        tracing::trace!(kind = ?event.kind(), "emit");
        let kind = event.kind();
        for entry in &mut self.listeners {
            if entry.kind == kind {
                (entry.callback)(event);
            }
        }
    }
}
