//! In-process publish/subscribe over the workspace signals.
//!
//! Delivery is synchronous: `publish` returns only after every subscriber
//! registered before the call has seen the event, in registration order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "kebab-case")]
pub enum DocumentEvent {
    DocumentCreated {
        #[serde(rename = "documentId")]
        document_id: String,
    },
    DocumentDeleted {
        #[serde(rename = "documentId")]
        document_id: String,
    },
    DocumentTitleChanged {
        #[serde(rename = "documentId")]
        document_id: String,
        title: String,
    },
    DocumentContentChanged {
        #[serde(rename = "documentId")]
        document_id: String,
    },
    DocumentSwitched {
        #[serde(rename = "documentId")]
        document_id: String,
    },
    FileSystemUpdated,
    DocumentsUpdated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    DocumentCreated,
    DocumentDeleted,
    DocumentTitleChanged,
    DocumentContentChanged,
    DocumentSwitched,
    FileSystemUpdated,
    DocumentsUpdated,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::DocumentCreated,
        EventKind::DocumentDeleted,
        EventKind::DocumentTitleChanged,
        EventKind::DocumentContentChanged,
        EventKind::DocumentSwitched,
        EventKind::FileSystemUpdated,
        EventKind::DocumentsUpdated,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::DocumentCreated => "document-created",
            EventKind::DocumentDeleted => "document-deleted",
            EventKind::DocumentTitleChanged => "document-title-changed",
            EventKind::DocumentContentChanged => "document-content-changed",
            EventKind::DocumentSwitched => "document-switched",
            EventKind::FileSystemUpdated => "file-system-updated",
            EventKind::DocumentsUpdated => "documents-updated",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl DocumentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DocumentEvent::DocumentCreated { .. } => EventKind::DocumentCreated,
            DocumentEvent::DocumentDeleted { .. } => EventKind::DocumentDeleted,
            DocumentEvent::DocumentTitleChanged { .. } => EventKind::DocumentTitleChanged,
            DocumentEvent::DocumentContentChanged { .. } => EventKind::DocumentContentChanged,
            DocumentEvent::DocumentSwitched { .. } => EventKind::DocumentSwitched,
            DocumentEvent::FileSystemUpdated => EventKind::FileSystemUpdated,
            DocumentEvent::DocumentsUpdated => EventKind::DocumentsUpdated,
        }
    }

    pub fn document_id(&self) -> Option<&str> {
        match self {
            DocumentEvent::DocumentCreated { document_id }
            | DocumentEvent::DocumentDeleted { document_id }
            | DocumentEvent::DocumentTitleChanged { document_id, .. }
            | DocumentEvent::DocumentContentChanged { document_id }
            | DocumentEvent::DocumentSwitched { document_id } => Some(document_id),
            DocumentEvent::FileSystemUpdated | DocumentEvent::DocumentsUpdated => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum Sink {
    Callback(Box<dyn FnMut(&DocumentEvent)>),
    Channel(Sender<DocumentEvent>),
}

struct Subscriber {
    id: SubscriptionId,
    filter: Option<EventKind>,
    sink: Sink,
}

impl Subscriber {
    fn wants(&self, kind: EventKind) -> bool {
        self.filter.map_or(true, |f| f == kind)
    }
}

/// Receiving half of a channel subscription.
pub struct EventReceiver {
    rx: Receiver<DocumentEvent>,
}

impl EventReceiver {
    pub fn try_recv(&mut self) -> Result<DocumentEvent, TryRecvError> {
        self.rx.try_recv()
    }

    /// Everything published since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<DocumentEvent> {
        self.rx.try_iter().collect()
    }
}

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, filter: Option<EventKind>, sink: Sink) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push(Subscriber { id, filter, sink });
        id
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&DocumentEvent) + 'static,
    ) -> SubscriptionId {
        self.push(Some(kind), Sink::Callback(Box::new(callback)))
    }

    pub fn subscribe_all(
        &mut self,
        callback: impl FnMut(&DocumentEvent) + 'static,
    ) -> SubscriptionId {
        self.push(None, Sink::Callback(Box::new(callback)))
    }

    /// Queue-backed subscription; `None` receives every signal.
    pub fn channel(&mut self, kind: Option<EventKind>) -> (SubscriptionId, EventReceiver) {
        let (tx, rx) = mpsc::channel();
        let id = self.push(kind, Sink::Channel(tx));
        (id, EventReceiver { rx })
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, event: DocumentEvent) {
        let kind = event.kind();
        tracing::debug!(event = %kind, "publish");

        let mut closed = Vec::new();
        for subscriber in self.subscribers.iter_mut().filter(|s| s.wants(kind)) {
            match &mut subscriber.sink {
                Sink::Callback(callback) => callback(&event),
                Sink::Channel(tx) => {
                    if tx.send(event.clone()).is_err() {
                        closed.push(subscriber.id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            tracing::debug!(count = closed.len(), "dropping closed event channels");
            self.subscribers.retain(|s| !closed.contains(&s.id));
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/bus.rs"]
mod tests;
