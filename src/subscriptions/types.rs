//! Subscription types for store change notifications.

use crate::types::Student;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Which event kinds a subscriber receives.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Include `Added`, `Updated` and `Deleted` events.
    pub include_changes: bool,

    /// Include `Restored` events.
    pub include_restores: bool,

    /// Only events for these student ids (None = all).
    pub student_ids: Option<Vec<String>>,
}

impl SubscriptionFilter {
    /// Subscribe to record changes only.
    pub fn changes() -> Self {
        Self {
            include_changes: true,
            ..Default::default()
        }
    }

    /// Subscribe to changes of specific students.
    pub fn students(ids: Vec<String>) -> Self {
        Self {
            include_changes: true,
            student_ids: Some(ids),
            ..Default::default()
        }
    }

    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            include_changes: true,
            include_restores: true,
            student_ids: None,
        }
    }
}

/// Events emitted to subscribers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A student was added.
    Added { student: Student },

    /// A student's mutable fields were replaced.
    Updated { student: Student },

    /// A student was removed.
    Deleted { student_id: String },

    /// The collection was reloaded from storage.
    Restored { count: usize },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl StoreEvent {
    /// The student this event concerns, if any.
    pub fn student_id(&self) -> Option<&str> {
        match self {
            StoreEvent::Added { student } | StoreEvent::Updated { student } => {
                Some(student.student_id.as_str())
            }
            StoreEvent::Deleted { student_id } => Some(student_id.as_str()),
            _ => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to receive events for a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl SubscriptionHandle {
    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every event currently buffered.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }
}
