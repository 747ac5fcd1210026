//! Event types for PetalSonic AL

use crate::context::{BufferId, ObjectId, SourceId};

/// Lifecycle notifications queued by an [`AlContext`](crate::AlContext) and
/// drained with [`poll_events`](crate::AlContext::poll_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlEvent {
    BufferCreated {
        buffer_id: BufferId,
    },
    BufferWritten {
        buffer_id: BufferId,
        size: usize,
    },
    SourceCreated {
        source_id: SourceId,
    },
    SourceStarted {
        source_id: SourceId,
        buffer_id: BufferId,
    },
    SourceStopped {
        source_id: SourceId,
    },
    ObjectReleased {
        object: ObjectId,
    },
}

impl AlEvent {
    /// The object the event is about.
    pub fn object(&self) -> ObjectId {
        match self {
            Self::BufferCreated { buffer_id } | Self::BufferWritten { buffer_id, .. } => {
                ObjectId::Buffer(*buffer_id)
            }
            Self::SourceCreated { source_id }
            | Self::SourceStarted { source_id, .. }
            | Self::SourceStopped { source_id } => ObjectId::Source(*source_id),
            Self::ObjectReleased { object } => *object,
        }
    }

    pub fn is_playback_event(&self) -> bool {
        matches!(self, Self::SourceStarted { .. } | Self::SourceStopped { .. })
    }
}
