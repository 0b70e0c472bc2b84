//! Session change notifications.
//!
//! The session facade broadcasts a [`SessionEvent`] whenever the
//! authenticated state or the selected organization changes. Pages
//! subscribe and re-fetch on [`SessionEvent::OrganizationChanged`]
//! instead of polling.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::{SessionError, SessionResult};

/// A change to the session worth reacting to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A user signed in and the session is hydrated.
    SignedIn,

    /// The session ended, explicitly or from a failed restore/refresh.
    SignedOut,

    /// The membership list was re-fetched in place.
    MembershipsRefreshed,

    /// The selected organization changed.
    OrganizationChanged {
        /// The newly selected organization, `None` when nothing is
        /// selected any more.
        organization_id: Option<String>,
    },
}

/// Subscription handle for receiving session events.
pub struct SessionEvents {
    /// Subscription id.
    pub id: String,

    receiver: broadcast::Receiver<SessionEvent>,
}

impl SessionEvents {
    /// Receive the next event.
    ///
    /// # Errors
    ///
    /// [`SessionError::ChannelClosed`] when the session context has been
    /// dropped.
    pub async fn recv(&mut self) -> SessionResult<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Ok(event),
                // A lagged subscriber skips to the oldest retained event.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(SessionError::ChannelClosed)
                }
            }
        }
    }
}

/// Broadcast side of the event channel, owned by the session context.
pub(crate) struct EventBroadcaster {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBroadcaster {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. No subscribers is fine.
    pub(crate) fn emit(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }

    pub(crate) fn subscribe(&self) -> SessionEvents {
        SessionEvents {
            id: uuid::Uuid::now_v7().to_string(),
            receiver: self.sender.subscribe(),
        }
    }
}
