//! Topic-based event bus announcing client state changes.
//!
//! Frontends subscribe to the topics they render and rebuild view models on
//! each event. Delivery is best-effort: with no subscribers an event is
//! dropped, and a lagging subscriber skips ahead.

use client_blockchain_core::TransactionHash;
use client_indexer::{QueryObserver, QueryUpdate};
use survivor_core::AdventurerId;
use tokio::sync::broadcast;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Read-model query results
    Query,
    /// Batch submission lifecycle
    Transaction,
    /// Adventurer selection and wallet connection
    Session,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEvent {
    Submitted {
        hash: TransactionHash,
        label: String,
        calls: usize,
    },
    Confirmed {
        hash: TransactionHash,
    },
    Failed {
        hash: Option<TransactionHash>,
        reason: String,
    },
    /// A confirmed batch left the adventurer dead.
    AdventurerDied {
        adventurer_id: AdventurerId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    AdventurerSelected(AdventurerId),
    /// The active adventurer was replaced from the read model.
    AdventurerUpdated(AdventurerId),
    Disconnected,
}

/// Event wrapper that carries the topic and typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Query(QueryUpdate),
    Transaction(TransactionEvent),
    Session(SessionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Query(_) => Topic::Query,
            Event::Transaction(_) => Topic::Transaction,
            Event::Session(_) => Topic::Session,
        }
    }
}

/// Topic-based event bus.
#[derive(Clone)]
pub struct EventBus {
    query: broadcast::Sender<Event>,
    transaction: broadcast::Sender<Event>,
    session: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            query: broadcast::channel(capacity).0,
            transaction: broadcast::channel(capacity).0,
            session: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Query => &self.query,
            Topic::Transaction => &self.transaction,
            Topic::Session => &self.session,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryObserver for EventBus {
    fn on_update(&self, update: &QueryUpdate) {
        self.publish(Event::Query(update.clone()));
    }
}

#[cfg(test)]
mod tests {
    use client_indexer::{ApplyOutcome, QueryKind};

    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut session = bus.subscribe(Topic::Session);
        let mut query = bus.subscribe(Topic::Query);

        bus.on_update(&QueryUpdate {
            kind: QueryKind::BeastById,
            generation: 0,
            outcome: ApplyOutcome::Updated,
            error: None,
        });
        bus.publish(Event::Session(SessionEvent::Disconnected));

        assert_eq!(
            session.recv().await.unwrap(),
            Event::Session(SessionEvent::Disconnected)
        );
        assert!(matches!(query.recv().await.unwrap(), Event::Query(_)));
        assert!(query.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(1);
        bus.publish(Event::Transaction(TransactionEvent::Failed {
            hash: None,
            reason: "offline".into(),
        }));
    }
}
