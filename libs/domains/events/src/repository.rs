use async_trait::async_trait;

use crate::error::EventResult;
use crate::models::{DeleteAck, Event, EventChanges, EventFilter, InsertAck, NewEvent};

/// Storage operations for events.
///
/// Ids are passed as the client supplied them; implementations reject ids
/// they cannot parse with a `Database` error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events matching `filter`, ascending by `eventDate`.
    async fn list(&self, filter: &EventFilter) -> EventResult<Vec<Event>>;

    async fn create(&self, event: NewEvent) -> EventResult<InsertAck>;

    async fn get_by_id(&self, id: &str) -> EventResult<Option<Event>>;

    /// Adds `user_email` to `joinedUsers` if absent. Returns whether an
    /// event matched `id`.
    async fn join(&self, id: &str, user_email: &str) -> EventResult<bool>;

    /// Writes the supplied fields. Returns whether an event matched `id`.
    async fn update(&self, id: &str, changes: EventChanges) -> EventResult<bool>;

    async fn delete(&self, id: &str) -> EventResult<DeleteAck>;

    async fn create_indexes(&self) -> EventResult<()>;
}
