//! Repository used when the store could not be reached at startup.
//!
//! Every call fails with a `Database` error so that each request reports the
//! outage on its own, while routes that do not touch the store keep working.

use async_trait::async_trait;

use crate::error::{EventError, EventResult};
use crate::models::{DeleteAck, Event, EventChanges, EventFilter, InsertAck, NewEvent};
use crate::repository::EventRepository;

pub const NOT_CONNECTED: &str = "MongoDB is not connected";

#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEventRepository;

fn not_connected<T>() -> EventResult<T> {
    Err(EventError::database(NOT_CONNECTED))
}

#[async_trait]
impl EventRepository for UnavailableEventRepository {
    async fn list(&self, _filter: &EventFilter) -> EventResult<Vec<Event>> {
        not_connected()
    }

    async fn create(&self, _event: NewEvent) -> EventResult<InsertAck> {
        not_connected()
    }

    async fn get_by_id(&self, _id: &str) -> EventResult<Option<Event>> {
        not_connected()
    }

    async fn join(&self, _id: &str, _user_email: &str) -> EventResult<bool> {
        not_connected()
    }

    async fn update(&self, _id: &str, _changes: EventChanges) -> EventResult<bool> {
        not_connected()
    }

    async fn delete(&self, _id: &str) -> EventResult<DeleteAck> {
        not_connected()
    }

    async fn create_indexes(&self) -> EventResult<()> {
        not_connected()
    }
}
