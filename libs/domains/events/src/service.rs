//! Event Service - Business logic layer

use chrono::Utc;
use observability::EventMetrics;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{
    CreateEvent, DeleteAck, Event, EventFilter, InsertAck, JoinEvent, MISSING_EMAIL,
    SuccessResponse, UpdateEvent,
};
use crate::repository::EventRepository;

/// Event service: validates input, calls the repository once per operation
/// and attaches operation context to store failures.
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let result = self
            .repository
            .list(&filter)
            .await
            .map_err(|e| e.context("Failed to load events"));
        record("list", &result);
        result
    }

    #[instrument(skip(self, input))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<InsertAck> {
        let result = self.try_create(input).await;
        record("create", &result);
        if let Ok(ack) = &result {
            info!(event_id = %ack.inserted_id, "Event created");
        }
        result
    }

    async fn try_create(&self, input: CreateEvent) -> EventResult<InsertAck> {
        input.validate()?;
        let event = input.into_new_event(Utc::now())?;
        self.repository
            .create(event)
            .await
            .map_err(|e| e.context("Failed to create event"))
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str) -> EventResult<Event> {
        let result = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context("Failed to fetch event"))
            .and_then(|found| found.ok_or_else(|| not_found(id)));
        record("get", &result);
        result
    }

    #[instrument(skip(self, input))]
    pub async fn join_event(&self, id: &str, input: JoinEvent) -> EventResult<SuccessResponse> {
        let result = self.try_join(id, input).await;
        record("join", &result);
        if result.is_ok() {
            EventMetrics::record_join();
        }
        result
    }

    async fn try_join(&self, id: &str, input: JoinEvent) -> EventResult<SuccessResponse> {
        input.validate()?;
        let user_email = input
            .user_email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| EventError::Validation {
                message: MISSING_EMAIL.to_string(),
            })?;

        let matched = self
            .repository
            .join(id, &user_email)
            .await
            .map_err(|e| e.context("Failed to join event"))?;

        if !matched {
            return Err(not_found(id));
        }
        Ok(SuccessResponse::ok())
    }

    /// Applies the supplied fields. An empty update writes nothing but
    /// still reports unknown ids.
    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: &str, input: UpdateEvent) -> EventResult<SuccessResponse> {
        let result = self.try_update(id, input).await;
        record("update", &result);
        result
    }

    async fn try_update(&self, id: &str, input: UpdateEvent) -> EventResult<SuccessResponse> {
        let changes = input.into_changes()?;

        let matched = if changes.is_empty() {
            self.repository
                .get_by_id(id)
                .await
                .map(|found| found.is_some())
        } else {
            self.repository.update(id, changes).await
        }
        .map_err(|e| e.context("Failed to update event"))?;

        if !matched {
            return Err(not_found(id));
        }
        Ok(SuccessResponse::ok())
    }

    /// Deletes by id. A missing event is not an error; the ack carries
    /// `deletedCount: 0`.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: &str) -> EventResult<DeleteAck> {
        let result = self
            .repository
            .delete(id)
            .await
            .map_err(|e| e.context("Failed to delete event"));
        record("delete", &result);
        if let Ok(ack) = &result {
            if ack.deleted_count == 0 {
                info!(event_id = %id, "Delete matched no event");
            }
        }
        result
    }

    /// Creates store indexes. Failures are logged and returned for the
    /// caller to decide on.
    pub async fn init_indexes(&self) -> EventResult<()> {
        self.repository
            .create_indexes()
            .await
            .map_err(|e| e.context("Failed to create event indexes"))
            .inspect(|_| info!("Event indexes ensured"))
            .inspect_err(|e| warn!(error = %e, "Event index creation failed"))
    }
}

fn not_found(id: &str) -> EventError {
    EventError::NotFound { id: id.to_string() }
}

fn record<T>(operation: &'static str, result: &EventResult<T>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(EventError::NotFound { .. }) => "not_found",
        Err(EventError::Validation { .. }) => "invalid",
        Err(EventError::Database { message, details }) => {
            warn!(operation, details = %details, "{}", message);
            "error"
        }
    };
    EventMetrics::record_operation(operation, outcome);
}
