//! Events Domain
//!
//! Social events stored in MongoDB: list, create, fetch, join, update and
//! delete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints under /events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, error context, metrics
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB and "not connected" implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Stored document, API schemas
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{EventService, MongoEventRepository, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("Social-events");
//!
//! let service = EventService::new(MongoEventRepository::new(&db));
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod unavailable;

pub use error::{EVENT_NOT_FOUND, EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateEvent, DeleteAck, Event, EventChanges, EventFilter, InsertAck, JoinEvent, NewEvent,
    SuccessResponse, UpdateEvent,
};
pub use crate::mongodb::{EVENTS_COLLECTION, MongoEventRepository};
pub use repository::EventRepository;
pub use service::EventService;
pub use unavailable::{NOT_CONNECTED, UnavailableEventRepository};
