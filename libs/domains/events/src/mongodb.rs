//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Collection, Database, IndexModel};
use tracing::{debug, instrument};

use crate::error::EventResult;
use crate::models::{
    DeleteAck, Event, EventChanges, EventDocument, EventFilter, InsertAck, NewEvent,
    to_bson_datetime,
};
use crate::repository::EventRepository;

/// Default collection name for events.
pub const EVENTS_COLLECTION: &str = "events";

#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoEventRepository::new(&client.database("Social-events"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, EVENTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<EventDocument> {
        &self.collection
    }

    /// Build a MongoDB filter document from EventFilter. `now` bounds the
    /// upcoming filter.
    pub(crate) fn build_filter(filter: &EventFilter, now: DateTime<Utc>) -> Document {
        let mut doc = Document::new();

        if let Some(event_type) = filter.event_type() {
            doc.insert("eventType", event_type);
        }

        if let Some(search) = filter.search() {
            doc.insert(
                "title",
                doc! { "$regex": regex::escape(search), "$options": "i" },
            );
        }

        // Legacy documents store the date as an ISO string, compared lexically.
        if filter.is_upcoming() {
            doc.insert(
                "$or",
                vec![
                    doc! { "eventDate": { "$gte": to_bson_datetime(now) } },
                    doc! { "eventDate": {
                        "$type": "string",
                        "$gte": now.to_rfc3339_opts(SecondsFormat::Millis, true),
                    } },
                ],
            );
        }

        doc
    }

    /// Build the `$set` body for an update. Absent fields are left out.
    pub(crate) fn build_set(changes: &EventChanges) -> Document {
        let mut set = Document::new();

        let text_fields = [
            ("title", &changes.title),
            ("description", &changes.description),
            ("eventType", &changes.event_type),
            ("thumbnail", &changes.thumbnail),
            ("location", &changes.location),
            ("creatorEmail", &changes.creator_email),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                set.insert(key, value.as_str());
            }
        }

        if let Some(date) = changes.event_date {
            set.insert("eventDate", to_bson_datetime(date));
        }
        if let Some(users) = &changes.joined_users {
            set.insert("joinedUsers", users.clone());
        }

        set
    }

    fn by_id(id: &str) -> EventResult<Document> {
        let oid = ObjectId::parse_str(id)?;
        Ok(doc! { "_id": oid })
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &EventFilter) -> EventResult<Vec<Event>> {
        let query = Self::build_filter(filter, Utc::now());
        debug!(?query, "Listing events");

        let cursor = self
            .collection
            .find(query)
            .sort(doc! { "eventDate": 1 })
            .await?;
        let docs: Vec<EventDocument> = cursor.try_collect().await?;
        let mut events: Vec<Event> = docs.into_iter().map(Event::from).collect();
        // The store orders string dates before BSON dates.
        events.sort_by_key(|event| event.event_date);
        Ok(events)
    }

    #[instrument(skip(self, event), fields(title = %event.title))]
    async fn create(&self, event: NewEvent) -> EventResult<InsertAck> {
        let result = self.collection.insert_one(EventDocument::from(event)).await?;
        let inserted_id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };
        Ok(InsertAck {
            acknowledged: true,
            inserted_id,
        })
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> EventResult<Option<Event>> {
        let found = self.collection.find_one(Self::by_id(id)?).await?;
        Ok(found.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn join(&self, id: &str, user_email: &str) -> EventResult<bool> {
        let result = self
            .collection
            .update_one(
                Self::by_id(id)?,
                doc! { "$addToSet": { "joinedUsers": user_email } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: &str, changes: EventChanges) -> EventResult<bool> {
        let filter = Self::by_id(id)?;
        let set = Self::build_set(&changes);

        if set.is_empty() {
            let found = self.collection.find_one(filter).await?;
            return Ok(found.is_some());
        }

        let result = self
            .collection
            .update_one(filter, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> EventResult<DeleteAck> {
        let result = self.collection.delete_one(Self::by_id(id)?).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            // Sort key and upcoming filter
            IndexModel::builder().keys(doc! { "eventDate": 1 }).build(),
            IndexModel::builder().keys(doc! { "eventType": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }
}
