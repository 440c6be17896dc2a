//! Event domain models

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mongodb::bson::{self, Bson, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::HashSet;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{EventError, EventResult};

/// Message reported when any required create field is absent or blank.
pub const MISSING_FIELDS: &str = "Missing required fields";
/// Message reported when `eventDate` is not after today.
pub const PAST_DATE: &str = "Event date must be a future date";
/// Message reported when `eventDate` cannot be parsed.
pub const INVALID_DATE: &str = "Invalid event date";
/// Message reported when a join request has no email.
pub const MISSING_EMAIL: &str = "User email is required";

/// `eventType` value that disables type filtering.
pub const ALL_EVENT_TYPES: &str = "All";

/// A social event as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-generated identifier (24-character hex ObjectId)
    #[serde(rename = "_id")]
    #[schema(example = "6650f0c2a1b2c3d4e5f60718")]
    pub id: String,

    #[schema(example = "Rust Meetup")]
    pub title: String,

    pub description: String,

    #[schema(example = "Social")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    pub location: String,

    pub event_date: DateTime<Utc>,

    #[schema(example = "host@example.com")]
    pub creator_email: String,

    /// Emails of users who joined, in join order, without duplicates
    #[serde(default)]
    pub joined_users: Vec<String>,
}

/// Stored shape of an event in the `events` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub location: String,
    /// Older documents hold the date as the client's raw string.
    #[serde(deserialize_with = "deserialize_stored_date")]
    pub event_date: bson::DateTime,
    #[serde(default)]
    pub creator_email: String,
    #[serde(default)]
    pub joined_users: Vec<String>,
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: doc.title,
            description: doc.description,
            event_type: doc.event_type,
            thumbnail: doc.thumbnail,
            location: doc.location,
            event_date: from_bson_datetime(doc.event_date),
            creator_email: doc.creator_email,
            joined_users: doc.joined_users,
        }
    }
}

/// A validated event ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub thumbnail: Option<String>,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub creator_email: String,
    pub joined_users: Vec<String>,
}

impl From<NewEvent> for EventDocument {
    fn from(event: NewEvent) -> Self {
        Self {
            id: None,
            title: event.title,
            description: event.description,
            event_type: event.event_type,
            thumbnail: event.thumbnail,
            location: event.location,
            event_date: to_bson_datetime(event.event_date),
            creator_email: event.creator_email,
            joined_users: event.joined_users,
        }
    }
}

/// Request body for creating an event.
///
/// Required fields are optional at the type level so that a missing field
/// surfaces as a validation error instead of a JSON parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, message = "Missing required fields")
    )]
    #[schema(example = "Rust Meetup")]
    pub title: Option<String>,

    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, message = "Missing required fields")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, message = "Missing required fields")
    )]
    #[schema(example = "Social")]
    pub event_type: Option<String>,

    pub thumbnail: Option<String>,

    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, message = "Missing required fields")
    )]
    pub location: Option<String>,

    /// RFC 3339 timestamp or `YYYY-MM-DD`; must fall after today (UTC)
    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, message = "Missing required fields")
    )]
    #[schema(example = "2030-05-01T18:00:00Z")]
    pub event_date: Option<String>,

    #[validate(
        required(message = "Missing required fields"),
        length(min = 1, message = "Missing required fields")
    )]
    #[schema(example = "host@example.com")]
    pub creator_email: Option<String>,

    pub joined_users: Option<Vec<String>>,
}

impl CreateEvent {
    /// Checks required fields, then the date, and builds the insertable
    /// event. `now` decides what "today" is.
    pub fn into_new_event(self, now: DateTime<Utc>) -> EventResult<NewEvent> {
        let title = required(self.title)?;
        let description = required(self.description)?;
        let event_type = required(self.event_type)?;
        let location = required(self.location)?;
        let raw_date = required(self.event_date)?;
        let creator_email = required(self.creator_email)?;

        let event_date = parse_event_date(&raw_date).ok_or_else(|| EventError::Validation {
            message: INVALID_DATE.to_string(),
        })?;
        if !is_future_date(event_date, now) {
            return Err(EventError::Validation {
                message: PAST_DATE.to_string(),
            });
        }

        Ok(NewEvent {
            title,
            description,
            event_type,
            thumbnail: self.thumbnail,
            location,
            event_date,
            creator_email,
            joined_users: dedup_emails(self.joined_users.unwrap_or_default()),
        })
    }
}

fn required(value: Option<String>) -> EventResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EventError::Validation {
            message: MISSING_FIELDS.to_string(),
        })
}

/// Request body for a partial update.
///
/// Only the fields present are written. Anything else in the body,
/// including `_id`, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub thumbnail: Option<String>,
    pub location: Option<String>,
    /// Parsed like the create date; not required to be in the future
    pub event_date: Option<String>,
    pub creator_email: Option<String>,
    pub joined_users: Option<Vec<String>>,
}

impl UpdateEvent {
    pub fn into_changes(self) -> EventResult<EventChanges> {
        let event_date = self
            .event_date
            .map(|raw| {
                parse_event_date(&raw).ok_or_else(|| EventError::Validation {
                    message: INVALID_DATE.to_string(),
                })
            })
            .transpose()?;

        Ok(EventChanges {
            title: self.title,
            description: self.description,
            event_type: self.event_type,
            thumbnail: self.thumbnail,
            location: self.location,
            event_date,
            creator_email: self.creator_email,
            joined_users: self.joined_users.map(dedup_emails),
        })
    }
}

/// Parsed field changes for an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub thumbnail: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub creator_email: Option<String>,
    pub joined_users: Option<Vec<String>>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Request body for joining an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinEvent {
    #[validate(
        required(message = "User email is required"),
        length(min = 1, message = "User email is required")
    )]
    #[schema(example = "guest@example.com")]
    pub user_email: Option<String>,
}

/// Query parameters for listing events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    /// Exact event type; `All` or empty disables the filter
    pub event_type: Option<String>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    /// `true` keeps only events at or after the current instant
    pub upcoming: Option<String>,
}

impl EventFilter {
    /// The type to match, if type filtering applies.
    pub fn event_type(&self) -> Option<&str> {
        self.event_type
            .as_deref()
            .filter(|t| !t.is_empty() && *t != ALL_EVENT_TYPES)
    }

    /// The title search term, if non-empty.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Only the literal string `true` enables the upcoming filter.
    pub fn is_upcoming(&self) -> bool {
        self.upcoming.as_deref() == Some("true")
    }
}

/// Acknowledgment returned after inserting an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[schema(example = "6650f0c2a1b2c3d4e5f60718")]
    pub inserted_id: String,
}

/// Acknowledgment returned after a delete, whether or not anything matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Offset-less forms taken as UTC, as sent by `datetime-local` inputs.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses an RFC 3339 timestamp, an offset-less date-time (UTC), or a
/// `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn deserialize_stored_date<'de, D>(deserializer: D) -> Result<bson::DateTime, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::DateTime(dt) => Ok(dt),
        Bson::String(raw) => parse_event_date(&raw)
            .map(to_bson_datetime)
            .ok_or_else(|| de::Error::custom(format!("unparseable eventDate {raw:?}"))),
        other => Err(de::Error::custom(format!(
            "eventDate has unsupported type {:?}",
            other.element_type()
        ))),
    }
}

/// True when `date` falls on a later UTC calendar day than `now`.
pub fn is_future_date(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date.date_naive() > now.date_naive()
}

/// Drops repeated emails, keeping the first occurrence of each.
pub fn dedup_emails(emails: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

pub(crate) fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

pub(crate) fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
