use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{
    CreateEvent, DeleteAck, Event, EventFilter, InsertAck, JoinEvent, SuccessResponse, UpdateEvent,
};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        join_event,
        update_event,
        delete_event,
    ),
    components(
        schemas(
            Event,
            CreateEvent,
            UpdateEvent,
            JoinEvent,
            EventFilter,
            InsertAck,
            DeleteAck,
            SuccessResponse
        ),
        responses(BadRequestResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Events", description = "Social events backed by MongoDB")
    )
)]
pub struct ApiDoc;

/// Create the events router. Paths are absolute (`/events`, `/events/{id}`)
/// so the result can be merged at the application root.
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/join", post(join_event))
        .with_state(shared_service)
}

/// List events, ascending by date
#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    params(EventFilter),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(filter): Query<EventFilter>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events(filter).await?;
    Ok(Json(events))
}

/// Create an event dated after today
#[utoipa::path(
    post,
    path = "/events",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 200, description = "Event inserted", body = InsertAck),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<Json<InsertAck>> {
    let ack = service.create_event(input).await?;
    Ok(Json(ack))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
) -> EventResult<Json<Event>> {
    let event = service.get_event(&id).await?;
    Ok(Json(event))
}

/// Join an event
///
/// Joining twice with the same email is a no-op.
#[utoipa::path(
    post,
    path = "/events/{id}/join",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (hex)")
    ),
    request_body = JoinEvent,
    responses(
        (status = 200, description = "Joined", body = SuccessResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn join_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    body: Option<ValidatedJson<JoinEvent>>,
) -> EventResult<Json<SuccessResponse>> {
    // A body sent without a content type reads as empty.
    let input = body.map(|ValidatedJson(input)| input).unwrap_or_default();
    let response = service.join_event(&id, input).await?;
    Ok(Json(response))
}

/// Update the supplied fields of an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (hex)")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Updated", body = SuccessResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<SuccessResponse>> {
    let response = service.update_event(&id, input).await?;
    Ok(Json(response))
}

/// Delete an event
///
/// Always 200; `deletedCount` is 0 when nothing matched.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Deletion result", body = DeleteAck),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
) -> EventResult<Json<DeleteAck>> {
    let ack = service.delete_event(&id).await?;
    Ok(Json(ack))
}
