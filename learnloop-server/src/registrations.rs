use axum::{
    extract::State,
    routing::{delete, post},
    Json, Router,
};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{LedgerRegisterSchema, LedgerUnregisterSchema},
    serialized::{Message, Registration, ToSerialized},
};

#[utoipa::path(
    post,
    path = "/api/registration/register",
    tag = "registration",
    request_body = LedgerRegisterSchema,
    responses(
        (status = 200, body = Registration),
        (status = 404, description = "No learner profile for this user"),
        (status = 409, description = "The learner is already registered")
    )
)]
pub(crate) async fn register(
    State(context): State<ServerContext>,
    Json(body): Json<LedgerRegisterSchema>,
) -> ServerResult<Json<Registration>> {
    let registration = context
        .market
        .registrations
        .register(body.user_id, body.session_id, body.date, body.time)
        .await?;

    Ok(Json(registration.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/api/registration/unregister",
    tag = "registration",
    request_body = LedgerUnregisterSchema,
    responses(
        (status = 200, body = Message),
        (status = 404, description = "No matching registration exists")
    )
)]
pub(crate) async fn unregister(
    State(context): State<ServerContext>,
    Json(body): Json<LedgerUnregisterSchema>,
) -> ServerResult<Json<Message>> {
    context
        .market
        .registrations
        .unregister(body.user_id, body.session_id)
        .await?;

    Ok(Json(Message::new("Registration removed")))
}

pub fn router() -> Router<ServerContext> {
    Router::new()
        .route("/register", post(register))
        .route("/unregister", delete(unregister))
}
