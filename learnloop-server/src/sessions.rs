use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use learnloop_market::NewSession;

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{MembershipSchema, NewSessionSchema},
    serialized::{Meeting, Message, Session, ToSerialized},
};

#[utoipa::path(
    post,
    path = "/api/sessions/create",
    tag = "sessions",
    request_body = NewSessionSchema,
    responses(
        (status = 201, body = Session),
        (status = 404, description = "Tutor does not exist")
    )
)]
pub(crate) async fn create(
    State(context): State<ServerContext>,
    Json(body): Json<NewSessionSchema>,
) -> ServerResult<(StatusCode, Json<Session>)> {
    let session = context
        .market
        .sessions
        .create_session(NewSession {
            tutor_id: body.tutor_id,
            title: body.title,
            description: body.description.unwrap_or_default(),
            date: body.date,
            time: body.time,
        })
        .await?;

    let session: Session = session.to_serialized();

    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/all",
    tag = "sessions",
    responses(
        (status = 200, body = Vec<Session>)
    )
)]
pub(crate) async fn all_sessions(
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<Session>>> {
    let sessions: Vec<Session> = context.market.sessions.list_all().await?.to_serialized();

    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/api/sessions/tutor/{tutorId}",
    tag = "sessions",
    responses(
        (status = 200, body = Vec<Session>)
    )
)]
pub(crate) async fn for_tutor(
    State(context): State<ServerContext>,
    Path(tutor_id): Path<i64>,
) -> ServerResult<Json<Vec<Session>>> {
    let sessions: Vec<Session> = context
        .market
        .sessions
        .list_for_tutor(tutor_id)
        .await?
        .to_serialized();

    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/api/sessions/learner/{learnerId}",
    tag = "sessions",
    responses(
        (status = 200, body = Vec<Session>),
        (status = 404, description = "No learner profile for this user")
    )
)]
pub(crate) async fn for_learner(
    State(context): State<ServerContext>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<Vec<Session>>> {
    let sessions: Vec<Session> = context
        .market
        .sessions
        .list_for_learner(user_id)
        .await?
        .to_serialized();

    Ok(Json(sessions))
}

#[utoipa::path(
    post,
    path = "/api/sessions/register",
    tag = "sessions",
    request_body = MembershipSchema,
    responses(
        (status = 200, body = Session),
        (status = 404, description = "Session or learner profile does not exist")
    )
)]
pub(crate) async fn register(
    State(context): State<ServerContext>,
    Json(body): Json<MembershipSchema>,
) -> ServerResult<Json<Session>> {
    let session = context
        .market
        .sessions
        .register_learner(body.session_id, body.user_id)
        .await?;

    let session: Session = session.to_serialized();

    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/sessions/unregister",
    tag = "sessions",
    request_body = MembershipSchema,
    responses(
        (status = 200, body = Session),
        (status = 404, description = "Session or learner profile does not exist")
    )
)]
pub(crate) async fn unregister(
    State(context): State<ServerContext>,
    Json(body): Json<MembershipSchema>,
) -> ServerResult<Json<Session>> {
    let session = context
        .market
        .sessions
        .unregister_learner(body.session_id, body.user_id)
        .await?;

    let session: Session = session.to_serialized();

    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/sessions/start/{id}",
    tag = "sessions",
    responses(
        (status = 200, body = Meeting),
        (status = 400, description = "The session is already completed"),
        (status = 404, description = "Session does not exist")
    )
)]
pub(crate) async fn start(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Meeting>> {
    let session = context.market.sessions.start_meeting(id).await?;
    let meeting: Meeting = session.to_serialized();

    Ok(Json(meeting))
}

#[utoipa::path(
    get,
    path = "/api/sessions/join/{id}",
    tag = "sessions",
    responses(
        (status = 200, body = Meeting),
        (status = 400, description = "The meeting has not been started yet"),
        (status = 404, description = "Session does not exist")
    )
)]
pub(crate) async fn join(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Meeting>> {
    // Checks the link exists before serializing the session
    let _ = context.market.sessions.join_meeting(id).await?;

    let session = context.market.sessions.session_by_id(id).await?;
    let meeting: Meeting = session.to_serialized();

    Ok(Json(meeting))
}

#[utoipa::path(
    post,
    path = "/api/sessions/end/{id}",
    tag = "sessions",
    responses(
        (status = 200, body = Message),
        (status = 404, description = "Session does not exist")
    )
)]
pub(crate) async fn end(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Message>> {
    context.market.sessions.end_meeting(id).await?;

    Ok(Json(Message::new("Session completed")))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/delete/{sessionId}",
    tag = "sessions",
    responses(
        (status = 200, body = Message),
        (status = 404, description = "Session does not exist")
    )
)]
pub(crate) async fn remove(
    State(context): State<ServerContext>,
    Path(session_id): Path<i64>,
) -> ServerResult<Json<Message>> {
    context.market.sessions.delete_session(session_id).await?;

    Ok(Json(Message::new("Session deleted")))
}

pub fn router() -> Router<ServerContext> {
    Router::new()
        .route("/create", post(create))
        .route("/all", get(all_sessions))
        .route("/tutor/:tutor_id", get(for_tutor))
        .route("/learner/:user_id", get(for_learner))
        .route("/register", post(register))
        .route("/unregister", post(unregister))
        .route("/start/:id", post(start))
        .route("/join/:id", get(join))
        .route("/end/:id", post(end))
        .route("/delete/:session_id", delete(remove))
}
