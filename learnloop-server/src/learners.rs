use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use learnloop_market::{Gender, LearnerUpsert, Upserted};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{AgeSchema, LearnerUpsertSchema},
    serialized::{Learner, LearnerProfile, Message, ToSerialized},
};

#[utoipa::path(
    post,
    path = "/api/learners",
    tag = "learners",
    request_body = LearnerUpsertSchema,
    responses(
        (status = 200, description = "Existing profile updated", body = Learner),
        (status = 201, description = "Profile created", body = Learner),
        (status = 400, description = "The user is not a learner"),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn upsert(
    State(context): State<ServerContext>,
    Json(body): Json<LearnerUpsertSchema>,
) -> ServerResult<(StatusCode, Json<Learner>)> {
    let (learner, outcome) = context
        .market
        .profiles
        .upsert_learner(LearnerUpsert {
            user_id: body.user_id,
            age: body.age,
            interest: body.interest,
            gender: body.gender.as_deref().map(Gender::parse),
            goal: body.goal,
        })
        .await?;

    let status = match outcome {
        Upserted::Created => StatusCode::CREATED,
        Upserted::Updated => StatusCode::OK,
    };

    Ok((status, Json(learner.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/api/learners",
    tag = "learners",
    responses(
        (status = 200, body = Vec<LearnerProfile>)
    )
)]
pub(crate) async fn list_learners(
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<LearnerProfile>>> {
    let profiles = context.market.profiles.list_learners().await?;

    Ok(Json(profiles.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/learners/{userId}",
    tag = "learners",
    responses(
        (status = 200, body = LearnerProfile),
        (status = 404, description = "No learner profile for this user")
    )
)]
pub(crate) async fn profile(
    State(context): State<ServerContext>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<LearnerProfile>> {
    let profile = context.market.profiles.learner_for_user(user_id).await?;

    Ok(Json(profile.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/api/learners/update-age/{userId}",
    tag = "learners",
    request_body = AgeSchema,
    responses(
        (status = 200, body = Message),
        (status = 404, description = "No learner profile for this user")
    )
)]
pub(crate) async fn update_age(
    State(context): State<ServerContext>,
    Path(user_id): Path<i64>,
    Json(body): Json<AgeSchema>,
) -> ServerResult<Json<Message>> {
    context
        .market
        .profiles
        .sync_learner_age(user_id, body.age)
        .await?;

    Ok(Json(Message::new("Age updated")))
}

#[utoipa::path(
    delete,
    path = "/api/learners/delete/{userId}",
    tag = "learners",
    responses(
        (status = 200, body = Message),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn remove_account(
    State(context): State<ServerContext>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<Message>> {
    context
        .market
        .profiles
        .delete_learner_account(user_id)
        .await?;

    Ok(Json(Message::new("Account deleted")))
}

pub fn router() -> Router<ServerContext> {
    Router::new()
        .route("/", post(upsert).get(list_learners))
        .route("/:user_id", get(profile))
        .route("/update-age/:user_id", put(update_age))
        .route("/delete/:user_id", delete(remove_account))
}
