use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use learnloop_market::{TutorUpsert, Upserted};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{AgeSchema, TutorUpsertSchema},
    serialized::{Message, ToSerialized, Tutor, TutorProfile},
};

#[utoipa::path(
    post,
    path = "/api/tutors",
    tag = "tutors",
    request_body = TutorUpsertSchema,
    responses(
        (status = 200, description = "Existing profile updated", body = Tutor),
        (status = 201, description = "Profile created", body = Tutor),
        (status = 400, description = "The user is not a tutor"),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn upsert(
    State(context): State<ServerContext>,
    Json(body): Json<TutorUpsertSchema>,
) -> ServerResult<(StatusCode, Json<Tutor>)> {
    let (tutor, outcome) = context
        .market
        .profiles
        .upsert_tutor(TutorUpsert {
            user_id: body.user_id,
            age: body.age,
            domain: body.domain,
            professional: body.professional,
            work_experience: body.work_experience,
        })
        .await?;

    let status = match outcome {
        Upserted::Created => StatusCode::CREATED,
        Upserted::Updated => StatusCode::OK,
    };

    Ok((status, Json(tutor.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/api/tutors",
    tag = "tutors",
    responses(
        (status = 200, body = Vec<TutorProfile>)
    )
)]
pub(crate) async fn list_tutors(
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<TutorProfile>>> {
    let profiles = context.market.profiles.list_tutors().await?;

    Ok(Json(profiles.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/tutors/{userId}",
    tag = "tutors",
    responses(
        (status = 200, body = TutorProfile),
        (status = 404, description = "No tutor profile for this user")
    )
)]
pub(crate) async fn profile(
    State(context): State<ServerContext>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<TutorProfile>> {
    let profile = context.market.profiles.tutor_for_user(user_id).await?;

    Ok(Json(profile.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/api/tutors/update-age/{userId}",
    tag = "tutors",
    request_body = AgeSchema,
    responses(
        (status = 200, body = Message),
        (status = 404, description = "No tutor profile for this user")
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
        .sync_tutor_age(user_id, body.age)
        .await?;

    Ok(Json(Message::new("Age updated")))
}

#[utoipa::path(
    delete,
    path = "/api/tutors/delete/{userId}",
    tag = "tutors",
    responses(
        (status = 200, body = Message),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn remove_account(
    State(context): State<ServerContext>,
    Path(user_id): Path<i64>,
) -> ServerResult<Json<Message>> {
    context.market.profiles.delete_tutor_account(user_id).await?;

    Ok(Json(Message::new("Account deleted")))
}

pub fn router() -> Router<ServerContext> {
    Router::new()
        .route("/", post(upsert).get(list_tutors))
        .route("/:user_id", get(profile))
        .route("/update-age/:user_id", put(update_age))
        .route("/delete/:user_id", delete(remove_account))
}
