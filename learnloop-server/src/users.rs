use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use learnloop_market::{Credentials, NewAccount, UpdatedUser};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{LoginSchema, RegisterSchema, UpdateUserSchema},
    serialized::{Message, ToSerialized, User},
};

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterSchema,
    responses(
        (status = 201, body = User),
        (status = 409, description = "Email is already registered")
    )
)]
pub(crate) async fn register(
    State(context): State<ServerContext>,
    Json(body): Json<RegisterSchema>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let user = context
        .market
        .auth
        .register(NewAccount {
            name: body.name,
            email: body.email,
            password: body.password,
            profile_image: body.profile_image.unwrap_or_default(),
            age: body.age,
            role: body.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.to_serialized())))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginSchema,
    responses(
        (status = 200, body = User),
        (status = 400, description = "Invalid credentials")
    )
)]
pub(crate) async fn login(
    State(context): State<ServerContext>,
    Json(body): Json<LoginSchema>,
) -> ServerResult<Json<User>> {
    let user = context
        .market
        .auth
        .login(Credentials {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(user.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, body = Vec<User>)
    )
)]
pub(crate) async fn list_users(
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<User>>> {
    let users = context.market.auth.list_users().await?;

    Ok(Json(users.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    responses(
        (status = 200, body = User),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn user(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
) -> ServerResult<Json<User>> {
    let user = context.market.auth.user_by_id(id).await?;

    Ok(Json(user.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    request_body = UpdateUserSchema,
    responses(
        (status = 200, body = User),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn update_user(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserSchema>,
) -> ServerResult<Json<User>> {
    let user = context
        .market
        .auth
        .update_account(UpdatedUser {
            id,
            name: body.name,
            profile_image: body.profile_image,
            age: body.age,
            password: body.password,
        })
        .await?;

    Ok(Json(user.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    responses(
        (status = 200, body = Message),
        (status = 404, description = "User does not exist")
    )
)]
pub(crate) async fn remove_user(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Message>> {
    context.market.auth.delete_account(id).await?;

    Ok(Json(Message::new("Account deleted")))
}

pub fn router() -> Router<ServerContext> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/", get(list_users))
        .route("/:id", get(user).put(update_user).delete(remove_user))
}
