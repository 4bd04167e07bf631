use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use learnloop_market::NewQuestion;

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::NewQuestionSchema,
    serialized::{Question, ToSerialized},
};

/// How many questions a quiz hands out
const SAMPLE_SIZE: usize = 15;

#[utoipa::path(
    get,
    path = "/api/tests/{subject}",
    tag = "tests",
    responses(
        (status = 200, body = Vec<Question>),
        (status = 404, description = "No questions for this subject")
    )
)]
pub(crate) async fn sample(
    State(context): State<ServerContext>,
    Path(subject): Path<String>,
) -> ServerResult<Json<Vec<Question>>> {
    let questions = context.market.quizzes.sample(&subject, SAMPLE_SIZE).await?;

    Ok(Json(questions.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/api/tests",
    tag = "tests",
    request_body = NewQuestionSchema,
    responses(
        (status = 201, body = Question),
        (status = 400, description = "Empty options or out-of-bounds answer")
    )
)]
pub(crate) async fn add_question(
    State(context): State<ServerContext>,
    Json(body): Json<NewQuestionSchema>,
) -> ServerResult<(StatusCode, Json<Question>)> {
    let question = context
        .market
        .quizzes
        .add_question(NewQuestion {
            subject: body.subject,
            question: body.question,
            options: body.options,
            correct_answer: body.correct_answer,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(question.to_serialized())))
}

pub fn router() -> Router<ServerContext> {
    Router::new()
        .route("/:subject", get(sample))
        .route("/", post(add_question))
}
