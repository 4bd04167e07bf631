use utoipa::OpenApi;

use crate::{learners, quizzes, registrations, schemas, serialized, sessions, tutors, users};

#[derive(OpenApi)]
#[openapi(
    info(
        description = "learnloop-server exposes endpoints to interact with the LearnLoop tutoring marketplace"
    ),
    paths(
        users::register,
        users::login,
        users::list_users,
        users::user,
        users::update_user,
        users::remove_user,
        learners::upsert,
        learners::list_learners,
        learners::profile,
        learners::update_age,
        learners::remove_account,
        tutors::upsert,
        tutors::list_tutors,
        tutors::profile,
        tutors::update_age,
        tutors::remove_account,
        sessions::create,
        sessions::all_sessions,
        sessions::for_tutor,
        sessions::for_learner,
        sessions::register,
        sessions::unregister,
        sessions::start,
        sessions::join,
        sessions::end,
        sessions::remove,
        registrations::register,
        registrations::unregister,
        quizzes::sample,
        quizzes::add_question,
    ),
    components(schemas(
        serialized::User,
        serialized::Learner,
        serialized::LearnerProfile,
        serialized::Tutor,
        serialized::TutorProfile,
        serialized::Session,
        serialized::Meeting,
        serialized::Registration,
        serialized::Question,
        serialized::Message,
        schemas::RegisterSchema,
        schemas::LoginSchema,
        schemas::UpdateUserSchema,
        schemas::LearnerUpsertSchema,
        schemas::TutorUpsertSchema,
        schemas::AgeSchema,
        schemas::NewSessionSchema,
        schemas::MembershipSchema,
        schemas::LedgerRegisterSchema,
        schemas::LedgerUnregisterSchema,
        schemas::NewQuestionSchema,
    )),
    tags(
        (name = "users", description = "Account registration and credentials"),
        (name = "learners", description = "Learner profiles"),
        (name = "tutors", description = "Tutor profiles"),
        (name = "sessions", description = "Session lifecycle and roster"),
        (name = "registration", description = "The registration ledger"),
        (name = "tests", description = "Quiz question sampling and authoring"),
    )
)]
pub struct ApiDoc;
