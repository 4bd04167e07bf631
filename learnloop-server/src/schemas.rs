//! Request bodies accepted by the endpoints

use serde::Deserialize;
use utoipa::ToSchema;

use learnloop_market::Role;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterSchema {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_image: Option<String>,
    pub age: i64,
    #[schema(value_type = String)]
    pub role: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginSchema {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserSchema {
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub age: Option<i64>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LearnerUpsertSchema {
    pub user_id: i64,
    pub age: Option<i64>,
    pub interest: Option<String>,
    /// Anything other than Male or Female is stored as Other
    pub gender: Option<String>,
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TutorUpsertSchema {
    pub user_id: i64,
    pub age: Option<i64>,
    pub domain: Option<String>,
    pub professional: Option<String>,
    pub work_experience: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AgeSchema {
    pub age: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSessionSchema {
    pub tutor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: String,
}

/// Identifies a learner (by user id) and a session for roster mutations
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MembershipSchema {
    pub session_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LedgerRegisterSchema {
    pub session_id: i64,
    pub user_id: i64,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LedgerUnregisterSchema {
    pub session_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewQuestionSchema {
    pub subject: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
}
