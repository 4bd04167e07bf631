use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};

/// The type used for primary keys in the database.
pub type PrimaryKey = i64;

/// What kind of account a user signed up as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Tutor,
}

/// Gender of a learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Lenient parse: unrecognized input falls back to [Gender::Other]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

/// Lifecycle state of a tutoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum SessionStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

/// A LearnLoop account
#[derive(Debug, Clone, FromRow)]
pub struct UserData {
    pub id: PrimaryKey,
    pub name: String,
    pub email: String,
    /// The argon2 PHC string, never the plaintext password
    pub password: String,
    pub profile_image: String,
    pub age: i64,
    pub role: Role,
}

/// The learner profile attached to a user with the learner role
#[derive(Debug, Clone, FromRow)]
pub struct LearnerData {
    pub id: PrimaryKey,
    pub user_id: PrimaryKey,
    pub age: i64,
    pub interest: String,
    pub gender: Gender,
    pub goal: String,
}

/// The tutor profile attached to a user with the tutor role
#[derive(Debug, Clone, FromRow)]
pub struct TutorData {
    pub id: PrimaryKey,
    pub user_id: PrimaryKey,
    pub age: i64,
    pub domain: String,
    pub professional: String,
    pub work_experience: String,
}

/// A scheduled tutoring session
#[derive(Debug, Clone, FromRow)]
pub struct SessionData {
    pub id: PrimaryKey,
    pub tutor_id: PrimaryKey,
    /// Public name of the owning tutor, joined in at read time
    pub tutor_name: String,
    /// Public email of the owning tutor, joined in at read time
    pub tutor_email: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub status: SessionStatus,
    pub meeting_link: Option<String>,
    /// Learner ids on the roster, in registration order
    #[sqlx(skip)]
    pub learners: Vec<PrimaryKey>,
}

/// A row in the registration ledger.
/// Note: `learner_id` and `session_id` are unique together.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationData {
    pub id: PrimaryKey,
    pub session_id: PrimaryKey,
    pub learner_id: PrimaryKey,
    /// Denormalized from the session at registration time
    pub session_date: String,
    pub session_time: String,
}

/// A quiz question, tagged with a lower-cased subject
#[derive(Debug, Clone)]
pub struct QuestionData {
    pub id: PrimaryKey,
    pub subject: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: i64,
}

// Options are stored as a JSON array string, so this can't be derived.
impl FromRow<'_, SqliteRow> for QuestionData {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let raw_options: String = row.try_get("options")?;

        let options = serde_json::from_str(&raw_options).map_err(|e| sqlx::Error::ColumnDecode {
            index: "options".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            subject: row.try_get("subject")?,
            question: row.try_get("question")?,
            options,
            correct_answer: row.try_get("correct_answer")?,
        })
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Learner => "learner",
            Role::Tutor => "tutor",
        };

        f.write_str(name)
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionStatus::Upcoming => "Upcoming",
            SessionStatus::Ongoing => "Ongoing",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        };

        f.write_str(name)
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };

        f.write_str(name)
    }
}
