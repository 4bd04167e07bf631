use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod sqlite;
pub use sqlite::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(e) => match e {
                DatabaseError::NotFound { .. } => Ok(()),
                e => Err(e),
            },
        }
    }
}

/// Represents a type that can fetch LearnLoop data from a database
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData>;
    async fn user_by_email(&self, email: &str) -> Result<UserData>;
    async fn list_users(&self) -> Result<Vec<UserData>>;
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;
    async fn update_user(&self, updated_user: UpdatedUser) -> Result<UserData>;
    async fn delete_user(&self, user_id: PrimaryKey) -> Result<()>;

    async fn learner_by_user_id(&self, user_id: PrimaryKey) -> Result<LearnerData>;
    async fn list_learners(&self) -> Result<Vec<LearnerData>>;
    async fn create_learner(&self, new_learner: NewLearner) -> Result<LearnerData>;
    async fn update_learner(&self, updated_learner: UpdatedLearner) -> Result<LearnerData>;
    /// Deleting an absent learner row is not an error
    async fn delete_learner_by_user_id(&self, user_id: PrimaryKey) -> Result<()>;

    async fn tutor_by_id(&self, tutor_id: PrimaryKey) -> Result<TutorData>;
    async fn tutor_by_user_id(&self, user_id: PrimaryKey) -> Result<TutorData>;
    async fn list_tutors(&self) -> Result<Vec<TutorData>>;
    async fn create_tutor(&self, new_tutor: NewTutor) -> Result<TutorData>;
    async fn update_tutor(&self, updated_tutor: UpdatedTutor) -> Result<TutorData>;
    /// Deleting an absent tutor row is not an error
    async fn delete_tutor_by_user_id(&self, user_id: PrimaryKey) -> Result<()>;

    async fn session_by_id(&self, session_id: PrimaryKey) -> Result<SessionData>;
    async fn list_sessions(&self) -> Result<Vec<SessionData>>;
    async fn sessions_by_tutor(&self, tutor_id: PrimaryKey) -> Result<Vec<SessionData>>;
    async fn sessions_by_learner(&self, learner_id: PrimaryKey) -> Result<Vec<SessionData>>;
    async fn create_session(&self, new_session: NewSession) -> Result<SessionData>;
    async fn update_session(&self, updated_session: UpdatedSession) -> Result<SessionData>;
    /// Atomic set-add: adding a learner already on the roster is a no-op
    async fn add_session_learner(
        &self,
        session_id: PrimaryKey,
        learner_id: PrimaryKey,
    ) -> Result<()>;
    /// Atomic remove: removing a learner not on the roster is a no-op
    async fn remove_session_learner(
        &self,
        session_id: PrimaryKey,
        learner_id: PrimaryKey,
    ) -> Result<()>;
    /// Deletes the session and its roster rows. Ledger rows are left alone.
    async fn delete_session(&self, session_id: PrimaryKey) -> Result<()>;

    async fn registration_by_pair(
        &self,
        learner_id: PrimaryKey,
        session_id: PrimaryKey,
    ) -> Result<RegistrationData>;
    async fn create_registration(
        &self,
        new_registration: NewRegistration,
    ) -> Result<RegistrationData>;
    async fn delete_registration(
        &self,
        learner_id: PrimaryKey,
        session_id: PrimaryKey,
    ) -> Result<()>;

    async fn questions_by_subject(&self, subject: &str) -> Result<Vec<QuestionData>>;
    async fn create_question(&self, new_question: NewQuestion) -> Result<QuestionData>;
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_image: String,
    pub age: i64,
    pub role: Role,
}

#[derive(Debug, Default)]
pub struct UpdatedUser {
    pub id: PrimaryKey,
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub age: Option<i64>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct NewLearner {
    pub user_id: PrimaryKey,
    pub age: i64,
    pub interest: String,
    pub gender: Gender,
    pub goal: String,
}

#[derive(Debug)]
pub struct UpdatedLearner {
    pub user_id: PrimaryKey,
    pub age: Option<i64>,
    pub interest: Option<String>,
    pub gender: Option<Gender>,
    pub goal: Option<String>,
}

#[derive(Debug)]
pub struct NewTutor {
    pub user_id: PrimaryKey,
    pub age: i64,
    pub domain: String,
    pub professional: String,
    pub work_experience: String,
}

#[derive(Debug)]
pub struct UpdatedTutor {
    pub user_id: PrimaryKey,
    pub age: Option<i64>,
    pub domain: Option<String>,
    pub professional: Option<String>,
    pub work_experience: Option<String>,
}

#[derive(Debug)]
pub struct NewSession {
    /// The tutor owning the new session
    pub tutor_id: PrimaryKey,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug)]
pub struct UpdatedSession {
    pub id: PrimaryKey,
    pub status: Option<SessionStatus>,
    /// A link is only ever set or replaced, never cleared
    pub meeting_link: Option<String>,
}

#[derive(Debug)]
pub struct NewRegistration {
    pub session_id: PrimaryKey,
    pub learner_id: PrimaryKey,
    pub session_date: String,
    pub session_time: String,
}

#[derive(Debug)]
pub struct NewQuestion {
    pub subject: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
}
