use chrono::Utc;
use log::info;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    Database, DatabaseError, NewSession, PrimaryKey, SessionData, SessionStatus, UpdatedSession,
};

/// Manages the session lifecycle: creation, the roster, and the meeting link
pub struct Sessions<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session is in a state the requested transition is not allowed from
    #[error("a {0} session cannot be restarted")]
    InvalidTransition(SessionStatus),
    /// The meeting link was requested before the meeting was started
    #[error("the meeting has not been started yet")]
    NotStarted,
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl<Db> Sessions<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Creates a new session owned by the given tutor, in the Upcoming state
    pub async fn create_session(
        &self,
        new_session: NewSession,
    ) -> Result<SessionData, DatabaseError> {
        // Ensure the owning tutor exists
        let _ = self.db.tutor_by_id(new_session.tutor_id).await?;

        self.db.create_session(new_session).await
    }

    pub async fn session_by_id(
        &self,
        session_id: PrimaryKey,
    ) -> Result<SessionData, DatabaseError> {
        self.db.session_by_id(session_id).await
    }

    /// All sessions, ascending by date
    pub async fn list_all(&self) -> Result<Vec<SessionData>, DatabaseError> {
        self.db.list_sessions().await
    }

    pub async fn list_for_tutor(
        &self,
        tutor_id: PrimaryKey,
    ) -> Result<Vec<SessionData>, DatabaseError> {
        self.db.sessions_by_tutor(tutor_id).await
    }

    /// Sessions a learner is registered to, addressed by the learner's user id
    pub async fn list_for_learner(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<SessionData>, DatabaseError> {
        let learner = self.db.learner_by_user_id(user_id).await?;

        self.db.sessions_by_learner(learner.id).await
    }

    /// Adds a learner to the session roster. Registering twice is a no-op.
    pub async fn register_learner(
        &self,
        session_id: PrimaryKey,
        user_id: PrimaryKey,
    ) -> Result<SessionData, DatabaseError> {
        let learner = self.db.learner_by_user_id(user_id).await?;
        let _ = self.db.session_by_id(session_id).await?;

        self.db.add_session_learner(session_id, learner.id).await?;
        self.db.session_by_id(session_id).await
    }

    /// Removes a learner from the roster. Removing an absent learner is a no-op.
    pub async fn unregister_learner(
        &self,
        session_id: PrimaryKey,
        user_id: PrimaryKey,
    ) -> Result<SessionData, DatabaseError> {
        let learner = self.db.learner_by_user_id(user_id).await?;
        let _ = self.db.session_by_id(session_id).await?;

        self.db
            .remove_session_learner(session_id, learner.id)
            .await?;
        self.db.session_by_id(session_id).await
    }

    /// Issues a fresh meeting link and moves the session to Ongoing.
    /// Starting an already Ongoing session regenerates the link, but a
    /// Completed session cannot be restarted.
    pub async fn start_meeting(&self, session_id: PrimaryKey) -> Result<SessionData, SessionError> {
        let session = self.db.session_by_id(session_id).await?;

        if session.status == SessionStatus::Completed {
            return Err(SessionError::InvalidTransition(session.status));
        }

        // The wall-clock component keeps links unique across invocations
        let link = format!(
            "https://meet.jit.si/learnloop-{}-{}",
            session.id,
            Utc::now().timestamp_millis()
        );

        info!("Issued meeting link for session {}", session.id);

        let session = self
            .db
            .update_session(UpdatedSession {
                id: session_id,
                status: Some(SessionStatus::Ongoing),
                meeting_link: Some(link),
            })
            .await?;

        Ok(session)
    }

    /// Returns the current meeting link, any number of times
    pub async fn join_meeting(&self, session_id: PrimaryKey) -> Result<String, SessionError> {
        let session = self.db.session_by_id(session_id).await?;

        session.meeting_link.ok_or(SessionError::NotStarted)
    }

    /// Moves the session to Completed. This is allowed from any state, so it
    /// doubles as "cancel by completion" for sessions that never started.
    pub async fn end_meeting(&self, session_id: PrimaryKey) -> Result<SessionData, DatabaseError> {
        let _ = self.db.session_by_id(session_id).await?;

        self.db
            .update_session(UpdatedSession {
                id: session_id,
                status: Some(SessionStatus::Completed),
                meeting_link: None,
            })
            .await
    }

    /// Deletes the session and its roster. Ledger rows referencing the
    /// session are left orphaned.
    pub async fn delete_session(&self, session_id: PrimaryKey) -> Result<(), DatabaseError> {
        self.db.delete_session(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Gender, NewLearner, NewRegistration, NewTutor, NewUser, Role, SqliteDatabase, TutorData,
        UserData,
    };

    async fn setup() -> (Arc<SqliteDatabase>, Sessions<SqliteDatabase>) {
        let db = Arc::new(
            SqliteDatabase::connect("sqlite::memory:")
                .await
                .expect("in-memory database connects"),
        );
        let sessions = Sessions::new(&db);

        (db, sessions)
    }

    async fn seed_user(db: &SqliteDatabase, email: &str, role: Role) -> UserData {
        db.create_user(NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            profile_image: String::new(),
            age: 30,
            role,
        })
        .await
        .unwrap()
    }

    async fn seed_tutor(db: &SqliteDatabase) -> TutorData {
        let user = seed_user(db, "ada@example.com", Role::Tutor).await;

        db.create_tutor(NewTutor {
            user_id: user.id,
            age: user.age,
            domain: "math".to_string(),
            professional: "Lecturer".to_string(),
            work_experience: "10 years".to_string(),
        })
        .await
        .unwrap()
    }

    async fn seed_learner(db: &SqliteDatabase, email: &str) -> (UserData, PrimaryKey) {
        let user = seed_user(db, email, Role::Learner).await;

        let learner = db
            .create_learner(NewLearner {
                user_id: user.id,
                age: user.age,
                interest: "math".to_string(),
                gender: Gender::Other,
                goal: String::new(),
            })
            .await
            .unwrap();

        (user, learner.id)
    }

    fn new_session(tutor_id: PrimaryKey, title: &str, date: &str) -> NewSession {
        NewSession {
            tutor_id,
            title: title.to_string(),
            description: "desc".to_string(),
            date: date.to_string(),
            time: "10:00".to_string(),
        }
    }

    #[tokio::test]
    async fn create_requires_existing_tutor() {
        let (_db, sessions) = setup().await;

        let result = sessions.create_session(new_session(999, "Intro", "2024-01-01")).await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn listing_sorts_ascending_by_date() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;

        sessions
            .create_session(new_session(tutor.id, "Later", "2024-03-01"))
            .await
            .unwrap();
        sessions
            .create_session(new_session(tutor.id, "Earlier", "2024-01-01"))
            .await
            .unwrap();

        let listed = sessions.list_all().await.unwrap();
        let titles: Vec<_> = listed.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["Earlier", "Later"]);
        // Results carry the owning tutor's public fields
        assert_eq!(listed[0].tutor_name, "Ada");
        assert_eq!(listed[0].tutor_email, "ada@example.com");
    }

    #[tokio::test]
    async fn registering_twice_does_not_grow_the_roster() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;
        let (user, learner_id) = seed_learner(&db, "sam@example.com").await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        sessions.register_learner(session.id, user.id).await.unwrap();
        let session = sessions.register_learner(session.id, user.id).await.unwrap();

        assert_eq!(session.learners, vec![learner_id]);
    }

    #[tokio::test]
    async fn unregistering_an_absent_learner_is_a_no_op() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;
        let (user, _) = seed_learner(&db, "sam@example.com").await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        let session = sessions.unregister_learner(session.id, user.id).await.unwrap();

        assert!(session.learners.is_empty());
    }

    #[tokio::test]
    async fn registering_without_a_profile_fails() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        let result = sessions.register_learner(session.id, user.id).await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn join_before_start_fails() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        let result = sessions.join_meeting(session.id).await;

        assert!(matches!(result, Err(SessionError::NotStarted)));
    }

    #[tokio::test]
    async fn start_issues_a_link_and_join_returns_it() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        let started = sessions.start_meeting(session.id).await.unwrap();
        let link = started.meeting_link.clone().expect("link is set");

        assert!(!link.is_empty());
        assert_eq!(started.status, SessionStatus::Ongoing);

        let joined = sessions.join_meeting(session.id).await.unwrap();
        assert_eq!(joined, link);
    }

    #[tokio::test]
    async fn completed_sessions_cannot_be_restarted() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        sessions.start_meeting(session.id).await.unwrap();
        sessions.end_meeting(session.id).await.unwrap();

        let result = sessions.start_meeting(session.id).await;

        assert!(matches!(
            result,
            Err(SessionError::InvalidTransition(SessionStatus::Completed))
        ));
    }

    #[tokio::test]
    async fn ending_an_unstarted_session_completes_it() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        let ended = sessions.end_meeting(session.id).await.unwrap();

        assert_eq!(ended.status, SessionStatus::Completed);
        assert!(ended.meeting_link.is_none());
    }

    #[tokio::test]
    async fn delete_clears_roster_but_leaves_ledger() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;
        let (user, learner_id) = seed_learner(&db, "sam@example.com").await;

        let session = sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        sessions.register_learner(session.id, user.id).await.unwrap();
        db.create_registration(NewRegistration {
            session_id: session.id,
            learner_id,
            session_date: "2024-01-01".to_string(),
            session_time: "10:00".to_string(),
        })
        .await
        .unwrap();

        sessions.delete_session(session.id).await.unwrap();

        assert!(db.session_by_id(session.id).await.is_err());
        // The ledger row is intentionally orphaned
        db.registration_by_pair(learner_id, session.id)
            .await
            .expect("ledger row survives session deletion");
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let (db, sessions) = setup().await;
        let tutor = seed_tutor(&db).await;

        sessions
            .create_session(new_session(tutor.id, "Intro", "2024-01-01"))
            .await
            .unwrap();

        let listed = sessions.list_for_tutor(tutor.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, SessionStatus::Upcoming);

        let started = sessions.start_meeting(listed[0].id).await.unwrap();
        assert_eq!(started.status, SessionStatus::Ongoing);
        assert!(started.meeting_link.is_some());

        let ended = sessions.end_meeting(listed[0].id).await.unwrap();
        assert_eq!(ended.status, SessionStatus::Completed);
    }
}
