use async_trait::async_trait;
use log::info;
use sqlx::{
    query, query_as, query_scalar, sqlite::SqlitePoolOptions, Error as SqlxError, Executor,
    SqlitePool,
};

use crate::{
    Database, DatabaseError, DatabaseResult, IntoDatabaseError, LearnerData, NewLearner,
    NewQuestion, NewRegistration, NewSession, NewTutor, NewUser, PrimaryKey, QuestionData,
    RegistrationData, Result, SessionData, TutorData, UpdatedLearner, UpdatedSession,
    UpdatedTutor, UpdatedUser, UserData,
};

/// Tables are created on connect if they don't exist yet
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    profile_image TEXT NOT NULL DEFAULT '',
    age INTEGER NOT NULL DEFAULT 0,
    role TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS learners (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE,
    age INTEGER NOT NULL DEFAULT 0,
    interest TEXT NOT NULL DEFAULT '',
    gender TEXT NOT NULL DEFAULT 'Other',
    goal TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS tutors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE,
    age INTEGER NOT NULL DEFAULT 0,
    domain TEXT NOT NULL DEFAULT '',
    professional TEXT NOT NULL DEFAULT '',
    work_experience TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tutor_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Upcoming',
    meeting_link TEXT
);

CREATE TABLE IF NOT EXISTS session_learners (
    session_id INTEGER NOT NULL,
    learner_id INTEGER NOT NULL,
    UNIQUE(session_id, learner_id)
);

CREATE TABLE IF NOT EXISTS registrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL,
    learner_id INTEGER NOT NULL,
    session_date TEXT NOT NULL,
    session_time TEXT NOT NULL,
    UNIQUE(learner_id, session_id)
);

CREATE TABLE IF NOT EXISTS test_questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject TEXT NOT NULL,
    question TEXT NOT NULL,
    options TEXT NOT NULL,
    correct_answer INTEGER NOT NULL
);
";

/// Sessions are always read with the owning tutor's public fields joined in
const SESSION_QUERY: &str = "
    SELECT
        sessions.*,
        users.name AS tutor_name,
        users.email AS tutor_email
    FROM sessions
        INNER JOIN tutors ON sessions.tutor_id = tutors.id
        INNER JOIN users ON tutors.user_id = users.id
";

/// A SQLite database implementation for LearnLoop
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub async fn connect(url: &str) -> Result<Self> {
        // A single connection keeps in-memory databases coherent.
        // SQLite serializes writes per file anyway.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        pool.execute(SCHEMA)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        info!("Database schema ensured");

        Ok(Self { pool })
    }

    async fn session_learners(&self, session_id: PrimaryKey) -> Result<Vec<PrimaryKey>> {
        query_scalar::<_, PrimaryKey>(
            "SELECT learner_id FROM session_learners WHERE session_id = ? ORDER BY rowid ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        query_as::<_, UserData>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", "id"))
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        query_as::<_, UserData>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", "email"))
    }

    async fn list_users(&self) -> Result<Vec<UserData>> {
        query_as::<_, UserData>("SELECT * FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.user_by_email(&new_user.email)
            .await
            .conflict_or_ok("user", "email", &new_user.email)?;

        query_as::<_, UserData>(
            "INSERT INTO users (name, email, password, profile_image, age, role)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password)
        .bind(new_user.profile_image)
        .bind(new_user.age)
        .bind(new_user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn update_user(&self, updated_user: UpdatedUser) -> Result<UserData> {
        let user = self.user_by_id(updated_user.id).await?;

        query("UPDATE users SET name = ?, profile_image = ?, age = ?, password = ? WHERE id = ?")
            .bind(updated_user.name.unwrap_or(user.name))
            .bind(updated_user.profile_image.unwrap_or(user.profile_image))
            .bind(updated_user.age.unwrap_or(user.age))
            .bind(updated_user.password.unwrap_or(user.password))
            .bind(updated_user.id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.user_by_id(updated_user.id).await
    }

    async fn delete_user(&self, user_id: PrimaryKey) -> Result<()> {
        // Ensure user exists
        let _ = self.user_by_id(user_id).await?;

        query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn learner_by_user_id(&self, user_id: PrimaryKey) -> Result<LearnerData> {
        query_as::<_, LearnerData>("SELECT * FROM learners WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("learner", "user_id"))
    }

    async fn list_learners(&self) -> Result<Vec<LearnerData>> {
        query_as::<_, LearnerData>("SELECT * FROM learners")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_learner(&self, new_learner: NewLearner) -> Result<LearnerData> {
        self.learner_by_user_id(new_learner.user_id)
            .await
            .conflict_or_ok("learner", "user_id", &new_learner.user_id.to_string())?;

        query_as::<_, LearnerData>(
            "INSERT INTO learners (user_id, age, interest, gender, goal)
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_learner.user_id)
        .bind(new_learner.age)
        .bind(new_learner.interest)
        .bind(new_learner.gender)
        .bind(new_learner.goal)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn update_learner(&self, updated_learner: UpdatedLearner) -> Result<LearnerData> {
        let learner = self.learner_by_user_id(updated_learner.user_id).await?;

        query("UPDATE learners SET age = ?, interest = ?, gender = ?, goal = ? WHERE user_id = ?")
            .bind(updated_learner.age.unwrap_or(learner.age))
            .bind(updated_learner.interest.unwrap_or(learner.interest))
            .bind(updated_learner.gender.unwrap_or(learner.gender))
            .bind(updated_learner.goal.unwrap_or(learner.goal))
            .bind(updated_learner.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.learner_by_user_id(updated_learner.user_id).await
    }

    async fn delete_learner_by_user_id(&self, user_id: PrimaryKey) -> Result<()> {
        query("DELETE FROM learners WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn tutor_by_id(&self, tutor_id: PrimaryKey) -> Result<TutorData> {
        query_as::<_, TutorData>("SELECT * FROM tutors WHERE id = ?")
            .bind(tutor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("tutor", "id"))
    }

    async fn tutor_by_user_id(&self, user_id: PrimaryKey) -> Result<TutorData> {
        query_as::<_, TutorData>("SELECT * FROM tutors WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("tutor", "user_id"))
    }

    async fn list_tutors(&self) -> Result<Vec<TutorData>> {
        query_as::<_, TutorData>("SELECT * FROM tutors")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_tutor(&self, new_tutor: NewTutor) -> Result<TutorData> {
        self.tutor_by_user_id(new_tutor.user_id)
            .await
            .conflict_or_ok("tutor", "user_id", &new_tutor.user_id.to_string())?;

        query_as::<_, TutorData>(
            "INSERT INTO tutors (user_id, age, domain, professional, work_experience)
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_tutor.user_id)
        .bind(new_tutor.age)
        .bind(new_tutor.domain)
        .bind(new_tutor.professional)
        .bind(new_tutor.work_experience)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn update_tutor(&self, updated_tutor: UpdatedTutor) -> Result<TutorData> {
        let tutor = self.tutor_by_user_id(updated_tutor.user_id).await?;

        query(
            "UPDATE tutors SET age = ?, domain = ?, professional = ?, work_experience = ?
             WHERE user_id = ?",
        )
        .bind(updated_tutor.age.unwrap_or(tutor.age))
        .bind(updated_tutor.domain.unwrap_or(tutor.domain))
        .bind(updated_tutor.professional.unwrap_or(tutor.professional))
        .bind(updated_tutor.work_experience.unwrap_or(tutor.work_experience))
        .bind(updated_tutor.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.tutor_by_user_id(updated_tutor.user_id).await
    }

    async fn delete_tutor_by_user_id(&self, user_id: PrimaryKey) -> Result<()> {
        query("DELETE FROM tutors WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn session_by_id(&self, session_id: PrimaryKey) -> Result<SessionData> {
        let sql = format!("{SESSION_QUERY} WHERE sessions.id = ?");

        let mut session = query_as::<_, SessionData>(&sql)
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("session", "id"))?;

        session.learners = self.session_learners(session.id).await?;

        Ok(session)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionData>> {
        let sql = format!("{SESSION_QUERY} ORDER BY sessions.date ASC, sessions.time ASC");

        let mut sessions = query_as::<_, SessionData>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        for session in sessions.iter_mut() {
            session.learners = self.session_learners(session.id).await?;
        }

        Ok(sessions)
    }

    async fn sessions_by_tutor(&self, tutor_id: PrimaryKey) -> Result<Vec<SessionData>> {
        let sql = format!(
            "{SESSION_QUERY} WHERE sessions.tutor_id = ?
             ORDER BY sessions.date ASC, sessions.time ASC"
        );

        let mut sessions = query_as::<_, SessionData>(&sql)
            .bind(tutor_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        for session in sessions.iter_mut() {
            session.learners = self.session_learners(session.id).await?;
        }

        Ok(sessions)
    }

    async fn sessions_by_learner(&self, learner_id: PrimaryKey) -> Result<Vec<SessionData>> {
        let sql = format!(
            "{SESSION_QUERY}
                INNER JOIN session_learners ON session_learners.session_id = sessions.id
             WHERE session_learners.learner_id = ?
             ORDER BY sessions.date ASC, sessions.time ASC"
        );

        let mut sessions = query_as::<_, SessionData>(&sql)
            .bind(learner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        for session in sessions.iter_mut() {
            session.learners = self.session_learners(session.id).await?;
        }

        Ok(sessions)
    }

    async fn create_session(&self, new_session: NewSession) -> Result<SessionData> {
        let session_id = query_scalar::<_, PrimaryKey>(
            "INSERT INTO sessions (tutor_id, title, description, date, time)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_session.tutor_id)
        .bind(new_session.title)
        .bind(new_session.description)
        .bind(new_session.date)
        .bind(new_session.time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.session_by_id(session_id).await
    }

    async fn update_session(&self, updated_session: UpdatedSession) -> Result<SessionData> {
        let session = self.session_by_id(updated_session.id).await?;

        query("UPDATE sessions SET status = ?, meeting_link = ? WHERE id = ?")
            .bind(updated_session.status.unwrap_or(session.status))
            .bind(updated_session.meeting_link.or(session.meeting_link))
            .bind(updated_session.id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.session_by_id(updated_session.id).await
    }

    async fn add_session_learner(
        &self,
        session_id: PrimaryKey,
        learner_id: PrimaryKey,
    ) -> Result<()> {
        query("INSERT OR IGNORE INTO session_learners (session_id, learner_id) VALUES (?, ?)")
            .bind(session_id)
            .bind(learner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn remove_session_learner(
        &self,
        session_id: PrimaryKey,
        learner_id: PrimaryKey,
    ) -> Result<()> {
        query("DELETE FROM session_learners WHERE session_id = ? AND learner_id = ?")
            .bind(session_id)
            .bind(learner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn delete_session(&self, session_id: PrimaryKey) -> Result<()> {
        // Ensure session exists
        let _ = self.session_by_id(session_id).await?;

        query("DELETE FROM session_learners WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn registration_by_pair(
        &self,
        learner_id: PrimaryKey,
        session_id: PrimaryKey,
    ) -> Result<RegistrationData> {
        query_as::<_, RegistrationData>(
            "SELECT * FROM registrations WHERE learner_id = ? AND session_id = ?",
        )
        .bind(learner_id)
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("registration", "learner:session"))
    }

    async fn create_registration(
        &self,
        new_registration: NewRegistration,
    ) -> Result<RegistrationData> {
        self.registration_by_pair(new_registration.learner_id, new_registration.session_id)
            .await
            .conflict_or_ok(
                "registration",
                "learner:session",
                format!(
                    "{}:{}",
                    new_registration.learner_id, new_registration.session_id
                )
                .as_str(),
            )?;

        query_as::<_, RegistrationData>(
            "INSERT INTO registrations (session_id, learner_id, session_date, session_time)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(new_registration.session_id)
        .bind(new_registration.learner_id)
        .bind(new_registration.session_date)
        .bind(new_registration.session_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn delete_registration(
        &self,
        learner_id: PrimaryKey,
        session_id: PrimaryKey,
    ) -> Result<()> {
        // Ensure the registration exists
        let _ = self.registration_by_pair(learner_id, session_id).await?;

        query("DELETE FROM registrations WHERE learner_id = ? AND session_id = ?")
            .bind(learner_id)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn questions_by_subject(&self, subject: &str) -> Result<Vec<QuestionData>> {
        query_as::<_, QuestionData>("SELECT * FROM test_questions WHERE subject = ?")
            .bind(subject)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_question(&self, new_question: NewQuestion) -> Result<QuestionData> {
        let options = serde_json::to_string(&new_question.options)
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        query_as::<_, QuestionData>(
            "INSERT INTO test_questions (subject, question, options, correct_answer)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(new_question.subject)
        .bind(new_question.question)
        .bind(options)
        .bind(new_question.correct_answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, Role, SessionStatus};

    async fn database() -> SqliteDatabase {
        SqliteDatabase::connect("sqlite::memory:")
            .await
            .expect("in-memory database connects")
    }

    async fn seed_tutor(db: &SqliteDatabase) -> TutorData {
        let user = db
            .create_user(NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "hash".to_string(),
                profile_image: String::new(),
                age: 30,
                role: Role::Tutor,
            })
            .await
            .unwrap();

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

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let db = database().await;

        let new_user = |email: &str| NewUser {
            name: "Sam".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            profile_image: String::new(),
            age: 20,
            role: Role::Learner,
        };

        db.create_user(new_user("sam@example.com")).await.unwrap();
        let result = db.create_user(new_user("sam@example.com")).await;

        assert!(matches!(result, Err(DatabaseError::Conflict { .. })));
    }

    #[tokio::test]
    async fn roster_add_is_idempotent() {
        let db = database().await;
        let tutor = seed_tutor(&db).await;

        let session = db
            .create_session(NewSession {
                tutor_id: tutor.id,
                title: "Algebra".to_string(),
                description: String::new(),
                date: "2024-01-01".to_string(),
                time: "10:00".to_string(),
            })
            .await
            .unwrap();

        db.add_session_learner(session.id, 7).await.unwrap();
        db.add_session_learner(session.id, 7).await.unwrap();

        let session = db.session_by_id(session.id).await.unwrap();
        assert_eq!(session.learners, vec![7]);
        assert_eq!(session.status, SessionStatus::Upcoming);
    }

    #[tokio::test]
    async fn question_options_survive_round_trip() {
        let db = database().await;

        let options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let created = db
            .create_question(NewQuestion {
                subject: "java".to_string(),
                question: "What is a JVM?".to_string(),
                options: options.clone(),
                correct_answer: 1,
            })
            .await
            .unwrap();

        let fetched = db.questions_by_subject("java").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, created.id);
        assert_eq!(fetched[0].options, options);
    }

    #[tokio::test]
    async fn partial_learner_update_keeps_other_fields() {
        let db = database().await;

        let user = db
            .create_user(NewUser {
                name: "Kim".to_string(),
                email: "kim@example.com".to_string(),
                password: "hash".to_string(),
                profile_image: String::new(),
                age: 19,
                role: Role::Learner,
            })
            .await
            .unwrap();

        db.create_learner(NewLearner {
            user_id: user.id,
            age: 19,
            interest: "physics".to_string(),
            gender: Gender::Female,
            goal: "pass finals".to_string(),
        })
        .await
        .unwrap();

        let updated = db
            .update_learner(UpdatedLearner {
                user_id: user.id,
                age: Some(20),
                interest: None,
                gender: None,
                goal: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.age, 20);
        assert_eq!(updated.interest, "physics");
        assert_eq!(updated.gender, Gender::Female);
        assert_eq!(updated.goal, "pass finals");
    }
}
