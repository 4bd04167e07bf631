use std::sync::Arc;

use crate::{Database, DatabaseError, NewRegistration, PrimaryKey, RegistrationData};

/// The registration ledger: an independent record of learner registrations,
/// kept separate from the session roster. Unlike the roster, the ledger
/// rejects duplicates with a conflict.
pub struct Registrations<Db> {
    db: Arc<Db>,
}

impl<Db> Registrations<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Records a registration, addressed by the learner's user id.
    /// Fails with a conflict if the pair is already registered.
    pub async fn register(
        &self,
        user_id: PrimaryKey,
        session_id: PrimaryKey,
        session_date: String,
        session_time: String,
    ) -> Result<RegistrationData, DatabaseError> {
        let learner = self.db.learner_by_user_id(user_id).await?;

        self.db
            .create_registration(NewRegistration {
                session_id,
                learner_id: learner.id,
                session_date,
                session_time,
            })
            .await
    }

    /// Deletes exactly one matching registration, if it exists
    pub async fn unregister(
        &self,
        user_id: PrimaryKey,
        session_id: PrimaryKey,
    ) -> Result<(), DatabaseError> {
        let learner = self.db.learner_by_user_id(user_id).await?;

        self.db.delete_registration(learner.id, session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, NewLearner, NewUser, Role, SqliteDatabase, UserData};

    async fn setup() -> (Arc<SqliteDatabase>, Registrations<SqliteDatabase>) {
        let db = Arc::new(
            SqliteDatabase::connect("sqlite::memory:")
                .await
                .expect("in-memory database connects"),
        );
        let registrations = Registrations::new(&db);

        (db, registrations)
    }

    async fn seed_learner(db: &SqliteDatabase) -> UserData {
        let user = db
            .create_user(NewUser {
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                password: "hash".to_string(),
                profile_image: String::new(),
                age: 21,
                role: Role::Learner,
            })
            .await
            .unwrap();

        db.create_learner(NewLearner {
            user_id: user.id,
            age: user.age,
            interest: "math".to_string(),
            gender: Gender::Other,
            goal: String::new(),
        })
        .await
        .unwrap();

        user
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (db, registrations) = setup().await;
        let user = seed_learner(&db).await;

        registrations
            .register(user.id, 1, "2024-01-01".to_string(), "10:00".to_string())
            .await
            .unwrap();

        let result = registrations
            .register(user.id, 1, "2024-01-01".to_string(), "10:00".to_string())
            .await;

        assert!(matches!(result, Err(DatabaseError::Conflict { .. })));
    }

    #[tokio::test]
    async fn unregister_removes_the_row() {
        let (db, registrations) = setup().await;
        let user = seed_learner(&db).await;

        registrations
            .register(user.id, 1, "2024-01-01".to_string(), "10:00".to_string())
            .await
            .unwrap();

        registrations.unregister(user.id, 1).await.unwrap();

        // The pair can register again once the row is gone
        registrations
            .register(user.id, 1, "2024-01-01".to_string(), "10:00".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unregister_without_registration_fails() {
        let (db, registrations) = setup().await;
        let user = seed_learner(&db).await;

        let result = registrations.unregister(user.id, 1).await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn register_without_profile_fails() {
        let (_db, registrations) = setup().await;

        let result = registrations
            .register(999, 1, "2024-01-01".to_string(), "10:00".to_string())
            .await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
