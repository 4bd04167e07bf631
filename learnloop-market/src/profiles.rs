use std::sync::Arc;
use thiserror::Error;

use crate::{
    Database, DatabaseError, Gender, LearnerData, NewLearner, NewTutor, PrimaryKey, Role,
    TutorData, UpdatedLearner, UpdatedTutor, UpdatedUser, UserData,
};

/// Manages the role-specific profile attached to each account
pub struct Profiles<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    /// The account's role does not match the profile kind
    #[error("user is registered as a {actual}, expected a {expected}")]
    InvalidRole { expected: Role, actual: Role },
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// Whether an upsert created a new profile or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// A learner profile along with a restricted projection of the owning user
#[derive(Debug, Clone)]
pub struct LearnerProfile {
    pub learner: LearnerData,
    pub user: UserData,
}

/// A tutor profile along with a restricted projection of the owning user
#[derive(Debug, Clone)]
pub struct TutorProfile {
    pub tutor: TutorData,
    pub user: UserData,
}

#[derive(Debug)]
pub struct LearnerUpsert {
    pub user_id: PrimaryKey,
    pub age: Option<i64>,
    pub interest: Option<String>,
    pub gender: Option<Gender>,
    pub goal: Option<String>,
}

#[derive(Debug)]
pub struct TutorUpsert {
    pub user_id: PrimaryKey,
    pub age: Option<i64>,
    pub domain: Option<String>,
    pub professional: Option<String>,
    pub work_experience: Option<String>,
}

impl<Db> Profiles<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Creates or partially updates the learner profile of a user.
    /// A supplied age is propagated to the owning user row as well.
    pub async fn upsert_learner(
        &self,
        upsert: LearnerUpsert,
    ) -> Result<(LearnerData, Upserted), ProfileError> {
        let user = self.checked_user(upsert.user_id, Role::Learner).await?;

        let result = match self.db.learner_by_user_id(upsert.user_id).await {
            Ok(_) => {
                let learner = self
                    .db
                    .update_learner(UpdatedLearner {
                        user_id: upsert.user_id,
                        age: upsert.age,
                        interest: upsert.interest,
                        gender: upsert.gender,
                        goal: upsert.goal,
                    })
                    .await?;

                (learner, Upserted::Updated)
            }
            Err(DatabaseError::NotFound { .. }) => {
                let learner = self
                    .db
                    .create_learner(NewLearner {
                        user_id: upsert.user_id,
                        age: upsert.age.unwrap_or(user.age),
                        interest: upsert.interest.unwrap_or_default(),
                        gender: upsert.gender.unwrap_or(Gender::Other),
                        goal: upsert.goal.unwrap_or_default(),
                    })
                    .await?;

                (learner, Upserted::Created)
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(age) = upsert.age {
            self.sync_user_age(upsert.user_id, age).await?;
        }

        Ok(result)
    }

    /// Creates or partially updates the tutor profile of a user
    pub async fn upsert_tutor(
        &self,
        upsert: TutorUpsert,
    ) -> Result<(TutorData, Upserted), ProfileError> {
        let user = self.checked_user(upsert.user_id, Role::Tutor).await?;

        let result = match self.db.tutor_by_user_id(upsert.user_id).await {
            Ok(_) => {
                let tutor = self
                    .db
                    .update_tutor(UpdatedTutor {
                        user_id: upsert.user_id,
                        age: upsert.age,
                        domain: upsert.domain,
                        professional: upsert.professional,
                        work_experience: upsert.work_experience,
                    })
                    .await?;

                (tutor, Upserted::Updated)
            }
            Err(DatabaseError::NotFound { .. }) => {
                let tutor = self
                    .db
                    .create_tutor(NewTutor {
                        user_id: upsert.user_id,
                        age: upsert.age.unwrap_or(user.age),
                        domain: upsert.domain.unwrap_or_default(),
                        professional: upsert.professional.unwrap_or_default(),
                        work_experience: upsert.work_experience.unwrap_or_default(),
                    })
                    .await?;

                (tutor, Upserted::Created)
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(age) = upsert.age {
            self.sync_user_age(upsert.user_id, age).await?;
        }

        Ok(result)
    }

    pub async fn learner_for_user(
        &self,
        user_id: PrimaryKey,
    ) -> Result<LearnerProfile, DatabaseError> {
        let learner = self.db.learner_by_user_id(user_id).await?;
        let user = self.db.user_by_id(user_id).await?;

        Ok(LearnerProfile { learner, user })
    }

    pub async fn tutor_for_user(&self, user_id: PrimaryKey) -> Result<TutorProfile, DatabaseError> {
        let tutor = self.db.tutor_by_user_id(user_id).await?;
        let user = self.db.user_by_id(user_id).await?;

        Ok(TutorProfile { tutor, user })
    }

    pub async fn list_learners(&self) -> Result<Vec<LearnerProfile>, DatabaseError> {
        let mut profiles = vec![];

        for learner in self.db.list_learners().await? {
            let user = self.db.user_by_id(learner.user_id).await?;
            profiles.push(LearnerProfile { learner, user });
        }

        Ok(profiles)
    }

    pub async fn list_tutors(&self) -> Result<Vec<TutorProfile>, DatabaseError> {
        let mut profiles = vec![];

        for tutor in self.db.list_tutors().await? {
            let user = self.db.user_by_id(tutor.user_id).await?;
            profiles.push(TutorProfile { tutor, user });
        }

        Ok(profiles)
    }

    /// Writes the age to both the learner profile and the owning user row.
    /// The two writes are separate statements, not a transaction.
    pub async fn sync_learner_age(
        &self,
        user_id: PrimaryKey,
        age: i64,
    ) -> Result<(), DatabaseError> {
        self.db
            .update_learner(UpdatedLearner {
                user_id,
                age: Some(age),
                interest: None,
                gender: None,
                goal: None,
            })
            .await?;

        self.sync_user_age(user_id, age).await
    }

    /// Writes the age to both the tutor profile and the owning user row
    pub async fn sync_tutor_age(&self, user_id: PrimaryKey, age: i64) -> Result<(), DatabaseError> {
        self.db
            .update_tutor(UpdatedTutor {
                user_id,
                age: Some(age),
                domain: None,
                professional: None,
                work_experience: None,
            })
            .await?;

        self.sync_user_age(user_id, age).await
    }

    /// Deletes the learner profile and the owning account.
    /// The profile delete is idempotent, so a crash between the two steps
    /// leaves an account the presentation layer treats as incomplete.
    pub async fn delete_learner_account(&self, user_id: PrimaryKey) -> Result<(), DatabaseError> {
        self.db.delete_learner_by_user_id(user_id).await?;
        self.db.delete_user(user_id).await
    }

    /// Deletes the tutor profile and the owning account
    pub async fn delete_tutor_account(&self, user_id: PrimaryKey) -> Result<(), DatabaseError> {
        self.db.delete_tutor_by_user_id(user_id).await?;
        self.db.delete_user(user_id).await
    }

    async fn checked_user(
        &self,
        user_id: PrimaryKey,
        expected: Role,
    ) -> Result<UserData, ProfileError> {
        let user = self.db.user_by_id(user_id).await?;

        if user.role != expected {
            return Err(ProfileError::InvalidRole {
                expected,
                actual: user.role,
            });
        }

        Ok(user)
    }

    async fn sync_user_age(&self, user_id: PrimaryKey, age: i64) -> Result<(), DatabaseError> {
        self.db
            .update_user(UpdatedUser {
                id: user_id,
                age: Some(age),
                ..Default::default()
            })
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewUser, SqliteDatabase};

    async fn setup() -> (Arc<SqliteDatabase>, Profiles<SqliteDatabase>) {
        let db = Arc::new(
            SqliteDatabase::connect("sqlite::memory:")
                .await
                .expect("in-memory database connects"),
        );
        let profiles = Profiles::new(&db);

        (db, profiles)
    }

    async fn seed_user(db: &SqliteDatabase, email: &str, role: Role) -> UserData {
        db.create_user(NewUser {
            name: "Sam".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            profile_image: String::new(),
            age: 21,
            role,
        })
        .await
        .unwrap()
    }

    fn learner_upsert(user_id: PrimaryKey) -> LearnerUpsert {
        LearnerUpsert {
            user_id,
            age: Some(20),
            interest: Some("math".to_string()),
            gender: None,
            goal: None,
        }
    }

    #[tokio::test]
    async fn upsert_twice_yields_one_profile() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        let (first, outcome) = profiles.upsert_learner(learner_upsert(user.id)).await.unwrap();
        assert_eq!(outcome, Upserted::Created);

        let (second, outcome) = profiles
            .upsert_learner(LearnerUpsert {
                user_id: user.id,
                age: Some(22),
                interest: None,
                gender: None,
                goal: Some("ace the exam".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(outcome, Upserted::Updated);
        assert_eq!(second.id, first.id);
        assert_eq!(second.age, 22);
        // Omitted fields keep their previous values
        assert_eq!(second.interest, "math");
        assert_eq!(second.goal, "ace the exam");

        assert_eq!(db.list_learners().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_age_propagates_to_user() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        profiles.upsert_learner(learner_upsert(user.id)).await.unwrap();

        let user = db.user_by_id(user.id).await.unwrap();
        assert_eq!(user.age, 20);
    }

    #[tokio::test]
    async fn created_profile_defaults_age_to_owner() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        let (learner, _) = profiles
            .upsert_learner(LearnerUpsert {
                user_id: user.id,
                age: None,
                interest: None,
                gender: None,
                goal: None,
            })
            .await
            .unwrap();

        assert_eq!(learner.age, user.age);
        assert_eq!(learner.gender, Gender::Other);
        assert_eq!(learner.interest, "");
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_role() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "ada@example.com", Role::Tutor).await;

        let result = profiles.upsert_learner(learner_upsert(user.id)).await;

        assert!(matches!(
            result,
            Err(ProfileError::InvalidRole {
                expected: Role::Learner,
                actual: Role::Tutor,
            })
        ));
    }

    #[tokio::test]
    async fn upsert_for_missing_user_fails() {
        let (_db, profiles) = setup().await;

        let result = profiles.upsert_learner(learner_upsert(999)).await;

        assert!(matches!(
            result,
            Err(ProfileError::Db(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn profile_fetch_includes_owner() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        profiles.upsert_learner(learner_upsert(user.id)).await.unwrap();

        let profile = profiles.learner_for_user(user.id).await.unwrap();
        assert_eq!(profile.user.name, "Sam");
        assert_eq!(profile.user.email, "sam@example.com");
        assert_eq!(profile.learner.interest, "math");
    }

    #[tokio::test]
    async fn fetch_without_profile_fails() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        let result = profiles.learner_for_user(user.id).await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn sync_age_updates_both_rows() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        profiles.upsert_learner(learner_upsert(user.id)).await.unwrap();
        profiles.sync_learner_age(user.id, 33).await.unwrap();

        assert_eq!(db.learner_by_user_id(user.id).await.unwrap().age, 33);
        assert_eq!(db.user_by_id(user.id).await.unwrap().age, 33);
    }

    #[tokio::test]
    async fn delete_account_removes_profile_and_user() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        profiles.upsert_learner(learner_upsert(user.id)).await.unwrap();
        profiles.delete_learner_account(user.id).await.unwrap();

        assert!(db.learner_by_user_id(user.id).await.is_err());
        assert!(db.user_by_id(user.id).await.is_err());
    }

    #[tokio::test]
    async fn delete_account_without_profile_still_deletes_user() {
        let (db, profiles) = setup().await;
        let user = seed_user(&db, "sam@example.com", Role::Learner).await;

        profiles.delete_learner_account(user.id).await.unwrap();

        assert!(db.user_by_id(user.id).await.is_err());
    }
}
