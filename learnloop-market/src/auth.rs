use argon2::{
    password_hash::{Encoding, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;
use std::sync::Arc;
use thiserror::Error;

use crate::{Database, DatabaseError, NewUser, PrimaryKey, Role, UpdatedUser, UserData};

/// Manages LearnLoop accounts and credential checks
pub struct Auth<Db> {
    db: Arc<Db>,
    argon: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is incorrect
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
}

impl<Db> Auth<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self {
            db: db.clone(),
            argon: Argon2::default(),
        }
    }

    /// Creates a new account, storing the password as an argon2 hash
    pub async fn register(&self, new_account: NewAccount) -> Result<UserData, AuthError> {
        let hashed_password = self.hash(&new_account.password)?;

        self.db
            .create_user(NewUser {
                name: new_account.name,
                email: new_account.email,
                password: hashed_password,
                profile_image: new_account.profile_image,
                age: new_account.age,
                role: new_account.role,
            })
            .await
            .map_err(AuthError::Db)
    }

    /// Verifies credentials, returning the matching user
    pub async fn login(&self, credentials: Credentials) -> Result<UserData, AuthError> {
        let user = self
            .db
            .user_by_email(&credentials.email)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => AuthError::InvalidCredentials,
                err => AuthError::Db(err),
            })?;

        let stored_password = PasswordHash::parse(&user.password, Encoding::default())
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        self.argon
            .verify_password(credentials.password.as_bytes(), &stored_password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(user)
    }

    pub async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData, DatabaseError> {
        self.db.user_by_id(user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserData>, DatabaseError> {
        self.db.list_users().await
    }

    /// Updates an account. A supplied password is re-hashed before storage.
    pub async fn update_account(
        &self,
        mut updated_user: UpdatedUser,
    ) -> Result<UserData, AuthError> {
        if let Some(password) = updated_user.password.take() {
            updated_user.password = Some(self.hash(&password)?);
        }

        self.db
            .update_user(updated_user)
            .await
            .map_err(AuthError::Db)
    }

    /// Deletes an account along with any profile rows it owns.
    /// The profile deletes are idempotent, the account delete is not.
    pub async fn delete_account(&self, user_id: PrimaryKey) -> Result<(), DatabaseError> {
        self.db.delete_learner_by_user_id(user_id).await?;
        self.db.delete_tutor_by_user_id(user_id).await?;
        self.db.delete_user(user_id).await
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashError(e.to_string()))
    }
}

#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_image: String,
    pub age: i64,
    pub role: Role,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteDatabase;

    async fn auth() -> Auth<SqliteDatabase> {
        let db = Arc::new(
            SqliteDatabase::connect("sqlite::memory:")
                .await
                .expect("in-memory database connects"),
        );

        Auth::new(&db)
    }

    fn account(email: &str, role: Role) -> NewAccount {
        NewAccount {
            name: "Sam".to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            profile_image: String::new(),
            age: 21,
            role,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = auth().await;

        let user = auth
            .register(account("sam@example.com", Role::Learner))
            .await
            .unwrap();

        // The stored password is a PHC string, not the plaintext
        assert_ne!(user.password, "hunter22");
        assert!(user.password.starts_with("$argon2"));

        let logged_in = auth
            .login(Credentials {
                email: "sam@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(logged_in.id, user.id);
        assert_eq!(logged_in.role, Role::Learner);
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let auth = auth().await;

        auth.register(account("sam@example.com", Role::Learner))
            .await
            .unwrap();

        let result = auth
            .login(Credentials {
                email: "sam@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_with_unknown_email_fails() {
        let auth = auth().await;

        let result = auth
            .login(Credentials {
                email: "nobody@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn register_with_taken_email_conflicts() {
        let auth = auth().await;

        auth.register(account("sam@example.com", Role::Learner))
            .await
            .unwrap();

        let result = auth.register(account("sam@example.com", Role::Tutor)).await;

        assert!(matches!(
            result,
            Err(AuthError::Db(DatabaseError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn password_change_invalidates_old_password() {
        let auth = auth().await;

        let user = auth
            .register(account("sam@example.com", Role::Learner))
            .await
            .unwrap();

        auth.update_account(UpdatedUser {
            id: user.id,
            password: Some("new-password".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        let old = auth
            .login(Credentials {
                email: "sam@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await;
        assert!(matches!(old, Err(AuthError::InvalidCredentials)));

        auth.login(Credentials {
            email: "sam@example.com".to_string(),
            password: "new-password".to_string(),
        })
        .await
        .expect("new password logs in");
    }

    #[tokio::test]
    async fn deleting_a_deleted_account_fails() {
        let auth = auth().await;

        let user = auth
            .register(account("sam@example.com", Role::Learner))
            .await
            .unwrap();

        auth.delete_account(user.id).await.unwrap();
        let result = auth.delete_account(user.id).await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
