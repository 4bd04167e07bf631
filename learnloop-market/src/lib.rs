mod auth;
mod db;
mod profiles;
mod quizzes;
mod registrations;
mod sessions;

use std::sync::Arc;

pub use auth::*;
pub use db::*;
pub use profiles::*;
pub use quizzes::*;
pub use registrations::*;
pub use sessions::*;

/// The LearnLoop marketplace, facilitating accounts, profiles, sessions, and quizzes.
pub struct Market<Db> {
    pub auth: Auth<Db>,
    pub profiles: Profiles<Db>,
    pub sessions: Sessions<Db>,
    pub registrations: Registrations<Db>,
    pub quizzes: Quizzes<Db>,
}

pub type SqliteMarket = Market<SqliteDatabase>;

impl<Db> Market<Db>
where
    Db: Database,
{
    pub fn new(database: Db) -> Self {
        let database = Arc::new(database);

        Self {
            auth: Auth::new(&database),
            profiles: Profiles::new(&database),
            sessions: Sessions::new(&database),
            registrations: Registrations::new(&database),
            quizzes: Quizzes::new(&database),
        }
    }
}
