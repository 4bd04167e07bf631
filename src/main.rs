use std::{env, sync::Arc};

use colored::Colorize;
use learnloop_market::{DatabaseError, Market, SqliteDatabase, SqliteMarket};
use learnloop_server::run_server;
use log::{error, info};
use thiserror::Error;
use tokio::runtime::{self, Runtime};

mod logging;

/// Default store location, next to the binary
const DEFAULT_DATABASE_URL: &str = "sqlite://learnloop.db?mode=rwc";

struct LearnLoop {
    market: Arc<SqliteMarket>,
    runtime: Runtime,
}

#[derive(Debug, Error)]
enum LearnLoopError {
    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl LearnLoop {
    fn new() -> Result<Self, LearnLoopError> {
        info!("Building async runtime...");
        let main_runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("learnloop-async")
            .build()
            .map_err(|e| LearnLoopError::Fatal(e.to_string()))?;

        info!("Connecting to database...");
        let url = env::var("LEARNLOOP_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let database = main_runtime.block_on(SqliteDatabase::connect(&url))?;

        Ok(Self {
            market: Arc::new(Market::new(database)),
            runtime: main_runtime,
        })
    }

    fn run(&self) {
        self.runtime.block_on(run_server(self.market.clone()))
    }
}

impl LearnLoopError {
    fn hint(&self) -> String {
        match self {
            LearnLoopError::Database(_) => "This is a database error. Make sure the database file is writable, or point LEARNLOOP_DATABASE_URL somewhere else, then try again.".to_string(),
            LearnLoopError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();
    logging::init_logger();

    match LearnLoop::new() {
        Ok(app) => {
            info!("Initialized successfully.");
            app.run();
        }
        Err(error) => {
            error!(
                "{} Read the error below to troubleshoot the issue. If you think this might be a bug, please report it by making a GitHub issue.",
                "LearnLoop failed to start!".bold().red()
            );
            error!("{}", error);
            error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
        }
    }
}
