use std::{
    env,
    net::{Ipv6Addr, SocketAddr},
    sync::Arc,
};

use axum::{routing::get, Json, Router};
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use learnloop_market::SqliteMarket;

mod context;
mod docs;
mod errors;
mod learners;
mod quizzes;
mod registrations;
mod schemas;
mod serialized;
mod sessions;
mod tutors;
mod users;

pub use context::ServerContext;
pub use errors::{ServerError, ServerResult};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 5000;

/// Starts the LearnLoop server
pub async fn run_server(market: Arc<SqliteMarket>) {
    let port = env::var("LEARNLOOP_SERVER_PORT")
        .map(|x| x.parse::<u16>().expect("Port must be a number"))
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let context = ServerContext { market };

    let api_router = Router::new()
        .nest("/users", users::router())
        .nest("/learners", learners::router())
        .nest("/tutors", tutors::router())
        .nest("/sessions", sessions::router())
        .nest("/registration", registrations::router())
        .nest("/tests", quizzes::router());

    let root_router = Router::new()
        .route("/", get(index))
        .route("/api.json", get(serve_api))
        .nest("/api", api_router)
        .layer(cors)
        .with_state(context);

    let listener = TcpListener::bind(&addr).await.expect("listens on address");

    info!("Listening on port {port}");

    axum::serve(listener, root_router.into_make_service())
        .await
        .expect("server runs");
}

async fn index() -> &'static str {
    "LearnLoop is running"
}

async fn serve_api() -> Json<utoipa::openapi::OpenApi> {
    Json(docs::ApiDoc::openapi())
}
