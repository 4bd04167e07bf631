use std::sync::Arc;

use learnloop_market::SqliteMarket;

#[derive(Clone)]
pub struct ServerContext {
    pub market: Arc<SqliteMarket>,
}
