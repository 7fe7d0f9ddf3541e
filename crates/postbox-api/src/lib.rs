pub mod error;
pub mod health;
pub mod messages;
pub mod router;
pub mod store;

use std::sync::Arc;

use crate::store::MessageStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn MessageStore>,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn MessageStore>) -> AppState {
        Arc::new(Self { store })
    }
}
