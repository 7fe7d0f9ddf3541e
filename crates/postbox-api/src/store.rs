use anyhow::Result;

use postbox_db::Database;
use postbox_db::models::NewMessage;

/// Write side of the message table, as seen by the submission handler.
pub trait MessageStore: Send + Sync + 'static {
    /// Persist one message and return its assigned id.
    fn insert_message(&self, msg: &NewMessage) -> Result<i64>;
}

impl MessageStore for Database {
    fn insert_message(&self, msg: &NewMessage) -> Result<i64> {
        Database::insert_message(self, msg)
    }
}
