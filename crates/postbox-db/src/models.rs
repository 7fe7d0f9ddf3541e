/// Database row types. These map directly to SQLite rows and stay separate
/// from the wire types in postbox-types.

#[cfg(test)]
pub(crate) struct MessageRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub created_at: String,
}

/// Values for one insert; `id` and `created_at` come from SQLite.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub name: String,
    pub phone: String,
    pub message: String,
}
