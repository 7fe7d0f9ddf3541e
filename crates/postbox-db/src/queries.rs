use crate::Database;
use crate::models::NewMessage;
use anyhow::Result;
use rusqlite::params;

const INSERT_MESSAGE: &str = "INSERT INTO messages (name, phone, message) VALUES (?1, ?2, ?3)";

impl Database {
    // -- Messages --

    /// Insert one message and return the id SQLite assigned to it.
    pub fn insert_message(&self, msg: &NewMessage) -> Result<i64> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(INSERT_MESSAGE)?;
            let id = stmt.insert(params![msg.name, msg.phone, msg.message])?;
            Ok(id)
        })
    }

    #[cfg(test)]
    pub(crate) fn get_message(&self, id: i64) -> Result<Option<crate::models::MessageRow>> {
        use crate::models::MessageRow;
        use rusqlite::OptionalExtension;

        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, phone, message, created_at FROM messages WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(MessageRow {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            phone: row.get(2)?,
                            message: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn count_messages(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?;
            Ok(count as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> NewMessage {
        NewMessage {
            name: name.to_string(),
            phone: "+375291234567".to_string(),
            message: "Привет!".to_string(),
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_message(&sample("Иван")).unwrap();
        let second = db.insert_message(&sample("Мария")).unwrap();
        assert!(second > first);
        assert_eq!(db.count_messages().unwrap(), 2);
    }

    #[test]
    fn insert_stores_values_and_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_message(&sample("Иван")).unwrap();

        let row = db.get_message(id).unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.name, "Иван");
        assert_eq!(row.phone, "+375291234567");
        assert_eq!(row.message, "Привет!");
        assert!(!row.created_at.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_message(&sample("Иван")).unwrap();
        db.with_conn(|conn| {
            conn.execute("DELETE FROM messages WHERE id = ?1", [first])?;
            Ok(())
        })
        .unwrap();

        let second = db.insert_message(&sample("Мария")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn missing_message_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_message(42).unwrap().is_none());
    }
}
