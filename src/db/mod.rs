pub mod connection;
pub mod listings;
pub mod sessions;
pub mod users;

pub use connection::{init_db, Database};

/// In-memory connection with the production schema applied.
#[cfg(test)]
pub fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", true).unwrap();
    conn.execute_batch(include_str!("../../sql/schema.sql"))
        .unwrap();
    conn
}
