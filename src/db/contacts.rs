//! Contact repository.
//!
//! Every operation is a single statement against the `contacts` table.

use super::DbError;
use crate::contact::{Contact, ContactId, NewContact, timestamp_from_millis};
use sqlx::SqlitePool;

/// Raw `contacts` row: id, name, email, phone, message, created_at (ms).
type ContactRow = (String, String, String, String, String, i64);

/// Repository for contact operations.
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new contact, assigning its id and creation time.
    pub async fn insert(&self, new: &NewContact) -> Result<Contact, DbError> {
        let id = ContactId::generate();
        let created_at = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, phone, message, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(new.name())
        .bind(new.email())
        .bind(new.phone())
        .bind(new.message())
        .bind(created_at)
        .execute(self.pool)
        .await?;

        Ok(Contact {
            id,
            name: new.name().to_string(),
            email: new.email().to_string(),
            phone: new.phone().to_string(),
            message: new.message().to_string(),
            created_at: timestamp_from_millis(created_at),
        })
    }

    /// All contacts, newest first. Rows created in the same millisecond keep
    /// insertion order (later insert first).
    pub async fn list(&self) -> Result<Vec<Contact>, DbError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, phone, message, created_at
            FROM contacts
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(from_row).collect()
    }

    /// Delete a contact by id, returning the removed record if it existed.
    pub async fn delete(&self, id: ContactId) -> Result<Option<Contact>, DbError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            DELETE FROM contacts
            WHERE id = ?
            RETURNING id, name, email, phone, message, created_at
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(from_row).transpose()
    }
}

fn from_row((id, name, email, phone, message, created_at): ContactRow) -> Result<Contact, DbError> {
    let id = id
        .parse::<ContactId>()
        .map_err(|e| DbError::CorruptRecord(e.to_string()))?;
    Ok(Contact {
        id,
        name,
        email,
        phone,
        message,
        created_at: timestamp_from_millis(created_at),
    })
}
