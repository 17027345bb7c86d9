use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::store::tables::USERS;
use crate::store::{Store, StoreError};

/// A tree owner. Subscribers are the program's "Forest Heroes".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_subscriber: bool,
}

impl Store {
    /// Insert or replace owners in one transaction.
    pub fn upsert_users(&self, users: &[User]) -> Result<usize, StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO {USERS} (id, email, display_name, is_subscriber)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(id) DO UPDATE SET
                         email = excluded.email,
                         display_name = excluded.display_name,
                         is_subscriber = excluded.is_subscriber"
                ))?;
                for user in users {
                    if user.email.trim().is_empty() {
                        return Err(StoreError::Validation(format!(
                            "user {} has no email",
                            user.id
                        )));
                    }
                    stmt.execute(params![
                        user.id,
                        user.email.trim(),
                        user.display_name,
                        user.is_subscriber
                    ])?;
                }
            }
            tx.commit()?;
            Ok(users.len())
        })
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    &format!(
                        "SELECT id, email, display_name, is_subscriber FROM {USERS} WHERE id = ?1"
                    ),
                    params![user_id],
                    |row| {
                        Ok(User {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            display_name: row.get(2)?,
                            is_subscriber: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(user)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.run_migrations().unwrap();
        store
    }

    #[test]
    fn upsert_replaces_existing_owner() {
        let store = store();
        let mut user = User {
            id: 7,
            email: "hero@example.com".into(),
            display_name: None,
            is_subscriber: false,
        };
        store.upsert_users(&[user.clone()]).unwrap();
        user.is_subscriber = true;
        store.upsert_users(&[user.clone()]).unwrap();

        assert_eq!(store.get_user(7).unwrap(), Some(user));
        assert_eq!(store.get_user(8).unwrap(), None);
    }

    #[test]
    fn blank_email_is_rejected_and_rolled_back() {
        let store = store();
        let users = vec![
            User {
                id: 1,
                email: "a@example.com".into(),
                display_name: None,
                is_subscriber: true,
            },
            User {
                id: 2,
                email: "  ".into(),
                display_name: None,
                is_subscriber: false,
            },
        ];
        let err = store.upsert_users(&users).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get_user(1).unwrap(), None);
    }
}
