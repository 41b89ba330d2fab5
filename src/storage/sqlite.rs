//! SQLite storage implementation.
//!
//! This module provides the storage backend for missions. Every write goes
//! through [`SqliteStorage::mutate`], which wraps the change in its own
//! transaction and reports recorded changes only after commit.

use crate::error::{Error, Result};
use crate::model::{Outcome, Task, User};
use crate::storage::events::{EventType, MutationContext};
use crate::storage::schema::apply_schema;
use crate::validate;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// How long a writer waits on another process's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based storage backend.
///
/// Owns the connection; dropping the handle closes it.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// A deleted user and how many of its tasks went with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedUser {
    pub user: User,
    pub tasks_removed: usize,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the file, its parent directory and the schema if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Execute a mutation in its own transaction.
    ///
    /// This method:
    /// 1. Begins an IMMEDIATE transaction (for write locking)
    /// 2. Executes the mutation closure
    /// 3. Commits, or rolls back if the closure returned an error
    /// 4. Logs the changes the closure recorded
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or an error from begin/commit.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op);

        // Dropping an uncommitted transaction rolls it back
        let result = match f(&tx, &mut ctx) {
            Ok(result) => result,
            Err(e) => {
                debug!(op, error = %e, "Rolled back");
                return Err(e);
            }
        };

        tx.commit()?;
        ctx.emit();

        Ok(result)
    }

    // ===============
    // User Operations
    // ===============

    /// Look up a user by exact, case-sensitive email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. A miss is `Ok(None)`.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(find_user_by_email(&self.conn, email)?)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                [id],
                User::from_row,
            )
            .optional()?;

        Ok(user)
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - [`Error::RequiredField`] if name or email is empty
    /// - [`Error::EmailInUse`] if the email is already registered, whether
    ///   found up front or only by the `UNIQUE` constraint at write time
    pub fn create_user(&mut self, name: &str, email: &str) -> Result<User> {
        validate::require("Name", name)?;
        validate::require("Email", email)?;

        if self.get_user_by_email(email)?.is_some() {
            return Err(Error::EmailInUse {
                email: email.to_string(),
            });
        }

        self.insert_user(name, email)
    }

    /// Insert a user without the up-front email check.
    ///
    /// The constraint still guards uniqueness; this is the write half of
    /// [`create_user`](Self::create_user).
    pub(crate) fn insert_user(&mut self, name: &str, email: &str) -> Result<User> {
        self.mutate("create_user", |tx, ctx| {
            tx.execute(
                "INSERT INTO users (name, email) VALUES (?1, ?2)",
                rusqlite::params![name, email],
            )
            .map_err(|e| email_conflict(e, email))?;

            let id = tx.last_insert_rowid();
            ctx.record_event(id, EventType::UserCreated);

            Ok(User {
                id,
                name: name.to_string(),
                email: email.to_string(),
            })
        })
    }

    /// Stream every user, in insertion order, through `f`.
    ///
    /// Rows are read one at a time. Each call starts a fresh query, so the
    /// sequence can be walked again. Returns the number of users visited.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or `f` returns one.
    pub fn each_user<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(User) -> Result<()>,
    {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY id")?;
        let mut rows = stmt.query([])?;

        let mut count = 0;
        while let Some(row) = rows.next()? {
            f(User::from_row(row)?)?;
            count += 1;
        }

        Ok(count)
    }

    /// List all users in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut users = Vec::new();
        self.each_user(|user| {
            users.push(user);
            Ok(())
        })?;
        Ok(users)
    }

    /// Overwrite a user's name and/or email.
    ///
    /// `None` leaves a field unchanged. `Some(value)` writes `value`
    /// verbatim. A blank email is accepted; a blank name is not.
    ///
    /// # Errors
    ///
    /// - [`Error::RequiredField`] if `new_name` is `Some("")`
    /// - [`Error::UserNotFound`] if no user has `email`
    /// - [`Error::EmailInUse`] if the new email belongs to another user;
    ///   the update is rolled back, name included
    pub fn update_user(
        &mut self,
        email: &str,
        new_name: Option<&str>,
        new_email: Option<&str>,
    ) -> Result<User> {
        if let Some(name) = new_name {
            validate::require("Name", name)?;
        }
        if new_email == Some("") {
            warn!(email, "Writing a blank email");
        }

        self.mutate("update_user", |tx, ctx| {
            let user = find_user_by_email(tx, email)?.ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
            })?;

            let name = new_name.unwrap_or(user.name.as_str());
            let target_email = new_email.unwrap_or(user.email.as_str());

            tx.execute(
                "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
                rusqlite::params![name, target_email, user.id],
            )
            .map_err(|e| email_conflict(e, target_email))?;

            ctx.record_event(user.id, EventType::UserUpdated);

            Ok(User {
                id: user.id,
                name: name.to_string(),
                email: target_email.to_string(),
            })
        })
    }

    /// Delete a user and all of its tasks.
    ///
    /// `confirm` is shown the user before anything is written; returning
    /// `false` makes this a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if no user has `email`, or any error
    /// from `confirm`.
    pub fn delete_user<F>(&mut self, email: &str, confirm: F) -> Result<Outcome<DeletedUser>>
    where
        F: FnOnce(&User) -> Result<bool>,
    {
        let user = self
            .get_user_by_email(email)?
            .ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
            })?;

        if !confirm(&user)? {
            debug!(user_id = user.id, "Delete declined");
            return Ok(Outcome::Declined);
        }

        let tasks_removed = self.mutate("delete_user", |tx, ctx| {
            // The foreign key cascades too; deleting explicitly gives the count
            let tasks_removed = tx.execute("DELETE FROM tasks WHERE user_id = ?1", [user.id])?;

            let rows = tx.execute("DELETE FROM users WHERE id = ?1", [user.id])?;
            if rows == 0 {
                return Err(Error::UserNotFound {
                    email: email.to_string(),
                });
            }

            ctx.record_detail(
                user.id,
                EventType::UserDeleted,
                format!("{tasks_removed} tasks"),
            );

            Ok(tasks_removed)
        })?;

        Ok(Outcome::Applied(DeletedUser {
            user,
            tasks_removed,
        }))
    }

    // ===============
    // Task Operations
    // ===============

    /// Get a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, title, description, user_id FROM tasks WHERE id = ?1",
                [id],
                Task::from_row,
            )
            .optional()?;

        Ok(task)
    }

    /// Add a task for the user with `email`.
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] if no user has `email`
    /// - [`Error::RequiredField`] if title or description is empty
    /// - [`Error::TitleTooLong`] if the title exceeds the display width
    pub fn create_task(&mut self, email: &str, title: &str, description: &str) -> Result<Task> {
        self.mutate("create_task", |tx, ctx| {
            let user = find_user_by_email(tx, email)?.ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
            })?;

            validate::require("Title", title)?;
            validate::require("Description", description)?;
            validate::check_title(title)?;

            tx.execute(
                "INSERT INTO tasks (title, description, user_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![title, description, user.id],
            )?;

            let id = tx.last_insert_rowid();
            ctx.record_event(id, EventType::TaskCreated);

            Ok(Task {
                id,
                title: Some(title.to_string()),
                description: Some(description.to_string()),
                user_id: user.id,
            })
        })
    }

    /// Stream the tasks of the user with `email`, in creation order.
    ///
    /// Returns the number of tasks visited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if no user has `email`, or any error
    /// from the query or `f`.
    pub fn each_task_for_user<F>(&self, email: &str, mut f: F) -> Result<usize>
    where
        F: FnMut(Task) -> Result<()>,
    {
        let user = self
            .get_user_by_email(email)?
            .ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
            })?;

        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, user_id FROM tasks WHERE user_id = ?1 ORDER BY id",
        )?;
        let mut rows = stmt.query([user.id])?;

        let mut count = 0;
        while let Some(row) = rows.next()? {
            f(Task::from_row(row)?)?;
            count += 1;
        }

        Ok(count)
    }

    /// List the tasks of the user with `email`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if no user has `email`.
    pub fn list_tasks_for_user(&self, email: &str) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        self.each_task_for_user(email, |task| {
            tasks.push(task);
            Ok(())
        })?;
        Ok(tasks)
    }

    /// Delete one of a user's tasks.
    ///
    /// The task must belong to the user with `email`. `confirm` is shown the
    /// task before anything is written; returning `false` makes this a no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] if no user has `email`
    /// - [`Error::TaskNotFound`] if `task_id` is not one of that user's tasks
    pub fn delete_task<F>(&mut self, email: &str, task_id: i64, confirm: F) -> Result<Outcome<Task>>
    where
        F: FnOnce(&Task) -> Result<bool>,
    {
        let user = self
            .get_user_by_email(email)?
            .ok_or_else(|| Error::UserNotFound {
                email: email.to_string(),
            })?;

        let not_found = || Error::TaskNotFound {
            id: task_id,
            email: email.to_string(),
        };

        let task = self
            .get_task(task_id)?
            .filter(|t| t.user_id == user.id)
            .ok_or_else(not_found)?;

        if !confirm(&task)? {
            debug!(task_id, "Delete declined");
            return Ok(Outcome::Declined);
        }

        self.mutate("delete_task", |tx, ctx| {
            let rows = tx.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![task_id, user.id],
            )?;

            if rows == 0 {
                return Err(not_found());
            }

            ctx.record_event(task_id, EventType::TaskDeleted);
            Ok(())
        })?;

        Ok(Outcome::Applied(task))
    }

    // ========
    // Counting
    // ========

    /// Number of registered users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of tasks across all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_tasks(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn find_user_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email FROM users WHERE email = ?1",
        [email],
        User::from_row,
    )
    .optional()
}

/// Map a `UNIQUE` violation on `users.email` to a recoverable conflict.
fn email_conflict(err: rusqlite::Error, email: &str) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::EmailInUse {
                email: email.to_string(),
            }
        }
        e => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks_for_user_id(storage: &SqliteStorage, user_id: i64) -> i64 {
        storage
            .conn
            .query_row(
                "SELECT COUNT(*) FROM tasks WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_open_creates_parent_dir_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("missions.db");

        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            storage.create_user("Ada", "ada@x.com").unwrap();
        }

        // Reopening applies the schema again without touching data
        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.count_users().unwrap(), 1);
    }

    #[test]
    fn test_open_sets_busy_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(&dir.path().join("missions.db")).unwrap();

        let timeout: i64 = storage
            .conn
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);
    }

    #[test]
    fn test_create_then_lookup_user() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        let created = storage.create_user("Ada", "ada@x.com").unwrap();
        let found = storage.get_user_by_email("ada@x.com").unwrap().unwrap();

        assert_eq!(found, created);
        assert_eq!(found.name, "Ada");
        assert_eq!(found.email, "ada@x.com");
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();

        assert!(storage.get_user_by_email("ADA@x.com").unwrap().is_none());
        assert!(storage.get_user_by_email("ada@x.co").unwrap().is_none());
        assert!(storage.get_user_by_email("").unwrap().is_none());
    }

    #[test]
    fn test_create_user_requires_fields() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        assert!(matches!(
            storage.create_user("", "ada@x.com"),
            Err(Error::RequiredField { field: "Name" })
        ));
        assert!(matches!(
            storage.create_user("Ada", ""),
            Err(Error::RequiredField { field: "Email" })
        ));
        assert_eq!(storage.count_users().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_user_is_conflict() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        storage.create_user("Bob", "b@x.com").unwrap();
        let err = storage.create_user("Bob", "b@x.com").unwrap_err();

        assert!(err.is_conflict());
        let users = storage.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Bob");
    }

    #[test]
    fn test_conflict_caught_at_write_time() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Bob", "b@x.com").unwrap();

        // Skip the pre-check, as if another writer got in between
        let err = storage.insert_user("Robert", "b@x.com").unwrap_err();

        assert!(matches!(err, Error::EmailInUse { ref email } if email == "b@x.com"));
        assert_eq!(storage.count_users().unwrap(), 1);

        // The session is still usable afterwards
        storage.create_user("Carol", "c@x.com").unwrap();
        assert_eq!(storage.count_users().unwrap(), 2);
    }

    #[test]
    fn test_task_scenario() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_task("ada@x.com", "Fix bug", "desc").unwrap();

        let tasks = storage.list_tasks_for_user("ada@x.com").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title.as_deref(), Some("Fix bug"));
        assert_eq!(tasks[0].description.as_deref(), Some("desc"));
    }

    #[test]
    fn test_create_task_for_unknown_user() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        let err = storage
            .create_task("ghost@x.com", "Fix bug", "desc")
            .unwrap_err();

        assert!(matches!(err, Error::UserNotFound { .. }));
        assert_eq!(storage.count_tasks().unwrap(), 0);
    }

    #[test]
    fn test_create_task_validation_writes_nothing() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();

        assert!(matches!(
            storage.create_task("ada@x.com", "", "desc"),
            Err(Error::RequiredField { field: "Title" })
        ));
        assert!(matches!(
            storage.create_task("ada@x.com", "Fix bug", ""),
            Err(Error::RequiredField { field: "Description" })
        ));
        assert!(matches!(
            storage.create_task("ada@x.com", &"x".repeat(60), "desc"),
            Err(Error::TitleTooLong { .. })
        ));
        assert_eq!(storage.count_tasks().unwrap(), 0);
    }

    #[test]
    fn test_multibyte_title_bound_is_in_chars() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();

        // 59 chars but 118 bytes passes validation and the CHECK constraint
        let title = "é".repeat(59);
        let task = storage.create_task("ada@x.com", &title, "d").unwrap();
        let stored = storage.get_task(task.id).unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some(title.as_str()));

        assert!(matches!(
            storage.create_task("ada@x.com", &"é".repeat(60), "d"),
            Err(Error::TitleTooLong { max: 59, actual: 60 })
        ));
        assert_eq!(storage.count_tasks().unwrap(), 1);
    }

    #[test]
    fn test_list_tasks_for_unknown_user() {
        let storage = SqliteStorage::open_memory().unwrap();
        assert!(matches!(
            storage.list_tasks_for_user("ghost@x.com"),
            Err(Error::UserNotFound { .. })
        ));
    }

    #[test]
    fn test_list_tasks_only_for_owner() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_user("Bob", "b@x.com").unwrap();
        storage.create_task("ada@x.com", "one", "d").unwrap();
        storage.create_task("b@x.com", "two", "d").unwrap();
        storage.create_task("ada@x.com", "three", "d").unwrap();

        let titles: Vec<String> = storage
            .list_tasks_for_user("ada@x.com")
            .unwrap()
            .into_iter()
            .filter_map(|t| t.title)
            .collect();
        assert_eq!(titles, ["one", "three"]);
    }

    #[test]
    fn test_each_user_is_restartable() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_user("Bob", "b@x.com").unwrap();

        let mut first = Vec::new();
        let n = storage
            .each_user(|u| {
                first.push(u.email);
                Ok(())
            })
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(first, ["ada@x.com", "b@x.com"]);

        // Errors from the callback stop the walk
        let mut seen = 0;
        let result = storage.each_user(|_| {
            seen += 1;
            Err(Error::InvalidArgument("stop".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);

        assert_eq!(storage.list_users().unwrap().len(), 2);
    }

    #[test]
    fn test_update_user() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let ada = storage.create_user("Ada", "ada@x.com").unwrap();

        let updated = storage
            .update_user("ada@x.com", Some("Ada L."), Some("ada@l.com"))
            .unwrap();
        assert_eq!(updated.id, ada.id);
        assert!(storage.get_user_by_email("ada@x.com").unwrap().is_none());

        let found = storage.get_user_by_email("ada@l.com").unwrap().unwrap();
        assert_eq!(found.name, "Ada L.");
    }

    #[test]
    fn test_update_user_keep_and_blank() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();

        // None keeps the current value
        let kept = storage
            .update_user("ada@x.com", Some("Ada L."), None)
            .unwrap();
        assert_eq!(kept.email, "ada@x.com");

        // Some("") is written as-is
        let blanked = storage.update_user("ada@x.com", None, Some("")).unwrap();
        assert_eq!(blanked.name, "Ada L.");
        assert_eq!(blanked.email, "");
        assert!(storage.get_user_by_email("").unwrap().is_some());
    }

    #[test]
    fn test_update_user_rejects_blank_name() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();

        assert!(matches!(
            storage.update_user("ada@x.com", Some(""), Some("ada@l.com")),
            Err(Error::RequiredField { field: "Name" })
        ));

        // Rejected before anything is written, email included
        let ada = storage.get_user_by_email("ada@x.com").unwrap().unwrap();
        assert_eq!(ada.name, "Ada");
    }

    #[test]
    fn test_update_user_conflict_rolls_back() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_user("Bob", "b@x.com").unwrap();

        let err = storage
            .update_user("ada@x.com", Some("Renamed"), Some("b@x.com"))
            .unwrap_err();
        assert!(err.is_conflict());

        let ada = storage.get_user_by_email("ada@x.com").unwrap().unwrap();
        assert_eq!(ada.name, "Ada", "name change must roll back too");
    }

    #[test]
    fn test_update_unknown_user() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(matches!(
            storage.update_user("ghost@x.com", Some("x"), None),
            Err(Error::UserNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_user_cascades() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let ada = storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_user("Bob", "b@x.com").unwrap();
        for i in 0..3 {
            storage
                .create_task("ada@x.com", &format!("task {i}"), "d")
                .unwrap();
        }
        storage.create_task("b@x.com", "keep", "d").unwrap();

        let outcome = storage.delete_user("ada@x.com", |_| Ok(true)).unwrap();

        let Outcome::Applied(deleted) = outcome else {
            panic!("expected delete to apply");
        };
        assert_eq!(deleted.user.id, ada.id);
        assert_eq!(deleted.tasks_removed, 3);
        assert_eq!(tasks_for_user_id(&storage, ada.id), 0);
        assert!(storage.get_user(ada.id).unwrap().is_none());
        assert_eq!(storage.count_tasks().unwrap(), 1);
    }

    #[test]
    fn test_delete_user_declined_is_noop() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_task("ada@x.com", "Fix bug", "desc").unwrap();

        let mut shown = None;
        let outcome = storage
            .delete_user("ada@x.com", |user| {
                shown = Some(user.name.clone());
                Ok(false)
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(shown.as_deref(), Some("Ada"));
        assert_eq!(storage.count_users().unwrap(), 1);
        assert_eq!(storage.count_tasks().unwrap(), 1);
    }

    #[test]
    fn test_delete_unknown_user_never_asks() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        let result = storage.delete_user("ghost@x.com", |_| panic!("should not confirm"));
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let first = storage.create_user("Ada", "ada@x.com").unwrap();
        storage.delete_user("ada@x.com", |_| Ok(true)).unwrap();

        let second = storage.create_user("Ada", "ada@x.com").unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_task_ids_not_reused_after_delete() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        let first = storage.create_task("ada@x.com", "one", "d").unwrap();
        storage
            .delete_task("ada@x.com", first.id, |_| Ok(true))
            .unwrap();

        let second = storage.create_task("ada@x.com", "two", "d").unwrap();
        assert!(second.id > first.id);

        // Same through the cascade
        storage.delete_user("ada@x.com", |_| Ok(true)).unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        let third = storage.create_task("ada@x.com", "three", "d").unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn test_delete_task() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        let keep = storage.create_task("ada@x.com", "keep", "d").unwrap();
        let gone = storage.create_task("ada@x.com", "gone", "d").unwrap();

        let outcome = storage
            .delete_task("ada@x.com", gone.id, |task| {
                assert_eq!(task.title.as_deref(), Some("gone"));
                Ok(true)
            })
            .unwrap();

        assert!(outcome.is_applied());
        assert!(storage.get_task(gone.id).unwrap().is_none());
        assert!(storage.get_task(keep.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_task_not_found_leaves_tasks() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        storage.create_user("Bob", "b@x.com").unwrap();
        storage.create_task("ada@x.com", "one", "d").unwrap();
        let bobs = storage.create_task("b@x.com", "bob's", "d").unwrap();

        let missing = storage.delete_task("ada@x.com", 999, |_| Ok(true));
        assert!(matches!(missing, Err(Error::TaskNotFound { id: 999, .. })));

        // Another user's task does not match either
        let foreign = storage.delete_task("ada@x.com", bobs.id, |_| Ok(true));
        assert!(matches!(foreign, Err(Error::TaskNotFound { .. })));

        assert_eq!(storage.count_tasks().unwrap(), 2);
    }

    #[test]
    fn test_delete_task_declined_is_noop() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_user("Ada", "ada@x.com").unwrap();
        let task = storage.create_task("ada@x.com", "one", "d").unwrap();

        let outcome = storage.delete_task("ada@x.com", task.id, |_| Ok(false)).unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(storage.count_tasks().unwrap(), 1);
    }

    #[test]
    fn test_delete_task_unknown_user() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(matches!(
            storage.delete_task("ghost@x.com", 1, |_| Ok(true)),
            Err(Error::UserNotFound { .. })
        ));
    }
}
