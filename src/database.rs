use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{Habit, HabitLog, HabitPatch, LogPatch, LogStatus, Task, TaskPatch};
use crate::store::{HabitStore, Session, StoreError};

/// SQLite-backed store. Every query is filtered by the session's user id.
pub struct Database {
    conn: Connection,
    session: Session,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(err.to_string()),
            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => StoreError::Timeout(err.to_string()),
                ErrorCode::ConstraintViolation => StoreError::Constraint(err.to_string()),
                ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied
                | ErrorCode::AuthorizationForStatementDenied => StoreError::Unauthorized(err.to_string()),
                _ => StoreError::Connectivity(err.to_string()),
            },
            _ => StoreError::Connectivity(err.to_string()),
        }
    }
}

impl ToSql for LogStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LogStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

impl Database {
    /// Open (or create) the database file, initialize the schema and bind it to `session`
    pub fn new(path: &str, session: Session, timeout: Duration) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connectivity(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(timeout)?;
        tracing::debug!(path = %db_path.display(), user = session.user_id(), "opened database");
        Self::init(conn, session)
    }

    /// Private in-memory database, mostly for tests and dry runs
    pub fn open_in_memory(session: Session) -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, session)
    }

    fn init(conn: Connection, session: Session) -> Result<Self, StoreError> {
        let db = Database { conn, session };
        db.initialize_schema()?;
        Ok(db)
    }

    #[cfg(test)]
    fn switch_session(&mut self, session: Session) {
        tracing::info!(user = session.user_id(), "switching store session");
        self.session = session;
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

             CREATE TABLE IF NOT EXISTS habits (
                 id              INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id         TEXT NOT NULL,
                 name            TEXT NOT NULL CHECK (length(trim(name)) > 0),
                 description     TEXT,
                 color           TEXT NOT NULL,
                 created_at      TEXT NOT NULL
             );

             CREATE TABLE IF NOT EXISTS habit_logs (
                 id              INTEGER PRIMARY KEY AUTOINCREMENT,
                 habit_id        INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
                 user_id         TEXT NOT NULL,
                 date            TEXT NOT NULL,
                 status          TEXT NOT NULL CHECK (status IN ('completed', 'missed', 'skipped')),
                 UNIQUE (habit_id, date)
             );

             CREATE TABLE IF NOT EXISTS tasks (
                 id              INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id         TEXT NOT NULL,
                 title           TEXT NOT NULL CHECK (length(trim(title)) > 0),
                 date            TEXT NOT NULL,
                 completed       INTEGER NOT NULL DEFAULT 0,
                 created_at      TEXT NOT NULL
             );

             CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
             CREATE INDEX IF NOT EXISTS idx_habit_logs_user_date ON habit_logs(user_id, date);
             CREATE INDEX IF NOT EXISTS idx_tasks_user_date ON tasks(user_id, date);",
        )?;
        Ok(())
    }

    fn user(&self) -> &str {
        self.session.user_id()
    }

    fn ensure_changed(rows: usize, what: &str, id: i64) -> Result<(), StoreError> {
        if rows == 0 {
            return Err(StoreError::NotFound(format!("{} {}", what, id)));
        }
        Ok(())
    }

    /// Helper function to map a row to a Habit
    fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
        Ok(Habit {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            color: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn row_to_log(row: &rusqlite::Row) -> Result<HabitLog, rusqlite::Error> {
        Ok(HabitLog {
            id: Some(row.get(0)?),
            habit_id: row.get(1)?,
            user_id: row.get(2)?,
            date: row.get(3)?,
            status: row.get(4)?,
        })
    }

    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            title: row.get(2)?,
            date: row.get(3)?,
            completed: row.get::<_, i64>(4)? != 0,
            created_at: row.get(5)?,
        })
    }

    fn get_habit(&self, id: i64) -> Result<Option<Habit>, StoreError> {
        let habit = self
            .conn
            .query_row(
                "SELECT id, user_id, name, description, color, created_at
                 FROM habits WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![id, self.user()],
                Self::row_to_habit,
            )
            .optional()?;
        Ok(habit)
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, user_id, title, date, completed, created_at
                 FROM tasks WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![id, self.user()],
                Self::row_to_task,
            )
            .optional()?;
        Ok(task)
    }
}

impl HabitStore for Database {
    fn session(&self) -> &Session {
        &self.session
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, description, color, created_at
             FROM habits WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let habits = stmt
            .query_map(rusqlite::params![self.user()], Self::row_to_habit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn insert_habit(&self, habit: &Habit) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO habits (user_id, name, description, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![self.user(), habit.name, habit.description, habit.color, habit.created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %habit.name, "inserted habit");
        Ok(id)
    }

    fn update_habit(&self, id: i64, patch: &HabitPatch) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut habit = self
            .get_habit(id)?
            .ok_or_else(|| StoreError::NotFound(format!("habit {}", id)))?;

        if let Some(ref name) = patch.name {
            habit.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            habit.description = description.clone();
        }
        if let Some(ref color) = patch.color {
            habit.color = color.clone();
        }

        tx.execute(
            "UPDATE habits SET name = ?1, description = ?2, color = ?3 WHERE id = ?4 AND user_id = ?5",
            rusqlite::params![habit.name, habit.description, habit.color, id, self.user()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_habit(&self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, self.user()],
        )?;
        Self::ensure_changed(rows, "habit", id)?;
        tx.commit()?;
        tracing::debug!(id, "deleted habit");
        Ok(())
    }

    fn list_logs(&self) -> Result<Vec<HabitLog>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, user_id, date, status
             FROM habit_logs WHERE user_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let logs = stmt
            .query_map(rusqlite::params![self.user()], Self::row_to_log)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    fn insert_log(&self, log: &HabitLog) -> Result<i64, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        if self.get_habit(log.habit_id)?.is_none() {
            return Err(StoreError::NotFound(format!("habit {}", log.habit_id)));
        }
        tx.execute(
            "INSERT INTO habit_logs (habit_id, user_id, date, status) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![log.habit_id, self.user(), log.date, log.status],
        )?;
        let id = self.conn.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn update_log(&self, id: i64, patch: &LogPatch) -> Result<(), StoreError> {
        let Some(status) = patch.status else {
            return Ok(());
        };
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "UPDATE habit_logs SET status = ?1 WHERE id = ?2 AND user_id = ?3",
            rusqlite::params![status, id, self.user()],
        )?;
        Self::ensure_changed(rows, "log", id)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_log(&self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "DELETE FROM habit_logs WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, self.user()],
        )?;
        Self::ensure_changed(rows, "log", id)?;
        tx.commit()?;
        Ok(())
    }

    fn upsert_log(&self, log: &HabitLog) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        if self.get_habit(log.habit_id)?.is_none() {
            return Err(StoreError::NotFound(format!("habit {}", log.habit_id)));
        }
        tx.execute(
            "INSERT INTO habit_logs (habit_id, user_id, date, status) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (habit_id, date) DO UPDATE SET status = excluded.status",
            rusqlite::params![log.habit_id, self.user(), log.date, log.status],
        )?;
        tx.commit()?;
        tracing::debug!(habit_id = log.habit_id, date = %log.date, status = %log.status, "upserted log");
        Ok(())
    }

    fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, date, completed, created_at
             FROM tasks WHERE user_id = ?1 ORDER BY date DESC, created_at ASC, id ASC",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![self.user()], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn insert_task(&self, task: &Task) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO tasks (user_id, title, date, completed, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                self.user(),
                task.title,
                task.date,
                if task.completed { 1 } else { 0 },
                task.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut task = self
            .get_task(id)?
            .ok_or_else(|| StoreError::NotFound(format!("task {}", id)))?;

        if let Some(ref title) = patch.title {
            task.title = title.clone();
        }
        if let Some(date) = patch.date {
            task.date = date;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        tx.execute(
            "UPDATE tasks SET title = ?1, date = ?2, completed = ?3 WHERE id = ?4 AND user_id = ?5",
            rusqlite::params![task.title, task.date, if task.completed { 1 } else { 0 }, id, self.user()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, self.user()],
        )?;
        Self::ensure_changed(rows, "task", id)?;
        tx.commit()?;
        Ok(())
    }
}
