//! SQLite-backed storage.
//!
//! Stands in for the hosted data service: owner-scoped tasks, sessions,
//! per-user settings, statistics queries, and a small kv store used to
//! persist the timer engine between CLI invocations.

use chrono::{DateTime, Days, Utc};
use indoc::indoc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::error::DatabaseError;
use crate::identity::User;
use crate::session::Session;
use crate::settings::UserSettings;
use crate::task::{Task, TaskStatus};

fn format_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    }
}

fn parse_status(status_str: &str) -> TaskStatus {
    match status_str {
        "in_progress" => TaskStatus::InProgress,
        "completed" => TaskStatus::Completed,
        _ => TaskStatus::Pending,
    }
}

/// Parse datetime from RFC3339 string with fallback to current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;
    let completed_at_str: Option<String> = row.get(8)?;
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        estimated_pomodoros: row.get(4)?,
        completed_pomodoros: row.get(5)?,
        status: parse_status(&status_str),
        created_at: parse_datetime_fallback(&created_at_str),
        completed_at: completed_at_str.map(|s| parse_datetime_fallback(&s)),
    })
}

fn row_to_session(row: &rusqlite::Row) -> Result<Session, rusqlite::Error> {
    let started_at_str: String = row.get(5)?;
    let ended_at_str: Option<String> = row.get(6)?;
    Ok(Session {
        id: row.get(0)?,
        user_id: row.get(1)?,
        task_id: row.get(2)?,
        duration_secs: row.get(3)?,
        completed: row.get(4)?,
        started_at: parse_datetime_fallback(&started_at_str),
        ended_at: ended_at_str.map(|s| parse_datetime_fallback(&s)),
    })
}

/// Aggregated session/task statistics for one user.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub completed_pomodoros: u64,
    pub focus_min: u64,
    pub completed_tasks: u64,
}

/// Completed-session count for one day of the weekly view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: String,
    pub completed_pomodoros: u64,
}

/// SQLite database holding all persisted entities.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pomoplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("pomoplan.db");
        let conn =
            Connection::open(&path).map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(indoc! {"
            CREATE TABLE IF NOT EXISTS users (
                id         TEXT PRIMARY KEY,
                email      TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL,
                title               TEXT NOT NULL,
                description         TEXT,
                estimated_pomodoros INTEGER NOT NULL DEFAULT 1,
                completed_pomodoros INTEGER NOT NULL DEFAULT 0,
                status              TEXT NOT NULL DEFAULT 'pending',
                created_at          TEXT NOT NULL,
                completed_at        TEXT
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id            TEXT PRIMARY KEY,
                user_id       TEXT NOT NULL,
                task_id       TEXT,
                duration_secs INTEGER NOT NULL,
                completed     INTEGER NOT NULL DEFAULT 0,
                started_at    TEXT NOT NULL,
                ended_at      TEXT
            );

            CREATE TABLE IF NOT EXISTS user_settings (
                user_id            TEXT PRIMARY KEY,
                work_secs          INTEGER NOT NULL,
                short_break_secs   INTEGER NOT NULL,
                long_break_secs    INTEGER NOT NULL,
                long_break_cadence INTEGER NOT NULL,
                sound_enabled      INTEGER NOT NULL,
                vibration_enabled  INTEGER NOT NULL,
                updated_at         TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_user_created ON tasks(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_user_started ON sessions(user_id, started_at);
        "})?;
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, created_at FROM users WHERE email = ?1",
                params![email],
                |row| {
                    let created_at_str: String = row.get(2)?;
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        created_at: parse_datetime_fallback(&created_at_str),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by email, creating the row on first access.
    pub fn ensure_user(&self, email: &str) -> Result<User, DatabaseError> {
        if let Some(user) = self.get_user_by_email(email)? {
            return Ok(user);
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.id, user.email, user.created_at.to_rfc3339()],
        )?;
        Ok(user)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            indoc! {"
                INSERT INTO tasks (id, user_id, title, description, estimated_pomodoros,
                                   completed_pomodoros, status, created_at, completed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "},
            params![
                task.id,
                task.user_id,
                task.title,
                task.description,
                task.estimated_pomodoros,
                task.completed_pomodoros,
                format_status(task.status),
                task.created_at.to_rfc3339(),
                task.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Tasks owned by one user, newest first.
    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(indoc! {"
            SELECT id, user_id, title, description, estimated_pomodoros,
                   completed_pomodoros, status, created_at, completed_at
            FROM tasks WHERE user_id = ?1
            ORDER BY created_at DESC
        "})?;
        let tasks = stmt
            .query_map(params![user_id], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get_task(&self, user_id: &str, id: &str) -> Result<Option<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(indoc! {"
            SELECT id, user_id, title, description, estimated_pomodoros,
                   completed_pomodoros, status, created_at, completed_at
            FROM tasks WHERE user_id = ?1 AND id = ?2
        "})?;
        let task = stmt.query_row(params![user_id, id], row_to_task).optional()?;
        Ok(task)
    }

    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            indoc! {"
                UPDATE tasks
                SET title = ?3, description = ?4, estimated_pomodoros = ?5,
                    completed_pomodoros = ?6, status = ?7, completed_at = ?8
                WHERE user_id = ?1 AND id = ?2
            "},
            params![
                task.user_id,
                task.id,
                task.title,
                task.description,
                task.estimated_pomodoros,
                task.completed_pomodoros,
                format_status(task.status),
                task.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        if updated == 0 {
            return Err(DatabaseError::NotFound {
                entity: "Task",
                id: task.id.clone(),
            });
        }
        Ok(())
    }

    pub fn delete_task(&self, user_id: &str, id: &str) -> Result<(), DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                entity: "Task",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Open a new session for a starting work phase.
    pub fn create_session(
        &self,
        user_id: &str,
        task_id: Option<&str>,
        duration_secs: u32,
    ) -> Result<Session, DatabaseError> {
        let session = Session::new(user_id, task_id, duration_secs);
        self.conn.execute(
            indoc! {"
                INSERT INTO sessions (id, user_id, task_id, duration_secs, completed, started_at, ended_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "},
            params![
                session.id,
                session.user_id,
                session.task_id,
                session.duration_secs,
                session.completed,
                session.started_at.to_rfc3339(),
                Option::<String>::None,
            ],
        )?;
        Ok(session)
    }

    /// Mark a session completed and stamp its end time.
    pub fn finalize_session(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE sessions SET completed = 1, ended_at = ?2 WHERE id = ?1",
            params![id, ended_at.to_rfc3339()],
        )?;
        if updated == 0 {
            return Err(DatabaseError::NotFound {
                entity: "Session",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_session(&self, id: &str) -> Result<Option<Session>, DatabaseError> {
        let mut stmt = self.conn.prepare(indoc! {"
            SELECT id, user_id, task_id, duration_secs, completed, started_at, ended_at
            FROM sessions WHERE id = ?1
        "})?;
        let session = stmt.query_row(params![id], row_to_session).optional()?;
        Ok(session)
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Settings row for one user, created lazily with defaults.
    pub fn get_or_create_settings(&self, user_id: &str) -> Result<UserSettings, DatabaseError> {
        let existing = self
            .conn
            .query_row(
                indoc! {"
                    SELECT user_id, work_secs, short_break_secs, long_break_secs,
                           long_break_cadence, sound_enabled, vibration_enabled, updated_at
                    FROM user_settings WHERE user_id = ?1
                "},
                params![user_id],
                |row| {
                    let updated_at_str: String = row.get(7)?;
                    Ok(UserSettings {
                        user_id: row.get(0)?,
                        work_secs: row.get(1)?,
                        short_break_secs: row.get(2)?,
                        long_break_secs: row.get(3)?,
                        long_break_cadence: row.get(4)?,
                        sound_enabled: row.get(5)?,
                        vibration_enabled: row.get(6)?,
                        updated_at: parse_datetime_fallback(&updated_at_str),
                    })
                },
            )
            .optional()?;

        if let Some(settings) = existing {
            return Ok(settings);
        }

        let settings = UserSettings::defaults_for(user_id);
        self.save_settings(&settings)?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &UserSettings) -> Result<(), DatabaseError> {
        self.conn.execute(
            indoc! {"
                INSERT OR REPLACE INTO user_settings
                    (user_id, work_secs, short_break_secs, long_break_secs,
                     long_break_cadence, sound_enabled, vibration_enabled, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "},
            params![
                settings.user_id,
                settings.work_secs,
                settings.short_break_secs,
                settings.long_break_secs,
                settings.long_break_cadence,
                settings.sound_enabled,
                settings.vibration_enabled,
                settings.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Statistics ───────────────────────────────────────────────────

    fn stats_since(&self, user_id: &str, since: Option<&str>) -> Result<Stats, DatabaseError> {
        let cutoff = since.unwrap_or("");
        let (pomodoros, focus_secs) = self.conn.query_row(
            indoc! {"
                SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
                FROM sessions
                WHERE user_id = ?1 AND completed = 1 AND started_at >= ?2
            "},
            params![user_id, cutoff],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        let completed_tasks = self.conn.query_row(
            indoc! {"
                SELECT COUNT(*)
                FROM tasks
                WHERE user_id = ?1 AND status = 'completed' AND created_at >= ?2
            "},
            params![user_id, cutoff],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(Stats {
            completed_pomodoros: pomodoros,
            focus_min: focus_secs / 60,
            completed_tasks,
        })
    }

    pub fn stats_all(&self, user_id: &str) -> Result<Stats, DatabaseError> {
        self.stats_since(user_id, None)
    }

    pub fn stats_today(&self, user_id: &str) -> Result<Stats, DatabaseError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.stats_since(user_id, Some(&format!("{today}T00:00:00+00:00")))
    }

    /// Completed-session counts per day for the trailing 7 days,
    /// oldest first.
    pub fn weekly_activity(&self, user_id: &str) -> Result<Vec<DayActivity>, DatabaseError> {
        let today = Utc::now().date_naive();
        let mut days = Vec::with_capacity(7);
        for back in (0..7).rev() {
            let day = today
                .checked_sub_days(Days::new(back))
                .unwrap_or(today);
            let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
            let start = format!("{day}T00:00:00+00:00");
            let end = format!("{next}T00:00:00+00:00");
            let count = self.conn.query_row(
                indoc! {"
                    SELECT COUNT(*)
                    FROM sessions
                    WHERE user_id = ?1 AND completed = 1
                      AND started_at >= ?2 AND started_at < ?3
                "},
                params![user_id, start, end],
                |row| row.get::<_, u64>(0),
            )?;
            days.push(DayActivity {
                date: day.format("%Y-%m-%d").to_string(),
                completed_pomodoros: count,
            });
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_user_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let first = db.ensure_user("ada@example.com").unwrap();
        let second = db.ensure_user("ada@example.com").unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn task_crud_roundtrip() {
        let db = Database::open_memory().unwrap();
        let user = db.ensure_user("u@example.com").unwrap();
        let mut task = Task::new(&user.id, "write report".into(), Some("notes".into()), 3);
        db.create_task(&task).unwrap();

        let fetched = db.get_task(&user.id, &task.id).unwrap().unwrap();
        assert_eq!(fetched.title, "write report");
        assert_eq!(fetched.estimated_pomodoros, 3);
        assert_eq!(fetched.status, TaskStatus::Pending);

        task.record_completed_pomodoro(Utc::now());
        db.update_task(&task).unwrap();
        let fetched = db.get_task(&user.id, &task.id).unwrap().unwrap();
        assert_eq!(fetched.completed_pomodoros, 1);
        assert_eq!(fetched.status, TaskStatus::InProgress);

        db.delete_task(&user.id, &task.id).unwrap();
        assert!(db.get_task(&user.id, &task.id).unwrap().is_none());
    }

    #[test]
    fn tasks_are_scoped_by_owner() {
        let db = Database::open_memory().unwrap();
        let ada = db.ensure_user("ada@example.com").unwrap();
        let bob = db.ensure_user("bob@example.com").unwrap();
        let task = Task::new(&ada.id, "ada's task".into(), None, 1);
        db.create_task(&task).unwrap();
        assert!(db.get_task(&bob.id, &task.id).unwrap().is_none());
        assert!(db.list_tasks(&bob.id).unwrap().is_empty());
        assert_eq!(db.list_tasks(&ada.id).unwrap().len(), 1);
    }

    #[test]
    fn session_create_and_finalize() {
        let db = Database::open_memory().unwrap();
        let user = db.ensure_user("u@example.com").unwrap();
        let session = db.create_session(&user.id, None, 1500).unwrap();
        assert!(!session.completed);

        db.finalize_session(&session.id, Utc::now()).unwrap();
        let fetched = db.get_session(&session.id).unwrap().unwrap();
        assert!(fetched.completed);
        assert!(fetched.ended_at.is_some());
    }

    #[test]
    fn finalizing_missing_session_reports_not_found() {
        let db = Database::open_memory().unwrap();
        let err = db.finalize_session("nope", Utc::now()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn settings_are_created_lazily_with_defaults() {
        let db = Database::open_memory().unwrap();
        let user = db.ensure_user("u@example.com").unwrap();
        let settings = db.get_or_create_settings(&user.id).unwrap();
        assert_eq!(settings.work_secs, 1500);
        assert_eq!(settings.long_break_cadence, 4);

        let mut updated = settings.clone();
        updated.work_secs = 3000;
        updated.updated_at = Utc::now();
        db.save_settings(&updated).unwrap();
        let fetched = db.get_or_create_settings(&user.id).unwrap();
        assert_eq!(fetched.work_secs, 3000);
    }

    #[test]
    fn stats_count_only_completed_sessions() {
        let db = Database::open_memory().unwrap();
        let user = db.ensure_user("u@example.com").unwrap();

        let done = db.create_session(&user.id, None, 1500).unwrap();
        db.finalize_session(&done.id, Utc::now()).unwrap();
        db.create_session(&user.id, None, 1500).unwrap(); // left open

        let stats = db.stats_all(&user.id).unwrap();
        assert_eq!(stats.completed_pomodoros, 1);
        assert_eq!(stats.focus_min, 25);

        let today = db.stats_today(&user.id).unwrap();
        assert_eq!(today.completed_pomodoros, 1);
    }

    #[test]
    fn weekly_activity_covers_seven_days() {
        let db = Database::open_memory().unwrap();
        let user = db.ensure_user("u@example.com").unwrap();
        let session = db.create_session(&user.id, None, 1500).unwrap();
        db.finalize_session(&session.id, Utc::now()).unwrap();

        let week = db.weekly_activity(&user.id).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week.last().unwrap().completed_pomodoros, 1);
        assert!(week[..6].iter().all(|d| d.completed_pomodoros == 0));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("timer_engine").unwrap().is_none());
        db.kv_set("timer_engine", "{}").unwrap();
        assert_eq!(db.kv_get("timer_engine").unwrap().unwrap(), "{}");
    }
}
