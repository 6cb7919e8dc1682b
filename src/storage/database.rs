//! SQLite Database
//!
//! Embedded database for persistent storage using rusqlite with r2d2
//! connection pooling. Holds projects, conversations, messages, and the
//! extracted knowledge tables (tasks, decisions, documents), plus the
//! activity log and a key/value settings table.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Row};

use loomline_core::{
    AiMode, Conversation, Decision, Document, Message, MessageRole, Project, Task,
};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::database_path;

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// One row of the activity log.
#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub id: i64,
    pub project_id: String,
    pub kind: String,
    pub entity_type: String,
    pub entity_id: String,
    pub description: String,
    pub created_at: String,
}

/// Database service for managing SQLite operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database instance with connection pooling
    pub fn new() -> AppResult<Self> {
        Self::open(database_path()?)
    }

    /// Open (or create) a database at the given path.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> AppResult<Self> {
        let db_path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database for testing.
    ///
    /// Same schema as the production database; single connection so the
    /// in-memory store is shared across all callers of the pool.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Create a database from an existing connection pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_connection(&self) -> AppResult<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Check database connectivity
    pub fn is_healthy(&self) -> bool {
        self.get_connection()
            .and_then(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
                    .map_err(AppError::from)
            })
            .is_ok()
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id),
                title TEXT NOT NULL,
                purpose TEXT,
                summary TEXT,
                mode TEXT NOT NULL DEFAULT 'design',
                is_archived INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL REFERENCES conversations(id),
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation_time
             ON messages(conversation_id, created_at)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id),
                conversation_id TEXT REFERENCES conversations(id),
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'todo',
                priority TEXT NOT NULL DEFAULT 'medium',
                blocked_reason TEXT,
                next_action TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS decisions (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id),
                conversation_id TEXT REFERENCES conversations(id),
                title TEXT NOT NULL,
                decision TEXT NOT NULL,
                rationale TEXT,
                status TEXT NOT NULL DEFAULT 'proposed',
                impact TEXT NOT NULL DEFAULT 'medium'
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_decisions_project ON decisions(project_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id),
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                is_pinned INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_documents_project ON documents(project_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS activity_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id TEXT NOT NULL REFERENCES projects(id),
                kind TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_activity_project_time
             ON activity_logs(project_id, created_at)",
            [],
        )?;

        tracing::debug!("database schema initialized");
        Ok(())
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub fn insert_project(&self, project: &Project) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO projects (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![project.id, project.name, project.created_at],
        )?;
        Ok(())
    }

    pub fn get_project(&self, id: &str) -> AppResult<Option<Project>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, name, created_at FROM projects WHERE id = ?1",
            params![id],
            |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        );
        match result {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ========================================================================
    // Conversations
    // ========================================================================

    const CONVERSATION_COLUMNS: &'static str =
        "c.id, c.project_id, c.title, c.purpose, c.summary, c.mode, c.is_archived,
         c.created_at, c.updated_at,
         (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = c.id)";

    fn row_to_conversation(row: &Row) -> rusqlite::Result<Conversation> {
        let mode_str: String = row.get(5)?;
        let mode = AiMode::parse(&mode_str).unwrap_or_default();
        Ok(Conversation {
            id: row.get(0)?,
            project_id: row.get(1)?,
            title: row.get(2)?,
            purpose: row.get(3)?,
            summary: row.get(4)?,
            mode,
            is_archived: row.get::<_, i64>(6)? != 0,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            message_count: row.get::<_, i64>(9)? as usize,
        })
    }

    pub fn insert_conversation(&self, conversation: &Conversation) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO conversations
             (id, project_id, title, purpose, summary, mode, is_archived, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                conversation.id,
                conversation.project_id,
                conversation.title,
                conversation.purpose,
                conversation.summary,
                conversation.mode.as_str(),
                conversation.is_archived as i64,
                conversation.created_at,
                conversation.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_conversation(&self, id: &str) -> AppResult<Option<Conversation>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM conversations c WHERE c.id = ?1",
            Self::CONVERSATION_COLUMNS
        );
        let result = conn.query_row(&sql, params![id], Self::row_to_conversation);
        match result {
            Ok(conversation) => Ok(Some(conversation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a project's conversations, most recently updated first.
    pub fn list_conversations(&self, project_id: &str) -> AppResult<Vec<Conversation>> {
        let conn = self.get_connection()?;
        let sql = format!(
            "SELECT {} FROM conversations c WHERE c.project_id = ?1 ORDER BY c.updated_at DESC",
            Self::CONVERSATION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![project_id], Self::row_to_conversation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Mark archived and store the summary (and purpose when given).
    pub fn archive_conversation(
        &self,
        id: &str,
        summary: &str,
        purpose: Option<&str>,
        updated_at: &str,
    ) -> AppResult<()> {
        let conn = self.get_connection()?;
        let changed = match purpose {
            Some(p) => conn.execute(
                "UPDATE conversations
                 SET is_archived = 1, summary = ?2, purpose = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![id, summary, p, updated_at],
            )?,
            None => conn.execute(
                "UPDATE conversations
                 SET is_archived = 1, summary = ?2, updated_at = ?3
                 WHERE id = ?1",
                params![id, summary, updated_at],
            )?,
        };
        if changed == 0 {
            return Err(AppError::not_found(format!("conversation {}", id)));
        }
        Ok(())
    }

    /// Clear the archived flag; the summary is left in place.
    pub fn unarchive_conversation(&self, id: &str, updated_at: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE conversations SET is_archived = 0, updated_at = ?2 WHERE id = ?1",
            params![id, updated_at],
        )?;
        if changed == 0 {
            return Err(AppError::not_found(format!("conversation {}", id)));
        }
        Ok(())
    }

    pub fn set_conversation_mode(&self, id: &str, mode: AiMode, updated_at: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE conversations SET mode = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, mode.as_str(), updated_at],
        )?;
        if changed == 0 {
            return Err(AppError::not_found(format!("conversation {}", id)));
        }
        Ok(())
    }

    pub fn rename_conversation(&self, id: &str, title: &str, updated_at: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE conversations SET title = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, title, updated_at],
        )?;
        if changed == 0 {
            return Err(AppError::not_found(format!("conversation {}", id)));
        }
        Ok(())
    }

    /// Bump updated_at (new message arrived).
    pub fn touch_conversation(&self, id: &str, updated_at: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE conversations SET updated_at = ?2 WHERE id = ?1",
            params![id, updated_at],
        )?;
        Ok(())
    }

    // ========================================================================
    // Messages
    // ========================================================================

    fn row_to_message(row: &Row) -> rusqlite::Result<Message> {
        let role_str: String = row.get(2)?;
        let role = MessageRole::parse(&role_str).unwrap_or(MessageRole::User);
        Ok(Message {
            id: row.get(0)?,
            conversation_id: row.get(1)?,
            role,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    pub fn insert_message(&self, message: &Message) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO messages (id, conversation_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id,
                message.conversation_id,
                message.role.as_str(),
                message.content,
                message.created_at,
            ],
        )?;
        Ok(())
    }

    /// Newest `limit` messages strictly older than `before` (all newest
    /// when no cursor), returned newest-first. Callers reverse for
    /// chronological order.
    pub fn list_messages_before(
        &self,
        conversation_id: &str,
        before: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<Message>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, role, content, created_at
             FROM messages
             WHERE conversation_id = ?1 AND (?2 IS NULL OR created_at < ?2)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?3",
        )?;
        let rows = stmt
            .query_map(params![conversation_id, before, limit as i64], Self::row_to_message)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Full chronological history for one conversation.
    pub fn list_all_messages(&self, conversation_id: &str) -> AppResult<Vec<Message>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, role, content, created_at
             FROM messages
             WHERE conversation_id = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![conversation_id], Self::row_to_message)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn message_count(&self, conversation_id: &str) -> AppResult<usize> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
            params![conversation_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ========================================================================
    // Knowledge tables
    // ========================================================================

    pub fn insert_task(&self, task: &Task) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO tasks
             (id, project_id, conversation_id, title, description, status, priority,
              blocked_reason, next_action)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.id,
                task.project_id,
                task.conversation_id,
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                task.blocked_reason,
                task.next_action,
            ],
        )?;
        Ok(())
    }

    pub fn list_tasks(&self, project_id: &str) -> AppResult<Vec<Task>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, conversation_id, title, description, status, priority,
                    blocked_reason, next_action
             FROM tasks WHERE project_id = ?1 ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                let status_str: String = row.get(5)?;
                let priority_str: String = row.get(6)?;
                Ok(Task {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    conversation_id: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    status: loomline_core::TaskStatus::parse(&status_str).unwrap_or_default(),
                    priority: loomline_core::Priority::parse(&priority_str).unwrap_or_default(),
                    blocked_reason: row.get(7)?,
                    next_action: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_decision(&self, decision: &Decision) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO decisions
             (id, project_id, conversation_id, title, decision, rationale, status, impact)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                decision.id,
                decision.project_id,
                decision.conversation_id,
                decision.title,
                decision.decision,
                decision.rationale,
                decision.status.as_str(),
                decision.impact.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn list_decisions(&self, project_id: &str) -> AppResult<Vec<Decision>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, conversation_id, title, decision, rationale, status, impact
             FROM decisions WHERE project_id = ?1 ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                let status_str: String = row.get(6)?;
                let impact_str: String = row.get(7)?;
                Ok(Decision {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    conversation_id: row.get(2)?,
                    title: row.get(3)?,
                    decision: row.get(4)?,
                    rationale: row.get(5)?,
                    status: loomline_core::DecisionStatus::parse(&status_str).unwrap_or_default(),
                    impact: loomline_core::Impact::parse(&impact_str).unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_document(&self, document: &Document) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO documents (id, project_id, title, content, is_pinned)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                document.id,
                document.project_id,
                document.title,
                document.content,
                document.is_pinned as i64,
            ],
        )?;
        Ok(())
    }

    /// Documents for a project, pinned first.
    pub fn list_documents(&self, project_id: &str) -> AppResult<Vec<Document>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, title, content, is_pinned
             FROM documents WHERE project_id = ?1 ORDER BY is_pinned DESC, rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok(Document {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    title: row.get(2)?,
                    content: row.get(3)?,
                    is_pinned: row.get::<_, i64>(4)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ========================================================================
    // Activity log
    // ========================================================================

    pub fn insert_activity(
        &self,
        project_id: &str,
        kind: &str,
        entity_type: &str,
        entity_id: &str,
        description: &str,
    ) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO activity_logs (project_id, kind, entity_type, entity_id, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![project_id, kind, entity_type, entity_id, description],
        )?;
        Ok(())
    }

    pub fn list_recent_activity(&self, project_id: &str, limit: usize) -> AppResult<Vec<ActivityRow>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, kind, entity_type, entity_id, description, created_at
             FROM activity_logs WHERE project_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![project_id, limit as i64], |row| {
                Ok(ActivityRow {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    kind: row.get(2)?,
                    entity_type: row.get(3)?,
                    entity_id: row.get(4)?,
                    description: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Get a setting value
    pub fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Set a setting value
    pub fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }
}
