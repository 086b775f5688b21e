//! SQL implementation of the admin log repository

use crate::error::DbError;
use crate::repositories::admin_log::{AdminLogEntry, AdminLogRepository};
use crate::rows::{col_i64, col_opt_string, col_string};
use crate::DbClient;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::any::AnyRow;
use tracing::{debug, info};

/// SQL implementation of the admin log repository
#[derive(Debug, Clone)]
pub struct SqlAdminLogRepository {
    db_client: DbClient,
}

impl SqlAdminLogRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn entry_from_row(row: &AnyRow) -> Result<AdminLogEntry, DbError> {
    let raw = col_string(row, "created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("created_at: {}", e)))?;

    Ok(AdminLogEntry {
        id: col_i64(row, "id")?,
        created_at,
        admin_user: col_string(row, "admin_user")?,
        action: col_string(row, "action")?,
        details: col_opt_string(row, "details")?,
    })
}

impl AdminLogRepository for SqlAdminLogRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing admin log schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS admin_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                admin_user TEXT NOT NULL,
                action TEXT NOT NULL,
                details TEXT
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Admin log schema initialized successfully");
        Ok(())
    }

    async fn append(
        &self,
        admin_user: &str,
        action: &str,
        details: Option<&str>,
    ) -> Result<AdminLogEntry, DbError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let row = sqlx::query(
            r#"
            INSERT INTO admin_log (created_at, admin_user, action, details)
            VALUES ($1, $2, $3, NULLIF($4, ''))
            RETURNING id, created_at, admin_user, action, COALESCE(details, '') AS details
            "#,
        )
        .bind(created_at)
        .bind(admin_user)
        .bind(action)
        .bind(details.unwrap_or_default())
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to append admin log entry", e))?;

        info!("Admin action by {}: {}", admin_user, action);
        entry_from_row(&row)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AdminLogEntry>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, admin_user, action, COALESCE(details, '') AS details FROM admin_log
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to read admin log", e))?;

        rows.iter().map(entry_from_row).collect()
    }
}
