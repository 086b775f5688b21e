//! SQL implementation of the registration repository

use crate::error::DbError;
use crate::repositories::registration::{Registration, RegistrationRepository};
use crate::rows::{col_date, col_i64, col_menu_option};
use crate::DbClient;
use chrono::NaiveDate;
use foodbot_common::models::iso_date;
use foodbot_common::MenuOption;
use sqlx::any::AnyRow;
use tracing::{debug, info};

/// SQL implementation of the registration repository
#[derive(Debug, Clone)]
pub struct SqlRegistrationRepository {
    db_client: DbClient,
}

impl SqlRegistrationRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn registration_from_row(row: &AnyRow) -> Result<Registration, DbError> {
    Ok(Registration {
        id: col_i64(row, "id")?,
        user_id: col_i64(row, "user_id")?,
        date: col_date(row, "date")?,
        menu_choice: col_menu_option(row, "menu_choice")?,
    })
}

impl RegistrationRepository for SqlRegistrationRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing registrations schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS registrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                date TEXT NOT NULL,
                menu_choice INTEGER NOT NULL DEFAULT 1,
                UNIQUE(user_id, date)
            )
        "#;
        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_registrations_date ON registrations (date)")
            .await?;

        info!("Registrations schema initialized successfully");
        Ok(())
    }

    async fn find(&self, user_id: i64, date: NaiveDate) -> Result<Option<Registration>, DbError> {
        let row = sqlx::query(
            "SELECT id, user_id, date, menu_choice FROM registrations WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(iso_date(date))
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to find registration", e))?;

        row.as_ref().map(registration_from_row).transpose()
    }

    async fn insert(
        &self,
        user_id: i64,
        date: NaiveDate,
        option: MenuOption,
    ) -> Result<Registration, DbError> {
        debug!("Registering user {} for {} (option {})", user_id, date, option.as_i64());

        let row = sqlx::query(
            r#"
            INSERT INTO registrations (user_id, date, menu_choice)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, date, menu_choice
            "#,
        )
        .bind(user_id)
        .bind(iso_date(date))
        .bind(option.as_i64())
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to insert registration", e))?;

        registration_from_row(&row)
    }

    async fn delete(&self, user_id: i64, date: NaiveDate) -> Result<bool, DbError> {
        debug!("Unregistering user {} for {}", user_id, date);

        let result = sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND date = $2")
            .bind(user_id)
            .bind(iso_date(date))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to delete registration", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_for_user_since(
        &self,
        user_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<Registration>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, date, menu_choice FROM registrations
            WHERE user_id = $1 AND date >= $2
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .bind(iso_date(since))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to list registrations", e))?;

        rows.iter().map(registration_from_row).collect()
    }
}
