//! SQL implementation of the guest repository

use crate::error::DbError;
use crate::repositories::guest::{GuestEntry, GuestRepository};
use crate::rows::{col_date, col_i64, col_menu_option};
use crate::DbClient;
use chrono::NaiveDate;
use foodbot_common::models::iso_date;
use foodbot_common::MenuOption;
use sqlx::any::AnyRow;
use tracing::{debug, info};

/// SQL implementation of the guest repository
#[derive(Debug, Clone)]
pub struct SqlGuestRepository {
    db_client: DbClient,
}

impl SqlGuestRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn guest_from_row(row: &AnyRow) -> Result<GuestEntry, DbError> {
    Ok(GuestEntry {
        date: col_date(row, "date")?,
        menu_choice: col_menu_option(row, "menu_choice")?,
        count: col_i64(row, "count")?,
    })
}

impl GuestRepository for SqlGuestRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing guests schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS guests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                menu_choice INTEGER NOT NULL DEFAULT 1,
                count INTEGER NOT NULL DEFAULT 0,
                UNIQUE(date, menu_choice)
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Guests schema initialized successfully");
        Ok(())
    }

    async fn find_for_date(&self, date: NaiveDate) -> Result<Vec<GuestEntry>, DbError> {
        let rows = sqlx::query(
            "SELECT date, menu_choice, count FROM guests WHERE date = $1 ORDER BY menu_choice",
        )
        .bind(iso_date(date))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to load guests", e))?;

        rows.iter().map(guest_from_row).collect()
    }

    async fn adjust(
        &self,
        date: NaiveDate,
        option: MenuOption,
        delta: i64,
        max: i64,
    ) -> Result<GuestEntry, DbError> {
        debug!("Adjusting guests for {} option {} by {}", date, option.as_i64(), delta);

        let row = sqlx::query(
            r#"
            INSERT INTO guests (date, menu_choice, count)
            VALUES ($1, $2, CASE WHEN $3 >= 0 AND $4 <= $5 THEN $6 ELSE 0 END)
            ON CONFLICT(date, menu_choice)
            DO UPDATE SET count = CASE
                WHEN guests.count + $7 < 0 THEN guests.count
                WHEN $8 > 0 AND guests.count + $9 > $10 THEN guests.count
                ELSE guests.count + $11
            END
            RETURNING date, menu_choice, count
            "#,
        )
        .bind(iso_date(date))
        .bind(option.as_i64())
        .bind(delta)
        .bind(delta)
        .bind(max)
        .bind(delta)
        .bind(delta)
        .bind(delta)
        .bind(delta)
        .bind(max)
        .bind(delta)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to adjust guests", e))?;

        guest_from_row(&row)
    }

    async fn set(
        &self,
        date: NaiveDate,
        option: MenuOption,
        count: i64,
        max: i64,
    ) -> Result<GuestEntry, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO guests (date, menu_choice, count)
            VALUES ($1, $2, MIN(MAX($3, 0), $4))
            ON CONFLICT(date, menu_choice)
            DO UPDATE SET count = excluded.count
            RETURNING date, menu_choice, count
            "#,
        )
        .bind(iso_date(date))
        .bind(option.as_i64())
        .bind(count)
        .bind(max)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to set guests", e))?;

        let entry = guest_from_row(&row)?;
        info!("Guests for {} option {} set to {}", date, option.as_i64(), entry.count);
        Ok(entry)
    }
}
