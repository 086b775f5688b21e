//! SQL implementation of the aggregate queries

use crate::error::DbError;
use crate::repositories::stats::{OptionCount, RegisteredUser, StatsRepository, UserHistoryRow};
use crate::rows::{col_date, col_i64, col_menu_option, col_opt_date, col_string};
use crate::DbClient;
use chrono::NaiveDate;
use foodbot_common::models::iso_date;
use sqlx::any::AnyRow;
use tracing::debug;

/// SQL implementation of the stats repository
#[derive(Debug, Clone)]
pub struct SqlStatsRepository {
    db_client: DbClient,
}

impl SqlStatsRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn date_text_pairs(
        &self,
        query: &str,
        first: String,
        second: String,
    ) -> Result<Vec<(NaiveDate, String)>, DbError> {
        let rows = sqlx::query(query)
            .bind(first)
            .bind(second)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to load menu days", e))?;

        rows.iter()
            .map(|row| Ok((col_date(row, "date")?, col_string(row, "description")?)))
            .collect()
    }
}

fn option_count_from_row(row: &AnyRow) -> Result<OptionCount, DbError> {
    Ok(OptionCount {
        date: col_date(row, "date")?,
        option: col_menu_option(row, "menu_choice")?,
        count: col_i64(row, "n")?,
    })
}

impl StatsRepository for SqlStatsRepository {
    async fn registration_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OptionCount>, DbError> {
        debug!("Counting registrations from {} to {}", start, end);

        let rows = sqlx::query(
            r#"
            SELECT date, menu_choice, COUNT(*) AS n
            FROM registrations
            WHERE date >= $1 AND date <= $2
            GROUP BY date, menu_choice
            "#,
        )
        .bind(iso_date(start))
        .bind(iso_date(end))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to count registrations", e))?;

        rows.iter().map(option_count_from_row).collect()
    }

    async fn guest_counts(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<OptionCount>, DbError> {
        debug!("Counting guests from {} to {}", start, end);

        let rows = sqlx::query(
            r#"
            SELECT date, menu_choice, COALESCE(SUM(count), 0) AS n
            FROM guests
            WHERE date >= $1 AND date <= $2
            GROUP BY date, menu_choice
            "#,
        )
        .bind(iso_date(start))
        .bind(iso_date(end))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to count guests", e))?;

        rows.iter().map(option_count_from_row).collect()
    }

    async fn menu_descriptions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, String)>, DbError> {
        self.date_text_pairs(
            "SELECT date, description FROM menus WHERE date >= $1 AND date <= $2 ORDER BY date",
            iso_date(start),
            iso_date(end),
        )
        .await
    }

    async fn recent_menu_days(
        &self,
        since: NaiveDate,
        limit: i64,
    ) -> Result<Vec<(NaiveDate, String)>, DbError> {
        let rows = sqlx::query(
            "SELECT date, description FROM menus WHERE date >= $1 ORDER BY date DESC LIMIT $2",
        )
        .bind(iso_date(since))
        .bind(limit)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to load recent menu days", e))?;

        rows.iter()
            .map(|row| Ok((col_date(row, "date")?, col_string(row, "description")?)))
            .collect()
    }

    async fn registered_users(&self, date: NaiveDate) -> Result<Vec<RegisteredUser>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id, u.name AS name, u.personal_number AS personal_number,
                   r.menu_choice AS menu_choice
            FROM registrations r
            JOIN users u ON u.id = r.user_id
            WHERE r.date = $1
            ORDER BY u.name
            "#,
        )
        .bind(iso_date(date))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to list registered users", e))?;

        rows.iter()
            .map(|row| {
                Ok(RegisteredUser {
                    user_id: col_i64(row, "user_id")?,
                    name: col_string(row, "name")?,
                    personal_number: col_string(row, "personal_number")?,
                    option: col_menu_option(row, "menu_choice")?,
                })
            })
            .collect()
    }

    async fn user_history(
        &self,
        since_7: NaiveDate,
        since_30: NaiveDate,
        since_90: NaiveDate,
    ) -> Result<Vec<UserHistoryRow>, DbError> {
        debug!("Computing attendance history for all users");

        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id, u.name AS name, u.personal_number AS personal_number,
                   COALESCE(SUM(CASE WHEN r.date >= $1 THEN 1 ELSE 0 END), 0) AS count_7,
                   COALESCE(SUM(CASE WHEN r.date >= $2 THEN 1 ELSE 0 END), 0) AS count_30,
                   COALESCE(SUM(CASE WHEN r.date >= $3 THEN 1 ELSE 0 END), 0) AS count_90,
                   COALESCE(MAX(r.date), '') AS last_date
            FROM users u
            LEFT JOIN registrations r ON r.user_id = u.id
            GROUP BY u.id, u.name, u.personal_number
            ORDER BY u.name, u.id
            "#,
        )
        .bind(iso_date(since_7))
        .bind(iso_date(since_30))
        .bind(iso_date(since_90))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to compute user history", e))?;

        rows.iter()
            .map(|row| {
                Ok(UserHistoryRow {
                    user_id: col_i64(row, "user_id")?,
                    name: col_string(row, "name")?,
                    personal_number: col_string(row, "personal_number")?,
                    count_7: col_i64(row, "count_7")?,
                    count_30: col_i64(row, "count_30")?,
                    count_90: col_i64(row, "count_90")?,
                    last_date: col_opt_date(row, "last_date")?,
                })
            })
            .collect()
    }
}
