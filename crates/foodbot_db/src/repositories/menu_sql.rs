//! SQL implementation of the menu repository

use crate::client::DbTransaction;
use crate::error::DbError;
use crate::repositories::menu::{DayDeletion, MenuOfDay, MenuRecord, MenuRepository};
use crate::rows::{col_bool, col_date, col_i64, col_opt_string, col_string};
use crate::DbClient;
use chrono::NaiveDate;
use foodbot_common::models::iso_date;
use sqlx::any::AnyRow;
use tracing::{debug, info, warn};

const MENU_COLUMNS: &str = "id, date, description, two_menus, \
                            COALESCE(menu1_name, '') AS menu1_name, \
                            COALESCE(menu2_name, '') AS menu2_name, \
                            registration_deadline, deadline_enabled";

/// SQL implementation of the menu repository
#[derive(Debug, Clone)]
pub struct SqlMenuRepository {
    db_client: DbClient,
}

impl SqlMenuRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn update_in(
        tx: &mut DbTransaction<'_>,
        record: &MenuRecord,
    ) -> Result<Option<AnyRow>, DbError> {
        let query = format!(
            "UPDATE menus SET description = $1, two_menus = $2, menu1_name = NULLIF($3, ''), \
             menu2_name = NULLIF($4, ''), registration_deadline = $5, deadline_enabled = $6 \
             WHERE date = $7 RETURNING {}",
            MENU_COLUMNS
        );

        sqlx::query(&query)
            .bind(&record.description)
            .bind(record.two_menus as i64)
            .bind(record.menu1_name.clone().unwrap_or_default())
            .bind(record.menu2_name.clone().unwrap_or_default())
            .bind(&record.registration_deadline)
            .bind(record.deadline_enabled as i64)
            .bind(iso_date(record.date))
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DbError::from_query("Failed to update menu", e))
    }

    async fn insert_in(tx: &mut DbTransaction<'_>, record: &MenuRecord) -> Result<AnyRow, DbError> {
        let query = format!(
            "INSERT INTO menus (date, description, two_menus, menu1_name, menu2_name, \
             registration_deadline, deadline_enabled) \
             VALUES ($1, $2, $3, NULLIF($4, ''), NULLIF($5, ''), $6, $7) RETURNING {}",
            MENU_COLUMNS
        );

        sqlx::query(&query)
            .bind(iso_date(record.date))
            .bind(&record.description)
            .bind(record.two_menus as i64)
            .bind(record.menu1_name.clone().unwrap_or_default())
            .bind(record.menu2_name.clone().unwrap_or_default())
            .bind(&record.registration_deadline)
            .bind(record.deadline_enabled as i64)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| DbError::from_query("Failed to insert menu", e))
    }

    async fn exists_in(tx: &mut DbTransaction<'_>, date: NaiveDate) -> Result<bool, DbError> {
        let row = sqlx::query("SELECT id FROM menus WHERE date = $1")
            .bind(iso_date(date))
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DbError::from_query("Failed to look up menu", e))?;
        Ok(row.is_some())
    }
}

pub(crate) fn menu_from_row(row: &AnyRow) -> Result<MenuOfDay, DbError> {
    Ok(MenuOfDay {
        id: col_i64(row, "id")?,
        date: col_date(row, "date")?,
        description: col_string(row, "description")?,
        two_menus: col_bool(row, "two_menus")?,
        menu1_name: col_opt_string(row, "menu1_name")?,
        menu2_name: col_opt_string(row, "menu2_name")?,
        registration_deadline: col_string(row, "registration_deadline")?,
        deadline_enabled: col_bool(row, "deadline_enabled")?,
    })
}

impl MenuRepository for SqlMenuRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing menus schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS menus (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                two_menus INTEGER NOT NULL DEFAULT 0,
                menu1_name TEXT,
                menu2_name TEXT,
                registration_deadline TEXT NOT NULL DEFAULT '19:45',
                deadline_enabled INTEGER NOT NULL DEFAULT 1
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Menus schema initialized successfully");
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<MenuOfDay>, DbError> {
        debug!("Finding menu for {}", date);

        let query = format!("SELECT {} FROM menus WHERE date = $1", MENU_COLUMNS);

        let row = sqlx::query(&query)
            .bind(iso_date(date))
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to find menu", e))?;

        row.as_ref().map(menu_from_row).transpose()
    }

    async fn find_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MenuOfDay>, DbError> {
        let query = format!(
            "SELECT {} FROM menus WHERE date >= $1 AND date <= $2 ORDER BY date",
            MENU_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(iso_date(start))
            .bind(iso_date(end))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to list menus", e))?;

        rows.iter().map(menu_from_row).collect()
    }

    async fn upsert(&self, record: &MenuRecord) -> Result<MenuOfDay, DbError> {
        debug!("Saving menu for {}", record.date);

        let mut tx = self.db_client.begin().await?;

        let row = if Self::exists_in(&mut tx, record.date).await? {
            Self::update_in(&mut tx, record).await?
        } else {
            match Self::insert_in(&mut tx, record).await {
                Ok(row) => Some(row),
                Err(e) if e.is_unique_violation() => {
                    // Lost the insert race: the row is there now, so update it.
                    warn!("Menu for {} was created concurrently, updating", record.date);
                    Self::update_in(&mut tx, record).await?
                }
                Err(e) => return Err(e),
            }
        };

        let row = row.ok_or_else(|| {
            DbError::QueryError(format!("Menu for {} vanished during save", record.date))
        })?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        let saved = menu_from_row(&row)?;
        info!("Menu for {} saved", saved.date);
        Ok(saved)
    }

    async fn insert_if_absent(&self, record: &MenuRecord) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO menus (date, description, two_menus, menu1_name, menu2_name,
                               registration_deadline, deadline_enabled)
            VALUES ($1, $2, $3, NULLIF($4, ''), NULLIF($5, ''), $6, $7)
            ON CONFLICT(date) DO NOTHING
            "#,
        )
        .bind(iso_date(record.date))
        .bind(&record.description)
        .bind(record.two_menus as i64)
        .bind(record.menu1_name.clone().unwrap_or_default())
        .bind(record.menu2_name.clone().unwrap_or_default())
        .bind(&record.registration_deadline)
        .bind(record.deadline_enabled as i64)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to add day", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_day(&self, date: NaiveDate) -> Result<DayDeletion, DbError> {
        debug!("Deleting day {}", date);

        let mut tx = self.db_client.begin().await?;

        if !Self::exists_in(&mut tx, date).await? {
            return Ok(DayDeletion::default());
        }

        let registrations_deleted = sqlx::query("DELETE FROM registrations WHERE date = $1")
            .bind(iso_date(date))
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_query("Failed to delete registrations of day", e))?
            .rows_affected();

        let menus = sqlx::query("DELETE FROM menus WHERE date = $1")
            .bind(iso_date(date))
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_query("Failed to delete menu", e))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!(
            "Day {} deleted with {} registrations",
            date, registrations_deleted
        );
        Ok(DayDeletion {
            menu_deleted: menus > 0,
            registrations_deleted,
        })
    }
}
