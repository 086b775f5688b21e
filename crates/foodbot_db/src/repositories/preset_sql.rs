//! SQL implementation of the preset menu repository

use crate::error::DbError;
use crate::repositories::preset::{PresetMenu, PresetMenuRepository};
use crate::rows::{col_i64, col_string};
use crate::DbClient;
use sqlx::any::AnyRow;
use tracing::{debug, info};

/// SQL implementation of the preset menu repository
#[derive(Debug, Clone)]
pub struct SqlPresetMenuRepository {
    db_client: DbClient,
}

impl SqlPresetMenuRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn preset_from_row(row: &AnyRow) -> Result<PresetMenu, DbError> {
    Ok(PresetMenu {
        id: col_i64(row, "id")?,
        name: col_string(row, "name")?,
        sort_order: col_i64(row, "sort_order")?,
    })
}

impl PresetMenuRepository for SqlPresetMenuRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing preset menu schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS preset_menus (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                sort_order INTEGER NOT NULL
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Preset menu schema initialized successfully");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PresetMenu>, DbError> {
        let rows = sqlx::query("SELECT id, name, sort_order FROM preset_menus ORDER BY sort_order, id")
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to list preset menus", e))?;

        rows.iter().map(preset_from_row).collect()
    }

    async fn create(&self, name: &str) -> Result<PresetMenu, DbError> {
        // Position and insert in one statement so concurrent adds never share a slot.
        let row = sqlx::query(
            r#"
            INSERT INTO preset_menus (name, sort_order)
            SELECT $1, COALESCE(MAX(sort_order), 0) + 1 FROM preset_menus
            RETURNING id, name, sort_order
            "#,
        )
        .bind(name)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| DbError::from_query("Failed to add preset menu", e))?;

        let preset = preset_from_row(&row)?;
        info!("Preset menu {} added at position {}", preset.id, preset.sort_order);
        Ok(preset)
    }

    async fn delete(&self, id: i64) -> Result<Option<PresetMenu>, DbError> {
        let row = sqlx::query("DELETE FROM preset_menus WHERE id = $1 RETURNING id, name, sort_order")
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to delete preset menu", e))?;

        row.as_ref().map(preset_from_row).transpose()
    }
}
