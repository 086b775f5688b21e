//! SQL implementation of the user repository

use crate::error::DbError;
use crate::repositories::user::{NewUser, User, UserRepository};
use crate::rows::{col_i64, col_opt_string, col_string};
use crate::DbClient;
use sqlx::any::AnyRow;
use tracing::{debug, info};

const USER_COLUMNS: &str = "id, name, personal_number, COALESCE(card_id, '') AS card_id, \
                            COALESCE(mobile_token, '') AS mobile_token";

/// SQL implementation of the user repository
#[derive(Debug, Clone)]
pub struct SqlUserRepository {
    db_client: DbClient,
}

impl SqlUserRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to look up user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }
}

fn user_from_row(row: &AnyRow) -> Result<User, DbError> {
    Ok(User {
        id: col_i64(row, "id")?,
        name: col_string(row, "name")?,
        personal_number: col_string(row, "personal_number")?,
        card_id: col_opt_string(row, "card_id")?,
        mobile_token: col_opt_string(row, "mobile_token")?,
    })
}

fn normalized_card(card_id: &Option<String>) -> String {
    // Empty string is turned into NULL by NULLIF in the statements.
    card_id
        .as_deref()
        .map(|c| c.trim().to_ascii_uppercase())
        .unwrap_or_default()
}

impl UserRepository for SqlUserRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing users schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                personal_number TEXT NOT NULL UNIQUE,
                card_id TEXT UNIQUE,
                mobile_token TEXT UNIQUE
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Users schema initialized successfully");
        Ok(())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DbError> {
        debug!("Creating user with personal number: {}", user.personal_number);

        let query = format!(
            "INSERT INTO users (name, personal_number, card_id) VALUES ($1, $2, NULLIF($3, '')) RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&user.name)
            .bind(&user.personal_number)
            .bind(normalized_card(&user.card_id))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to insert user", e))?;

        let created = user_from_row(&row)?;
        info!("User {} created with id {}", created.name, created.id);
        Ok(created)
    }

    async fn update(&self, id: i64, user: &NewUser) -> Result<Option<User>, DbError> {
        debug!("Updating user {}", id);

        let query = format!(
            "UPDATE users SET name = $1, personal_number = $2, card_id = NULLIF($3, '') WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&user.name)
            .bind(&user.personal_number)
            .bind(normalized_card(&user.card_id))
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to update user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        debug!("Deleting user {} and their registrations", id);

        let mut tx = self.db_client.begin().await?;

        let removed = sqlx::query("DELETE FROM registrations WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_query("Failed to delete user registrations", e))?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from_query("Failed to delete user", e))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        if deleted > 0 {
            info!("User {} deleted along with {} registrations", id, removed);
        }
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to find user", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_personal_number(&self, personal_number: &str) -> Result<Option<User>, DbError> {
        self.find_one("personal_number", personal_number).await
    }

    async fn find_by_card_id(&self, card_id: &str) -> Result<Option<User>, DbError> {
        self.find_one("card_id", &card_id.trim().to_ascii_uppercase())
            .await
    }

    async fn find_by_mobile_token(&self, token: &str) -> Result<Option<User>, DbError> {
        self.find_one("mobile_token", token).await
    }

    async fn set_mobile_token(&self, id: i64, token: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE users SET mobile_token = $1 WHERE id = $2 AND mobile_token IS NULL",
        )
            .bind(token)
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to store mobile token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<Vec<User>, DbError> {
        let query = format!(
            "SELECT {} FROM users ORDER BY name, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to list users", e))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn count(&self) -> Result<i64, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_query("Failed to count users", e))?;

        col_i64(&row, "n")
    }
}
