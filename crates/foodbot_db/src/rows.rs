//! Column decoding helpers for `AnyRow`.
//!
//! The `Any` driver only knows integers, floats, text and blobs, so dates are
//! stored as ISO text and flags as 0/1 integers. Nullable text columns are
//! selected through `COALESCE(col, '')` and an empty string reads back as `None`.

use crate::error::DbError;
use chrono::NaiveDate;
use foodbot_common::models::parse_iso_date;
use foodbot_common::MenuOption;
use sqlx::any::AnyRow;
use sqlx::Row;

pub(crate) fn col_i64(row: &AnyRow, col: &str) -> Result<i64, DbError> {
    row.try_get::<i64, _>(col)
        .map_err(|e| DbError::DecodeError(format!("{}: {}", col, e)))
}

pub(crate) fn col_string(row: &AnyRow, col: &str) -> Result<String, DbError> {
    row.try_get::<String, _>(col)
        .map_err(|e| DbError::DecodeError(format!("{}: {}", col, e)))
}

pub(crate) fn col_opt_string(row: &AnyRow, col: &str) -> Result<Option<String>, DbError> {
    let raw = col_string(row, col)?;
    Ok(if raw.is_empty() { None } else { Some(raw) })
}

pub(crate) fn col_bool(row: &AnyRow, col: &str) -> Result<bool, DbError> {
    col_i64(row, col).map(|v| v != 0)
}

pub(crate) fn col_date(row: &AnyRow, col: &str) -> Result<NaiveDate, DbError> {
    let raw = col_string(row, col)?;
    parse_iso_date(&raw).ok_or_else(|| DbError::DecodeError(format!("{}: bad date '{}'", col, raw)))
}

pub(crate) fn col_opt_date(row: &AnyRow, col: &str) -> Result<Option<NaiveDate>, DbError> {
    match col_opt_string(row, col)? {
        Some(raw) => parse_iso_date(&raw)
            .map(Some)
            .ok_or_else(|| DbError::DecodeError(format!("{}: bad date '{}'", col, raw))),
        None => Ok(None),
    }
}

pub(crate) fn col_menu_option(row: &AnyRow, col: &str) -> Result<MenuOption, DbError> {
    col_i64(row, col).map(MenuOption::coerce)
}
