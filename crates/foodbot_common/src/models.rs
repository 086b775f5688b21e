// --- File: crates/foodbot_common/src/models.rs ---
//
// Records persisted by foodbot-db and passed between the feature crates.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Format used for `HH:MM` deadlines.
pub const DEADLINE_FORMAT: &str = "%H:%M";

/// Deadline given to menus that never had one configured.
pub const DEFAULT_DEADLINE: &str = "19:45";

/// Which of the (at most two) daily meals a registration or guest row refers to.
///
/// Serialized as the bare number `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum MenuOption {
    #[default]
    One,
    Two,
}

impl MenuOption {
    pub fn as_i64(self) -> i64 {
        match self {
            MenuOption::One => 1,
            MenuOption::Two => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(MenuOption::One),
            2 => Some(MenuOption::Two),
            _ => None,
        }
    }

    /// Anything that is not exactly 1 or 2 becomes option 1.
    pub fn coerce(value: i64) -> Self {
        Self::from_i64(value).unwrap_or_default()
    }

    /// Reads `1`, `2`, `"1"` or `"2"` from a JSON value; anything else is `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().and_then(Self::from_i64),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok().and_then(Self::from_i64),
            _ => None,
        }
    }

    /// Like [`MenuOption::from_json`], but invalid or missing values become option 1.
    pub fn coerce_json(value: Option<&serde_json::Value>) -> Self {
        value.and_then(Self::from_json).unwrap_or_default()
    }
}

impl From<MenuOption> for i64 {
    fn from(option: MenuOption) -> Self {
        option.as_i64()
    }
}

impl TryFrom<i64> for MenuOption {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        MenuOption::from_i64(value).ok_or_else(|| format!("menu option must be 1 or 2, got {}", value))
    }
}

/// A person who can sign up for meals.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Unique, alphanumeric plus hyphen.
    pub personal_number: String,
    /// Unique RFID card id, stored uppercase.
    pub card_id: Option<String>,
    /// Unique opaque token for the mobile self-service link.
    pub mobile_token: Option<String>,
}

/// Fields needed to create or replace a user.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub personal_number: String,
    pub card_id: Option<String>,
}

/// Menu configuration for one calendar day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOfDay {
    pub id: i64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    pub description: String,
    /// When set, a sign-up must pick option 1 or 2.
    pub two_menus: bool,
    pub menu1_name: Option<String>,
    pub menu2_name: Option<String>,
    /// `HH:MM`, local time.
    pub registration_deadline: String,
    pub deadline_enabled: bool,
}

impl MenuOfDay {
    /// Parsed deadline, falling back to the default when the stored text is unreadable.
    pub fn deadline_time(&self) -> NaiveTime {
        NaiveTime::parse_from_str(&self.registration_deadline, DEADLINE_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(DEFAULT_DEADLINE, DEADLINE_FORMAT))
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn option_name(&self, option: MenuOption) -> Option<&str> {
        match option {
            MenuOption::One => self.menu1_name.as_deref(),
            MenuOption::Two => self.menu2_name.as_deref(),
        }
    }
}

/// Menu fields as submitted by an admin or the kitchen, before normalisation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MenuInput {
    /// Single-menu text.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub two_menus: bool,
    #[serde(default)]
    pub menu1_name: Option<String>,
    #[serde(default)]
    pub menu2_name: Option<String>,
    #[serde(default)]
    pub registration_deadline: Option<String>,
    #[serde(default = "default_true")]
    pub deadline_enabled: bool,
}

fn default_true() -> bool {
    true
}

/// One user's sign-up for one day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub menu_choice: MenuOption,
}

/// Walk-in headcount for one day and menu option.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub menu_choice: MenuOption,
    pub count: i64,
}

/// Append-only record of an administrative action.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLogEntry {
    pub id: i64,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: DateTime<Utc>,
    pub admin_user: String,
    pub action: String,
    pub details: Option<String>,
}

/// A dish name the kitchen can pick from when planning a day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetMenu {
    pub id: i64,
    pub name: String,
    /// Position in the pick list, ascending. New presets go last.
    pub sort_order: i64,
}

/// Parse a `YYYY-MM-DD` column value.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Render a date the way it is stored.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_option_coerce() {
        assert_eq!(MenuOption::coerce(1), MenuOption::One);
        assert_eq!(MenuOption::coerce(2), MenuOption::Two);
        assert_eq!(MenuOption::coerce(0), MenuOption::One);
        assert_eq!(MenuOption::coerce(3), MenuOption::One);
        assert_eq!(MenuOption::coerce(-7), MenuOption::One);
    }

    #[test]
    fn test_menu_option_from_json() {
        use serde_json::json;
        assert_eq!(MenuOption::from_json(&json!(2)), Some(MenuOption::Two));
        assert_eq!(MenuOption::from_json(&json!("2")), Some(MenuOption::Two));
        assert_eq!(MenuOption::from_json(&json!("1")), Some(MenuOption::One));
        assert_eq!(MenuOption::from_json(&json!(3)), None);
        assert_eq!(MenuOption::from_json(&json!("abc")), None);
        assert_eq!(MenuOption::from_json(&json!(2.5)), None);
        assert_eq!(MenuOption::coerce_json(Some(&json!(0))), MenuOption::One);
        assert_eq!(MenuOption::coerce_json(None), MenuOption::One);
    }

    #[test]
    fn test_menu_option_serializes_as_number() {
        assert_eq!(serde_json::to_string(&MenuOption::Two).unwrap(), "2");
        let parsed: MenuOption = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, MenuOption::One);
        assert!(serde_json::from_str::<MenuOption>("5").is_err());
    }

    #[test]
    fn test_deadline_time_falls_back_to_default() {
        let mut menu = MenuOfDay {
            id: 1,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            description: String::new(),
            two_menus: false,
            menu1_name: None,
            menu2_name: None,
            registration_deadline: "11:30".to_string(),
            deadline_enabled: true,
        };
        assert_eq!(menu.deadline_time(), NaiveTime::from_hms_opt(11, 30, 0).unwrap());
        menu.registration_deadline = "late".to_string();
        assert_eq!(menu.deadline_time(), NaiveTime::from_hms_opt(19, 45, 0).unwrap());
    }
}
