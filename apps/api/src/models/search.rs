use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One stored analysis. `category` holds the Spanish label, `result` the report JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_text: String,
    pub provider: String,
    pub category: String,
    pub result: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new row; id and timestamp come from the database.
pub struct NewSearch<'a> {
    pub user_id: Uuid,
    pub problem_text: &'a str,
    pub provider: &'a str,
    pub category: &'a str,
    pub result: &'a Value,
}
