//! Course types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned grouping of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: i64,
}
