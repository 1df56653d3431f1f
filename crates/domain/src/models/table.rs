//! Restaurant table domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Occupancy status of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Reserved,
    Occupied,
}

impl TableStatus {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Reserved => "reserved",
            TableStatus::Occupied => "occupied",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(TableStatus::Available),
            "reserved" => Ok(TableStatus::Reserved),
            "occupied" => Ok(TableStatus::Occupied),
            _ => Err(format!(
                "Invalid table status: {}. Must be one of: available, reserved, occupied",
                s
            )),
        }
    }
}

/// A physical table in the dining room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantTable {
    pub id: Uuid,
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RestaurantTable {
    /// Human readable label used in guest emails.
    pub fn describe(&self) -> String {
        format!("Table {} ({} seats)", self.number, self.capacity)
    }

    pub fn seats(&self, guests: i32) -> bool {
        self.capacity >= guests
    }
}

/// Request payload for creating a table.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTableRequest {
    #[validate(range(min = 1, max = 999, message = "Table number must be between 1 and 999"))]
    pub number: i32,

    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub capacity: i32,

    pub status: Option<TableStatus>,
}

/// Request payload for updating a table (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(range(min = 1, max = 999, message = "Table number must be between 1 and 999"))]
    pub number: Option<i32>,

    #[validate(range(min = 1, max = 50, message = "Capacity must be between 1 and 50"))]
    pub capacity: Option<i32>,

    pub status: Option<TableStatus>,
}

/// Query parameters for listing tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTablesQuery {
    pub status: Option<TableStatus>,
}

/// Response for listing tables.
#[derive(Debug, Clone, Serialize)]
pub struct ListTablesResponse {
    pub tables: Vec<RestaurantTable>,
    pub total: usize,
}
