//! Restaurant table entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::TableStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "table_status", rename_all = "lowercase")]
pub enum TableStatusDb {
    Available,
    Reserved,
    Occupied,
}

impl From<TableStatusDb> for TableStatus {
    fn from(db: TableStatusDb) -> Self {
        match db {
            TableStatusDb::Available => TableStatus::Available,
            TableStatusDb::Reserved => TableStatus::Reserved,
            TableStatusDb::Occupied => TableStatus::Occupied,
        }
    }
}

impl From<TableStatus> for TableStatusDb {
    fn from(status: TableStatus) -> Self {
        match status {
            TableStatus::Available => TableStatusDb::Available,
            TableStatus::Reserved => TableStatusDb::Reserved,
            TableStatus::Occupied => TableStatusDb::Occupied,
        }
    }
}

/// Database row mapping for the restaurant_tables table.
#[derive(Debug, Clone, FromRow)]
pub struct TableEntity {
    pub id: Uuid,
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TableEntity> for domain::models::RestaurantTable {
    fn from(entity: TableEntity) -> Self {
        Self {
            id: entity.id,
            number: entity.number,
            capacity: entity.capacity,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Table count per status.
#[derive(Debug, Clone, FromRow)]
pub struct TableStatusCount {
    pub status: TableStatusDb,
    pub count: i64,
}
