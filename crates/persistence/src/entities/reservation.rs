//! Reservation entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::ReservationStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for reservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
pub enum ReservationStatusDb {
    Pending,
    Accepted,
    Cancelled,
    Arrived,
}

impl From<ReservationStatusDb> for ReservationStatus {
    fn from(db: ReservationStatusDb) -> Self {
        match db {
            ReservationStatusDb::Pending => ReservationStatus::Pending,
            ReservationStatusDb::Accepted => ReservationStatus::Accepted,
            ReservationStatusDb::Cancelled => ReservationStatus::Cancelled,
            ReservationStatusDb::Arrived => ReservationStatus::Arrived,
        }
    }
}

impl From<ReservationStatus> for ReservationStatusDb {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => ReservationStatusDb::Pending,
            ReservationStatus::Accepted => ReservationStatusDb::Accepted,
            ReservationStatus::Cancelled => ReservationStatusDb::Cancelled,
            ReservationStatus::Arrived => ReservationStatusDb::Arrived,
        }
    }
}

/// Database row mapping for the reservations table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationEntity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: i32,
    pub remark: Option<String>,
    pub status: ReservationStatusDb,
    pub table_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReservationEntity> for domain::models::Reservation {
    fn from(entity: ReservationEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone: entity.phone,
            date: entity.date,
            time: entity.time,
            guests: entity.guests,
            remark: entity.remark,
            status: entity.status.into(),
            table_id: entity.table_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Minimal row used for statistics.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationStatsRow {
    pub date: NaiveDate,
    pub status: ReservationStatusDb,
}
