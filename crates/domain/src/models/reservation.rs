//! Reservation domain model and public booking rules.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::settings::RestaurantSettings;

/// Longest accepted first or last name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Shortest accepted one-word `name`.
pub const MIN_SINGLE_NAME_LEN: usize = 2;

// ============================================================================
// Reservation Status
// ============================================================================

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Cancelled,
    Arrived,
}

impl ReservationStatus {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Accepted => "accepted",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Arrived => "arrived",
        }
    }

    /// Check if transition to target state is valid.
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        matches!(
            (self, target),
            (ReservationStatus::Pending, ReservationStatus::Accepted)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Accepted, ReservationStatus::Arrived)
                | (ReservationStatus::Accepted, ReservationStatus::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::Arrived)
    }

    /// Statuses in which a reservation still holds on to its table.
    pub fn active() -> [ReservationStatus; 3] {
        [
            ReservationStatus::Pending,
            ReservationStatus::Accepted,
            ReservationStatus::Arrived,
        ]
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "accepted" => Ok(ReservationStatus::Accepted),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "arrived" => Ok(ReservationStatus::Arrived),
            _ => Err(format!(
                "Invalid reservation status: {}. Must be one of: pending, accepted, cancelled, arrived",
                s
            )),
        }
    }
}

// ============================================================================
// Core Model
// ============================================================================

/// A guest reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "shared::time_format")]
    pub time: NaiveTime,
    pub guests: i32,
    pub remark: Option<String>,
    pub status: ReservationStatus,
    pub table_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim_end()
            .to_string()
    }
}

/// A validated booking ready to be inserted with status `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: i32,
    pub remark: Option<String>,
}

// ============================================================================
// Booking
// ============================================================================

/// Reasons a public booking is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("First and last name are required")]
    MissingName,

    #[error("{field} must be 1-{max} characters", max = MAX_NAME_LEN)]
    NameLength { field: &'static str },

    #[error("Name must be at least {min} characters", min = MIN_SINGLE_NAME_LEN)]
    NameTooShort,

    #[error("Number of guests must be between 1 and {max}")]
    PartySize { max: i32 },

    #[error("Reservations cannot be made for past dates")]
    PastDate,

    #[error("The restaurant is closed on {0}")]
    ClosedDate(NaiveDate),

    #[error("Requested time {time} is outside opening hours ({opening}-{closing})")]
    OutsideOpeningHours {
        time: String,
        opening: String,
        closing: String,
    },
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Public booking submission.
///
/// Accepts either `first_name`/`last_name` or a single `name` that is split
/// at the first whitespace. A one-word `name` is stored as the first name
/// with an empty last name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReservationRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 101, message = "Name is too long"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    pub date: NaiveDate,

    #[serde(with = "shared::time_format")]
    pub time: NaiveTime,

    pub guests: i32,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 500, message = "Remark must be at most 500 characters"))]
    pub remark: Option<String>,
}

impl CreateReservationRequest {
    /// Resolves the guest's first and last name.
    pub fn guest_name(&self) -> Result<(String, String), BookingError> {
        let (first, last) = match (&self.first_name, &self.last_name, &self.name) {
            (Some(first), Some(last), _) => (first.clone(), last.clone()),
            (_, _, Some(name)) => match name.split_once(char::is_whitespace) {
                Some((first, last)) => (first.to_string(), last.trim().to_string()),
                None => {
                    if name.chars().count() < MIN_SINGLE_NAME_LEN {
                        return Err(BookingError::NameTooShort);
                    }
                    check_name_length("Name", name)?;
                    return Ok((name.clone(), String::new()));
                }
            },
            _ => return Err(BookingError::MissingName),
        };

        check_name_length("First name", &first)?;
        check_name_length("Last name", &last)?;
        Ok((first, last))
    }

    /// Applies the booking rules and produces the row to insert.
    ///
    /// Field formats (email, phone, remark) are checked by `validate()`;
    /// this covers the rules that depend on settings and the current date.
    pub fn into_new_reservation(
        self,
        settings: &RestaurantSettings,
        today: NaiveDate,
        max_party_size: i32,
    ) -> Result<NewReservation, BookingError> {
        let (first_name, last_name) = self.guest_name()?;

        if self.guests < 1 || self.guests > max_party_size {
            return Err(BookingError::PartySize {
                max: max_party_size,
            });
        }
        if self.date < today {
            return Err(BookingError::PastDate);
        }
        if settings.is_closed(self.date) {
            return Err(BookingError::ClosedDate(self.date));
        }
        if !settings.is_open_at(self.time) {
            return Err(BookingError::OutsideOpeningHours {
                time: shared::time_format::format(&self.time),
                opening: shared::time_format::format(&settings.opening_time),
                closing: shared::time_format::format(&settings.closing_time),
            });
        }

        Ok(NewReservation {
            first_name,
            last_name,
            email: shared::validation::normalize_email(&self.email),
            phone: self.phone,
            date: self.date,
            time: self.time,
            guests: self.guests,
            remark: self.remark,
        })
    }
}

fn check_name_length(field: &'static str, value: &str) -> Result<(), BookingError> {
    let len = value.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        Err(BookingError::NameLength { field })
    } else {
        Ok(())
    }
}

/// Response after a successful booking.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReservationResponse {
    pub success: bool,
    pub data: Reservation,
}

// ============================================================================
// Staff requests
// ============================================================================

/// Requested change to a reservation's table reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableChange {
    #[default]
    Keep,
    Assign(Uuid),
    Clear,
}

fn table_change<'de, D>(deserializer: D) -> Result<TableChange, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Uuid> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(id) => TableChange::Assign(id),
        None => TableChange::Clear,
    })
}

/// Staff edit of a reservation.
///
/// An absent `table_id` keeps the table, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    pub date: Option<NaiveDate>,

    #[serde(default, with = "shared::time_format::option")]
    pub time: Option<NaiveTime>,

    #[validate(range(min = 1, max = 100, message = "Number of guests must be between 1 and 100"))]
    pub guests: Option<i32>,

    #[serde(default, deserialize_with = "table_change")]
    pub table_id: TableChange,
}

/// Request payload for assigning a table.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignTableRequest {
    pub table_id: Uuid,
}

/// Query parameters for listing reservations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListReservationsQuery {
    pub status: Option<ReservationStatus>,
    pub date: Option<NaiveDate>,
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
}

/// Response for listing reservations.
#[derive(Debug, Clone, Serialize)]
pub struct ListReservationsResponse {
    pub reservations: Vec<Reservation>,
    pub total: usize,
}
