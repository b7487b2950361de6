//! Grooming appointments and their status lifecycle.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use thiserror::Error;
use uuid::Uuid;

/// Status of a booking, stored as its lowercase name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownBookingStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownBookingStatus(s.to_string()))
    }
}

/// A grooming appointment for one pet
/// Maps to `bookings` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub booking_id: Uuid,
    pub booking_date_time: DateTime<Utc>,
    pub booking_status: String,
    pub groomer_id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub rating: Option<BigDecimal>,
}

/// New Booking for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub booking_date_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub groomer_id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub rating: Option<BigDecimal>,
}

impl Booking {
    /// Typed view of the stored status
    pub fn status(&self) -> Result<BookingStatus, UnknownBookingStatus> {
        self.booking_status.parse()
    }

    /// Create a new booking
    pub async fn create<'e, E>(executor: E, new_booking: NewBooking) -> Result<Booking, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (booking_id, booking_date_time, booking_status, groomer_id, user_id, pet_id, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING booking_id, booking_date_time, booking_status, groomer_id, user_id, pet_id, rating
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_booking.booking_date_time)
        .bind(new_booking.status.as_str())
        .bind(new_booking.groomer_id)
        .bind(new_booking.user_id)
        .bind(new_booking.pet_id)
        .bind(new_booking.rating)
        .fetch_one(executor)
        .await
    }

    /// Find a booking by ID
    pub async fn find_by_id<'e, E>(
        executor: E,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT booking_id, booking_date_time, booking_status, groomer_id, user_id, pet_id, rating
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(executor)
        .await
    }

    /// List all bookings, earliest appointment first
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT booking_id, booking_date_time, booking_status, groomer_id, user_id, pet_id, rating
            FROM bookings
            ORDER BY booking_date_time
            "#,
        )
        .fetch_all(executor)
        .await
    }

    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT booking_id, booking_date_time, booking_status, groomer_id, user_id, pet_id, rating
            FROM bookings
            WHERE user_id = $1
            ORDER BY booking_date_time
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Move a booking to a new status; `None` when the booking does not exist
    pub async fn update_status<'e, E>(
        executor: E,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET booking_status = $2
            WHERE booking_id = $1
            RETURNING booking_id, booking_date_time, booking_status, groomer_id, user_id, pet_id, rating
            "#,
        )
        .bind(booking_id)
        .bind(status.as_str())
        .fetch_optional(executor)
        .await
    }

    pub async fn delete_all<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM bookings").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
