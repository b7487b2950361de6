//! # Booking Data Model
//!
//! Users, their pets and grooming bookings. Every query is generic over
//! [`sqlx::PgExecutor`], so it runs against a pool or inside a transaction.

pub mod booking;
pub mod pet;
pub mod user;

pub use booking::{Booking, BookingStatus, NewBooking, UnknownBookingStatus};
pub use pet::{NewPet, Pet};
pub use user::{NewUser, User};
