#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Booking Service
//!
//! Backend for a pet grooming booking system.
//!
//! ## Overview
//!
//! The service exposes a health endpoint over HTTP and, alongside it, runs a
//! background consumer that pulls booking events from a message queue. Each
//! message is handed to a [`messaging::MessageHandler`] and acknowledged only
//! after the handler succeeds, so a failed message is redelivered by the queue.
//!
//! ## Module Organization
//!
//! - [`messaging`] - Queue consumer, message types and the pgmq backend
//! - [`web`] - Health API
//! - [`bootstrap`] - Wiring of consumer and HTTP server, graceful shutdown
//! - [`config`] - Settings from defaults, file, `.env` and environment
//! - [`logging`] - Structured logging setup
//! - [`database`] / [`models`] - Users, pets and bookings in PostgreSQL
//! - [`error`] - Service-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use booking_service::bootstrap::ServiceBootstrap;
//! use booking_service::config::Settings;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let handle = ServiceBootstrap::bootstrap(settings).await?;
//! handle.serve(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use bootstrap::{ServiceBootstrap, ServiceHandle};
pub use config::Settings;
pub use error::{BookingError, BookingResult};
pub use messaging::{ConsumerState, InboundMessage, MessageHandler, QueueConsumer};
