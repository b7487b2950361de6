//! # Booking Data Model Demo
//!
//! Exercises the booking tables end to end: creates the schema, inserts three
//! users with one pet and one confirmed booking each in a single transaction,
//! reads everything back, then removes the rows and drops the tables.
//!
//! ```bash
//! DB_CONNECTION_STRING=postgresql://localhost/bookings cargo run --bin booking-demo
//! ```

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{TimeZone, Utc};
use sqlx::PgConnection;
use tracing::{error, info};
use uuid::Uuid;

use booking_service::config::loader::load_dotenv;
use booking_service::database::DatabaseManager;
use booking_service::error::{BookingError, BookingResult};
use booking_service::logging::{self, LoggingOptions};
use booking_service::models::{
    Booking, BookingStatus, NewBooking, NewPet, NewUser, Pet, User,
};

const DB_CONNECTION_STRING_ENV: &str = "DB_CONNECTION_STRING";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing(&LoggingOptions::default());
    load_dotenv();

    let Ok(connection_string) = std::env::var(DB_CONNECTION_STRING_ENV) else {
        let message = format!("{DB_CONNECTION_STRING_ENV} environment variable is not set");
        error!("{message}");
        return Err(BookingError::validation(message).into());
    };

    let database = DatabaseManager::connect(&connection_string).await?;
    let outcome = run_demo(&database).await;
    database.close().await;

    if let Err(e) = &outcome {
        error!(error = %e, "Booking demo failed");
    }
    outcome.map_err(Into::into)
}

async fn run_demo(database: &DatabaseManager) -> BookingResult<()> {
    database.create_tables().await?;

    let mut tx = database.transaction().await?;
    let users = create_users(&mut tx).await?;
    let pets = create_pets(&mut tx, &users).await?;
    create_bookings(&mut tx, &pets).await?;
    tx.commit().await?;

    for user in User::list_all(database.pool()).await? {
        info!(user_id = %user.user_id, name = %user.full_name(), email = %user.email, "User");
    }
    for pet in Pet::list_all(database.pool()).await? {
        info!(pet_id = %pet.pet_id, name = %pet.name, species = %pet.species, "Pet");
    }
    for booking in Booking::list_all(database.pool()).await? {
        let status = booking
            .status()
            .map_err(|e| BookingError::validation(e.to_string()))?;
        info!(
            booking_id = %booking.booking_id,
            date_time = %booking.booking_date_time,
            status = %status,
            "Booking"
        );
    }

    let bookings = Booking::delete_all(database.pool()).await?;
    let pets = Pet::delete_all(database.pool()).await?;
    let users = User::delete_all(database.pool()).await?;
    info!(bookings, pets, users, "Deleted demo rows");

    database.drop_tables().await?;
    info!("Booking demo complete");
    Ok(())
}

async fn create_users(conn: &mut PgConnection) -> BookingResult<Vec<User>> {
    let new_users = [
        ("John", "Doe", "john.doe@example.com", "+1-555-123-4567"),
        ("Jane", "Smith", "jane.smith@example.com", "+1-555-987-6543"),
        ("Jim", "Beam", "jim.beam@example.com", "+1-555-123-7890"),
    ];

    let mut users = Vec::with_capacity(new_users.len());
    for (first_name, last_name, email, phone) in new_users {
        let user = User::create(
            &mut *conn,
            NewUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                phone: Some(phone.to_string()),
            },
        )
        .await?;
        users.push(user);
    }

    info!(count = users.len(), "Created users");
    Ok(users)
}

async fn create_pets(conn: &mut PgConnection, users: &[User]) -> BookingResult<Vec<Pet>> {
    let new_pets = [
        ("Buddy", "Golden Retriever", "Dog", 3, "30.5", "Friendly but nervous around loud noises"),
        ("Max", "Labrador", "Dog", 5, "35.2", "Loves to play fetch"),
        ("Whiskers", "Siamese", "Cat", 2, "4.5", "Prefers quiet environments"),
    ];

    let mut pets = Vec::with_capacity(new_pets.len());
    for (owner, (name, breed, species, age, weight, instructions)) in users.iter().zip(new_pets) {
        let weight = BigDecimal::from_str(weight)
            .map_err(|e| BookingError::validation(format!("invalid pet weight {weight}: {e}")))?;
        let pet = Pet::create(
            &mut *conn,
            NewPet {
                user_id: owner.user_id,
                name: name.to_string(),
                breed: Some(breed.to_string()),
                species: species.to_string(),
                age: Some(age),
                weight: Some(weight),
                special_instructions: Some(instructions.to_string()),
            },
        )
        .await?;
        pets.push(pet);
    }

    info!(count = pets.len(), "Created pets");
    Ok(pets)
}

async fn create_bookings(conn: &mut PgConnection, pets: &[Pet]) -> BookingResult<Vec<Booking>> {
    let mut bookings = Vec::with_capacity(pets.len());
    for (pet, day) in pets.iter().zip(15..) {
        let booking_date_time = Utc
            .with_ymd_and_hms(2025, 12, day, 10, 0, 0)
            .single()
            .ok_or_else(|| BookingError::validation(format!("invalid booking day {day}")))?;

        let booking = Booking::create(
            &mut *conn,
            NewBooking {
                booking_date_time,
                status: BookingStatus::Confirmed,
                groomer_id: Uuid::new_v4(),
                user_id: pet.user_id,
                pet_id: pet.pet_id,
                rating: None,
            },
        )
        .await?;
        bookings.push(booking);
    }

    info!(count = bookings.len(), "Created bookings");
    Ok(bookings)
}
