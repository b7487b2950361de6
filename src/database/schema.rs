//! Booking schema DDL
//!
//! Statements run in order on create and in reverse dependency order on drop.

/// Table and index definitions, parents first
pub const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id UUID PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone VARCHAR(20),
        bookings_taken INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email)",
    r#"
    CREATE TABLE IF NOT EXISTS pets (
        pet_id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (user_id) ON DELETE CASCADE,
        name VARCHAR(100) NOT NULL,
        breed VARCHAR(100),
        species VARCHAR(50) NOT NULL,
        age INTEGER,
        weight NUMERIC(10, 2),
        special_instructions TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_pets_user_id ON pets (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        booking_id UUID PRIMARY KEY,
        booking_date_time TIMESTAMPTZ NOT NULL,
        booking_status VARCHAR(20) NOT NULL DEFAULT 'pending',
        groomer_id UUID NOT NULL,
        user_id UUID NOT NULL REFERENCES users (user_id) ON DELETE CASCADE,
        pet_id UUID NOT NULL REFERENCES pets (pet_id) ON DELETE NO ACTION,
        rating NUMERIC(3, 2)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_bookings_booking_date_time ON bookings (booking_date_time)",
    "CREATE INDEX IF NOT EXISTS ix_bookings_groomer_id ON bookings (groomer_id)",
    "CREATE INDEX IF NOT EXISTS ix_bookings_user_id ON bookings (user_id)",
    "CREATE INDEX IF NOT EXISTS ix_bookings_pet_id ON bookings (pet_id)",
];

/// Children first so foreign keys never block the drop
pub const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS bookings",
    "DROP TABLE IF EXISTS pets",
    "DROP TABLE IF EXISTS users",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_dropped_in_reverse_creation_order() {
        let created: Vec<&str> = CREATE_STATEMENTS
            .iter()
            .filter_map(|sql| {
                sql.split_whitespace()
                    .skip_while(|word| *word != "EXISTS")
                    .nth(1)
                    .filter(|_| sql.contains("CREATE TABLE"))
            })
            .collect();
        let dropped: Vec<&str> = DROP_STATEMENTS
            .iter()
            .filter_map(|sql| sql.split_whitespace().last())
            .collect();

        assert_eq!(created, vec!["users", "pets", "bookings"]);
        assert_eq!(dropped, vec!["bookings", "pets", "users"]);
    }
}
