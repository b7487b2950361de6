use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A pet owned by a user
/// Maps to `pets` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Pet {
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub species: String,
    pub age: Option<i32>,
    pub weight: Option<BigDecimal>,
    pub special_instructions: Option<String>,
}

/// New Pet for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPet {
    pub user_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub species: String,
    pub age: Option<i32>,
    pub weight: Option<BigDecimal>,
    pub special_instructions: Option<String>,
}

impl Pet {
    /// Create a new pet
    pub async fn create<'e, E>(executor: E, new_pet: NewPet) -> Result<Pet, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Pet>(
            r#"
            INSERT INTO pets (pet_id, user_id, name, breed, species, age, weight, special_instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING pet_id, user_id, name, breed, species, age, weight, special_instructions
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_pet.user_id)
        .bind(new_pet.name)
        .bind(new_pet.breed)
        .bind(new_pet.species)
        .bind(new_pet.age)
        .bind(new_pet.weight)
        .bind(new_pet.special_instructions)
        .fetch_one(executor)
        .await
    }

    /// Find a pet by ID
    pub async fn find_by_id<'e, E>(executor: E, pet_id: Uuid) -> Result<Option<Pet>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Pet>(
            r#"
            SELECT pet_id, user_id, name, breed, species, age, weight, special_instructions
            FROM pets
            WHERE pet_id = $1
            "#,
        )
        .bind(pet_id)
        .fetch_optional(executor)
        .await
    }

    /// List all pets
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Pet>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Pet>(
            r#"
            SELECT pet_id, user_id, name, breed, species, age, weight, special_instructions
            FROM pets
            ORDER BY name
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// List the pets owned by a user
    pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Pet>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Pet>(
            r#"
            SELECT pet_id, user_id, name, breed, species, age, weight, special_instructions
            FROM pets
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    pub async fn delete_all<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM pets").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
