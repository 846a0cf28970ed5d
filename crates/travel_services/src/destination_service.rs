use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::*;

/// Service for handling destination catalog operations
pub struct DestinationService {
    pool: PgPool,
}

impl DestinationService {
    /// Creates a new instance of `DestinationService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all destinations ordered by name
    pub async fn list_destinations(&self) -> Result<Vec<Destination>, TravelError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, country, city, description, image_url, created_at, updated_at
            FROM destinations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::destination_from_row).collect())
    }

    /// Gets a single destination by ID
    pub async fn get_destination(&self, destination_id: &Uuid) -> Result<Destination, TravelError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, country, city, description, image_url, created_at, updated_at
            FROM destinations
            WHERE id = $1
            "#,
        )
        .bind(destination_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::destination_from_row(&row)),
            None => Err(TravelError::DestinationNotFound),
        }
    }

    /// Creates a new destination
    pub async fn create_destination(
        &self,
        request: &DestinationRequest,
    ) -> Result<Destination, TravelError> {
        let row = sqlx::query(
            r#"
            INSERT INTO destinations (name, country, city, description, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, country, city, description, image_url, created_at, updated_at
            "#,
        )
        .bind(request.name.trim())
        .bind(request.country.trim())
        .bind(request.city.trim())
        .bind(&request.description)
        .bind(&request.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::destination_from_row(&row))
    }

    /// Updates an existing destination
    pub async fn update_destination(
        &self,
        destination_id: &Uuid,
        request: &DestinationRequest,
    ) -> Result<Destination, TravelError> {
        let row = sqlx::query(
            r#"
            UPDATE destinations
            SET name = $1, country = $2, city = $3, description = $4, image_url = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING id, name, country, city, description, image_url, created_at, updated_at
            "#,
        )
        .bind(request.name.trim())
        .bind(request.country.trim())
        .bind(request.city.trim())
        .bind(&request.description)
        .bind(&request.image_url)
        .bind(destination_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::destination_from_row(&row)),
            None => Err(TravelError::DestinationNotFound),
        }
    }

    /// Deletes a destination.
    ///
    /// Rejected while trips still reference it, both by an explicit check and
    /// by the RESTRICT foreign key underneath.
    pub async fn delete_destination(&self, destination_id: &Uuid) -> Result<(), TravelError> {
        let row = sqlx::query("SELECT COUNT(*) AS trips FROM trips WHERE destination_id = $1")
            .bind(destination_id)
            .fetch_one(&self.pool)
            .await?;

        let trip_count: i64 = row.get("trips");
        if trip_count > 0 {
            return Err(TravelError::DestinationHasTrips);
        }

        let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(destination_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    TravelError::DestinationHasTrips
                } else {
                    TravelError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(TravelError::DestinationNotFound);
        }

        Ok(())
    }

    fn destination_from_row(row: &sqlx::postgres::PgRow) -> Destination {
        Destination {
            id: row.get("id"),
            name: row.get("name"),
            country: row.get("country"),
            city: row.get("city"),
            description: row.get("description"),
            image_url: row.get("image_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}
