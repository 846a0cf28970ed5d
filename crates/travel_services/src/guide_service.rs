use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::*;

/// Service for handling guide roster operations
pub struct GuideService {
    pool: PgPool,
}

impl GuideService {
    /// Creates a new instance of `GuideService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all guides ordered by name
    pub async fn list_guides(&self) -> Result<Vec<Guide>, TravelError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, bio, created_at, updated_at
            FROM guides
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::guide_from_row).collect())
    }

    /// Gets a single guide by ID
    pub async fn get_guide(&self, guide_id: &Uuid) -> Result<Guide, TravelError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, bio, created_at, updated_at
            FROM guides
            WHERE id = $1
            "#,
        )
        .bind(guide_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::guide_from_row(&row)),
            None => Err(TravelError::GuideNotFound),
        }
    }

    /// Creates a new guide
    pub async fn create_guide(&self, request: &GuideRequest) -> Result<Guide, TravelError> {
        let existing = sqlx::query("SELECT id FROM guides WHERE email = $1")
            .bind(request.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(TravelError::GuideEmailExists);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO guides (name, email, phone, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, bio, created_at, updated_at
            "#,
        )
        .bind(request.name.trim())
        .bind(request.email.to_lowercase().trim())
        .bind(&request.phone)
        .bind(&request.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                TravelError::GuideEmailExists
            } else {
                TravelError::Database(e)
            }
        })?;

        Ok(Self::guide_from_row(&row))
    }

    /// Updates an existing guide
    pub async fn update_guide(
        &self,
        guide_id: &Uuid,
        request: &GuideRequest,
    ) -> Result<Guide, TravelError> {
        // The new email must not belong to another guide
        let taken = sqlx::query("SELECT id FROM guides WHERE email = $1 AND id != $2")
            .bind(request.email.to_lowercase())
            .bind(guide_id)
            .fetch_optional(&self.pool)
            .await?;

        if taken.is_some() {
            return Err(TravelError::GuideEmailExists);
        }

        let row = sqlx::query(
            r#"
            UPDATE guides
            SET name = $1, email = $2, phone = $3, bio = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, email, phone, bio, created_at, updated_at
            "#,
        )
        .bind(request.name.trim())
        .bind(request.email.to_lowercase().trim())
        .bind(&request.phone)
        .bind(&request.bio)
        .bind(guide_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::guide_from_row(&row)),
            None => Err(TravelError::GuideNotFound),
        }
    }

    /// Deletes a guide.
    ///
    /// Always allowed: trip assignments cascade away with the guide.
    pub async fn delete_guide(&self, guide_id: &Uuid) -> Result<(), TravelError> {
        let result = sqlx::query("DELETE FROM guides WHERE id = $1")
            .bind(guide_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TravelError::GuideNotFound);
        }

        Ok(())
    }

    /// Gets the guides assigned to a trip, ordered by name
    pub async fn get_trip_guides(&self, trip_id: &Uuid) -> Result<Vec<Guide>, TravelError> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.name, g.email, g.phone, g.bio, g.created_at, g.updated_at
            FROM guides g
            INNER JOIN trip_guides tg ON tg.guide_id = g.id
            WHERE tg.trip_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::guide_from_row).collect())
    }

    fn guide_from_row(row: &sqlx::postgres::PgRow) -> Guide {
        Guide {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            phone: row.get("phone"),
            bio: row.get("bio"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}
