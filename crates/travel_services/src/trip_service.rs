use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::guide_service::GuideService;
use crate::types::*;

/// Service for handling trip catalog operations and guide assignment
pub struct TripService {
    pool: PgPool,
}

impl TripService {
    /// Creates a new instance of `TripService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists trips with destination and seat information, optionally
    /// filtered to a single destination
    pub async fn list_trips(
        &self,
        destination_id: Option<Uuid>,
    ) -> Result<Vec<TripSummary>, TravelError> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.id, t.destination_id, t.name, t.start_date, t.end_date,
                t.price_cents, t.capacity, d.name AS destination_name,
                COALESCE(r.seats_taken, 0) AS seats_taken
            FROM trips t
            INNER JOIN destinations d ON d.id = t.destination_id
            LEFT JOIN (
                SELECT trip_id, SUM(participants) AS seats_taken
                FROM trip_registrations
                GROUP BY trip_id
            ) r ON r.trip_id = t.id
            WHERE $1::uuid IS NULL OR t.destination_id = $1
            ORDER BY t.start_date
            "#,
        )
        .bind(destination_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::summary_from_row).collect())
    }

    /// Gets a trip with its destination, seat counts, and assigned guides
    pub async fn get_trip(&self, trip_id: &Uuid) -> Result<TripDetails, TravelError> {
        let row = sqlx::query(
            r#"
            SELECT
                t.id, t.destination_id, t.name, t.start_date, t.end_date,
                t.price_cents, t.capacity, d.name AS destination_name,
                COALESCE(r.seats_taken, 0) AS seats_taken
            FROM trips t
            INNER JOIN destinations d ON d.id = t.destination_id
            LEFT JOIN (
                SELECT trip_id, SUM(participants) AS seats_taken
                FROM trip_registrations
                GROUP BY trip_id
            ) r ON r.trip_id = t.id
            WHERE t.id = $1
            "#,
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;

        let trip = match row {
            Some(row) => Self::summary_from_row(&row),
            None => return Err(TravelError::TripNotFound),
        };

        let guides = GuideService::new(self.pool.clone())
            .get_trip_guides(trip_id)
            .await?;

        Ok(TripDetails { trip, guides })
    }

    /// Creates a trip and assigns its guides atomically
    pub async fn create_trip(&self, request: &CreateTripRequest) -> Result<TripDetails, TravelError> {
        if request.end_date <= request.start_date {
            return Err(TravelError::InvalidDateRange);
        }

        let destination = sqlx::query("SELECT id FROM destinations WHERE id = $1")
            .bind(request.destination_id)
            .fetch_optional(&self.pool)
            .await?;

        if destination.is_none() {
            return Err(TravelError::DestinationNotFound);
        }

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO trips (destination_id, name, start_date, end_date, price_cents, capacity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(request.destination_id)
        .bind(request.name.trim())
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price_cents)
        .bind(request.capacity)
        .fetch_one(&mut *tx)
        .await?;

        let trip_id: Uuid = row.get("id");

        Self::replace_guides(&mut tx, &trip_id, &request.guide_ids).await?;

        tx.commit().await?;

        self.get_trip(&trip_id).await
    }

    /// Updates a trip, optionally replacing its guide assignments
    pub async fn update_trip(
        &self,
        trip_id: &Uuid,
        request: &UpdateTripRequest,
    ) -> Result<TripDetails, TravelError> {
        if request.end_date <= request.start_date {
            return Err(TravelError::InvalidDateRange);
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE trips
            SET name = $1, start_date = $2, end_date = $3, price_cents = $4,
                capacity = $5, updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(request.name.trim())
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price_cents)
        .bind(request.capacity)
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TravelError::TripNotFound);
        }

        if let Some(guide_ids) = &request.guide_ids {
            Self::replace_guides(&mut tx, trip_id, guide_ids).await?;
        }

        tx.commit().await?;

        self.get_trip(trip_id).await
    }

    /// Replaces a trip's guide set
    pub async fn set_guides(
        &self,
        trip_id: &Uuid,
        guide_ids: &[Uuid],
    ) -> Result<TripDetails, TravelError> {
        let trip = sqlx::query("SELECT id FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        if trip.is_none() {
            return Err(TravelError::TripNotFound);
        }

        let mut tx = self.pool.begin().await?;
        Self::replace_guides(&mut tx, trip_id, guide_ids).await?;
        tx.commit().await?;

        self.get_trip(trip_id).await
    }

    /// Deletes a trip.
    ///
    /// Rejected while registrations exist; guide assignments cascade away.
    pub async fn delete_trip(&self, trip_id: &Uuid) -> Result<(), TravelError> {
        let row =
            sqlx::query("SELECT COUNT(*) AS registrations FROM trip_registrations WHERE trip_id = $1")
                .bind(trip_id)
                .fetch_one(&self.pool)
                .await?;

        let registration_count: i64 = row.get("registrations");
        if registration_count > 0 {
            return Err(TravelError::TripHasRegistrations);
        }

        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(trip_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    TravelError::TripHasRegistrations
                } else {
                    TravelError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(TravelError::TripNotFound);
        }

        Ok(())
    }

    /// Clears and re-inserts the association rows inside the caller's transaction
    async fn replace_guides(
        tx: &mut Transaction<'_, Postgres>,
        trip_id: &Uuid,
        guide_ids: &[Uuid],
    ) -> Result<(), TravelError> {
        sqlx::query("DELETE FROM trip_guides WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut **tx)
            .await?;

        for guide_id in guide_ids {
            let guide = sqlx::query("SELECT id FROM guides WHERE id = $1")
                .bind(guide_id)
                .fetch_optional(&mut **tx)
                .await?;

            if guide.is_none() {
                return Err(TravelError::GuideNotFound);
            }

            sqlx::query(
                r#"
                INSERT INTO trip_guides (trip_id, guide_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(trip_id)
            .bind(guide_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    fn summary_from_row(row: &sqlx::postgres::PgRow) -> TripSummary {
        let capacity: i32 = row.get("capacity");
        let seats_taken: i64 = row.get("seats_taken");

        TripSummary {
            id: row.get("id"),
            destination_id: row.get("destination_id"),
            destination_name: row.get("destination_name"),
            name: row.get("name"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            price_cents: row.get("price_cents"),
            capacity,
            seats_taken,
            seats_left: crate::registration_service::seats_remaining(capacity, seats_taken),
        }
    }
}
