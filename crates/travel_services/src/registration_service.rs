use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::*;

/// Service for handling trip registrations
pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    /// Creates a new instance of `RegistrationService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a user for a trip.
    ///
    /// Runs in a transaction holding a row lock on the trip so concurrent
    /// registrations cannot oversell the capacity. The total price is fixed
    /// from the trip's current price at registration time.
    pub async fn register(
        &self,
        user_id: &Uuid,
        request: &CreateRegistrationRequest,
    ) -> Result<TripRegistration, TravelError> {
        let mut tx = self.pool.begin().await?;

        let trip = sqlx::query(
            "SELECT price_cents, capacity FROM trips WHERE id = $1 FOR UPDATE",
        )
        .bind(request.trip_id)
        .fetch_optional(&mut *tx)
        .await?;

        let trip = match trip {
            Some(trip) => trip,
            None => return Err(TravelError::TripNotFound),
        };

        let price_cents: i64 = trip.get("price_cents");
        let capacity: i32 = trip.get("capacity");

        let duplicate = sqlx::query(
            "SELECT id FROM trip_registrations WHERE trip_id = $1 AND user_id = $2",
        )
        .bind(request.trip_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if duplicate.is_some() {
            return Err(TravelError::DuplicateRegistration);
        }

        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(participants), 0) AS seats_taken
            FROM trip_registrations
            WHERE trip_id = $1
            "#,
        )
        .bind(request.trip_id)
        .fetch_one(&mut *tx)
        .await?;

        let seats_taken: i64 = row.get("seats_taken");
        let available = seats_remaining(capacity, seats_taken);
        if i64::from(request.participants) > available {
            return Err(TravelError::TripFull { available });
        }

        let total_cents = registration_total(price_cents, request.participants)
            .ok_or_else(|| TravelError::Validation("Total price is out of range".to_string()))?;

        let confirmation_code = generate_confirmation_code();

        let row = sqlx::query(
            r#"
            INSERT INTO trip_registrations (
                trip_id, user_id, participants, total_cents, confirmation_code
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, trip_id, user_id, participants, total_cents,
                confirmation_code, registered_at
            "#,
        )
        .bind(request.trip_id)
        .bind(user_id)
        .bind(request.participants)
        .bind(total_cents)
        .bind(&confirmation_code)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                TravelError::DuplicateRegistration
            } else {
                TravelError::Database(e)
            }
        })?;

        let registration = TripRegistration {
            id: row.get("id"),
            trip_id: row.get("trip_id"),
            user_id: row.get("user_id"),
            participants: row.get("participants"),
            total_cents: row.get("total_cents"),
            confirmation_code: row.get("confirmation_code"),
            registered_at: row.get("registered_at"),
        };

        tx.commit().await?;

        log::info!(
            "User {} registered {} participants for trip {} ({})",
            user_id,
            registration.participants,
            registration.trip_id,
            registration.confirmation_code
        );

        Ok(registration)
    }

    /// Gets all registrations for a user with trip and destination information
    pub async fn get_user_registrations(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<RegistrationWithTrip>, TravelError> {
        let rows = sqlx::query(
            r#"
            SELECT
                r.id, r.trip_id, r.participants, r.total_cents,
                r.confirmation_code, r.registered_at,
                t.name AS trip_name, t.start_date, t.end_date,
                d.name AS destination_name
            FROM trip_registrations r
            INNER JOIN trips t ON t.id = r.trip_id
            INNER JOIN destinations d ON d.id = t.destination_id
            WHERE r.user_id = $1
            ORDER BY r.registered_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::with_trip_from_row).collect())
    }

    /// Gets a specific registration by ID, ensuring it belongs to the user
    pub async fn get_user_registration(
        &self,
        user_id: &Uuid,
        registration_id: &Uuid,
    ) -> Result<RegistrationWithTrip, TravelError> {
        let row = sqlx::query(
            r#"
            SELECT
                r.id, r.trip_id, r.participants, r.total_cents,
                r.confirmation_code, r.registered_at,
                t.name AS trip_name, t.start_date, t.end_date,
                d.name AS destination_name
            FROM trip_registrations r
            INNER JOIN trips t ON t.id = r.trip_id
            INNER JOIN destinations d ON d.id = t.destination_id
            WHERE r.id = $1 AND r.user_id = $2
            "#,
        )
        .bind(registration_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::with_trip_from_row(&row)),
            None => Err(TravelError::RegistrationNotFound),
        }
    }

    /// Cancels a registration, ensuring it belongs to the user
    pub async fn cancel_registration(
        &self,
        user_id: &Uuid,
        registration_id: &Uuid,
    ) -> Result<(), TravelError> {
        let result = sqlx::query("DELETE FROM trip_registrations WHERE id = $1 AND user_id = $2")
            .bind(registration_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TravelError::RegistrationNotFound);
        }

        Ok(())
    }

    /// Gets all registrations for a trip with user information
    pub async fn get_trip_registrations(
        &self,
        trip_id: &Uuid,
    ) -> Result<Vec<RegistrationWithUser>, TravelError> {
        let trip = sqlx::query("SELECT id FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        if trip.is_none() {
            return Err(TravelError::TripNotFound);
        }

        let rows = sqlx::query(
            r#"
            SELECT
                r.id, r.user_id, r.participants, r.total_cents,
                r.confirmation_code, r.registered_at,
                u.name AS user_name, u.email AS user_email
            FROM trip_registrations r
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.trip_id = $1
            ORDER BY r.registered_at
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        let registrations = rows
            .iter()
            .map(|row| RegistrationWithUser {
                id: row.get("id"),
                user_id: row.get("user_id"),
                user_name: row.get("user_name"),
                user_email: row.get("user_email"),
                participants: row.get("participants"),
                total_cents: row.get("total_cents"),
                confirmation_code: row.get("confirmation_code"),
                registered_at: row.get("registered_at"),
            })
            .collect();

        Ok(registrations)
    }

    fn with_trip_from_row(row: &sqlx::postgres::PgRow) -> RegistrationWithTrip {
        RegistrationWithTrip {
            id: row.get("id"),
            trip_id: row.get("trip_id"),
            trip_name: row.get("trip_name"),
            destination_name: row.get("destination_name"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            participants: row.get("participants"),
            total_cents: row.get("total_cents"),
            confirmation_code: row.get("confirmation_code"),
            registered_at: row.get("registered_at"),
        }
    }
}

/// Total price for a registration, `None` on overflow.
pub fn registration_total(price_cents: i64, participants: i32) -> Option<i64> {
    if participants <= 0 {
        return None;
    }
    price_cents.checked_mul(i64::from(participants))
}

/// Seats still available on a trip, never negative.
pub fn seats_remaining(capacity: i32, seats_taken: i64) -> i64 {
    (i64::from(capacity) - seats_taken).max(0)
}

/// Generates an 8-character alphanumeric confirmation code.
pub fn generate_confirmation_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..8)
        .map(|_| {
            let chars = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
            chars[rng.random_range(0..chars.len())] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_total() {
        assert_eq!(registration_total(149_900, 2), Some(299_800));
        assert_eq!(registration_total(0, 5), Some(0));
        assert_eq!(registration_total(100, 0), None);
        assert_eq!(registration_total(i64::MAX, 2), None);
    }

    #[test]
    fn test_seats_remaining() {
        assert_eq!(seats_remaining(12, 0), 12);
        assert_eq!(seats_remaining(12, 9), 3);
        assert_eq!(seats_remaining(12, 12), 0);
        // Never reported negative even if data drifted
        assert_eq!(seats_remaining(12, 15), 0);
    }

    #[test]
    fn test_confirmation_code_shape() {
        let code = generate_confirmation_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        // Ambiguous characters are excluded from the alphabet
        assert!(!code.contains('O') && !code.contains('0') && !code.contains('1'));
    }

    #[test]
    fn test_confirmation_codes_vary() {
        let a = generate_confirmation_code();
        let b = generate_confirmation_code();
        // 32^8 code space, collisions here would point at a broken generator
        assert_ne!(a, b);
    }
}
