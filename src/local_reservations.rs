use crate::{
    backend::{ReservationBackend, StoreError},
    types::{Reservation, Role},
};
use chrono::{NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Non-persistent store used when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct LocalReservations {
    reservations: Arc<Mutex<Vec<Reservation>>>,
}

impl ReservationBackend for LocalReservations {
    fn reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let reservations = self
            .reservations
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(reservations.clone())
    }

    fn append_reservation(
        &self,
        date: NaiveDate,
        slot: String,
        booker_name: String,
        role: Role,
    ) -> Result<Reservation, StoreError> {
        let reservation = Reservation {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            date,
            slot,
            booker_name,
            role,
        };
        debug!(id = %reservation.id, "Storing reservation in memory");

        self.reservations
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(reservation.clone());
        Ok(reservation)
    }
}
