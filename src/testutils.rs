use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    backend::{ReservationBackend, StoreError},
    types::{Reservation, Role},
};

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

pub fn reservation(date: NaiveDate, slot: &str, booker_name: &str, role: Role) -> Reservation {
    Reservation {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        date,
        slot: slot.into(),
        booker_name: booker_name.into(),
        role,
    }
}

pub struct MockReservationBackendInner {
    pub success: AtomicBool,
    pub calls_to_reservations: AtomicU64,
    pub calls_to_append_reservation: AtomicU64,
    pub reservations: Mutex<Vec<Reservation>>,
    /// Reservations another client writes right after the next read.
    pub interleaved: Mutex<Vec<Reservation>>,
}

#[derive(Clone)]
pub struct MockReservationBackend(pub Arc<MockReservationBackendInner>);

impl MockReservationBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_reservations: AtomicU64::default(),
            calls_to_append_reservation: AtomicU64::default(),
            reservations: Mutex::default(),
            interleaved: Mutex::default(),
        }
    }
}

impl MockReservationBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockReservationBackendInner::new()))
    }

    fn result(&self) -> Result<(), StoreError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(StoreError::Connection("Supposed to fail".into())),
        }
    }
}

impl ReservationBackend for MockReservationBackend {
    fn reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        self.0.calls_to_reservations.fetch_add(1, Ordering::SeqCst);
        self.result()?;

        let mut reservations = self.0.reservations.lock().unwrap();
        let snapshot = reservations.clone();
        reservations.append(&mut self.0.interleaved.lock().unwrap());
        Ok(snapshot)
    }

    fn append_reservation(
        &self,
        date: NaiveDate,
        slot: String,
        booker_name: String,
        role: Role,
    ) -> Result<Reservation, StoreError> {
        self.0
            .calls_to_append_reservation
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;

        let reservation = reservation(date, &slot, &booker_name, role);
        self.0.reservations.lock().unwrap().push(reservation.clone());
        Ok(reservation)
    }
}
