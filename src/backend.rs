use crate::types::{Reservation, Role};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Reservation store unreachable: {0}")]
    Connection(String),
    #[error("Reservation store query failed: {0}")]
    Query(String),
    #[error("Reservation store returned an invalid record: {0}")]
    Corrupt(String),
    #[error("Reservation store lock was poisoned")]
    LockPoisoned,
}

/// Shared reservation store. Only full reads and single-row appends are
/// offered; there is no conditional write.
pub trait ReservationBackend: Clone + Send + Sync + 'static {
    fn reservations(&self) -> Result<Vec<Reservation>, StoreError>;
    fn append_reservation(
        &self,
        date: NaiveDate,
        slot: String,
        booker_name: String,
        role: Role,
    ) -> Result<Reservation, StoreError>;
}
