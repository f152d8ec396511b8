use crate::{
    backend::{ReservationBackend, StoreError},
    booking_rules::BookingRules,
    booking_validator::{BookingValidator, RejectReason},
    slot_status::SlotStatusIndex,
    types::{BookingReceipt, BookingRequest, Reservation},
};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] RejectReason),
    #[error("{0}. Please try again later")]
    Store(#[from] StoreError),
}

/// Runs booking submissions against a shared store.
///
/// The store has no conditional writes, so the checks here are optimistic:
/// the request is validated against one read and again against a fresh read
/// right before the append. A window between that second read and the append
/// remains.
#[derive(Clone)]
pub struct ReservationManager<T: ReservationBackend> {
    backend: T,
    rules: Arc<BookingRules>,
}

impl<T: ReservationBackend> ReservationManager<T> {
    pub fn new(backend: T, rules: BookingRules) -> Self {
        Self {
            backend,
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    pub fn reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let catalog = self.rules.catalog();
        let mut reservations = self.backend.reservations()?;
        reservations.sort_by_key(|r| {
            (
                r.date,
                catalog.position(&r.slot).unwrap_or(usize::MAX),
                r.created_at,
            )
        });
        Ok(reservations)
    }

    pub fn slot_status(&self, date: NaiveDate) -> Result<SlotStatusIndex, StoreError> {
        let reservations = self.backend.reservations()?;
        Ok(SlotStatusIndex::compute(
            self.rules.catalog(),
            &reservations,
            date,
        ))
    }

    pub fn submit(
        &self,
        date: NaiveDate,
        request: BookingRequest,
    ) -> Result<BookingReceipt, SubmitError> {
        let request = BookingRequest {
            booker_name: request.booker_name.trim().to_string(),
            slot: request.slot.trim().to_string(),
            role: request.role,
        };

        self.check(date, &request)?;
        // Double check against the freshest read; another client may have
        // booked in the meantime.
        self.check(date, &request)?;

        let reservation = self.backend.append_reservation(
            date,
            request.slot,
            request.booker_name,
            request.role,
        )?;
        info!(
            id = %reservation.id,
            %date,
            slot = %reservation.slot,
            role = %reservation.role,
            "Reservation booked"
        );

        Ok(BookingReceipt {
            celebrate: self.rules.is_celebration_date(date),
            reservation,
        })
    }

    fn check(&self, date: NaiveDate, request: &BookingRequest) -> Result<(), SubmitError> {
        let history = self.backend.reservations()?;
        let index = SlotStatusIndex::compute(self.rules.catalog(), &history, date);

        BookingValidator::new(&self.rules)
            .validate(request, date, &index, &history)
            .map_err(|reason| {
                warn!(%date, slot = %request.slot, %reason, "Booking rejected");
                SubmitError::Rejected(reason)
            })
    }
}
