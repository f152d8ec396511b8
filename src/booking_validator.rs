use crate::{
    booking_rules::BookingRules,
    slot_status::SlotStatusIndex,
    types::{BookingRequest, Reservation},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a booking request was not admitted. These are expected outcomes the
/// user can correct, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", content = "slot", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("Please select a time slot")]
    MissingSlot,
    #[error("Please enter your name")]
    MissingName,
    #[error("Time slot {0} does not exist")]
    UnknownSlot(String),
    #[error("Time slot {0} is already full")]
    SlotFull(String),
    #[error("Time slot {0} already has a leader. Book it as a member instead")]
    LeaderConflict(String),
    #[error("You can't lead two consecutive time slots on the same day")]
    ConsecutiveLeadership,
    #[error("You already booked this time slot")]
    DuplicateBooking,
}

impl RejectReason {
    /// Rejections caused by an incomplete form rather than by existing bookings.
    pub fn is_malformed_request(&self) -> bool {
        matches!(
            self,
            RejectReason::MissingSlot | RejectReason::MissingName | RejectReason::UnknownSlot(_)
        )
    }
}

pub struct BookingValidator<'a> {
    rules: &'a BookingRules,
}

impl<'a> BookingValidator<'a> {
    pub fn new(rules: &'a BookingRules) -> Self {
        Self { rules }
    }

    /// Runs the rule stages in order and returns the first rejection.
    ///
    /// `index` must be computed for `date` from the same snapshot as `history`.
    pub fn validate(
        &self,
        request: &BookingRequest,
        date: NaiveDate,
        index: &SlotStatusIndex,
        history: &[Reservation],
    ) -> Result<(), RejectReason> {
        let request = &BookingRequest {
            booker_name: request.booker_name.trim().to_string(),
            role: request.role,
            slot: request.slot.trim().to_string(),
        };

        self.check_well_formed(request)?;
        self.check_capacity(request, index)?;
        self.check_leader_available(request, index)?;
        self.check_consecutive_leadership(request, date, history)?;
        self.check_duplicate(request, date, history)
    }

    fn check_well_formed(&self, request: &BookingRequest) -> Result<(), RejectReason> {
        if request.slot.is_empty() {
            return Err(RejectReason::MissingSlot);
        }
        if request.booker_name.is_empty() {
            return Err(RejectReason::MissingName);
        }
        if !self.rules.catalog().contains(&request.slot) {
            return Err(RejectReason::UnknownSlot(request.slot.clone()));
        }
        Ok(())
    }

    fn check_capacity(
        &self,
        request: &BookingRequest,
        index: &SlotStatusIndex,
    ) -> Result<(), RejectReason> {
        let occupant_count = index
            .get(&request.slot)
            .map_or(0, |occupancy| occupancy.occupant_count);
        if occupant_count >= self.rules.capacity() {
            return Err(RejectReason::SlotFull(request.slot.clone()));
        }
        Ok(())
    }

    fn check_leader_available(
        &self,
        request: &BookingRequest,
        index: &SlotStatusIndex,
    ) -> Result<(), RejectReason> {
        let has_leader = index
            .get(&request.slot)
            .is_some_and(|occupancy| occupancy.has_leader);
        if request.role.is_leader() && has_leader {
            return Err(RejectReason::LeaderConflict(request.slot.clone()));
        }
        Ok(())
    }

    fn check_consecutive_leadership(
        &self,
        request: &BookingRequest,
        date: NaiveDate,
        history: &[Reservation],
    ) -> Result<(), RejectReason> {
        if !request.role.is_leader() {
            return Ok(());
        }

        let catalog = self.rules.catalog();
        let positions: BTreeSet<usize> = history
            .iter()
            .filter(|r| r.date == date && r.role.is_leader() && r.is_held_by(&request.booker_name))
            .map(|r| r.slot.as_str())
            .chain(std::iter::once(request.slot.as_str()))
            .filter_map(|slot| catalog.position(slot))
            .collect();

        let positions: Vec<usize> = positions.into_iter().collect();
        if positions.windows(2).any(|pair| pair[1] - pair[0] == 1) {
            return Err(RejectReason::ConsecutiveLeadership);
        }
        Ok(())
    }

    fn check_duplicate(
        &self,
        request: &BookingRequest,
        date: NaiveDate,
        history: &[Reservation],
    ) -> Result<(), RejectReason> {
        let duplicate = history.iter().any(|r| {
            r.date == date && r.slot == request.slot && r.is_held_by(&request.booker_name)
        });
        if duplicate {
            return Err(RejectReason::DuplicateBooking);
        }
        Ok(())
    }
}
