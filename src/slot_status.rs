use crate::{booking_rules::SlotCatalog, types::Reservation};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotOccupancy {
    pub occupant_count: u32,
    pub has_leader: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot: String,
    #[serde(flatten)]
    pub occupancy: SlotOccupancy,
}

/// Occupancy of every catalog slot on one date, in catalog order.
///
/// Derived from the full reservation list on every call; O(n) in the number
/// of reservations, which stays small (days × slots × capacity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotStatusIndex {
    slots: Vec<SlotStatus>,
}

impl SlotStatusIndex {
    pub fn compute(catalog: &SlotCatalog, reservations: &[Reservation], date: NaiveDate) -> Self {
        let mut slots: Vec<SlotStatus> = catalog
            .labels()
            .iter()
            .map(|label| SlotStatus {
                slot: label.clone(),
                occupancy: SlotOccupancy::default(),
            })
            .collect();

        for reservation in reservations.iter().filter(|r| r.date == date) {
            let Some(position) = catalog.position(&reservation.slot) else {
                warn!(
                    id = %reservation.id,
                    slot = %reservation.slot,
                    "Ignoring reservation for a slot outside the catalog"
                );
                continue;
            };
            let occupancy = &mut slots[position].occupancy;
            occupancy.occupant_count += 1;
            occupancy.has_leader |= reservation.role.is_leader();
        }

        Self { slots }
    }

    pub fn get(&self, slot: &str) -> Option<&SlotOccupancy> {
        self.slots
            .iter()
            .find(|status| status.slot == slot)
            .map(|status| &status.occupancy)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotStatus> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutils::{reservation, test_date};
    use crate::types::Role;

    fn catalog() -> SlotCatalog {
        SlotCatalog::new(["S1", "S2", "S3"]).unwrap()
    }

    #[test]
    fn every_slot_is_present_without_reservations() {
        let index = SlotStatusIndex::compute(&catalog(), &[], test_date());

        let slots: Vec<&str> = index.iter().map(|status| status.slot.as_str()).collect();
        assert_eq!(slots, vec!["S1", "S2", "S3"]);
        for status in index.iter() {
            assert_eq!(status.occupancy, SlotOccupancy::default());
        }
    }

    #[test]
    fn counts_occupants_and_leaders_per_slot() {
        let date = test_date();
        let reservations = vec![
            reservation(date, "S1", "Anna", Role::Member),
            reservation(date, "S1", "Ben", Role::Leader),
            reservation(date, "S1", "Cleo", Role::Member),
            reservation(date, "S3", "Dan", Role::Member),
        ];

        let index = SlotStatusIndex::compute(&catalog(), &reservations, date);

        assert_eq!(
            index.get("S1"),
            Some(&SlotOccupancy {
                occupant_count: 3,
                has_leader: true
            })
        );
        assert_eq!(index.get("S2"), Some(&SlotOccupancy::default()));
        assert_eq!(
            index.get("S3"),
            Some(&SlotOccupancy {
                occupant_count: 1,
                has_leader: false
            })
        );
    }

    #[test]
    fn ignores_other_dates_and_unknown_slots() {
        let date = test_date();
        let reservations = vec![
            reservation(date.succ_opt().unwrap(), "S1", "Anna", Role::Leader),
            reservation(date, "S9", "Ben", Role::Leader),
            reservation(date, "S2", "Cleo", Role::Member),
        ];

        let index = SlotStatusIndex::compute(&catalog(), &reservations, date);

        assert_eq!(index.get("S1"), Some(&SlotOccupancy::default()));
        assert_eq!(index.get("S2").unwrap().occupant_count, 1);
        assert_eq!(index.get("S9"), None);
    }

    #[test]
    fn result_does_not_depend_on_reservation_order() {
        let date = test_date();
        let mut reservations = vec![
            reservation(date, "S2", "Anna", Role::Leader),
            reservation(date, "S2", "Ben", Role::Member),
            reservation(date, "S1", "Cleo", Role::Member),
        ];
        let forward = SlotStatusIndex::compute(&catalog(), &reservations, date);
        reservations.reverse();
        let backward = SlotStatusIndex::compute(&catalog(), &reservations, date);

        assert_eq!(forward, backward);
    }

    #[test]
    fn serializes_as_flat_slot_list() {
        let date = test_date();
        let reservations = vec![reservation(date, "S1", "Anna", Role::Leader)];
        let index = SlotStatusIndex::compute(&catalog(), &reservations, date);

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({ "slot": "S1", "occupant_count": 1, "has_leader": true })
        );
        assert_eq!(json.as_array().unwrap().len(), 3);
    }
}
