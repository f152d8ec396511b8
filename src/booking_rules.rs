use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_CAPACITY: u32 = 3;
pub const DEFAULT_SLOTS: [&str; 3] = ["09:00-12:00", "13:00-17:00", "18:00-21:00"];

lazy_static! {
    static ref TIME_RANGE: Regex =
        Regex::new(r"^\s*(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})\s*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("slot catalog must contain at least one slot")]
    EmptyCatalog,
    #[error("slot labels must not be empty")]
    EmptyLabel,
    #[error("slot {0} appears more than once in the catalog")]
    DuplicateLabel(String),
    #[error("slot {next} starts before slot {previous}; slots must be ordered by start time")]
    OutOfOrder { previous: String, next: String },
    #[error("slot capacity must be at least 1")]
    ZeroCapacity,
}

/// Ordered slot labels for one day. The order is the adjacency order used by
/// the consecutive-leadership rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotCatalog {
    labels: Vec<String>,
}

impl SlotCatalog {
    pub fn new<I, S>(labels: I) -> Result<Self, RulesError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.into().trim().to_string())
            .collect();

        if labels.is_empty() {
            return Err(RulesError::EmptyCatalog);
        }

        let mut previous: Option<(&String, NaiveTime)> = None;
        for (position, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(RulesError::EmptyLabel);
            }
            if labels[..position].contains(label) {
                return Err(RulesError::DuplicateLabel(label.clone()));
            }

            // Free-form labels in between keep the last parsed start time.
            let Some(start) = start_time(label) else {
                continue;
            };
            if let Some((previous_label, previous_start)) = previous {
                if start <= previous_start {
                    return Err(RulesError::OutOfOrder {
                        previous: previous_label.clone(),
                        next: label.clone(),
                    });
                }
            }
            previous = Some((label, start));
        }

        Ok(Self { labels })
    }

    pub fn position(&self, slot: &str) -> Option<usize> {
        self.labels.iter().position(|label| label == slot)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.position(slot).is_some()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self {
            labels: DEFAULT_SLOTS.iter().map(|label| label.to_string()).collect(),
        }
    }
}

fn start_time(label: &str) -> Option<NaiveTime> {
    let captures = TIME_RANGE.captures(label)?;
    NaiveTime::parse_from_str(captures.get(1)?.as_str(), "%H:%M").ok()
}

/// Static booking configuration shared by the index, the validator and the
/// reservation manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRules {
    #[serde(rename = "slots")]
    catalog: SlotCatalog,
    capacity: u32,
    celebration_date: Option<NaiveDate>,
}

impl BookingRules {
    pub fn new(
        catalog: SlotCatalog,
        capacity: u32,
        celebration_date: Option<NaiveDate>,
    ) -> Result<Self, RulesError> {
        if capacity == 0 {
            return Err(RulesError::ZeroCapacity);
        }
        Ok(Self {
            catalog,
            capacity,
            celebration_date,
        })
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn celebration_date(&self) -> Option<NaiveDate> {
        self.celebration_date
    }

    pub fn is_celebration_date(&self, date: NaiveDate) -> bool {
        self.celebration_date == Some(date)
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            catalog: SlotCatalog::default(),
            capacity: DEFAULT_CAPACITY,
            celebration_date: None,
        }
    }
}
