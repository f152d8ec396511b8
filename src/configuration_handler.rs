use crate::{
    booking_rules::{BookingRules, RulesError, SlotCatalog, DEFAULT_CAPACITY},
    configuration::Configuration,
};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Study room booking service")]
pub struct ConfigurationHandler {
    /// Title shown by the frontend
    #[arg(long, env = "WEBSITE_TITLE", default_value = "Study Room Booking")]
    website_title: String,

    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: String,

    /// PostgreSQL connection string. Without it reservations are kept in memory only.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Time slots of a day, ordered by start time
    #[arg(
        long,
        env = "BOOKING_SLOTS",
        value_delimiter = ',',
        default_value = "09:00-12:00,13:00-17:00,18:00-21:00"
    )]
    slots: Vec<String>,

    /// Maximum number of reservations per time slot
    #[arg(long, env = "BOOKING_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    capacity: u32,

    /// Bookings on this date (YYYY-MM-DD) are answered with a celebration
    #[arg(long, env = "CELEBRATION_DATE")]
    celebration_date: Option<NaiveDate>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn website_title(&self) -> String {
        self.website_title.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn booking_rules(&self) -> Result<BookingRules, RulesError> {
        let catalog = SlotCatalog::new(self.slots.iter().cloned())?;
        BookingRules::new(catalog, self.capacity, self.celebration_date)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let configuration = ConfigurationHandler::parse_from(["room_booking"]);

        assert_eq!(configuration.website_title(), "Study Room Booking");
        assert_eq!(configuration.booking_rules().unwrap(), BookingRules::default());
    }

    #[test]
    fn test_custom_rules() {
        let configuration = ConfigurationHandler::parse_from([
            "room_booking",
            "--slots",
            "morning,afternoon",
            "--capacity",
            "5",
            "--celebration-date",
            "2025-07-31",
            "--database-url",
            "postgres://localhost/room_booking",
        ]);

        let rules = configuration.booking_rules().unwrap();
        assert_eq!(rules.catalog().labels(), ["morning", "afternoon"]);
        assert_eq!(rules.capacity(), 5);
        assert_eq!(rules.celebration_date(), NaiveDate::from_ymd_opt(2025, 7, 31));
        assert_eq!(
            configuration.database_url().as_deref(),
            Some("postgres://localhost/room_booking")
        );
    }

    #[test]
    fn test_invalid_rules_are_reported() {
        let configuration =
            ConfigurationHandler::parse_from(["room_booking", "--slots", "S1,S1"]);
        assert_eq!(
            configuration.booking_rules().unwrap_err(),
            RulesError::DuplicateLabel("S1".into())
        );

        let configuration = ConfigurationHandler::parse_from(["room_booking", "--capacity", "0"]);
        assert_eq!(
            configuration.booking_rules().unwrap_err(),
            RulesError::ZeroCapacity
        );
    }

    #[test]
    fn test_rejects_malformed_date() {
        let result = ConfigurationHandler::try_parse_from([
            "room_booking",
            "--celebration-date",
            "31.07.2025",
        ]);
        assert!(result.is_err());
    }
}
