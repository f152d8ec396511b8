use crate::booking_rules::{BookingRules, RulesError};

pub trait Configuration: Clone + Send + Sync + 'static {
    fn website_title(&self) -> String;
    fn port(&self) -> String;
    fn database_url(&self) -> Option<String>;
    fn booking_rules(&self) -> Result<BookingRules, RulesError>;
}
