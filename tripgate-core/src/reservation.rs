use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A booked trip as stored in the external reservation records.
///
/// This crate only ever holds a read-only cached copy. Trip dates are assumed
/// ordered (start before end) by whoever writes the records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    pub trip_start: DateTime<Utc>,
    pub trip_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

/// Guest-entered flight arrival details, held in the session cache until
/// final submission. Carries no identity linkage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightDraft {
    pub airline: String,
    pub flight_number: String,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub num_of_guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Draft validation failures. Messages are guest-facing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Please fill in all required fields")]
    MissingField,

    #[error("At least one guest must be arriving")]
    NoGuests,

    #[error("Arrival date must fall within your trip")]
    ArrivalAfterTrip,
}

impl FlightDraft {
    /// Check the draft against the guest's reservation before it is cached
    /// or submitted.
    pub fn validate(&self, reservation: &ReservationRecord) -> Result<(), DraftError> {
        if self.airline.trim().is_empty() || self.flight_number.trim().is_empty() {
            return Err(DraftError::MissingField);
        }
        if self.num_of_guests == 0 {
            return Err(DraftError::NoGuests);
        }
        if self.arrival_date > reservation.trip_end.date_naive() {
            return Err(DraftError::ArrivalAfterTrip);
        }
        Ok(())
    }
}
