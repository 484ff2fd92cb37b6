use std::sync::Mutex;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::reservation::{FlightDraft, ReservationRecord};

/// Session-scoped cache of the resolved reservation and the in-progress
/// flight draft.
///
/// One instance lives for the whole application session and is shared by
/// every consumer. The reservation slot is observable; the draft slot is a
/// plain last-write-wins cell that survives sign-out and navigation so the
/// guest can come back and edit before submitting.
pub struct SessionCache {
    reservation: watch::Sender<Option<ReservationRecord>>,
    draft: Mutex<Option<FlightDraft>>,
}

impl SessionCache {
    pub fn new() -> Self {
        let (reservation, _) = watch::channel(None);
        Self {
            reservation,
            draft: Mutex::new(None),
        }
    }

    /// Replace the current reservation and notify observers.
    pub fn set_reservation(&self, record: ReservationRecord) {
        self.reservation.send_replace(Some(record));
    }

    /// Drop the current reservation and notify observers.
    pub fn clear_reservation(&self) {
        self.reservation.send_replace(None);
    }

    /// Latest reservation value, read synchronously.
    pub fn current_reservation(&self) -> Option<ReservationRecord> {
        self.reservation.borrow().clone()
    }

    /// Stream of reservation snapshots: the current value first, then one
    /// item per write. A slow observer may see writes coalesced, never
    /// reordered and never invented.
    pub fn reservation_changes(&self) -> WatchStream<Option<ReservationRecord>> {
        WatchStream::new(self.reservation.subscribe())
    }

    pub fn set_draft(&self, draft: FlightDraft) {
        *self.draft.lock().expect("draft lock poisoned") = Some(draft);
    }

    pub fn current_draft(&self) -> Option<FlightDraft> {
        self.draft.lock().expect("draft lock poisoned").clone()
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use tokio_stream::StreamExt;

    fn record(customer_id: &str) -> ReservationRecord {
        ReservationRecord {
            customer_id: Some(customer_id.to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            first_name: None,
            last_name: None,
            trip_id: None,
            trip_start: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            trip_end: Utc.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap(),
            destination: None,
            valid_until: None,
        }
    }

    fn draft() -> FlightDraft {
        FlightDraft {
            airline: "Delta".to_string(),
            flight_number: "DL 123".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            num_of_guests: 2,
            comments: None,
        }
    }

    #[test]
    fn test_starts_empty() {
        let cache = SessionCache::new();
        assert_eq!(cache.current_reservation(), None);
        assert_eq!(cache.current_draft(), None);
    }

    #[test]
    fn test_set_and_clear_reservation() {
        let cache = SessionCache::new();
        cache.set_reservation(record("cust-1"));
        assert_eq!(
            cache.current_reservation().unwrap().customer_id.as_deref(),
            Some("cust-1")
        );

        cache.clear_reservation();
        assert_eq!(cache.current_reservation(), None);
    }

    #[test]
    fn test_setting_the_same_record_twice_keeps_it() {
        let cache = SessionCache::new();
        cache.set_reservation(record("cust-1"));
        cache.set_reservation(record("cust-1"));
        assert_eq!(
            cache.current_reservation().unwrap().customer_id.as_deref(),
            Some("cust-1")
        );
    }

    #[tokio::test]
    async fn test_observer_sees_current_value_then_changes() {
        let cache = SessionCache::new();
        cache.set_reservation(record("cust-1"));

        let mut changes = cache.reservation_changes();
        let first = changes.next().await.unwrap();
        assert_eq!(first.unwrap().customer_id.as_deref(), Some("cust-1"));

        cache.set_reservation(record("cust-2"));
        let second = changes.next().await.unwrap();
        assert_eq!(second.unwrap().customer_id.as_deref(), Some("cust-2"));

        cache.clear_reservation();
        assert_eq!(changes.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_each_write_notifies_a_keeping_up_observer() {
        let cache = SessionCache::new();
        let mut changes = cache.reservation_changes();
        assert_eq!(changes.next().await.unwrap(), None);

        for _ in 0..2 {
            cache.set_reservation(record("cust-1"));
            let seen = changes.next().await.unwrap();
            assert_eq!(seen.unwrap().customer_id.as_deref(), Some("cust-1"));
        }
    }

    #[test]
    fn test_draft_survives_reservation_lifecycle() {
        let cache = SessionCache::new();
        cache.set_draft(draft());

        cache.set_reservation(record("cust-1"));
        cache.clear_reservation();

        assert_eq!(cache.current_draft(), Some(draft()));
    }
}
