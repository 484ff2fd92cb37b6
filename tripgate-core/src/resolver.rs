use tracing::{debug, warn};

use crate::identity::NormalizedKey;
use crate::reservation::ReservationRecord;
use crate::store::{RecordStore, StoreError};

/// Walk the lookup keys in priority order and return the first reservation
/// that matches, or `None` once every key is exhausted.
///
/// A store failure propagates untouched: callers must be able to tell an
/// outage apart from "this guest has no reservation".
pub async fn resolve_reservation(
    keys: &[NormalizedKey],
    store: &dyn RecordStore,
) -> Result<Option<ReservationRecord>, StoreError> {
    for key in keys {
        let mut matches = store.find_by_field(key.field(), key.value()).await?;

        if matches.len() > 1 {
            // Contact keys are expected to be unique in the record store.
            warn!(
                field = key.field().as_str(),
                count = matches.len(),
                "multiple reservations share one contact key; taking the first"
            );
        }

        if !matches.is_empty() {
            debug!(field = key.field().as_str(), "reservation matched");
            return Ok(Some(matches.swap_remove(0)));
        }

        debug!(field = key.field().as_str(), "no reservation for key");
    }

    Ok(None)
}
