use std::sync::RwLock;

use async_trait::async_trait;

use tripgate_core::reservation::ReservationRecord;
use tripgate_core::store::{LookupField, RecordStore, StoreError};

/// In-memory reservation records for tests and local runs. Insertion order
/// doubles as the deterministic result order.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<ReservationRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: ReservationRecord) {
        self.records
            .write()
            .expect("records lock poisoned")
            .push(record);
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_field(
        &self,
        field: LookupField,
        value: &str,
    ) -> Result<Vec<ReservationRecord>, StoreError> {
        let records = self.records.read().expect("records lock poisoned");
        Ok(records
            .iter()
            .filter(|r| match field {
                LookupField::Email => r.email.as_deref() == Some(value),
                LookupField::Phone => r.phone.as_deref() == Some(value),
            })
            .cloned()
            .collect())
    }
}
