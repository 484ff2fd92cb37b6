use async_trait::async_trait;

use crate::reservation::ReservationRecord;

/// Queryable reservation fields. Records are only ever matched on guest
/// contact columns, exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    Email,
    Phone,
}

impl LookupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupField::Email => "email",
            LookupField::Phone => "phone",
        }
    }
}

/// Errors from the external record store. Both variants mean the lookup did
/// not run to completion; neither may be read as "no match".
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport or query failure. Retryable.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with data this crate cannot decode.
    #[error("malformed reservation record: {0}")]
    Malformed(String),
}

/// Read-only access to the external reservation records.
///
/// Implementations return zero or more exact matches. No ordering is promised
/// beyond being deterministic for the same stored data.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_field(
        &self,
        field: LookupField,
        value: &str,
    ) -> Result<Vec<ReservationRecord>, StoreError>;
}
