use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::info;

use tripgate_core::reservation::ReservationRecord;
use tripgate_core::store::{LookupField, RecordStore, StoreError};

/// Postgres-backed reservation records.
///
/// The store is an external collaborator: this adapter only runs exact-match
/// reads against the customers table and never writes. Rows come back in a
/// fixed order so a duplicate contact key resolves the same way every time.
pub struct PgRecordStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct ReservationRow {
    customer_id: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    trip_id: Option<String>,
    trip_start: DateTime<Utc>,
    trip_end: DateTime<Utc>,
    destination: Option<String>,
    valid_until: Option<DateTime<Utc>>,
}

impl From<ReservationRow> for ReservationRecord {
    fn from(row: ReservationRow) -> Self {
        ReservationRecord {
            customer_id: row.customer_id,
            email: row.email,
            phone: row.phone,
            first_name: row.first_name,
            last_name: row.last_name,
            trip_id: row.trip_id,
            trip_start: row.trip_start,
            trip_end: row.trip_end,
            destination: row.destination,
            valid_until: row.valid_until,
        }
    }
}

impl PgRecordStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        info!("connected to reservation store");
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

// One static statement per queryable column; the value is always bound.
const SELECT_BY_EMAIL: &str = "SELECT customer_id, email, phone, first_name, last_name, trip_id, \
     trip_start, trip_end, destination, valid_until \
     FROM customers WHERE email = $1 \
     ORDER BY customer_id NULLS LAST, email";

const SELECT_BY_PHONE: &str = "SELECT customer_id, email, phone, first_name, last_name, trip_id, \
     trip_start, trip_end, destination, valid_until \
     FROM customers WHERE phone = $1 \
     ORDER BY customer_id NULLS LAST, phone";

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_by_field(
        &self,
        field: LookupField,
        value: &str,
    ) -> Result<Vec<ReservationRecord>, StoreError> {
        let sql = match field {
            LookupField::Email => SELECT_BY_EMAIL,
            LookupField::Phone => SELECT_BY_PHONE,
        };

        let rows: Vec<ReservationRow> = sqlx::query_as(sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                    StoreError::Malformed(e.to_string())
                }
                other => StoreError::Unavailable(other.to_string()),
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
