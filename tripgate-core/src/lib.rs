pub mod cache;
pub mod guard;
pub mod identity;
pub mod pii;
pub mod provider;
pub mod reservation;
pub mod resolver;
pub mod store;

pub use cache::SessionCache;
pub use guard::{AccessGuard, DenyReason, GuardDecision};
pub use identity::{lookup_keys, AuthState, Identity, NormalizedKey};
pub use provider::IdentityProvider;
pub use reservation::{FlightDraft, ReservationRecord};
pub use store::{LookupField, RecordStore, StoreError};
