use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pii::Masked;
use crate::store::LookupField;

/// An authenticated principal as reported by the external identity provider.
///
/// Read-only input: the provider owns this data, this crate only derives
/// lookup keys from it.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Stable unique id assigned by the provider.
    pub uid: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// Contact details are masked in logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("uid", &self.uid)
            .field("email", &self.email.as_ref().map(Masked))
            .field("phone", &self.phone.as_ref().map(Masked))
            .finish()
    }
}

/// Snapshot of the provider's current authentication state.
///
/// The provider signal fires on sign-in, sign-out and token refresh; each
/// firing is a fresh snapshot, not a delta, and the same logical state may be
/// reported more than once. `Unknown` is the state before the provider has
/// reported anything at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    SignedOut,
    SignedIn(Identity),
}

impl AuthState {
    pub fn is_known(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }
}

/// Canonical lookup key derived from one identity attribute. Ephemeral:
/// recomputed for every resolution attempt, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedKey {
    Email(String),
    Phone(String),
}

impl NormalizedKey {
    pub fn field(&self) -> LookupField {
        match self {
            NormalizedKey::Email(_) => LookupField::Email,
            NormalizedKey::Phone(_) => LookupField::Phone,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            NormalizedKey::Email(value) | NormalizedKey::Phone(value) => value,
        }
    }
}

/// Derive lookup keys from an identity, most specific first: email (trimmed,
/// lowercased), then phone (whitespace and hyphens stripped, everything else
/// kept as-is). Attributes that are missing or empty after normalization are
/// skipped.
pub fn lookup_keys(identity: &Identity) -> Vec<NormalizedKey> {
    let mut keys = Vec::new();

    if let Some(email) = &identity.email {
        let normalized = email.trim().to_lowercase();
        if !normalized.is_empty() {
            keys.push(NormalizedKey::Email(normalized));
        }
    }

    if let Some(phone) = &identity.phone {
        let normalized: String = phone
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if !normalized.is_empty() {
            keys.push(NormalizedKey::Phone(normalized));
        }
    }

    keys
}
