//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive, so a [`MachineryId`] cannot be passed where a
//! [`TrainingModuleId`] is expected even though both are `u64` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (catalog-assigned integers).
// Generates: struct (Copy), new(), as_u64(), next(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }

            /// Returns the identifier that follows this one.
            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Catalog-assigned integer identifiers
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies a machinery listing in the machinery catalog.
    ///
    /// Assigned by the catalog on insertion; generated drafts never carry one.
    MachineryId
}

u64_id! {
    /// Identifies a training module in the training catalog.
    TrainingModuleId
}

// ---------------------------------------------------------------------------
// UUID-backed identifiers
// ---------------------------------------------------------------------------

/// Identifies a single generation attempt issued by the controller.
///
/// Generated fresh for every submission. A response is only staged when the
/// controller is still awaiting the request with this exact identity, so a late
/// response from an abandoned attempt can never overwrite a newer draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_increments() {
        assert_eq!(MachineryId::new(7).next(), MachineryId::new(8));
        assert_eq!(TrainingModuleId::new(u64::MAX).next().as_u64(), u64::MAX);
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&MachineryId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn random_request_ids_differ() {
        assert_ne!(RequestId::new_random(), RequestId::new_random());
    }
}
