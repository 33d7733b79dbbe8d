//! Strongly-typed identifiers for combat entities

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(EncounterId);
define_id!(CombatantId);

impl CombatantId {
    /// Stable random key used to break initiative and targeting ties.
    ///
    /// Derived from the v4 UUID, so it is random with respect to roster
    /// position but never changes for the lifetime of the combatant.
    pub fn tie_break_key(&self) -> u128 {
        self.0.as_u128()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_break_key_is_stable() {
        let id = CombatantId::new();
        assert_eq!(id.tie_break_key(), id.tie_break_key());
        assert_eq!(id.tie_break_key(), id.as_uuid().as_u128());
    }

    #[test]
    fn test_id_serializes_as_plain_uuid() {
        let uuid = Uuid::from_u128(42);
        let id = EncounterId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
