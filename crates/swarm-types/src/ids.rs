//! Type-safe index wrappers for entity identifiers.
//!
//! Every entity in the simulation has a strongly-typed id to prevent
//! accidental mixing of identifiers at compile time. Ids are dense
//! `u32` indices assigned at creation time: agent and obstacle ids are
//! roster positions, mission ids are the mission count at creation and
//! are never reused.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the inner index value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }

            /// Return the id as a `usize` suitable for indexing a roster.
            #[allow(clippy::cast_possible_truncation)]
            pub const fn as_index(self) -> usize {
                self.0 as usize
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent (its position in the roster).
    AgentId
}

define_id! {
    /// Unique identifier for a mission. Assigned as the mission count at
    /// creation time; monotonically increasing, never reused.
    MissionId
}

define_id! {
    /// Unique identifier for an obstacle.
    ObstacleId
}

define_id! {
    /// Unique identifier for a charging station.
    StationId
}
