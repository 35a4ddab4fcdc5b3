//! Opaque id newtypes for design entities.
//!
//! Each id is a thin `u32` wrapper created by
//! [`Arena::alloc`](crate::arena::Arena::alloc).

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a raw index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the raw index as a `usize`, for indexing dense tables.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Id of a signal in the design's flat signal table.
    SignalId
);

define_id!(
    /// Id of a process (combinational, clocked, or lifecycle block).
    ProcessId
);

define_id!(
    /// Id of an external read-only ROM table.
    RomId
);
