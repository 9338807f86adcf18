pub use roster_core::prelude::*;

// vim: ts=4
