pub use crate::app::App;
pub use roster_types::prelude::*;

// vim: ts=4
