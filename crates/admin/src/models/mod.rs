//! Admin-side data kept between requests.

pub mod session;

pub use session::{editing_target, keys, set_editing_target};
