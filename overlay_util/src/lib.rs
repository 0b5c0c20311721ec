//! Small pieces shared by every crate in the workspace: a string tag map, a multimap, logging
//! setup, and a few formatting helpers.

mod collections;
pub mod logger;
mod tags;
mod utils;

pub use crate::collections::MultiMap;
pub use crate::tags::Tags;
pub use crate::utils::prettyprint_usize;
