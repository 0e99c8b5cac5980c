//! Data models for the RCL league site and panel.
//!
//! Wire names (camelCase) match the site's export format exactly, so backups
//! taken from the original panel import cleanly.

mod game;
mod link;
mod rules;
mod session;
mod team;

pub use game::*;
pub use link::*;
pub use rules::*;
pub use session::*;
pub use team::*;
