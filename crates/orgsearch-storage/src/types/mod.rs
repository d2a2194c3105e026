//! Type definitions for orgsearch storage.

mod access_codes;
mod ids;
mod organizations;
mod search;
mod stats;
mod users;

// Re-export all types from submodules
pub use access_codes::*;
pub use ids::*;
pub use organizations::*;
pub use search::*;
pub use stats::*;
pub use users::*;
