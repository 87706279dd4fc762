//! C ABI over the stateless siting operations.
//!
//! Every entry point returns a [`SitingErrorCode`]; on failure the message is
//! available from [`windsite_get_last_error`] on the calling thread. Callers
//! own every buffer: no function allocates memory that C must free.

mod error;
mod helpers;
mod layout;
mod mcp;
mod wake;

pub use error::{windsite_get_last_error, windsite_get_last_error_code, SitingErrorCode};
pub use layout::{windsite_layout_optimize_grid, WindsiteLayoutMetrics};
pub use mcp::{windsite_mcp_fit, WindsiteRegression};
pub use wake::{windsite_wake_global_loss, windsite_wake_sector_losses, WindsiteTurbine};
