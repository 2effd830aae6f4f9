//! Upload quota gate
//!
//! Talks to the external quota service and decides whether an upload fits.

pub mod enforcement;
pub mod gateway;
pub mod results;

pub use enforcement::{evaluate, format_mb, upload_size_kib};
pub use gateway::{HttpQuotaService, QuotaService, QuotaSnapshot};
pub use results::QuotaRejection;
