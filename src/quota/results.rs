//! Quota result types
//!
//! Defines the decisions returned by quota enforcement.

/// Why an upload was refused. Every variant is shown to the uploading user.
#[derive(Debug, Clone, PartialEq)]
pub enum QuotaRejection {
    /// Actor is neither an administrator nor known to the directory
    NotDirectoryUser,
    /// Quota service down, slow or answering garbage
    ServiceUnreachable,
    /// Upload would push usage past the limit (values in MB, 3 decimals)
    Exceeded { uploaded_mb: f64, available_mb: f64 },
}
