//! Quota arithmetic
//!
//! Pure functions behind the upload gate: unit conversion, the over-limit
//! decision and MB formatting for the rejection message.

use crate::quota::{QuotaRejection, QuotaSnapshot};

const BYTES_PER_KIB: f64 = 1024.0;
const KIB_PER_MB: f64 = 1024.0;

/// Size of the pending upload in KiB.
///
/// An explicit batch (multi-file upload) wins over the candidate object's size.
pub fn upload_size_kib(candidate_bytes: Option<u64>, batch: Option<&[u64]>) -> f64 {
    let bytes: u64 = match batch {
        // Saturate so an oversized batch can only ever look larger
        Some(sizes) => sizes.iter().fold(0u64, |acc, &size| acc.saturating_add(size)),
        None => candidate_bytes.unwrap_or(0),
    };
    bytes as f64 / BYTES_PER_KIB
}

/// Reject when `current_usage + total > limit`.
pub fn evaluate(snapshot: &QuotaSnapshot, total_kib: f64) -> Result<(), QuotaRejection> {
    if snapshot.current_usage + total_kib > snapshot.limit {
        return Err(QuotaRejection::Exceeded {
            uploaded_mb: round3(total_kib / KIB_PER_MB),
            available_mb: round3(snapshot.remaining() / KIB_PER_MB),
        });
    }
    Ok(())
}

/// Round half away from zero to three decimals
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Shortest decimal form: `0.586`, `1`, `-0.25`
pub fn format_mb(value: f64) -> String {
    let rounded = round3(value);
    // Avoid printing "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}
