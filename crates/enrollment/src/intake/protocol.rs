use rand::distr::Alphanumeric;
use rand::Rng;

use super::domain::ApplicantId;

/// Fixed prefix carried by every issued protocol code.
pub const PROTOCOL_PREFIX: &str = "SEG-";

const FALLBACK_CODE_LEN: usize = 8;

/// Derive the tracking code for a committed application: the prefix plus the
/// last eight characters of the applicant id, upper-cased.
pub fn issue(id: &ApplicantId) -> String {
    let tail_start = id.0.len().saturating_sub(FALLBACK_CODE_LEN);
    format!("{PROTOCOL_PREFIX}{}", id.0[tail_start..].to_uppercase())
}

/// Derive a synthetic tracking code for relaxed-mode fallbacks. The code is
/// informational only and not backed by any durable row, so the collision
/// risk of eight random alphanumerics is accepted.
pub fn fallback() -> String {
    let code: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(FALLBACK_CODE_LEN)
        .map(char::from)
        .collect();
    format!("{PROTOCOL_PREFIX}{}", code.to_uppercase())
}
