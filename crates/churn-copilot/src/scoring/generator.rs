//! Hash-seeded pseudo-random scores.
//!
//! Seeds are the low 32 bits of the MD5 digest of an identifier; values are
//! one step of the classic `1103515245 * x + 12345 (mod 2^31)` recurrence.
//! Scores for a given identifier must match across processes and releases.

use md5::{Digest, Md5};

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;
const LCG_MASK: u64 = 0x7FFF_FFFF;

const SEVERITY_BASE: i32 = 50;
const SEVERITY_JITTER: f64 = 15.0;
const REGION_BIAS_BUCKETS: u32 = 11;
const REGION_BIAS_OFFSET: i32 = 5;

const CHURN_RISK_EXPONENT: f64 = 1.5;
const CHURN_RISK_SCALE: f64 = 0.9;
pub const CHURN_RISK_CAP: f64 = 0.95;

/// Stable 32-bit seed for an identifier.
pub fn seed_from_id(id: &str) -> u32 {
    let digest = Md5::digest(id.as_bytes());
    u32::from_be_bytes([digest[12], digest[13], digest[14], digest[15]])
}

/// One LCG step from `seed`, scaled into `a..b`.
pub fn pseudo_uniform(seed: u32, a: f64, b: f64) -> f64 {
    let x = (LCG_MULTIPLIER * u64::from(seed) + LCG_INCREMENT) & LCG_MASK;
    a + (x as f64 / LCG_MASK as f64) * (b - a)
}

/// Region strain offset in `-5..=5`, derived from the region name alone.
pub fn region_bias(region: &str) -> i32 {
    (seed_from_id(region) % REGION_BIAS_BUCKETS) as i32 - REGION_BIAS_OFFSET
}

/// Placeholder service severity in `0..=100`, fixed per (customer, region).
pub fn severity_score(customer_id: &str, region: &str) -> u8 {
    let seed = seed_from_id(&format!("{customer_id}|{region}"));
    // truncates toward zero
    let jitter = pseudo_uniform(seed, -SEVERITY_JITTER, SEVERITY_JITTER) as i32;
    (SEVERITY_BASE + region_bias(region) + jitter).clamp(0, 100) as u8
}

/// Placeholder churn propensity in `0.0..=0.95`, fixed per customer.
///
/// The 1.5 power skews the distribution so only a thin tail of customers
/// lands near the top of the range.
pub fn churn_risk_score(customer_id: &str) -> f64 {
    let u = pseudo_uniform(seed_from_id(customer_id), 0.0, 1.0);
    round_to_cents(u.powf(CHURN_RISK_EXPONENT) * CHURN_RISK_SCALE).min(CHURN_RISK_CAP)
}

pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
