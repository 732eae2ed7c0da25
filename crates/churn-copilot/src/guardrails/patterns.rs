/// Forbidden claims as `(identifier, case-insensitive pattern)` pairs.
pub(crate) const BANNED_PHRASES: &[(&str, &str)] = &[
    ("guarantee", r"(?i)\bguarantee(?:d|s)?\b"),
    ("permanent_price", r"(?i)\bpermanent prices?\b"),
    ("price_match", r"(?i)\bprice\s*match(?:ing)?\b"),
    ("speed_claim", r"(?i)\b(?:unlimited|100%)\s*(?:speed|throughput)\b"),
    ("absolute_promise", r"(?i)\bwe will (?:always|never)\b"),
    ("no_questions_asked", r"(?i)\bno questions asked\b"),
    // stand-in for customer PII echoed back into outreach
    ("pii_mention", r"(?i)\bpii\b"),
];

/// Disclaimers every outbound message must carry, in append order.
pub(crate) const REQUIRED_DISCLAIMERS: &[&str] = &[
    "availability can vary by account and region",
    "one-time credit, subject to account review",
];
