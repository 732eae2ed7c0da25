//! Compliance guardrail for outbound retention messaging.
//!
//! A message passes when it contains none of the banned claims and carries
//! every required disclaimer. Repair only ever appends disclaimers; banned
//! claims are reported back for escalation and left in place.

mod patterns;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use patterns::{BANNED_PHRASES, REQUIRED_DISCLAIMERS};

static STANDARD_GUARDRAIL: Lazy<MessageGuardrail> = Lazy::new(|| {
    let policy = GuardrailPolicy::new(BANNED_PHRASES, REQUIRED_DISCLAIMERS)
        .expect("built-in banned phrase patterns compile");
    MessageGuardrail::with_policy(policy)
});

/// Outcome of a guardrail check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub pass: bool,
    pub violations: Vec<String>,
    pub missing_disclaimers: Vec<String>,
}

impl ComplianceResult {
    fn from_findings(violations: Vec<String>, missing_disclaimers: Vec<String>) -> Self {
        Self {
            pass: violations.is_empty() && missing_disclaimers.is_empty(),
            violations,
            missing_disclaimers,
        }
    }

    /// True when the only problems are missing disclaimers, which repair fixes.
    pub fn is_repairable(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A forbidden claim and the identifier reported when it matches.
#[derive(Debug, Clone)]
pub struct BannedPhrase {
    id: String,
    pattern: Regex,
}

impl BannedPhrase {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Banned claims plus the disclaimers every message has to carry.
#[derive(Debug, Clone)]
pub struct GuardrailPolicy {
    banned: Vec<BannedPhrase>,
    required: Vec<String>,
}

impl GuardrailPolicy {
    pub fn new(banned: &[(&str, &str)], required: &[&str]) -> Result<Self, regex::Error> {
        let banned = banned
            .iter()
            .map(|(id, pattern)| {
                Ok(BannedPhrase {
                    id: (*id).to_string(),
                    pattern: Regex::new(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let required = required
            .iter()
            .map(|snippet| snippet.to_lowercase())
            .collect();

        Ok(Self { banned, required })
    }

    pub fn banned_phrases(&self) -> &[BannedPhrase] {
        &self.banned
    }

    pub fn required_disclaimers(&self) -> &[String] {
        &self.required
    }
}

/// Checks and repairs outreach copy against a [`GuardrailPolicy`].
#[derive(Debug, Clone)]
pub struct MessageGuardrail {
    policy: GuardrailPolicy,
}

impl MessageGuardrail {
    pub fn with_policy(policy: GuardrailPolicy) -> Self {
        Self { policy }
    }

    /// Guardrail loaded with the built-in retention messaging policy.
    pub fn standard() -> &'static MessageGuardrail {
        &STANDARD_GUARDRAIL
    }

    pub fn policy(&self) -> &GuardrailPolicy {
        &self.policy
    }

    pub fn check(&self, text: &str) -> ComplianceResult {
        let violations = self
            .policy
            .banned
            .iter()
            .filter(|phrase| phrase.matches(text))
            .map(|phrase| phrase.id.clone())
            .collect();

        let missing = self.missing_disclaimers(text).map(str::to_string).collect();

        ComplianceResult::from_findings(violations, missing)
    }

    /// Append every missing disclaimer as `(snippet).`.
    ///
    /// Applying it twice yields the same text as applying it once.
    pub fn add_disclaimers(&self, text: &str) -> String {
        let to_add: Vec<&str> = self.missing_disclaimers(text).collect();
        if to_add.is_empty() {
            return text.to_string();
        }

        let suffix = to_add
            .iter()
            .map(|snippet| format!("({snippet})."))
            .collect::<Vec<_>>()
            .join(" ");

        let body = text.trim_end();
        if body.is_empty() {
            return suffix;
        }

        if body.ends_with(['.', '!', '?']) {
            format!("{body} {suffix}")
        } else {
            format!("{body}. {suffix}")
        }
    }

    /// Optionally repair `text`, then check the final copy.
    pub fn check_and_repair(&self, text: &str, auto_fix: bool) -> (String, ComplianceResult) {
        let final_text = if auto_fix {
            self.add_disclaimers(text)
        } else {
            text.to_string()
        };
        let result = self.check(&final_text);
        (final_text, result)
    }

    fn missing_disclaimers<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a str> + 'a {
        let lowered = text.to_lowercase();
        self.policy
            .required
            .iter()
            .filter(move |snippet| !lowered.contains(snippet.as_str()))
            .map(String::as_str)
    }
}

/// Check `text` against the standard policy.
pub fn check_message(text: &str) -> ComplianceResult {
    MessageGuardrail::standard().check(text)
}

/// Append missing standard disclaimers to `text`.
pub fn add_disclaimers(text: &str) -> String {
    MessageGuardrail::standard().add_disclaimers(text)
}

/// Standard-policy check, repairing missing disclaimers first when `auto_fix` is set.
pub fn check_and_optionally_repair_message(
    text: &str,
    auto_fix: bool,
) -> (String, ComplianceResult) {
    MessageGuardrail::standard().check_and_repair(text, auto_fix)
}
