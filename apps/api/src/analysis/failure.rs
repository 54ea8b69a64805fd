//! Upstream failure classification and remediation text.
//!
//! The API gives no structured error codes we can rely on, so classification
//! matches substrings of the lower-cased error message. Matching lives in
//! `classify_failure`; the user-facing text lives in `remediation`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    InvalidCredential,
    PermissionDenied,
    QuotaExceeded,
    BillingDisabled,
    Unclassified,
}

impl FailureCategory {
    pub fn code(self) -> &'static str {
        match self {
            FailureCategory::InvalidCredential => "AUTHENTICATION_ERROR",
            FailureCategory::PermissionDenied => "AUTHORIZATION_ERROR",
            FailureCategory::QuotaExceeded => "QUOTA_EXCEEDED",
            FailureCategory::BillingDisabled => "BILLING_NOT_ENABLED",
            FailureCategory::Unclassified => "UPSTREAM_ERROR",
        }
    }
}

const INVALID_CREDENTIAL_MARKERS: &[&str] = &["api key not valid", "api_key_invalid", "invalid api key"];
const PERMISSION_MARKERS: &[&str] = &["permission denied", "403"];
const QUOTA_MARKERS: &[&str] = &["quota", "429", "rate limit", "resource exhausted"];
const BILLING_MARKERS: &[&str] = &["billing"];

const QUOTA_CONSOLE_URL: &str =
    "https://console.cloud.google.com/apis/api/generativelanguage.googleapis.com/quotas";
const METRICS_CONSOLE_URL: &str =
    "https://console.cloud.google.com/apis/api/generativelanguage.googleapis.com/metrics";
const API_KEY_URL: &str = "https://makersuite.google.com/app/apikey";

/// Checks run in order; the first matching category wins.
pub fn classify_failure(message: &str) -> FailureCategory {
    let msg = message.to_lowercase();
    let any = |markers: &[&str]| markers.iter().any(|m| msg.contains(m));

    if any(INVALID_CREDENTIAL_MARKERS) {
        FailureCategory::InvalidCredential
    } else if any(PERMISSION_MARKERS) {
        FailureCategory::PermissionDenied
    } else if any(QUOTA_MARKERS) {
        FailureCategory::QuotaExceeded
    } else if any(BILLING_MARKERS) {
        FailureCategory::BillingDisabled
    } else {
        FailureCategory::Unclassified
    }
}

/// Multi-line, user-facing explanation for a failure of `category`.
/// `message` is the upstream error text, quoted verbatim for unclassified errors.
pub fn remediation(category: FailureCategory, message: &str) -> String {
    let mut lines: Vec<String> = match category {
        FailureCategory::InvalidCredential => vec![
            "API key is invalid or incorrect".into(),
            "   -> Check that your .env file contains: GOOGLE_API_KEY=your_key (no quotes)".into(),
            format!("   -> Verify the key is correct at: {API_KEY_URL}"),
        ],
        FailureCategory::PermissionDenied => vec![
            "Permission denied - API key may be restricted".into(),
            "   -> Remove API key restrictions temporarily (APIs & Services -> Credentials)".into(),
            "   -> Or add 'Generative Language API' to allowed APIs for this key".into(),
        ],
        FailureCategory::QuotaExceeded => quota_guidance(),
        FailureCategory::BillingDisabled => vec![
            "Billing not enabled".into(),
            "   -> Enable billing in Google Cloud Console for your project".into(),
        ],
        FailureCategory::Unclassified => vec![format!("Error: {message}")],
    };

    if matches!(
        category,
        FailureCategory::InvalidCredential | FailureCategory::Unclassified
    ) {
        lines.extend(quick_fix_checklist());
    }

    lines.join("\n")
}

fn quota_guidance() -> Vec<String> {
    vec![
        "Quota Exceeded - API Usage Limit Reached".into(),
        String::new(),
        "What this means:".into(),
        "   You've reached your API usage limit for Google Generative AI.".into(),
        String::new(),
        "How to fix:".into(),
        String::new(),
        "   Option 1: Wait and Retry (Free Tier)".into(),
        "   -> Free tier has daily/minute limits that reset over time".into(),
        "   -> Wait a few minutes or hours and try again".into(),
        format!("   -> Check quota limits: {QUOTA_CONSOLE_URL}"),
        String::new(),
        "   Option 2: Enable Billing (Recommended)".into(),
        "   -> Go to: https://console.cloud.google.com/billing".into(),
        "   -> Link a billing account to your project".into(),
        "   -> This increases your quota limits significantly".into(),
        String::new(),
        "   Option 3: Request Quota Increase".into(),
        format!("   -> Go to: {QUOTA_CONSOLE_URL}"),
        "   -> Select your project and request a quota increase".into(),
        "   -> This may require billing to be enabled".into(),
        String::new(),
        "   Option 4: Use a Different API Key".into(),
        "   -> Create a new project with a new API key".into(),
        format!("   -> Get new key: {API_KEY_URL}"),
        String::new(),
        "Tip: Check your current usage at:".into(),
        format!("   {METRICS_CONSOLE_URL}"),
    ]
}

fn quick_fix_checklist() -> Vec<String> {
    vec![
        String::new(),
        "Quick Fix Checklist:".into(),
        "   1. Verify .env file exists in project root".into(),
        "   2. Check .env contains: GOOGLE_API_KEY=your_key (no quotes, no spaces)".into(),
        "   3. Enable 'Generative Language API' in Google Cloud Console".into(),
        "   4. Ensure billing is enabled for your Google Cloud project".into(),
        "   5. Remove API key restrictions temporarily while testing".into(),
        "   6. Restart the application after making changes".into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sample_messages() {
        let cases = [
            (
                "API error (status 400): API key not valid. Please pass a valid API key. [INVALID_ARGUMENT]",
                FailureCategory::InvalidCredential,
            ),
            ("reason: API_KEY_INVALID", FailureCategory::InvalidCredential),
            (
                "API error (status 403): Method doesn't allow unregistered callers [PERMISSION_DENIED]",
                FailureCategory::PermissionDenied,
            ),
            (
                "API error (status 429): Resource has been exhausted (e.g. check quota). [RESOURCE_EXHAUSTED]",
                FailureCategory::QuotaExceeded,
            ),
            ("Rate limit reached for requests", FailureCategory::QuotaExceeded),
            (
                "This API method requires billing to be enabled",
                FailureCategory::BillingDisabled,
            ),
            ("HTTP error: connection reset by peer", FailureCategory::Unclassified),
        ];
        for (message, expected) in cases {
            assert_eq!(classify_failure(message), expected, "message: {message}");
        }
    }

    #[test]
    fn test_credential_check_precedes_permission_check() {
        // A 403 that also says the key is invalid is a credential problem.
        assert_eq!(
            classify_failure("403: invalid API key"),
            FailureCategory::InvalidCredential
        );
    }

    #[test]
    fn test_quota_remediation_has_no_checklist() {
        let text = remediation(FailureCategory::QuotaExceeded, "quota exceeded (429)");
        assert!(text.starts_with("Quota Exceeded"));
        assert!(text.contains("Option 2: Enable Billing"));
        assert!(!text.contains("Quick Fix Checklist"));
    }

    #[test]
    fn test_unclassified_quotes_message_and_adds_checklist() {
        let text = remediation(FailureCategory::Unclassified, "socket closed");
        assert!(text.starts_with("Error: socket closed"));
        assert!(text.contains("Quick Fix Checklist"));
    }

    #[test]
    fn test_invalid_credential_adds_checklist() {
        let text = remediation(FailureCategory::InvalidCredential, "");
        assert!(text.contains("API key is invalid"));
        assert!(text.contains("Quick Fix Checklist"));
    }

    #[test]
    fn test_permission_and_billing_have_no_checklist() {
        for category in [FailureCategory::PermissionDenied, FailureCategory::BillingDisabled] {
            assert!(!remediation(category, "").contains("Quick Fix Checklist"));
        }
    }
}
