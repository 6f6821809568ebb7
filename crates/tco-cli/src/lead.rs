//! Lead capture: forwards an email address to a form-collection endpoint.
//!
//! Unrelated to the projection. Every failure is folded into a
//! [`LeadOutcome`] so a broken network never aborts the CLI.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FORM_ENDPOINT: &str =
    "https://docs.google.com/forms/d/1FvwZlm9TR54PDuL_Gv4JczPNAoz8kg7xsKHGYcpwL3Y/formResponse";

/// Source tag recorded alongside every submitted email.
pub const LEAD_SOURCE_TAG: &str = "App Simulateur TCO";

const EMAIL_FIELD: &str = "entry.436351499";
const SOURCE_FIELD: &str = "entry.1648052779";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadSubmission {
    pub email: String,
    pub source: String,
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint answered HTTP {status}")]
    Rejected { status: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LeadOutcome {
    Submitted,
    Failed { reason: String },
    ConsentMissing,
    InvalidEmail,
}

impl LeadOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            LeadOutcome::Submitted => "Report requested. Watch your inbox.",
            LeadOutcome::Failed { .. } => "Connection error. Please try again.",
            LeadOutcome::ConsentMissing => "Tick the data-protection consent box first.",
            LeadOutcome::InvalidEmail => "Invalid email address.",
        }
    }
}

/// Where lead submissions are delivered.
pub trait LeadSink {
    fn submit(&self, lead: &LeadSubmission) -> Result<(), LeadError>;
}

/// Posts leads as an HTML form to a form-collection endpoint.
pub struct FormEndpointSink {
    client: Client,
    endpoint: String,
}

impl FormEndpointSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LeadError> {
        let client = Client::builder()
            .user_agent(concat!("asset-tco/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LeadError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl LeadSink for FormEndpointSink {
    fn submit(&self, lead: &LeadSubmission) -> Result<(), LeadError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                (EMAIL_FIELD, lead.email.as_str()),
                (SOURCE_FIELD, lead.source.as_str()),
            ])
            .send()?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(LeadError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Loose syntactic check: an `@` and a `.` somewhere in the address.
pub fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Validate consent and email, then hand the lead to `sink`.
pub fn submit_lead(sink: &dyn LeadSink, email: &str, consent: bool) -> LeadOutcome {
    let email = email.trim();
    if !consent {
        return LeadOutcome::ConsentMissing;
    }
    if !is_plausible_email(email) {
        return LeadOutcome::InvalidEmail;
    }

    let lead = LeadSubmission {
        email: email.to_string(),
        source: LEAD_SOURCE_TAG.to_string(),
    };
    match sink.submit(&lead) {
        Ok(()) => {
            tracing::info!("lead submitted");
            LeadOutcome::Submitted
        }
        Err(e) => {
            tracing::warn!(error = %e, "lead submission failed");
            LeadOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records submissions; optionally rejects them with a status code.
    struct RecordingSink {
        reject_with: Option<u16>,
        seen: RefCell<Vec<LeadSubmission>>,
    }

    impl RecordingSink {
        fn accepting() -> Self {
            Self {
                reject_with: None,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn rejecting(status: u16) -> Self {
            Self {
                reject_with: Some(status),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl LeadSink for RecordingSink {
        fn submit(&self, lead: &LeadSubmission) -> Result<(), LeadError> {
            self.seen.borrow_mut().push(lead.clone());
            match self.reject_with {
                Some(status) => Err(LeadError::Rejected { status }),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn test_plausible_email() {
        assert!(is_plausible_email("dg@usine.cm"));
        assert!(!is_plausible_email("dg@usine"));
        assert!(!is_plausible_email("foo"));
    }

    #[test]
    fn test_submitted_with_source_tag() {
        let sink = RecordingSink::accepting();
        let outcome = submit_lead(&sink, " dg@usine.cm ", true);
        assert_eq!(outcome, LeadOutcome::Submitted);
        let seen = sink.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].email, "dg@usine.cm");
        assert_eq!(seen[0].source, LEAD_SOURCE_TAG);
    }

    #[test]
    fn test_consent_checked_before_email() {
        let sink = RecordingSink::accepting();
        assert_eq!(submit_lead(&sink, "foo", false), LeadOutcome::ConsentMissing);
        assert!(sink.seen.borrow().is_empty());
    }

    #[test]
    fn test_invalid_email_not_sent() {
        let sink = RecordingSink::accepting();
        assert_eq!(submit_lead(&sink, "foo", true), LeadOutcome::InvalidEmail);
        assert!(sink.seen.borrow().is_empty());
    }

    #[test]
    fn test_rejection_becomes_failed_outcome() {
        let sink = RecordingSink::rejecting(500);
        match submit_lead(&sink, "dg@usine.cm", true) {
            LeadOutcome::Failed { reason } => assert!(reason.contains("500")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let v = serde_json::to_value(LeadOutcome::ConsentMissing).unwrap();
        assert_eq!(v, serde_json::json!({ "outcome": "consent_missing" }));
    }
}
