use clap::Args;
use serde_json::Value;

use crate::lead::{self, FormEndpointSink, LeadOutcome, DEFAULT_FORM_ENDPOINT};

/// Arguments for requesting the audit report
#[derive(Args)]
pub struct LeadArgs {
    /// Professional email address
    #[arg(long)]
    pub email: String,

    /// Consent to data processing
    #[arg(long)]
    pub consent: bool,

    /// Form-collection endpoint receiving the submission
    #[arg(long, env = "TCO_LEAD_ENDPOINT", default_value = DEFAULT_FORM_ENDPOINT)]
    pub endpoint: String,
}

/// Submit a lead. Always succeeds from the CLI's point of view; the outcome
/// field tells whether the endpoint accepted it.
pub fn run_lead(args: LeadArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let outcome = match FormEndpointSink::new(&args.endpoint) {
        Ok(sink) => lead::submit_lead(&sink, &args.email, args.consent),
        Err(e) => LeadOutcome::Failed {
            reason: e.to_string(),
        },
    };

    let mut result = serde_json::to_value(&outcome)?;
    result["message"] = Value::from(outcome.message());

    Ok(serde_json::json!({ "result": result }))
}
