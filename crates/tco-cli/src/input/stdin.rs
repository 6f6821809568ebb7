use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise JSON piped on stdin.
///
/// Returns `None` when stdin is an interactive terminal or carries nothing
/// but whitespace, so callers can fall back to flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| format!("Failed to parse JSON from stdin: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_tco_core::tco::params::ScenarioParams;

    #[test]
    fn test_blank_input_is_none() {
        let parsed: Option<ScenarioParams> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_malformed_input_reported() {
        let err = parse_piped::<ScenarioParams>("{ not json").unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }
}
