//! Pure validation of node labels — no I/O, no async.
//!
//! Node labels and additional labels end up as Kubernetes node labels and as
//! CLI tokens of lifecycle scripts, so they follow the Kubernetes rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use nodescale_common::ScalingError;
use regex::Regex;

/// Kubernetes label value: 63 chars max, alphanumeric at both ends.
pub static LABEL_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9._-]{0,61}[A-Za-z0-9])?$").expect("valid regex")
});

/// Kubernetes label key with an optional DNS-subdomain prefix.
pub static LABEL_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"^([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*/)?[A-Za-z0-9]([A-Za-z0-9._-]{0,61}[A-Za-z0-9])?$",
    )
    .expect("valid regex")
});

/// Validate the correlation label of a node.
pub fn validate_node_label(label: &str) -> Result<(), ScalingError> {
    if label.trim().is_empty() {
        return Err(ScalingError::MissingField { field: "run id" });
    }
    if !LABEL_VALUE_RE.is_match(label) {
        return Err(ScalingError::Configuration(format!(
            "invalid node label '{label}': must be 1-63 alphanumeric characters, '-', '_' or '.'"
        )));
    }
    Ok(())
}

/// Validate additional node labels. Empty values are allowed.
pub fn validate_labels(labels: &BTreeMap<String, String>) -> Result<(), ScalingError> {
    for (key, value) in labels {
        if !LABEL_KEY_RE.is_match(key) {
            return Err(ScalingError::Configuration(format!(
                "invalid label key '{key}'"
            )));
        }
        if !value.is_empty() && !LABEL_VALUE_RE.is_match(value) {
            return Err(ScalingError::Configuration(format!(
                "invalid value '{value}' for label '{key}'"
            )));
        }
    }
    Ok(())
}

/// Parse a `key=value` pair as given on the command line.
pub fn parse_label_pair(pair: &str) -> Result<(String, String), ScalingError> {
    let (key, value) = pair.split_once('=').ok_or_else(|| {
        ScalingError::Configuration(format!("label '{pair}' must have the form key=value"))
    })?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}
