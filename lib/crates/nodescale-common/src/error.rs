use thiserror::Error;

use crate::types::RegionId;

/// Typed failures raised while turning a scaling intent into a command.
///
/// `MissingField` and `Configuration` are raised synchronously at build
/// time. `CredentialResolution` is raised by the container env-var builder. `Execution` only ever reaches the logs: the
/// dispatcher has already returned control to the caller by then.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalingError {
    #[error("configuration error: {field} is missing or blank")]
    MissingField { field: &'static str },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot resolve credentials for region {region}: {reason}")]
    CredentialResolution { region: RegionId, reason: String },

    #[error("execution of {program} failed: {reason}")]
    Execution { program: String, reason: String },
}

impl ScalingError {
    /// `true` for the build-time configuration family.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::Configuration(_))
    }

    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } | Self::Configuration(_) => "CONFIGURATION",
            Self::CredentialResolution { .. } => "CREDENTIAL_RESOLUTION",
            Self::Execution { .. } => "EXECUTION",
        }
    }
}
