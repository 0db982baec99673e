use crate::types::RegionId;

/// Prefixes of container-facing variables.
///
/// Each key is `<PREFIX>_<region id>` so that one container can carry the
/// identity of several regions at once.
pub mod keys {
    /// Format: CP_ACCOUNT_REGION_{id}
    /// Value: provider region code, e.g. `eastus`
    pub const CLOUD_REGION_PREFIX: &str = "CP_ACCOUNT_REGION";

    /// Format: CP_ACCOUNT_ID_{id}
    /// Value: storage account name
    pub const CLOUD_ACCOUNT_PREFIX: &str = "CP_ACCOUNT_ID";

    /// Format: CP_ACCOUNT_KEY_{id}
    /// Value: storage account key, read from the registry at call time
    pub const CLOUD_ACCOUNT_KEY_PREFIX: &str = "CP_ACCOUNT_KEY";

    /// Format: CP_ACCOUNT_REGION_PROVIDER_{id}
    /// Value: provider name, e.g. `AZURE`
    pub const CLOUD_PROVIDER_PREFIX: &str = "CP_ACCOUNT_REGION_PROVIDER";
}

/// Literal keys of script-facing variables, per provider.
pub mod script {
    /// Host path of the Azure SDK auth file. Only set when non-blank.
    pub const AZURE_AUTH_LOCATION: &str = "AZURE_AUTH_LOCATION";

    /// Resource group new nodes are created in. Always set.
    pub const AZURE_RESOURCE_GROUP: &str = "AZURE_RESOURCE_GROUP";
}

/// Build a container-facing key for a region.
#[must_use]
pub fn container_key(prefix: &str, region: RegionId) -> String {
    format!("{prefix}_{region}")
}
