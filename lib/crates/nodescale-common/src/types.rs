use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variables handed to a script or a container.
///
/// Ordered so that rendering the same input twice yields identical output.
pub type EnvVars = BTreeMap<String, String>;

/// Cloud provider identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudProvider {
    Azure,
}

impl CloudProvider {
    /// Upper-case name as exposed to scripts and containers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Azure => "AZURE",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric region identifier assigned by the region registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An Azure region record as held by the region registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AzureRegion {
    pub id: RegionId,
    #[serde(default)]
    pub name: String,
    /// Azure location code, e.g. `eastus`.
    pub region_code: String,
    pub resource_group: String,
    pub storage_account: String,
    /// Path to the Azure SDK auth file on the host. Blank means "use the
    /// ambient identity".
    #[serde(default)]
    pub auth_file: Option<String>,
    pub ssh_public_key_path: String,
}

impl AzureRegion {
    /// The auth file path, if one is configured and non-blank.
    #[must_use]
    pub fn auth_file(&self) -> Option<&str> {
        self.auth_file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

/// A region record of any supported provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "provider", rename_all = "UPPERCASE")]
pub enum CloudRegion {
    Azure(AzureRegion),
}

impl CloudRegion {
    #[must_use]
    pub fn id(&self) -> RegionId {
        match self {
            Self::Azure(region) => region.id,
        }
    }

    #[must_use]
    pub fn provider(&self) -> CloudProvider {
        match self {
            Self::Azure(_) => CloudProvider::Azure,
        }
    }

    #[must_use]
    pub fn region_code(&self) -> &str {
        match self {
            Self::Azure(region) => &region.region_code,
        }
    }
}

/// Storage credentials of an Azure region.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AzureRegionCredentials {
    pub storage_account_key: String,
}

impl fmt::Debug for AzureRegionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureRegionCredentials")
            .field("storage_account_key", &"<redacted>")
            .finish()
    }
}

/// Credentials of a region, tagged by provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "provider", rename_all = "UPPERCASE")]
pub enum CloudCredentials {
    Azure(AzureRegionCredentials),
}

/// Instance shape requested for a new node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceSpec {
    pub image: String,
    pub instance_type: String,
    pub disk_size_gb: u32,
    /// Docker images to pull while the node boots, in request order.
    #[serde(default)]
    pub pre_pulled_images: Vec<String>,
    /// `None` defers to the cluster-wide spot preference.
    #[serde(default)]
    pub spot: Option<bool>,
}

/// A request to bring up a node for a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScalingRequest {
    /// Correlation key tagging the node; scripts use it to find the node later.
    pub node_label: String,
    pub region: RegionId,
    pub instance: InstanceSpec,
    #[serde(default)]
    pub additional_labels: BTreeMap<String, String>,
}
