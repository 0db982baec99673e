//! File-backed implementation of the `RegionRegistry` port.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nodescale_common::{CloudCredentials, CloudRegion, RegionId, ScalingError};

use crate::application::ports::RegionRegistry;

/// Region records loaded once from a YAML list; credentials re-read from a
/// separate YAML map (keyed by region id) on every lookup.
pub struct FileRegionRegistry {
    regions: HashMap<RegionId, CloudRegion>,
    credentials_file: Option<PathBuf>,
}

impl FileRegionRegistry {
    /// # Errors
    ///
    /// Returns an error if the regions file cannot be read or parsed, or
    /// lists the same id twice.
    pub fn load(regions_file: &Path, credentials_file: Option<PathBuf>) -> Result<Self> {
        let content = std::fs::read_to_string(regions_file)
            .with_context(|| format!("cannot read {}", regions_file.display()))?;
        let records: Vec<CloudRegion> = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", regions_file.display()))?;

        let mut regions = HashMap::with_capacity(records.len());
        for region in records {
            let id = region.id();
            if regions.insert(id, region).is_some() {
                anyhow::bail!(
                    "region {id} is listed twice in {}",
                    regions_file.display()
                );
            }
        }
        Ok(Self {
            regions,
            credentials_file,
        })
    }

    /// A registry over in-memory records.
    #[must_use]
    pub fn from_records(
        records: impl IntoIterator<Item = CloudRegion>,
        credentials_file: Option<PathBuf>,
    ) -> Self {
        Self {
            regions: records.into_iter().map(|r| (r.id(), r)).collect(),
            credentials_file,
        }
    }

    /// Known region ids, ascending.
    #[must_use]
    pub fn region_ids(&self) -> Vec<RegionId> {
        let mut ids: Vec<_> = self.regions.keys().copied().collect();
        ids.sort();
        ids
    }

    fn read_credentials(&self, id: RegionId) -> Result<CloudCredentials, String> {
        let path = self
            .credentials_file
            .as_ref()
            .ok_or_else(|| "no credentials file configured".to_string())?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let mut all: BTreeMap<RegionId, CloudCredentials> = serde_yaml::from_str(&content)
            .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
        all.remove(&id)
            .ok_or_else(|| format!("no entry in {}", path.display()))
    }
}

impl RegionRegistry for FileRegionRegistry {
    fn find_region(&self, id: RegionId) -> Result<CloudRegion, ScalingError> {
        self.regions
            .get(&id)
            .cloned()
            .ok_or_else(|| ScalingError::Configuration(format!("unknown region {id}")))
    }

    fn load_credentials(&self, id: RegionId) -> Result<CloudCredentials, ScalingError> {
        if !self.regions.contains_key(&id) {
            return Err(ScalingError::CredentialResolution {
                region: id,
                reason: "unknown region".to_string(),
            });
        }
        self.read_credentials(id)
            .map_err(|reason| ScalingError::CredentialResolution { region: id, reason })
    }
}
