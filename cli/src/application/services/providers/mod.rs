//! Provider scaling contract and the closed set of provider variants.
//!
//! Every cloud implements [`ProviderScaling`] against its own region record.
//! [`ScalingProvider`] is the tagged union the rest of the application works
//! with; [`ProviderRegistry`] maps a provider identity to its variant and is
//! built once at startup.

pub mod azure;

use std::collections::HashMap;
use std::sync::Arc;

use nodescale_common::{
    CloudProvider, CloudRegion, EnvVars, RenderedCommand, ScalingError, ScalingRequest,
};

use crate::application::ports::{PreferenceSource, RegionRegistry};
use crate::domain::NodescaleConfig;

pub use azure::AzureScaling;

/// The capability set every cloud provider must offer.
///
/// Builders are pure: they never spawn processes and return byte-identical
/// output for identical input. A missing or blank required field is a
/// `ScalingError` raised here, at build time.
pub trait ProviderScaling {
    /// Provider-specific region record.
    type Region;

    fn provider(&self) -> CloudProvider;

    fn build_node_up_command(
        &self,
        region: &Self::Region,
        request: &ScalingRequest,
    ) -> Result<RenderedCommand, ScalingError>;

    fn build_node_down_command(
        &self,
        region: &Self::Region,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError>;

    fn build_reassign_command(
        &self,
        region: &Self::Region,
        old_label: &str,
        new_label: &str,
    ) -> Result<RenderedCommand, ScalingError>;

    fn build_terminate_command(
        &self,
        region: &Self::Region,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError>;

    /// Variables for the host-level lifecycle scripts.
    fn build_script_env_vars(&self, region: &Self::Region) -> EnvVars;

    /// Variables exposing this region's cloud identity to a container,
    /// keyed by region id.
    fn build_container_cloud_env_vars(
        &self,
        region: &Self::Region,
    ) -> Result<EnvVars, ScalingError>;
}

/// A registered provider implementation.
pub enum ScalingProvider {
    Azure(AzureScaling),
}

impl ScalingProvider {
    #[must_use]
    pub fn provider(&self) -> CloudProvider {
        match self {
            Self::Azure(azure) => azure.provider(),
        }
    }

    pub fn build_node_up_command(
        &self,
        region: &CloudRegion,
        request: &ScalingRequest,
    ) -> Result<RenderedCommand, ScalingError> {
        match (self, region) {
            (Self::Azure(azure), CloudRegion::Azure(region)) => {
                azure.build_node_up_command(region, request)
            }
        }
    }

    pub fn build_node_down_command(
        &self,
        region: &CloudRegion,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        match (self, region) {
            (Self::Azure(azure), CloudRegion::Azure(region)) => {
                azure.build_node_down_command(region, node_label)
            }
        }
    }

    pub fn build_reassign_command(
        &self,
        region: &CloudRegion,
        old_label: &str,
        new_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        match (self, region) {
            (Self::Azure(azure), CloudRegion::Azure(region)) => {
                azure.build_reassign_command(region, old_label, new_label)
            }
        }
    }

    pub fn build_terminate_command(
        &self,
        region: &CloudRegion,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        match (self, region) {
            (Self::Azure(azure), CloudRegion::Azure(region)) => {
                azure.build_terminate_command(region, node_label)
            }
        }
    }

    #[must_use]
    pub fn build_script_env_vars(&self, region: &CloudRegion) -> EnvVars {
        match (self, region) {
            (Self::Azure(azure), CloudRegion::Azure(region)) => azure.build_script_env_vars(region),
        }
    }

    pub fn build_container_cloud_env_vars(
        &self,
        region: &CloudRegion,
    ) -> Result<EnvVars, ScalingError> {
        match (self, region) {
            (Self::Azure(azure), CloudRegion::Azure(region)) => {
                azure.build_container_cloud_env_vars(region)
            }
        }
    }
}

/// Provider identity → implementation. Read-only after construction.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<CloudProvider, ScalingProvider>,
}

impl ProviderRegistry {
    /// Register every provider that has a configuration section.
    #[must_use]
    pub fn from_config(
        config: &NodescaleConfig,
        preferences: &Arc<dyn PreferenceSource>,
        regions: &Arc<dyn RegionRegistry>,
    ) -> Self {
        let mut registry = Self::default();
        if let Some(scripts) = &config.azure {
            registry.register(ScalingProvider::Azure(AzureScaling::new(
                scripts.clone(),
                config.cluster.clone(),
                Arc::clone(preferences),
                Arc::clone(regions),
            )));
        }
        registry
    }

    /// Add or replace the variant of its provider.
    pub fn register(&mut self, provider: ScalingProvider) {
        self.providers.insert(provider.provider(), provider);
    }

    pub fn get(&self, provider: CloudProvider) -> Result<&ScalingProvider, ScalingError> {
        self.providers.get(&provider).ok_or_else(|| {
            ScalingError::Configuration(format!("no scaling provider registered for {provider}"))
        })
    }

    /// The variant responsible for `region`.
    pub fn for_region(&self, region: &CloudRegion) -> Result<&ScalingProvider, ScalingError> {
        self.get(region.provider())
    }

    #[must_use]
    pub fn providers(&self) -> Vec<CloudProvider> {
        let mut ids: Vec<_> = self.providers.keys().copied().collect();
        ids.sort();
        ids
    }
}
