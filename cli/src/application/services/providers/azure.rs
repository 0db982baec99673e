//! Azure variant of the provider scaling contract.

use std::sync::Arc;

use nodescale_common::{
    AzureRegion, CloudCredentials, CloudProvider, EnvVars, NodeUpCommand, ReassignCommand,
    RenderedCommand, RunIdArgCommand, ScalingError, ScalingRequest, container_key, keys, script,
};

use crate::application::ports::{PreferenceSource, RegionRegistry};
use crate::application::services::providers::ProviderScaling;
use crate::domain::config::{AzureScripts, ClusterConfig};
use crate::domain::{resolve_spot, validate_labels, validate_node_label};

/// Builds Azure lifecycle commands and environment.
pub struct AzureScaling {
    scripts: AzureScripts,
    cluster: ClusterConfig,
    preferences: Arc<dyn PreferenceSource>,
    regions: Arc<dyn RegionRegistry>,
}

impl AzureScaling {
    #[must_use]
    pub fn new(
        scripts: AzureScripts,
        cluster: ClusterConfig,
        preferences: Arc<dyn PreferenceSource>,
        regions: Arc<dyn RegionRegistry>,
    ) -> Self {
        Self {
            scripts,
            cluster,
            preferences,
            regions,
        }
    }

    fn run_id_command(
        &self,
        script: &str,
        region: &AzureRegion,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        validate_node_label(node_label)?;
        RunIdArgCommand::builder()
            .executable(&self.cluster.executable)
            .script(script)
            .run_id(node_label)
            .env(self.build_script_env_vars(region))
            .build()
    }
}

impl ProviderScaling for AzureScaling {
    type Region = AzureRegion;

    fn provider(&self) -> CloudProvider {
        CloudProvider::Azure
    }

    fn build_node_up_command(
        &self,
        region: &AzureRegion,
        request: &ScalingRequest,
    ) -> Result<RenderedCommand, ScalingError> {
        validate_node_label(&request.node_label)?;
        validate_labels(&request.additional_labels)?;

        let instance = &request.instance;
        let is_spot = resolve_spot(instance.spot, &self.preferences.snapshot());

        NodeUpCommand::builder()
            .executable(&self.cluster.executable)
            .script(&self.scripts.nodeup_script)
            .run_id(&request.node_label)
            .ssh_key(&region.ssh_public_key_path)
            .instance_image(&instance.image)
            .instance_type(&instance.instance_type)
            .instance_disk(instance.disk_size_gb.to_string())
            .kube_ip(&self.cluster.kube_master_ip)
            .kube_token(&self.cluster.kubeadm_token)
            .region(&region.region_code)
            .pre_pulled_images(instance.pre_pulled_images.iter().cloned())
            .additional_labels(request.additional_labels.clone())
            .is_spot(is_spot)
            .env(self.build_script_env_vars(region))
            .build()
    }

    fn build_node_down_command(
        &self,
        region: &AzureRegion,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        self.run_id_command(&self.scripts.nodedown_script, region, node_label)
    }

    fn build_reassign_command(
        &self,
        region: &AzureRegion,
        old_label: &str,
        new_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        validate_node_label(old_label)?;
        validate_node_label(new_label)?;
        ReassignCommand::builder()
            .executable(&self.cluster.executable)
            .script(&self.scripts.reassign_script)
            .old_id(old_label)
            .new_id(new_label)
            .env(self.build_script_env_vars(region))
            .build()
    }

    fn build_terminate_command(
        &self,
        region: &AzureRegion,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        self.run_id_command(&self.scripts.terminate_script, region, node_label)
    }

    fn build_script_env_vars(&self, region: &AzureRegion) -> EnvVars {
        let mut env = EnvVars::new();
        if let Some(auth_file) = region.auth_file() {
            env.insert(script::AZURE_AUTH_LOCATION.to_string(), auth_file.to_string());
        }
        env.insert(
            script::AZURE_RESOURCE_GROUP.to_string(),
            region.resource_group.clone(),
        );
        env
    }

    fn build_container_cloud_env_vars(
        &self,
        region: &AzureRegion,
    ) -> Result<EnvVars, ScalingError> {
        let CloudCredentials::Azure(credentials) = self.regions.load_credentials(region.id)?;
        let id = region.id;
        Ok(EnvVars::from([
            (
                container_key(keys::CLOUD_REGION_PREFIX, id),
                region.region_code.clone(),
            ),
            (
                container_key(keys::CLOUD_ACCOUNT_PREFIX, id),
                region.storage_account.clone(),
            ),
            (
                container_key(keys::CLOUD_ACCOUNT_KEY_PREFIX, id),
                credentials.storage_account_key,
            ),
            (
                container_key(keys::CLOUD_PROVIDER_PREFIX, id),
                CloudProvider::Azure.to_string(),
            ),
        ]))
    }
}
