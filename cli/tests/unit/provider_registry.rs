//! Provider registration from configuration.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use nodescale::application::ports::RegionRegistry;
use nodescale::application::services::{ProviderRegistry, ScalingProvider};
use nodescale::domain::NodescaleConfig;
use nodescale_common::{CloudProvider, CloudRegion};

use crate::helpers::{azure, azure_region, cluster, preferences, regions, scripts};

fn config(with_azure: bool) -> NodescaleConfig {
    NodescaleConfig {
        cluster: cluster(),
        azure: with_azure.then(scripts),
        ..NodescaleConfig::default()
    }
}

#[test]
fn test_from_config_registers_azure_when_section_present() {
    let registry = ProviderRegistry::from_config(
        &config(true),
        &preferences(false),
        &(regions(&[]) as Arc<dyn RegionRegistry>),
    );

    assert_eq!(registry.providers(), vec![CloudProvider::Azure]);
    let provider = registry.get(CloudProvider::Azure).expect("registered");
    assert_eq!(provider.provider(), CloudProvider::Azure);
}

#[test]
fn test_from_config_without_section_registers_nothing() {
    let registry = ProviderRegistry::from_config(
        &config(false),
        &preferences(false),
        &(regions(&[]) as Arc<dyn RegionRegistry>),
    );

    assert!(registry.providers().is_empty());
    let err = registry
        .for_region(&CloudRegion::Azure(azure_region(7, "")))
        .err()
        .expect("no provider");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("AZURE"), "got: {err}");
}

#[test]
fn test_register_replaces_same_provider() {
    let mut registry = ProviderRegistry::default();
    registry.register(ScalingProvider::Azure(azure(false, regions(&[]))));
    registry.register(ScalingProvider::Azure(azure(true, regions(&[]))));

    assert_eq!(registry.providers().len(), 1);
}

#[test]
fn test_variant_dispatches_to_region_provider() {
    let region = azure_region(7, "");
    let provider = ScalingProvider::Azure(azure(false, regions(&[region.clone()])));
    let region = CloudRegion::Azure(region);

    let cmd = provider
        .build_node_down_command(&region, "run-42")
        .expect("renders");
    assert_eq!(cmd.flag("run_id"), Some("run-42"));

    let env = provider.build_script_env_vars(&region);
    assert!(env.contains_key("AZURE_RESOURCE_GROUP"));
}
