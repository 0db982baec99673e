//! Property-based tests for Azure rendering and spot resolution.

#![allow(clippy::expect_used)]

use nodescale::application::services::ProviderScaling;
use nodescale::domain::{ClusterPreferences, resolve_spot};
use nodescale_common::{RegionId, container_key, keys};
use proptest::prelude::*;

use crate::helpers::{azure, azure_region, regions, request};

/// Node labels accepted by validation.
fn arb_label() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,20}[a-z0-9]"
}

/// Printable auth paths, possibly blank.
fn arb_auth_file() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("   ".to_string()), "/[a-z]{1,10}/[a-z]{1,10}\\.json"]
}

proptest! {
    #[test]
    fn prop_node_up_render_is_deterministic(
        label in arb_label(),
        disk in 1u32..4096,
        spot in proptest::option::of(any::<bool>()),
        cluster_spot in any::<bool>(),
    ) {
        let region = azure_region(7, "");
        let azure = azure(cluster_spot, regions(&[region.clone()]));
        let mut req = request(&label, 7, spot);
        req.instance.disk_size_gb = disk;

        let first = azure.build_node_up_command(&region, &req).expect("renders");
        let second = azure.build_node_up_command(&region, &req).expect("renders");

        prop_assert_eq!(first.command_line(), second.command_line());
        prop_assert_eq!(first.env(), second.env());
        let disk_token = disk.to_string();
        prop_assert_eq!(first.flag("ins_hdd"), Some(disk_token.as_str()));
    }

    #[test]
    fn prop_explicit_spot_wins_over_cluster_default(
        requested in any::<bool>(),
        cluster_spot in any::<bool>(),
    ) {
        let region = azure_region(7, "");
        let azure = azure(cluster_spot, regions(&[region.clone()]));

        let cmd = azure
            .build_node_up_command(&region, &request("run-1", 7, Some(requested)))
            .expect("renders");

        prop_assert_eq!(cmd.has_flag("is_spot"), requested);
    }

    #[test]
    fn prop_unset_spot_follows_cluster_default(cluster_spot in any::<bool>()) {
        let region = azure_region(7, "");
        let azure = azure(cluster_spot, regions(&[region.clone()]));

        let cmd = azure
            .build_node_up_command(&region, &request("run-1", 7, None))
            .expect("renders");

        prop_assert_eq!(cmd.has_flag("is_spot"), cluster_spot);
        prop_assert_eq!(
            resolve_spot(None, &ClusterPreferences { cluster_spot }),
            cluster_spot
        );
    }

    #[test]
    fn prop_auth_location_present_iff_non_blank(auth in arb_auth_file()) {
        let region = azure_region(3, &auth);
        let azure = azure(false, regions(&[region.clone()]));

        let env = azure.build_script_env_vars(&region);

        prop_assert_eq!(env.contains_key("AZURE_AUTH_LOCATION"), !auth.trim().is_empty());
        prop_assert!(env.contains_key("AZURE_RESOURCE_GROUP"));
    }

    #[test]
    fn prop_container_keys_end_with_region_id(id in 1u64..100_000) {
        let region = azure_region(id, "");
        let azure = azure(false, regions(&[region.clone()]));

        let env = azure.build_container_cloud_env_vars(&region).expect("resolves");

        prop_assert_eq!(env.len(), 4);
        let suffix = format!("_{id}");
        for key in env.keys() {
            prop_assert!(key.ends_with(&suffix), "key {} lacks suffix {}", key, suffix);
        }
        prop_assert!(env.contains_key(&container_key(keys::CLOUD_ACCOUNT_KEY_PREFIX, RegionId(id))));
    }

    #[test]
    fn prop_labels_with_whitespace_are_rejected(
        head in "[a-z]{1,5}",
        tail in "[a-z]{1,5}",
    ) {
        let region = azure_region(7, "");
        let azure = azure(false, regions(&[region.clone()]));
        let label = format!("{head} {tail}");

        let err = azure
            .build_node_down_command(&region, &label)
            .expect_err("space in label");

        prop_assert!(err.is_configuration());
    }
}
