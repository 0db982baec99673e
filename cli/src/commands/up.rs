//! `nodescale up` — bring up a node for a run.

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use nodescale_common::{InstanceSpec, RegionId, ScalingRequest};

use crate::app::AppContext;
use crate::commands::{Lifecycle, execute};
use crate::domain::Operation;
use crate::domain::labels::parse_label_pair;

#[derive(Args)]
pub struct UpArgs {
    /// Region id from the regions file
    #[arg(long)]
    pub region: u64,

    /// Run identifier the node is labelled with
    #[arg(long)]
    pub run_id: String,

    /// Instance image
    #[arg(long)]
    pub image: String,

    /// Instance type, e.g. Standard_D4s_v3
    #[arg(long = "type", value_name = "TYPE")]
    pub instance_type: String,

    /// Disk size in GB
    #[arg(long)]
    pub disk: u32,

    /// Force spot (true) or on-demand (false); default follows cluster.spot
    #[arg(long, value_name = "BOOL")]
    pub spot: Option<bool>,

    /// Docker image to pull while the node boots (repeatable)
    #[arg(long = "pre-pull", value_name = "IMAGE")]
    pub pre_pull: Vec<String>,

    /// Additional node label (repeatable)
    #[arg(long = "label", value_name = "KEY=VALUE", value_parser = parse_label)]
    pub labels: Vec<(String, String)>,

    /// Print the rendered command without running it
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_label(pair: &str) -> Result<(String, String), String> {
    parse_label_pair(pair).map_err(|e| e.to_string())
}

impl UpArgs {
    #[must_use]
    pub fn request(&self) -> ScalingRequest {
        ScalingRequest {
            node_label: self.run_id.clone(),
            region: RegionId(self.region),
            instance: InstanceSpec {
                image: self.image.clone(),
                instance_type: self.instance_type.clone(),
                disk_size_gb: self.disk,
                pre_pulled_images: self.pre_pull.clone(),
                spot: self.spot,
            },
            additional_labels: self.labels.iter().cloned().collect::<BTreeMap<_, _>>(),
        }
    }
}

/// Run the up command.
pub async fn run(app: &AppContext, args: UpArgs) -> Result<ExitCode> {
    let stack = app.scaling_stack()?;
    let request = args.request();
    let lifecycle = Lifecycle {
        op: Operation::Up,
        region: request.region,
        node_label: &request.node_label,
    };
    execute(
        app,
        &stack,
        &lifecycle,
        args.dry_run,
        |s| s.service.render_up(&request),
        |s| s.service.scale_up_node(&request),
    )
    .await
}
