pub mod command;
pub mod env_keys;
pub mod error;
pub mod types;

pub use command::{NodeUpCommand, ReassignCommand, RenderedCommand, RunIdArgCommand};
pub use env_keys::{container_key, keys, script};
pub use error::ScalingError;
pub use types::*;
