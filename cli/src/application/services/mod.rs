//! Application services — use-case orchestration.
//!
//! Services import only from `crate::domain` and `crate::application::ports`
//! — never from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod providers;
pub mod scaling;

pub use providers::{ProviderRegistry, ProviderScaling, ScalingProvider};
pub use scaling::{Dispatch, Dispatched, ScalingService};
