//! Scaling service: render synchronously, execute through the queue.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use nodescale::application::ports::{ProcessExecutor, RegionRegistry, TaskQueue};
use nodescale::application::services::{
    Dispatch, ProviderRegistry, ScalingProvider, ScalingService,
};
use nodescale::infra::worker_pool::WorkerPool;
use nodescale_common::{RegionId, ScalingError};

use crate::helpers::{NODEDOWN, NODEUP, azure, azure_region, err_output, regions, request};
use crate::mocks::{InMemoryRegions, ManualQueue, RecordingExecutor};

struct Harness {
    service: ScalingService,
    executor: Arc<RecordingExecutor>,
    queue: Arc<ManualQueue>,
}

fn harness_with(executor: RecordingExecutor, registry: Arc<InMemoryRegions>) -> Harness {
    let mut providers = ProviderRegistry::default();
    providers.register(ScalingProvider::Azure(azure(true, Arc::clone(&registry))));
    let executor = Arc::new(executor);
    let queue = Arc::new(ManualQueue::default());
    let service = ScalingService::new(
        Arc::new(providers),
        registry as Arc<dyn RegionRegistry>,
        Arc::clone(&executor) as Arc<dyn ProcessExecutor>,
        Arc::clone(&queue) as Arc<dyn TaskQueue>,
    );
    Harness {
        service,
        executor,
        queue,
    }
}

fn harness() -> Harness {
    harness_with(
        RecordingExecutor::succeeding(),
        regions(&[azure_region(7, ""), azure_region(3, "/etc/azure/auth.json")]),
    )
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scale_up_returns_before_execution() {
    let h = harness();

    let outcome = h
        .service
        .scale_up_node(&request("run-42", 7, None))
        .expect("renders");

    assert_eq!(outcome.status, Dispatch::Submitted);
    assert_eq!(h.queue.queued(), 1);
    assert!(h.executor.calls().is_empty());

    h.queue.run_all().await;

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "python");
    assert_eq!(calls[0].args[0], NODEUP);
    assert!(calls[0].args.windows(2).any(|w| w[0] == "--is_spot" && w[1] == "true"));
    assert_eq!(calls[0].env["AZURE_RESOURCE_GROUP"], "rg-7");
}

#[tokio::test]
async fn test_returned_command_is_the_one_executed() {
    let h = harness();

    let dispatched = h
        .service
        .scale_up_node(&request("run-42", 7, None))
        .expect("renders");
    h.queue.run_all().await;

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, dispatched.command.program());
    assert_eq!(calls[0].args, dispatched.command.args());
    assert_eq!(&calls[0].env, dispatched.command.env());
}

#[tokio::test]
async fn test_skipped_duplicate_still_reports_its_command() {
    let h = harness();

    h.service
        .terminate_node(RegionId(7), "run-42")
        .expect("renders");
    let second = h
        .service
        .terminate_node(RegionId(7), "run-42")
        .expect("renders");

    assert_eq!(second.status, Dispatch::AlreadyInFlight);
    assert_eq!(second.command.flag("run_id"), Some("run-42"));
}

#[tokio::test]
async fn test_scale_down_runs_with_script_env_overlay() {
    let h = harness();

    h.service
        .scale_down_node(RegionId(3), "run-42")
        .expect("renders");
    h.queue.run_all().await;

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec![NODEDOWN, "--run_id", "run-42"]);
    assert_eq!(calls[0].env["AZURE_AUTH_LOCATION"], "/etc/azure/auth.json");
    assert_eq!(calls[0].env.len(), 2);
}

#[tokio::test]
async fn test_duplicate_request_while_in_flight_is_skipped() {
    let h = harness();

    let first = h
        .service
        .scale_down_node(RegionId(7), "run-42")
        .expect("renders");
    let second = h
        .service
        .scale_down_node(RegionId(7), "run-42")
        .expect("renders");

    assert_eq!(first.status, Dispatch::Submitted);
    assert_eq!(second.status, Dispatch::AlreadyInFlight);
    assert_eq!(h.queue.queued(), 1);
    assert_eq!(h.service.in_flight(), 1);
}

#[tokio::test]
async fn test_claim_is_released_when_task_finishes() {
    let h = harness();

    h.service
        .scale_down_node(RegionId(7), "run-42")
        .expect("renders");
    h.queue.run_all().await;
    assert_eq!(h.service.in_flight(), 0);

    let again = h
        .service
        .scale_down_node(RegionId(7), "run-42")
        .expect("renders");
    assert_eq!(again.status, Dispatch::Submitted);
}

#[tokio::test]
async fn test_different_operations_on_same_node_are_independent() {
    let h = harness();

    let down = h
        .service
        .scale_down_node(RegionId(7), "run-42")
        .expect("renders");
    let terminate = h
        .service
        .terminate_node(RegionId(7), "run-42")
        .expect("renders");

    assert_eq!(down.status, Dispatch::Submitted);
    assert_eq!(terminate.status, Dispatch::Submitted);
    assert_eq!(h.queue.queued(), 2);
}

#[tokio::test]
async fn test_reassign_dispatches_both_labels() {
    let h = harness();

    h.service
        .reassign_node(RegionId(7), "run-1", "run-2")
        .expect("renders");
    h.queue.run_all().await;

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].args.contains(&"--old_id".to_string()));
    assert!(calls[0].args.contains(&"run-2".to_string()));
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_region_fails_synchronously() {
    let h = harness();

    let err = h
        .service
        .scale_up_node(&request("run-42", 99, None))
        .expect_err("unknown region");

    assert!(err.is_configuration());
    assert_eq!(h.queue.queued(), 0);
}

#[test]
fn test_invalid_label_submits_nothing() {
    let h = harness();

    let err = h
        .service
        .scale_down_node(RegionId(7), "")
        .expect_err("blank label");

    assert_eq!(err, ScalingError::MissingField { field: "run id" });
    assert_eq!(h.queue.queued(), 0);
    assert_eq!(h.service.in_flight(), 0);
}

#[test]
fn test_pool_scale_down_swallows_build_errors() {
    let h = harness();

    h.service.scale_down_pool_node(RegionId(7), "bad label");
    h.service.scale_down_pool_node(RegionId(99), "p-1");

    assert_eq!(h.queue.queued(), 0);
}

#[test]
fn test_pool_scale_down_submits_on_success() {
    let h = harness();

    h.service.scale_down_pool_node(RegionId(7), "p-0a1b2c");

    assert_eq!(h.queue.queued(), 1);
}

#[tokio::test]
async fn test_execution_failure_does_not_propagate() {
    let h = harness_with(
        RecordingExecutor::failing("spawn failed"),
        regions(&[azure_region(7, "")]),
    );

    let outcome = h
        .service
        .terminate_node(RegionId(7), "run-42")
        .expect("renders");
    h.queue.run_all().await;

    assert_eq!(outcome.status, Dispatch::Submitted);
    assert_eq!(h.executor.calls().len(), 1);
    assert_eq!(h.service.in_flight(), 0);
}

#[tokio::test]
async fn test_non_zero_exit_releases_claim() {
    let h = harness_with(
        RecordingExecutor::with_output(err_output(2, b"node not found")),
        regions(&[azure_region(7, "")]),
    );

    h.service
        .scale_down_node(RegionId(7), "run-42")
        .expect("renders");
    h.queue.run_all().await;

    assert_eq!(h.service.in_flight(), 0);
}

#[test]
fn test_unregistered_provider_is_configuration_error() {
    let registry = regions(&[azure_region(7, "")]);
    let service = ScalingService::new(
        Arc::new(ProviderRegistry::default()),
        registry as Arc<dyn RegionRegistry>,
        Arc::new(RecordingExecutor::succeeding()),
        Arc::new(ManualQueue::default()),
    );

    let err = service
        .scale_down_node(RegionId(7), "run-42")
        .expect_err("no provider");

    assert!(err.is_configuration());
}

// ── Environment ──────────────────────────────────────────────────────────────

#[test]
fn test_container_env_through_service() {
    let h = harness();

    let env = h.service.container_env_vars(RegionId(3)).expect("resolves");

    assert_eq!(env["CP_ACCOUNT_KEY_3"], "key-3");
    assert_eq!(env["CP_ACCOUNT_REGION_PROVIDER_3"], "AZURE");
}

#[test]
fn test_script_env_through_service() {
    let h = harness();

    let env = h.service.script_env_vars(RegionId(7)).expect("resolves");

    assert!(!env.contains_key("AZURE_AUTH_LOCATION"));
}

// ── Worker pool ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_worker_pool_drains_dispatched_commands() {
    let registry = regions(&[azure_region(7, "")]);
    let mut providers = ProviderRegistry::default();
    providers.register(ScalingProvider::Azure(azure(false, Arc::clone(&registry))));
    let executor = Arc::new(RecordingExecutor::succeeding());
    let pool = Arc::new(WorkerPool::current(2).expect("inside runtime"));
    let service = ScalingService::new(
        Arc::new(providers),
        registry as Arc<dyn RegionRegistry>,
        Arc::clone(&executor) as Arc<dyn ProcessExecutor>,
        Arc::clone(&pool) as Arc<dyn TaskQueue>,
    );

    for label in ["run-1", "run-2", "run-3"] {
        service
            .scale_down_node(RegionId(7), label)
            .expect("renders");
    }
    pool.wait_idle().await;

    assert_eq!(executor.calls().len(), 3);
    assert_eq!(service.in_flight(), 0);
}
