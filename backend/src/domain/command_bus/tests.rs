//! Tests for handler routing, failure normalisation and startup checks.

use super::*;
use crate::domain::{FailureKind, SubCode};
use async_trait::async_trait;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Double(u32);

impl Command for Double {
    const NAME: &'static str = "Double";
    type Output = u32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Misbehave {
    Reject,
    Storage,
    Opaque,
    Panic,
}

impl Command for Misbehave {
    const NAME: &'static str = "Misbehave";
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Unwired;

impl Command for Unwired {
    const NAME: &'static str = "Unwired";
    type Output = ();
}

#[derive(Debug)]
struct StorageDown;

impl fmt::Display for StorageDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("storage is down")
    }
}

impl std::error::Error for StorageDown {}

#[derive(Debug)]
struct Opaque;

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("something odd")
    }
}

impl std::error::Error for Opaque {}

struct DoubleHandler;

#[async_trait]
impl CommandHandler<Double> for DoubleHandler {
    async fn handle(&self, command: Double) -> Result<u32, HandlerError> {
        Ok(command.0 * 2)
    }
}

struct MisbehavingHandler;

#[async_trait]
impl CommandHandler<Misbehave> for MisbehavingHandler {
    async fn handle(&self, command: Misbehave) -> Result<(), HandlerError> {
        match command {
            Misbehave::Reject => Err(Box::new(
                DomainFailure::cannot_delete(SubCode::FAILED_SINGLE_DELETE)
                    .with_context("storeId", "4"),
            )),
            Misbehave::Storage => Err(Box::new(StorageDown)),
            Misbehave::Opaque => Err(Box::new(Opaque)),
            Misbehave::Panic => panic!("handler exploded"),
        }
    }
}

fn storage_down_failure(_err: &StorageDown) -> DomainFailure {
    DomainFailure::new(FailureKind::from("storage-unavailable"))
}

fn wired_bus() -> CommandBus {
    CommandBus::builder()
        .register::<Double, _>(DoubleHandler)
        .expect("first Double handler")
        .register::<Misbehave, _>(MisbehavingHandler)
        .expect("first Misbehave handler")
        .map_failure::<StorageDown>(storage_down_failure)
        .build()
}

#[fixture]
fn bus() -> CommandBus {
    wired_bus()
}

async fn failure_for(bus: &CommandBus, command: Misbehave) -> DomainFailure {
    bus.dispatch(command)
        .await
        .expect_err("command fails")
        .into_failure()
        .expect("domain failure, not configuration")
}

#[rstest]
#[tokio::test]
async fn dispatch_routes_to_the_registered_handler(bus: CommandBus) {
    assert_eq!(bus.dispatch(Double(21)).await, Ok(42));
}

#[rstest]
#[tokio::test]
async fn domain_failures_pass_through_unchanged(bus: CommandBus) {
    let failure = failure_for(&bus, Misbehave::Reject).await;

    assert_eq!(
        failure,
        DomainFailure::cannot_delete(SubCode::FAILED_SINGLE_DELETE).with_context("storeId", "4")
    );
}

#[rstest]
#[tokio::test]
async fn registered_mappers_classify_known_errors(bus: CommandBus) {
    let failure = failure_for(&bus, Misbehave::Storage).await;

    assert_eq!(failure.kind().as_str(), "storage-unavailable");
}

#[rstest]
#[case(Misbehave::Opaque, "something odd")]
#[case(Misbehave::Panic, "handler exploded")]
#[tokio::test]
async fn unrecognised_errors_become_unknown(
    bus: CommandBus,
    #[case] command: Misbehave,
    #[case] detail: &str,
) {
    let failure = failure_for(&bus, command).await;

    assert_eq!(failure.kind(), &FailureKind::UNKNOWN);
    assert_eq!(failure.context_value("detail"), Some(detail));
}

#[rstest]
#[tokio::test]
async fn failures_carry_the_trace_id_in_scope(bus: CommandBus) {
    let trace_id = TraceId::generate();

    let failure = TraceId::scope(trace_id, failure_for(&bus, Misbehave::Opaque)).await;

    assert_eq!(
        failure.context_value("traceId"),
        Some(trace_id.to_string().as_str())
    );
}

#[rstest]
#[tokio::test]
async fn unregistered_commands_are_configuration_errors(bus: CommandBus) {
    let err = bus.dispatch(Unwired).await.expect_err("no handler");

    assert_eq!(
        err,
        DispatchError::Configuration(ConfigurationError::MissingHandler { command: "Unwired" })
    );
    assert!(err.failure().is_none());
}

#[rstest]
fn registering_twice_is_rejected() {
    let result = CommandBus::builder()
        .register::<Double, _>(DoubleHandler)
        .expect("first registration")
        .register::<Double, _>(DoubleHandler);

    assert!(matches!(
        result,
        Err(ConfigurationError::DuplicateHandler { command: "Double" })
    ));
}

#[rstest]
fn registry_reports_what_is_wired(bus: CommandBus) {
    assert!(bus.is_registered::<Double>());
    assert!(!bus.is_registered::<Unwired>());
    assert_eq!(bus.registered_commands(), vec!["Double", "Misbehave"]);
}

#[given("the commands a deployment requires")]
fn the_commands_a_deployment_requires() -> Vec<CommandKey> {
    vec![CommandKey::of::<Double>(), CommandKey::of::<Misbehave>()]
}

#[given("required commands including an unwired one")]
fn required_commands_including_an_unwired_one() -> Vec<CommandKey> {
    vec![
        CommandKey::of::<Unwired>(),
        CommandKey::of::<Double>(),
        CommandKey::of::<Unwired>(),
    ]
}

#[when("startup verification runs against the wired bus")]
fn startup_verification_runs(required: Vec<CommandKey>) -> Result<(), ConfigurationError> {
    wired_bus().verify(&required)
}

#[then("verification passes")]
fn verification_passes(result: Result<(), ConfigurationError>) {
    assert_eq!(result, Ok(()));
}

#[then("each missing command is reported once")]
fn each_missing_command_is_reported_once(result: Result<(), ConfigurationError>) {
    assert_eq!(
        result,
        Err(ConfigurationError::MissingHandlers {
            commands: vec!["Unwired"],
        })
    );
}

#[rstest]
fn startup_verification_happy_path() {
    let required = the_commands_a_deployment_requires();
    let result = startup_verification_runs(required);
    verification_passes(result);
}

#[rstest]
fn startup_verification_unhappy_path() {
    let required = required_commands_including_an_unwired_one();
    let result = startup_verification_runs(required);
    each_missing_command_is_reported_once(result);
}
