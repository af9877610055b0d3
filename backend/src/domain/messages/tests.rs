//! Tests for message table resolution and loading.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

const SINGLE: &str = "An error occurred while deleting the object.";
const BULK: &str = "An error occurred while deleting this selection.";
const STATUS: &str = "An error occurred while updating the status.";

fn delete_and_status_table() -> MessageTable {
    MessageTable::builder()
        .message(FailureKind::CANNOT_TOGGLE_STATUS, STATUS)
        .sub_code_message(
            FailureKind::CANNOT_DELETE,
            SubCode::FAILED_SINGLE_DELETE,
            SINGLE,
        )
        .sub_code_message(FailureKind::CANNOT_DELETE, SubCode::FAILED_BULK_DELETE, BULK)
        .build()
}

#[fixture]
fn table() -> MessageTable {
    delete_and_status_table()
}

#[rstest]
fn single_and_bulk_sub_codes_resolve_to_different_messages(table: MessageTable) {
    let single = DomainFailure::cannot_delete(SubCode::FAILED_SINGLE_DELETE);
    let bulk = DomainFailure::cannot_delete(SubCode::FAILED_BULK_DELETE);

    assert_eq!(table.resolve(&single), SINGLE);
    assert_eq!(table.resolve(&bulk), BULK);
    assert_ne!(table.resolve(&single), table.resolve(&bulk));
}

#[rstest]
#[case(DomainFailure::new(FailureKind::from("exploded")))]
#[case(DomainFailure::unknown())]
#[case(DomainFailure::new(FailureKind::CANNOT_DELETE))]
#[case(DomainFailure::cannot_delete(SubCode::from("failed-archive")))]
fn uncovered_failures_resolve_to_the_fallback(table: MessageTable, #[case] failure: DomainFailure) {
    assert_eq!(table.resolve(&failure), DEFAULT_FALLBACK_MESSAGE);
}

#[rstest]
fn flat_entries_ignore_the_sub_code(table: MessageTable) {
    let failure = DomainFailure::cannot_toggle_status().with_sub_code(SubCode::from("anything"));
    assert_eq!(resolve(&failure, &table), STATUS);
}

#[rstest]
fn custom_fallback_is_used(table: MessageTable) {
    let custom = table.with_fallback("Something broke.");
    assert_eq!(custom.resolve(&DomainFailure::not_found()), "Something broke.");
}

#[rstest]
fn sub_code_message_replaces_a_flat_entry() {
    let table = MessageTable::builder()
        .message(FailureKind::CANNOT_DELETE, "flat")
        .sub_code_message(FailureKind::CANNOT_DELETE, SubCode::FAILED_BULK_DELETE, BULK)
        .build();

    assert_eq!(
        table.resolve(&DomainFailure::cannot_delete(SubCode::FAILED_BULK_DELETE)),
        BULK
    );
    assert_eq!(
        table.resolve(&DomainFailure::new(FailureKind::CANNOT_DELETE)),
        DEFAULT_FALLBACK_MESSAGE
    );
}

#[rstest]
fn merged_tables_replace_whole_kinds(table: MessageTable) {
    let overrides = MessageTable::builder()
        .message(FailureKind::CANNOT_DELETE, "Deletion is locked.")
        .build();
    let merged = table.merged_with(overrides);

    assert_eq!(
        merged.resolve(&DomainFailure::cannot_delete(SubCode::FAILED_BULK_DELETE)),
        "Deletion is locked."
    );
    assert_eq!(merged.resolve(&DomainFailure::cannot_toggle_status()), STATUS);
}

#[given("a message table written as JSON")]
fn a_message_table_written_as_json() -> String {
    r#"{
        "cannot-toggle-status": "An error occurred while updating the status.",
        "cannot-delete": {
            "failed-single-delete": "An error occurred while deleting the object.",
            "failed-bulk-delete": "An error occurred while deleting this selection."
        }
    }"#
    .to_owned()
}

#[when("the table is parsed")]
fn the_table_is_parsed(json: String) -> Result<MessageTable, MessageTableError> {
    MessageTable::from_json(&json)
}

#[then("it resolves like the same table built in code")]
fn it_resolves_like_the_built_table(parsed: Result<MessageTable, MessageTableError>) {
    let table = parsed.expect("table parses");
    assert_eq!(table, delete_and_status_table());
}

#[rstest]
fn parsing_a_json_table_happy_path() {
    let json = a_message_table_written_as_json();
    let parsed = the_table_is_parsed(json);
    it_resolves_like_the_built_table(parsed);
}

#[given("a message table with a numeric entry")]
fn a_message_table_with_a_numeric_entry() -> String {
    r#"{"cannot-delete": 42}"#.to_owned()
}

#[then("parsing fails with a parse error")]
fn parsing_fails_with_a_parse_error(parsed: Result<MessageTable, MessageTableError>) {
    assert!(matches!(parsed, Err(MessageTableError::Parse { .. })));
}

#[rstest]
fn parsing_a_json_table_unhappy_path() {
    let json = a_message_table_with_a_numeric_entry();
    let parsed = the_table_is_parsed(json);
    parsing_fails_with_a_parse_error(parsed);
}

#[rstest]
fn missing_file_reports_the_path() {
    let path = Path::new("/nonexistent/messages.json");
    let result = MessageTable::from_json_file(path);
    assert!(matches!(
        result,
        Err(MessageTableError::Io { path: reported, .. }) if reported == path
    ));
}
