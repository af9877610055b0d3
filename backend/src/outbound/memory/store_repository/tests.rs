//! Tests for the in-memory store table.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::grid::FilterSpec;
use crate::domain::store::store_grid;

fn id(raw: u64) -> EntityId {
    EntityId::new(raw).expect("non-zero id")
}

fn store(raw: u64, name: &str, city: &str, active: bool) -> Store {
    Store {
        id: id(raw),
        name: name.to_owned(),
        address: format!("{raw} High Street"),
        city: city.to_owned(),
        postcode: format!("P{raw:03}"),
        country: "United Kingdom".to_owned(),
        phone: String::new(),
        email: format!("store{raw}@example.com"),
        active,
    }
}

#[fixture]
fn repository() -> InMemoryStoreRepository {
    InMemoryStoreRepository::new([
        store(1, "Harbour", "Bristol", true),
        store(2, "Arcade", "Leeds", false),
        store(3, "Market", "bristol", true),
    ])
    .refusing_delete(id(2), "has pending orders")
    .locking_status(id(3), "managed by head office")
}

fn query(spec: FilterSpec) -> GridQuery {
    store_grid().query_for(&spec)
}

fn first_page() -> FilterSpec {
    FilterSpec::first_page(10).expect("valid page size")
}

fn names(rows: &[Store]) -> Vec<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_and_refused_stores(repository: InMemoryStoreRepository) {
    assert_eq!(
        repository.delete(id(9)).await,
        Err(StoreRepositoryError::not_found(id(9)))
    );
    assert_eq!(
        repository.delete(id(2)).await,
        Err(StoreRepositoryError::rejected(id(2), "has pending orders"))
    );

    repository.delete(id(1)).await.expect("delete succeeds");
    assert_eq!(repository.find_by_id(id(1)).await.expect("lookup"), None);
}

#[rstest]
#[tokio::test]
async fn set_status_many_changes_nothing_when_one_store_refuses(
    repository: InMemoryStoreRepository,
) {
    let ids = IdentitySet::try_from_ids([id(1), id(2), id(3)]).expect("valid selection");

    let err = repository
        .set_status_many(&ids, false)
        .await
        .expect_err("locked store refuses");

    assert_eq!(
        err,
        StoreRepositoryError::rejected(id(3), "managed by head office")
    );
    let active: Vec<bool> = repository
        .snapshot()
        .await
        .iter()
        .map(|row| row.active)
        .collect();
    assert_eq!(active, vec![true, false, true]);
}

#[rstest]
#[tokio::test]
async fn set_status_many_applies_to_every_store(repository: InMemoryStoreRepository) {
    let ids = IdentitySet::try_from_ids([id(1), id(2)]).expect("valid selection");

    repository
        .set_status_many(&ids, true)
        .await
        .expect("update succeeds");

    let stored = repository.snapshot().await;
    assert!(stored.iter().take(2).all(|row| row.active));
}

#[rstest]
#[tokio::test]
async fn text_filters_ignore_case(repository: InMemoryStoreRepository) {
    let query = query(first_page().with_filter("city", "BRISTOL"));

    let rows = repository.fetch_page(&query).await.expect("rows");

    assert_eq!(names(&rows), vec!["Harbour", "Market"]);
    assert_eq!(repository.count_matching(&query).await.expect("count"), 2);
}

#[rstest]
#[case("1", vec!["Harbour", "Market"])]
#[case("no", vec!["Arcade"])]
#[case("maybe", vec![])]
#[tokio::test]
async fn active_filter_parses_flags(
    repository: InMemoryStoreRepository,
    #[case] value: &str,
    #[case] expected: Vec<&str>,
) {
    let rows = repository
        .fetch_page(&query(first_page().with_filter("active", value)))
        .await
        .expect("rows");

    assert_eq!(names(&rows), expected);
}

#[rstest]
#[tokio::test]
async fn search_spans_text_columns(repository: InMemoryStoreRepository) {
    let rows = repository
        .fetch_page(&query(first_page().with_search("store2@")))
        .await
        .expect("rows");

    assert_eq!(names(&rows), vec!["Arcade"]);
}

#[rstest]
#[tokio::test]
async fn sorts_then_pages(repository: InMemoryStoreRepository) {
    let spec = FilterSpec::first_page(2)
        .expect("valid page size")
        .sorted_by("name", SortDirection::Desc);

    let rows = repository.fetch_page(&query(spec)).await.expect("rows");

    assert_eq!(names(&rows), vec!["Market", "Harbour"]);
}

#[rstest]
#[tokio::test]
async fn offset_skips_earlier_rows(repository: InMemoryStoreRepository) {
    let mut query = query(first_page());
    query.offset = 2;

    let rows = repository.fetch_page(&query).await.expect("rows");

    assert_eq!(names(&rows), vec!["Market"]);
}
