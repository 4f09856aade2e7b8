//! Database integration tests against DuckDB files
//!
//! Each test builds a throwaway database in a temp directory.

use duckdb::Connection;
use pretty_assertions::assert_eq;
use seekpage::database::DuckDbSource;
use seekpage::offset::{paginate_offset, OffsetArgs, PageOptions};
use seekpage::pagination::{build_paginator, PaginateArgs, PaginationOptions, PagingQuery};
use seekpage::source::DataSource;
use seekpage::users::UserRepository;
use seekpage::{Cursor, Error, Filter, SortOrder};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a database file from a setup script
fn create_database(dir: &TempDir, setup: &str) -> PathBuf {
    let path = dir.path().join("test.duckdb");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(setup).unwrap();
    path
}

/// Items 1..=25; every fifth one archived
fn items_db(dir: &TempDir) -> DuckDbSource {
    let path = create_database(
        dir,
        "CREATE TABLE items (id INTEGER PRIMARY KEY, name VARCHAR, archived BOOLEAN);
         INSERT INTO items
         SELECT i, 'item-' || CAST(i AS VARCHAR), i % 5 = 0 FROM range(1, 26) t(i);",
    );
    DuckDbSource::open(&path, "items").unwrap()
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

async fn page(source: &DuckDbSource, query: PagingQuery) -> seekpage::PagingResult<Value> {
    build_paginator(PaginationOptions::new(query))
        .unwrap()
        .paginate(source, PaginateArgs::new(Filter::new()))
        .await
        .unwrap()
}

// ============================================================================
// Cursor Pagination
// ============================================================================

#[tokio::test]
async fn test_twenty_five_rows_forward_and_back() {
    let dir = TempDir::new().unwrap();
    let source = items_db(&dir);

    let first = page(&source, PagingQuery::first(10).with_order(SortOrder::Asc)).await;
    assert_eq!(ids(&first.data), (1..=10).collect::<Vec<_>>());
    assert_eq!(first.cursor.before_cursor, None);

    let second = page(
        &source,
        PagingQuery::after(first.cursor.after_cursor.clone().unwrap(), 10)
            .with_order(SortOrder::Asc),
    )
    .await;
    assert_eq!(ids(&second.data), (11..=20).collect::<Vec<_>>());

    let third = page(
        &source,
        PagingQuery::after(second.cursor.after_cursor.clone().unwrap(), 10)
            .with_order(SortOrder::Asc),
    )
    .await;
    assert_eq!(ids(&third.data), (21..=25).collect::<Vec<_>>());
    assert_eq!(third.cursor.after_cursor, None);

    let back = page(
        &source,
        PagingQuery::before(second.cursor.before_cursor.clone().unwrap(), 10)
            .with_order(SortOrder::Asc),
    )
    .await;
    assert_eq!(ids(&back.data), (1..=10).collect::<Vec<_>>());
    assert_eq!(back.cursor.before_cursor, None);
    assert_eq!(
        Cursor::decode(back.cursor.after_cursor.as_ref().unwrap())
            .unwrap()
            .value,
        json!(10)
    );
}

#[tokio::test]
async fn test_descending_walk_with_filter_and_select() {
    let dir = TempDir::new().unwrap();
    let source = items_db(&dir);

    let paginator = build_paginator(PaginationOptions::new(PagingQuery::first(4))).unwrap();
    let result = paginator
        .paginate(
            &source,
            PaginateArgs::new(Filter::new().eq("archived", false)).select(["name"]),
        )
        .await
        .unwrap();

    assert_eq!(ids(&result.data), vec![24, 23, 22, 21]);
    assert_eq!(result.data[0], json!({"id": 24, "name": "item-24"}));
    assert!(result.has_next());
    assert!(!result.has_previous());

    let paginator = build_paginator(PaginationOptions::new(PagingQuery::after(
        result.cursor.after_cursor.unwrap(),
        4,
    )))
    .unwrap();
    let next = paginator
        .paginate(&source, PaginateArgs::new(Filter::new().eq("archived", false)))
        .await
        .unwrap();
    assert_eq!(ids(&next.data), vec![19, 18, 17, 16]);
}

#[tokio::test]
async fn test_cursor_row_deleted_between_requests() {
    let dir = TempDir::new().unwrap();
    let path = create_database(
        &dir,
        "CREATE TABLE items (id INTEGER);
         INSERT INTO items SELECT i FROM range(1, 11) t(i);",
    );

    let source = DuckDbSource::open(&path, "items").unwrap();
    let first = page(&source, PagingQuery::first(3).with_order(SortOrder::Asc)).await;
    assert_eq!(ids(&first.data), vec![1, 2, 3]);
    drop(source);

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("DELETE FROM items WHERE id = 3;").unwrap();
    let source = DuckDbSource::from_connection(conn, "items").unwrap();

    let next = page(
        &source,
        PagingQuery::after(first.cursor.after_cursor.unwrap(), 3).with_order(SortOrder::Asc),
    )
    .await;
    assert_eq!(ids(&next.data), vec![4, 5, 6]);
}

#[tokio::test]
async fn test_empty_table() {
    let dir = TempDir::new().unwrap();
    let path = create_database(&dir, "CREATE TABLE items (id INTEGER);");
    let source = DuckDbSource::open(&path, "items").unwrap();

    let result = page(&source, PagingQuery::first(10)).await;
    assert!(result.data.is_empty());
    assert_eq!(result.cursor.after_cursor, None);
    assert_eq!(result.cursor.before_cursor, None);
}

#[tokio::test]
async fn test_unknown_key_column_is_config_error() {
    let dir = TempDir::new().unwrap();
    let source = items_db(&dir);

    let err = build_paginator(PaginationOptions::new(PagingQuery::first(5)).with_key("nope"))
        .unwrap()
        .paginate(&source, PaginateArgs::new(Filter::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(!err.is_client_error());
}

// ============================================================================
// Offset Pagination and Counts
// ============================================================================

#[tokio::test]
async fn test_offset_pages_and_count() {
    let dir = TempDir::new().unwrap();
    let source = items_db(&dir);

    assert_eq!(source.count(&Filter::new()).await.unwrap(), 25);
    assert_eq!(
        source
            .count(&Filter::new().eq("archived", true))
            .await
            .unwrap(),
        5
    );

    let result = paginate_offset(
        &source,
        &PageOptions::new(2, 8).unwrap(),
        OffsetArgs::new(Filter::new().eq("archived", false)).order_by("id", SortOrder::Asc),
    )
    .await
    .unwrap();

    assert_eq!(ids(&result.data), vec![11, 12, 13, 14, 16, 17, 18, 19]);
    assert_eq!(result.pagination.total_records, Some(20));
    assert_eq!(result.pagination.total_pages, Some(3));
    assert_eq!(result.pagination.next_page, Some(3));
    assert_eq!(result.pagination.previous_page, Some(1));
}

#[test]
fn test_open_missing_file() {
    let err = DuckDbSource::open("/definitely/not/here.duckdb", "items").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

// ============================================================================
// Users Table
// ============================================================================

#[tokio::test]
async fn test_user_repository_on_duckdb() {
    let dir = TempDir::new().unwrap();
    let path = create_database(
        &dir,
        "CREATE TABLE users (
            id VARCHAR PRIMARY KEY,
            username VARCHAR NOT NULL,
            email VARCHAR NOT NULL,
            first_name VARCHAR,
            last_name VARCHAR,
            image VARCHAR,
            bio VARCHAR,
            role VARCHAR NOT NULL,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL,
            deleted_at TIMESTAMP
         );
         INSERT INTO users
         SELECT
            'u' || lpad(CAST(i AS VARCHAR), 3, '0'),
            'user' || CAST(i AS VARCHAR),
            'user' || CAST(i AS VARCHAR) || '@example.com',
            NULL, NULL, NULL, NULL,
            CASE WHEN i = 1 THEN 'admin' ELSE 'user' END,
            TIMESTAMP '2024-01-01 00:00:00' + to_days(CAST(i AS INTEGER)),
            TIMESTAMP '2024-02-01 00:00:00',
            CASE WHEN i = 4 THEN TIMESTAMP '2024-03-01 00:00:00' ELSE NULL END
         FROM range(1, 8) t(i);",
    );
    let repo = UserRepository::new(DuckDbSource::open(&path, "users").unwrap());

    assert_eq!(repo.count().await.unwrap(), 6);

    let admin = repo
        .find_by_email("user1@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.id, "u001");
    assert_eq!(admin.role, seekpage::users::Role::Admin);
    assert_eq!(admin.created_at.to_rfc3339(), "2024-01-02T00:00:00+00:00");

    let deleted = repo.find_by_id("u004").await.unwrap().unwrap();
    assert!(deleted.is_deleted());

    let newest = repo.find_all(1, 3).await.unwrap();
    let newest_ids: Vec<&str> = newest.data.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(newest_ids, vec!["u007", "u006", "u005"]);
    assert_eq!(newest.pagination.total_pages, Some(2));

    let listing = repo
        .find_all_cursor(&PagingQuery::first(4).with_order(SortOrder::Asc))
        .await
        .unwrap();
    let listed: Vec<&str> = listing.data.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(listed, vec!["u001", "u002", "u003", "u005"]);
    assert_eq!(listing.pagination.total_records, 6);
}
