//! Public API tests over the in-memory source
//!
//! Walks whole collections page by page the way a caller would, following
//! the returned cursors.

use pretty_assertions::assert_eq;
use seekpage::listing::{list_cursor, ListingConfig};
use seekpage::pagination::{
    build_paginator, PaginateArgs, PaginationOptions, PaginatorConfig, PagingQuery,
};
use seekpage::source::MemorySource;
use seekpage::{Cursor, Error, Filter, Paginator, SortOrder};
use serde_json::{json, Value};
use test_case::test_case;

fn posts() -> MemorySource {
    (1..=12)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("post {i}"),
                "published": i % 3 != 0,
                "author": {"id": 100 + i % 2, "name": "someone"},
                "tags": [{"name": "rust"}],
            })
        })
        .collect()
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

/// Follow after cursors until exhausted
async fn walk_forward(source: &MemorySource, limit: usize, order: SortOrder) -> Vec<Vec<i64>> {
    let mut pages = Vec::new();
    let mut query = PagingQuery::first(limit).with_order(order);
    loop {
        let result = build_paginator(PaginationOptions::new(query))
            .unwrap()
            .paginate(source, PaginateArgs::new(Filter::new()))
            .await
            .unwrap();
        pages.push(ids(&result.data));
        match result.cursor.after_cursor {
            Some(after) => query = PagingQuery::after(after, limit).with_order(order),
            None => return pages,
        }
    }
}

#[test_case(SortOrder::Asc, 5, vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10], vec![11, 12]] ; "asc by five")]
#[test_case(SortOrder::Desc, 5, vec![vec![12, 11, 10, 9, 8], vec![7, 6, 5, 4, 3], vec![2, 1]] ; "desc by five")]
#[test_case(SortOrder::Asc, 12, vec![(1..=12).collect()] ; "single full page")]
#[test_case(SortOrder::Asc, 6, vec![(1..=6).collect(), (7..=12).collect()] ; "exact multiple")]
#[tokio::test]
async fn test_forward_walk_visits_everything_once(
    order: SortOrder,
    limit: usize,
    expected: Vec<Vec<i64>>,
) {
    assert_eq!(walk_forward(&posts(), limit, order).await, expected);
}

#[tokio::test]
async fn test_backward_walk_mirrors_forward_walk() {
    let source = posts();

    // Jump to the last page, then walk back with before cursors
    let mut query = PagingQuery::first(5).with_order(SortOrder::Asc);
    let mut last = None;
    loop {
        let result = build_paginator(PaginationOptions::new(query))
            .unwrap()
            .paginate(&source, PaginateArgs::new(Filter::new()))
            .await
            .unwrap();
        match result.cursor.after_cursor.clone() {
            Some(after) => query = PagingQuery::after(after, 5).with_order(SortOrder::Asc),
            None => {
                last = Some(result);
                break;
            }
        }
    }

    let mut pages = Vec::new();
    let mut current = last.unwrap();
    pages.push(ids(&current.data));
    while let Some(before) = current.cursor.before_cursor.clone() {
        current = build_paginator(PaginationOptions::new(
            PagingQuery::before(before, 5).with_order(SortOrder::Asc),
        ))
        .unwrap()
        .paginate(&source, PaginateArgs::new(Filter::new()))
        .await
        .unwrap();
        pages.push(ids(&current.data));
    }

    assert_eq!(
        pages,
        vec![vec![11, 12], vec![6, 7, 8, 9, 10], vec![1, 2, 3, 4, 5]]
    );
}

#[tokio::test]
async fn test_relations_and_projections() {
    let source = posts();
    let config = PaginatorConfig {
        limit: 2,
        order: SortOrder::Asc,
        ..Default::default()
    };

    let bare = Paginator::with_config(config.clone())
        .unwrap()
        .paginate(&source, PaginateArgs::new(Filter::new()))
        .await
        .unwrap();
    assert_eq!(
        bare.data[0],
        json!({"id": 1, "title": "post 1", "published": true})
    );

    let included = Paginator::with_config(config.clone())
        .unwrap()
        .paginate(&source, PaginateArgs::new(Filter::new()).include(["author"]))
        .await
        .unwrap();
    assert_eq!(included.data[0]["author"], json!({"id": 101, "name": "someone"}));
    assert!(included.data[0].get("tags").is_none());

    let selected = Paginator::with_config(config)
        .unwrap()
        .paginate(&source, PaginateArgs::new(Filter::new()).select(["title"]))
        .await
        .unwrap();
    assert_eq!(selected.data[1], json!({"id": 2, "title": "post 2"}));
    assert_eq!(
        Cursor::decode(selected.cursor.after_cursor.as_ref().unwrap())
            .unwrap()
            .value,
        json!(2)
    );
}

#[tokio::test]
async fn test_per_call_order_overrides_configured_order() {
    let source = posts();
    let result = build_paginator(PaginationOptions::new(PagingQuery::first(3)))
        .unwrap()
        .paginate(
            &source,
            PaginateArgs::new(Filter::new()).order(SortOrder::Asc),
        )
        .await
        .unwrap();
    assert_eq!(ids(&result.data), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_listing_over_published_posts() {
    let source = posts();
    let config = ListingConfig {
        default_order: SortOrder::Asc,
        ..Default::default()
    };

    let first = list_cursor(
        &source,
        &config,
        &PagingQuery::first(4),
        Filter::new().eq("published", true),
        None,
    )
    .await
    .unwrap();
    assert_eq!(ids(&first.data), vec![1, 2, 4, 5]);
    assert_eq!(first.pagination.total_records, 8);

    let second = list_cursor(
        &source,
        &config,
        &PagingQuery {
            after_cursor: first.pagination.after_cursor.clone(),
            ..Default::default()
        },
        Filter::new().eq("published", true),
        None,
    )
    .await
    .unwrap();
    assert_eq!(ids(&second.data), vec![7, 8, 10, 11]);
    assert_eq!(second.pagination.limit, 10);
    assert_eq!(second.pagination.after_cursor, None);
    assert!(second.pagination.before_cursor.is_some());
}

#[tokio::test]
async fn test_request_errors_are_client_errors() {
    let wrong_key = Cursor::new("title", "post 3").encode().unwrap();
    let err = build_paginator(PaginationOptions::new(PagingQuery::after(wrong_key, 5)))
        .unwrap_err();
    assert!(matches!(err, Error::CursorKeyMismatch { .. }));
    assert!(err.is_client_error());

    let conflicting = PagingQuery {
        after_cursor: Some(Cursor::new("id", 1).encode().unwrap()),
        before_cursor: Some(Cursor::new("id", 9).encode().unwrap()),
        ..Default::default()
    };
    let err = build_paginator(PaginationOptions::new(conflicting)).unwrap_err();
    assert!(matches!(err, Error::ConflictingCursors));
}
