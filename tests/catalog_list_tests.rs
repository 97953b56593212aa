//! Integration tests for the full-catalog champion list.
//!
//! These tests verify:
//! 1. The list is itself a ghost: one fetch for the whole catalog
//! 2. Members come back as pre-loaded champion proxies inheriting the
//!    list's request scope
//! 3. Every discriminator, including the id-indexing flag, scopes the
//!    cached list

mod common;

use common::test_catalog;
use rift_client::attrs::groups;
use rift_client::staticdata::Champions;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_catalog_loads_once_and_premarks_children() {
    let catalog = test_catalog();
    let all = Champions::builder().get(&catalog.ctx).expect("seed");

    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 0);
    let members = all.champions().await.expect("champions");
    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(members.len(), 3);

    // Children are fully usable without any further upstream traffic.
    for member in members.iter() {
        assert!(member.is_loaded(groups::CHAMPION));
        assert!(member.name().await.expect("name").is_some());
        assert_eq!(member.platform(), Some("NA1".to_owned()));
        assert_eq!(member.locale(), Some("en_US".to_owned()));
    }
    assert_eq!(catalog.champion_fetches.load(Ordering::SeqCst), 0);

    assert!(all.exists().await.expect("exists"));
    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_member_list_is_memoized_per_proxy() {
    let catalog = test_catalog();
    let all = Champions::builder().get(&catalog.ctx).expect("seed");

    let first = all.champions().await.expect("champions");
    let second = all.champions().await.expect("champions");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_children_still_load_their_other_groups() {
    let catalog = test_catalog();
    let all = Champions::builder().get(&catalog.ctx).expect("seed");

    let members = all.champions().await.expect("champions");
    let annie = members
        .iter()
        .find(|c| c.is_loaded(groups::CHAMPION))
        .expect("non-empty roster")
        .clone();

    // Rotation was never part of the list payload.
    assert!(!annie.is_loaded(groups::ROTATION));
    annie.free_to_play().await.expect("rotation");
    assert_eq!(catalog.rotation_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.champion_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_second_proxy_hits_the_cached_list() {
    let catalog = test_catalog();

    let first = Champions::builder().get(&catalog.ctx).expect("seed");
    first.champions().await.expect("champions");

    let second = Champions::builder().get(&catalog.ctx).expect("seed");
    second.champions().await.expect("champions");
    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_id_indexing_flag_scopes_the_list() {
    let catalog = test_catalog();

    let by_name = Champions::builder().get(&catalog.ctx).expect("seed");
    by_name.champions().await.expect("champions");

    let by_id = Champions::builder()
        .indexed_by_id(true)
        .get(&catalog.ctx)
        .expect("seed");
    by_id.champions().await.expect("champions");

    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_scope_override_scopes_the_list() {
    let catalog = test_catalog();

    let na = Champions::builder().get(&catalog.ctx).expect("seed");
    na.champions().await.expect("champions");

    let euw = Champions::builder()
        .platform("EUW1")
        .get(&catalog.ctx)
        .expect("seed");
    euw.champions().await.expect("champions");
    assert_eq!(euw.platform(), Some("EUW1".to_owned()));

    assert_eq!(catalog.list_fetches.load(Ordering::SeqCst), 2);
}
