//! Integration tests for alias-key convergence across the facade.
//!
//! These tests verify:
//! 1. A record fetched under one identity is a cache hit under its others
//! 2. Proxy alias sets grow as identities are learned, matching what the
//!    same queries would derive
//! 3. Request scope participates in the identity, so scope changes miss

mod common;

use common::test_catalog;
use rift_client::attrs;
use rift_client::staticdata::{Item, ITEM};
use rift_client::summoner::Summoner;
use rift_client::{derive_from_query, Query};
use std::collections::BTreeSet;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_item_by_id_then_by_name_shares_the_cache_entry() {
    let catalog = test_catalog();

    let boots = Item::with_id(1001).get(&catalog.ctx).expect("seed");
    assert_eq!(
        boots.name().await.expect("name"),
        Some("Boots of Speed".to_owned())
    );
    assert_eq!(catalog.item_fetches.load(Ordering::SeqCst), 1);

    // Same item, different identity: the stored aliases cover it.
    let by_name = Item::named("Boots of Speed").get(&catalog.ctx).expect("seed");
    assert_eq!(by_name.id().await.expect("id"), 1001);
    assert!(by_name.exists().await.expect("exists"));
    assert_eq!(catalog.item_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_summoner_identities_converge_on_one_fetch() {
    let catalog = test_catalog();

    let by_id = Summoner::with_id(22_508_641).get(&catalog.ctx).expect("seed");
    assert_eq!(by_id.level().await.expect("level"), 30);
    assert_eq!(catalog.summoner_fetches.load(Ordering::SeqCst), 1);

    let by_name = Summoner::named("FatalElement").get(&catalog.ctx).expect("seed");
    assert!(by_name.exists().await.expect("exists"));

    let by_account = Summoner::with_account_id(36_321_079)
        .get(&catalog.ctx)
        .expect("seed");
    assert_eq!(
        by_account.name().await.expect("name"),
        Some("FatalElement".to_owned())
    );

    assert_eq!(catalog.summoner_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_proxy_alias_keys_match_query_derivation() {
    let catalog = test_catalog();
    let boots = Item::with_id(1001).get(&catalog.ctx).expect("seed");

    // Before loading, only the id identity is known.
    assert_eq!(boots.alias_keys().expect("keys").len(), 1);

    assert_eq!(
        boots.name().await.expect("name"),
        Some("Boots of Speed".to_owned())
    );
    let keys = boots.alias_keys().expect("keys");
    assert_eq!(keys.len(), 2);

    let scope = |builder: rift_client::QueryBuilder| {
        builder
            .attr(attrs::PLATFORM, "NA1")
            .attr(attrs::VERSION, "7.24.2")
            .attr(attrs::LOCALE, "en_US")
            .attr(attrs::INCLUDED_DATA, BTreeSet::from(["all".to_owned()]))
            .build()
    };
    let id_query = scope(Query::builder().attr(attrs::ID, 1001i64));
    let name_query = scope(Query::builder().attr(attrs::NAME, "Boots of Speed"));

    let id_key = derive_from_query(&ITEM, &id_query).expect("derive");
    let name_key = derive_from_query(&ITEM, &name_query).expect("derive");
    assert!(keys.contains(&id_key));
    assert!(keys.contains(&name_key));
}

#[tokio::test]
async fn test_scope_change_is_a_different_cache_entry() {
    let catalog = test_catalog();

    let en = Item::with_id(1001).get(&catalog.ctx).expect("seed");
    en.name().await.expect("name");
    assert_eq!(catalog.item_fetches.load(Ordering::SeqCst), 1);

    let ru = Item::with_id(1001)
        .locale("ru_RU")
        .get(&catalog.ctx)
        .expect("seed");
    ru.name().await.expect("name");
    assert_eq!(catalog.item_fetches.load(Ordering::SeqCst), 2);

    // Back on the default scope: still cached.
    let again = Item::with_id(1001).get(&catalog.ctx).expect("seed");
    again.description().await.expect("description");
    assert_eq!(catalog.item_fetches.load(Ordering::SeqCst), 2);
}
