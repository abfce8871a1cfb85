//! Trait-level tests run against both store implementations.

use xid_core::domain::SignerScope;
use xid_core::foundation::Name;
use xid_core::infrastructure::storage::{MemoryStateStore, RocksStateStore, StateStore};

fn with_each_store(test: impl Fn(&dyn StateStore)) {
    test(&MemoryStateStore::new());

    let dir = tempfile::tempdir().expect("tempdir");
    test(&RocksStateStore::open(dir.path()).expect("open rocksdb"));
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn replace_signers_is_local_to_its_scope() {
    with_each_store(|store| {
        let domob = Name::from("domob");
        let other = Name::from("other");
        store.replace_signers(&domob, &SignerScope::Global, &strings(&["g"])).expect("replace");
        store.replace_signers(&domob, &SignerScope::app("app"), &strings(&["a"])).expect("replace");
        store.replace_signers(&other, &SignerScope::app("app"), &strings(&["o"])).expect("replace");
        store.upsert_address(&domob, "btc", "1domob").expect("upsert");

        store.replace_signers(&domob, &SignerScope::app("app"), &strings(&["new"])).expect("replace");

        assert_eq!(
            store.signers_for(&domob).expect("signers_for"),
            vec![(SignerScope::Global, "g".to_string()), (SignerScope::app("app"), "new".to_string())]
        );
        assert_eq!(store.signers_for(&other).expect("signers_for"), vec![(SignerScope::app("app"), "o".to_string())]);
        assert_eq!(store.addresses_for(&domob).expect("addresses_for"), vec![("btc".to_string(), "1domob".to_string())]);
    });
}

#[test]
fn replace_signers_deduplicates() {
    with_each_store(|store| {
        let name = Name::from("domob");
        store.replace_signers(&name, &SignerScope::Global, &strings(&["x", "y", "x"])).expect("replace");
        assert_eq!(
            store.signers_for(&name).expect("signers_for"),
            vec![(SignerScope::Global, "x".to_string()), (SignerScope::Global, "y".to_string())]
        );
    });
}

#[test]
fn empty_replacement_clears_the_scope() {
    with_each_store(|store| {
        let name = Name::from("domob");
        store.replace_signers(&name, &SignerScope::Global, &strings(&["x"])).expect("replace");
        store.replace_signers(&name, &SignerScope::Global, &[]).expect("clear");
        assert!(store.signers_for(&name).expect("signers_for").is_empty());
        assert!(store.all_names().expect("all_names").is_empty());
    });
}

#[test]
fn address_updates_are_per_key() {
    with_each_store(|store| {
        let name = Name::from("domob");
        store.upsert_address(&name, "btc", "first").expect("upsert");
        store.upsert_address(&name, "chi", "C1").expect("upsert");
        store.upsert_address(&name, "btc", "second").expect("upsert");
        store.delete_address(&name, "chi").expect("delete");

        assert_eq!(store.addresses_for(&name).expect("addresses_for"), vec![("btc".to_string(), "second".to_string())]);
    });
}

#[test]
fn deleting_an_absent_address_is_a_noop() {
    with_each_store(|store| {
        let name = Name::from("domob");
        store.delete_address(&name, "nothing").expect("delete");
        assert!(store.addresses_for(&name).expect("addresses_for").is_empty());
    });
}

#[test]
fn scopes_for_reports_every_matching_scope() {
    with_each_store(|store| {
        let name = Name::from("domob");
        store.replace_signers(&name, &SignerScope::Global, &strings(&["addr"])).expect("replace");
        store.replace_signers(&name, &SignerScope::app("app"), &strings(&["addr", "other"])).expect("replace");
        store.replace_signers(&name, &SignerScope::app("unrelated"), &strings(&["other"])).expect("replace");

        assert_eq!(
            store.scopes_for(&name, "addr").expect("scopes_for"),
            vec![SignerScope::Global, SignerScope::app("app")]
        );
        assert!(store.scopes_for(&Name::from("other"), "addr").expect("scopes_for").is_empty());
    });
}

#[test]
fn all_names_unions_both_relations() {
    with_each_store(|store| {
        store.replace_signers(&Name::from("bbb"), &SignerScope::Global, &strings(&["x"])).expect("replace");
        store.upsert_address(&Name::from("aaa"), "btc", "1").expect("upsert");
        store.upsert_address(&Name::from("bbb"), "btc", "2").expect("upsert");

        assert_eq!(store.all_names().expect("all_names"), vec![Name::from("aaa"), Name::from("bbb")]);
    });
}

#[test]
fn names_with_separator_bytes_do_not_collide() {
    // Composite keys must keep (name="ab", key="c") distinct from
    // (name="a", key="bc"), and similarly for applications.
    with_each_store(|store| {
        store.upsert_address(&Name::from("ab"), "c", "one").expect("upsert");
        store.upsert_address(&Name::from("a"), "bc", "two").expect("upsert");

        assert_eq!(store.addresses_for(&Name::from("ab")).expect("addresses_for"), vec![("c".to_string(), "one".to_string())]);
        assert_eq!(store.addresses_for(&Name::from("a")).expect("addresses_for"), vec![("bc".to_string(), "two".to_string())]);

        store.replace_signers(&Name::from("x:y"), &SignerScope::app("z"), &strings(&["s1"])).expect("replace");
        store.replace_signers(&Name::from("x"), &SignerScope::app("y:z"), &strings(&["s2"])).expect("replace");

        assert_eq!(store.signers_for(&Name::from("x:y")).expect("signers_for"), vec![(SignerScope::app("z"), "s1".to_string())]);
        assert_eq!(store.signers_for(&Name::from("x")).expect("signers_for"), vec![(SignerScope::app("y:z"), "s2".to_string())]);
    });
}

#[test]
fn applications_sharing_a_prefix_stay_separate() {
    with_each_store(|store| {
        let name = Name::from("domob");
        store.replace_signers(&name, &SignerScope::app("a"), &strings(&["one"])).expect("replace");
        store.replace_signers(&name, &SignerScope::app("ab"), &strings(&["two"])).expect("replace");

        store.replace_signers(&name, &SignerScope::app("a"), &[]).expect("clear");
        assert_eq!(store.signers_for(&name).expect("signers_for"), vec![(SignerScope::app("ab"), "two".to_string())]);
    });
}

#[test]
fn rocks_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let name = Name::from("domob");
    {
        let store = RocksStateStore::open(dir.path()).expect("open rocksdb");
        store.replace_signers(&name, &SignerScope::Global, &strings(&["addr"])).expect("replace");
        store.upsert_address(&name, "btc", "1domob").expect("upsert");
    }

    let store = RocksStateStore::open(dir.path()).expect("reopen rocksdb");
    assert_eq!(store.signers_for(&name).expect("signers_for"), vec![(SignerScope::Global, "addr".to_string())]);
    assert_eq!(store.addresses_for(&name).expect("addresses_for"), vec![("btc".to_string(), "1domob".to_string())]);
}
