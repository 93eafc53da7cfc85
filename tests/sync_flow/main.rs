//! End-to-end sync scenarios: independent clients converging on one remote
//! store through delta cycles and local-mutation broadcast.


use fixtures::{draft, ids, resolved_draft, Client};
use synced_rust::{
    ChangeToken, ChangeTokenStore, InMemoryRemoteStore, InMemoryTokenStore, RecordId, SyncOutcome,
};

#[test]
fn local_mutation_converges_without_a_delta_cycle() {
    let store = InMemoryRemoteStore::new();
    let mut client = Client::connect(&store);

    client.broadcaster.create(draft("r-1", "puddle")).unwrap();
    client.consume();

    assert_eq!(ids(&client.active), vec!["r-1"]);
    assert!(client.resolved.is_empty());
    // No sync() ran; the cursor is still unset.
    assert_eq!(client.tokens.load().unwrap(), None);
}

#[test]
fn remote_change_reaches_another_client_through_sync() {
    let store = InMemoryRemoteStore::new();
    let writer = Client::connect(&store);
    let mut reader = Client::connect(&store);

    writer.broadcaster.create(draft("r-1", "puddle")).unwrap();

    assert_eq!(
        reader.coordinator.sync().unwrap(),
        SyncOutcome::Applied { events: 1 }
    );
    reader.consume();

    assert_eq!(ids(&reader.active), vec!["r-1"]);
}

#[test]
fn local_and_remote_changes_share_one_stream() {
    let store = InMemoryRemoteStore::new();
    let remote_writer = Client::connect(&store);
    let mut client = Client::connect(&store);

    remote_writer
        .broadcaster
        .create(draft("remote-1", "broken step"))
        .unwrap();

    client.coordinator.sync().unwrap();
    client.broadcaster.create(draft("local-1", "loose railing")).unwrap();
    client.consume();

    let mut seen = ids(&client.active);
    seen.sort();
    assert_eq!(seen, vec!["local-1", "remote-1"]);
}

#[test]
fn resolve_moves_report_across_views_on_both_clients() {
    let store = InMemoryRemoteStore::new();
    let mut actor = Client::connect(&store);
    let mut observer = Client::connect(&store);

    actor.broadcaster.create(draft("r-1", "puddle")).unwrap();
    observer.coordinator.sync().unwrap();
    actor.consume();
    observer.consume();

    actor
        .broadcaster
        .update(resolved_draft("r-1", "puddle"))
        .unwrap();
    observer.coordinator.sync().unwrap();
    actor.consume();
    observer.consume();

    for client in [&actor, &observer] {
        assert!(client.active.is_empty());
        assert_eq!(ids(&client.resolved), vec!["r-1"]);
    }
}

#[test]
fn create_and_resolve_between_cycles_collapses_to_one_event() {
    let store = InMemoryRemoteStore::new();
    let writer = Client::connect(&store);
    let mut reader = Client::connect(&store);

    writer.broadcaster.create(draft("r-1", "puddle")).unwrap();
    writer
        .broadcaster
        .update(resolved_draft("r-1", "puddle"))
        .unwrap();

    assert_eq!(
        reader.coordinator.sync().unwrap(),
        SyncOutcome::Applied { events: 1 }
    );
    reader.consume();

    // The reader's active view never saw the report; the resolved view did.
    assert!(reader.active.is_empty());
    assert_eq!(ids(&reader.resolved), vec!["r-1"]);
}

#[test]
fn no_op_cycle_keeps_the_persisted_cursor() {
    let store = InMemoryRemoteStore::new();
    let writer = Client::connect(&store);
    let mut reader = Client::connect(&store);

    writer.broadcaster.create(draft("r-1", "puddle")).unwrap();
    reader.coordinator.sync().unwrap();
    let cursor = reader.tokens.load().unwrap();
    assert!(cursor.is_some());

    assert_eq!(reader.coordinator.sync().unwrap(), SyncOutcome::NoChanges);
    assert_eq!(reader.tokens.load().unwrap(), cursor);
}

#[test]
fn cursor_survives_restart_via_text_persistence() {
    let store = InMemoryRemoteStore::new();
    let writer = Client::connect(&store);
    let mut reader = Client::connect(&store);

    writer.broadcaster.create(draft("r-1", "puddle")).unwrap();
    reader.coordinator.sync().unwrap();

    // Persist the cursor as text, as a host settings store would.
    let persisted = reader.tokens.load().unwrap().unwrap().to_base64();

    writer.broadcaster.create(draft("r-2", "spill")).unwrap();

    // Restart: a fresh client seeded with the persisted cursor only sees r-2.
    let restored = ChangeToken::from_base64(&persisted).unwrap();
    let mut restarted =
        Client::with_tokens(&store, InMemoryTokenStore::with_token(restored));
    restarted.load_views();

    assert_eq!(
        restarted.coordinator.sync().unwrap(),
        SyncOutcome::Applied { events: 1 }
    );
    restarted.consume();
    let mut seen = ids(&restarted.active);
    seen.sort();
    assert_eq!(seen, vec!["r-1", "r-2"]);
}

#[test]
fn transport_failure_leaves_views_stale_until_recovery() {
    let store = InMemoryRemoteStore::new();
    let writer = Client::connect(&store);
    let mut reader = Client::connect(&store);

    writer.broadcaster.create(draft("r-1", "puddle")).unwrap();
    reader.coordinator.sync().unwrap();
    reader.consume();

    writer.broadcaster.create(draft("r-2", "spill")).unwrap();
    store.set_offline(true);

    assert!(reader.coordinator.sync().is_err());
    reader.consume();
    assert_eq!(ids(&reader.active), vec!["r-1"]);

    store.set_offline(false);
    reader.coordinator.sync().unwrap();
    reader.consume();
    let mut seen = ids(&reader.active);
    seen.sort();
    assert_eq!(seen, vec!["r-1", "r-2"]);
}

#[test]
fn expired_cursor_forces_full_resync_then_resumes() {
    let store = InMemoryRemoteStore::new();
    let writer = Client::connect(&store);
    let mut reader = Client::connect(&store);

    writer.broadcaster.create(draft("r-1", "puddle")).unwrap();
    reader.coordinator.sync().unwrap();
    reader.consume();

    // Changes accumulate, then the store prunes its notification history.
    writer.broadcaster.create(draft("r-2", "spill")).unwrap();
    writer.broadcaster.delete(&RecordId::from("r-1")).unwrap();
    store.expire_history();

    assert_eq!(
        reader.coordinator.sync().unwrap(),
        SyncOutcome::ResyncRequired
    );
    assert_eq!(reader.tokens.load().unwrap(), None);

    // Incremental state is discarded; a full query rebuilds the views.
    reader.load_views();
    assert_eq!(ids(&reader.active), vec!["r-2"]);

    // Subsequent incremental cycles work again.
    writer.broadcaster.create(draft("r-3", "leak")).unwrap();
    assert_eq!(
        reader.coordinator.sync().unwrap(),
        SyncOutcome::Applied { events: 1 }
    );
    reader.consume();
    let mut seen = ids(&reader.active);
    seen.sort();
    assert_eq!(seen, vec!["r-2", "r-3"]);
}

#[test]
fn deletion_converges_on_every_client() {
    let store = InMemoryRemoteStore::new();
    let mut actor = Client::connect(&store);
    let mut observer = Client::connect(&store);

    actor.broadcaster.create(draft("r-1", "puddle")).unwrap();
    actor.broadcaster.create(draft("r-2", "spill")).unwrap();
    observer.coordinator.sync().unwrap();
    actor.consume();
    observer.consume();

    actor.broadcaster.delete(&RecordId::from("r-1")).unwrap();
    observer.coordinator.sync().unwrap();
    actor.consume();
    observer.consume();

    assert_eq!(ids(&actor.active), vec!["r-2"]);
    assert_eq!(ids(&observer.active), vec!["r-2"]);
    assert!(!store.contains(&RecordId::from("r-1")));
}
