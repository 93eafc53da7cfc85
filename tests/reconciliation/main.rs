//! Reconciliation scenarios: applying shared change batches to independent
//! filtered views.


use fixtures::{active_view, ids, report, resolved_view};
use synced_rust::{ChangeEvent, RecordId};

#[test]
fn created_report_appears_in_active_view_only() {
    let mut active = active_view();
    let mut resolved = resolved_view();

    let batch = vec![ChangeEvent::Created(report("r-1", false, 10, 10))];
    active.apply(&batch);
    resolved.apply(&batch);

    assert_eq!(ids(&active), vec!["r-1"]);
    assert!(resolved.is_empty());
}

#[test]
fn resolving_a_report_moves_it_between_views() {
    let mut active = active_view();
    let mut resolved = resolved_view();

    let created = vec![ChangeEvent::Created(report("r-1", false, 10, 10))];
    active.apply(&created);
    resolved.apply(&created);

    let resolved_now = vec![ChangeEvent::Updated(report("r-1", true, 10, 50))];
    active.apply(&resolved_now);
    resolved.apply(&resolved_now);

    assert!(active.is_empty());
    assert_eq!(ids(&resolved), vec!["r-1"]);
}

#[test]
fn deletion_removes_from_whichever_view_holds_it() {
    let mut active = active_view();
    active.populate(vec![
        report("r-1", false, 10, 10),
        report("r-2", false, 20, 20),
    ]);

    let batch = vec![ChangeEvent::Deleted(RecordId::from("r-1"))];
    active.apply(&batch);
    assert_eq!(ids(&active), vec!["r-2"]);

    // Redelivery of the same deletion is harmless.
    active.apply(&batch);
    assert_eq!(ids(&active), vec!["r-2"]);
}

#[test]
fn batch_redelivery_is_idempotent_across_views() {
    let batch = vec![
        ChangeEvent::Created(report("new", false, 40, 40)),
        ChangeEvent::Updated(report("resolved-now", true, 10, 50)),
        ChangeEvent::Deleted(RecordId::from("gone")),
    ];

    let mut active = active_view();
    let mut resolved = resolved_view();
    active.populate(vec![
        report("resolved-now", false, 10, 10),
        report("gone", false, 20, 20),
        report("untouched", false, 30, 30),
    ]);
    resolved.populate(vec![report("already-done", true, 5, 25)]);

    active.apply(&batch);
    resolved.apply(&batch);
    let active_once = ids(&active);
    let resolved_once = ids(&resolved);

    active.apply(&batch);
    resolved.apply(&batch);

    assert_eq!(ids(&active), active_once);
    assert_eq!(ids(&resolved), resolved_once);
    assert_eq!(active_once, vec!["untouched", "new"]);
    assert_eq!(resolved_once, vec!["resolved-now", "already-done"]);
}

#[test]
fn active_view_keeps_creation_order() {
    let mut active = active_view();
    active.apply(&[
        ChangeEvent::Created(report("c", false, 30, 30)),
        ChangeEvent::Created(report("a", false, 10, 10)),
        ChangeEvent::Created(report("b", false, 20, 20)),
    ]);

    assert_eq!(ids(&active), vec!["a", "b", "c"]);
}

#[test]
fn resolved_view_keeps_most_recent_first() {
    let mut resolved = resolved_view();
    resolved.apply(&[
        ChangeEvent::Updated(report("stale", true, 10, 40)),
        ChangeEvent::Updated(report("fresh", true, 20, 90)),
        ChangeEvent::Updated(report("middle", true, 30, 60)),
    ]);

    assert_eq!(ids(&resolved), vec!["fresh", "middle", "stale"]);
}

#[test]
fn every_survivor_satisfies_the_view_filter() {
    let mut active = active_view();
    active.populate(vec![
        report("r-1", false, 10, 10),
        report("r-2", false, 20, 20),
        report("r-3", false, 30, 30),
    ]);

    active.apply(&[
        ChangeEvent::Updated(report("r-1", true, 10, 50)),
        ChangeEvent::Updated(report("r-2", false, 20, 60)),
        ChangeEvent::Created(report("r-4", true, 40, 40)),
        ChangeEvent::Deleted(RecordId::from("r-3")),
    ]);

    assert_eq!(ids(&active), vec!["r-2"]);
    assert!(active.records().iter().all(|r| r.bool_field("isResolved") == Some(false)));
}

#[test]
fn update_for_unknown_record_outside_filter_is_noop() {
    let mut active = active_view();
    active.apply(&[ChangeEvent::Updated(report("elsewhere", true, 10, 10))]);
    assert!(active.is_empty());
}
