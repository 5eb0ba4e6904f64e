//! Multi-cycle lifecycle tests against the mock source and gateway.

use scorethread_engine::testing::{obs, GatewayCall, MockSource, TestEngine};
use scorethread_engine::{ActionKind, ThreadAction};

fn kinds(actions: &[ThreadAction]) -> Vec<ActionKind> {
    actions.iter().map(|a| a.kind()).collect()
}

#[tokio::test]
async fn live_match_is_created_updated_then_retired() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "IND 10/0 (2)")])
        .then(vec![obs("India vs Australia", "Live", "IND 80/1 (12)")])
        .then(vec![obs("India vs Australia", "Live", "IND 160/3 (25)")])
        .then(vec![obs("India vs Australia", "Result: India won", "IND 250/4 (40)")]);
    let t = TestEngine::new(source);

    let mut all = Vec::new();
    for _ in 0..4 {
        all.extend(t.engine.run_cycle().await.actions);
    }

    assert_eq!(
        kinds(&all),
        vec![
            ActionKind::Create,
            ActionKind::Update,
            ActionKind::Update,
            ActionKind::Update,
            ActionKind::Retire,
        ]
    );
    assert!(t.binding("India vs Australia").await.is_none());
    assert_eq!(t.gateway.thread_count(), 1);

    // the final result was written before the binding was dropped
    let last_edit = t
        .gateway
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            GatewayCall::Edit { text, .. } => Some(text),
            _ => None,
        })
        .last()
        .unwrap();
    assert!(last_edit.contains("Status: Result: India won"));
    assert!(last_edit.contains("IND 250/4 (40)"));
}

#[tokio::test]
async fn deleted_thread_is_recreated_and_binding_overwritten() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "")])
        .then(vec![obs("India vs Australia", "Live", "IND 5/0")]);
    let t = TestEngine::new(source);

    t.engine.run_cycle().await;
    let first = t.binding("India vs Australia").await.unwrap();
    t.gateway.delete_thread(&first.thread_id);

    let report = t.engine.run_cycle().await;
    assert_eq!(kinds(&report.actions), vec![ActionKind::Create]);

    let second = t.binding("India vs Australia").await.unwrap();
    assert_ne!(first.thread_id, second.thread_id);
    assert_eq!(t.store.len(), 1);
}

#[tokio::test]
async fn resolve_error_is_treated_as_a_lost_thread() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "")])
        .then(vec![obs("India vs Australia", "Live", "")]);
    let t = TestEngine::new(source);

    t.engine.run_cycle().await;
    t.gateway.set_fail_resolves(true);

    let report = t.engine.run_cycle().await;
    assert_eq!(kinds(&report.actions), vec![ActionKind::Create]);
    assert_eq!(t.store.len(), 1);
}

#[tokio::test]
async fn outage_keeps_original_binding_until_a_replacement_exists() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "IND 10/0")])
        .then(vec![obs("India vs Australia", "Live", "IND 20/0")])
        .then(vec![obs("India vs Australia", "Live", "IND 30/0")]);
    let t = TestEngine::new(source);

    t.engine.run_cycle().await;
    let original = t.binding("India vs Australia").await.unwrap();

    // resolve and create both fail for one cycle
    t.gateway.set_fail_resolves(true);
    t.gateway.set_fail_creates(true);
    let outage = t.engine.run_cycle().await;
    assert_eq!(kinds(&outage.actions), vec![ActionKind::Create]);
    assert_eq!(outage.failures.len(), 1);
    assert_eq!(t.binding("India vs Australia").await.unwrap(), original);

    t.gateway.set_fail_resolves(false);
    t.gateway.set_fail_creates(false);
    let healthy = t.engine.run_cycle().await;
    assert_eq!(kinds(&healthy.actions), vec![ActionKind::Update]);
    assert_eq!(t.gateway.thread_count(), 1);
    assert_eq!(t.binding("India vs Australia").await.unwrap(), original);
    assert!(t
        .gateway
        .message_text(&original.starter_message_id)
        .unwrap()
        .contains("IND 30/0"));
}

#[tokio::test]
async fn previews_never_produce_actions() {
    let source = MockSource::new().then(vec![
        obs("India vs Australia - Preview", "Starts tomorrow", ""),
        obs("India vs England", "Match preview", ""),
        obs("India vs Sri Lanka Preview", "", ""),
    ]);
    let t = TestEngine::new(source);

    let report = t.engine.run_cycle().await;
    assert!(report.actions.is_empty());
    assert!(t.gateway.calls().is_empty());
    assert_eq!(report.observed, 3);
    assert_eq!(report.canonical, 0);
}

#[tokio::test]
async fn duplicate_entries_finished_match_creates_then_retires() {
    let source = MockSource::new().then(vec![
        obs("India vs Australia - Complete", "India won by 5 runs", "IND 250/4 (40) "),
        obs("India vs Australia", "Live", ""),
    ]);
    let t = TestEngine::new(source);

    let report = t.engine.run_cycle().await;
    assert_eq!(report.canonical, 1);
    assert_eq!(
        kinds(&report.actions),
        vec![ActionKind::Create, ActionKind::Retire]
    );
    assert!(t.store.is_empty());

    match &t.gateway.calls()[0] {
        GatewayCall::Create { name, text } => {
            assert_eq!(name, "India vs Australia Live Updates");
            assert_eq!(
                text,
                "Live Match: India vs Australia\nIND 250/4 (40)\nStatus: India won by 5 runs"
            );
        }
        other => panic!("expected create, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_match_keeps_its_binding() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "")])
        .then(vec![])
        .then(vec![obs("India vs Australia", "Live", "IND 1/0")]);
    let t = TestEngine::new(source);

    t.engine.run_cycle().await;
    let gap = t.engine.run_cycle().await;
    assert!(gap.actions.is_empty());
    assert!(!gap.aborted);
    assert!(t.binding("India vs Australia").await.is_some());

    let back = t.engine.run_cycle().await;
    assert_eq!(kinds(&back.actions), vec![ActionKind::Update]);
}

#[tokio::test]
async fn source_failure_aborts_without_touching_threads() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "")])
        .then_fail("connection reset");
    let t = TestEngine::new(source);

    t.engine.run_cycle().await;
    let calls_before = t.gateway.calls().len();

    let report = t.engine.run_cycle().await;
    assert!(report.aborted);
    assert!(report.actions.is_empty());
    assert_eq!(t.gateway.calls().len(), calls_before);
    assert!(t.binding("India vs Australia").await.is_some());
}

#[tokio::test]
async fn failed_create_is_local_and_retried() {
    let source = MockSource::new()
        .then(vec![
            obs("India vs Pakistan", "Live", ""),
            obs("India vs Australia", "Live", ""),
        ])
        .then(vec![obs("India vs Pakistan", "Live", "")]);
    let t = TestEngine::new(source);
    t.gateway.fail_create_named("India vs Pakistan Live Updates");

    let report = t.engine.run_cycle().await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key.as_str(), "India vs Pakistan");
    assert!(t.binding("India vs Pakistan").await.is_none());
    assert!(t.binding("India vs Australia").await.is_some());

    // no partial binding was kept, so the next cycle makes the same decision
    let again = t.engine.run_cycle().await;
    assert_eq!(kinds(&again.actions), vec![ActionKind::Create]);
    assert_eq!(again.failures.len(), 1);
    assert!(t.binding("India vs Pakistan").await.is_none());
}

#[tokio::test]
async fn failed_edit_leaves_binding_for_next_cycle() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Live", "")])
        .then(vec![obs("India vs Australia", "Live", "IND 1/0")])
        .then(vec![obs("India vs Australia", "Live", "IND 2/0")]);
    let t = TestEngine::new(source);

    t.engine.run_cycle().await;
    let bound = t.binding("India vs Australia").await.unwrap();

    t.gateway.set_fail_edits(true);
    let failed = t.engine.run_cycle().await;
    assert_eq!(failed.failures.len(), 1);
    assert_eq!(t.binding("India vs Australia").await.unwrap(), bound);

    t.gateway.set_fail_edits(false);
    let ok = t.engine.run_cycle().await;
    assert_eq!(kinds(&ok.actions), vec![ActionKind::Update]);
    assert!(ok.failures.is_empty());
    assert!(t
        .gateway
        .message_text(&bound.starter_message_id)
        .unwrap()
        .contains("IND 2/0"));
}

#[tokio::test]
async fn retired_match_reappearing_gets_a_new_thread() {
    let source = MockSource::new()
        .then(vec![obs("India vs Australia", "Match abandoned", "")])
        .then(vec![obs("India vs Australia", "Live", "")]);
    let t = TestEngine::new(source);

    let first = t.engine.run_cycle().await;
    assert_eq!(kinds(&first.actions), vec![ActionKind::Create, ActionKind::Retire]);

    let second = t.engine.run_cycle().await;
    assert_eq!(kinds(&second.actions), vec![ActionKind::Create]);
    assert_eq!(t.gateway.thread_count(), 2);
}
