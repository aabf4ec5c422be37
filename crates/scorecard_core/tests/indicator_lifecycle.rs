use scorecard_core::db::open_db_in_memory;
use scorecard_core::{
    AdminService, GraphStore, IndicatorForm, IndicatorId, IndicatorService, LifecycleError,
    ManagerId, SaveOutcome, Severity, SqliteGraphStorage, Status,
};
use uuid::Uuid;

fn open_store(conn: &rusqlite::Connection) -> GraphStore<SqliteGraphStorage<'_>> {
    GraphStore::open(SqliteGraphStorage::new(conn)).unwrap()
}

fn complete_form() -> IndicatorForm {
    IndicatorForm {
        description: "Leads converted to sales".into(),
        formula: "(A / B) * 100".into(),
        unit: "%".into(),
        source: "CRM".into(),
        frequency: "Monthly".into(),
        polarity: "Higher is better".into(),
    }
}

fn seed_indicator(
    store: &mut GraphStore<SqliteGraphStorage<'_>>,
    name: &str,
) -> (ManagerId, IndicatorId) {
    let mut admin = AdminService::new(store);
    let manager_id = admin.add_manager(format!("Manager of {name}").as_str()).unwrap();
    let perspective_id = admin.add_perspective(format!("Perspective of {name}").as_str()).unwrap();
    let objective_id = admin
        .add_objective(format!("Objective of {name}").as_str(), perspective_id, manager_id)
        .unwrap();
    let indicator_id = admin.add_indicator(name, objective_id).unwrap();
    (manager_id, indicator_id)
}

fn seed_sibling(
    store: &mut GraphStore<SqliteGraphStorage<'_>>,
    manager_id: ManagerId,
    name: &str,
) -> IndicatorId {
    let mut admin = AdminService::new(store);
    let perspective_id = admin.add_perspective(format!("Perspective of {name}").as_str()).unwrap();
    let objective_id = admin
        .add_objective(format!("Objective of {name}").as_str(), perspective_id, manager_id)
        .unwrap();
    admin.add_indicator(name, objective_id).unwrap()
}

#[test]
fn save_draft_merges_fields_and_stays_draft() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (_, indicator_id) = seed_indicator(&mut store, "Conversion Rate");

    let mut indicators = IndicatorService::new(&mut store);
    let form = IndicatorForm {
        description: "partial".into(),
        ..IndicatorForm::default()
    };
    let outcome = indicators.save_draft(indicator_id, &form).unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);

    let indicator = store.graph().indicator(indicator_id).unwrap();
    assert_eq!(indicator.description, "partial");
    assert_eq!(indicator.status, Status::Draft);
    assert!(indicator.updated_at > 0);
}

#[test]
fn save_draft_against_missing_id_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let before_version = store.version();

    let mut indicators = IndicatorService::new(&mut store);
    let outcome = indicators
        .save_draft(Uuid::new_v4(), &IndicatorForm::default())
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Ignored);
    assert_eq!(store.version(), before_version);
}

#[test]
fn finalize_rejects_incomplete_fields_and_leaves_graph_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (_, indicator_id) = seed_indicator(&mut store, "Conversion Rate");
    let before = store.graph().clone();

    let mut indicators = IndicatorService::new(&mut store);
    let mut form = complete_form();
    form.unit = String::new();
    form.polarity = "  ".into();

    let err = indicators.finalize_and_cascade(indicator_id, &form).unwrap_err();
    match err {
        LifecycleError::Incomplete { ref missing } => {
            assert_eq!(missing, &vec!["unit", "polarity"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.severity(), Severity::Warning);
    assert_eq!(store.graph(), &before);
}

#[test]
fn finalize_locks_the_record_until_unlock() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (_, indicator_id) = seed_indicator(&mut store, "Conversion Rate");

    let mut indicators = IndicatorService::new(&mut store);
    let outcome = indicators
        .finalize_and_cascade(indicator_id, &complete_form())
        .unwrap();
    assert!(outcome.finalized);
    assert_eq!(store.graph().indicator(indicator_id).unwrap().status, Status::Final);

    let mut indicators = IndicatorService::new(&mut store);
    let err = indicators
        .save_draft(indicator_id, &complete_form())
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Locked(id) if id == indicator_id));

    let err = indicators
        .finalize_and_cascade(indicator_id, &complete_form())
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Locked(_)));

    let mut admin = AdminService::new(&mut store);
    admin.unlock_indicator(indicator_id).unwrap();
    assert_eq!(store.graph().indicator(indicator_id).unwrap().status, Status::Draft);

    let mut indicators = IndicatorService::new(&mut store);
    let outcome = indicators
        .save_draft(indicator_id, &complete_form())
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
}

#[test]
fn finalize_cascades_over_complete_drafts_of_the_same_manager() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (manager_id, primary) = seed_indicator(&mut store, "Conversion Rate");
    let ready_sibling = seed_sibling(&mut store, manager_id, "Churn Rate");
    let incomplete_sibling = seed_sibling(&mut store, manager_id, "NPS");
    let (_, other_managers) = seed_indicator(&mut store, "Uptime");

    // The ready sibling and the other manager's indicator hold complete
    // stored fields; the incomplete sibling keeps its blanks.
    let mut indicators = IndicatorService::new(&mut store);
    indicators.save_draft(ready_sibling, &complete_form()).unwrap();
    indicators.save_draft(other_managers, &complete_form()).unwrap();

    let mut indicators = IndicatorService::new(&mut store);
    let outcome = indicators
        .finalize_and_cascade(primary, &complete_form())
        .unwrap();
    assert!(outcome.finalized);
    assert_eq!(outcome.cascaded, 1);

    let graph = store.graph();
    assert_eq!(graph.indicator(primary).unwrap().status, Status::Final);
    assert_eq!(graph.indicator(ready_sibling).unwrap().status, Status::Final);
    assert_eq!(graph.indicator(incomplete_sibling).unwrap().status, Status::Draft);
    assert_eq!(graph.indicator(other_managers).unwrap().status, Status::Draft);
}

#[test]
fn finalize_against_missing_id_reports_nothing_finalized() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    seed_indicator(&mut store, "Conversion Rate");
    let before = store.graph().clone();

    let mut indicators = IndicatorService::new(&mut store);
    let outcome = indicators
        .finalize_and_cascade(Uuid::new_v4(), &complete_form())
        .unwrap();
    assert!(!outcome.finalized);
    assert_eq!(outcome.cascaded, 0);
    assert_eq!(store.graph(), &before);
}
