use scorecard_core::db::open_db_in_memory;
use scorecard_core::{
    AdminService, GraphStore, ImportError, ImportRow, ImportService, SqliteGraphStorage, Status,
    TargetForm, TargetService,
};

fn open_store(conn: &rusqlite::Connection) -> GraphStore<SqliteGraphStorage<'_>> {
    GraphStore::open(SqliteGraphStorage::new(conn)).unwrap()
}

fn row(entries: &[(&str, &str)]) -> ImportRow {
    entries
        .iter()
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .collect()
}

fn standard_row(perspective: &str, objective: &str, indicator: &str, manager: &str) -> ImportRow {
    row(&[
        ("Perspective", perspective),
        ("Objective", objective),
        ("Indicator", indicator),
        ("Manager", manager),
    ])
}

#[test]
fn one_row_creates_the_full_structure() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[standard_row(
            "Financial",
            "Grow Revenue",
            "Conversion Rate",
            "Maria Souza",
        )])
        .unwrap();
    assert_eq!(created, 1);

    let graph = store.graph();
    assert_eq!(graph.perspectives.len(), 1);
    assert_eq!(graph.managers.len(), 1);
    assert_eq!(graph.objectives.len(), 1);
    assert_eq!(graph.indicators.len(), 1);

    let indicator = &graph.indicators[0];
    let objective = &graph.objectives[0];
    assert_eq!(indicator.name, "Conversion Rate");
    assert_eq!(indicator.status, Status::Draft);
    assert!(indicator.description.is_empty());
    assert_eq!(indicator.objective_id, objective.id);
    assert_eq!(indicator.perspective_id, objective.perspective_id);
    assert_eq!(indicator.manager_id, objective.manager_id);
    assert_eq!(objective.manager_id, graph.managers[0].id);
}

#[test]
fn reimporting_the_same_batch_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let batch = [standard_row(
        "Financial",
        "Grow Revenue",
        "Conversion Rate",
        "Maria Souza",
    )];

    let mut import = ImportService::new(&mut store);
    assert_eq!(import.import_rows(&batch).unwrap(), 1);
    let after_first = store.graph().clone();

    let mut import = ImportService::new(&mut store);
    assert_eq!(import.import_rows(&batch).unwrap(), 0);
    assert_eq!(store.graph(), &after_first);
}

#[test]
fn name_matching_is_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[
            standard_row("Financial", "Grow Revenue", "Conversion Rate", "Maria Souza"),
            standard_row("financial", "GROW REVENUE", "conversion rate", "maria souza"),
            standard_row("FINANCIAL", "grow revenue", "Churn Rate", "Maria SOUZA"),
        ])
        .unwrap();
    assert_eq!(created, 2);

    let graph = store.graph();
    assert_eq!(graph.perspectives.len(), 1);
    assert_eq!(graph.managers.len(), 1);
    assert_eq!(graph.objectives.len(), 1);
    assert_eq!(graph.indicators.len(), 2);
}

#[test]
fn same_objective_name_under_another_perspective_is_distinct() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[
            standard_row("Financial", "Improve Efficiency", "Cost per Unit", "Maria Souza"),
            standard_row("Processes", "Improve Efficiency", "Cycle Time", "Maria Souza"),
        ])
        .unwrap();
    assert_eq!(created, 2);

    let graph = store.graph();
    assert_eq!(graph.perspectives.len(), 2);
    assert_eq!(graph.objectives.len(), 2);
    assert_ne!(graph.objectives[0].perspective_id, graph.objectives[1].perspective_id);
}

#[test]
fn rows_with_blank_fields_are_skipped_entirely() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[
            standard_row("Financial", "   ", "Conversion Rate", "Maria Souza"),
            standard_row("", "Grow Revenue", "Conversion Rate", "Maria Souza"),
        ])
        .unwrap();
    assert_eq!(created, 0);
    assert!(store.graph().perspectives.is_empty());
    assert!(store.graph().indicators.is_empty());
}

#[test]
fn alternate_column_labels_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[row(&[
            ("Perspective", "Financial"),
            ("Strategic Objective", "Grow Revenue"),
            ("Performance Indicator", "Conversion Rate"),
            ("Responsible Manager", "Maria Souza"),
        ])])
        .unwrap();
    assert_eq!(created, 1);
    assert_eq!(store.graph().indicators[0].name, "Conversion Rate");
}

#[test]
fn empty_batch_fails_whole_with_no_mutation() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let before = store.graph().clone();
    let before_version = store.version();

    let mut import = ImportService::new(&mut store);
    let err = import.import_rows(&[]).unwrap_err();
    assert!(matches!(err, ImportError::EmptyBatch));
    assert_eq!(store.graph(), &before);
    assert_eq!(store.version(), before_version);
}

#[test]
fn later_rows_see_earlier_insertions_within_one_batch() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[
            standard_row("Financial", "Grow Revenue", "Conversion Rate", "Maria Souza"),
            standard_row("Financial", "Grow Revenue", "Average Ticket", "Maria Souza"),
        ])
        .unwrap();
    assert_eq!(created, 2);

    let graph = store.graph();
    assert_eq!(graph.perspectives.len(), 1);
    assert_eq!(graph.managers.len(), 1);
    assert_eq!(graph.objectives.len(), 1);
}

#[test]
fn import_never_touches_targets() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut admin = AdminService::new(&mut store);
    let manager_id = admin.add_manager("Maria Souza").unwrap();
    let perspective_id = admin.add_perspective("Financial").unwrap();
    let objective_id = admin
        .add_objective("Grow Revenue", perspective_id, manager_id)
        .unwrap();
    let indicator_id = admin.add_indicator("Conversion Rate", objective_id).unwrap();

    let mut targets = TargetService::new(&mut store);
    targets.save_draft(indicator_id, &TargetForm::default()).unwrap();
    let targets_before = store.graph().targets.clone();

    let mut import = ImportService::new(&mut store);
    import
        .import_rows(&[standard_row("Customers", "Retain Accounts", "Churn Rate", "Ana Lima")])
        .unwrap();

    assert_eq!(store.graph().targets, targets_before);
}

#[test]
fn import_resolves_existing_entities_created_by_direct_entry() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let mut admin = AdminService::new(&mut store);
    let manager_id = admin.add_manager("Maria Souza").unwrap();
    let perspective_id = admin.add_perspective("Financial").unwrap();
    admin
        .add_objective("Grow Revenue", perspective_id, manager_id)
        .unwrap();

    let mut import = ImportService::new(&mut store);
    let created = import
        .import_rows(&[standard_row(
            "financial",
            "grow revenue",
            "Conversion Rate",
            "maria souza",
        )])
        .unwrap();
    assert_eq!(created, 1);

    let graph = store.graph();
    assert_eq!(graph.perspectives.len(), 1);
    assert_eq!(graph.managers.len(), 1);
    assert_eq!(graph.objectives.len(), 1);
    assert_eq!(graph.indicators[0].manager_id, manager_id);
}
