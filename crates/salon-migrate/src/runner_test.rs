use super::*;
use crate::test_utils::{keyspace_script, script, RecordingSession, StaticSource};
use salon_core::CoreError;

fn salon_scripts() -> Vec<MigrationScript> {
    vec![
        keyspace_script(),
        script(
            "V2__create_customers.cql",
            "CREATE TABLE IF NOT EXISTS customers (id INTEGER PRIMARY KEY, name TEXT);",
        ),
        script(
            "V3__seed_customers.cql",
            "INSERT INTO customers VALUES (1, 'Maria; Silva');\nINSERT INTO customers VALUES (2, 'Joana');",
        ),
    ]
}

fn runner(scripts: Vec<MigrationScript>) -> MigrationRunner {
    MigrationRunner::new(StaticSource::boxed(scripts), Some("beauty_salon".to_string()))
}

async fn ledger_versions(session: &RecordingSession) -> Vec<String> {
    session
        .query_rows(
            "SELECT version FROM beauty_salon.schema_migrations ORDER BY version",
            1,
        )
        .await
        .unwrap()
        .into_iter()
        .filter_map(|row| row.into_iter().next().flatten())
        .collect()
}

#[tokio::test]
async fn test_first_run_applies_everything() {
    let session = RecordingSession::new();
    let runner = runner(salon_scripts());

    let report = runner.run(&session).await.unwrap();

    assert_eq!(report.state, RunState::Complete);
    assert_eq!(report.keyspace.as_ref().map(|k| k.as_str()), Some("beauty_salon"));
    assert_eq!(report.early.as_deref(), Some("1"));
    assert_eq!(report.applied, vec!["1", "2", "3"]);
    assert!(report.skipped.is_empty());
    assert_eq!(ledger_versions(&session).await, vec!["1", "2", "3"]);
    assert_eq!(runner.state(), RunState::Complete);

    let rows = session
        .query_rows("SELECT name FROM beauty_salon.customers ORDER BY id", 1)
        .await
        .unwrap();
    assert_eq!(rows[0][0].as_deref(), Some("Maria; Silva"));
}

#[tokio::test]
async fn test_bootstrap_precedes_ledger_and_scripts() {
    let session = RecordingSession::new();
    runner(salon_scripts()).run(&session).await.unwrap();

    let create_ks = session.position("CREATE SCHEMA").unwrap();
    let use_ks = session.position("USE beauty_salon").unwrap();
    let ledger = session.position("CREATE TABLE IF NOT EXISTS beauty_salon.schema_migrations").unwrap();
    let customers = session.position("CREATE TABLE IF NOT EXISTS customers").unwrap();

    assert!(create_ks < use_ks);
    assert!(use_ks < ledger);
    assert!(ledger < customers);
    assert_eq!(session.count("CREATE SCHEMA"), 1);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let session = RecordingSession::new();
    let runner = runner(salon_scripts());
    runner.run(&session).await.unwrap();

    let report = runner.run(&session).await.unwrap();

    assert!(report.applied.is_empty());
    assert_eq!(report.skipped, vec!["1", "2", "3"]);
    assert!(report.drifted.is_empty());
    assert_eq!(ledger_versions(&session).await, vec!["1", "2", "3"]);
    assert_eq!(session.count("INSERT INTO customers"), 2);
    // the keyspace script runs on every start
    assert_eq!(session.count("CREATE SCHEMA"), 2);
}

#[tokio::test]
async fn test_preseeded_version_is_skipped() {
    let session = RecordingSession::new();
    session.execute("CREATE SCHEMA beauty_salon").await.unwrap();
    session
        .execute(
            "CREATE TABLE beauty_salon.schema_migrations \
             (version TEXT PRIMARY KEY, description TEXT, script TEXT, installed_on TIMESTAMP)",
        )
        .await
        .unwrap();
    session
        .execute("INSERT INTO beauty_salon.schema_migrations VALUES ('1', 'x', 'V1__x.cql', now())")
        .await
        .unwrap();

    let scripts = vec![
        script("V1__x.cql", "CREATE TABLE never_created (id INTEGER);"),
        script("V2__y.cql", "CREATE TABLE created (id INTEGER);"),
    ];
    let report = runner(scripts).run(&session).await.unwrap();

    assert_eq!(report.early, None);
    assert_eq!(report.skipped, vec!["1"]);
    assert_eq!(report.applied, vec!["2"]);
    assert_eq!(session.count("never_created"), 0);
    assert!(session.relation_exists("beauty_salon.created").await.unwrap());
}

#[tokio::test]
async fn test_renamed_applied_script_is_reported_as_drifted() {
    let session = RecordingSession::new();
    let original = vec![
        keyspace_script(),
        script("V2__create_staff.cql", "CREATE TABLE staff (id INTEGER);"),
    ];
    runner(original).run(&session).await.unwrap();

    let renamed = vec![
        keyspace_script(),
        script("V2__create_stylists.cql", "CREATE TABLE stylists (id INTEGER);"),
    ];
    let report = runner(renamed).run(&session).await.unwrap();

    // still skipped, never re-applied
    assert_eq!(report.skipped, vec!["1", "2"]);
    assert!(report.applied.is_empty());
    assert_eq!(report.drifted, vec!["2"]);
    assert_eq!(session.count("CREATE TABLE stylists"), 0);
}

#[tokio::test]
async fn test_failing_statement_stops_the_run() {
    let session = RecordingSession::new();
    let scripts = vec![
        keyspace_script(),
        script(
            "V2__broken.cql",
            "CREATE TABLE ok_table (id INTEGER);\nCREATE TABLE broken (id NOSUCHTYPE);\nCREATE TABLE after_broken (id INTEGER);",
        ),
        script("V3__later.cql", "CREATE TABLE later (id INTEGER);"),
    ];
    let runner = runner(scripts);

    let err = runner.run(&session).await.unwrap_err();

    match err {
        MigrateError::StatementFailed {
            version, index, ..
        } => {
            assert_eq!(version, "2");
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(runner.state(), RunState::Failed);
    assert_eq!(ledger_versions(&session).await, vec!["1"]);
    // partial application is kept
    assert!(session.relation_exists("beauty_salon.ok_table").await.unwrap());
    assert_eq!(session.count("after_broken"), 0);
    assert_eq!(session.count("later"), 0);
}

#[tokio::test]
async fn test_rerun_after_fix_resumes_at_failed_version() {
    let session = RecordingSession::new();
    let broken = vec![
        keyspace_script(),
        script("V2__t.cql", "CREATE TABLE t (id NOSUCHTYPE);"),
    ];
    assert!(runner(broken).run(&session).await.is_err());

    let fixed = vec![
        keyspace_script(),
        script("V2__t.cql", "CREATE TABLE t (id INTEGER);"),
    ];
    let report = runner(fixed).run(&session).await.unwrap();

    assert_eq!(report.skipped, vec!["1"]);
    assert_eq!(report.applied, vec!["2"]);
}

#[tokio::test]
async fn test_ledger_read_failure_fails_open() {
    let session = RecordingSession::new().failing_on("SELECT version FROM");
    let report = runner(salon_scripts()).run(&session).await.unwrap();

    // every script looks unapplied
    assert_eq!(report.applied, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_ledger_write_failure_is_fatal() {
    let session = RecordingSession::new().failing_on("INSERT OR REPLACE");
    let err = runner(salon_scripts()).run(&session).await.unwrap_err();
    assert!(matches!(err, MigrateError::LedgerWrite { ref version, .. } if version == "1"));
}

#[tokio::test]
async fn test_keyspace_switch_failure_is_not_fatal() {
    let session = RecordingSession::new().failing_on("USE beauty_salon");
    let scripts = vec![
        keyspace_script(),
        script("V2__t.cql", "CREATE TABLE beauty_salon.t (id INTEGER);"),
    ];

    let report = runner(scripts).run(&session).await.unwrap();

    assert_eq!(report.applied, vec!["1", "2"]);
}

#[tokio::test]
async fn test_no_scripts_is_success() {
    let session = RecordingSession::new();
    let report = runner(Vec::new()).run(&session).await.unwrap();

    assert_eq!(report.state, RunState::Complete);
    assert_eq!(report.keyspace, None);
    assert!(session.statements().is_empty());
}

#[tokio::test]
async fn test_disabled_runner_does_not_touch_session() {
    let session = RecordingSession::new();
    let runner = runner(salon_scripts()).enabled(false);

    let report = runner.run(&session).await.unwrap();

    assert_eq!(report.state, RunState::Disabled);
    assert_eq!(runner.state(), RunState::Disabled);
    assert!(session.statements().is_empty());
}

#[tokio::test]
async fn test_duplicate_versions_abort_before_execution() {
    let session = RecordingSession::new();
    let scripts = vec![
        keyspace_script(),
        script("V2__a.cql", "CREATE TABLE a (id INTEGER);"),
        script("V2__b.cql", "CREATE TABLE b (id INTEGER);"),
    ];

    let err = runner(scripts).run(&session).await.unwrap_err();

    assert!(matches!(
        err,
        MigrateError::Setup(CoreError::DuplicateVersion { ref version, .. }) if version == "2"
    ));
    assert!(session.statements().is_empty());
}

#[tokio::test]
async fn test_invalid_keyspace_is_setup_error() {
    let session = RecordingSession::new();
    let runner = MigrationRunner::new(
        StaticSource::boxed(salon_scripts()),
        Some("beauty-salon".to_string()),
    );

    let err = runner.run(&session).await.unwrap_err();
    assert!(matches!(err, MigrateError::Setup(CoreError::InvalidKeyspace { .. })));
}

#[tokio::test]
async fn test_scripts_run_in_filename_order() {
    let session = RecordingSession::new();
    let scripts = vec![
        keyspace_script(),
        script("V3__c.cql", "CREATE TABLE c (id INTEGER);"),
        script("V2__b.cql", "CREATE TABLE b (id INTEGER);"),
    ];

    let report = runner(scripts).run(&session).await.unwrap();

    assert_eq!(report.applied, vec!["1", "2", "3"]);
    assert!(session.position("TABLE b").unwrap() < session.position("TABLE c").unwrap());
}

#[tokio::test]
async fn test_status_before_first_run_is_all_pending() {
    let session = RecordingSession::new();
    let status = runner(salon_scripts()).status(&session).await.unwrap();

    assert_eq!(status.keyspace.as_str(), "beauty_salon");
    assert_eq!(status.scripts.len(), 3);
    assert!(status.scripts.iter().all(|s| s.state == ScriptState::Pending));
    assert!(!status.is_up_to_date());
}

#[tokio::test]
async fn test_status_reports_applied_and_orphaned() {
    let session = RecordingSession::new();
    runner(salon_scripts()).run(&session).await.unwrap();

    let mut fewer = salon_scripts();
    fewer.truncate(2);
    fewer.push(script("V4__new.cql", "CREATE TABLE n (id INTEGER);"));
    let status = runner(fewer).status(&session).await.unwrap();

    let labels: Vec<(&str, &str)> = status
        .scripts
        .iter()
        .map(|s| (s.version.as_str(), s.state.label()))
        .collect();
    assert_eq!(
        labels,
        vec![("1", "applied"), ("2", "applied"), ("4", "pending"), ("3", "orphaned")]
    );
    assert!(status.scripts[0].state.installed_on().is_some());
}

#[tokio::test]
async fn test_status_propagates_ledger_read_failure() {
    let session = RecordingSession::new().failing_on("strftime");
    session.execute("CREATE SCHEMA beauty_salon").await.unwrap();
    session
        .execute(
            "CREATE TABLE beauty_salon.schema_migrations \
             (version TEXT PRIMARY KEY, description TEXT, script TEXT, installed_on TIMESTAMP)",
        )
        .await
        .unwrap();

    let err = runner(salon_scripts()).status(&session).await.unwrap_err();
    assert!(matches!(err, MigrateError::LedgerUnavailable(_)));
}

#[test]
fn test_run_blocking_outside_runtime() {
    let session = RecordingSession::new();
    let report = runner(salon_scripts()).run_blocking(&session).unwrap();
    assert_eq!(report.applied, vec!["1", "2", "3"]);
}

#[test]
fn test_run_state_display() {
    assert_eq!(RunState::Applying(0).to_string(), "applying script #1");
    assert_eq!(RunState::Complete.to_string(), "complete");
    assert_eq!(RunState::Disabled.to_string(), "disabled");
}
