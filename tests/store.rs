//! Tests for the storage collaborator: stores, library operations and
//! bundle export/import.
mod common;
use chrono::Duration;
use common::*;
use pretty_assertions::assert_eq;
use reportgraph::clock::{FixedClock, SequentialIds};
use reportgraph::definition::ReportDefinition;
use reportgraph::error::ImportError;
use reportgraph::sample::create_blank_with;
use reportgraph::store::*;
use serde_json::json;

fn report(id: &str, name: &str, entity: &str, tags: &[&str]) -> ReportDefinition {
    let mut report = create_blank_with(name, entity, &FixedClock(t0()), &SequentialIds::new());
    report.id = id.to_string();
    report.tags = strings(tags);
    report.report_version = 3;
    report
}

fn library() -> ReportLibrary<MemoryStore> {
    let store: MemoryStore = [
        report("r1", "Active Accounts", "account", &["sales", "weekly"]),
        report("r2", "Contact Export", "contact", &["crm"]),
        report("r3", "Key Accounts", "account", &["sales"]),
    ]
    .into_iter()
    .collect();

    ReportLibrary::new(store)
        .with_clock(FixedClock(t0() + Duration::hours(1)))
        .with_id_source(SequentialIds::new())
}

fn ids(summaries: &[ReportSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn test_memory_store_upsert_keeps_insertion_order() {
    let mut store = MemoryStore::new();
    store.put(report("a", "A", "account", &[])).unwrap();
    store.put(report("b", "B", "account", &[])).unwrap();
    store.put(report("a", "A2", "account", &[])).unwrap();

    let names: Vec<&str> = store.list().into_iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A2", "B"]);
    assert_eq!(store.len(), 2);

    assert!(store.delete("a").unwrap());
    assert!(!store.delete("a").unwrap());
    assert!(!store.contains("a"));
    assert!(store.get("b").is_some());
}

#[test]
fn test_summaries() {
    let library = library();
    let summaries = library.summaries();

    assert_eq!(ids(&summaries), vec!["r1", "r2", "r3"]);
    assert_eq!(
        summaries[0],
        ReportSummary {
            id: "r1".to_string(),
            name: "Active Accounts".to_string(),
            description: String::new(),
            primary_entity: "account".to_string(),
            tags: strings(&["sales", "weekly"]),
            updated_at: t0(),
            report_version: 3,
        }
    );
}

#[test]
fn test_duplicate_resets_identity_and_version() {
    let mut library = library();
    let copy = library.duplicate("r1", None).unwrap().unwrap();

    assert_eq!(copy.id, "r1-copy-1");
    assert_eq!(copy.name, "Active Accounts (Copy)");
    assert_eq!(copy.report_version, 1);
    assert_eq!(copy.created_at, t0() + Duration::hours(1));
    assert_eq!(copy.updated_at, t0() + Duration::hours(1));
    assert_eq!(copy.tags, strings(&["sales", "weekly"]));

    assert_eq!(library.get("r1-copy-1"), Some(&copy));
    assert_eq!(library.get("r1").unwrap().report_version, 3);
}

#[test]
fn test_duplicate_with_new_name() {
    let mut library = library();
    let copy = library.duplicate("r2", Some("Contacts v2")).unwrap().unwrap();
    assert_eq!(copy.name, "Contacts v2");
}

#[test]
fn test_duplicate_unknown_report() {
    let mut library = library();
    assert_eq!(library.duplicate("nope", None).unwrap(), None);
    assert_eq!(library.summaries().len(), 3);
}

#[test]
fn test_search_is_case_insensitive() {
    let library = library();

    assert_eq!(ids(&library.search("ACCOUNTS")), vec!["r1", "r3"]);
    assert_eq!(ids(&library.search("crm")), vec!["r2"]);
    assert_eq!(ids(&library.search("Contact")), vec!["r2"]);
    assert!(library.search("invoice").is_empty());
}

#[test]
fn test_filter_by_entity_and_tag() {
    let library = library();

    assert_eq!(ids(&library.by_entity("account")), vec!["r1", "r3"]);
    assert!(library.by_entity("Account").is_empty());
    assert_eq!(ids(&library.by_tag("sales")), vec!["r1", "r3"]);
    assert_eq!(ids(&library.by_tag("weekly")), vec!["r1"]);
}

#[test]
fn test_all_tags_and_entities_are_sorted_and_unique() {
    let library = library();

    assert_eq!(library.all_tags(), strings(&["crm", "sales", "weekly"]));
    assert_eq!(library.all_entities(), strings(&["account", "contact"]));
}

#[test]
fn test_statistics() {
    let mut library = library();
    let mut newer = report("r4", "Late", "lead", &[]);
    newer.updated_at = t0() + Duration::days(2);
    library.save(newer).unwrap();

    let stats = library.statistics();
    assert_eq!(stats.total_reports, 4);
    assert_eq!(stats.total_entities, 3);
    assert_eq!(stats.total_tags, 3);
    assert_eq!(stats.last_updated, Some(t0() + Duration::days(2)));
    assert_eq!(
        stats.entity_breakdown,
        vec![
            EntityCount {
                entity: "account".to_string(),
                count: 2,
            },
            EntityCount {
                entity: "contact".to_string(),
                count: 1,
            },
            EntityCount {
                entity: "lead".to_string(),
                count: 1,
            },
        ]
    );
}

#[test]
fn test_statistics_of_empty_library() {
    let library = ReportLibrary::new(MemoryStore::new());
    let stats = library.statistics();

    assert_eq!(stats.total_reports, 0);
    assert_eq!(stats.last_updated, None);
    assert!(stats.entity_breakdown.is_empty());
}

#[test]
fn test_export_bundle() {
    let library = library();

    let all = library.export_bundle(None);
    assert_eq!(all.version, BUNDLE_VERSION);
    assert_eq!(all.exported_by, DEFAULT_EXPORTED_BY);
    assert_eq!(all.exported_at, t0() + Duration::hours(1));
    assert_eq!(all.reports.len(), 3);

    let some = library.export_bundle(Some(&["r3", "missing"]));
    let exported: Vec<&str> = some.reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(exported, vec!["r3"]);

    let value = serde_json::to_value(&some).unwrap();
    assert_eq!(value["version"], json!("1.0.0"));
    assert!(value.get("exportedAt").is_some());
}

#[test]
fn test_import_round_trip_into_empty_library() {
    let bundle = library().export_bundle(None);
    let json = serde_json::to_string(&bundle).unwrap();

    let mut target = ReportLibrary::new(MemoryStore::new())
        .with_clock(FixedClock(t0() + Duration::days(1)))
        .with_id_source(SequentialIds::new());
    let outcome = target.import_bundle(&json).unwrap();

    assert_eq!(
        outcome,
        ImportOutcome {
            imported: 3,
            errors: vec![],
        }
    );
    assert!(outcome.is_clean());
    let imported = target.get("r1").unwrap();
    assert_eq!(imported.name, "Active Accounts");
    assert_eq!(imported.report_version, 1);
    assert_eq!(imported.created_at, t0() + Duration::days(1));
    assert_eq!(imported.updated_at, t0() + Duration::days(1));
}

#[test]
fn test_import_renames_colliding_ids() {
    let mut library = library();
    let json = serde_json::to_string(&library.export_bundle(Some(&["r2"]))).unwrap();

    let outcome = library.import_bundle(&json).unwrap();
    assert_eq!(outcome.imported, 1);

    let imported = library.get("r2-imported-1").unwrap();
    assert_eq!(imported.name, "Contact Export (Imported)");
    assert_eq!(library.get("r2").unwrap().name, "Contact Export");
    assert_eq!(library.summaries().len(), 4);
}

#[test]
fn test_import_skips_invalid_records_and_keeps_valid_siblings() {
    let valid = serde_json::to_value(report("fresh", "Fresh", "account", &[])).unwrap();
    let mut nameless = valid.clone();
    nameless["id"] = json!("nameless");
    nameless["name"] = json!("");
    let mut undecodable = valid.clone();
    undecodable["id"] = json!("broken");
    undecodable["graph"] = json!("not a graph");
    let no_schema = json!({"id": "x", "name": "No schema"});

    let bundle = json!({
        "version": "1.0.0",
        "reports": [valid, nameless, undecodable, no_schema],
        "exportedAt": "2025-01-01T00:00:00Z",
        "exportedBy": "someone"
    });

    let mut library = ReportLibrary::new(MemoryStore::new());
    let outcome = library.import_bundle(&bundle.to_string()).unwrap();

    assert_eq!(outcome.imported, 1);
    assert_eq!(outcome.errors.len(), 3);
    assert_eq!(outcome.errors[0], "Report 2: Missing required fields");
    assert!(outcome.errors[1].starts_with("Report 3: "), "{}", outcome.errors[1]);
    assert_eq!(outcome.errors[2], "Report 4: Missing required fields");
    assert!(library.get("fresh").is_some());
    assert!(library.get("broken").is_none());
}

#[test]
fn test_import_accepts_minimal_records() {
    let bundle = json!({
        "reports": [
            {
                "id": "r1",
                "name": "Minimal",
                "schemaVersion": "1.0.0",
                "primaryEntity": "account",
                "graph": {
                    "nodes": [{"id": "e", "type": "entity", "data": {"entity": "account"}}],
                    "edges": []
                }
            },
            {
                "id": "r2",
                "name": "No entity named",
                "schemaVersion": "1.0.0",
                "graph": {
                    "nodes": [{"id": "e", "type": "entity", "data": {"entity": "contact"}}],
                    "edges": []
                }
            },
            {"id": "r3", "name": "Bare", "schemaVersion": "1.0.0"}
        ]
    });

    let mut library = ReportLibrary::new(MemoryStore::new())
        .with_clock(FixedClock(t0()))
        .with_id_source(SequentialIds::new());
    let outcome = library.import_bundle(&bundle.to_string()).unwrap();

    assert_eq!(
        outcome,
        ImportOutcome {
            imported: 3,
            errors: vec![],
        }
    );
    let minimal = library.get("r1").unwrap();
    assert_eq!(minimal.primary_entity, "account");
    assert_eq!(minimal.report_version, 1);
    assert_eq!(minimal.created_at, t0());
    assert_eq!(minimal.updated_at, t0());
    assert_eq!(library.get("r2").unwrap().primary_entity, "contact");
    assert_eq!(library.get("r3").unwrap().primary_entity, "unknown");
}

#[test]
fn test_import_rejects_malformed_files() {
    let mut library = ReportLibrary::new(MemoryStore::new());

    assert!(matches!(
        library.import_bundle("{not json"),
        Err(ImportError::Parse(_))
    ));
    assert!(matches!(
        library.import_bundle(r#"{"version": "1.0.0"}"#),
        Err(ImportError::InvalidFormat(_))
    ));
    assert!(matches!(
        library.import_bundle(r#"{"reports": {}}"#),
        Err(ImportError::InvalidFormat(_))
    ));
    assert!(library.summaries().is_empty());
}

#[test]
fn test_file_store_persists_across_reloads() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("reports");

    let mut store = FileStore::new(&path);
    assert_eq!(store.load_from_disk().unwrap(), 0);
    store.put(report("r1", "One", "account", &["a"])).unwrap();
    store.put(report("r2", "Two", "contact", &[])).unwrap();
    assert!(path.join("r1.json").exists());

    let mut reloaded = FileStore::new(&path);
    assert_eq!(reloaded.load_from_disk().unwrap(), 2);
    assert_eq!(reloaded.get("r1"), store.get("r1"));
    let listed: Vec<&str> = reloaded.list().into_iter().map(|r| r.id.as_str()).collect();
    assert_eq!(listed, vec!["r1", "r2"]);
}

#[test]
fn test_file_store_delete_removes_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store.put(report("gone", "Gone", "account", &[])).unwrap();

    assert!(store.delete("gone").unwrap());
    assert!(!dir.path().join("gone.json").exists());
    assert!(!store.delete("gone").unwrap());
}

#[test]
fn test_file_store_skips_foreign_files() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a report").unwrap();
    std::fs::write(dir.path().join("broken.json"), "{\"id\": 1}").unwrap();
    let valid = serde_json::to_string(&report("ok", "Ok", "account", &[])).unwrap();
    std::fs::write(dir.path().join("ok.json"), valid).unwrap();

    let mut store = FileStore::new(dir.path());
    assert_eq!(store.load_from_disk().unwrap(), 1);
    assert!(store.get("ok").is_some());
}

#[test]
fn test_file_store_sanitizes_file_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store.put(report("team/a b", "Odd", "account", &[])).unwrap();

    let files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("team_a_b~"), "{}", files[0]);
    assert!(files[0].ends_with(".json"), "{}", files[0]);

    let mut reloaded = FileStore::new(dir.path());
    reloaded.load_from_disk().unwrap();
    assert_eq!(reloaded.get("team/a b").unwrap().name, "Odd");
}

#[test]
fn test_file_store_keeps_ids_that_sanitize_alike_apart() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store.put(report("x/y", "Slash", "account", &[])).unwrap();
    store.put(report("x_y", "Underscore", "account", &[])).unwrap();
    store.put(report("x y", "Space", "account", &[])).unwrap();
    assert!(dir.path().join("x_y.json").exists());

    let mut reloaded = FileStore::new(dir.path());
    assert_eq!(reloaded.load_from_disk().unwrap(), 3);
    assert_eq!(reloaded.get("x/y").unwrap().name, "Slash");
    assert_eq!(reloaded.get("x_y").unwrap().name, "Underscore");
    assert_eq!(reloaded.get("x y").unwrap().name, "Space");

    assert!(store.delete("x/y").unwrap());
    let mut after_delete = FileStore::new(dir.path());
    assert_eq!(after_delete.load_from_disk().unwrap(), 2);
    assert!(after_delete.get("x/y").is_none());
    assert_eq!(after_delete.get("x_y").unwrap().name, "Underscore");
}

#[test]
fn test_library_over_file_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut library = ReportLibrary::new(FileStore::new(dir.path()))
        .with_clock(FixedClock(t0()))
        .with_id_source(SequentialIds::new());
    library.save(report("r1", "One", "account", &[])).unwrap();
    library.duplicate("r1", None).unwrap();

    let mut reloaded = FileStore::new(dir.path());
    assert_eq!(reloaded.load_from_disk().unwrap(), 2);
    assert!(reloaded.contains("r1-copy-1"));
}
