//! Tests for incremental index passes

use std::fs;
use tempfile::TempDir;
use typeindex::indexing::{ExecutableElement, TypeElement};
use typeindex::storage::MarkerStore;
use typeindex::{Element, ElementUniverse, IndexPass, Modifier, Record, RecordKind, Settings};

const BOOT: &str = "io.typeindex.Indexed";

fn settings_in(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.index_path = dir.path().join("index").join("elements.idx");
    settings.markers.directory = dir.path().join("markers");
    settings
}

fn ids(records: &[Record]) -> Vec<String> {
    let mut ids: Vec<String> = records.iter().map(Record::id).collect();
    ids.sort();
    ids
}

#[test]
fn test_single_pass_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = settings_in(&temp_dir);
    settings.collector.interfaces.push("pkg.I".to_string());
    let pass = IndexPass::new(settings);

    let universe = ElementUniverse::new()
        .with(TypeElement::class("pkg.T").tagged([BOOT]))
        .with(TypeElement::interface("pkg.I"))
        .with(TypeElement::class("pkg.C").implementing(["pkg.I"]))
        .with(TypeElement::class("pkg.C2").extending(["pkg.C", "java.lang.Object"]))
        .with(TypeElement::class("pkg.Unrelated"));

    let stats = pass.run(&universe).unwrap();
    assert_eq!(stats.records_emitted, 3);
    assert_eq!(stats.index.as_ref().unwrap().count(RecordKind::Type), 3);

    let records = pass.query(&|_| true).unwrap();
    assert_eq!(ids(&records), vec!["pkg.C", "pkg.C2", "pkg.T"]);

    let c2 = records
        .iter()
        .filter_map(Record::as_type)
        .find(|t| t.type_ref.binary_name() == "pkg.C2")
        .expect("C2 indexed");
    let chain: Vec<&str> = c2.superclasses.iter().map(|s| s.binary_name()).collect();
    assert_eq!(chain, vec!["pkg.C"]);

    let store = MarkerStore::from_config(&pass.settings().markers);
    let history = store.load_all().unwrap().history;
    assert_eq!(history.len(), 1);
    let classes = history.classes();
    assert!(classes.contains("pkg.C"));
    assert!(classes.contains("pkg.C2"));
    assert!(!history.tags().contains(BOOT));
}

#[test]
fn test_later_pass_extends_earlier_markers() {
    let temp_dir = TempDir::new().unwrap();

    // First pass knows the configured interface and its implementor.
    let mut first = settings_in(&temp_dir);
    first.collector.interfaces.push("pkg.I".to_string());
    IndexPass::new(first)
        .run(&ElementUniverse::new().with(TypeElement::class("pkg.C").implementing(["pkg.I"])))
        .unwrap();

    // Second pass has no configured seeds and only sees a subclass.
    let pass = IndexPass::new(settings_in(&temp_dir));
    let stats = pass
        .run(&ElementUniverse::new().with(TypeElement::class("pkg.C2").extending(["pkg.C"])))
        .unwrap();
    assert_eq!(stats.prior_snapshots, 1);
    assert_eq!(stats.records_emitted, 1);
    assert!(stats.snapshot.is_some());

    // Third pass builds on the second pass's snapshot.
    let stats = pass
        .run(&ElementUniverse::new().with(TypeElement::class("pkg.C3").extending(["pkg.C2", "pkg.C"])))
        .unwrap();
    assert_eq!(stats.prior_snapshots, 2);

    let records = pass.query(&|r| r.is_subtype_of("pkg.C")).unwrap();
    assert_eq!(ids(&records), vec!["pkg.C2", "pkg.C3"]);
    assert_eq!(pass.query(&|_| true).unwrap().len(), 3);
}

#[test]
fn test_nested_tags_cross_passes() {
    let temp_dir = TempDir::new().unwrap();
    let pass = IndexPass::new(settings_in(&temp_dir));

    pass.run(&ElementUniverse::new().with(TypeElement::annotation("pkg.Route").tagged([BOOT])))
        .unwrap();

    let handler = Element::Method(ExecutableElement {
        owner: Some("pkg.Api".to_string()),
        name: "list".to_string(),
        parameters: vec!["int".to_string()],
        modifiers: [Modifier::Public].into_iter().collect(),
        tags: vec!["pkg.Route".to_string()],
        ..Default::default()
    });
    pass.run(&ElementUniverse::new().with(handler)).unwrap();

    let routed = pass.query(&|r| r.is_annotated_with("pkg.Route")).unwrap();
    assert_eq!(ids(&routed), vec!["pkg.Api#list(int)"]);
    assert_eq!(routed[0].kind(), RecordKind::Method);
}

#[test]
fn test_repeated_pass_writes_no_new_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = settings_in(&temp_dir);
    settings.collector.classes.push("pkg.Base".to_string());
    let pass = IndexPass::new(settings);
    let universe = ElementUniverse::new().with(TypeElement::class("pkg.Sub").extending(["pkg.Base"]));

    let first = pass.run(&universe).unwrap();
    let second = pass.run(&universe).unwrap();

    assert!(first.snapshot.is_some());
    assert!(second.snapshot.is_none());
    assert_eq!(first.records_emitted, second.records_emitted);
    assert_eq!(pass.query(&|_| true).unwrap().len(), 1);
}

#[test]
fn test_malformed_snapshot_does_not_stop_the_pass() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_in(&temp_dir);
    fs::create_dir_all(&settings.markers.directory).unwrap();
    fs::write(settings.markers.directory.join("0000000000000001.markers"), "[1, 2").unwrap();

    let pass = IndexPass::new(settings);
    let stats = pass
        .run(&ElementUniverse::new().with(TypeElement::class("pkg.T").tagged([BOOT])))
        .unwrap();
    assert_eq!(stats.skipped_snapshots.len(), 1);
    assert_eq!(stats.prior_snapshots, 0);
    assert_eq!(stats.records_emitted, 1);
}

#[test]
fn test_aliases_from_seed_file() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("seeds.txt");
    fs::write(&seed_path, "#aliases\npkg.Store#save(pkg.Item):persist;store\n").unwrap();

    let mut settings = settings_in(&temp_dir);
    settings.collector.seed_file = Some(seed_path);
    let pass = IndexPass::new(settings);

    let save = Element::Method(ExecutableElement {
        owner: Some("pkg.Store".to_string()),
        name: "save".to_string(),
        parameters: vec!["pkg.Item".to_string()],
        ..Default::default()
    });
    pass.run(&ElementUniverse::new().with(save)).unwrap();

    let aliased = pass.query(&|r| r.has_alias("persist")).unwrap();
    assert_eq!(aliased.len(), 1);
    assert!(aliased[0].has_alias("store"));
}
