//! Unit tests for the configuration store

use super::*;

fn path(name: &str) -> SectionPath {
    SectionPath::parse(name).unwrap()
}

#[test]
fn test_load_single_document() {
    let store = ConfigStore::load_str(
        r#"
[bsf]
debug = 1

[bsf.DRMS]
implementation = slurm
"#,
    )
    .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.source_names(), &["<string>".to_string()]);
    assert_eq!(
        store.get_section(&path("bsf.DRMS")).unwrap().get("implementation"),
        Some("slurm")
    );
}

#[test]
fn test_merge_precedence_is_per_key() {
    let a = Document::new("a.ini", "[p.q]\nmemory_hard = 4G\nqueue = shortq\n");
    let b = Document::new("b.ini", "[p.q]\nthreads = 4\n");
    let store = ConfigStore::load(&[a, b]).unwrap();

    let section = store.get_section(&path("p.q")).unwrap();
    assert_eq!(section.get("memory_hard"), Some("4G"));
    assert_eq!(section.get("queue"), Some("shortq"));
    assert_eq!(section.get("threads"), Some("4"));
}

#[test]
fn test_later_source_wins_on_conflict() {
    let a = Document::new("a.ini", "[p.q]\nmemory_hard = 4G\n");
    let b = Document::new("b.ini", "[p.q]\nmemory_hard = 16G\n");

    let store = ConfigStore::load(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(
        store.get_section(&path("p.q")).unwrap().get("memory_hard"),
        Some("16G")
    );

    let reversed = ConfigStore::load(&[b, a]).unwrap();
    assert_eq!(
        reversed.get_section(&path("p.q")).unwrap().get("memory_hard"),
        Some("4G")
    );
}

#[test]
fn test_duplicate_keys_across_documents_are_overrides() {
    let a = Document::new("a.ini", "[x]\nk = 1\n");
    let b = Document::new("b.ini", "[x]\nk = 2\n");
    assert!(ConfigStore::load(&[a, b]).is_ok());
}

#[test]
fn test_parse_error_aborts_load() {
    let good = Document::new("good.ini", "[x]\nk = 1\n");
    let bad = Document::new("bad.ini", "[x\n");
    let err = ConfigStore::load(&[good, bad]).unwrap_err();
    assert!(matches!(err, BsfError::Parse { ref source_name, .. } if source_name == "bad.ini"));
}

#[test]
fn test_repeated_header_in_one_document_overrides() {
    let store = ConfigStore::load_str("[a]\nx = 1\ny = 1\n[a]\nx = 2\n").unwrap();
    let section = store.get_section(&path("a")).unwrap();
    assert_eq!(section.get("x"), Some("2"));
    assert_eq!(section.get("y"), Some("1"));
}

#[test]
fn test_get_section_is_exact() {
    let store = ConfigStore::load_str("[a.b]\nx = 1\n").unwrap();
    assert!(store.get_section(&path("a.b")).is_some());
    assert!(store.get_section(&path("a")).is_none());
    assert!(store.get_section(&path("a.b.c")).is_none());
}

#[test]
fn test_empty_section_exists() {
    let store = ConfigStore::load_str("[toolX.Stage.substage]\n").unwrap();
    let section = store.get_section(&path("toolX.Stage.substage")).unwrap();
    assert!(section.is_empty());
    assert!(store.has_section(&path("toolX.Stage.substage")));
    assert!(store.require_section(&path("toolX.Stage.substage")).is_ok());
}

#[test]
fn test_require_section_names_sources() {
    let store = ConfigStore::load(&[Document::new("site.ini", "[a]\n")]).unwrap();
    let err = store.require_section(&path("b")).unwrap_err();
    match err {
        BsfError::SectionNotFound { section, sources } => {
            assert_eq!(section, "b");
            assert_eq!(sources, "site.ini");
        },
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_has_option_does_not_walk() {
    let store = ConfigStore::load_str("[a]\nx = 1\n[a.b]\n").unwrap();
    assert!(store.has_option(&path("a"), "x"));
    assert!(!store.has_option(&path("a.b"), "x"));
    assert!(!store.has_option(&path("zzz"), "x"));
}

#[test]
fn test_section_order_is_first_appearance() {
    let a = Document::new("a.ini", "[z]\n[m]\n");
    let b = Document::new("b.ini", "[a]\n[z]\nk = v\n");
    let store = ConfigStore::load(&[a, b]).unwrap();
    let names: Vec<String> = store.section_paths().map(|p| p.to_string()).collect();
    assert_eq!(names, vec!["z", "m", "a"]);
}

#[test]
fn test_merge_stores() {
    let base = ConfigStore::load(&[Document::new("base.ini", "[a]\nx = 1\ny = 1\n")]).unwrap();
    let top = ConfigStore::load(&[Document::new("top.ini", "[a]\nx = 2\n[b]\n")]).unwrap();

    let merged = base.merge(&top);
    let section = merged.get_section(&path("a")).unwrap();
    assert_eq!(section.get("x"), Some("2"));
    assert_eq!(section.get("y"), Some("1"));
    assert!(merged.has_section(&path("b")));
    assert_eq!(merged.source_names(), &["base.ini".to_string(), "top.ini".to_string()]);

    // Inputs are untouched
    assert_eq!(base.get_section(&path("a")).unwrap().get("x"), Some("1"));
}

#[test]
fn test_empty_store() {
    let store = ConfigStore::empty();
    assert!(store.is_empty());
    assert_eq!(store.sections().count(), 0);
}

#[test]
fn test_store_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigStore>();
}
