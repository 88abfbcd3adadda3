use quotebox_cache::{KeyValueStore, SqliteStore};
use tempfile::TempDir;

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quotebox.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("quotes", r#"[{"text":"a","category":"b"}]"#).unwrap();
        store.set("lastCategory", "b").unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(
        store.get("quotes").unwrap().as_deref(),
        Some(r#"[{"text":"a","category":"b"}]"#)
    );
    assert_eq!(store.get("lastCategory").unwrap().as_deref(), Some("b"));
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn test_open_creates_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("fresh.db")).unwrap();
    assert!(store.is_empty().unwrap());
    assert_eq!(store.get("quotes").unwrap(), None);
}
