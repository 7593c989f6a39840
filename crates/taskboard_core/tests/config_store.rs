use taskboard_core::{
    open_store, BackendConfig, ConfigError, SearchMode, StoreConfig, StoreError, DEMO_EMAIL,
};

#[test]
fn load_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");
    std::fs::write(&path, r#"{"searchMode": "pattern"}"#).unwrap();

    let config = StoreConfig::load(&path).unwrap();

    assert_eq!(config.search_mode, SearchMode::Pattern);
    assert_eq!(config.backend, BackendConfig::Memory);
}

#[test]
fn load_reports_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = StoreConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let malformed = StoreConfig::from_json_str(r#"{"backend": {"kind": "cloud"}}"#).unwrap_err();
    assert!(matches!(malformed, ConfigError::Parse(_)));
}

#[test]
fn open_store_seeds_file_backend_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        backend: BackendConfig::File {
            dir: dir.path().join("data"),
        },
        seed_demo: true,
        ..StoreConfig::default()
    };

    let mut store = open_store(&config).unwrap();
    let user = store.current_user().unwrap().unwrap();
    assert_eq!(user.email, DEMO_EMAIL);
    let project = store.projects_for_user(&user.id).unwrap().remove(0);
    store.delete_project(&project.id).unwrap();
    drop(store);

    let store = open_store(&config).unwrap();
    assert!(store.projects_for_user(&user.id).unwrap().is_empty());
    assert_eq!(store.current_user().unwrap().unwrap().id, user.id);
}

#[test]
fn open_store_applies_search_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        backend: BackendConfig::Sqlite {
            path: dir.path().join("board.db"),
        },
        search_mode: SearchMode::Pattern,
        ..StoreConfig::default()
    };

    let store = open_store(&config).unwrap();

    assert_eq!(store.search_mode(), SearchMode::Pattern);
    assert!(matches!(
        store.list_users(Some("(")).unwrap_err(),
        StoreError::InvalidQuery(_)
    ));
}
