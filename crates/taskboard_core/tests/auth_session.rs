use taskboard_core::{
    Document, DocumentRepository, DocumentStore, ManualClock, MemoryDocumentRepository,
    SearchMode, Session, StoreError, ValidationError,
};

fn new_store() -> DocumentStore<MemoryDocumentRepository, ManualClock> {
    DocumentStore::with_clock(MemoryDocumentRepository::new(), ManualClock::new(1_000, 10))
}

#[test]
fn register_creates_user_and_session() {
    let mut store = new_store();

    let grant = store.register("Ada", "ada@example.com", "secret").unwrap();
    assert_eq!(grant.user.name, "Ada");
    assert!(!grant.token.is_empty());

    let session = store.session().unwrap().unwrap();
    assert_eq!(session.token, grant.token);
    assert_eq!(session.user_id, grant.user.id);
    assert_eq!(store.current_user().unwrap(), Some(grant.user));
}

#[test]
fn register_rejects_email_differing_only_in_case() {
    let mut store = new_store();
    store.register("Ada", "ada@example.com", "secret").unwrap();

    let err = store.register("Imposter", "ADA@Example.COM", "other").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "ADA@Example.COM"));
    assert_eq!(store.list_users(None).unwrap().len(), 1);
}

#[test]
fn register_requires_every_field() {
    let mut store = new_store();

    let err = store.register("  ", "ada@example.com", "secret").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::MissingField("name"))));
    let err = store.register("Ada", "", "secret").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::MissingField("email"))));
    let err = store.register("Ada", "ada@example.com", "").unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::MissingField("password"))));

    assert!(store.snapshot().unwrap().users.is_empty());
}

#[test]
fn login_matches_email_ignoring_case_and_password_exactly() {
    let mut store = new_store();
    let registered = store.register("Ada", "ada@example.com", "Secret").unwrap();
    store.logout().unwrap();

    let grant = store.login("ADA@example.com", "Secret").unwrap();
    assert_eq!(grant.user.id, registered.user.id);
    assert_ne!(grant.token, registered.token);

    for (email, password) in [
        ("ada@example.com", "secret"),
        ("ada@example.com", ""),
        ("bob@example.com", "Secret"),
        ("", ""),
    ] {
        let err = store.login(email, password).unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
    }
}

#[test]
fn failed_login_keeps_existing_session() {
    let mut store = new_store();
    let grant = store.register("Ada", "ada@example.com", "secret").unwrap();

    store.login("ada@example.com", "wrong").unwrap_err();

    assert_eq!(store.session().unwrap().unwrap().token, grant.token);
}

#[test]
fn login_replaces_session_of_previous_user() {
    let mut store = new_store();
    store.register("Ada", "ada@example.com", "a").unwrap();
    let bob = store.register("Bob", "bob@example.com", "b").unwrap();
    assert_eq!(store.current_user().unwrap().unwrap().id, bob.user.id);

    let ada = store.login("ada@example.com", "a").unwrap();
    assert_eq!(store.current_user().unwrap().unwrap().id, ada.user.id);
}

#[test]
fn logout_is_idempotent() {
    let mut store = new_store();
    store.register("Ada", "ada@example.com", "secret").unwrap();

    store.logout().unwrap();
    store.logout().unwrap();

    assert!(store.session().unwrap().is_none());
    assert!(store.current_user().unwrap().is_none());
}

#[test]
fn current_user_is_none_when_session_points_at_missing_user() {
    let mut repo = MemoryDocumentRepository::new();
    let document = Document {
        session: Some(Session {
            token: "token".to_string(),
            user_id: "ghost".to_string(),
        }),
        ..Document::default()
    };
    repo.save_document(&document).unwrap();
    let store = DocumentStore::with_clock(repo, ManualClock::new(0, 1));

    assert!(store.session().unwrap().is_some());
    assert!(store.current_user().unwrap().is_none());
}

#[test]
fn list_users_filters_by_name_or_email_in_insertion_order() {
    let mut store = new_store();
    store.register("Ada Lovelace", "ada@example.com", "a").unwrap();
    store.register("Bob", "bob@lovelace.org", "b").unwrap();
    store.register("Carol", "carol@example.com", "c").unwrap();

    let all = store.list_users(Some("")).unwrap();
    assert_eq!(all.len(), 3);

    let names = store
        .list_users(Some("LOVELACE"))
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Ada Lovelace".to_string(), "Bob".to_string()]);

    assert!(store.list_users(Some("zed")).unwrap().is_empty());
}

#[test]
fn pattern_search_mode_reports_invalid_queries() {
    let mut store = new_store().with_search_mode(SearchMode::Pattern);
    store.register("Ada", "ada@example.com", "a").unwrap();
    store.register("Adam", "adam@example.com", "b").unwrap();

    let exact = store.list_users(Some("^ada$")).unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].name, "Ada");

    let err = store.list_users(Some("[")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidQuery(_)));
}
