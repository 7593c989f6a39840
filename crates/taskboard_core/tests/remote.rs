use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use taskboard_core::{
    Document, DocumentRepository, MemoryDocumentRepository, NewTask, RemoteStore, Session,
    StoreError, TaskListQuery, TaskPatch, TaskStatus,
};

const TASK_JSON: &str = r#"{"id":"t1","projectId":"p1","title":"Auth API","status":"in_progress","progress":40,"assignees":["u1"],"createdBy":"u1","createdAt":10,"updatedAt":20}"#;
const GRANT_JSON: &str =
    r#"{"token":"tok-1","user":{"id":"u1","name":"Ada","email":"ada@example.com"}}"#;

#[derive(Debug)]
struct Recorded {
    method: String,
    target: String,
    authorization: Option<String>,
    body: String,
}

/// Answers one canned response per connection, in order, then stops.
struct CannedApi {
    base_url: String,
    handle: JoinHandle<Vec<Recorded>>,
}

impl CannedApi {
    fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(&stream);

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap().to_string();
                let target = parts.next().unwrap().to_string();

                let mut authorization = None;
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    let (name, value) = line.split_once(':').unwrap();
                    match name.to_ascii_lowercase().as_str() {
                        "authorization" => authorization = Some(value.trim().to_string()),
                        "content-length" => content_length = value.trim().parse().unwrap(),
                        _ => {}
                    }
                }
                let mut request_body = vec![0; content_length];
                reader.read_exact(&mut request_body).unwrap();

                recorded.push(Recorded {
                    method,
                    target,
                    authorization,
                    body: String::from_utf8(request_body).unwrap(),
                });

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                (&stream).write_all(response.as_bytes()).unwrap();
            }
            recorded
        });

        Self { base_url, handle }
    }

    fn finish(self) -> Vec<Recorded> {
        self.handle.join().unwrap()
    }
}

fn logged_in_repo(token: &str) -> MemoryDocumentRepository {
    let mut repo = MemoryDocumentRepository::new();
    let document = Document {
        session: Some(Session {
            token: token.to_string(),
            user_id: "u1".to_string(),
        }),
        ..Document::default()
    };
    repo.save_document(&document).unwrap();
    repo
}

#[test]
fn login_keeps_token_and_sends_it_on_later_requests() {
    let api = CannedApi::start(vec![(200, GRANT_JSON), (200, "[]")]);
    let mut remote = RemoteStore::new(api.base_url.clone(), MemoryDocumentRepository::new());

    let grant = remote.login("ada@example.com", "secret").unwrap();
    assert_eq!(grant.token, "tok-1");
    assert_eq!(grant.user.name, "Ada");
    assert_eq!(
        remote.session().unwrap(),
        Some(Session {
            token: "tok-1".to_string(),
            user_id: "u1".to_string(),
        })
    );

    let tasks = remote
        .list_tasks(
            &TaskListQuery::for_project("p1")
                .with_status(TaskStatus::InProgress)
                .with_category(""),
        )
        .unwrap();
    assert!(tasks.is_empty());

    let requests = api.finish();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/api/auth/login");
    assert_eq!(requests[0].authorization, None);
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"email": "ada@example.com", "password": "secret"})
    );

    assert_eq!(requests[1].method, "GET");
    assert_eq!(requests[1].target, "/api/tasks?projectId=p1&status=in_progress");
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer tok-1"));
}

#[test]
fn unauthorized_response_clears_local_session() {
    let api = CannedApi::start(vec![(401, r#"{"error":"token expired"}"#)]);
    let mut remote = RemoteStore::new(api.base_url.clone(), logged_in_repo("stale"));

    let err = remote
        .list_tasks(&TaskListQuery::for_project("p1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Unauthorized(message) if message == "token expired"));
    assert_eq!(remote.session().unwrap(), None);

    let requests = api.finish();
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer stale"));
}

#[test]
fn failed_login_is_invalid_credentials() {
    let api = CannedApi::start(vec![(401, r#"{"error":"Invalid credentials"}"#)]);
    let mut remote = RemoteStore::new(api.base_url.clone(), logged_in_repo("old"));

    let err = remote.login("ada@example.com", "wrong").unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));
    assert_eq!(remote.session().unwrap(), None);
    api.finish();
}

#[test]
fn register_conflict_is_duplicate_email() {
    let api = CannedApi::start(vec![(409, r#"{"error":"Email already registered"}"#)]);
    let mut remote = RemoteStore::new(api.base_url.clone(), MemoryDocumentRepository::new());

    let err = remote.register("Ada", "ADA@example.com", "pw").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "ADA@example.com"));
    assert_eq!(remote.session().unwrap(), None);

    let requests = api.finish();
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["name"], "Ada");
}

#[test]
fn task_writes_map_to_post_patch_and_delete() {
    let api = CannedApi::start(vec![
        (200, TASK_JSON),
        (200, TASK_JSON),
        (200, r#"{"ok":true}"#),
        (404, r#"{"error":"Task not found"}"#),
    ]);
    let mut remote = RemoteStore::new(api.base_url.clone(), logged_in_repo("tok-9"));

    let created = remote.create_task(&NewTask::new("p1", "Auth API")).unwrap();
    assert_eq!(created.id, "t1");
    assert_eq!(created.status, TaskStatus::InProgress);
    assert_eq!(created.category, "");

    let patch = TaskPatch {
        progress: Some(40),
        ..TaskPatch::status(TaskStatus::InProgress)
    };
    let updated = remote.update_task("t1", &patch).unwrap();
    assert_eq!(updated.progress, 40);

    assert!(remote.delete_task("t1").unwrap().existed);
    assert!(!remote.delete_task("t1").unwrap().existed);

    let requests = api.finish();
    let methods: Vec<_> = requests
        .iter()
        .map(|request| format!("{} {}", request.method, request.target))
        .collect();
    assert_eq!(
        methods,
        vec![
            "POST /api/tasks",
            "PATCH /api/tasks/t1",
            "DELETE /api/tasks/t1",
            "DELETE /api/tasks/t1",
        ]
    );
    let created_body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(created_body["projectId"], "p1");
    assert!(created_body.get("assignees").is_none());
    let patch_body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(
        patch_body,
        serde_json::json!({"status": "in_progress", "progress": 40})
    );
    assert!(requests
        .iter()
        .all(|request| request.authorization.as_deref() == Some("Bearer tok-9")));
}

#[test]
fn error_bodies_are_surfaced() {
    let api = CannedApi::start(vec![
        (404, r#"{"error":"Task not found"}"#),
        (422, r#"{"error":"title is required"}"#),
        (500, "<html>oops</html>"),
    ]);
    let mut remote = RemoteStore::new(api.base_url.clone(), logged_in_repo("tok"));

    let err = remote
        .update_task("missing", &TaskPatch::status(TaskStatus::Done))
        .unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(id) if id == "missing"));

    let err = remote.create_task(&NewTask::new("p1", " ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Rejected { status: 422, message } if message == "title is required"
    ));

    let err = remote
        .list_tasks(&TaskListQuery::for_project("p1"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Rejected { status: 500, message } if message == "HTTP 500"
    ));

    assert!(remote.session().unwrap().is_some());
    api.finish();
}

#[test]
fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut remote = RemoteStore::new(base_url, logged_in_repo("tok"));
    let err = remote
        .list_tasks(&TaskListQuery::for_project("p1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
    assert!(remote.session().unwrap().is_some());
}
