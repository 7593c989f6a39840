use crate::model::ids::TaskId;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::user::{AuthGrant, Session};
use crate::repo::DocumentRepository;
use crate::service::store::{Deleted, StoreError, StoreResult};
use crate::service::task_service::TaskListQuery;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const NO_BODY: Option<&()> = None;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
    password: &'a str,
}

/// Board client backed by a remote API instead of a local document.
///
/// Only the session lives in `session_repo`; users, projects and tasks stay
/// on the server.
pub struct RemoteStore<R: DocumentRepository> {
    agent: ureq::Agent,
    base_url: String,
    session_repo: R,
}

impl<R: DocumentRepository> RemoteStore<R> {
    pub fn new(base_url: impl Into<String>, session_repo: R) -> Self {
        Self::with_timeout(base_url, session_repo, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, session_repo: R, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent,
            base_url,
            session_repo,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn repository(&self) -> &R {
        &self.session_repo
    }

    /// Returns the locally remembered session.
    pub fn session(&self) -> StoreResult<Option<Session>> {
        Ok(self.session_repo.load_document()?.session)
    }

    /// `POST /auth/register`; a `409` means the email is taken.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> StoreResult<AuthGrant> {
        let body = Credentials {
            name: Some(name),
            email,
            password,
        };
        let grant: AuthGrant = self
            .send("POST", "/auth/register", &[], Some(&body))
            .map_err(|err| match err {
                StoreError::Rejected { status: 409, .. } => {
                    StoreError::DuplicateEmail(email.to_string())
                }
                other => other,
            })?;
        self.remember(&grant)?;
        Ok(grant)
    }

    /// `POST /auth/login`; a `401` means the credentials did not match.
    pub fn login(&mut self, email: &str, password: &str) -> StoreResult<AuthGrant> {
        let body = Credentials {
            name: None,
            email,
            password,
        };
        let grant: AuthGrant = self
            .send("POST", "/auth/login", &[], Some(&body))
            .map_err(|err| match err {
                StoreError::Unauthorized(_) => StoreError::InvalidCredentials,
                other => other,
            })?;
        self.remember(&grant)?;
        Ok(grant)
    }

    /// Drops the local session; the server keeps no logout state.
    pub fn logout(&mut self) -> StoreResult<()> {
        self.forget()
    }

    /// `GET /tasks` with the filters as query parameters.
    pub fn list_tasks(&mut self, query: &TaskListQuery) -> StoreResult<Vec<Task>> {
        let mut params = vec![("projectId", query.project_id.as_str())];
        if let Some(status) = query.status {
            params.push(("status", status.as_str()));
        }
        if let Some(category) = query.category.as_deref().filter(|value| !value.is_empty()) {
            params.push(("category", category));
        }
        if let Some(text) = query.query.as_deref().filter(|value| !value.trim().is_empty()) {
            params.push(("q", text));
        }
        self.send("GET", "/tasks", &params, NO_BODY)
    }

    /// `POST /tasks`; the server fills in ids, creator and timestamps.
    pub fn create_task(&mut self, input: &NewTask) -> StoreResult<Task> {
        self.send("POST", "/tasks", &[], Some(input))
    }

    /// `PATCH /tasks/{id}` with only the present fields.
    pub fn update_task(&mut self, task_id: &str, patch: &TaskPatch) -> StoreResult<Task> {
        self.send("PATCH", &task_path(task_id), &[], Some(patch))
            .map_err(|err| not_found_as_task(err, task_id))
    }

    /// `DELETE /tasks/{id}`; a `404` counts as an already-deleted task.
    pub fn delete_task(&mut self, task_id: &str) -> StoreResult<Deleted> {
        match self.dispatch("DELETE", &task_path(task_id), &[], NO_BODY) {
            Ok(_) => Ok(Deleted {
                existed: true,
                cascaded_tasks: 0,
            }),
            Err(StoreError::Rejected { status: 404, .. }) => Ok(Deleted {
                existed: false,
                cascaded_tasks: 0,
            }),
            Err(err) => Err(err),
        }
    }

    fn send<B: Serialize, T: DeserializeOwned>(
        &mut self,
        method: &str,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> StoreResult<T> {
        let response = self.dispatch(method, path, params, body)?;
        response.into_json::<T>().map_err(|err| {
            StoreError::Network(format!("undecodable response from {method} {path}: {err}"))
        })
    }

    fn dispatch<B: Serialize>(
        &mut self,
        method: &str,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> StoreResult<ureq::Response> {
        let started_at = Instant::now();
        let mut request = self
            .agent
            .request(method, &format!("{}{path}", self.base_url))
            .set("Accept", "application/json");
        for (name, value) in params {
            request = request.query(name, value);
        }
        if let Some(session) = self.session()? {
            request = request.set("Authorization", &format!("Bearer {}", session.token));
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                info!(
                    "event=remote_request module=remote status=ok method={method} path={path} http_status={} duration_ms={}",
                    response.status(),
                    started_at.elapsed().as_millis()
                );
                Ok(response)
            }
            Err(ureq::Error::Status(status, response)) => {
                warn!(
                    "event=remote_request module=remote status=error method={method} path={path} http_status={status} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                let message = error_message(status, response);
                if status == 401 {
                    self.forget()?;
                    return Err(StoreError::Unauthorized(message));
                }
                Err(StoreError::Rejected { status, message })
            }
            Err(ureq::Error::Transport(err)) => {
                warn!(
                    "event=remote_request module=remote status=error method={method} path={path} error_code=transport duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::Network(err.to_string()))
            }
        }
    }

    fn remember(&mut self, grant: &AuthGrant) -> StoreResult<()> {
        let mut document = self.session_repo.load_document()?;
        document.session = Some(Session {
            token: grant.token.clone(),
            user_id: grant.user.id.clone(),
        });
        self.session_repo.save_document(&document)?;
        Ok(())
    }

    fn forget(&mut self) -> StoreResult<()> {
        let mut document = self.session_repo.load_document()?;
        if document.session.take().is_some() {
            self.session_repo.save_document(&document)?;
            info!("event=remote_logout module=remote status=ok");
        }
        Ok(())
    }
}

fn task_path(task_id: &str) -> String {
    format!("/tasks/{task_id}")
}

fn not_found_as_task(err: StoreError, task_id: &str) -> StoreError {
    match err {
        StoreError::Rejected { status: 404, .. } => StoreError::TaskNotFound(TaskId::from(task_id)),
        other => other,
    }
}

/// Reads `{"error": "..."}`, falling back to the bare status.
fn error_message(status: u16, response: ureq::Response) -> String {
    response
        .into_json::<ErrorBody>()
        .map(|body| body.error)
        .unwrap_or_else(|_| format!("HTTP {status}"))
}
