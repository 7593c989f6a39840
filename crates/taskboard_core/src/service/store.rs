//! Document store core: error type, construction and load/commit helpers.
//!
//! # Responsibility
//! - Own the persistence backend and the clock.
//! - Translate lower-layer failures into `StoreError`.
//!
//! # Invariants
//! - Mutating operations take `&mut self`, so one load-mutate-save cycle
//!   completes before the next begins.
//! - A failed operation never writes.

use crate::model::document::Document;
use crate::model::ids::{touch, Clock, EpochMs, ProjectId, SystemClock, TaskId};
use crate::model::task::TaskValidationError;
use crate::repo::{DocumentRepository, RepoError};
use crate::search::matcher::{InvalidQueryError, SearchMode, TextMatcher};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was blank.
    MissingField(&'static str),
    Task(TaskValidationError),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is required"),
            Self::Task(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingField(_) => None,
            Self::Task(err) => Some(err),
        }
    }
}

/// Failure of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Another user already registered this email (case-insensitive).
    DuplicateEmail(String),
    /// No user matches the email/password pair.
    InvalidCredentials,
    ProjectNotFound(ProjectId),
    TaskNotFound(TaskId),
    Validation(ValidationError),
    InvalidQuery(InvalidQueryError),
    Repo(RepoError),
    /// The remote API refused the session token; the local session is gone.
    Unauthorized(String),
    /// The remote API could not be reached or answered with garbage.
    Network(String),
    /// The remote API answered with a non-success status.
    Rejected { status: u16, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail(email) => write!(f, "email already registered: {email}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidQuery(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Unauthorized(message) => write!(f, "unauthorized: {message}"),
            Self::Network(message) => write!(f, "network failure: {message}"),
            Self::Rejected { status, message } => {
                write!(f, "request rejected with status {status}: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidQuery(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(ValidationError::Task(value))
    }
}

impl From<InvalidQueryError> for StoreError {
    fn from(value: InvalidQueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

/// Success marker returned by delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deleted {
    /// Whether the target entity existed before the call.
    pub existed: bool,
    /// Tasks removed alongside a deleted project.
    pub cascaded_tasks: usize,
}

/// Single source of truth for users, session, projects and tasks.
pub struct DocumentStore<R: DocumentRepository, C: Clock = SystemClock> {
    pub(crate) repo: R,
    clock: C,
    search_mode: SearchMode,
}

impl<R: DocumentRepository> DocumentStore<R> {
    /// Creates a store over `repo` using the wall clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: DocumentRepository, C: Clock> DocumentStore<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            search_mode: SearchMode::default(),
        }
    }

    /// Sets how `query` strings are interpreted by list operations.
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns a full snapshot of the persisted document.
    pub fn snapshot(&self) -> StoreResult<Document> {
        self.load()
    }

    pub(crate) fn load(&self) -> StoreResult<Document> {
        Ok(self.repo.load_document()?)
    }

    pub(crate) fn commit(&mut self, document: &Document) -> StoreResult<()> {
        Ok(self.repo.save_document(document)?)
    }

    pub(crate) fn now(&self) -> EpochMs {
        self.clock.now_ms()
    }

    pub(crate) fn matcher(&self, query: Option<&str>) -> StoreResult<TextMatcher> {
        Ok(TextMatcher::new(query, self.search_mode)?)
    }

    /// Refreshes `updatedAt` on the project, if it still exists.
    pub(crate) fn touch_project(document: &mut Document, project_id: &str, now: EpochMs) {
        if let Some(project) = document.project_mut(project_id) {
            project.updated_at = touch(project.updated_at, now);
        }
    }
}

/// Rejects blank required text input.
pub(crate) fn require_text(field: &'static str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}
