//! Test utilities for docs page tests
//!
//! Provides in-memory collaborators that record what the page does to them.

#![allow(dead_code)]

use async_trait::async_trait;
use docat_navigator::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const ORIGIN: &str = "http://localhost:8000";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Repository
// ============================================================================

/// Repository answering from a fixed table.
#[derive(Default)]
pub struct FakeRepository {
    catalogs: HashMap<String, Result<Vec<VersionDescriptor>, RepositoryError>>,
    calls: AtomicUsize,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: &str, catalog: Vec<VersionDescriptor>) -> Self {
        self.catalogs.insert(project.to_string(), Ok(catalog));
        self
    }

    pub fn with_failure(mut self, project: &str, error: RepositoryError) -> Self {
        self.catalogs.insert(project.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocsRepository for FakeRepository {
    async fn get_versions(
        &self,
        project: &str,
    ) -> Result<Vec<VersionDescriptor>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.catalogs.get(project).cloned().unwrap_or_else(|| {
            Err(RepositoryError::Api {
                status: 404,
                message: format!("project '{project}' not found"),
            })
        })
    }

    fn docs_url(&self, location: &Location) -> String {
        docs_url(ORIGIN, "/doc/", location)
    }
}

/// The catalog used throughout: 1.0.0, 1.2.0 (stable), 2.0.0.
pub fn awesome_catalog() -> Vec<VersionDescriptor> {
    vec![
        VersionDescriptor::new("2.0.0"),
        VersionDescriptor::new("1.0.0"),
        VersionDescriptor::new("1.2.0").tag("stable"),
    ]
}

pub fn awesome_repository() -> FakeRepository {
    FakeRepository::new()
        .with_project("awesome", awesome_catalog())
        .with_project("other", vec![VersionDescriptor::new("0.1.0")])
        .with_project("empty", Vec::new())
}

// ============================================================================
// History and banner
// ============================================================================

/// A [`MemoryHistory`] the test can inspect while the page owns it.
#[derive(Clone)]
pub struct SharedHistory(pub Rc<RefCell<MemoryHistory>>);

impl SharedHistory {
    pub fn new(initial: &str) -> Self {
        Self(Rc::new(RefCell::new(MemoryHistory::new(initial))))
    }

    pub fn current(&self) -> String {
        self.0.borrow().current().to_string()
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().entries().to_vec()
    }

    /// Simulate a user back gesture, returning the URL the route now shows.
    pub fn user_back(&self) -> String {
        let mut history = self.0.borrow_mut();
        history.step_back();
        history.current().to_string()
    }

    /// Simulate an entry added behind the page's back.
    pub fn hidden_push(&self, url: &str) {
        self.0.borrow_mut().push(url);
    }
}

impl HistoryBackend for SharedHistory {
    fn push(&mut self, url: &str) {
        self.0.borrow_mut().push(url);
    }

    fn replace(&mut self, url: &str) {
        self.0.borrow_mut().replace(url);
    }

    fn back(&mut self) -> Option<String> {
        self.0.borrow_mut().back()
    }
}

/// History whose back steps complete later, like a browser's.
#[derive(Clone, Default)]
pub struct AsyncHistory {
    pub log: Rc<RefCell<Vec<String>>>,
}

impl HistoryBackend for AsyncHistory {
    fn push(&mut self, url: &str) {
        self.log.borrow_mut().push(format!("push {url}"));
    }

    fn replace(&mut self, url: &str) {
        self.log.borrow_mut().push(format!("replace {url}"));
    }

    fn back(&mut self) -> Option<String> {
        self.log.borrow_mut().push("back".to_string());
        None
    }
}

/// Banner recording every message.
#[derive(Clone, Default)]
pub struct RecordingBanner(pub Rc<RefCell<Vec<Message>>>);

impl RecordingBanner {
    pub fn messages(&self) -> Vec<Message> {
        self.0.borrow().clone()
    }
}

impl MessageBanner for RecordingBanner {
    fn show_message(&mut self, message: Message) {
        self.0.borrow_mut().push(message);
    }
}

// ============================================================================
// Embedded content
// ============================================================================

/// Embedded document with a settable location.
#[derive(Debug, Default)]
pub struct FakeContent {
    pub url: Option<String>,
    pub links: Vec<Hyperlink>,
    pub subscribed: bool,
}

impl FakeContent {
    pub fn at(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn navigate(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }
}

impl EmbeddedContent for FakeContent {
    fn location(&self) -> Option<String> {
        self.url.clone()
    }

    fn visit_links(&mut self, visit: &mut dyn FnMut(&mut Hyperlink)) {
        for link in &mut self.links {
            visit(link);
        }
    }

    fn subscribe_fragment_change(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe_fragment_change(&mut self) {
        self.subscribed = false;
    }
}

// ============================================================================
// Page fixture
// ============================================================================

pub struct Fixture {
    pub page: DocsPage,
    pub history: SharedHistory,
    pub banner: RecordingBanner,
    pub repository: Arc<FakeRepository>,
}

/// A page over [`awesome_repository`], history starting at `initial`.
pub fn fixture(initial: &str) -> Fixture {
    fixture_with(awesome_repository(), initial)
}

pub fn fixture_with(repository: FakeRepository, initial: &str) -> Fixture {
    init_logging();
    let repository = Arc::new(repository);
    let history = SharedHistory::new(initial);
    let banner = RecordingBanner::default();
    let page = DocsPage::new(
        SyncConfig::default(),
        repository.clone(),
        Box::new(history.clone()),
        Box::new(banner.clone()),
    );
    Fixture {
        page,
        history,
        banner,
        repository,
    }
}

/// Mount on `url` and finish the catalog fetch.
pub fn mount_and_resolve(fixture: &mut Fixture, url: &str) {
    fixture.page.mount(url);
    pollster::block_on(fixture.page.resolve());
}

impl Fixture {
    pub fn with_back_guard(mut self, policy: impl BackGuardPolicy + 'static) -> Self {
        self.page = self.page.with_back_guard(policy);
        self
    }
}
