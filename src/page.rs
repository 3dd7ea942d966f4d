//! The docs page.
//!
//! [`DocsPage`] reconciles three state sources into one canonical
//! [`Location`]: the outer route, the embedded docs content and the history
//! stack. Every input is an event handler:
//!
//! | Event | Handler | History mode |
//! |-------|---------|--------------|
//! | view mount | [`DocsPage::mount`] | replace |
//! | route change | [`DocsPage::on_route_changed`] | replace |
//! | version selected | [`DocsPage::switch_version`] | push |
//! | UI hidden / shown | [`DocsPage::set_hide_ui`] | push |
//! | embedded content loaded | [`DocsPage::on_embedded_load`] | push |
//! | embedded fragment change | [`DocsPage::on_embedded_fragment_change`] | push |
//! | history pop | [`DocsPage::on_history_pop`] | skip |
//!
//! All of them funnel into one pipeline: the store accepts or refuses the
//! candidate, an accepted change is reflected into history, and the
//! lifecycle decides whether a catalog fetch is needed (see
//! [`plan_for_location`]).
//!
//! Fetching is the only suspension point. The page hands out a
//! [`ResolutionTicket`] when a project needs its catalog; the host awaits
//! the repository and reports back through [`DocsPage::complete_resolution`],
//! or simply calls [`DocsPage::resolve`].
//!
//! ```no_run
//! use docat_navigator::{DocsPage, HttpRepository, MemoryHistory, NoBanner, SyncConfig};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let config = SyncConfig::default();
//! let repository = Arc::new(HttpRepository::new(&config));
//! let mut page = DocsPage::new(
//!     config,
//!     repository,
//!     Box::new(MemoryHistory::default()),
//!     Box::new(NoBanner),
//! );
//!
//! page.mount("/awesome/latest/index.html");
//! page.resolve().await;
//! println!("{:?}", page.view());
//! # }
//! ```

use crate::config::SyncConfig;
use crate::embedded::{EmbeddedContent, EmbeddedPath, LocationWatcher};
use crate::error::DocsError;
use crate::guards::{BackGuardPolicy, SingleHiddenEntry};
use crate::history::HistoryBackend;
use crate::lifecycle::{plan_for_location, PageState, Step};
use crate::location::{HistoryMode, Location, LocationChange, LocationStore};
use crate::logging::docs_log;
use crate::notify::{MessageBanner, StalenessNotifier};
use crate::repository::DocsRepository;
use crate::resolve::{fetch_catalog, resolve_version, Resolution, ResolutionTicket, ResolutionTracker};
use crate::route::RouteCodec;
use crate::version::VersionDescriptor;
use crate::view::{document_title, DocsView, DocumentControls, EmbeddedSource, PageView};
use std::sync::Arc;

/// Navigation-state synchronizer of one docs view.
pub struct DocsPage {
    config: SyncConfig,
    codec: RouteCodec,
    store: LocationStore,
    state: PageState,
    tracker: ResolutionTracker,
    /// Catalog of the last successfully fetched project.
    catalog: Option<(String, Vec<VersionDescriptor>)>,
    repository: Arc<dyn DocsRepository>,
    history: Box<dyn HistoryBackend>,
    banner: Box<dyn MessageBanner>,
    back_guard: Box<dyn BackGuardPolicy>,
    watcher: LocationWatcher,
    notifier: StalenessNotifier,
    /// (project, version) the embedded content was last loaded for.
    content_key: Option<(String, String)>,
    source: Option<EmbeddedSource>,
    generation: u64,
    /// Programmatic back steps whose pop has not arrived yet.
    pending_programmatic_pops: usize,
}

impl DocsPage {
    /// Create a page with the default back-guard.
    pub fn new(
        config: SyncConfig,
        repository: Arc<dyn DocsRepository>,
        history: Box<dyn HistoryBackend>,
        banner: Box<dyn MessageBanner>,
    ) -> Self {
        Self {
            codec: RouteCodec::new(config.index_page.clone()),
            watcher: LocationWatcher::new(&config),
            notifier: StalenessNotifier::new(config.stale_message.clone()),
            config,
            store: LocationStore::new(),
            state: PageState::Uninitialized,
            tracker: ResolutionTracker::new(),
            catalog: None,
            repository,
            history,
            banner,
            back_guard: Box::new(SingleHiddenEntry),
            content_key: None,
            source: None,
            generation: 0,
            pending_programmatic_pops: 0,
        }
    }

    /// Use `policy` to compensate back gestures.
    pub fn with_back_guard(mut self, policy: impl BackGuardPolicy + 'static) -> Self {
        self.back_guard = Box::new(policy);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The canonical location.
    pub fn location(&self) -> &Location {
        self.store.current()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// The configuration the page was created with.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The repository catalogs are fetched from.
    pub fn repository(&self) -> &Arc<dyn DocsRepository> {
        &self.repository
    }

    /// The catalog fetch the page is waiting for, if any.
    pub fn in_flight(&self) -> Option<&ResolutionTicket> {
        self.tracker.in_flight()
    }

    /// The embedded content watcher.
    pub fn watcher(&self) -> &LocationWatcher {
        &self.watcher
    }

    // ========================================================================
    // Route and user events
    // ========================================================================

    /// The view was mounted on `url`.
    pub fn mount(&mut self, url: &str) -> bool {
        docs_log!(debug, "Mounting docs page on '{}'", url);
        self.on_route_changed(url)
    }

    /// The outer route changed to `url`.
    pub fn on_route_changed(&mut self, url: &str) -> bool {
        let candidate = self.codec.parse(url);
        self.update_location(candidate, HistoryMode::Replace)
    }

    /// The user picked another version.
    pub fn switch_version(&mut self, version: &str) -> bool {
        let candidate = self.store.current().at_version(version);
        self.update_location(candidate, HistoryMode::Push)
    }

    /// The user hid or restored the page UI.
    pub fn set_hide_ui(&mut self, hide_ui: bool) -> bool {
        let candidate = self.store.current().clone().with_hide_ui(hide_ui);
        self.update_location(candidate, HistoryMode::Push)
    }

    /// Feed `candidate` through the store, history and lifecycle.
    ///
    /// Returns `false` if the store refused it as identical.
    pub fn update_location(&mut self, candidate: Location, mode: HistoryMode) -> bool {
        let Some(change) = self.store.update(candidate, mode) else {
            return false;
        };
        self.reflect(&change);
        self.advance(&change.to);
        true
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Fetch the catalog the page is waiting for and apply it.
    ///
    /// Does nothing when no fetch is needed.
    pub async fn resolve(&mut self) -> bool {
        let Some(ticket) = self.tracker.in_flight().cloned() else {
            return false;
        };
        let repository = Arc::clone(&self.repository);
        let outcome = fetch_catalog(repository.as_ref(), ticket.project()).await;
        self.complete_resolution(&ticket, outcome)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `false` and leaves the page untouched when the ticket was
    /// superseded while the fetch was in flight.
    pub fn complete_resolution(
        &mut self,
        ticket: &ResolutionTicket,
        outcome: Result<Vec<VersionDescriptor>, DocsError>,
    ) -> bool {
        if !self.tracker.finish(ticket) {
            docs_log!(
                warn,
                "Discarding stale resolution #{} for '{}' (showing '{}')",
                ticket.id(),
                ticket.project(),
                self.store.current().project
            );
            return false;
        }

        let token = self.store.current().version.clone();
        let resolved = outcome.and_then(|catalog| {
            self.catalog = Some((ticket.project().to_string(), catalog.clone()));
            resolve_version(ticket.project(), catalog, &token)
        });

        match self.state.after_resolution(ticket, resolved) {
            Some(PageState::Ready { resolution }) => self.settle(resolution),
            Some(next) => self.transition(next),
            None => {
                docs_log!(warn, "Resolution #{} arrived in state {}", ticket.id(), self.state.name());
                return false;
            }
        }
        true
    }

    fn advance(&mut self, location: &Location) {
        let catalog_project = self.catalog.as_ref().map(|(project, _)| project.as_str());
        match plan_for_location(&self.state, location, catalog_project) {
            Step::Resolve => {
                let ticket = self.tracker.start(&location.project);
                self.transition(PageState::ResolvingVersion { ticket });
            }
            Step::Revalidate => {
                self.tracker.cancel();
                let catalog = self
                    .catalog
                    .as_ref()
                    .map(|(_, catalog)| catalog.clone())
                    .unwrap_or_default();
                match resolve_version(&location.project, catalog, &location.version) {
                    Ok(resolution) => self.settle(resolution),
                    Err(error) => self.transition(PageState::Failed { error }),
                }
            }
            Step::Fail(error) => {
                self.tracker.cancel();
                self.transition(PageState::Failed { error });
            }
            Step::Stay => {
                docs_log!(trace, "Staying in {}", self.state.name());
            }
        }
    }

    /// Enter `Ready`, pin the concrete version and reload content if needed.
    fn settle(&mut self, resolution: Resolution) {
        let project = self.store.current().project.clone();
        self.notifier.check(&project, &resolution, self.banner.as_mut());

        let concrete = resolution.version.clone();
        self.transition(PageState::Ready { resolution });

        if self.store.current().version != concrete {
            // alias or tag in the route: same entry, concrete name
            let candidate = self.store.current().at_version(concrete);
            if let Some(change) = self.store.update(candidate, HistoryMode::Replace) {
                self.reflect(&change);
            }
        }

        self.refresh_content();
    }

    fn transition(&mut self, next: PageState) {
        if let PageState::Failed { error } = &next {
            docs_log!(error, "Docs page failed: {}", error);
        }
        docs_log!(info, "Docs page {} → {}", self.state.name(), next.name());
        self.state = next;
    }

    fn reflect(&mut self, change: &LocationChange) {
        let url = RouteCodec::to_url(&change.to);
        match change.mode {
            HistoryMode::Push => self.history.push(&url),
            HistoryMode::Replace => self.history.replace(&url),
            HistoryMode::Skip => {}
        }
    }

    fn refresh_content(&mut self) {
        let location = self.store.current();
        let key = (location.project.clone(), location.version.clone());
        if self.content_key.as_ref() == Some(&key) {
            return;
        }

        self.generation += 1;
        let url = self.repository.docs_url(location);
        docs_log!(debug, "Loading embedded content #{} from '{}'", self.generation, url);
        self.source = Some(EmbeddedSource {
            url,
            generation: self.generation,
        });
        self.content_key = Some(key);
        self.watcher.content_reloading();
    }

    // ========================================================================
    // Embedded content
    // ========================================================================

    /// The embedded content finished loading.
    pub fn on_embedded_load(&mut self, content: &mut dyn EmbeddedContent) -> bool {
        let observed = self.watcher.on_load(content);
        let changed = observed.is_some_and(|path| self.fold_embedded(path));
        self.watcher.rearm(content);
        changed
    }

    /// The embedded content reported a fragment change.
    pub fn on_embedded_fragment_change(&mut self, content: &mut dyn EmbeddedContent) -> bool {
        let observed = self.watcher.on_fragment_change(content);
        let changed = observed.is_some_and(|path| self.fold_embedded(path));
        self.watcher.rearm(content);
        changed
    }

    /// The embedded content was removed by the host.
    ///
    /// Fragment changes are ignored until the next load.
    pub fn on_embedded_unloaded(&mut self) {
        docs_log!(debug, "Embedded content unloaded");
        self.watcher.content_unloaded();
    }

    fn fold_embedded(&mut self, path: EmbeddedPath) -> bool {
        let candidate = Location {
            project: path.project,
            version: path.version,
            page: path.page,
            fragment: path.fragment,
            hide_ui: self.store.current().hide_ui,
        };
        let Some(change) = self.store.update(candidate, HistoryMode::Push) else {
            return false;
        };
        if change.changes_content() {
            self.adopt_content(&change.to);
        }
        self.reflect(&change);
        self.advance(&change.to);
        true
    }

    /// Point the source at what the content already shows, without a reload.
    fn adopt_content(&mut self, location: &Location) {
        let url = self.repository.docs_url(location);
        docs_log!(debug, "Embedded content moved on its own to '{}'", url);
        self.source = Some(EmbeddedSource {
            url,
            generation: self.generation,
        });
        self.content_key = Some((location.project.clone(), location.version.clone()));
    }

    // ========================================================================
    // History
    // ========================================================================

    /// A history pop moved the outer route to `route_url`.
    ///
    /// Takes the back-guard's extra steps, then reconciles the location with
    /// wherever history ended up, without recording anything.
    pub fn on_history_pop(&mut self, route_url: &str) -> bool {
        let mut target = route_url.to_string();

        if self.pending_programmatic_pops > 0 {
            self.pending_programmatic_pops -= 1;
            docs_log!(debug, "Pop to '{}' caused by compensation", route_url);
        } else {
            let steps = self.back_guard.extra_back_steps(self.store.current());
            if steps > 0 {
                docs_log!(
                    warn,
                    "Compensating back gesture with {} extra step(s) ({})",
                    steps,
                    self.back_guard.name()
                );
            }
            for _ in 0..steps {
                match self.history.back() {
                    Some(url) => target = url,
                    None => self.pending_programmatic_pops += 1,
                }
            }
        }

        let candidate = self.codec.parse(&target);
        self.update_location(candidate, HistoryMode::Skip)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Document title, `"{project} | {suffix}"`.
    pub fn title(&self) -> String {
        document_title(&self.store.current().project, &self.config.title_suffix)
    }

    /// Source the embedded content should be loaded from.
    pub fn embedded_source(&self) -> Option<&EmbeddedSource> {
        self.source.as_ref()
    }

    /// What to render right now.
    pub fn view(&self) -> PageView {
        let resolution = match &self.state {
            PageState::Failed { .. } => return PageView::NotFound,
            PageState::Uninitialized | PageState::ResolvingVersion { .. } => {
                return PageView::Loading
            }
            PageState::Ready { resolution } => resolution,
        };
        let Some(source) = self.source.clone() else {
            return PageView::Loading;
        };

        let location = self.store.current();
        let controls = (!location.hide_ui).then(|| DocumentControls {
            version: location.version.clone(),
            versions: resolution.version_names(),
        });

        PageView::Docs(DocsView {
            title: self.title(),
            source,
            controls,
        })
    }
}

impl std::fmt::Debug for DocsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsPage")
            .field("location", self.store.current())
            .field("state", &self.state.name())
            .field("back_guard", &self.back_guard.name())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
