//! Embedded content location watcher.
//!
//! The documentation itself is rendered by an embedded, externally produced
//! document (an iframe in a browser host). Its internal navigation is only
//! visible through the location strings it reports, so the watcher treats
//! it as an event source behind the [`EmbeddedContent`] trait.
//!
//! # Lifecycle
//!
//! ```text
//!              content_reloading()            on_load()
//!   Unloaded ─────────────────────▶ NavigationPending ─────────▶ Loaded
//!      ▲                                   ▲                      │
//!      │ content_unloaded()                └──────────────────────┘
//!      └──────────────────────────────── content_reloading()
//! ```
//!
//! A reload detaches every listener the content had, so the one-shot
//! fragment-change listener is re-armed after each load and after each
//! fragment change it delivers.
//!
//! # Reports
//!
//! A report is an absolute URL such as
//! `http://host/doc/awesome/1.2.0/guide/install.html#pip`. Everything after
//! the delimiter segment (`/doc/` by default) is split into project,
//! version, page and fragment. Reports without the delimiter are logged and
//! dropped.

use crate::config::SyncConfig;
use crate::error::DocsError;
use crate::logging::docs_log;

/// Link target that opens a new top-level browsing context.
pub const NEW_CONTEXT_TARGET: &str = "_blank";

/// Lifecycle state of the embedded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Nothing is loaded
    Unloaded,
    /// Content is loaded and the fragment listener may be armed
    Loaded,
    /// A new source was requested and has not finished loading
    NavigationPending,
}

/// A hyperlink inside the embedded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    /// Absolute target URL.
    pub href: String,
    /// Browsing context the link opens in, `None` for the default.
    pub target: Option<String>,
}

impl Hyperlink {
    /// Create a link opening in the default context.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            target: None,
        }
    }
}

/// The embedded document, as seen from the hosting page.
pub trait EmbeddedContent {
    /// Absolute URL the content currently shows, if it can be read.
    fn location(&self) -> Option<String>;

    /// Visit every hyperlink of the content, allowing it to be modified.
    fn visit_links(&mut self, visit: &mut dyn FnMut(&mut Hyperlink));

    /// Attach the fragment-change listener.
    fn subscribe_fragment_change(&mut self);

    /// Detach the fragment-change listener.
    fn unsubscribe_fragment_change(&mut self);
}

/// The docs part of an embedded URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPath {
    pub project: String,
    pub version: String,
    pub page: String,
    pub fragment: String,
}

/// Split an embedded URL into its docs path.
///
/// Empty pages become `index_page`. A query inside the page part is dropped.
pub fn parse_embedded_url(
    url: &str,
    delimiter: &str,
    index_page: &str,
) -> Result<EmbeddedPath, DocsError> {
    let malformed = || DocsError::MalformedEmbeddedUrl {
        url: url.to_string(),
    };

    let (_, docs_path) = url.split_once(delimiter).ok_or_else(malformed)?;

    let mut parts = docs_path.splitn(3, '/');
    let project = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
    let version = parts.next().filter(|v| !v.is_empty()).ok_or_else(malformed)?;
    let page_and_fragment = parts.next().unwrap_or_default();

    let (page, fragment) = match page_and_fragment.find('#') {
        Some(index) => page_and_fragment.split_at(index),
        None => (page_and_fragment, ""),
    };
    let page = page.split_once('?').map_or(page, |(page, _)| page);

    Ok(EmbeddedPath {
        project: project.to_string(),
        version: version.to_string(),
        page: if page.is_empty() {
            index_page.to_string()
        } else {
            page.to_string()
        },
        fragment: if fragment == "#" {
            String::new()
        } else {
            fragment.to_string()
        },
    })
}

/// Make every link leaving `host_origin` open in a new context.
///
/// Returns the number of links rewritten.
pub fn apply_external_link_policy(content: &mut dyn EmbeddedContent, host_origin: &str) -> usize {
    let mut rewritten = 0;
    content.visit_links(&mut |link| {
        if !link.href.starts_with(host_origin)
            && link.target.as_deref() != Some(NEW_CONTEXT_TARGET)
        {
            link.target = Some(NEW_CONTEXT_TARGET.to_string());
            rewritten += 1;
        }
    });
    rewritten
}

/// Follows the embedded content and reports where it navigated.
#[derive(Debug, Clone)]
pub struct LocationWatcher {
    state: WatcherState,
    armed: bool,
    delimiter: String,
    index_page: String,
    host_origin: String,
}

impl LocationWatcher {
    /// Create a watcher for content served under `config.embed_delimiter`.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            state: WatcherState::Unloaded,
            armed: false,
            delimiter: config.embed_delimiter.clone(),
            index_page: config.index_page.clone(),
            host_origin: config.host_origin.clone(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Whether the fragment-change listener is attached.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// A new source was handed to the content; its listeners are gone.
    pub fn content_reloading(&mut self) {
        self.state = WatcherState::NavigationPending;
        self.armed = false;
        docs_log!(trace, "Embedded content reloading");
    }

    /// The content was removed.
    pub fn content_unloaded(&mut self) {
        self.state = WatcherState::Unloaded;
        self.armed = false;
    }

    /// The content finished loading. Returns the location it reports.
    pub fn on_load(&mut self, content: &mut dyn EmbeddedContent) -> Option<EmbeddedPath> {
        self.state = WatcherState::Loaded;
        self.armed = false;
        self.observe(content)
    }

    /// The content reported a fragment change. Returns the new location.
    ///
    /// Ignored unless the content is loaded and the listener armed.
    pub fn on_fragment_change(&mut self, content: &mut dyn EmbeddedContent) -> Option<EmbeddedPath> {
        if self.state != WatcherState::Loaded || !self.armed {
            docs_log!(
                trace,
                "Fragment change ignored (state {:?}, armed {})",
                self.state,
                self.armed
            );
            return None;
        }

        // one-shot: detach before handling, rearm() attaches again
        content.unsubscribe_fragment_change();
        self.armed = false;
        self.observe(content)
    }

    /// Attach the fragment-change listener if the content is loaded.
    pub fn rearm(&mut self, content: &mut dyn EmbeddedContent) {
        if self.state == WatcherState::Loaded && !self.armed {
            content.subscribe_fragment_change();
            self.armed = true;
            docs_log!(trace, "Fragment-change listener armed");
        }
    }

    fn observe(&self, content: &mut dyn EmbeddedContent) -> Option<EmbeddedPath> {
        let Some(url) = content.location() else {
            docs_log!(warn, "Embedded content location is not readable");
            return None;
        };

        let path = match parse_embedded_url(&url, &self.delimiter, &self.index_page) {
            Ok(path) => path,
            Err(err) => {
                docs_log!(error, "{}", err);
                return None;
            }
        };

        let rewritten = apply_external_link_policy(content, &self.host_origin);
        if rewritten > 0 {
            docs_log!(debug, "Rewrote {} external links to open separately", rewritten);
        }

        Some(path)
    }
}
