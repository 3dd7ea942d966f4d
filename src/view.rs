//! Render model of the docs page.
//!
//! The page core never draws anything. It describes what the host should
//! show as a [`PageView`]:
//!
//! | State | View |
//! |-------|------|
//! | `Uninitialized`, `ResolvingVersion` | [`PageView::Loading`] |
//! | `Ready` | [`PageView::Docs`] |
//! | `Failed` | [`PageView::NotFound`] |

/// Source of the embedded docs content.
///
/// The host reloads the embedded content whenever `generation` changes and
/// leaves it alone otherwise, even if `url` differs from what the content
/// currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSource {
    pub url: String,
    pub generation: u64,
}

/// Version selector and hide-ui button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentControls {
    /// Currently shown version
    pub version: String,
    /// Selectable version names, ascending
    pub versions: Vec<String>,
}

/// Everything the docs view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsView {
    /// Document title, `"{project} | {suffix}"`
    pub title: String,
    pub source: EmbeddedSource,
    /// `None` while the UI is hidden
    pub controls: Option<DocumentControls>,
}

/// What the page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// The single not-found page every load failure collapses into
    NotFound,
    Loading,
    Docs(DocsView),
}

impl PageView {
    /// Check if this is the not-found page
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageView::NotFound)
    }

    /// Check if this is the loading page
    pub fn is_loading(&self) -> bool {
        matches!(self, PageView::Loading)
    }

    /// The docs view, if shown.
    pub fn docs(&self) -> Option<&DocsView> {
        match self {
            PageView::Docs(docs) => Some(docs),
            _ => None,
        }
    }
}

/// Format the document title of `project`.
pub fn document_title(project: &str, suffix: &str) -> String {
    format!("{project} | {suffix}")
}
