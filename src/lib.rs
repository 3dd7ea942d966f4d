//! # docat-navigator
//!
//! Navigation-state synchronizer for a documentation-viewing page.
//!
//! A docs page shows externally rendered documentation inside an embedded
//! document. Three sources change its state independently:
//!
//! - the outer route, `/{project}/{version}/{page}#{fragment}?hide-ui=true`;
//! - the embedded content, which navigates on its own;
//! - the history stack, including entries the embedded content adds.
//!
//! [`DocsPage`] folds all three into one canonical [`Location`], resolves
//! version aliases (`latest`, tags) against the project's catalog and warns
//! when an outdated version is shown.
//!
//! ## Quick start
//!
//! ```
//! use docat_navigator::{Location, RouteCodec};
//!
//! let codec = RouteCodec::new("index.html");
//! let location = codec.parse("/awesome/1.0.0/guide.html#install?hide-ui=true");
//!
//! assert_eq!(location.project, "awesome");
//! assert_eq!(location.fragment, "#install");
//! assert!(location.hide_ui);
//! assert_eq!(
//!     RouteCodec::to_url(&location),
//!     "/awesome/1.0.0/guide.html#install?hide-ui=true"
//! );
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Provides |
//! |---------|---------|----------|
//! | `log` | yes | logging through the `log` crate |
//! | `tracing` | no | logging through the `tracing` crate |
//! | `cache` | yes | [`cache::CachingRepository`] |
//! | `http` | yes | `HttpRepository`, a client for the docs server API |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod embedded;
pub mod error;
pub mod guards;
pub mod history;
pub mod lifecycle;
pub mod location;
pub mod notify;
pub mod page;
pub mod repository;
pub mod resolve;
pub mod route;
pub mod version;
pub mod view;

pub use config::{ConfigError, SyncConfig};
pub use embedded::{
    apply_external_link_policy, parse_embedded_url, EmbeddedContent, EmbeddedPath, Hyperlink,
    LocationWatcher, WatcherState,
};
pub use error::{DocsError, RepositoryError};
pub use guards::{policy_fn, BackGuardPolicy, FixedSteps, FnPolicy, NoCompensation, SingleHiddenEntry};
pub use history::{HistoryBackend, MemoryHistory, NavigationDirection};
pub use lifecycle::{plan_for_location, PageState, Step};
pub use location::{HistoryMode, Location, LocationChange, LocationStore, LATEST};
pub use notify::{Message, MessageBanner, MessageKind, NoBanner, StalenessNotifier};
pub use page::DocsPage;
#[cfg(feature = "http")]
pub use repository::HttpRepository;
pub use repository::{docs_url, DocsRepository, ProjectDirectory, ProjectSummary};
pub use resolve::{fetch_catalog, resolve_version, Resolution, ResolutionTicket, ResolutionTracker};
pub use route::{QueryParams, RouteCodec};
pub use version::{compare_versions, latest_version, sort_catalog, SemVersion, VersionDescriptor};
pub use view::{DocsView, DocumentControls, EmbeddedSource, PageView};
