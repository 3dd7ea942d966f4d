//! Data collaborators.
//!
//! - [`DocsRepository`]: the version catalog of a project and the URL of
//!   its rendered documentation. The page consumes nothing else.
//! - [`ProjectDirectory`]: the thin contract behind the project list page
//!   (names with version counts, favorites, logos).
//! - [`HttpRepository`]: both contracts over the docs server's JSON API
//!   (feature `http`).
//!
//! # Server API
//!
//! | Request                                         | Body                                   |
//! |-------------------------------------------------|----------------------------------------|
//! | `GET /api/projects`                             | `{"projects": [{name, logo, versions}]}` |
//! | `GET /api/projects/{project}?include_hidden=true` | `{name, versions: [{name, tags}]}`     |

use crate::error::RepositoryError;
use crate::location::Location;
use crate::version::VersionDescriptor;
use async_trait::async_trait;

/// Source of version catalogs and docs URLs.
#[async_trait]
pub trait DocsRepository: Send + Sync {
    /// Fetch the version catalog of `project`, in any order.
    async fn get_versions(&self, project: &str)
        -> Result<Vec<VersionDescriptor>, RepositoryError>;

    /// Absolute URL the embedded content is loaded from.
    fn docs_url(&self, location: &Location) -> String;
}

/// One row of the project list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub version_count: usize,
    pub has_logo: bool,
}

/// Contract behind the project list page.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// All projects, sorted by name.
    async fn list_projects(&self) -> Result<Vec<ProjectSummary>, RepositoryError>;

    /// Whether the user starred `name`.
    fn is_favorite(&self, name: &str) -> bool;

    /// Where the logo of `name` would be served, if the project has one.
    fn logo_url(&self, name: &str) -> Option<String>;
}

/// Build `{base}{delimiter}{project}/{version}/{page}{fragment}`.
pub fn docs_url(base: &str, delimiter: &str, location: &Location) -> String {
    format!(
        "{}{}{}/{}/{}{}",
        base.trim_end_matches('/'),
        delimiter,
        location.project,
        location.version,
        location.page,
        location.fragment
    )
}

#[cfg(feature = "http")]
pub use http::HttpRepository;

#[cfg(feature = "http")]
mod http {
    use super::{docs_url, DocsRepository, ProjectDirectory, ProjectSummary};
    use crate::config::SyncConfig;
    use crate::error::RepositoryError;
    use crate::location::Location;
    use crate::logging::docs_log;
    use crate::version::VersionDescriptor;
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::collections::HashSet;
    use std::sync::RwLock;

    #[derive(Deserialize, Debug)]
    struct ProjectDetailsResponse {
        #[serde(default)]
        versions: Vec<VersionDescriptor>,
    }

    #[derive(Deserialize, Debug)]
    struct ProjectsResponse {
        #[serde(default)]
        projects: Vec<ProjectEntry>,
    }

    #[derive(Deserialize, Debug)]
    struct ProjectEntry {
        name: String,
        #[serde(default)]
        logo: bool,
        #[serde(default)]
        versions: Vec<VersionDescriptor>,
    }

    /// Docs server client.
    pub struct HttpRepository {
        base_url: String,
        delimiter: String,
        client: reqwest::Client,
        favorites: RwLock<HashSet<String>>,
    }

    impl HttpRepository {
        /// Create a client for the server described by `config`.
        ///
        /// Uses `api_base_url`, or `host_origin` when that is empty.
        pub fn new(config: &SyncConfig) -> Self {
            let base = if config.api_base_url.is_empty() {
                &config.host_origin
            } else {
                &config.api_base_url
            };
            Self {
                base_url: base.trim_end_matches('/').to_string(),
                delimiter: config.embed_delimiter.clone(),
                client: reqwest::Client::new(),
                favorites: RwLock::new(HashSet::new()),
            }
        }

        /// Server base URL without trailing slash.
        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        /// Star or unstar a project.
        pub fn set_favorite(&self, name: &str, favorite: bool) {
            if let Ok(mut favorites) = self.favorites.write() {
                if favorite {
                    favorites.insert(name.to_string());
                } else {
                    favorites.remove(name);
                }
            }
        }

        async fn get_json<T: serde::de::DeserializeOwned>(
            &self,
            url: &str,
        ) -> Result<T, RepositoryError> {
            docs_log!(debug, "GET {}", url);
            let response = self.client.get(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                docs_log!(warn, "GET {} answered {}: {}", url, status, message);
                return Err(RepositoryError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| RepositoryError::Parse(e.to_string()))
        }
    }

    #[async_trait]
    impl DocsRepository for HttpRepository {
        async fn get_versions(
            &self,
            project: &str,
        ) -> Result<Vec<VersionDescriptor>, RepositoryError> {
            let url = format!("{}/api/projects/{}?include_hidden=true", self.base_url, project);
            let details: ProjectDetailsResponse = self.get_json(&url).await?;
            docs_log!(
                debug,
                "Project '{}' has {} versions",
                project,
                details.versions.len()
            );
            Ok(details.versions)
        }

        fn docs_url(&self, location: &Location) -> String {
            docs_url(&self.base_url, &self.delimiter, location)
        }
    }

    #[async_trait]
    impl ProjectDirectory for HttpRepository {
        async fn list_projects(&self) -> Result<Vec<ProjectSummary>, RepositoryError> {
            let url = format!("{}/api/projects", self.base_url);
            let response: ProjectsResponse = self.get_json(&url).await?;

            let mut projects: Vec<ProjectSummary> = response
                .projects
                .into_iter()
                .map(|entry| ProjectSummary {
                    name: entry.name,
                    version_count: entry.versions.len(),
                    has_logo: entry.logo,
                })
                .collect();
            projects.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(projects)
        }

        fn is_favorite(&self, name: &str) -> bool {
            self.favorites
                .read()
                .map(|favorites| favorites.contains(name))
                .unwrap_or(false)
        }

        fn logo_url(&self, name: &str) -> Option<String> {
            if name.is_empty() {
                return None;
            }
            Some(format!("{}{}{}/logo", self.base_url, self.delimiter, name))
        }
    }
}
