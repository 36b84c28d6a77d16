use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Errors that can occur while fetching a mod release
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Project {0} has no published versions")]
    NoVersions(String),

    #[error("Latest version of {0} has no .jar file")]
    NoJar(String),
}

/// Archive downloaded for a mod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Where mod releases come from
#[cfg_attr(test, automock)]
pub trait ModSource {
    /// Download the newest release archive of a project.
    fn fetch_latest(&self, project_id: &str) -> Result<FetchedArchive, FetchError>;
}

/// Entry of `GET /project/{id}/version`, newest first
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectVersion {
    #[serde(default)]
    pub version_number: String,
    pub files: Vec<VersionFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionFile {
    pub filename: String,
    pub url: String,
}

/// Pick the first `.jar` of the newest version.
pub fn latest_jar<'a>(
    project_id: &str,
    versions: &'a [ProjectVersion],
) -> Result<&'a VersionFile, FetchError> {
    let newest = versions
        .first()
        .ok_or_else(|| FetchError::NoVersions(project_id.to_string()))?;

    newest
        .files
        .iter()
        .find(|file| file.filename.ends_with(".jar"))
        .ok_or_else(|| FetchError::NoJar(project_id.to_string()))
}

/// Modrinth API client
pub struct ModrinthClient {
    client: Client,
    api_base: String,
}

impl ModrinthClient {
    pub fn new(api_base: &str, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn versions(&self, project_id: &str) -> Result<Vec<ProjectVersion>, FetchError> {
        let url = format!("{}/project/{}/version", self.api_base, project_id);
        tracing::debug!("GET {}", url);
        let versions = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .json::<Vec<ProjectVersion>>()?;
        Ok(versions)
    }
}

impl ModSource for ModrinthClient {
    fn fetch_latest(&self, project_id: &str) -> Result<FetchedArchive, FetchError> {
        let versions = self.versions(project_id)?;
        let jar = latest_jar(project_id, &versions)?;

        tracing::info!(
            "Downloading {} ({})",
            jar.filename,
            versions[0].version_number
        );
        let bytes = self
            .client
            .get(&jar.url)
            .send()?
            .error_for_status()?
            .bytes()?;

        Ok(FetchedArchive {
            file_name: jar.filename.clone(),
            bytes: bytes.to_vec(),
        })
    }
}
