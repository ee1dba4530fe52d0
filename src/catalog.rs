/*!
 * FreeDict catalog client.
 *
 * The FreeDict project publishes a JSON database describing every
 * dictionary it distributes and the downloadable releases for each. Only
 * releases built for the `src` platform carry the TEI source this tool
 * converts.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CatalogError;

/// Platform identifier of TEI source releases
const SOURCE_PLATFORM: &str = "src";

/// One downloadable release of a dictionary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Target platform of the release ("src", "dictd", ...)
    pub platform: String,

    /// Download URL of the release artifact
    #[serde(rename = "URL")]
    pub url: String,

    /// Release version, when published
    #[serde(default)]
    pub version: Option<String>,

    /// Artifact size in bytes, when published
    #[serde(default)]
    pub size: Option<u64>,
}

/// One catalog item.
///
/// Items without a `name` field describe tooling rather than dictionaries
/// and are ignored during selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDictionary {
    /// Language pair identifier, e.g. "eng-deu"
    #[serde(default)]
    pub name: Option<String>,

    /// Published releases of this dictionary
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl CatalogDictionary {
    /// First TEI source release of this dictionary, if any
    pub fn source_release(&self) -> Option<&Release> {
        self.releases.iter().find(|r| r.platform == SOURCE_PLATFORM)
    }
}

/// A conversion job selected from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryJob {
    /// Language pair identifier
    pub language_pair: String,

    /// Download URL of the TEI source archive
    pub url: String,
}

/// Source of the dictionary catalog, mockable in tests
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog
    async fn fetch(&self) -> Result<Vec<CatalogDictionary>, CatalogError>;
}

/// HTTP client for the published FreeDict catalog
#[derive(Debug)]
pub struct HttpCatalog {
    /// Catalog endpoint URL
    url: String,
    /// HTTP client for making requests
    client: Client,
}

impl HttpCatalog {
    /// Create a client for the given catalog URL
    pub fn new<S: Into<String>>(url: S) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        HttpCatalog {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch(&self) -> Result<Vec<CatalogDictionary>, CatalogError> {
        debug!("Fetching dictionary catalog from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::RequestFailed(format!(
                "catalog endpoint returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<CatalogDictionary>>()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}

/// Select the conversion jobs matching a dictionary selection.
///
/// `selection` is either a language pair such as "eng-deu" or "all". Only
/// dictionaries with a TEI source release qualify; selecting a pair that
/// matches nothing is an error.
pub fn select_jobs(
    catalog: &[CatalogDictionary],
    selection: &str,
) -> Result<Vec<DictionaryJob>, CatalogError> {
    let mut jobs = Vec::new();

    for dictionary in catalog {
        let Some(name) = dictionary.name.as_deref() else {
            continue;
        };

        if selection != "all" && name != selection {
            continue;
        }

        if let Some(release) = dictionary.source_release() {
            jobs.push(DictionaryJob {
                language_pair: name.to_string(),
                url: release.url.clone(),
            });
        }
    }

    if jobs.is_empty() && selection != "all" {
        return Err(CatalogError::DictionaryNotFound(selection.to_string()));
    }

    Ok(jobs)
}
