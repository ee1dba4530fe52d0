use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use flate2::read::GzDecoder;
use log::{debug, info};
use sha2::{Digest, Sha256};
use tar::Archive;
use tempfile::TempDir;
use url::Url;
use xz2::read::XzDecoder;

use crate::errors::ArchiveError;
use crate::file_utils::FileManager;

// @module: Dictionary source archive download, caching and member extraction

// @struct: Tarball member reader
pub struct ArchiveReader;

impl ArchiveReader {
    /// Extract the first archive member whose name contains `pattern`.
    ///
    /// Returns `Ok(None)` when no member matches. Compression is picked
    /// from the file name: gzip, xz or plain tar.
    pub fn extract_member<P: AsRef<Path>>(
        archive_path: P,
        pattern: &str,
    ) -> Result<Option<Vec<u8>>, ArchiveError> {
        let archive_path = archive_path.as_ref();
        let file = File::open(archive_path)?;
        let name = archive_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::scan_tar(GzDecoder::new(file), pattern)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Self::scan_tar(XzDecoder::new(file), pattern)
        } else if name.ends_with(".tar") {
            Self::scan_tar(file, pattern)
        } else {
            Err(ArchiveError::UnsupportedFormat(name))
        }
    }

    /// Like [`ArchiveReader::extract_member`] but a missing member is an error
    pub fn extract_required_member<P: AsRef<Path>>(
        archive_path: P,
        pattern: &str,
    ) -> Result<Vec<u8>, ArchiveError> {
        Self::extract_member(archive_path, pattern)?.ok_or_else(|| ArchiveError::MemberNotFound {
            pattern: pattern.to_string(),
        })
    }

    fn scan_tar<R: Read>(reader: R, pattern: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        let mut archive = Archive::new(reader);

        for entry in archive.entries()? {
            let mut entry = entry?;
            let member_name = entry.path()?.to_string_lossy().to_string();

            if member_name.contains(pattern) {
                debug!("Extracting archive member: {}", member_name);
                let mut content = Vec::new();
                entry.read_to_end(&mut content)?;
                return Ok(Some(content));
            }
        }

        Ok(None)
    }
}

/// Downloads release tarballs, keeping them in an on-disk cache so repeated
/// runs skip the network
pub struct ArchiveFetcher {
    /// HTTP client for making requests
    client: reqwest::Client,

    /// Cache directory, if caching is enabled
    cache_dir: Option<PathBuf>,

    /// Holds downloads alive for the fetcher's lifetime when uncached
    scratch_dir: TempDir,
}

impl ArchiveFetcher {
    /// Create a fetcher writing into `cache_dir`, or into a temporary
    /// directory that lives as long as the fetcher when `None`
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, ArchiveError> {
        Ok(ArchiveFetcher {
            client: reqwest::Client::new(),
            cache_dir,
            scratch_dir: TempDir::new()?,
        })
    }

    /// Download `archive_url` unless a cached copy already exists, returning
    /// the local path of the archive
    pub async fn fetch(&self, archive_url: &str) -> Result<PathBuf, ArchiveError> {
        let local_path = self.local_path_for(archive_url)?;

        if FileManager::file_exists(&local_path) {
            debug!("Using cached archive: {:?}", local_path);
            return Ok(local_path);
        }

        info!("Downloading dictionary from {}...", archive_url);
        let response = self
            .client
            .get(archive_url)
            .send()
            .await
            .map_err(|e| ArchiveError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArchiveError::Download(format!(
                "server returned HTTP {} for {}",
                response.status(),
                archive_url
            )));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| ArchiveError::Download(e.to_string()))?;

        FileManager::write_bytes(&local_path, &content)
            .map_err(|e| ArchiveError::Download(e.to_string()))?;
        info!("Download complete: {:?}", local_path);

        Ok(local_path)
    }

    /// Local path an archive URL is stored at.
    ///
    /// Cached files are keyed by a digest of the full URL so two releases
    /// sharing a file name never collide.
    fn local_path_for(&self, archive_url: &str) -> Result<PathBuf, ArchiveError> {
        let parsed = Url::parse(archive_url)
            .map_err(|e| ArchiveError::Download(format!("invalid URL {}: {}", archive_url, e)))?;

        let file_name = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|s| !s.is_empty())
            .unwrap_or("archive.tar")
            .to_string();

        let digest = Sha256::digest(archive_url.as_bytes());
        let key = format!("{:x}", digest);
        let cached_name = format!("{}-{}", &key[..16], file_name);

        let dir = self
            .cache_dir
            .as_deref()
            .unwrap_or_else(|| self.scratch_dir.path());

        Ok(dir.join(cached_name))
    }
}
