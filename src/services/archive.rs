use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

/// Errors that can occur while reading a mod archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to read archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Language files found in a mod archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleFiles {
    pub source: Option<Vec<u8>>,
    pub target: Option<Vec<u8>>,
}

impl LocaleFiles {
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.target.is_none()
    }
}

/// Pull the source and target language files out of a jar.
///
/// An entry matches when its path contains `/lang/<file name>`, e.g.
/// `assets/create/lang/en_us.json`. When several namespaces ship the same
/// file the last entry in the archive wins.
pub fn extract_locale_files(
    archive_bytes: &[u8],
    source_file: &str,
    target_file: &str,
) -> Result<LocaleFiles, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let source_suffix = format!("/lang/{source_file}");
    let target_suffix = format!("/lang/{target_file}");

    let mut files = LocaleFiles::default();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        let slot = if name.contains(&source_suffix) {
            &mut files.source
        } else if name.contains(&target_suffix) {
            &mut files.target
        } else {
            continue;
        };

        // Declared sizes come from the archive header and are not trusted
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        if slot.replace(bytes).is_some() {
            tracing::warn!("Duplicate language file in archive, keeping {}", name);
        }
        tracing::debug!("Found language file: {}", name);
    }

    Ok(files)
}
