use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of a mod's history document
pub const REPORT_FILE: &str = "README.md";

/// Local mirror of the tracked language files.
///
/// Layout:
/// ```text
/// <root>/<mod>/lang/<locale>.json
/// <root>/<mod>/README.md
/// ```
#[derive(Debug, Clone)]
pub struct ModStore {
    root: Utf8PathBuf,
}

impl ModStore {
    /// Open the mirror, creating the root directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            fs::create_dir_all(&root)
                .with_context(|| format!("Failed to create output directory: {}", root))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn mod_dir(&self, mod_name: &str) -> Result<Utf8PathBuf> {
        if mod_name.is_empty()
            || mod_name == "."
            || mod_name == ".."
            || mod_name.contains(['/', '\\'])
        {
            bail!("Invalid mod name for a directory: {:?}", mod_name);
        }
        Ok(self.root.join(mod_name))
    }

    /// Directory holding a mod's language files
    pub fn lang_dir(&self, mod_name: &str) -> Result<Utf8PathBuf> {
        Ok(self.mod_dir(mod_name)?.join("lang"))
    }

    /// Read a stored language file, `None` if it was never synced.
    pub fn read_resource(&self, mod_name: &str, file_name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.lang_dir(mod_name)?.join(file_name);
        if !path.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read language file: {}", path))?;
        Ok(Some(bytes))
    }

    /// Replace a stored language file.
    pub fn write_resource(&self, mod_name: &str, file_name: &str, content: &[u8]) -> Result<()> {
        let dir = self.lang_dir(mod_name)?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create language directory: {}", dir))?;

        let path = dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write language file: {}", path))?;
        tracing::debug!("Wrote {} ({} bytes)", path, content.len());
        Ok(())
    }

    pub fn report_path(&self, mod_name: &str) -> Result<Utf8PathBuf> {
        Ok(self.mod_dir(mod_name)?.join(REPORT_FILE))
    }

    pub fn read_report(&self, mod_name: &str) -> Result<Option<String>> {
        let path = self.report_path(mod_name)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read mod report: {}", path))?;
        Ok(Some(content))
    }

    pub fn write_report(&self, mod_name: &str, content: &str) -> Result<()> {
        let dir = self.mod_dir(mod_name)?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create mod directory: {}", dir))?;

        let path = dir.join(REPORT_FILE);
        fs::write(&path, content).with_context(|| format!("Failed to write mod report: {}", path))?;
        Ok(())
    }
}
