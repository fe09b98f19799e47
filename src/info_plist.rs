use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{Context, Result};
use plist::{Dictionary, Value};
use tempfile::NamedTempFile;

use crate::apple_platform::IosSdk;

pub const SUPPORTED_PLATFORMS_KEY: &str = "CFBundleSupportedPlatforms";

const BINARY_MAGIC: &[u8] = b"bplist";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlistFormat {
    Binary,
    Xml,
}

impl PlistFormat {
    fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(BINARY_MAGIC) {
            Self::Binary
        } else {
            Self::Xml
        }
    }
}

/// A framework's `Info.plist`, remembering the encoding it was read in.
#[derive(Debug, Clone)]
pub struct InfoPlist {
    dictionary: Dictionary,
    format: PlistFormat,
}

impl InfoPlist {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read info plist file {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("Failed to parse info plist file {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = PlistFormat::detect(bytes);
        let value = match format {
            PlistFormat::Binary => Value::from_reader(Cursor::new(bytes)),
            PlistFormat::Xml => Value::from_reader_xml(bytes),
        }
        .context("Failed to unmarshal plist")?;

        let dictionary = value
            .into_dictionary()
            .context("The root of the plist is not a dictionary")?;

        Ok(Self { dictionary, format })
    }

    pub fn format(&self) -> PlistFormat {
        self.format
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn supported_platforms(&self) -> Vec<&str> {
        self.dictionary
            .get(SUPPORTED_PLATFORMS_KEY)
            .and_then(Value::as_array)
            .map(|platforms| platforms.iter().filter_map(Value::as_string).collect())
            .unwrap_or_default()
    }

    /// Overwrites `CFBundleSupportedPlatforms`, whatever it held before.
    pub fn set_supported_platforms(&mut self, sdks: &[IosSdk]) {
        let platforms = sdks
            .iter()
            .map(|sdk| Value::String(sdk.supported_platform().to_string()))
            .collect();
        self.dictionary
            .insert(SUPPORTED_PLATFORMS_KEY.to_string(), Value::Array(platforms));
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let value = Value::Dictionary(self.dictionary.clone());
        let mut bytes = Vec::new();
        match self.format {
            PlistFormat::Binary => value.to_writer_binary(&mut bytes),
            PlistFormat::Xml => value.to_writer_xml(&mut bytes),
        }
        .context("Failed to marshal plist")?;
        Ok(bytes)
    }

    /// Replaces the file at `path`, keeping its permissions.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let dir = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?;

        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        file.write_all(&bytes)
            .and_then(|_| file.as_file().sync_all())
            .with_context(|| format!("Failed to write plist file {}", path.display()))?;
        if let Ok(metadata) = std::fs::metadata(path) {
            std::fs::set_permissions(file.path(), metadata.permissions()).with_context(|| {
                format!("Failed to copy the permissions of {}", path.display())
            })?;
        }
        file.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write plist file {}", path.display()))?;

        Ok(())
    }
}

/// Rewrites the `Info.plist` at `path` so it declares every platform in `sdks`.
pub fn declare_supported_platforms(path: &Path, sdks: &[IosSdk]) -> Result<()> {
    let mut info_plist = InfoPlist::load(path)?;
    log::info!(
        "Patching {}: {} {:?} -> {:?}",
        path.display(),
        SUPPORTED_PLATFORMS_KEY,
        info_plist.supported_platforms(),
        sdks.iter().map(|s| s.supported_platform()).collect::<Vec<_>>()
    );
    info_plist.set_supported_platforms(sdks);
    info_plist.save(path)
}
