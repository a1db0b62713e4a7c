use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

/// Text formats configuration and report files can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerdeFormat {
    Yaml,
    Json,
}

impl SerdeFormat {
    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let ext = get_file_extension(file_name).ok_or(FileExtensionError::MissingFileExtension)?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            ))
        }
    }

    pub fn from_path(path: &Path) -> FileFormatResult<Self> {
        Self::from_file_name(&path.to_string_lossy())
    }
}

pub fn serialize<T: Serialize>(value: &T, format: SerdeFormat) -> anyhow::Result<String> {
    let text = match format {
        SerdeFormat::Yaml => serde_yml::to_string(value)?,
        SerdeFormat::Json => serde_json::to_string_pretty(value)?,
    };
    Ok(text)
}

pub fn deserialize<T: DeserializeOwned>(text: &str, format: SerdeFormat) -> anyhow::Result<T> {
    let value = match format {
        SerdeFormat::Yaml => serde_yml::from_str(text)?,
        SerdeFormat::Json => serde_json::from_str(text)?,
    };
    Ok(value)
}

/// Reads and deserializes `path`, picking the format from its extension.
pub fn read_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let format = SerdeFormat::from_path(path)?;
    log::debug!("Reading {:?} from {}", format, path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    deserialize(&text, format).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Serializes `value` into `path`, picking the format from its extension.
pub fn write_file<T: Serialize>(value: &T, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let format = SerdeFormat::from_path(path)?;
    let text = serialize(value, format)?;
    log::debug!("Writing {:?} to {}", format, path.display());

    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
