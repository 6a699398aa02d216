use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::TokenizeError;

/// File name of the abbreviation model inside the tokenizer data directory
pub const DATA_FILE: &str = "abbreviations.json";

/// Abbreviation set shipped with the crate, installed when no data URL is configured
const BUILTIN_DATA: &str = include_str!("abbreviations.json");

/// Model data for the Treebank tokenizer: words whose trailing period is part of the word
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerData {
    #[serde(default)]
    abbreviations: HashSet<String>,
}

impl TokenizerData {
    pub fn from_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|word| normalize_abbreviation(word.as_ref()))
                .collect(),
        }
    }

    /// The bundled abbreviation set
    pub fn builtin() -> Result<Self, TokenizeError> {
        let raw: TokenizerData = serde_json::from_str(BUILTIN_DATA)?;
        Ok(Self::from_abbreviations(raw.abbreviations))
    }

    /// Read model data from a JSON file
    pub fn load(path: &Path) -> Result<Self, TokenizeError> {
        if !path.is_file() {
            return Err(TokenizeError::DataMissing {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let raw: TokenizerData = serde_json::from_str(&contents)?;
        debug!(
            "Loaded {} abbreviations from {}",
            raw.abbreviations.len(),
            path.display()
        );
        Ok(Self::from_abbreviations(raw.abbreviations))
    }

    /// Whether `word` (without its trailing period) is a known abbreviation
    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(&normalize_abbreviation(word))
    }

    pub fn len(&self) -> usize {
        self.abbreviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviations.is_empty()
    }
}

fn normalize_abbreviation(word: &str) -> String {
    word.trim_end_matches('.').to_lowercase()
}

/// Fetch model data from `url` and store it at `dest`.
///
/// The payload is validated before it replaces any existing file.
pub fn download_data(url: &str, dest: &Path, timeout: Duration) -> Result<(), TokenizeError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(TokenizeError::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes()?;
    let data: TokenizerData = serde_json::from_slice(&body)?;
    store(dest, &body)?;

    debug!(
        "Stored {} abbreviations from {} at {}",
        data.len(),
        url,
        dest.display()
    );
    Ok(())
}

/// Write the bundled abbreviation set to `dest`
pub fn install_builtin(dest: &Path) -> Result<(), TokenizeError> {
    let data = TokenizerData::builtin()?;
    store(dest, BUILTIN_DATA.as_bytes())?;
    debug!(
        "Installed {} bundled abbreviations at {}",
        data.len(),
        dest.display()
    );
    Ok(())
}

// Written beside the target first so readers never see a partial file
fn store(dest: &Path, contents: &[u8]) -> Result<(), TokenizeError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let partial = dest.with_extension("json.part");
    fs::write(&partial, contents)?;
    fs::rename(&partial, dest)?;
    Ok(())
}
