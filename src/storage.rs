//! Persistence of the tokenized corpus.
//! Writes a headerless bincode payload to `<path_data>/tokens.pkl`.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Name of the tokens file inside the data directory
pub const TOKENS_FILE: &str = "tokens.pkl";

pub fn tokens_path(path_data: &Path) -> PathBuf {
    path_data.join(TOKENS_FILE)
}

/// Serialize `recipes` to the tokens file.
///
/// The data directory must already exist; it is not created.
pub fn pickle_recipes<T>(path_data: &Path, recipes: &T) -> Result<PathBuf, StorageError>
where
    T: Serialize + ?Sized,
{
    let path = tokens_path(path_data);
    let file = File::create(&path).map_err(|source| StorageError::Open {
        path: path.clone(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, recipes).map_err(StorageError::Encode)?;
    writer.flush().map_err(|source| StorageError::Write {
        path: path.clone(),
        source,
    })?;

    debug!("Wrote tokens to {}", path.display());
    Ok(path)
}

/// Read back what [`pickle_recipes`] wrote
pub fn load_recipes<T: DeserializeOwned>(path_data: &Path) -> Result<T, StorageError> {
    let path = tokens_path(path_data);
    let file = File::open(&path).map_err(|source| StorageError::Open {
        path: path.clone(),
        source,
    })?;

    let recipes = bincode::deserialize_from(BufReader::new(file)).map_err(StorageError::Decode)?;
    debug!("Read tokens from {}", path.display());
    Ok(recipes)
}
