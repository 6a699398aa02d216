use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PrepError;
use crate::model::RecipeMap;

/// File name prefix of raw recipe dumps in the data directory
pub const RAW_FILE_PREFIX: &str = "recipes_raw";

/// Read one JSON file mapping recipe ids to raw recipes
pub fn load_raw_recipes(path: &Path) -> Result<RecipeMap, PrepError> {
    let contents = fs::read_to_string(path).map_err(|source| PrepError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let recipes: RecipeMap =
        serde_json::from_str(&contents).map_err(|source| PrepError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Read {} recipes from {}", recipes.len(), path.display());
    Ok(recipes)
}

/// Read several raw recipe files and merge them in the given order.
///
/// A recipe id seen in a later file replaces the earlier record but keeps its position.
pub fn load_raw_recipe_files<P: AsRef<Path>>(paths: &[P]) -> Result<RecipeMap, PrepError> {
    let mut merged = RecipeMap::new();
    for path in paths {
        merged.extend(load_raw_recipes(path.as_ref())?);
    }
    Ok(merged)
}

/// List `recipes_raw*.json` files in the data directory, sorted by name
pub fn find_raw_files(path_data: &Path) -> Result<Vec<PathBuf>, PrepError> {
    let entries = fs::read_dir(path_data).map_err(|source| PrepError::Load {
        path: path_data.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| PrepError::Load {
                path: path_data.to_path_buf(),
                source,
            })?
            .path();
        let is_raw_dump = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(RAW_FILE_PREFIX) && name.ends_with(".json"))
            .unwrap_or(false);
        if is_raw_dump && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load and merge every raw recipe dump in the data directory
pub fn load_raw_dir(path_data: &Path) -> Result<RecipeMap, PrepError> {
    let files = find_raw_files(path_data)?;
    let recipes = load_raw_recipe_files(&files)?;
    info!(
        "Loaded {} raw recipes from {} files in {}",
        recipes.len(),
        files.len(),
        path_data.display()
    );
    Ok(recipes)
}
