pub mod config;
pub mod error;
pub mod ingredients;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod storage;
pub mod table;
pub mod tokenize;

use log::info;

pub use crate::config::PrepConfig;
pub use error::{PrepError, StorageError, TokenizeError};
pub use ingredients::{IngredientNormalizer, IngredientParser};
pub use loader::{load_raw_dir, load_raw_recipe_files, load_raw_recipes};
pub use model::{RawRecipe, RecipeMap, TokenizedCorpus, TokenizedRecipe};
pub use pipeline::{recipe_is_complete, RecipeTokenizer};
pub use storage::{load_recipes, pickle_recipes};
pub use table::{make_table, RecipeTable, SEPARATOR};
pub use tokenize::{SentenceTokenizer, TreebankTokenizer, WordTokenizer};

/// Recipe tokenizer with the default Treebank tokenizer and ingredient parser
pub fn default_tokenizer(config: &PrepConfig) -> RecipeTokenizer {
    let sentences = SentenceTokenizer::new(TreebankTokenizer::from_config(config));
    RecipeTokenizer::new(sentences, IngredientParser::new())
        .with_progress(config.pipeline.progress)
}

/// Tokenize the recipes with the configured execution mode
pub fn tokenize_with(
    tokenizer: &RecipeTokenizer,
    recipes: &RecipeMap,
    config: &PrepConfig,
) -> Result<TokenizedCorpus, PrepError> {
    if config.tokenizer.eager_download {
        tokenizer.sentences().prepare()?;
    }
    let corpus = if config.pipeline.parallel {
        tokenizer.tokenize_recipes_parallel(recipes)?
    } else {
        tokenizer.tokenize_recipes(recipes)?
    };
    Ok(corpus)
}

/// Run one full preprocessing pass over the raw recipe files in `path_data`.
///
/// Loads and merges the raw dumps, tokenizes complete recipes, writes
/// `tokens.pkl` when enabled and returns the recipe table.
pub fn run_pipeline(config: &PrepConfig) -> Result<RecipeTable, PrepError> {
    let recipes = load_raw_dir(&config.path_data)?;
    let tokenizer = default_tokenizer(config);
    let corpus = tokenize_with(&tokenizer, &recipes, config)?;

    if config.pipeline.write_tokens {
        let path = pickle_recipes(&config.path_data, &corpus)?;
        info!("Saved {} tokenized recipes to {}", corpus.len(), path.display());
    }

    let table = make_table(corpus.as_slice());
    info!("Built recipe table with {} rows", table.len());
    Ok(table)
}
