use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::error::TokenizeError;
use crate::ingredients::IngredientNormalizer;
use crate::model::{RawRecipe, RecipeMap, TokenizedCorpus, TokenizedRecipe};
use crate::tokenize::SentenceTokenizer;

/// Separator placed between normalized ingredients and after the last one
pub const INGREDIENT_SEPARATOR: &str = "; ";

/// Return true if the recipe has both a title and instructions
pub fn recipe_is_complete(recipe: &RawRecipe) -> bool {
    recipe.complete_fields().is_some()
}

/// Turns raw recipes into (title, body) token pairs
pub struct RecipeTokenizer {
    sentences: SentenceTokenizer,
    normalizer: Box<dyn IngredientNormalizer>,
    progress: bool,
}

impl RecipeTokenizer {
    pub fn new(
        sentences: SentenceTokenizer,
        normalizer: impl IngredientNormalizer + 'static,
    ) -> Self {
        Self {
            sentences,
            normalizer: Box::new(normalizer),
            progress: true,
        }
    }

    /// Show or hide the progress bar
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn sentences(&self) -> &SentenceTokenizer {
        &self.sentences
    }

    /// Tokenize one recipe, or `None` if it is incomplete
    pub fn tokenize_recipe(
        &self,
        recipe: &RawRecipe,
    ) -> Result<Option<TokenizedRecipe>, TokenizeError> {
        let Some((title, instructions)) = recipe.complete_fields() else {
            return Ok(None);
        };

        let mut ingredients = self
            .normalizer
            .normalize(&recipe.ingredients)
            .join(INGREDIENT_SEPARATOR);
        ingredients.push_str(INGREDIENT_SEPARATOR);

        // The trailing separator token is the only boundary before the instructions
        let mut body = self.sentences.tokenize_sentence(&ingredients)?;
        body.push_str(&self.sentences.tokenize_sentence(instructions)?);

        Ok(Some(TokenizedRecipe {
            title: self.sentences.tokenize_sentence(title)?,
            body,
        }))
    }

    /// Tokenize all complete recipes in input order
    pub fn tokenize_recipes(&self, recipes: &RecipeMap) -> Result<TokenizedCorpus, TokenizeError> {
        let progress = self.progress_bar(recipes.len());
        let mut tokenized = Vec::with_capacity(recipes.len());

        for (id, recipe) in recipes {
            match self.tokenize_recipe(recipe)? {
                Some(tokens) => tokenized.push(tokens),
                None => debug!("Skipping incomplete recipe {}", id),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Tokenized {} of {} recipes",
            tokenized.len(),
            recipes.len()
        );
        Ok(TokenizedCorpus::new(tokenized))
    }

    /// Same output as [`tokenize_recipes`](Self::tokenize_recipes), computed on the rayon pool
    pub fn tokenize_recipes_parallel(
        &self,
        recipes: &RecipeMap,
    ) -> Result<TokenizedCorpus, TokenizeError> {
        let progress = self.progress_bar(recipes.len());
        let entries: Vec<(&String, &RawRecipe)> = recipes.iter().collect();

        // Indexed collect keeps input order
        let results: Vec<Option<TokenizedRecipe>> = entries
            .par_iter()
            .map(|(id, recipe)| {
                let tokens = self.tokenize_recipe(recipe)?;
                if tokens.is_none() {
                    debug!("Skipping incomplete recipe {}", id);
                }
                progress.inc(1);
                Ok::<_, TokenizeError>(tokens)
            })
            .collect::<Result<_, _>>()?;
        progress.finish_and_clear();

        let corpus: TokenizedCorpus = results.into_iter().flatten().collect();
        info!(
            "Tokenized {} of {} recipes on {} threads",
            corpus.len(),
            recipes.len(),
            rayon::current_num_threads()
        );
        Ok(corpus)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(style);
        }
        bar
    }
}
