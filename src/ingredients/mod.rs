mod parser;

pub use parser::{IngredientParser, ParsedIngredient, Quantity};

/// Turns a recipe's raw ingredient lines into normalized ingredient strings.
///
/// Implementations must return one string per input line, in input order,
/// deterministically, and must never emit `';'` since the pipeline uses it
/// as the ingredient separator.
pub trait IngredientNormalizer: Send + Sync {
    fn normalize(&self, ingredients: &[String]) -> Vec<String>;
}
