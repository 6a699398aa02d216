use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Raw recipe records keyed by their dataset id, in file order
pub type RecipeMap = IndexMap<String, RawRecipe>;

/// A recipe record as it appears in the raw dataset.
///
/// Absent keys and explicit `null` values both read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawRecipe {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawRecipe {
    pub fn new(
        title: impl Into<String>,
        ingredients: Vec<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            ingredients,
            instructions: Some(instructions.into()),
        }
    }

    /// Title and instructions when both are present
    pub fn complete_fields(&self) -> Option<(&str, &str)> {
        match (&self.title, &self.instructions) {
            (Some(title), Some(instructions)) => Some((title, instructions)),
            _ => None,
        }
    }
}

/// Token strings for one recipe: the title and the ingredients-plus-instructions body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedRecipe {
    pub title: String,
    pub body: String,
}

impl TokenizedRecipe {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// All tokenized recipes of one run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizedCorpus {
    recipes: Vec<TokenizedRecipe>,
}

impl TokenizedCorpus {
    pub fn new(recipes: Vec<TokenizedRecipe>) -> Self {
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenizedRecipe> {
        self.recipes.iter()
    }

    pub fn as_slice(&self) -> &[TokenizedRecipe] {
        &self.recipes
    }

    /// Split into aligned `(titles, bodies)` columns
    pub fn unzip(self) -> (Vec<String>, Vec<String>) {
        self.recipes
            .into_iter()
            .map(|recipe| (recipe.title, recipe.body))
            .unzip()
    }
}

impl From<Vec<TokenizedRecipe>> for TokenizedCorpus {
    fn from(recipes: Vec<TokenizedRecipe>) -> Self {
        Self::new(recipes)
    }
}

impl FromIterator<TokenizedRecipe> for TokenizedCorpus {
    fn from_iter<I: IntoIterator<Item = TokenizedRecipe>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TokenizedCorpus {
    type Item = TokenizedRecipe;
    type IntoIter = std::vec::IntoIter<TokenizedRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenizedCorpus {
    type Item = &'a TokenizedRecipe;
    type IntoIter = std::slice::Iter<'a, TokenizedRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}
