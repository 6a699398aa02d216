use serde::Serialize;
use std::io::{self, Write};

use crate::error::PrepError;
use crate::model::TokenizedRecipe;

/// Marker attached to every row for the downstream model
pub const SEPARATOR: &str = "</>separator</>";

/// Column-oriented view of a tokenized corpus
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeTable {
    pub title: Vec<String>,
    pub ingredients: Vec<Vec<String>>,
    pub instructions: Vec<String>,
    pub separator: Vec<String>,
}

/// One row of a [`RecipeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecipeRow<'a> {
    pub title: &'a str,
    pub ingredients: &'a [String],
    pub instructions: &'a str,
    pub separator: &'a str,
}

impl RecipeTable {
    pub fn len(&self) -> usize {
        self.title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RecipeRow<'_>> + '_ {
        (0..self.len()).map(move |i| RecipeRow {
            title: &self.title[i],
            ingredients: &self.ingredients[i],
            instructions: &self.instructions[i],
            separator: &self.separator[i],
        })
    }

    /// Write one JSON object per row
    pub fn write_json_lines<W: Write>(&self, writer: W) -> Result<(), PrepError> {
        self.write_rows(writer).map_err(PrepError::Export)
    }

    fn write_rows<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for row in self.rows() {
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

/// Build the table from (title, body) pairs
pub fn make_table(recipes: &[TokenizedRecipe]) -> RecipeTable {
    let mut table = RecipeTable {
        title: Vec::with_capacity(recipes.len()),
        ingredients: Vec::with_capacity(recipes.len()),
        instructions: Vec::with_capacity(recipes.len()),
        separator: Vec::with_capacity(recipes.len()),
    };

    for recipe in recipes {
        let (ingredients, instructions) = split_body(&recipe.body);
        table.title.push(recipe.title.clone());
        table.ingredients.push(ingredients);
        table.instructions.push(instructions);
        table.separator.push(SEPARATOR.to_string());
    }

    table
}

/// Split a body on `';'`: every piece but the last is an ingredient, the last is the instructions.
///
/// Pieces are not trimmed. A body without `';'` has no ingredients.
pub fn split_body(body: &str) -> (Vec<String>, String) {
    let mut pieces: Vec<String> = body.split(';').map(str::to_string).collect();
    let instructions = pieces.pop().unwrap_or_default();
    (pieces, instructions)
}
