use std::fmt;

use super::IngredientNormalizer;

const SCRAPE_ARTIFACT: &str = "advertisement";

/// Canonical unit names and the spellings that map to them
const UNITS: &[(&str, &[&str])] = &[
    ("cup", &["cup", "cups", "c"]),
    (
        "tablespoon",
        &["tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "tbl", "tbls"],
    ),
    ("teaspoon", &["teaspoon", "teaspoons", "tsp", "tsps"]),
    ("ounce", &["ounce", "ounces", "oz"]),
    ("pound", &["pound", "pounds", "lb", "lbs"]),
    ("gram", &["gram", "grams", "g"]),
    ("kilogram", &["kilogram", "kilograms", "kg"]),
    (
        "milliliter",
        &["milliliter", "milliliters", "millilitre", "millilitres", "ml"],
    ),
    ("liter", &["liter", "liters", "litre", "litres", "l"]),
    ("pint", &["pint", "pints", "pt"]),
    ("quart", &["quart", "quarts", "qt"]),
    ("gallon", &["gallon", "gallons", "gal"]),
    ("pinch", &["pinch", "pinches"]),
    ("dash", &["dash", "dashes"]),
    ("clove", &["clove", "cloves"]),
    ("can", &["can", "cans"]),
    ("package", &["package", "packages", "pkg"]),
    ("slice", &["slice", "slices"]),
    ("stick", &["stick", "sticks"]),
];

const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Amount of an ingredient
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Amount(f64),
    Range(f64, f64),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Amount(amount) => write!(f, "{}", format_amount(*amount)),
            Quantity::Range(low, high) => {
                write!(f, "{}-{}", format_amount(*low), format_amount(*high))
            }
        }
    }
}

/// An ingredient line split into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub quantity: Option<Quantity>,
    pub unit: Option<&'static str>,
    pub name: String,
    /// Preparation note after the first comma ("chopped", "softened")
    pub note: Option<String>,
}

impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(quantity) = self.quantity {
            parts.push(quantity.to_string());
        }
        if let Some(unit) = self.unit {
            parts.push(unit.to_string());
        }
        if !self.name.is_empty() {
            parts.push(self.name.clone());
        }
        write!(f, "{}", parts.join(" "))?;
        if let Some(note) = &self.note {
            write!(f, ", {}", note)?;
        }
        Ok(())
    }
}

/// Rule-based ingredient line parser.
///
/// Recognizes a leading quantity (integers, decimals, fractions, mixed
/// numbers, unicode fractions, ranges), a cooking unit, the ingredient name
/// and a trailing preparation note.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngredientParser;

impl IngredientParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_line(&self, line: &str) -> ParsedIngredient {
        let cleaned = strip_artifacts(line);
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        let (quantity, mut rest) = match parse_quantity(&words) {
            Some((quantity, consumed)) => (Some(quantity), &words[consumed..]),
            None => (None, &words[..]),
        };

        let mut unit = None;
        if quantity.is_some() {
            if let Some(found) = rest.first().and_then(|word| lookup_unit(word)) {
                unit = Some(found);
                rest = &rest[1..];
            }
        }
        if unit.is_some() && rest.first().map_or(false, |word| word.eq_ignore_ascii_case("of")) {
            rest = &rest[1..];
        }

        let remainder = rest.join(" ").replace(';', ",");
        let (name, note) = match remainder.split_once(',') {
            Some((name, note)) => {
                let note = note.trim();
                (
                    name.trim().to_string(),
                    (!note.is_empty()).then(|| note.to_string()),
                )
            }
            None => (remainder.trim().to_string(), None),
        };

        ParsedIngredient {
            quantity,
            unit,
            name,
            note,
        }
    }
}

impl IngredientNormalizer for IngredientParser {
    fn normalize(&self, ingredients: &[String]) -> Vec<String> {
        ingredients
            .iter()
            .map(|line| self.parse_line(line).to_string().replace(';', ","))
            .collect()
    }
}

/// Drop the "ADVERTISEMENT" marker the scraped dataset appends to lines
fn strip_artifacts(line: &str) -> String {
    line.split_whitespace()
        .filter_map(strip_artifact)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_artifact(word: &str) -> Option<&str> {
    let cut = match word.len().checked_sub(SCRAPE_ARTIFACT.len()) {
        Some(cut) => cut,
        None => return Some(word),
    };
    match word.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(SCRAPE_ARTIFACT) => {
            let head = &word[..cut];
            (!head.is_empty()).then_some(head)
        }
        _ => Some(word),
    }
}

fn parse_quantity(words: &[&str]) -> Option<(Quantity, usize)> {
    let first = *words.first()?;

    if let Some((low, high)) = first.split_once('-') {
        if let (Some(low), Some(high)) = (parse_amount(low), parse_amount(high)) {
            return Some((Quantity::Range(low, high), 1));
        }
    }

    let mut amount = parse_amount(first)?;
    let mut consumed = 1;

    if let Some(next) = words.get(1) {
        if amount.fract() == 0.0 && is_fraction(next) {
            if let Some(fraction) = parse_amount(next) {
                amount += fraction;
                consumed = 2;
            }
        }
    }

    if let (Some(joiner), Some(next)) = (words.get(consumed), words.get(consumed + 1)) {
        if matches!(joiner.to_ascii_lowercase().as_str(), "-" | "to" | "or") {
            if let Some(high) = parse_amount(next) {
                return Some((Quantity::Range(amount, high), consumed + 2));
            }
        }
    }

    Some((Quantity::Amount(amount), consumed))
}

fn is_fraction(word: &str) -> bool {
    word.contains('/') || word.chars().any(|c| vulgar_value(c).is_some())
}

fn vulgar_value(c: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, value)| *value)
}

fn parse_amount(word: &str) -> Option<f64> {
    let last = word.chars().last()?;
    if let Some(fraction) = vulgar_value(last) {
        let whole = &word[..word.len() - last.len_utf8()];
        if whole.is_empty() {
            return Some(fraction);
        }
        return parse_decimal(whole).map(|whole| whole + fraction);
    }

    if let Some((numerator, denominator)) = word.split_once('/') {
        let numerator = parse_decimal(numerator)?;
        let denominator = parse_decimal(denominator)?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    parse_decimal(word)
}

fn parse_decimal(word: &str) -> Option<f64> {
    let numeric = !word.is_empty()
        && word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == '.');
    if numeric {
        word.parse().ok()
    } else {
        None
    }
}

fn lookup_unit(word: &str) -> Option<&'static str> {
    let key = word.trim_end_matches('.').to_lowercase();
    UNITS
        .iter()
        .find(|(_, spellings)| spellings.contains(&key.as_str()))
        .map(|(canonical, _)| *canonical)
}

fn format_amount(amount: f64) -> String {
    let rounded = (amount * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
