use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use super::data::{download_data, install_builtin, TokenizerData, DATA_FILE};
use super::WordTokenizer;
use crate::config::PrepConfig;
use crate::error::TokenizeError;

const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

struct DataSource {
    path: PathBuf,
    url: Option<String>,
    timeout: Duration,
}

/// Rule-based Penn Treebank style word tokenizer.
///
/// Its abbreviation model is read lazily from the tokenizer data directory.
/// [`WordTokenizer::download_data`] fetches it from the configured URL, or
/// installs the bundled abbreviation set when no URL is set.
pub struct TreebankTokenizer {
    source: Option<DataSource>,
    data: OnceLock<TokenizerData>,
}

impl TreebankTokenizer {
    /// Tokenizer reading `abbreviations.json` from `data_dir`, installing the bundled set when missing
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(DataSource {
                path: data_dir.into().join(DATA_FILE),
                url: None,
                timeout: Duration::from_secs(30),
            }),
            data: OnceLock::new(),
        }
    }

    pub fn from_config(config: &PrepConfig) -> Self {
        let tokenizer = Self::new(config.tokenizer_dir())
            .with_timeout(Duration::from_secs(config.tokenizer.timeout));
        match &config.tokenizer.data_url {
            Some(url) => tokenizer.with_data_url(url.clone()),
            None => tokenizer,
        }
    }

    /// Fetch missing model data from `data_url` instead of the bundled set
    pub fn with_data_url(mut self, data_url: impl Into<String>) -> Self {
        if let Some(source) = self.source.as_mut() {
            source.url = Some(data_url.into());
        }
        self
    }

    /// Tokenizer with model data already in memory; never downloads
    pub fn with_data(data: TokenizerData) -> Self {
        Self {
            source: None,
            data: OnceLock::from(data),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Some(source) = self.source.as_mut() {
            source.timeout = timeout;
        }
        self
    }

    fn data(&self) -> Result<&TokenizerData, TokenizeError> {
        if let Some(data) = self.data.get() {
            return Ok(data);
        }
        let path = match &self.source {
            Some(source) => &source.path,
            None => {
                return Err(TokenizeError::DataMissing {
                    path: PathBuf::new(),
                })
            }
        };
        let loaded = TokenizerData::load(path)?;
        Ok(self.data.get_or_init(|| loaded))
    }
}

impl WordTokenizer for TreebankTokenizer {
    fn name(&self) -> &str {
        "treebank"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let data = self.data()?;
        Ok(tokenize_words(text, data))
    }

    fn is_ready(&self) -> bool {
        self.data.get().is_some()
            || self
                .source
                .as_ref()
                .map_or(false, |source| source.path.is_file())
    }

    fn download_data(&self) -> Result<(), TokenizeError> {
        match &self.source {
            Some(DataSource {
                path,
                url: Some(url),
                timeout,
            }) => download_data(url, path, *timeout),
            Some(DataSource { path, url: None, .. }) => install_builtin(path),
            None => Ok(()),
        }
    }
}

/// Split text into Treebank-style word tokens
pub fn tokenize_words(text: &str, data: &TokenizerData) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chunks = text.split_whitespace().peekable();
    while let Some(chunk) = chunks.next() {
        let ends_text = chunks.peek().is_none();
        split_chunk(chunk, data, ends_text, &mut tokens);
    }
    tokens
}

fn split_chunk(chunk: &str, data: &TokenizerData, ends_text: bool, out: &mut Vec<String>) {
    if chunk.chars().all(|c| c == '.') {
        out.push(chunk.to_string());
        return;
    }

    let mut core = chunk;
    while let Some(c) = core.chars().next() {
        if !is_opening(c) {
            break;
        }
        out.push(if c == '"' { "``".to_string() } else { c.to_string() });
        core = &core[c.len_utf8()..];
    }

    // Collected back to front
    let mut trailing = Vec::new();
    while let Some(c) = core.chars().last() {
        if is_closing(c) {
            trailing.push(if c == '"' { "''".to_string() } else { c.to_string() });
            core = &core[..core.len() - c.len_utf8()];
            continue;
        }
        if c == '.' {
            let stem = core.trim_end_matches('.');
            if core.len() - stem.len() > 1 {
                trailing.push(core[stem.len()..].to_string());
                core = stem;
                continue;
            }
            if splits_period(stem, data, ends_text) {
                trailing.push(".".to_string());
                core = stem;
                continue;
            }
        }
        break;
    }

    split_inner(core, out);
    out.extend(trailing.into_iter().rev());
}

fn split_inner(core: &str, out: &mut Vec<String>) {
    let chars: Vec<(usize, char)> = core.char_indices().collect();
    let mut word_start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        let prev = i.checked_sub(1).map(|j| chars[j].1);
        let next = chars.get(i + 1).map(|&(_, n)| n);

        if c == '-' && next == Some('-') {
            push_word(&core[word_start..pos], out);
            out.push("--".to_string());
            word_start = pos + 2;
            i += 2;
            continue;
        }

        if splits_inside(c, prev, next) {
            let quote_closes = word_start < pos;
            push_word(&core[word_start..pos], out);
            out.push(match c {
                '"' if quote_closes => "''".to_string(),
                '"' => "``".to_string(),
                _ => c.to_string(),
            });
            word_start = pos + c.len_utf8();
        }
        i += 1;
    }

    push_word(&core[word_start..], out);
}

fn push_word(word: &str, out: &mut Vec<String>) {
    if word.is_empty() {
        return;
    }
    match clitic_start(word) {
        Some(at) => {
            let (stem, clitic) = word.split_at(at);
            if !stem.is_empty() {
                out.push(stem.to_string());
            }
            out.push(clitic.to_string());
        }
        None => out.push(word.to_string()),
    }
}

/// Byte offset where a trailing contraction starts ("do|n't", "it|'s")
fn clitic_start(word: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets intact
    let lower = word.to_ascii_lowercase();
    if lower.len() > 3 && lower.ends_with("n't") {
        return Some(lower.len() - 3);
    }
    CLITICS
        .iter()
        .find(|clitic| lower.len() > clitic.len() && lower.ends_with(*clitic))
        .map(|clitic| lower.len() - clitic.len())
}

fn splits_period(stem: &str, data: &TokenizerData, ends_text: bool) -> bool {
    if stem.is_empty() {
        return true;
    }
    if stem.contains('.') {
        return false;
    }
    // Single-letter initials keep their period unless they end the text
    let mut chars = stem.chars();
    if let (Some(c), None, false) = (chars.next(), chars.next(), ends_text) {
        if c.is_alphabetic() {
            return false;
        }
    }
    !data.is_abbreviation(stem)
}

fn is_opening(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '<' | '"' | '$' | '#' | '@')
}

fn is_closing(c: char) -> bool {
    matches!(
        c,
        ')' | ']' | '}' | '>' | '"' | ',' | ';' | ':' | '!' | '?' | '%' | '*'
    )
}

fn splits_inside(c: char, prev: Option<char>, next: Option<char>) -> bool {
    match c {
        ',' | ':' => !(prev.map_or(false, |p| p.is_ascii_digit())
            && next.map_or(false, |n| n.is_ascii_digit())),
        ';' | '!' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '<' | '>' | '"' | '&' | '*'
        | '=' | '+' => true,
        _ => false,
    }
}
