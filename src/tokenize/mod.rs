mod data;
mod treebank;

pub use data::{download_data, install_builtin, TokenizerData, DATA_FILE};
pub use treebank::{tokenize_words, TreebankTokenizer};

use log::{debug, info, warn};
use std::sync::{Mutex, PoisonError};

use crate::error::TokenizeError;

/// Token dropped from every tokenized field, in any letter case
const FILTERED_TOKEN: &str = "advertisement";

/// Unified trait for word tokenizer backends
pub trait WordTokenizer: Send + Sync {
    /// Backend name (e.g., "treebank")
    fn name(&self) -> &str;

    /// Split text into word tokens.
    ///
    /// Fails with [`TokenizeError::DataMissing`] when the backend's model
    /// data is not available locally.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError>;

    /// Whether model data is available without a download
    fn is_ready(&self) -> bool {
        true
    }

    /// Fetch model data so that later calls to `tokenize` succeed
    fn download_data(&self) -> Result<(), TokenizeError> {
        Ok(())
    }
}

/// Turns free text into space-joined tokens using a [`WordTokenizer`] backend.
///
/// Missing model data is fetched once and the failed call retried once;
/// a second failure is returned to the caller. Call [`prepare`](Self::prepare)
/// to fetch the data before the first tokenization instead.
pub struct SentenceTokenizer {
    backend: Box<dyn WordTokenizer>,
    download_lock: Mutex<()>,
}

impl SentenceTokenizer {
    pub fn new(backend: impl WordTokenizer + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn WordTokenizer>) -> Self {
        Self {
            backend,
            download_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Download model data up front if the backend is not ready
    pub fn prepare(&self) -> Result<(), TokenizeError> {
        if self.backend.is_ready() {
            debug!("{} tokenizer data already available", self.backend.name());
            return Ok(());
        }
        self.download()
    }

    /// Tokenize a sentence and join the tokens with single spaces
    pub fn tokenize_sentence(&self, sentence: &str) -> Result<String, TokenizeError> {
        match self.tokenize_filtered(sentence) {
            Err(TokenizeError::DataMissing { path }) => {
                warn!("Tokenizer data missing at {}", path.display());
                self.download()?;
                self.tokenize_filtered(sentence)
            }
            result => result,
        }
    }

    fn download(&self) -> Result<(), TokenizeError> {
        let _guard = self
            .download_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished the download while we waited
        if self.backend.is_ready() {
            debug!("{} tokenizer data arrived while waiting", self.backend.name());
            return Ok(());
        }
        eprintln!("Downloading tokenizer data");
        info!("Downloading data for {} tokenizer", self.backend.name());
        self.backend.download_data()
    }

    fn tokenize_filtered(&self, sentence: &str) -> Result<String, TokenizeError> {
        let tokens = self.backend.tokenize(sentence)?;
        Ok(tokens
            .into_iter()
            .filter(|token| token.to_lowercase() != FILTERED_TOKEN)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct WhitespaceTokenizer;

    impl WordTokenizer for WhitespaceTokenizer {
        fn name(&self) -> &str {
            "whitespace"
        }

        fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
            Ok(text.split_whitespace().map(str::to_string).collect())
        }
    }

    /// Fails until `download_data` has run, if downloads succeed at all
    struct LazyTokenizer {
        ready: AtomicBool,
        download_fixes: bool,
        downloads: Arc<AtomicUsize>,
    }

    impl LazyTokenizer {
        fn new(download_fixes: bool) -> (Self, Arc<AtomicUsize>) {
            let downloads = Arc::new(AtomicUsize::new(0));
            let tokenizer = Self {
                ready: AtomicBool::new(false),
                download_fixes,
                downloads: Arc::clone(&downloads),
            };
            (tokenizer, downloads)
        }
    }

    impl WordTokenizer for LazyTokenizer {
        fn name(&self) -> &str {
            "lazy"
        }

        fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
            if !self.ready.load(Ordering::SeqCst) {
                return Err(TokenizeError::DataMissing {
                    path: PathBuf::from("lazy/data.json"),
                });
            }
            WhitespaceTokenizer.tokenize(text)
        }

        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn download_data(&self) -> Result<(), TokenizeError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            if self.download_fixes {
                self.ready.store(true, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    #[test]
    fn test_removes_advertisement_tokens() {
        let tokenizer = SentenceTokenizer::new(WhitespaceTokenizer);
        let result = tokenizer
            .tokenize_sentence("Mix flour Advertisement and water")
            .unwrap();
        assert_eq!(result, "Mix flour and water");

        let result = tokenizer
            .tokenize_sentence("ADVERTISEMENT Stir advertisement")
            .unwrap();
        assert_eq!(result, "Stir");
    }

    #[test]
    fn test_missing_data_downloads_once_and_retries() {
        let (backend, downloads) = LazyTokenizer::new(true);
        let tokenizer = SentenceTokenizer::new(backend);

        assert_eq!(tokenizer.tokenize_sentence("Whisk eggs").unwrap(), "Whisk eggs");
        assert_eq!(tokenizer.tokenize_sentence("Fold gently").unwrap(), "Fold gently");
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_second_failure_propagates() {
        let (backend, downloads) = LazyTokenizer::new(false);
        let tokenizer = SentenceTokenizer::new(backend);

        let result = tokenizer.tokenize_sentence("Whisk eggs");
        assert!(matches!(result, Err(TokenizeError::DataMissing { .. })));
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prepare_downloads_before_tokenizing() {
        let (backend, downloads) = LazyTokenizer::new(true);
        let tokenizer = SentenceTokenizer::new(backend);

        tokenizer.prepare().unwrap();
        assert_eq!(downloads.load(Ordering::SeqCst), 1);

        tokenizer.prepare().unwrap();
        tokenizer.tokenize_sentence("Serve").unwrap();
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_missing_data_downloads_once() {
        let (backend, downloads) = LazyTokenizer::new(true);
        let tokenizer = SentenceTokenizer::new(backend);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    assert_eq!(tokenizer.tokenize_sentence("Chop onions").unwrap(), "Chop onions");
                });
            }
        });
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ready_backend_skips_download() {
        let tokenizer = SentenceTokenizer::new(WhitespaceTokenizer);
        assert_eq!(tokenizer.backend_name(), "whitespace");
        assert!(tokenizer.prepare().is_ok());
    }
}
