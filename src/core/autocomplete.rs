//! Autocomplete providers.
//!
//! The engine only knows the `Shell::on_autocomplete` hook. These providers are
//! ready-made strategies a shell can delegate to from that hook.

use crate::core::glob::glob_match;

/// Suggests a replacement for the current input.
pub trait Completer {
    /// Return the new input, or `None` to leave it unchanged.
    fn complete(&self, input: &str) -> Option<String>;
}

impl<F> Completer for F
where
    F: Fn(&str) -> Option<String>,
{
    fn complete(&self, input: &str) -> Option<String> {
        self(input)
    }
}

/// Completes the input to the first vocabulary word matching `input*`.
///
/// Words are tried in insertion order. Empty input never completes, and glob
/// metacharacters typed by the user keep their wildcard meaning.
#[derive(Debug, Clone, Default)]
pub struct VocabularyCompleter {
    words: Vec<String>,
}

impl VocabularyCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, word: impl Into<String>) {
        self.words.push(word.into());
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|candidate| candidate == word)
    }

    /// Every word matching `input*`, in vocabulary order.
    pub fn candidates<'a>(&'a self, input: &str) -> impl Iterator<Item = &'a str> + 'a {
        let pattern = format!("{input}*");
        let enabled = !input.is_empty();
        self.words
            .iter()
            .filter(move |word| enabled && glob_match(word, &pattern))
            .map(String::as_str)
    }
}

impl Completer for VocabularyCompleter {
    fn complete(&self, input: &str) -> Option<String> {
        self.candidates(input).next().map(str::to_string)
    }
}
