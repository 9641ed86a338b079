//! Process-wide word tokenizer.
//!
//! Nothing is installed implicitly: callers pick a tokenizer with [`init`]
//! and release it with [`teardown`]. Until then [`current`] hands out the
//! offline fallback, so keyword analysis always works without setup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Words with optional inner hyphens/apostrophes, or single punctuation marks
const STANDARD_PATTERN: &str = r"\w+(?:[-'’]\w+)*|[^\w\s]";

static INSTALLED: RwLock<Option<Arc<Tokenizer>>> = RwLock::new(None);

static FALLBACK: Lazy<Arc<Tokenizer>> = Lazy::new(|| Arc::new(Tokenizer::Fallback));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    #[default]
    Standard,
    Fallback,
}

impl FromStr for TokenizerKind {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(TokenizerKind::Standard),
            "fallback" => Ok(TokenizerKind::Fallback),
            other => Err(TokenizerError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("unknown tokenizer '{0}' (expected 'standard' or 'fallback')")]
    UnknownKind(String),
    #[error("invalid tokenizer pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug)]
pub enum Tokenizer {
    /// Regex tokenizer keeping hyphenated and apostrophe words whole
    Standard(Regex),
    /// Splits on every character that is neither alphanumeric nor `_`
    Fallback,
}

impl Tokenizer {
    pub fn new(kind: TokenizerKind) -> Result<Self, TokenizerError> {
        match kind {
            TokenizerKind::Standard => Ok(Tokenizer::Standard(Regex::new(STANDARD_PATTERN)?)),
            TokenizerKind::Fallback => Ok(Tokenizer::Fallback),
        }
    }

    pub fn kind(&self) -> TokenizerKind {
        match self {
            Tokenizer::Standard(_) => TokenizerKind::Standard,
            Tokenizer::Fallback => TokenizerKind::Fallback,
        }
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Tokenizer::Standard(pattern) => pattern.find_iter(text).map(|m| m.as_str()).collect(),
            Tokenizer::Fallback => text
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|token| !token.is_empty())
                .collect(),
        }
    }
}

/// Installs the process-wide tokenizer, replacing any previous one
pub fn init(kind: TokenizerKind) -> Result<Arc<Tokenizer>, TokenizerError> {
    let tokenizer = Arc::new(Tokenizer::new(kind)?);
    let mut slot = INSTALLED.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(Arc::clone(&tokenizer));
    tracing::debug!(kind = ?kind, "Tokenizer installed");
    Ok(tokenizer)
}

/// The installed tokenizer, or the fallback when none is installed
pub fn current() -> Arc<Tokenizer> {
    INSTALLED
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
        .map(Arc::clone)
        .unwrap_or_else(|| Arc::clone(&FALLBACK))
}

pub fn is_initialized() -> bool {
    INSTALLED
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .is_some()
}

/// Uninstalls the process-wide tokenizer; later calls see the fallback
pub fn teardown() {
    let mut slot = INSTALLED.write().unwrap_or_else(|e| e.into_inner());
    if slot.take().is_some() {
        tracing::debug!("Tokenizer torn down");
    }
}
