use crate::models::{Document, KeywordDensity, KeywordEntry, TopKeyword, TopKeywords};
use crate::tokenizer::{self, Tokenizer};
use std::collections::HashMap;

/// Maximum number of entries in a top-keyword ranking
pub const TOP_KEYWORDS_LIMIT: usize = 10;

/// Keyword density of `text` using the process-wide tokenizer
pub fn density(text: &str) -> KeywordDensity {
    density_with(&tokenizer::current(), text)
}

pub fn density_with(tokenizer: &Tokenizer, text: &str) -> KeywordDensity {
    let lowered = text.to_lowercase();

    let mut entries: Vec<KeywordEntry> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut total = 0;

    let words = tokenizer
        .tokenize(&lowered)
        .into_iter()
        .filter(|token| token.chars().all(char::is_alphabetic));

    for (index, word) in words.enumerate() {
        total += 1;
        match positions.get(word) {
            Some(&pos) => entries[pos].count += 1,
            None => {
                positions.insert(word, entries.len());
                entries.push(KeywordEntry {
                    token: word.to_string(),
                    count: 1,
                    percentage: 0.0,
                    first_index: index,
                });
            }
        }
    }

    if total == 0 {
        return KeywordDensity::default();
    }

    for entry in &mut entries {
        entry.percentage = round_percentage(entry.count as f64 / total as f64 * 100.0);
    }

    KeywordDensity {
        entries,
        total_tokens: total,
    }
}

/// Highest-density keywords, ties resolved by first occurrence
pub fn top_keywords(density: &KeywordDensity) -> TopKeywords {
    let mut ranked: Vec<&KeywordEntry> = density.entries().iter().collect();
    ranked.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then(a.first_index.cmp(&b.first_index))
    });

    ranked
        .into_iter()
        .take(TOP_KEYWORDS_LIMIT)
        .map(|entry| TopKeyword {
            token: entry.token.clone(),
            percentage: entry.percentage,
        })
        .collect()
}

/// Text blob keyword density is computed over: body, title, meta description, alt texts
pub fn keyword_text(document: &Document) -> String {
    [
        document.body_text.as_str(),
        document.title.as_str(),
        document.meta_description(),
        document.image_alt_texts.join(" ").as_str(),
    ]
    .join(" ")
}

/// Two decimals; exact halves go to the even digit (`3.125` -> `3.12`)
fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
