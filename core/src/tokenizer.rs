use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref LETTER_RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// How raw text is turned into terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    /// Lower-case, split on whitespace. Punctuation stays attached to the word.
    #[default]
    Whitespace,
    /// Lower-case, then every run of two or more word characters.
    Word,
    /// NFKC normalization, lower-case, stopword removal and English stemming.
    Stemmed,
}

impl Analyzer {
    /// Terms of `text` in occurrence order. Repeated terms are kept.
    pub fn terms(&self, text: &str) -> Vec<String> {
        match self {
            Analyzer::Whitespace => whitespace_terms(text),
            Analyzer::Word => word_terms(text),
            Analyzer::Stemmed => tokenize(text),
        }
    }

    /// Normalize a single query token the same way document terms were.
    ///
    /// A token can split into several terms (`web-mining` under
    /// [`Analyzer::Word`]) or into none at all (a stopword, or a one-letter
    /// word under [`Analyzer::Word`]).
    pub fn normalize_token(&self, token: &str) -> Vec<String> {
        match self {
            Analyzer::Whitespace => vec![token.to_lowercase()],
            _ => self.terms(token),
        }
    }
}

pub fn whitespace_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

pub fn word_terms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// NFKC-normalize, lower-case, drop stopwords and stem what is left.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    LETTER_RE
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(|token| STEMMER.stem(token).into_owned())
        .collect()
}
