//! Deterministic text cleaning applied before classification.
//!
//! The model was trained on exactly this sequence of transforms, so the
//! order of steps matters: possessive suffix, hashtags, mentions, URLs,
//! contraction expansion, non-letter removal, lowercasing, lemmatization.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::lemma::lemmatize;

static POSSESSIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'s\b").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[A-Za-z0-9]+").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)*").unwrap());
static NON_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z]").unwrap());

// Forms ending in 's never reach this table: the possessive rule has already
// rewritten them by the time contractions are expanded.
static CONTRACTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("ain't", "am not"),
        ("aren't", "are not"),
        ("can't", "cannot"),
        ("could've", "could have"),
        ("couldn't", "could not"),
        ("didn't", "did not"),
        ("doesn't", "does not"),
        ("don't", "do not"),
        ("hadn't", "had not"),
        ("hasn't", "has not"),
        ("haven't", "have not"),
        ("he'd", "he would"),
        ("he'll", "he will"),
        ("how'd", "how did"),
        ("how'll", "how will"),
        ("i'd", "i would"),
        ("i'll", "i will"),
        ("i'm", "i am"),
        ("i've", "i have"),
        ("isn't", "is not"),
        ("it'd", "it would"),
        ("it'll", "it will"),
        ("ma'am", "madam"),
        ("might've", "might have"),
        ("mightn't", "might not"),
        ("must've", "must have"),
        ("mustn't", "must not"),
        ("needn't", "need not"),
        ("o'clock", "of the clock"),
        ("oughtn't", "ought not"),
        ("shan't", "shall not"),
        ("she'd", "she would"),
        ("she'll", "she will"),
        ("should've", "should have"),
        ("shouldn't", "should not"),
        ("that'd", "that would"),
        ("there'd", "there would"),
        ("they'd", "they would"),
        ("they'll", "they will"),
        ("they're", "they are"),
        ("they've", "they have"),
        ("wasn't", "was not"),
        ("we'd", "we would"),
        ("we'll", "we will"),
        ("we're", "we are"),
        ("we've", "we have"),
        ("weren't", "were not"),
        ("what'll", "what will"),
        ("what're", "what are"),
        ("what've", "what have"),
        ("where'd", "where did"),
        ("where've", "where have"),
        ("who'll", "who will"),
        ("who're", "who are"),
        ("who've", "who have"),
        ("why'd", "why did"),
        ("won't", "will not"),
        ("would've", "would have"),
        ("wouldn't", "would not"),
        ("y'all", "you all"),
        ("you'd", "you would"),
        ("you'll", "you will"),
        ("you're", "you are"),
        ("you've", "you have"),
        // common informal forms
        ("gonna", "going to"),
        ("wanna", "want to"),
        ("gotta", "got to"),
        ("kinda", "kind of"),
        ("sorta", "sort of"),
        ("dunno", "do not know"),
        ("lemme", "let me"),
        ("gimme", "give me"),
        ("imma", "i am going to"),
    ])
});

/// Clean one raw comment into the form the model was trained on.
///
/// Pure and deterministic; idempotent on its own output. May return the
/// empty string.
pub fn normalize(raw: &str) -> String {
    let text = POSSESSIVE.replace_all(raw, " is");
    let text = text.replace('#', "");
    let text = MENTION.replace_all(&text, "");
    let text = URL.replace_all(&text, "");
    let text = WORD.replace_all(&text, |caps: &Captures<'_>| {
        let word = &caps[0];
        match CONTRACTIONS.get(word.to_lowercase().as_str()) {
            Some(expanded) => (*expanded).to_string(),
            None => word.to_string(),
        }
    });
    let text = NON_LETTER.replace_all(&text, " ");
    let text = text.to_lowercase();

    let mut cleaned = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        if !cleaned.is_empty() {
            cleaned.push(' ');
        }
        cleaned.push_str(&lemmatize(token));
    }
    cleaned
}
