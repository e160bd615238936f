//! Rule-based English noun lemmatizer.
//!
//! The training pipeline reduced every token to its dictionary base form;
//! this ports that step as an irregular-plural table plus ordered suffix
//! detachments with stem guards. Without a full lexicon the rules are
//! heuristic, so common words the suffix rules would mangle live in the
//! exception table.

use std::collections::HashMap;
use std::sync::LazyLock;

static IRREGULAR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("lice", "louse"),
        ("oxen", "ox"),
        ("wives", "wife"),
        ("lives", "life"),
        ("knives", "knife"),
        ("potatoes", "potato"),
        ("tomatoes", "tomato"),
        ("heroes", "hero"),
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("zombies", "zombie"),
        ("selfies", "selfie"),
        ("series", "series"),
        ("species", "species"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("diagnoses", "diagnosis"),
        ("phenomena", "phenomenon"),
        ("criteria", "criterion"),
        ("indices", "index"),
        ("matrices", "matrix"),
        ("appendices", "appendix"),
        // singular words the suffix rules would mangle
        ("regimen", "regimen"),
        ("specimen", "specimen"),
        ("abdomen", "abdomen"),
        // s-final words that are not plurals
        ("news", "news"),
        ("thanks", "thanks"),
        ("always", "always"),
        ("perhaps", "perhaps"),
        ("besides", "besides"),
        ("towards", "towards"),
        ("sometimes", "sometimes"),
    ])
});

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Reduce one lowercase token to its base form.
pub fn lemmatize(token: &str) -> String {
    if let Some(base) = IRREGULAR.get(token) {
        return (*base).to_string();
    }

    if let Some(stem) = token.strip_suffix("men") {
        // short stems are -men words, not compounds of "man" (amen, ramen)
        if stem.len() >= 3 {
            return format!("{stem}man");
        }
    }

    if !token.ends_with('s') || token.len() <= 3 {
        return token.to_string();
    }
    // -ss, -us, -is nouns are singular already (class, virus, tennis)
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("ches") {
        return format!("{stem}ch");
    }
    if let Some(stem) = token.strip_suffix("shes") {
        return format!("{stem}sh");
    }
    if let Some(stem) = token.strip_suffix("xes") {
        return format!("{stem}x");
    }
    if let Some(stem) = token.strip_suffix("zes") {
        return format!("{stem}z");
    }
    if let Some(stem) = token.strip_suffix("ves") {
        if stem.len() > 1 {
            return format!("{stem}f");
        }
    }
    if let Some(stem) = token.strip_suffix("ses") {
        // sibilant plural (classes, kisses) vs plain -e noun (houses, cases)
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}s");
        }
    }

    token[..token.len() - 1].to_string()
}
