//! Token-level normalization
//!
//! Tokenization splits on whitespace and separates punctuation into its own
//! tokens. Lemmatization is a light suffix-rule lemmatizer for English with a
//! small irregular-form table; it never lengthens a token.

/// English stop words (lowercase).
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves", "'s", "n't",
];

/// Irregular plural and past forms.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("went", "go"),
    ("gone", "go"),
    ("ran", "run"),
    ("took", "take"),
    ("taken", "take"),
    ("made", "make"),
    ("gave", "give"),
    ("given", "give"),
    ("saw", "see"),
    ("seen", "see"),
];

/// Split text into word and punctuation tokens.
///
/// Apostrophes and hyphens inside a word are kept with it.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let chars: Vec<char> = chunk.chars().collect();
        let mut word = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let joiner = (c == '\'' || c == '-')
                && !word.is_empty()
                && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if c.is_alphanumeric() || joiner {
                word.push(c);
            } else {
                if !word.is_empty() {
                    tokens.push(std::mem::take(&mut word));
                }
                tokens.push(c.to_string());
            }
        }
        if !word.is_empty() {
            tokens.push(word);
        }
    }
    tokens
}

/// Whether the token contains no alphanumeric character.
#[must_use]
pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_alphanumeric)
}

/// Whether the (lowercase) token is a stop word.
#[must_use]
pub fn is_stopword(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Reduce a lowercase token to its lemma.
#[must_use]
pub fn lemmatize(token: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == token) {
        return (*lemma).to_string();
    }
    if token.len() <= 3 || !token.is_ascii() {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix('s') {
        return stem.to_string();
    }
    if let Some(stem) = token.strip_suffix("ing") {
        if stem.len() >= 3 && stem.chars().any(is_vowel) {
            return undouble(stem);
        }
    }
    if let Some(stem) = token.strip_suffix("ied") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if !token.ends_with("eed") {
        if let Some(stem) = token.strip_suffix("ed") {
            if stem.len() >= 3 && stem.chars().any(is_vowel) {
                return undouble(stem);
            }
        }
    }
    token.to_string()
}

const fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `runn` -> `run`, `stopp` -> `stop`; `ll`, `ss`, `zz` are kept.
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !matches!(bytes[n - 1], b'l' | b's' | b'z') {
        stem[..n - 1].to_string()
    } else {
        stem.to_string()
    }
}
