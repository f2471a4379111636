use super::vocab::{is_non_load_word, CANONICAL_LOADS, KNOWN_LOADS, LOAD_FILLER_WORDS};

/// Decide whether a candidate cargo-load string is plausible.
///
/// Known loads are accepted outright. Anything else must survive the
/// word-shape rules: a single word has to be alphabetic, at least three
/// characters and not a connective; a phrase is rejected when more than half
/// of its words are connectives and otherwise needs one real word in it.
pub fn is_valid_load(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.chars().count() < 2 {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let lower = trimmed.to_lowercase();
    if KNOWN_LOADS.contains(&lower.as_str()) {
        return true;
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    if let [word] = words.as_slice() {
        if is_non_load_word(word) {
            return false;
        }
        return looks_like_word(word);
    }

    let rejected = words.iter().filter(|w| is_non_load_word(w)).count();
    if rejected * 2 > words.len() {
        return false;
    }
    words.iter().any(|w| looks_like_word(w))
}

/// Canonicalize an accepted load into its display form.
///
/// Filler verbs ("deliver", "kuha", ...) are stripped first; if that leaves
/// nothing valid, the untouched candidate gets a second chance so a
/// legitimate one-word load is never filtered away.
pub fn normalize_load(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if let Some((_, canonical)) = CANONICAL_LOADS.iter().find(|(key, _)| *key == lower) {
        return Some((*canonical).to_string());
    }

    let kept: Vec<&str> = trimmed
        .split_whitespace()
        .filter(|w| !LOAD_FILLER_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    if !kept.is_empty() {
        let cleaned = kept.join(" ");
        if is_valid_load(&cleaned) {
            return Some(cleaned);
        }
    }

    is_valid_load(trimmed).then(|| trimmed.to_string())
}

fn looks_like_word(word: &str) -> bool {
    word.chars().count() >= 3 && word.chars().all(char::is_alphabetic)
}
