//! Guess matching with case, whitespace, and diacritic folding.

use crate::domain::ports::GuessValidator;

/// Compares guesses against song titles after normalization, so
/// `" L'Estate  "` matches `"l'estate"` and `"perche"` matches `"perché"`.
pub struct NormalizingGuessValidator;

impl NormalizingGuessValidator {
    pub fn new() -> Self {
        Self
    }

    fn normalize(input: &str) -> String {
        input
            .to_lowercase()
            .chars()
            .filter_map(fold_char)
            .collect()
    }
}

impl Default for NormalizingGuessValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl GuessValidator for NormalizingGuessValidator {
    fn is_correct_guess(&self, submitted: &str, title: &str) -> bool {
        let normalized_guess = Self::normalize(submitted);
        !normalized_guess.is_empty() && normalized_guess == Self::normalize(title)
    }
}

/// Maps accented latin vowels (and ç/ñ) to their base letter, keeps other
/// alphanumerics, and drops everything else (whitespace, punctuation).
fn fold_char(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    };
    if folded.is_alphanumeric() {
        Some(folded)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        // given:
        let validator = NormalizingGuessValidator::new();

        // then:
        assert!(validator.is_correct_guess("VOLARE", "Volare"));
    }

    #[test]
    fn test_matching_ignores_surrounding_and_inner_whitespace() {
        // given:
        let validator = NormalizingGuessValidator::new();

        // then:
        assert!(validator.is_correct_guess("  la  canzone ", "La Canzone"));
    }

    #[test]
    fn test_matching_folds_diacritics() {
        // given:
        let validator = NormalizingGuessValidator::new();

        // then:
        assert!(validator.is_correct_guess("perche", "Perché"));
        assert!(validator.is_correct_guess("città vuota", "Citta Vuota"));
    }

    #[test]
    fn test_matching_ignores_punctuation() {
        // given:
        let validator = NormalizingGuessValidator::new();

        // then:
        assert!(validator.is_correct_guess("lestate", "L'Estate"));
    }

    #[test]
    fn test_wrong_guess_is_rejected() {
        // given:
        let validator = NormalizingGuessValidator::new();

        // then:
        assert!(!validator.is_correct_guess("Azzurro", "Volare"));
    }

    #[test]
    fn test_blank_guess_never_matches() {
        // given:
        let validator = NormalizingGuessValidator::new();

        // then: even against a title that normalizes to nothing
        assert!(!validator.is_correct_guess("   ", "   "));
        assert!(!validator.is_correct_guess("", "Volare"));
    }
}
