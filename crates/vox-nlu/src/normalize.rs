//! Locale-aware utterance normalization.

/// Contraction expansions applied for English locales.
const EN_CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("i'll", "i will"),
    ("i've", "i have"),
    ("i'd", "i would"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("what's", "what is"),
    ("who's", "who is"),
    ("where's", "where is"),
    ("there's", "there is"),
    ("here's", "here is"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("let's", "let us"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("can't", "can not"),
    ("couldn't", "could not"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("you're", "you are"),
    ("you've", "you have"),
    ("you'll", "you will"),
    ("they're", "they are"),
    ("we're", "we are"),
];

/// Normalize an utterance before in-process scoring: lowercase,
/// expand contractions for English locales, collapse whitespace.
/// Non-English locales are lowercased and whitespace-collapsed only.
#[must_use]
pub fn normalize(text: &str, lang: &str) -> String {
    let lowered = text.to_lowercase();
    let expand = lang.starts_with("en");

    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(|word| {
            if expand {
                EN_CONTRACTIONS
                    .iter()
                    .find(|(from, _)| *from == word)
                    .map(|(_, to)| *to)
                    .unwrap_or(word)
            } else {
                word
            }
        })
        .collect();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_contractions() {
        assert_eq!(normalize("what's the weather", "en-us"), "what is the weather");
        assert_eq!(normalize("It's a boy", "en-us"), "it is a boy");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  what   time ", "en-us"), "what time");
    }

    #[test]
    fn non_english_passes_through() {
        assert_eq!(normalize("Wie spät ist's", "de-de"), "wie spät ist's");
    }
}
