//! Phrase detection over the recent gesture buffer.
//!
//! The dictionary maps fingerspelled key sequences to display phrases and is
//! scanned in insertion order, so more specific keys must be registered
//! before their prefixes if both exist. Matching is a plain contiguous
//! substring check over the concatenated recent symbols.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use crate::types::Symbol;

/// How many recent buffer entries participate in a match.
pub const PHRASE_WINDOW: usize = 5;

/// How many emitted phrases the history retains.
const HISTORY_CAPACITY: usize = 5;

/// The stock phrase book.
pub const DEFAULT_PHRASES: [(&str, &str); 19] = [
    ("HELLO", "Hello"),
    ("GOODBYE", "Goodbye"),
    ("THANK", "Thank you"),
    ("PLEASE", "Please"),
    ("YES", "Yes"),
    ("NO", "No"),
    ("HELP", "Help"),
    ("SORRY", "Sorry"),
    ("LOVE", "Love"),
    ("WANT", "Want"),
    ("NEED", "Need"),
    ("HOW", "How are you?"),
    ("NAME", "What is your name?"),
    ("MY NAME", "My name is"),
    ("NICE MEET", "Nice to meet you"),
    ("LEARN", "I am learning sign language"),
    ("UNDERSTAND", "I understand"),
    ("NOT UNDERSTAND", "I don't understand"),
    ("AGAIN", "Please repeat"),
];

/// Ordered, immutable key-sequence-to-phrase mapping.
#[derive(Clone, Debug)]
pub struct PhraseDictionary {
    entries: Vec<(String, String)>,
}

impl PhraseDictionary {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, phrase)| (key.into(), phrase.into()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, phrase)| (key.as_str(), phrase.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PhraseDictionary {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES)
    }
}

pub struct PhraseMatcher {
    dictionary: PhraseDictionary,
    cooldown: Duration,
    last_emission: Option<Instant>,
    history: VecDeque<String>,
}

impl PhraseMatcher {
    pub fn new(dictionary: PhraseDictionary, cooldown: Duration) -> Self {
        Self {
            dictionary,
            cooldown,
            last_emission: None,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Scan the recent symbols (oldest first) for the first dictionary key
    /// occurring as a contiguous subsequence. Emissions are rate-limited;
    /// a miss leaves the cooldown timer untouched.
    pub fn check<I>(&mut self, recent: I, now: Instant) -> Option<String>
    where
        I: IntoIterator<Item = Symbol>,
    {
        if let Some(last) = self.last_emission {
            if now.duration_since(last) < self.cooldown {
                return None;
            }
        }

        let sequence: String = recent.into_iter().map(|s| s.key_fragment()).collect();
        if sequence.is_empty() {
            return None;
        }

        for (key, phrase) in self.dictionary.iter() {
            if sequence.contains(key) {
                log::debug!("phrase match: {key:?} in {sequence:?}");
                self.last_emission = Some(now);
                self.history.push_back(phrase.to_string());
                while self.history.len() > HISTORY_CAPACITY {
                    self.history.pop_front();
                }
                return Some(phrase.to_string());
            }
        }

        None
    }

    /// Emitted phrases, oldest first.
    pub fn recent_phrases(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(|phrase| phrase.as_str())
    }

    /// The retained phrase history joined into one displayable line.
    pub fn current_sentence(&self) -> String {
        self.history
            .iter()
            .map(|phrase| phrase.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(3000);

    fn matcher() -> PhraseMatcher {
        PhraseMatcher::new(PhraseDictionary::default(), COOLDOWN)
    }

    fn hello() -> [Symbol; 5] {
        [Symbol::H, Symbol::E, Symbol::L, Symbol::L, Symbol::O]
    }

    #[test]
    fn hello_sequence_matches() {
        let mut matcher = matcher();
        let phrase = matcher.check(hello(), Instant::now());
        assert_eq!(phrase.as_deref(), Some("Hello"));
    }

    #[test]
    fn partial_sequence_does_not_match() {
        let mut matcher = matcher();
        let phrase = matcher.check([Symbol::H, Symbol::E, Symbol::L], Instant::now());
        assert_eq!(phrase, None);
    }

    #[test]
    fn empty_sequence_does_not_match() {
        let mut matcher = matcher();
        assert_eq!(matcher.check([], Instant::now()), None);
    }

    #[test]
    fn emissions_respect_cooldown() {
        let mut matcher = matcher();
        let t0 = Instant::now();
        assert!(matcher.check(hello(), t0).is_some());

        // Within the cooldown nothing can match, even a fresh sequence.
        let blocked = matcher.check([Symbol::Y, Symbol::E, Symbol::S], t0 + Duration::from_millis(1000));
        assert_eq!(blocked, None);

        let after = matcher.check([Symbol::Y, Symbol::E, Symbol::S], t0 + COOLDOWN);
        assert_eq!(after.as_deref(), Some("Yes"));
    }

    #[test]
    fn miss_does_not_consume_the_cooldown() {
        let mut matcher = matcher();
        let t0 = Instant::now();
        assert!(matcher.check(hello(), t0).is_some());
        assert_eq!(matcher.check([Symbol::Q], t0 + COOLDOWN), None);

        // The miss above must not have reset the timer.
        let phrase = matcher.check(hello(), t0 + COOLDOWN + Duration::from_millis(1));
        assert_eq!(phrase.as_deref(), Some("Hello"));
    }

    #[test]
    fn scan_follows_dictionary_order() {
        let dictionary = PhraseDictionary::new([("LO", "first"), ("HELLO", "second")]);
        let mut matcher = PhraseMatcher::new(dictionary, COOLDOWN);
        let phrase = matcher.check(hello(), Instant::now());
        assert_eq!(phrase.as_deref(), Some("first"));
    }

    #[test]
    fn space_symbol_joins_multi_word_keys() {
        let mut matcher = matcher();
        let sequence = [Symbol::N, Symbol::O, Symbol::Space, Symbol::B];
        // "NO B" contains the key "NO".
        let phrase = matcher.check(sequence, Instant::now());
        assert_eq!(phrase.as_deref(), Some("No"));
    }

    #[test]
    fn history_is_bounded_and_ordered() {
        let dictionary = PhraseDictionary::new([("A", "alpha"), ("B", "beta")]);
        let mut matcher = PhraseMatcher::new(dictionary, Duration::ZERO);
        let t0 = Instant::now();
        for step in 0..7u64 {
            let symbol = if step % 2 == 0 { Symbol::A } else { Symbol::B };
            matcher.check([symbol], t0 + Duration::from_millis(step));
        }
        let history: Vec<&str> = matcher.recent_phrases().collect();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history, vec!["alpha", "beta", "alpha", "beta", "alpha"]);
    }

    #[test]
    fn current_sentence_joins_history() {
        let dictionary = PhraseDictionary::new([("A", "Hello"), ("B", "Goodbye")]);
        let mut matcher = PhraseMatcher::new(dictionary, Duration::ZERO);
        let t0 = Instant::now();
        matcher.check([Symbol::A], t0);
        matcher.check([Symbol::B], t0 + Duration::from_millis(1));
        assert_eq!(matcher.current_sentence(), "Hello Goodbye");
    }

    #[test]
    fn default_dictionary_is_complete() {
        let dictionary = PhraseDictionary::default();
        assert_eq!(dictionary.len(), 19);
        assert!(!dictionary.is_empty());
        assert_eq!(dictionary.iter().next(), Some(("HELLO", "Hello")));
    }
}
