use crate::config::{Config, Difficulty, Mode};
use crate::session::Word;
use rand::seq::SliceRandom;
use rand::Rng;

const CONSONANTS: &[u8; 21] = b"bcdfghjklmnpqrstvwxyz";
const VOWELS: &[u8; 5] = b"aeiou";

/// Build the word sequence for a new session.
///
/// Time and code mode draw `config.pool_size` words, words mode exactly
/// `config.words_mode_count`, quotes mode the words of one quote.
pub fn generate<R: Rng + ?Sized>(
    mode: Mode,
    difficulty: Difficulty,
    config: &Config,
    rng: &mut R,
) -> Vec<Word> {
    let word_count = match mode {
        Mode::Words => config.words_mode_count,
        Mode::Time | Mode::Quotes | Mode::Code => config.pool_size,
    };

    let texts: Vec<String> = match mode {
        Mode::Quotes => config
            .word_lists
            .quotes
            .choose(rng)
            .map(|quote| quote.split(' ').map(str::to_string).collect())
            .unwrap_or_default(),
        Mode::Code => (0..word_count)
            .filter_map(|_| config.word_lists.programming.choose(rng).cloned())
            .collect(),
        Mode::Time | Mode::Words => {
            let range = config.difficulty(difficulty);
            (0..word_count)
                .map(|_| {
                    let len = rng.gen_range(range.min_length..=range.max_length);
                    random_word(len, rng)
                })
                .collect()
        }
    };

    texts.into_iter().map(Word::new).collect()
}

/// Pronounceable-ish nonsense: consonant at even positions, vowel at odd.
pub fn random_word<R: Rng + ?Sized>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|i| {
            let alphabet: &[u8] = if i % 2 == 0 { CONSONANTS } else { VOWELS };
            alphabet[rng.gen_range(0..alphabet.len())] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::WordStatus;

    #[test]
    fn random_word_alternates_consonant_vowel() {
        let mut rng = rand::thread_rng();
        for len in 1..=12 {
            let word = random_word(len, &mut rng);
            assert_eq!(word.len(), len);
            for (i, c) in word.bytes().enumerate() {
                if i % 2 == 0 {
                    assert!(CONSONANTS.contains(&c), "{word}: {} at {i}", c as char);
                } else {
                    assert!(VOWELS.contains(&c), "{word}: {} at {i}", c as char);
                }
            }
        }
    }

    #[test]
    fn random_word_of_zero_length_is_empty() {
        assert_eq!(random_word(0, &mut rand::thread_rng()), "");
    }

    #[test]
    fn words_mode_has_exact_count() {
        let mut config = Config::default();
        config.words_mode_count = 7;
        let words = generate(Mode::Words, Difficulty::Easy, &config, &mut rand::thread_rng());
        assert_eq!(words.len(), 7);
    }

    #[test]
    fn time_and_code_mode_use_pool_size() {
        let config = Config::default();
        let mut rng = rand::thread_rng();
        assert_eq!(generate(Mode::Time, Difficulty::Hard, &config, &mut rng).len(), 100);
        assert_eq!(generate(Mode::Code, Difficulty::Hard, &config, &mut rng).len(), 100);
    }

    #[test]
    fn lengths_respect_every_difficulty() {
        let config = Config::default();
        let mut rng = rand::thread_rng();
        for difficulty in Difficulty::ALL {
            let range = config.difficulty(difficulty);
            for word in generate(Mode::Time, difficulty, &config, &mut rng) {
                assert!(
                    range.contains(word.text.len()),
                    "{difficulty}: `{}` outside {}..={}",
                    word.text,
                    range.min_length,
                    range.max_length
                );
            }
        }
    }

    #[test]
    fn code_mode_draws_from_programming_list() {
        let config = Config::default();
        let words = generate(Mode::Code, Difficulty::Easy, &config, &mut rand::thread_rng());
        assert!(words
            .iter()
            .all(|w| config.word_lists.programming.contains(&w.text)));
    }

    #[test]
    fn quotes_mode_splits_one_quote() {
        let mut config = Config::default();
        config.word_lists.quotes = vec!["to be or not to be".to_string()];
        let words = generate(Mode::Quotes, Difficulty::Expert, &config, &mut rand::thread_rng());
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["to", "be", "or", "not", "to", "be"]);
        assert_ne!(words.len(), config.words_mode_count);
    }

    #[test]
    fn every_word_starts_pending() {
        let config = Config::default();
        let mut rng = rand::thread_rng();
        for mode in Mode::ALL {
            let words = generate(mode, Difficulty::Medium, &config, &mut rng);
            assert!(!words.is_empty());
            assert!(words.iter().all(|w| w.status == WordStatus::Pending));
        }
    }
}
