use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::error::{Error, Result};

static LANG_DIR: Dir = include_dir!("src/lang");

/// A bundled list of words or quotes
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    /// Load one of the word lists compiled into the binary, e.g. `"quotes"`.
    pub fn bundled(name: &str) -> Result<Self> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| Error::MissingWordList(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::MissingWordList(name.to_string()))?;

        Ok(serde_json::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bundled_lists_load() {
        for name in ["common", "programming", "quotes"] {
            let list = WordList::bundled(name).unwrap();
            assert_eq!(list.name, name);
            assert_eq!(list.size as usize, list.words.len());
            assert!(!list.words.is_empty());
        }
    }

    #[test]
    fn quotes_are_space_separated_sentences() {
        let quotes = WordList::bundled("quotes").unwrap();
        assert!(quotes.words.iter().all(|q| q.contains(' ')));
    }

    #[test]
    fn missing_list_is_an_error() {
        assert_matches!(
            WordList::bundled("klingon"),
            Err(Error::MissingWordList(name)) if name == "klingon"
        );
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{ "name": "test", "size": 2, "words": ["hello", "world"] }"#;
        let list: WordList = serde_json::from_str(json).unwrap();
        assert_eq!(list.words, vec!["hello", "world"]);
    }
}
