// imports
use crate::error::{Result, SkipGramError};

use std::collections::HashMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};


// defines the behavior needed for tokenizing a normalized corpus
pub trait Tokenizer {
    fn tokenize(&self, sequence: &str) -> Vec<String>;
}

/// Splits a line into maximal runs of word characters holding at least one letter.
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<WordTokenizer> {
        Ok(Self { pattern: Regex::new(r"\w*\p{Alphabetic}\w*")? })
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, sequence: &str) -> Vec<String> {
        self.pattern
        .find_iter(sequence)
        .map(|m| m.as_str().to_string())
        .collect()
    }
}


/// Bidirectional token <-> id mapping. Ids are dense in `[0, len)` and follow the order
/// in which tokens were first seen.
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary {
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
}

impl Vocabulary {

    pub fn build<'a, I>(tokens: I) -> Result<Vocabulary>
    where
        I: IntoIterator<Item = &'a String> {

            let mut t2i: HashMap<String, usize> = HashMap::new();
            let mut i2t: Vec<String> = Vec::new();
            for tok in tokens {
                if !t2i.contains_key(tok) {
                    t2i.insert(tok.to_owned(), i2t.len());
                    i2t.push(tok.to_owned());
                }
            }

            if i2t.is_empty() {
                return Err(SkipGramError::EmptyCorpus);
            }
            Ok(Self { t2i, i2t })
    }

    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }

    pub fn word_to_id(&self, token: &str) -> Result<usize> {
        match self.t2i.get(token) {
            Some(i) => Ok(*i),
            None => Err(SkipGramError::UnknownToken(token.to_string()))
        }
    }

    pub fn id_to_word(&self, id: usize) -> Result<&str> {
        match self.i2t.get(id) {
            Some(token) => Ok(token.as_str()),
            None => Err(SkipGramError::UnknownId(id))
        }
    }

    pub fn encode(&self, tokens: &[String]) -> Result<Vec<usize>> {
        tokens.iter().map(|tok| self.word_to_id(tok)).collect()
    }

    /// tokens in id order
    pub fn tokens(&self) -> &[String] {
        &self.i2t
    }

}

// the id of every token is its position, so the vocabulary travels as a plain list
impl Serialize for Vocabulary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer {
            self.i2t.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de> {

            let i2t = Vec::<String>::deserialize(deserializer)?;
            let mut t2i: HashMap<String, usize> = HashMap::new();
            for (i, tok) in i2t.iter().enumerate() {
                if t2i.insert(tok.to_owned(), i).is_some() {
                    return Err(serde::de::Error::custom(format!("duplicated token '{}'", tok)));
                }
            }
            Ok(Self { t2i, i2t })
    }
}


/// A tokenized corpus: the flat token stream and the vocabulary built over it.
pub struct Corpus {
    pub tokens: Vec<String>,
    pub vocab: Vocabulary,
}

impl Corpus {

    pub fn from_lines<T: Tokenizer>(lines: &[String], tokenizer: &T) -> Result<Corpus> {

        let tokens: Vec<String> = lines
        .iter()
        .flat_map(|line| tokenizer.tokenize(line))
        .collect();

        let vocab = Vocabulary::build(&tokens)?;
        Ok(Self { tokens, vocab })
    }

    pub fn ids(&self) -> Result<Vec<usize>> {
        self.vocab.encode(&self.tokens)
    }

}
