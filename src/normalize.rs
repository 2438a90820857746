// imports
use crate::error::Result;

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use rayon::prelude::*;
use regex::Regex;
use tracing::debug;


// expansions are applied in this order, `let's` has to run before the generic `'s`
// and the curly `won’t`/`can’t` before the generic `n’t`.
const CONTRACTIONS: &[(&str, &str)] = &[
    // blog markup, and apostrophes split off by the exporter ("don ' t")
    ("-[readmore]-", " "), (" ' ", "'"),
    ("'m", " am"), ("`m", " am"),
    (" 'n ", " and "), (" `n ", " and "), (" n' ", " and "),
    ("let's", "let us"), ("let`s", "let us"), ("let´s", "let us"), ("let’s", "let us"),
    ("'s", " is"), ("`s", " is"), ("´s", ""),
    ("isn't", "is not"), ("isn`t", "is not"),
    ("'ll", " will"), ("`ll", " will"), ("’ll", " will"),
    ("'ve", " have"), ("`ve", " have"), ("’ve", " have"),
    ("'re", " are"), ("`re", " are"), ("’re", " are"),
    ("'d", " would"), ("`d", " would"), ("’d", " would"),
    ("'em", "them"), ("`em", "them"),
    ("'bout", "about"), ("`bout", "about"),
    ("aren't", "are not"), ("aren`t", "are not"),
    ("ain't", "am not"), ("ain`t", "am not"),
    ("won't", "will not"), ("won`t", "will not"), ("won’t", "will not"),
    ("wouldn't", "would not"), ("wouldn`t", "would not"),
    ("wasn't", "was not"), ("wasn`t", "was not"), ("wasn’t", "was not"),
    ("weren't", "were not"), ("weren`t", "were not"),
    ("don't", "do not"), ("don`t", "do not"), ("don’t", "do not"),
    ("doesn't", "does not"), ("doesn`t", "does not"),
    ("didn't", "did not"), ("didn`t", "did not"),
    ("can't", "cannot"), ("can`t", "cannot"), ("can’t", "cannot"),
    ("hasn't", "has not"), ("hasn`t", "has not"), ("hasn’t", "has not"),
    ("haven't", "have not"), ("haven`t", "have not"),
    ("doin'", "doing"),
    (" - ", " "),
    ("n’t", " not"),
    ("’s", " is"),
    // leftovers of quoted speech, dropped together with the denylist below
    ("''", " "), ("``", " "), ("‘‘", " "), ("’’", " "), ("´´", " "), ("\u{200B}", ""),
    ("\u{2013}", " "),
];

const MARKUP_PATTERN: &str = r"^L[0-9]+\s[+$]+\s[a-z0-9]+\s[+$]+\s[a-z0-9]+\s[+$]+\s[A-Z]+\s[+$]+\s";
const NUMBER_PATTERN: &str = r"[-+]?[0-9]+[,0-9]*(\.[0-9]+)?";
const URL_PATTERN: &str = r"http\S+|www\S+";
// a hyphen run that does not bind two words together
const HYPHEN_PATTERN: &str = r"(?:^|\s)-+|-+(?:\s|$)";
const DENYLIST_PATTERN: &str = r#"[()‘’“”"…#@/&%;:*'`´<>{}+_=~§$|.!?,\[\]\\]"#;

/// Placeholder every numeric literal is replaced by.
pub const NUMBER_TOKEN: &str = "number";


pub struct Normalizer {
    markup: Regex,
    numbers: Regex,
    urls: Regex,
    hyphens: Regex,
    denylist: Regex,
    whitespace: Regex,
    stop_words: HashSet<String>,
    min_line_words: usize,
}

impl Normalizer {

    pub fn new() -> Result<Normalizer> {
        Normalizer::with_stop_words(&[])
    }

    pub fn with_stop_words(stop_words: &[String]) -> Result<Normalizer> {
        Ok(Self {
            markup: Regex::new(MARKUP_PATTERN)?,
            numbers: Regex::new(NUMBER_PATTERN)?,
            urls: Regex::new(URL_PATTERN)?,
            hyphens: Regex::new(HYPHEN_PATTERN)?,
            denylist: Regex::new(DENYLIST_PATTERN)?,
            whitespace: Regex::new(r"\s+")?,
            stop_words: stop_words.iter().map(|w| w.to_lowercase()).collect(),
            min_line_words: 1,
        })
    }

    /// `load` drops normalized lines with fewer words than this, empty lines are always dropped.
    pub fn with_min_line_words(mut self, min_line_words: usize) -> Normalizer {
        self.min_line_words = min_line_words.max(1);
        self
    }

    /// Normalizes a single raw line of the corpus.
    pub fn normalize(&self, line: &str) -> String {

        // the dialogue markup is upper case sensitive, strip it before folding
        let stripped = self.markup.replace(line, "");
        let lowered = stripped.to_lowercase();
        let mut a_line = self.whitespace.replace_all(&lowered, " ").into_owned();

        for &(from, to) in CONTRACTIONS {
            if a_line.contains(from) {
                a_line = a_line.replace(from, to);
            }
        }

        let a_line = self.numbers.replace_all(&a_line, NUMBER_TOKEN);
        let a_line = self.urls.replace_all(&a_line, "");
        let a_line = self.hyphens.replace_all(&a_line, " ");
        let a_line = self.denylist.replace_all(&a_line, "");
        let a_line = self.whitespace.replace_all(a_line.trim(), " ");

        if self.stop_words.is_empty() {
            return a_line.into_owned();
        }

        a_line
        .split(' ')
        .filter(|word| !self.stop_words.contains(*word))
        .collect::<Vec<&str>>()
        .join(" ")
    }

    /// Same as `normalize`, but for raw bytes of unknown encoding. Invalid sequences are dropped.
    pub fn normalize_bytes(&self, raw: &[u8]) -> String {
        self.normalize(&decode_permissive(raw))
    }

    /// Normalizes many lines at once, keeping their order.
    pub fn normalize_lines(&self, lines: &[String]) -> Vec<String> {
        lines.par_iter().map(|line| self.normalize(line)).collect()
    }

    /// Reads a newline-delimited corpus and returns its normalized lines holding at least
    /// `min_line_words` words.
    pub fn load<P: AsRef<Path>>(&self, file_path: P) -> Result<Vec<String>> {

        let raw = fs::read(file_path.as_ref())?;
        let lines: Vec<String> = raw
        .split(|b| *b == b'\n')
        .map(decode_permissive)
        .collect();

        let normalized: Vec<String> = self
        .normalize_lines(&lines)
        .into_iter()
        .filter(|line| line.split_whitespace().count() >= self.min_line_words)
        .collect();

        debug!("read {} lines, {} left after normalization", lines.len(), normalized.len());
        Ok(normalized)
    }

}


fn decode_permissive(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
    .chars()
    .filter(|c| *c != char::REPLACEMENT_CHARACTER)
    .collect()
}


#[cfg(test)]
mod tests {

    use super::{Normalizer, NUMBER_TOKEN};
    use std::io::Write;

    #[test]
    fn contractions_test() {
        let normalizer = Normalizer::new().unwrap();
        assert_eq!(normalizer.normalize("I'm sure"), "i am sure");
        assert_eq!(normalizer.normalize("Let's go, it's late"), "let us go it is late");
        assert_eq!(normalizer.normalize("I won't and can't"), "i will not and cannot");
        assert_eq!(normalizer.normalize("They don’t know"), "they do not know");
        assert_eq!(normalizer.normalize("we'll see what you've got"), "we will see what you have got");
    }

    #[test]
    fn whitespace_and_punctuation_test() {
        let normalizer = Normalizer::new().unwrap();
        assert_eq!(normalizer.normalize("  Hello,\t\tWORLD!!  (really?) "), "hello world really");
        assert_eq!(normalizer.normalize("\"quoted\" [text] {here}; ok."), "quoted text here ok");
    }

    #[test]
    fn numbers_test() {
        let normalizer = Normalizer::new().unwrap();
        let expected = format!("it costs {} or {} today", NUMBER_TOKEN, NUMBER_TOKEN);
        assert_eq!(normalizer.normalize("It costs 1,250.50 or -3 today"), expected);
        assert_eq!(normalizer.normalize("+42"), NUMBER_TOKEN);
    }

    #[test]
    fn markup_test() {
        let normalizer = Normalizer::new().unwrap();
        let line = "L1045 +++$+ u0 +++$+ m0 +++$+ BIANCA +++$+ They do not!";
        assert_eq!(normalizer.normalize(line), "they do not");
    }

    #[test]
    fn blog_markup_test() {
        let normalizer = Normalizer::new().unwrap();
        let line = "see https://callistaenterprise.se/blogg now -[readmore]- more";
        assert_eq!(normalizer.normalize(line), "see now more");
        assert_eq!(normalizer.normalize("visit www.example.com/page today"), "visit today");
    }

    #[test]
    fn split_apostrophe_test() {
        let normalizer = Normalizer::new().unwrap();
        assert_eq!(normalizer.normalize("I ' m sure you don ' t"), "i am sure you do not");
    }

    #[test]
    fn hyphens_test() {
        let normalizer = Normalizer::new().unwrap();
        // standalone runs, leading and trailing hyphens go, binding ones stay
        assert_eq!(normalizer.normalize("wait -- what"), "wait what");
        assert_eq!(normalizer.normalize("a -well known x-ray"), "a well known x-ray");
        assert_eq!(normalizer.normalize("so- what-"), "so what");
        assert_eq!(normalizer.normalize("-start here"), "start here");
    }

    #[test]
    fn stop_words_test() {
        let stop_words = vec!["the".to_string(), "uh".to_string()];
        let normalizer = Normalizer::with_stop_words(&stop_words).unwrap();
        assert_eq!(normalizer.normalize("Uh, the cat sat on the mat"), "cat sat on mat");
    }

    #[test]
    fn invalid_bytes_test() {
        let normalizer = Normalizer::new().unwrap();
        let raw: &[u8] = &[b'c', b'a', 0xff, b't', b' ', 0xc3, b's', b'a', b't'];
        assert_eq!(normalizer.normalize_bytes(raw), "cat sat");
    }

    #[test]
    fn load_test() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"The cat sat.\n\n!!!\nOn the MAT\xfe\n").unwrap();

        let normalizer = Normalizer::new().unwrap();
        let lines = normalizer.load(file.path()).unwrap();
        assert_eq!(lines, vec!["the cat sat".to_string(), "on the mat".to_string()]);
    }

    #[test]
    fn min_line_words_test() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Hi there
The cat sat
No!
A dog ran off
").unwrap();

        let normalizer = Normalizer::new().unwrap().with_min_line_words(3);
        let lines = normalizer.load(file.path()).unwrap();
        assert_eq!(lines, vec!["the cat sat".to_string(), "a dog ran off".to_string()]);

        // zero still drops empty lines
        let normalizer = Normalizer::new().unwrap().with_min_line_words(0);
        assert_eq!(normalizer.load(file.path()).unwrap().len(), 4);
    }

}
