use serde_json::Value;
use std::{fs, fmt::Display};
use crate::error::{Result, SkipGramError};

/// Normalized corpus lines shorter than this carry too little context to train on.
pub const DEFAULT_MIN_LINE_WORDS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct TrainParams {
    pub window_size: usize,
    pub embedding_size: usize,
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub decay_rate: f32,
    pub seed: Option<u64>,
    pub print_cost: bool,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            window_size: 3,
            embedding_size: 50,
            learning_rate: 0.05,
            epochs: 5000,
            batch_size: 256,
            decay_rate: 0.98,
            seed: None,
            print_cost: true,
        }
    }
}

impl TrainParams {

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 1 {
            return Err(SkipGramError::InvalidConfig("window_size should be at least 1".into()));
        }
        if self.embedding_size < 1 {
            return Err(SkipGramError::InvalidConfig("embedding_size should be at least 1".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(SkipGramError::InvalidConfig(format!("learning_rate should be positive, got {}", self.learning_rate)));
        }
        if self.epochs < 1 {
            return Err(SkipGramError::InvalidConfig("epochs should be at least 1".into()));
        }
        if self.batch_size < 1 {
            return Err(SkipGramError::InvalidConfig("batch_size should be at least 1".into()));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(SkipGramError::InvalidConfig(format!("decay_rate should be in (0, 1], got {}", self.decay_rate)));
        }
        Ok(())
    }

}

impl Display for TrainParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "training hyper parameters:
        window_size: {},
        embedding_size: {},
        learning_rate: {},
        epochs: {},
        batch_size: {},
        decay_rate: {},
        seed: {:?},
        print_cost: {}",
        self.window_size, self.embedding_size, self.learning_rate, self.epochs, self.batch_size, self.decay_rate, self.seed, self.print_cost
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub corpus_file: String,
    pub output_dir: String,
    pub saved_pairs: Option<bool>,
    pub stop_words: Vec<String>,
    pub min_line_words: usize,
    pub train: TrainParams,
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        corpus_file: {}
        output_dir: {}
        saved_pairs: {:?}
        stop_words: {},
        min_line_words: {},
        Using {}",
        self.corpus_file, self.output_dir, self.saved_pairs, self.stop_words.len(), self.min_line_words, self.train)
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    /// expects the program name followed by a path to a json file
    pub fn new(args: &[String]) -> Result<Config> {

        if args.len() != 2 {
            return Err(SkipGramError::InvalidConfig("input should be a path to json file only".into()));
        }

        let f = fs::File::open(&args[1])?;
        let json: Value = serde_json::from_reader(f)?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config> {

        // input and output are mandatory
        let corpus_file = get_str(json, "corpus_file")?;
        let output_dir = get_str(json, "output_dir")?;

        // handle default vs input parameters
        let defaults = TrainParams::default();
        let train = TrainParams {
            window_size: get_usize(json, "window_size", defaults.window_size)?,
            embedding_size: get_usize(json, "embedding_size", defaults.embedding_size)?,
            learning_rate: get_f32(json, "learning_rate", defaults.learning_rate)?,
            epochs: get_usize(json, "epochs", defaults.epochs)?,
            batch_size: get_usize(json, "batch_size", defaults.batch_size)?,
            decay_rate: get_f32(json, "decay_rate", defaults.decay_rate)?,
            seed: match json.get("seed") {
                Some(seed) => Some(seed.as_u64().ok_or_else(|| not_a("seed", "non negative integer"))?),
                None => None
            },
            print_cost: match json.get("print_cost") {
                Some(print_cost) => print_cost.as_bool().ok_or_else(|| not_a("print_cost", "boolean"))?,
                None => defaults.print_cost
            },
        };
        train.validate()?;

        let saved_pairs = match json.get("saved_pairs") {
            Some(saved_pairs) => Some(saved_pairs.as_bool().ok_or_else(|| not_a("saved_pairs", "boolean"))?),
            None => None
        };
        let stop_words = match json.get("stop_words") {
            Some(Value::Array(words)) => words
                .iter()
                .map(|w| w.as_str().map(|w| w.to_string()).ok_or_else(|| not_a("stop_words", "list of strings")))
                .collect::<Result<Vec<String>>>()?,
            Some(_) => return Err(not_a("stop_words", "list of strings")),
            None => Vec::new()
        };

        let min_line_words = get_usize(json, "min_line_words", DEFAULT_MIN_LINE_WORDS)?;

        let params = Params {
            corpus_file,
            output_dir,
            saved_pairs,
            stop_words,
            min_line_words,
            train,
        };

        Ok(Self { params })
    }

}

fn not_a(key: &str, kind: &str) -> SkipGramError {
    SkipGramError::InvalidConfig(format!("given {} is not a {}", key, kind))
}

fn get_str(json: &Value, key: &str) -> Result<String> {
    match json.get(key) {
        Some(value) => Ok(value.as_str().ok_or_else(|| not_a(key, "string"))?.to_owned()),
        None => Err(SkipGramError::InvalidConfig(format!("{} was not supplied through json", key)))
    }
}

fn get_usize(json: &Value, key: &str, default: usize) -> Result<usize> {
    match json.get(key) {
        Some(value) => Ok(value.as_u64().ok_or_else(|| not_a(key, "non negative integer"))? as usize),
        None => Ok(default)
    }
}

fn get_f32(json: &Value, key: &str, default: f32) -> Result<f32> {
    match json.get(key) {
        Some(value) => Ok(value.as_f64().ok_or_else(|| not_a(key, "number"))? as f32),
        None => Ok(default)
    }
}


pub mod files_handling {

    use crate::error::Result;
    use crate::pairs::TrainingPairs;
    use crate::params::ParameterSet;
    use crate::vocab::Vocabulary;

    use ndarray::Array2;
    use ndarray_npy::{read_npy, write_npy};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};
    use flate2::{Compression, read::GzDecoder, write::GzEncoder};

    pub const WORD_EMBEDDING: &str = "word_embedding";
    pub const OUTPUT_PROJECTION: &str = "output_projection";
    pub const VOCAB: &str = "vocab";
    pub const PAIRS: &str = "pairs";
    pub const COSTS: &str = "costs";

    pub fn read_input<R: ReadFile>(dir: &str, file_name: &str) -> Result<R> {
        R::read_file(dir, file_name)
    }

    pub fn save_output<S: SaveFile>(output_dir: &str, file_name: &str, item: &S) -> Result<()> {
        fs::create_dir_all(output_dir)?;
        item.save_file(output_dir, file_name)
    }

    pub fn save_parameters(output_dir: &str, params: &ParameterSet) -> Result<()> {
        save_output(output_dir, WORD_EMBEDDING, &params.word_embedding)?;
        save_output(output_dir, OUTPUT_PROJECTION, &params.output_projection)
    }

    pub fn read_parameters(dir: &str) -> Result<ParameterSet> {
        Ok(ParameterSet {
            word_embedding: read_input(dir, WORD_EMBEDDING)?,
            output_projection: read_input(dir, OUTPUT_PROJECTION)?,
        })
    }

    fn path_of(dir: &str, file_name: &str, extension: &str) -> PathBuf {
        Path::new(dir).join(format!("{}.{}", file_name, extension))
    }

    pub trait ReadFile: Sized {
        fn read_file(dir: &str, file_name: &str) -> Result<Self>;
    }

    pub trait SaveFile {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()>;
    }

    impl ReadFile for Array2<f32> {
        fn read_file(dir: &str, file_name: &str) -> Result<Self> {
            Ok(read_npy(path_of(dir, file_name, "npy"))?)
        }
    }

    impl SaveFile for Array2<f32> {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()> {
            Ok(write_npy(path_of(output_dir, file_name, "npy"), self)?)
        }
    }

    impl ReadFile for Vocabulary {
        fn read_file(dir: &str, file_name: &str) -> Result<Self> {
            let f = BufReader::new(File::open(path_of(dir, file_name, "json"))?);
            Ok(serde_json::from_reader(f)?)
        }
    }

    impl SaveFile for Vocabulary {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()> {
            let f = BufWriter::new(File::create(path_of(output_dir, file_name, "json"))?);
            serde_json::to_writer(f, self)?;
            Ok(())
        }
    }

    impl ReadFile for Vec<f32> {
        fn read_file(dir: &str, file_name: &str) -> Result<Self> {
            let f = BufReader::new(File::open(path_of(dir, file_name, "json"))?);
            Ok(serde_json::from_reader(f)?)
        }
    }

    impl SaveFile for Vec<f32> {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()> {
            let f = BufWriter::new(File::create(path_of(output_dir, file_name, "json"))?);
            serde_json::to_writer(f, self)?;
            Ok(())
        }
    }

    // pairs can be large, they are stored as gzip compressed bincode
    impl ReadFile for TrainingPairs {
        fn read_file(dir: &str, file_name: &str) -> Result<Self> {
            let f = BufReader::new(File::open(path_of(dir, file_name, "gz"))?);
            let reader = GzDecoder::new(f);
            Ok(bincode::deserialize_from(reader)?)
        }
    }

    impl SaveFile for TrainingPairs {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()> {
            let f = BufWriter::new(File::create(path_of(output_dir, file_name, "gz"))?);
            let mut writer = GzEncoder::new(f, Compression::default());
            bincode::serialize_into(&mut writer, self)?;
            writer.finish()?.flush()?;
            Ok(())
        }
    }

}


#[cfg(test)]
mod tests {

    use super::files_handling::{self, read_input, save_output};
    use super::{Config, TrainParams, DEFAULT_MIN_LINE_WORDS};
    use crate::error::SkipGramError;
    use crate::pairs::TrainingPairs;
    use crate::params::ParameterSet;
    use crate::vocab::Vocabulary;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn defaults_test() {
        let json = json!({"corpus_file": "corpus.txt", "output_dir": "Output"});
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.corpus_file, "corpus.txt");
        assert_eq!(params.output_dir, "Output");
        assert_eq!(params.saved_pairs, None);
        assert!(params.stop_words.is_empty());
        assert_eq!(params.min_line_words, DEFAULT_MIN_LINE_WORDS);
        assert_eq!(params.train, TrainParams::default());
        assert_eq!(params.train.batch_size, 256);
    }

    #[test]
    fn given_values_test() {
        let json = json!({
            "corpus_file": "corpus.txt",
            "output_dir": "Output",
            "window_size": 2,
            "embedding_size": 4,
            "learning_rate": 0.1,
            "epochs": 200,
            "batch_size": 16,
            "seed": 42,
            "print_cost": false,
            "saved_pairs": true,
            "stop_words": ["uh", "eh"],
            "min_line_words": 1
        });
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.train.window_size, 2);
        assert_eq!(params.train.embedding_size, 4);
        assert!((params.train.learning_rate - 0.1).abs() < 1e-7);
        assert_eq!(params.train.epochs, 200);
        assert_eq!(params.train.batch_size, 16);
        assert_eq!(params.train.seed, Some(42));
        assert!(!params.train.print_cost);
        assert_eq!(params.saved_pairs, Some(true));
        assert_eq!(params.stop_words, vec!["uh".to_string(), "eh".to_string()]);
        assert_eq!(params.min_line_words, 1);
    }

    #[test]
    fn invalid_values_test() {
        let cases = vec![
            json!({"output_dir": "Output"}),
            json!({"corpus_file": "c", "output_dir": "o", "window_size": 0}),
            json!({"corpus_file": "c", "output_dir": "o", "embedding_size": -3}),
            json!({"corpus_file": "c", "output_dir": "o", "learning_rate": 0.0}),
            json!({"corpus_file": "c", "output_dir": "o", "batch_size": "many"}),
            json!({"corpus_file": "c", "output_dir": "o", "stop_words": "uh"}),
            json!({"corpus_file": "c", "output_dir": "o", "min_line_words": "three"}),
        ];
        for json in cases {
            assert!(matches!(Config::from_json(&json), Err(SkipGramError::InvalidConfig(_))), "{}", json);
        }
    }

    #[test]
    fn args_test() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"corpus_file": "c.txt", "output_dir": "o", "epochs": 3}}"#).unwrap();

        let args = vec!["skipgram_trainer".to_string(), file.path().display().to_string()];
        let params = Config::new(&args).unwrap().get_params();
        assert_eq!(params.train.epochs, 3);

        assert!(Config::new(&args[..1]).is_err());
    }

    #[test]
    fn files_handling_test() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").display().to_string();

        let params = ParameterSet::initialize(5, 3, &mut StdRng::seed_from_u64(2)).unwrap();
        files_handling::save_parameters(&out, &params).unwrap();
        assert_eq!(files_handling::read_parameters(&out).unwrap(), params);

        let tokens: Vec<String> = ["a", "b", "c"].iter().map(|x| x.to_string()).collect();
        let vocab = Vocabulary::build(&tokens).unwrap();
        save_output(&out, files_handling::VOCAB, &vocab).unwrap();
        assert_eq!(read_input::<Vocabulary>(&out, files_handling::VOCAB).unwrap(), vocab);

        let pairs = TrainingPairs::generate(&[0, 1, 2, 1, 0], 2);
        save_output(&out, files_handling::PAIRS, &pairs).unwrap();
        assert_eq!(read_input::<TrainingPairs>(&out, files_handling::PAIRS).unwrap(), pairs);

        let costs = vec![1.5f32, 1.25, 1.0];
        save_output(&out, files_handling::COSTS, &costs).unwrap();
        assert_eq!(read_input::<Vec<f32>>(&out, files_handling::COSTS).unwrap(), costs);

        assert!(read_input::<Vocabulary>(&out, "missing").is_err());
    }

}
