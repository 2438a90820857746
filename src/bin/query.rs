use std::{env, error::Error, fs::File, io::{self, BufRead}};
use skipgram_trainer::{files_handling, Similarity, Vocabulary};


// checks on trained vectors, treated as binary executable so it can be ran independently from main:
// the K most likely context words of a given word (softmax ranking),
// the K most similar words to a given word (cosine),
// the K best completions of an analogy.

fn main() -> Result<(), Box<dyn Error>> {

    tracing_subscriber::fmt().init();

    // arguments to this executable should be:
    // a letter selector: "s" for softmax context, "b" for word similarity, "a" for analogies
    // path to input based on selector (one token per line, or quartets for analogies)
    // path to the output directory of a training run
    // example: ... b Input/words.txt Output
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        return Err("expected a selector, a path to an input file and a path to the trained output directory".into());
    }
    let selector = args[1].as_str();
    if !["s", "b", "a"].contains(&selector) {
        return Err(format!("unrecognized pattern in first argument {}", selector).into());
    }

    let lines = io::BufReader::new(File::open(&args[2])?)
    .lines()
    .collect::<Result<Vec<String>, io::Error>>()?;

    let vocab: Vocabulary = files_handling::read_input(&args[3], files_handling::VOCAB)?;
    let params = files_handling::read_parameters(&args[3])?;
    let sim_obj = Similarity::new(params, vocab)?;

    match selector {
        "s" => run_context(&lines, 10, &sim_obj),
        "b" => run_similarity(&lines, 10, &sim_obj),
        _ => run_analogies(&lines, 10, &sim_obj)
    }
}

fn run_context(inputs: &[String], k: usize, similarity_object: &Similarity) -> Result<(), Box<dyn Error>> {

    for token in inputs.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        println!("searching {} most likely context words of {}", k, token);
        for (i, (context, prob)) in similarity_object.top_k_by_softmax(token, k)?.iter().enumerate() {
            println!("{} : {} -> {} = {}", i, token, context, prob);
        }
        println!();
    }
    Ok(())
}

fn run_similarity(inputs: &[String], k: usize, similarity_object: &Similarity) -> Result<(), Box<dyn Error>> {

    for token in inputs.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        println!("searching {} most similar words to {}", k, token);
        let vec = similarity_object.extract_vec_from_word(token)?;
        for (i, (similar_token, score)) in similarity_object.find_k_most_similar(&vec, k)?.iter().enumerate() {
            println!("{} : {} ? {} = {}", i, token, similar_token, score);
        }
        println!();
    }
    Ok(())
}

fn run_analogies(inputs: &[String], k: usize, similarity_object: &Similarity) -> Result<(), Box<dyn Error>> {

    // each line holds quartets separated by a space, e.g. "king queen man woman":
    // a is to b as c is to ?, hoping the best match is the fourth word
    for line in inputs {

        let input: Vec<&str> = line.split_whitespace().collect();
        if input.len() != 4 {
            return Err(format!("expected 4 words in line '{}'", line).into());
        }

        let source = [input[0], input[1], input[2]];
        let target = input[3];
        let analogies = similarity_object.extract_analogies(source, k)?;
        for (i, (analogy, score)) in analogies.iter().enumerate() {
            println!("{} : {} - {} + {} ? {} = {}", i, source[1], source[0], source[2], analogy, score);
        }

        match analogies.iter().position(|(analogy, _)| analogy == target) {
            Some(i) => println!("found target '{}' analogy in place {}", target, 1 + i),
            None => println!("target '{}' was not found within the first {} analogies", target, k)
        }
        println!();
    }
    Ok(())
}
