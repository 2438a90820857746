use skipgram_trainer::Pipeline;
use std::{env, error::Error};

// expects a single argument, a path to a json file, e.g.
// {"corpus_file": "Input/movie_lines.txt", "output_dir": "Output", "window_size": 3, "embedding_size": 50}

fn main() -> Result<(), Box<dyn Error>> {

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skipgram_trainer=info".parse()?),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    Pipeline::run(&args)?;
    Ok(())
}
