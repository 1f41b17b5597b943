use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};

use pinhan::dict::PinyinDict;
use pinhan::model::LossModel;
use pinhan::settings::settings;
use pinhan::trace_init::init_tracing;
use pinhan::{decode_line, train};

#[derive(Parser)]
#[command(name = "pintool", about = "Pinyin-to-hanzi model training and conversion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a loss model from a corpus file (one sentence per line)
    Train {
        /// Path to the UTF-8 corpus file
        corpus_file: String,
        /// Path to the pinyin dictionary JSON
        dict_file: String,
        /// Path for the trained model
        output_file: String,
        /// N as in n-gram
        #[arg(long)]
        gram_count: Option<usize>,
        /// Interpolation weight, in (0, 1)
        #[arg(long)]
        smoothing: Option<f64>,
        /// Write the model as JSON instead of the binary format
        #[arg(long)]
        json: bool,
    },

    /// Convert pinyin to hanzi
    Convert {
        /// Path to the trained model (.json loads as JSON, otherwise binary)
        model_file: String,
        /// Path to the pinyin dictionary JSON
        dict_file: String,
        /// Whitespace-separated syllables; reads stdin line by line if omitted
        text: Option<String>,
    },

    /// Score conversions against a reference transcript
    Validate {
        /// Path to the trained model
        model_file: String,
        /// Path to the pinyin dictionary JSON
        dict_file: String,
        /// Input file, one syllable line per sentence
        input_file: String,
        /// Expected output file, one hanzi line per sentence
        expected_file: String,
        /// Write predictions to this file as well
        #[arg(long)]
        output: Option<String>,
    },
}

fn open_dict(dict_file: &str) -> PinyinDict {
    PinyinDict::load(Path::new(dict_file)).unwrap_or_else(|e| {
        eprintln!("Failed to load dictionary at {}: {}", dict_file, e);
        process::exit(1);
    })
}

fn open_model(model_file: &str) -> LossModel {
    let path = Path::new(model_file);
    let result = if model_file.ends_with(".json") {
        File::open(path)
            .map_err(Into::into)
            .and_then(|f| LossModel::from_json_reader(BufReader::new(f)))
    } else {
        LossModel::load(path)
    };
    result.unwrap_or_else(|e| {
        eprintln!("Failed to load model at {}: {}", model_file, e);
        process::exit(1);
    })
}

fn read_lines(path: &str) -> Vec<String> {
    let file = File::open(path).unwrap_or_else(|e| {
        eprintln!("Failed to open {}: {}", path, e);
        process::exit(1);
    });
    BufReader::new(file)
        .lines()
        .map(|l| {
            l.unwrap_or_else(|e| {
                eprintln!("Failed to read line: {}", e);
                process::exit(1);
            })
        })
        .collect()
}

fn run_train(
    corpus_file: &str,
    dict_file: &str,
    output_file: &str,
    gram_count: Option<usize>,
    smoothing: Option<f64>,
    json: bool,
) {
    let gram_count = gram_count.unwrap_or(settings().train.gram_count);
    let smoothing = smoothing.unwrap_or(settings().train.smoothing);
    let interval = settings().train.progress_interval;
    let dict = open_dict(dict_file);

    let file = File::open(corpus_file).unwrap_or_else(|e| {
        eprintln!("Failed to open corpus at {}: {}", corpus_file, e);
        process::exit(1);
    });
    let started = Instant::now();
    let mut records: u64 = 0;
    let lines = BufReader::new(file).lines().map(|l| {
        let line = l.unwrap_or_else(|e| {
            eprintln!("Failed to read corpus line: {}", e);
            process::exit(1);
        });
        records += 1;
        if interval > 0 && records % interval == 0 {
            eprintln!(
                "{} records trained in {} secs",
                records,
                started.elapsed().as_secs()
            );
        }
        line
    });

    let model = train(lines, &dict, smoothing, gram_count).unwrap_or_else(|e| {
        eprintln!("Training failed: {}", e);
        process::exit(1);
    });
    eprintln!(
        "Trained {}-gram model on {} records in {} secs ({} contexts)",
        gram_count,
        records,
        started.elapsed().as_secs(),
        model.losses().len()
    );

    let write_result = if json {
        File::create(output_file)
            .map_err(Into::into)
            .and_then(|f| model.to_json_writer(BufWriter::new(f)))
    } else {
        model.save(Path::new(output_file))
    };
    write_result.unwrap_or_else(|e| {
        eprintln!("Failed to write model to {}: {}", output_file, e);
        process::exit(1);
    });
    eprintln!("Model written to {}", output_file);
}

fn run_convert(model_file: &str, dict_file: &str, text: Option<String>) {
    let model = open_model(model_file);
    let dict = open_dict(dict_file);

    match text {
        Some(line) => println!("{}", decode_line(&line, &model, &dict)),
        None => {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.unwrap_or_else(|e| {
                    eprintln!("Failed to read stdin: {}", e);
                    process::exit(1);
                });
                println!("{}", decode_line(&line, &model, &dict));
            }
        }
    }
}

fn run_validate(
    model_file: &str,
    dict_file: &str,
    input_file: &str,
    expected_file: &str,
    output: Option<String>,
) {
    let model = open_model(model_file);
    let dict = open_dict(dict_file);
    let inputs = read_lines(input_file);
    let expected = read_lines(expected_file);
    if inputs.len() != expected.len() {
        eprintln!(
            "Line count mismatch: {} inputs vs {} expected",
            inputs.len(),
            expected.len()
        );
        process::exit(1);
    }

    let mut out = output.map(|path| {
        let file = File::create(&path).unwrap_or_else(|e| {
            eprintln!("Failed to create {}: {}", path, e);
            process::exit(1);
        });
        BufWriter::new(file)
    });

    let started = Instant::now();
    let mut total_chars = 0usize;
    let mut correct_chars = 0usize;
    let mut correct_sents = 0usize;
    for (input, reference) in inputs.iter().zip(&expected) {
        let prediction = decode_line(input, &model, &dict);
        if let Some(writer) = out.as_mut() {
            writeln!(writer, "{}", prediction).unwrap_or_else(|e| {
                eprintln!("Failed to write prediction: {}", e);
                process::exit(1);
            });
        }
        let reference: Vec<char> = reference.chars().collect();
        total_chars += reference.len();
        let predicted: Vec<char> = prediction.chars().collect();
        if predicted.len() != reference.len() {
            continue;
        }
        let matching = predicted
            .iter()
            .zip(&reference)
            .filter(|(p, r)| p == r)
            .count();
        correct_chars += matching;
        if matching == reference.len() {
            correct_sents += 1;
        }
    }
    let elapsed = started.elapsed().as_secs_f64();

    println!(
        "By character: {} / {}, accuracy {:.4}",
        correct_chars,
        total_chars,
        correct_chars as f64 / total_chars.max(1) as f64
    );
    println!(
        "By sentence: {} / {}, accuracy {:.4}",
        correct_sents,
        inputs.len(),
        correct_sents as f64 / inputs.len().max(1) as f64
    );
    println!(
        "Validation time: {:.1} secs, avg {:.2} sentences per second",
        elapsed,
        inputs.len() as f64 / elapsed.max(f64::MIN_POSITIVE)
    );
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            corpus_file,
            dict_file,
            output_file,
            gram_count,
            smoothing,
            json,
        } => run_train(
            &corpus_file,
            &dict_file,
            &output_file,
            gram_count,
            smoothing,
            json,
        ),

        Command::Convert {
            model_file,
            dict_file,
            text,
        } => run_convert(&model_file, &dict_file, text),

        Command::Validate {
            model_file,
            dict_file,
            input_file,
            expected_file,
            output,
        } => run_validate(
            &model_file,
            &dict_file,
            &input_file,
            &expected_file,
            output,
        ),
    }
}
