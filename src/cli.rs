use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use sonify_midi::config;
use sonify_midi::sonify::{self, compress_rows, MidiPitch, SmfSink, SonifyError, SonifyOptions};
use sonify_midi::text;

/// Data and Text Sonification Tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sonify a 1D sequence of floats into a single-track MIDI file
    Floats(FloatsArgs),

    /// Sonify a multi-row matrix into a multi-track MIDI file
    Matrix(MatrixArgs),

    /// Sonify text by token frequency
    Text(TextArgs),
}

/// Pitch, rest and output options shared by every subcommand
#[derive(Parser)]
struct PitchArgs {
    /// Maximum MIDI pitch (at most 127)
    #[arg(long)]
    max_pitch: MidiPitch,

    /// Minimum MIDI pitch (at least 0)
    #[arg(long)]
    min_pitch: MidiPitch,

    /// Silence mapped pitches below this threshold
    #[arg(short, long)]
    below_bound: Option<MidiPitch>,

    /// Insert a rest after every N source values
    #[arg(short, long, value_name = "N")]
    rest_interval: Option<usize>,

    /// Playback tempo in BPM (overrides sonify.toml)
    #[arg(long)]
    tempo: Option<u32>,

    /// Baseline note velocity (overrides sonify.toml)
    #[arg(long)]
    velocity: Option<u8>,

    /// Path of the MIDI file to write
    #[arg(short, long, default_value = "sonified.mid")]
    output: String,
}

/// Sonify a 1D sequence of floats
#[derive(Parser)]
struct FloatsArgs {
    /// Path to the input file (floats separated by whitespace or commas)
    #[arg(required = true)]
    data_file: String,

    #[command(flatten)]
    pitch: PitchArgs,
}

/// Sonify a multi-row matrix
#[derive(Parser)]
struct MatrixArgs {
    /// Path to the input file (one row of floats per line)
    #[arg(required = true)]
    data_file: String,

    #[command(flatten)]
    pitch: PitchArgs,

    /// Average every N consecutive rows into one track before sonifying
    #[arg(long, value_name = "N")]
    compress: Option<usize>,
}

/// Sonify text by token frequency
#[derive(Parser)]
struct TextArgs {
    /// Path to the input text file
    #[arg(required = true)]
    text_file: String,

    #[command(flatten)]
    pitch: PitchArgs,

    /// Prune the built-in English stopword list before counting
    #[arg(short, long)]
    stopwords: bool,

    /// Additional words to exclude from the frequency count
    #[arg(short, long = "exclude", value_name = "WORD", num_args = 1..)]
    exclude: Vec<String>,
}

/// Build sonification options from CLI flags over sonify.toml defaults
fn build_options(args: &PitchArgs) -> SonifyOptions {
    let config = config::load_config().unwrap_or_default();
    let mut opts = SonifyOptions::from_config(&config, args.max_pitch, args.min_pitch);
    opts.below_bound = args.below_bound;
    opts.rest_interval = args.rest_interval;
    if let Some(tempo) = args.tempo {
        opts.tempo_bpm = tempo;
    }
    if let Some(velocity) = args.velocity {
        opts.velocity = velocity;
    }
    opts
}

/// Read an input file, reporting a clear not-found error first
fn read_input(path: &str) -> Result<String, SonifyError> {
    if !Path::new(path).exists() {
        return Err(SonifyError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("input file not found: {}", path),
        )));
    }
    Ok(fs::read_to_string(path)?)
}

fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>, SonifyError> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| {
                SonifyError::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid number '{}' on line {}", s, line_no),
                ))
            })
        })
        .collect()
}

fn open_sink(path: &str) -> Result<SmfSink<BufWriter<File>>, SonifyError> {
    let file = File::create(path)?;
    Ok(SmfSink::new(BufWriter::new(file)))
}

fn run_floats_command(args: &FloatsArgs) -> Result<(), SonifyError> {
    let contents = read_input(&args.data_file)?;
    let data: Vec<f64> = contents
        .lines()
        .enumerate()
        .map(|(i, line)| parse_row(line, i + 1))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();

    let opts = build_options(&args.pitch);
    let mut sink = open_sink(&args.pitch.output)?;
    sonify::sonify_floats(&data, &opts, &mut sink)?;

    println!("Wrote {} ({} values)", args.pitch.output, data.len());
    Ok(())
}

fn run_matrix_command(args: &MatrixArgs) -> Result<(), SonifyError> {
    let contents = read_input(&args.data_file)?;
    let mut rows: Vec<Vec<f64>> = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_row(line, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(group) = args.compress {
        rows = compress_rows(&rows, group)?;
    }

    let opts = build_options(&args.pitch);
    let mut sink = open_sink(&args.pitch.output)?;
    sonify::sonify_matrix(&rows, &opts, &mut sink)?;

    println!("Wrote {} ({} tracks)", args.pitch.output, rows.len());
    Ok(())
}

fn run_text_command(args: &TextArgs) -> Result<(), SonifyError> {
    let contents = read_input(&args.text_file)?;

    let mut exclusions: HashSet<String> = if args.stopwords {
        text::stopword_set()
    } else {
        HashSet::new()
    };
    exclusions.extend(args.exclude.iter().map(|w| w.to_lowercase()));

    let opts = build_options(&args.pitch);
    let mut sink = open_sink(&args.pitch.output)?;
    sonify::sonify_text(&contents, &exclusions, &opts, &mut sink)?;

    println!("Wrote {}", args.pitch.output);
    Ok(())
}

fn run() -> Result<(), SonifyError> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Floats(args) => run_floats_command(args)?,
        Commands::Matrix(args) => run_matrix_command(args)?,
        Commands::Text(args) => run_text_command(args)?,
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(_) => {}
        Err(err) => {
            eprintln!("\nERROR: {}\n", err);
            match err {
                SonifyError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                    eprintln!("Please check that:");
                    eprintln!("1. The file path is correct");
                    eprintln!("2. The file exists");
                    eprintln!("3. You have permission to read the file");
                }
                SonifyError::InvalidRange { .. } | SonifyError::InvalidBound { .. } => {
                    eprintln!(
                        "Pitches must satisfy 0 <= min_pitch < max_pitch <= 127, with any \
                         below bound inside [min_pitch, max_pitch)."
                    );
                }
                _ => {}
            }
            process::exit(1);
        }
    }
}
