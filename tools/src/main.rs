use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use nn::encoding::{encode, parse_placement, NUM_SQUARES};
use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use tools::convert::{clean, convert, ConvertConfig, ConvertSummary, OnError};
use tools::rules::ShakmatyRules;
use zstd::Encoder;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expands puzzles into one row per legal reply: encoded position and whether it is the solution
    Convert(ConvertCommand),
    /// Plays the setup move of every puzzle and writes `FEN,target_move`
    Clean(CleanCommand),
    /// Prints the encoding of a FEN
    Encode(EncodeCommand),
}

#[derive(Args)]
struct IoArgs {
    /// Path or URL of a .csv or .csv.zst file with puzzles
    #[arg(long, value_name = "input")]
    input: String,

    /// Output .csv file
    #[arg(long, value_name = "output")]
    output: String,

    /// Whether to compress the output with the ZSTD algorithm
    #[arg(long, default_value = "false")]
    compress: bool,

    /// Number of worker threads, one per core if not given
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args)]
struct ConvertCommand {
    #[clap(flatten)]
    io: IoArgs,

    #[clap(flatten)]
    config: ConvertConfig,
}

#[derive(Args)]
struct CleanCommand {
    #[clap(flatten)]
    io: IoArgs,

    /// Number of puzzles processed together
    #[arg(long, default_value = "100")]
    batch_size: usize,

    /// Policy for puzzles that can't be advanced
    #[arg(long, value_enum, default_value = "skip")]
    on_error: OnError,
}

#[derive(Args)]
struct EncodeCommand {
    /// The position to encode
    #[arg(long, value_name = "fen")]
    fen: String,

    /// Print the board as 8 ranks of class indices instead of the raw vector
    #[arg(long, default_value = "false")]
    grid: bool,
}

/// Opens a local file or downloads a URL; `.zst` sources are read through zstd
fn open_input(input: &str) -> Result<Box<dyn Read>, Box<dyn Error>> {
    let source: Box<dyn Read> = if input.starts_with("http") {
        Box::new(reqwest::blocking::get(input)?.error_for_status()?)
    } else {
        Box::new(File::open(input)?)
    };

    if input.ends_with(".zst") {
        Ok(Box::new(zstd::Decoder::new(source)?))
    } else {
        Ok(source)
    }
}

fn open_output(output: &str, compress: bool) -> io::Result<Box<dyn Write>> {
    let file = File::create(output)?;

    // rows are buffered by the csv writer in both cases
    if compress {
        Ok(Box::new(Encoder::new(file, 3)?.auto_finish()))
    } else {
        Ok(Box::new(file))
    }
}

fn prepare(io: &IoArgs) -> Result<ProgressBar, Box<dyn Error>> {
    info!("Input: {}", io.input);
    info!("Output: {}", io.output);
    info!("Write compressed: {}", io.compress);

    if let Some(threads) = io.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    Ok(ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner().template(
            "{spinner:.green} [Elapsed {elapsed_precise}] [Puzzles {human_pos} @ {per_sec}] {msg}",
        )?,
    ))
}

fn report(bar: &ProgressBar, summary: &ConvertSummary) {
    bar.finish_with_message(format!(
        "[Rows {}] [Skipped {}]",
        summary.rows,
        summary.skipped.len()
    ));

    for skipped in summary.skipped.iter().take(20) {
        eprintln!(
            "skipped line {} ({}): {}",
            skipped.line,
            skipped.id.as_deref().unwrap_or("-"),
            skipped.error
        );
    }
    if summary.skipped.len() > 20 {
        eprintln!("... and {} more", summary.skipped.len() - 20);
    }
}

fn run_convert(cmd: ConvertCommand) -> Result<(), Box<dyn Error>> {
    let bar = prepare(&cmd.io)?;
    let source = open_input(&cmd.io.input)?;
    let sink = open_output(&cmd.io.output, cmd.io.compress)?;

    let summary = convert(&ShakmatyRules, source, sink, &cmd.config, &bar)?;
    report(&bar, &summary);

    Ok(())
}

fn run_clean(cmd: CleanCommand) -> Result<(), Box<dyn Error>> {
    let bar = prepare(&cmd.io)?;
    let source = open_input(&cmd.io.input)?;
    let sink = open_output(&cmd.io.output, cmd.io.compress)?;

    let config = ConvertConfig {
        batch_size: cmd.batch_size,
        on_error: cmd.on_error,
        ..ConvertConfig::default()
    };

    let summary = clean(&ShakmatyRules, source, sink, &config, &bar)?;
    report(&bar, &summary);

    Ok(())
}

fn run_encode(cmd: EncodeCommand) -> Result<(), Box<dyn Error>> {
    if cmd.grid {
        let squares = parse_placement(&cmd.fen)?;

        for rank in squares.chunks(NUM_SQUARES / 8) {
            let line: Vec<String> = rank.iter().map(|c| format!("{:>2}", c.index())).collect();
            println!("{}", line.join(" "));
        }
    } else {
        println!("{}", encode(&cmd.fen)?);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    match args.command {
        Commands::Convert(cmd) => run_convert(cmd),
        Commands::Clean(cmd) => run_clean(cmd),
        Commands::Encode(cmd) => run_encode(cmd),
    }
}
