pub mod batch;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod patch;

use std::{
    error::Error,
    fs,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};

use crate::{
    batch::distance_batch,
    config::{Config, LogConfig, init_config},
    diff::{Accessor, CompareFn, Differ, EditOp, EditScript, IndexFn, Outcome, Seq},
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// The number of threads in parallel computing (0 picks one per core)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Use verbose output (-vv very verbose, -vvv also to debug.log)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the shortest edit script turning the old file into the new one
    Diff(CompareArgs),
    /// Print only the edit distance between two files
    Distance(CompareArgs),
    /// Print the edit distance of many file pairs, computed in parallel
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct CompareArgs {
    /// Path to old file
    old: PathBuf,
    /// Path to new file
    new: PathBuf,
    #[command(flatten)]
    options: CompareOptions,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Files to compare, as OLD NEW [OLD NEW ...]
    #[arg(required = true, num_args = 2..)]
    files: Vec<PathBuf>,
    #[command(flatten)]
    options: CompareOptions,
}

#[derive(Debug, Args)]
struct CompareOptions {
    /// Compare line by line instead of byte by byte
    #[arg(short, long)]
    lines: bool,
    /// Treat lines that differ only in trailing whitespace as equal (implies --lines)
    #[arg(short = 'w', long)]
    ignore_trailing_whitespace: bool,
    /// Give up once the distance exceeds this bound (0 means unbounded)
    #[arg(short, long, default_value_t = 0)]
    max_distance: usize,
}

impl CompareOptions {
    fn by_lines(&self) -> bool {
        self.lines || self.ignore_trailing_whitespace
    }
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_config = match cli.verbose {
        0 => LogConfig::NoLog,
        verbose => LogConfig::Verbose(verbose),
    };
    if let Err(err) = init_config(Config {
        log_config,
        threads: cli.threads,
    }) {
        eprintln!("error: {}", err);
        return ExitCode::from(2);
    }
    log::debug!("cli args: {:#?}", cli);
    match run(cli.command) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => {
            log::info!("success");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

/// Returns whether any comparison gave up at the distance bound.
fn run(command: Commands) -> Result<bool, Box<dyn Error>> {
    match command {
        Commands::Diff(args) => compare(args, true),
        Commands::Distance(args) => compare(args, false),
        Commands::Batch(args) => batch(args),
    }
}

fn split_lines(text: &[u8]) -> Vec<&[u8]> {
    text.split_inclusive(|&b| b == b'\n').collect()
}

fn compare(args: CompareArgs, print_script: bool) -> Result<bool, Box<dyn Error>> {
    let options = &args.options;
    log::info!("reading old file...");
    let old = fs::read(&args.old)?;
    log::info!("reading new file...");
    let new = fs::read(&args.new)?;

    let mut differ = Differ::new().with_max_distance(options.max_distance);
    let mut writer = BufWriter::new(io::stdout().lock());
    log::info!("comparing...");
    let outcome = if options.by_lines() {
        let old_lines = split_lines(&old);
        let new_lines = split_lines(&new);
        let index: &IndexFn<'_, &[u8], &[u8]> = &|lines, i| lines[i];
        let exact = |x: &&[u8], y: &&[u8]| x == y;
        let loose = |x: &&[u8], y: &&[u8]| x.trim_ascii_end() == y.trim_ascii_end();
        let compare: &CompareFn<'_, &[u8]> = if options.ignore_trailing_whitespace {
            &loose
        } else {
            &exact
        };
        let accessor = Accessor::custom(index, compare);
        let (a, b) = (Seq::whole(old_lines.as_slice()), Seq::whole(new_lines.as_slice()));
        if print_script {
            let outcome = differ.diff_with(a, b, &accessor)?;
            write_outcome(&mut writer, &outcome)?;
            if !outcome.is_truncated() {
                write_lines(&mut writer, differ.script(), &old_lines, &new_lines)?;
            }
            outcome
        } else {
            let outcome = differ.distance_with(a, b, &accessor)?;
            write_outcome(&mut writer, &outcome)?;
            outcome
        }
    } else if print_script {
        let outcome = differ.diff(&old, &new)?;
        write_outcome(&mut writer, &outcome)?;
        if !outcome.is_truncated() {
            write_runs(&mut writer, differ.script())?;
        }
        outcome
    } else {
        let outcome = differ.distance(&old, &new)?;
        write_outcome(&mut writer, &outcome)?;
        outcome
    };
    writer.flush()?;
    Ok(outcome.is_truncated())
}

fn batch(args: BatchArgs) -> Result<bool, Box<dyn Error>> {
    if args.files.len() % 2 != 0 {
        return Err("files must be given as OLD NEW pairs".into());
    }
    let options = &args.options;
    let contents = args
        .files
        .iter()
        .map(|path| {
            log::info!("reading {}...", path.display());
            fs::read(path)
        })
        .collect::<io::Result<Vec<_>>>()?;

    log::info!(
        "comparing {} pairs on {} threads...",
        args.files.len() / 2,
        rayon::current_num_threads()
    );
    let outcomes = if options.by_lines() {
        // Raw equality on trimmed lines is the -w comparison.
        let split: Vec<Vec<&[u8]>> = contents
            .iter()
            .map(|text| {
                let lines = split_lines(text);
                if options.ignore_trailing_whitespace {
                    lines.into_iter().map(<[u8]>::trim_ascii_end).collect()
                } else {
                    lines
                }
            })
            .collect();
        let pairs: Vec<(&[&[u8]], &[&[u8]])> = split
            .chunks_exact(2)
            .map(|pair| (pair[0].as_slice(), pair[1].as_slice()))
            .collect();
        distance_batch(&pairs, options.max_distance)
    } else {
        let pairs: Vec<(&[u8], &[u8])> = contents
            .chunks_exact(2)
            .map(|pair| (pair[0].as_slice(), pair[1].as_slice()))
            .collect();
        distance_batch(&pairs, options.max_distance)
    };

    let mut writer = BufWriter::new(io::stdout().lock());
    let mut truncated = false;
    for (paths, outcome) in args.files.chunks_exact(2).zip(outcomes) {
        let outcome = outcome?;
        truncated |= outcome.is_truncated();
        write!(writer, "{} {} ", paths[0].display(), paths[1].display())?;
        write_outcome(&mut writer, &outcome)?;
    }
    writer.flush()?;
    Ok(truncated)
}

fn op_symbol(op: EditOp) -> char {
    match op {
        EditOp::Match => '=',
        EditOp::Insert => '+',
        EditOp::Delete => '-',
    }
}

fn write_outcome(writer: &mut impl Write, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Complete { distance, .. } => writeln!(writer, "distance {}", distance),
        Outcome::Truncated { bound } => writeln!(writer, "distance > {}", bound),
    }
}

fn write_runs(writer: &mut impl Write, script: &EditScript) -> io::Result<()> {
    for edit in script {
        writeln!(writer, "{} {} {}", op_symbol(edit.op), edit.off, edit.len)?;
    }
    Ok(())
}

fn write_lines(
    writer: &mut impl Write,
    script: &EditScript,
    old_lines: &[&[u8]],
    new_lines: &[&[u8]],
) -> io::Result<()> {
    for edit in script {
        let (symbol, lines) = match edit.op {
            EditOp::Match => (b' ', old_lines),
            EditOp::Delete => (b'-', old_lines),
            EditOp::Insert => (b'+', new_lines),
        };
        for line in &lines[edit.off..edit.end()] {
            writer.write_all(&[symbol])?;
            writer.write_all(line)?;
            if !line.ends_with(b"\n") {
                writer.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
