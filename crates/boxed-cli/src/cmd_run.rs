use boxed_batch::{run_batch, run_reader, BatchReport, BatchStats};
use clap::Args;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "math500/llama38b2_40-temperature-0.0.jsonl";
pub const DEFAULT_OUTPUT: &str = "math500/extracted_answers.txt";

// ── CLI Schema ──

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Input JSONL dataset ("-" reads stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Output file, one answer per line
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Keep results in memory only
    #[arg(long, conflicts_with = "output")]
    pub no_output: bool,
    /// Do not list the extracted answers
    #[arg(short, long)]
    pub quiet: bool,
    /// Print a JSON run summary instead of the listing
    #[arg(long)]
    pub json: bool,
    /// Debug logging for the extraction pipeline
    #[arg(short, long)]
    pub verbose: bool,
}

// ── Path Resolution ──

/// Flags win over `BOXED_INPUT` / `BOXED_OUTPUT`, which win over the defaults.
///
/// An empty input value is ignored. An empty output value, from the flag or
/// the environment, means no output file.
fn resolve_paths<F>(args: &RunArgs, env: F) -> (PathBuf, Option<PathBuf>)
where
    F: Fn(&str) -> Option<String>,
{
    let input = args
        .input
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| env("BOXED_INPUT").filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    let output = if args.no_output {
        None
    } else {
        args.output
            .clone()
            .or_else(|| env("BOXED_OUTPUT").map(PathBuf::from))
            .or_else(|| Some(PathBuf::from(DEFAULT_OUTPUT)))
            .filter(|p| !p.as_os_str().is_empty())
    };

    (input, output)
}

// ── Command Implementation ──

/// `boxed run`
pub fn execute(args: &RunArgs) -> anyhow::Result<()> {
    let (input, output) = resolve_paths(args, |k| std::env::var(k).ok());
    tracing::debug!(input = %input.display(), output = ?output, "resolved paths");

    let mut stdout = std::io::stdout().lock();
    run_to(
        args,
        &input,
        output.as_deref(),
        std::io::stdin().lock(),
        &mut stdout,
    )
}

/// Run the batch and render the console report into `out`.
/// `stdin` is only read when `input` is `-`.
fn run_to<R, W>(
    args: &RunArgs,
    input: &Path,
    output: Option<&Path>,
    stdin: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    if !args.json {
        writeln!(out, "Processing the file: {}", input.display())?;
    }

    let report = if input == Path::new("-") {
        run_reader(stdin, output)
    } else {
        run_batch(input, output)
    };

    if args.json {
        let summary = RunSummary::new(input, &report);
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    if let Some(path) = &report.written {
        writeln!(
            out,
            "\nSuccessfully wrote {} results to '{}'",
            report.extractions.len(),
            path.display()
        )?;
    }

    if !args.quiet {
        write!(out, "{}", render_listing(&report.extractions))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    input: String,
    output: Option<String>,
    results: usize,
    stats: &'a BatchStats,
    issues: Vec<String>,
}

impl<'a> RunSummary<'a> {
    fn new(input: &Path, report: &'a BatchReport) -> Self {
        Self {
            input: input.display().to_string(),
            output: report.written.as_ref().map(|p| p.display().to_string()),
            results: report.extractions.len(),
            stats: &report.stats,
            issues: report.issues.iter().map(|i| i.to_string()).collect(),
        }
    }
}

fn render_listing(extractions: &[String]) -> String {
    let mut out = String::from("\n--- In-Memory Results (for verification) ---\n");
    if extractions.is_empty() {
        out.push_str("No boxed content was found.\n");
    } else {
        for (i, result) in extractions.iter().enumerate() {
            out.push_str(&format!("{}: {result}\n", i + 1));
        }
    }
    out
}
