mod cmd_run;
mod cmd_text;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "boxed",
    version,
    about = "Extract final \\boxed answers from JSONL model outputs",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
    // used when no subcommand is given
    #[command(flatten)]
    run: cmd_run::RunArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Extract answers from a JSONL dataset (default command)
    Run(cmd_run::RunArgs),
    /// Extract the answer from a single text (argument or stdin)
    Text {
        /// Text to scan; read from stdin when omitted
        text: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Some(Command::Run(args)) => {
            init_tracing(args.verbose)?;
            cmd_run::execute(&args)
        }
        Some(Command::Text { text }) => {
            init_tracing(false)?;
            cmd_text::execute(text.as_deref())
        }
        None => {
            init_tracing(cli.run.verbose)?;
            cmd_run::execute(&cli.run)
        }
    }
}

/// Diagnostics go to stderr so stdout stays clean for results.
/// `BOXED_LOG` takes `RUST_LOG` syntax; the default shows warnings and errors.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let mut filter =
        EnvFilter::try_from_env("BOXED_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        filter = filter
            .add_directive("boxed=debug".parse()?)
            .add_directive("boxed_batch=debug".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
