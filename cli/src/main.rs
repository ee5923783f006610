//! Quill CLI binary.
//!
//! Subcommands: `serve` (HTTP server) and `run` (one text operation, result as JSON on stdout).

mod log_format;
mod logging;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quill::{LlmSettings, Operation, Pipeline};
use run::{execute, read_text, RunOptions, RunParams};

#[derive(Parser, Debug)]
#[command(name = "quill", version)]
#[command(about = "Quill: summarize, improve, translate and six-hats analysis through an LLM")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (POST /llm/<operation>, GET /health)
    Serve(ServeArgs),
    /// Run one operation and print the response envelope as JSON
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Listen address (default QUILL_ADDR or 127.0.0.1:8000)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// summarize, improve, translate or six-hats
    operation: Operation,

    /// summarize: how much to shorten, in percent
    #[arg(long, value_name = "N")]
    percentage: Option<u32>,

    /// improve: rewriting criterion, e.g. "più formale"
    #[arg(long, value_name = "TEXT")]
    criterion: Option<String>,

    /// translate: language name or ISO 639-1 code
    #[arg(long, value_name = "LANG")]
    target_language: Option<String>,

    /// six-hats: white, red, black, yellow, green, blue (or bianco, rosso, ...)
    #[arg(long, value_name = "HAT")]
    hat: Option<String>,

    /// Print the instruction set instead of calling the model
    #[arg(long)]
    dry_run: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Directory with an operations.yaml overriding the built-in prompts
    #[arg(long, value_name = "DIR")]
    prompts_dir: Option<PathBuf>,

    /// Write the JSON output to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Text to process; read from stdin when omitted
    #[arg(trailing_var_arg = true)]
    text: Vec<String>,
}

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LlmSettings::from_env()?;
    let builder = run::prompt_builder(None)?;
    let invoker = quill::ModelInvoker::from_settings(&settings)?;
    tracing::info!(
        providers = invoker.len(),
        timeout_secs = settings.timeout.as_secs(),
        "model providers configured"
    );
    serve::run_serve(args.addr.as_deref(), Pipeline::new(builder, invoker))
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("quill", None::<&std::path::Path>).ok();
    let _log_guard = logging::init()?;

    let args = Args::parse();
    match args.cmd {
        Command::Serve(sa) => {
            if let Err(e) = run_server(sa).await {
                eprintln!("quill serve: {}", e);
                std::process::exit(1);
            }
        }
        Command::Run(ra) => {
            let text = match read_text(&ra.text, std::io::stdin().lock()) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("quill: {}", e);
                    std::process::exit(2);
                }
            };
            let opts = RunOptions {
                operation: ra.operation,
                params: RunParams {
                    percentage: ra.percentage,
                    criterion: ra.criterion,
                    target_language: ra.target_language,
                    hat: ra.hat,
                },
                text,
                dry_run: ra.dry_run,
                pretty: ra.pretty,
                prompts_dir: ra.prompts_dir,
                output: ra.output,
            };
            if let Err(e) = execute(opts).await {
                eprintln!("quill: {}", e);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
