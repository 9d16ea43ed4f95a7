mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runtime::{AnthropicBackend, Args, ParamType, Runtime, Tool, ToolError};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "tiller.toml";
const SAFE_DEFAULT: &str = "I could not complete that request.";

#[derive(Parser)]
#[command(name = "tiller")]
#[command(about = "A tool-calling runtime for text-only LLMs", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file.
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log full prompts and model output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session with tool access
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question to ask.
        prompt: String,
        /// Never fail: print a fallback answer on any error.
        #[arg(long)]
        safe: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    let rt = build_runtime(&config, cli.verbose)?;

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat(&rt, &config).await,
        Some(Commands::Ask { prompt, safe }) => cmd_ask(&rt, &prompt, safe).await,
    }
}

fn build_runtime(config: &Config, verbose: bool) -> Result<Runtime<AnthropicBackend>> {
    let backend = AnthropicBackend::builder(config.api_key()?, &config.backend.model).build();

    let mut runtime_config = config.runtime_config();
    runtime_config.verbose = runtime_config.verbose || verbose;

    let mut rt = Runtime::with_config(backend, runtime_config);
    rt.register(
        Tool::builder("add")
            .description("Add two integers and return their sum.")
            .param("a", ParamType::Integer)
            .param("b", ParamType::Integer)
            .handler(|args: &Args| -> std::result::Result<Value, ToolError> {
                Ok(json!(args.int("a")? + args.int("b")?))
            })
            .build()?,
    );
    rt.register(
        Tool::builder("word_count")
            .description("Count the words in a piece of text.")
            .param("text", ParamType::String)
            .handler(|args: &Args| -> std::result::Result<Value, ToolError> {
                Ok(json!(args.str("text")?.split_whitespace().count()))
            })
            .build()?,
    );
    Ok(rt)
}

async fn cmd_chat(rt: &Runtime<AnthropicBackend>, config: &Config) -> Result<()> {
    println!("tiller v{}", env!("CARGO_PKG_VERSION"));
    println!("Model: {}", config.backend.model);
    println!(
        "Tools: {}",
        rt.registry().names().join(", ")
    );
    println!("Type 'quit' or Ctrl+D to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut history: Vec<(String, String)> = Vec::new();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        match rt.run_with_history(input, history.clone()).await {
            Ok((answer, updated)) => {
                history = updated;
                println!("\n{answer}\n");
            }
            Err(e) => {
                eprintln!("Error: {e}\n");
            }
        }
    }

    println!("\nBye.");
    Ok(())
}

async fn cmd_ask(rt: &Runtime<AnthropicBackend>, prompt: &str, safe: bool) -> Result<()> {
    let answer = if safe {
        rt.run_safe(prompt, SAFE_DEFAULT).await
    } else {
        rt.run(prompt).await?
    };
    println!("{answer}");
    Ok(())
}
