//! Daywise binary — interactive terminal chat or the HTTP front end.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use daywise::agent_core::{LocationPrompter, Orchestrator};
use daywise::llm::{LanguageModel, OpenAiClient};
use daywise::location::LocationResolver;
use daywise::{default_agents, init_tracing, server, system};

#[derive(Parser)]
#[command(name = "daywise")]
#[command(version, about = "Conversational weather, time, and clothing assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat in the terminal
    Chat,
    /// Serve the HTTP front end
    Serve {
        /// Host to bind
        #[arg(long, env = "DAYWISE_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, env = "DAYWISE_PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    system::log_runtime_info();

    let cli = Cli::parse();

    let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::from_env()?);
    let orchestrator = Orchestrator::new(
        default_agents(llm.clone()),
        llm,
        LocationResolver::open_meteo(),
    );

    match cli.command {
        Command::Chat => run_chat(orchestrator.with_prompter(Arc::new(StdinPrompter))).await,
        Command::Serve { host, port } => {
            server::serve(&host, port, orchestrator).await?;
            Ok(())
        }
    }
}

// ─── Terminal Chat ───────────────────────────────────────────────────────────

async fn run_chat(mut orchestrator: Orchestrator) -> Result<()> {
    print_greeting();

    loop {
        print!("\n{} ", orchestrator.next_follow_up());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => None,
            line = read_line() => line?,
        };

        // Ctrl-C and end of input both say goodbye.
        let Some(line) = line else {
            println!("\n{}", orchestrator.next_goodbye());
            return Ok(());
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if orchestrator.is_exit_phrase(input) {
            println!("\n{}", orchestrator.next_goodbye());
            return Ok(());
        }

        let envelope = orchestrator.route(input).await;
        println!("\n{}", envelope.input);
    }
}

fn print_greeting() {
    println!("Hi there! 👋 I'm your personal assistant for weather updates, time information, and clothing recommendations.");
    println!("I can help you plan your day and choose the perfect outfit based on the weather!");
    println!("\nHere are some things you can ask me:");
    println!("🌤️  What's the weather like in New York?");
    println!("👔  What should I wear today?");
    println!("📋  Give me a summary of my day");
    println!("🕒  What time is it in London?");
    println!("\nType 'exit' when you're done!");
}

/// Read one stdin line off the runtime; `None` at end of input.
async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(e) => Err(e),
        }
    })
    .await??;
    Ok(line)
}

/// Stdin-backed location prompter for the terminal chat.
struct StdinPrompter;

impl LocationPrompter for StdinPrompter {
    fn request_location(&self, retry: bool) -> Option<String> {
        if retry {
            println!("I'm having trouble finding that location. Could you try again with a different city name?");
        } else {
            println!("I'd love to help! Could you tell me which city you're in? (You can include state/country for more accuracy)");
        }
        print!("> ");
        std::io::stdout().flush().ok()?;

        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}
