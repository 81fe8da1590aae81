use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use helpdesk_agents::{render_policy, HelpdeskAgent};
use helpdesk_core::RouterResult;
use helpdesk_observability::{init_tracing, AppMetrics};

const DEFAULT_QUESTION: &str = "How to get transcript?";

#[derive(Debug, Parser)]
#[command(name = "helpdesk")]
#[command(about = "Offline campus helpdesk")]
struct Cli {
    #[arg(long, env = "HELPDESK_KB_ROOT", default_value = "kb")]
    kb_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer one question and print the evidence trail.
    Ask {
        question: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Interactive question loop.
    Chat,
    /// Fetch a policy, optionally `topic#section`.
    Policy { topic: String },
    Faq { query: Vec<String> },
    Workflow { name: Vec<String> },
    /// List available policy topics.
    Topics,
}

fn main() -> Result<()> {
    init_tracing("helpdesk");
    let cli = Cli::parse();

    let agent = HelpdeskAgent::load(&cli.kb_root, AppMetrics::shared()).with_context(|| {
        format!(
            "failed loading knowledge base from {}",
            cli.kb_root.display()
        )
    })?;

    match cli.command {
        Command::Ask { question, json } => {
            let question = if question.is_empty() {
                DEFAULT_QUESTION.to_string()
            } else {
                question.join(" ")
            };
            let result = agent.ask(&question)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Command::Chat => run_chat(&agent)?,
        Command::Policy { topic } => {
            let policy = agent.policy_fetch(&topic)?;
            match render_policy(&policy) {
                Some(markdown) => println!("{markdown}"),
                None => println!("{}", serde_json::to_string_pretty(&policy)?),
            }
        }
        Command::Faq { query } => {
            let hit = agent.faq_lookup(&query.join(" "));
            println!("{}", serde_json::to_string_pretty(&hit)?);
        }
        Command::Workflow { name } => {
            let hit = agent.workflow_guide(&name.join(" "));
            println!("{}", serde_json::to_string_pretty(&hit)?);
        }
        Command::Topics => {
            for topic in agent.policy_topics()? {
                println!("{topic}");
            }
        }
    }

    Ok(())
}

fn run_chat(agent: &HelpdeskAgent) -> Result<()> {
    println!("Campus helpdesk (offline). type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let result = agent.ask(message)?;
        println!("\n{}\n", result.answer);

        if let Some(policy) = agent.policy_companion(message)? {
            if let Some(markdown) = render_policy(&policy) {
                if markdown != result.answer {
                    println!("--- full policy ---\n{markdown}\n");
                }
            }
        }
    }

    Ok(())
}

fn print_result(result: &RouterResult) {
    println!("\n=== Answer ===\n{}", result.answer);
    println!("\n=== Steps ===");
    for (idx, step) in result.evidence.iter().enumerate() {
        println!("{}. {} {}", idx + 1, step.tool_name(), step.result_value());
    }
}
