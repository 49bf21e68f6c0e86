//! rulechain command-line shell
//!
//! Collects facts and an optional goal, runs one of the chaining engines,
//! and prints the trace and verdict.
//!
//! Commands:
//! - rulechain facts
//! - rulechain forward -f <fact>...
//! - rulechain prove <goal> -f <fact>...
//! - rulechain check <file>

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rulechain::config::RULES_ENV;
use rulechain::trace::{render_fact_list, render_forward_report, render_proof_report};
use rulechain::{
    Fact, FactSet, InferenceReport, OutputFormat, RuleSource, RuleStore, ShellConfig,
};

/// Rule-based reasoning over a propositional rule base
#[derive(Parser, Debug)]
#[command(name = "rulechain")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Rule base file (JSON array of {conditions, conclusion, explanation}).
    /// Defaults to the built-in health-assistant rules.
    #[arg(long, global = true, env = RULES_ENV)]
    rules: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Indent proof narration by recursion depth
    #[arg(long, global = true)]
    indent: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List selectable facts (rule conditions) and valid goals (rule conclusions)
    Facts,

    /// Saturate the given facts with forward chaining
    Forward {
        /// Initially known fact (repeatable)
        #[arg(short = 'f', long = "fact")]
        facts: Vec<String>,
    },

    /// Try to prove a goal from the given facts with backward chaining
    Prove {
        /// Goal fact
        goal: String,

        /// Known fact (repeatable)
        #[arg(short = 'f', long = "fact")]
        facts: Vec<String>,
    },

    /// Validate a rule base file and print its fingerprint
    Check {
        /// Rule base file
        file: PathBuf,
    },
}

impl Cli {
    fn shell_config(&self) -> ShellConfig {
        ShellConfig {
            rules: RuleSource::from_path(self.rules.clone()),
            format: self.format,
            indent_proofs: self.indent,
        }
    }
}

fn collect_facts(store: &RuleStore, tokens: &[String]) -> FactSet {
    let vocabulary = store.all_facts();
    tokens
        .iter()
        .map(|t| {
            let fact = Fact::new(t.trim());
            if !vocabulary.contains(&fact) {
                warn!(fact = %fact, "fact is not mentioned by any rule");
            }
            fact
        })
        .collect()
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.shell_config();

    match cli.command {
        Command::Facts => {
            let store = config.rules.load()?;
            let symptoms = store.condition_facts();
            let goals = store.conclusion_facts();
            match config.format {
                OutputFormat::Text => {
                    println!("Selectable facts");
                    print!("{}", render_fact_list(symptoms));
                    println!();
                    println!("Goals");
                    print!("{}", render_fact_list(goals));
                }
                OutputFormat::Json => {
                    let doc = json!({ "facts": symptoms, "goals": goals });
                    println!("{}", serde_json::to_string_pretty(&doc)?);
                }
            }
        }
        Command::Forward { facts } => {
            let store = config.rules.load()?;
            let initial = collect_facts(&store, &facts);
            let result = store.forward_chain(&initial);
            match config.format {
                OutputFormat::Text => print!("{}", render_forward_report(&result)),
                OutputFormat::Json => {
                    let report = InferenceReport::forward(&store, &initial, &result);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
        Command::Prove { goal, facts } => {
            let store = config.rules.load()?;
            let known = collect_facts(&store, &facts);
            let goal = Fact::new(goal.trim());
            let result = store.prove_goal(&goal, &known);
            match config.format {
                OutputFormat::Text => print!("{}", render_proof_report(&result, config.indent_proofs)),
                OutputFormat::Json => {
                    let report = InferenceReport::backward(&store, &known, &result);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
        Command::Check { file } => {
            let store = RuleStore::load(&file)?;
            match config.format {
                OutputFormat::Text => {
                    println!("{}: {} rules, fingerprint {}", file.display(), store.len(), store.fingerprint());
                }
                OutputFormat::Json => {
                    let doc = json!({
                        "path": file,
                        "rules": store.len(),
                        "fingerprint": store.fingerprint(),
                    });
                    println!("{}", serde_json::to_string_pretty(&doc)?);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
