mod desk;
mod output;
mod shell;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paperdesk_core::error::ExitCode;
use paperdesk_core::export::{export_file_name, to_csv};
use paperdesk_core::{AppConfig, PaperStats, ResearchSession, TopicStore};

use crate::desk::Desk;
use crate::output::{print_json, print_papers, print_stats, print_stored, print_topics};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "paperdesk",
    about = "Research assistant: search arXiv, keep topic caches, chat about papers",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting PAPERDESK_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search arXiv for a topic and save the results.
    Search {
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
        /// Number of papers to fetch (1-20). Defaults to `search.max_results`.
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..=20))]
        max_results: Option<u32>,
    },

    /// Show a saved paper by its arXiv id.
    Paper { id: String },

    /// List saved topics.
    Topics,

    /// Descriptive statistics over a saved topic.
    Stats {
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },

    /// Export a saved topic as CSV.
    Export {
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
        /// Output file. Defaults to `research_papers_<timestamp>.csv`; `-` writes to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the language model a single question.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Saved topic whose papers are given as context.
        #[arg(long)]
        topic: Option<String>,
    },

    /// Interactive session: search, chat, analyse and export.
    Shell {
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..=20))]
        max_results: Option<u32>,
    },

    /// Print the resolved configuration.
    Config,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let start = Instant::now();
    let _ = dotenvy::dotenv();
    init_tracing();

    // clap exits with 2 on usage errors, which would read as "not found".
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e) as i32);
        }
    };

    if let Err(e) = run(cli, start).await {
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::GeneralError as i32);
    }
}

async fn run(cli: Cli, start: Instant) -> Result<()> {
    let json_output = cli.json || std::env::var("PAPERDESK_JSON").as_deref() == Ok("1");

    let config = AppConfig::load().context("failed to load configuration")?;
    let desk = Desk::open(config)?;

    match cli.command {
        Commands::Search { topic, max_results } => {
            let topic = topic.join(" ");
            let max_results = max_results.unwrap_or(desk.config.search.max_results);
            let outcome = desk.repo.search(&topic, max_results).await;
            let dur = start.elapsed().as_millis();

            if json_output {
                let status = if outcome.error.is_some() { "error" } else { "ok" };
                print_json(&serde_json::json!({
                    "status": status,
                    "data": { "items": outcome.papers, "total": outcome.papers.len(), "topic": topic, "saved_to": outcome.saved_to },
                    "error": outcome.error,
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                if let Some(error) = &outcome.error {
                    eprintln!("{error}");
                }
                if outcome.papers.is_empty() {
                    println!("No papers found. Try a different search term.");
                } else {
                    println!("Found {} papers!\n", outcome.papers.len());
                    print_papers(&outcome.papers);
                }
            }
        }

        Commands::Paper { id } => {
            let found = desk.store().find_by_id(&id)?;
            let dur = start.elapsed().as_millis();
            match found {
                Some(paper) => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"id":id,"paper":paper},"meta":{"duration_ms":dur}}))?;
                    } else {
                        print_stored(&id, &paper);
                    }
                }
                None => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"error","error":"not_found","message":format!("Paper {id} not found"),"meta":{"duration_ms":dur}}))?;
                    } else {
                        eprintln!("Paper not found: {id}");
                    }
                    std::process::exit(ExitCode::NotFound as i32);
                }
            }
        }

        Commands::Topics => {
            let topics = desk.store().list_topics()?;
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"items":topics,"total":topics.len()},"meta":{"duration_ms":dur}}))?;
            } else {
                print_topics(&topics);
            }
        }

        Commands::Stats { topic } => {
            let topic = topic.join(" ");
            let records = load_topic_or_exit(desk.store(), &topic, json_output)?;
            let stats = PaperStats::compute(&records);
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":stats,"meta":{"duration_ms":dur}}))?;
            } else {
                print_stats(&stats);
            }
        }

        Commands::Export { topic, out } => {
            let topic = topic.join(" ");
            let records = load_topic_or_exit(desk.store(), &topic, json_output)?;
            let csv = to_csv(&records);

            if out.as_deref() == Some(std::path::Path::new("-")) {
                print!("{csv}");
            } else {
                let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Local::now())));
                std::fs::write(&path, csv)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                let dur = start.elapsed().as_millis();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path,"rows":records.len()},"meta":{"duration_ms":dur}}))?;
                } else {
                    println!("Wrote {} papers to {}", records.len(), path.display());
                }
            }
        }

        Commands::Ask { question, topic } => {
            let question = question.join(" ");
            let mut session = ResearchSession::new();
            if let Some(topic) = topic {
                let records = load_topic_or_exit(desk.store(), &topic, json_output)?;
                session.replace_results(&topic, records);
            }

            let reply = desk.exchange().submit(&mut session, &question).await;
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"turns":session.conversation.turns()},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("{reply}");
            }
        }

        Commands::Shell { max_results } => {
            let max_results = max_results.unwrap_or(desk.config.search.max_results);
            shell::run(&desk, max_results).await?;
        }

        Commands::Config => {
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":desk.config,"meta":{"config_path":AppConfig::config_path()}}))?;
            } else {
                println!("# {}", AppConfig::config_path().display());
                print!("{}", toml::to_string_pretty(&desk.config)?);
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// `--help` and `--version` surface as clap errors too, but exit cleanly.
fn parse_exit_code(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::InvalidArgs
    } else {
        ExitCode::Success
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if std::env::var("PAPERDESK_LOG_JSON").ok().as_deref() == Some("1") {
        fmt.json().init();
    } else {
        fmt.init();
    }
}

fn load_topic_or_exit(
    store: &TopicStore,
    topic: &str,
    json_output: bool,
) -> Result<Vec<paperdesk_core::PaperRecord>> {
    match store.load_records(topic)? {
        Some(records) => Ok(records),
        None => {
            if json_output {
                print_json(&serde_json::json!({"status":"error","error":"not_found","message":format!("Topic '{topic}' has no saved papers")}))?;
            } else {
                eprintln!("No saved papers for topic '{topic}'. Run `paperdesk search {topic}` first.");
            }
            std::process::exit(ExitCode::NotFound as i32);
        }
    }
}
