use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use paperdesk_core::export::{export_file_name, to_csv};
use paperdesk_core::{PaperStats, ResearchSession, Role};

use crate::desk::Desk;
use crate::output::{print_papers, print_stats, print_stored, print_topics};

const HELP: &str = "\
Commands:
  /search <topic>   search arXiv and make the results the chat context
  /paper <id>       show a saved paper
  /topics           list saved topics
  /stats            analyse the current results
  /export [path]    write the current results as CSV
  /history          show the conversation
  /clear            clear the conversation
  /help             show this help
  /quit             leave the shell
Anything else is sent to the language model together with the top results.";

enum Action {
    Continue,
    Quit,
}

/// Interactive session: one `ResearchSession` for the life of the loop.
pub async fn run(desk: &Desk, max_results: u32) -> Result<()> {
    let mut session = ResearchSession::new();

    println!("paperdesk shell. Type /help for commands.");
    if !desk.has_provider() {
        println!(
            "Note: {} is not set; chat replies will explain how to configure it.",
            desk.config.ai.api_key_env
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("paperdesk> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Action::Quit = handle_line(desk, &mut session, max_results, line).await {
            break;
        }
    }
    Ok(())
}

async fn handle_line(
    desk: &Desk,
    session: &mut ResearchSession,
    max_results: u32,
    line: &str,
) -> Action {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "/quit" | "/exit" => return Action::Quit,
        "/help" => println!("{HELP}"),

        "/search" if arg.is_empty() => println!("Usage: /search <topic>"),
        "/search" => {
            println!("Searching for papers on '{arg}'...");
            let outcome = desk.repo.search(arg, max_results).await;
            if let Some(error) = &outcome.error {
                eprintln!("{error}");
            }
            if outcome.papers.is_empty() {
                println!("No papers found. Try a different search term.");
            } else {
                println!("Found {} papers!\n", outcome.papers.len());
                print_papers(&outcome.papers);
                session.replace_results(arg, outcome.papers);
            }
        }

        "/paper" if arg.is_empty() => println!("Usage: /paper <id>"),
        "/paper" => match desk.store().find_by_id(arg) {
            Ok(Some(paper)) => print_stored(arg, &paper),
            Ok(None) => println!("No saved paper with id {arg}."),
            Err(e) => eprintln!("Error retrieving paper info: {e}"),
        },

        "/topics" => match desk.store().list_topics() {
            Ok(topics) => print_topics(&topics),
            Err(e) => eprintln!("Error listing topics: {e}"),
        },

        "/stats" if session.results.is_empty() => {
            println!("Search for papers first to see analysis.")
        }
        "/stats" => print_stats(&PaperStats::compute(&session.results)),

        "/export" if session.results.is_empty() => println!("Search for papers first to export."),
        "/export" => {
            let path = if arg.is_empty() {
                PathBuf::from(export_file_name(chrono::Local::now()))
            } else {
                PathBuf::from(arg)
            };
            match std::fs::write(&path, to_csv(&session.results)) {
                Ok(()) => println!("Wrote {} papers to {}", session.results.len(), path.display()),
                Err(e) => eprintln!("Error writing {}: {e}", path.display()),
            }
        }

        "/history" if session.conversation.is_empty() => println!("No messages yet."),
        "/history" => {
            for turn in session.conversation.turns() {
                let speaker = match turn.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                };
                println!("{speaker}> {}\n", turn.content);
            }
        }

        "/clear" => {
            session.clear_conversation();
            println!("Conversation cleared.");
        }

        _ if command.starts_with('/') => println!("Unknown command {command}. Type /help."),

        _ => {
            let reply = desk.exchange().submit(session, line).await;
            println!("\n{reply}\n");
        }
    }
    Action::Continue
}
