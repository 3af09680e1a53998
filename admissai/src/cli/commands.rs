//! CLI command execution.
//!
//! This is a thin client - everything except checklist progress lives on
//! the backend.

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::debug;

use crate::api::ApiClient;
use crate::chat::{markdown, RenderedMessage, SendOutcome, SessionController};
use crate::checklist::{ChecklistTracker, FileStore, KeyValueStore};
use crate::config::Config;
use crate::notify::ConsoleNotifier;

use super::args::{ChecklistAction, Cli, Commands};
use super::view::{format_compression, format_message, TerminalChatView, TerminalChecklistView};

/// Subdirectory of the data dir holding one file per program.
const CHECKLIST_DIR: &str = "checklists";

/// Range the backend compressor accepts.
const RATIO_RANGE: std::ops::RangeInclusive<f64> = 0.1..=0.9;

// === Command Execution ===

pub async fn execute(cli: Cli) -> Result<()> {
    if matches!(cli.command, Commands::Render) {
        return render_stdin().await;
    }

    let config = Config::resolve(cli.server, cli.data_dir)?;
    debug!(server = %config.server_url, data_dir = %config.data_dir.display(), "resolved config");
    let client = ApiClient::new(&config.server_url);

    match cli.command {
        Commands::Chat { program, html } => run_chat(client, program.as_deref(), html).await,
        Commands::Ask {
            program,
            html,
            message,
        } => ask(client, program.as_deref(), html, &message.join(" ")).await,
        Commands::Programs { category, query } => {
            list_programs(&client, category.as_deref(), query.as_deref()).await
        }
        Commands::Program { id } => show_program(&client, &id).await,
        Commands::Checklist { action } => run_checklist(client, &config, action).await,
        Commands::Compress { ratio, text } => compress(&client, &text.join(" "), ratio).await,
        Commands::Render => render_stdin().await,
    }
}

// === Chat ===

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Message(&'a str),
    Program(&'a str),
    General,
    History,
    Tokens,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_chat_input(line: &str) -> ChatInput<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ChatInput::Message(trimmed);
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));

    match (name, arg) {
        ("program", "") | ("general", _) => ChatInput::General,
        ("program", id) => ChatInput::Program(id),
        ("history", _) => ChatInput::History,
        ("tokens", _) => ChatInput::Tokens,
        ("help", _) => ChatInput::Help,
        ("quit" | "exit", _) => ChatInput::Quit,
        _ => ChatInput::Unknown(trimmed),
    }
}

fn print_chat_help() {
    println!("Type a question and press Enter. Commands:");
    println!("  /program <ID>  Scope questions to a program");
    println!("  /general       Ask general questions (no program)");
    println!("  /history       Replay this session");
    println!("  /tokens        Tokens saved by context compression");
    println!("  /quit          Leave");
}

fn prompt(session: &SessionController<ApiClient>) -> Result<()> {
    let scope = session.selected_program_id();
    let scope = if scope.is_empty() { "general" } else { scope.as_str() };
    print!("{scope}> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

async fn run_chat(client: ApiClient, program: Option<&str>, html: bool) -> Result<()> {
    println!("AdmissAI chat ({})", client.base_url());
    let session = SessionController::new(client, Arc::new(TerminalChatView { html }));
    if let Some(program) = program {
        session.select_program(program);
    }
    print_chat_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&session)?;
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        match parse_chat_input(&line) {
            ChatInput::Message(text) => {
                session.send(text).await;
            }
            ChatInput::Program(id) => {
                session.select_program(id);
                println!("Context: {id}");
            }
            ChatInput::General => {
                session.select_program("");
                println!("Context: general");
            }
            ChatInput::History => {
                for message in session.history() {
                    println!("{}\n", format_message(&RenderedMessage::from_message(&message), html));
                }
            }
            ChatInput::Tokens => println!("Tokens saved this session: {}", session.tokens_saved()),
            ChatInput::Help => print_chat_help(),
            ChatInput::Quit => break,
            ChatInput::Unknown(input) => println!("Unknown command: {input} (try /help)"),
        }
    }

    Ok(())
}

async fn ask(client: ApiClient, program: Option<&str>, html: bool, message: &str) -> Result<()> {
    let session = SessionController::new(client, Arc::new(TerminalChatView { html }));
    if let Some(program) = program {
        session.select_program(program);
    }

    match session.send(message).await {
        SendOutcome::Replied => Ok(()),
        SendOutcome::Ignored => bail!("Message is required for ask command"),
        SendOutcome::Failed => bail!("Chat request failed"),
    }
}

// === Programs ===

async fn list_programs(
    client: &ApiClient,
    category: Option<&str>,
    query: Option<&str>,
) -> Result<()> {
    let list = client
        .programs(category, query)
        .await
        .context("Failed to list programs")?;

    if list.programs.is_empty() {
        println!("No programs found.");
        return Ok(());
    }

    println!(
        "{:<16} {:<10} {:<36} {:<14} {:<8}",
        "ID", "SCHOOL", "PROGRAM", "CATEGORY", "ACCEPT"
    );
    println!("{}", "-".repeat(88));

    for p in &list.programs {
        println!(
            "{:<16} {:<10} {:<36} {:<14} {:<8}",
            p.id,
            p.short_name,
            truncate(&p.program, 34),
            p.category,
            p.acceptance_rate.as_deref().unwrap_or("-"),
        );
    }

    if !list.categories.is_empty() {
        println!("\nCategories: {}", list.categories.join(", "));
    }
    Ok(())
}

async fn show_program(client: &ApiClient, program_id: &str) -> Result<()> {
    let detail = client
        .program(program_id)
        .await
        .with_context(|| format!("Failed to load program {program_id}"))?;
    let p = &detail.program;

    println!("{} - {}", p.university, p.program);
    println!("Category:    {}", p.category);
    if let Some(rate) = &p.acceptance_rate {
        println!("Acceptance:  {rate}");
    }
    if let Some(gpa) = &p.avg_gpa {
        println!("Average GPA: {gpa}");
    }
    if let Some(deadline) = &p.application_deadline {
        println!("Deadline:    {deadline}");
    }
    if let Some(fee) = &p.application_fee {
        println!("Fee:         {fee}");
    }
    if let Some(stats) = &detail.compression {
        println!("\n{}", format_compression(stats));
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// === Checklist ===

async fn run_checklist(client: ApiClient, config: &Config, action: ChecklistAction) -> Result<()> {
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::new(config.data_dir.join(CHECKLIST_DIR)));
    let mut tracker = ChecklistTracker::new(
        client,
        store,
        Arc::new(TerminalChecklistView),
        Arc::new(ConsoleNotifier),
    );

    match action {
        ChecklistAction::Show { program_id } => {
            tracker
                .load(&program_id)
                .await
                .with_context(|| format!("Failed to load checklist for {program_id}"))?;
        }
        ChecklistAction::Toggle { program_id, items } => {
            tracker
                .ensure_loaded(&program_id)
                .await
                .with_context(|| format!("Failed to load checklist for {program_id}"))?;

            if let Some(unknown) = items.iter().find(|item| !tracker.has_item(item)) {
                bail!("Unknown checklist item '{unknown}' for {program_id}");
            }

            println!();
            for item in &items {
                tracker.toggle(item);
            }
        }
    }
    Ok(())
}

// === Compress / Render ===

async fn compress(client: &ApiClient, text: &str, ratio: f64) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Text is required for compress command");
    }
    if !RATIO_RANGE.contains(&ratio) {
        bail!("Ratio must be between 0.1 and 0.9 (got {ratio})");
    }

    let result = client
        .compress(text, ratio)
        .await
        .context("Compression failed")?;

    println!("{}", result.compressed_text);
    eprintln!(
        "\n{} → {} chars, {}",
        result.original_chars,
        result.compressed_chars,
        format_compression(&result.stats)
    );
    Ok(())
}

async fn render_stdin() -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read stdin")?;
    println!("{}", markdown::render(input.trim_end_matches('\n')));
    Ok(())
}
