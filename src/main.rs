// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use local_ai_client::models::{SUGGESTED_MODELS, find_suggested};
use local_ai_client::utils::logging::{
    format_document_status, format_error, format_heading, format_info, format_model_status,
    format_success, format_warning,
};
use local_ai_client::utils::{Validator, format_file_size};
use local_ai_client::{AppError, Config, PendingSpinner, QueryResponse, Session, UploadFile};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "local-ai")]
#[command(version)]
#[command(about = "Chat with a local language model augmented by your documents and Wikipedia")]
#[command(long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides backend.base_url
    #[arg(long, env = "LOCAL_AI_API_URL", value_name = "URL")]
    base_url: Option<String>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,

    /// Manage models
    Models {
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// Manage uploaded documents
    Documents {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// Search Wikipedia through the backend
    Wiki { query: String },

    /// Ask a single question
    Ask {
        question: String,

        #[arg(short, long)]
        model: Option<String>,

        #[arg(long)]
        no_wiki: bool,
    },

    /// Interactive chat; `/quit` to leave
    Chat {
        #[arg(short, long)]
        model: Option<String>,

        #[arg(long)]
        no_wiki: bool,
    },
}

#[derive(Subcommand)]
enum ModelCommands {
    List,
    /// `source` defaults to the name, as for the suggested models
    Download {
        name: String,
        source: Option<String>,
    },
    Load { name: String },
    Delete { name: String },
    /// Show well-known models worth downloading
    Suggest,
}

#[derive(Subcommand)]
enum DocumentCommands {
    List,
    Upload { path: PathBuf },
    Delete { id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
        config.validate().context("Invalid --base-url")?;
    }

    let color = cli.color && config.logging.color;
    local_ai_client::utils::logging::init_logger(color, cli.verbose || config.logging.verbose);

    let session = Session::from_config(&config).context("Failed to create session")?;
    let include_wiki = |no_wiki: bool| config.query.include_wiki && !no_wiki;

    match cli.command {
        Commands::Health => cmd_health(&session).await?,
        Commands::Models { command } => cmd_models(&session, command).await?,
        Commands::Documents { command } => cmd_documents(&session, command).await?,
        Commands::Wiki { query } => cmd_wiki(&session, &query).await?,
        Commands::Ask {
            question,
            model,
            no_wiki,
        } => {
            prepare_model(&session, model.as_deref()).await?;
            cmd_ask(&session, &question, include_wiki(no_wiki), color).await?;
        }
        Commands::Chat { model, no_wiki } => {
            prepare_model(&session, model.as_deref()).await?;
            cmd_chat(&session, include_wiki(no_wiki), color).await?;
        }
    }

    Ok(())
}

async fn cmd_health(session: &Session) -> Result<()> {
    let report = session.health().await;
    print!("{}", report.format());

    if !report.is_healthy() {
        return Err(anyhow::anyhow!("Backend is not healthy"));
    }
    Ok(())
}

async fn cmd_models(session: &Session, command: ModelCommands) -> Result<()> {
    match command {
        ModelCommands::List => {
            let models = session
                .refresh_models()
                .await
                .context("Failed to load models")?;

            if models.is_empty() {
                println!("{}", format_info("No models installed. Try `local-ai models suggest`."));
                return Ok(());
            }

            println!("{}", format_heading(&format!("Models ({})", models.len())));
            for model in &models {
                let progress = model
                    .download_progress
                    .map(|p| format!(" {}%", p))
                    .unwrap_or_default();
                println!(
                    "  {:<24} {} {:>10}  {:?}{}",
                    model.name,
                    format_model_status(model.status),
                    model.size.to_string(),
                    model.model_type,
                    progress
                );
            }
        }
        ModelCommands::Download { name, source } => {
            if let Some(suggested) = find_suggested(&name) {
                info!("Requesting {}", suggested.description);
            }
            let source = source.as_deref().unwrap_or(&name);
            let message = session
                .download_model(&name, source)
                .await
                .with_context(|| format!("Download request for {} failed", name))?;
            println!("{}", format_success(&message));
        }
        ModelCommands::Load { name } => {
            let message = session
                .load_model(&name)
                .await
                .with_context(|| format!("Loading {} failed", name))?;
            println!("{}", format_success(&message));
        }
        ModelCommands::Delete { name } => {
            let message = session
                .remove_model(&name)
                .await
                .with_context(|| format!("Deleting {} failed", name))?;
            println!("{}", format_success(&message));
        }
        ModelCommands::Suggest => {
            println!("{}", format_heading("Suggested models"));
            for model in &SUGGESTED_MODELS {
                println!("  {:<14} {}", model.name, model.description);
            }
        }
    }

    Ok(())
}

async fn cmd_documents(session: &Session, command: DocumentCommands) -> Result<()> {
    match command {
        DocumentCommands::List => {
            let documents = session
                .refresh_documents()
                .await
                .context("Failed to load documents")?;

            println!(
                "{}",
                format_heading(&format!("Uploaded Documents ({})", documents.len()))
            );
            for doc in &documents {
                let chunks = doc
                    .chunks
                    .map(|c| format!("{} chunks", c))
                    .unwrap_or_default();
                println!(
                    "  {:<8} {:<32} {:>10}  {}  {} {}",
                    doc.id,
                    doc.name,
                    format_file_size(doc.size),
                    doc.upload_day(),
                    format_document_status(doc.status),
                    chunks
                );
            }
        }
        DocumentCommands::Upload { path } => {
            let file = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("Cannot upload {}", path.display()))?;
            let reply = session
                .upload_document(&file)
                .await
                .with_context(|| format!("Upload of {} failed", file.name))?;

            match reply.document {
                Some(doc) => println!(
                    "{}",
                    format_success(&format!(
                        "{} uploaded as {} ({})",
                        doc.name,
                        doc.id,
                        doc.status.as_str()
                    ))
                ),
                None => println!("{}", format_success(&reply.message)),
            }
        }
        DocumentCommands::Delete { id } => {
            let message = session
                .remove_document(&id)
                .await
                .with_context(|| format!("Deleting document {} failed", id))?;
            println!("{}", format_success(&message));
        }
    }

    Ok(())
}

async fn cmd_wiki(session: &Session, query: &str) -> Result<()> {
    let results = session.search_wiki(query).await.context("Wiki search failed")?;

    if results.is_empty() {
        println!("{}", format_info(&format!("No Wikipedia results for \"{}\"", query)));
        return Ok(());
    }

    println!("{}", format_heading(&format!("Wikipedia Results ({})", results.len())));
    for result in &results {
        let relevance = result
            .relevance_percent()
            .map(|p| format!(" (Relevance: {})", p))
            .unwrap_or_default();
        println!("  {}{}", result.title, relevance);
        println!("    {}", result.url);
        if let Some(text) = result.extract.as_deref().or(result.description.as_deref()) {
            println!("    {}", Validator::truncate_text(text, 200));
        }
    }

    Ok(())
}

/// Refreshes the registry so a configured default model is reconciled,
/// then applies `--model`.
async fn prepare_model(session: &Session, model: Option<&str>) -> Result<()> {
    if let Err(e) = session.refresh_models().await {
        warn!("Could not refresh models: {}", e);
    }

    if let Some(name) = model {
        session
            .select_model(name)
            .with_context(|| format!("Model {} is not available", name))?;
    }

    match session.selected_model() {
        Some(name) => info!("Using model {}", name),
        None => info!("No model selected; the backend default will answer"),
    }
    Ok(())
}

async fn cmd_ask(session: &Session, question: &str, include_wiki: bool, color: bool) -> Result<()> {
    if Validator::normalize_question(question).is_none() {
        println!("{}", format_warning("Question is empty; nothing to ask"));
        return Ok(());
    }

    let spinner = PendingSpinner::start("Thinking...", color);
    let outcome = session.ask(question, include_wiki).await;
    spinner.finish();

    if let Some(response) = outcome.context("Query failed")? {
        print_answer(&response);
    }
    Ok(())
}

async fn cmd_chat(session: &Session, include_wiki: bool, color: bool) -> Result<()> {
    println!(
        "{}",
        format_info(&format!(
            "Chatting with {} (wiki search {}). Type /quit to exit.",
            session.selected_model().unwrap_or_else(|| "the default model".to_string()),
            if include_wiki { "on" } else { "off" }
        ))
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == "/quit" || line == "/exit" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let spinner = PendingSpinner::start("Thinking...", color);
        let outcome = session.ask(line, include_wiki).await;
        spinner.finish();

        match outcome {
            Ok(Some(response)) => print_answer(&response),
            Ok(None) => {}
            Err(AppError::QueryInFlight) => println!(
                "{}",
                format_warning("Still waiting for the previous answer")
            ),
            Err(e) => println!("{}", format_error(&e.to_string())),
        }
    }

    info!("Chat ended after {} messages", session.transcript().len());
    Ok(())
}

fn print_answer(response: &QueryResponse) {
    println!("\n{}\n", response.response);

    let sources = response.attributed_sources();
    if sources.is_empty() {
        return;
    }

    println!("{}", format_heading(&format!("Sources ({})", sources.len())));
    for (idx, source) in sources.iter().enumerate() {
        let score = source
            .relevance_score
            .map(|s| format!(" - {}", local_ai_client::utils::format_relevance(s)))
            .unwrap_or_default();
        let location = source
            .url
            .as_deref()
            .or(source.document_id.as_deref())
            .unwrap_or_default();
        println!("  {}. [{:?}] {}{} {}", idx + 1, source.kind, source.title, score, location);
    }
    println!();
}
