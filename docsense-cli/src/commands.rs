//! Subcommand execution.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use docsense_extract::{FileExtractor, collect_files, load_batch};
use docsense_rag::{
    ChatHistory, EmbeddingProvider, Granularity, IngestReport, SearchConfig, SearchPipeline,
    Session,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use crate::cli::{Cli, Command, OutputFormat};
use crate::embedder::build_provider;

const PROMPT: &str = "docsense> ";

/// Run the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let provider = build_provider(&cli.embedder).await?;

    match cli.command {
        Command::Ask { input, query, threshold } => {
            let config = search_config(Granularity::Fragment, None, threshold)?;
            let (pipeline, mut session) = prepare(provider, config, &input.paths).await?;
            let answer = pipeline.ask(&mut session, &query).await?;
            println!("{answer}");
        }
        Command::Search { input, query, top_k, format } => {
            let config = search_config(Granularity::Document, top_k, None)?;
            let (pipeline, mut session) = prepare(provider, config, &input.paths).await?;
            let answer = pipeline.ask(&mut session, &query).await?;
            match format {
                OutputFormat::Text => println!("{answer}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&answer)?),
            }
        }
        Command::Chat { input, mode, top_k } => {
            let config = search_config(mode.into(), top_k, None)?;
            let (pipeline, mut session) = prepare(provider, config, &input.paths).await?;
            chat(&pipeline, &mut session).await?;
        }
    }
    Ok(())
}

/// Build the search configuration for one command.
pub fn search_config(
    granularity: Granularity,
    top_k: Option<usize>,
    threshold: Option<f32>,
) -> Result<SearchConfig> {
    let mut builder = SearchConfig::builder().granularity(granularity);
    if let Some(k) = top_k {
        builder = builder.top_k(k);
    }
    if let Some(threshold) = threshold {
        builder = builder.similarity_threshold(threshold);
    }
    Ok(builder.build()?)
}

async fn prepare(
    provider: Arc<dyn EmbeddingProvider>,
    config: SearchConfig,
    paths: &[PathBuf],
) -> Result<(SearchPipeline, Session)> {
    let pipeline = SearchPipeline::builder()
        .config(config)
        .embedding_provider(provider)
        .extractor(Arc::new(FileExtractor::default()))
        .build()?;

    let files = collect_files(paths).context("failed to collect input files")?;
    let batch = load_batch(&files).await.context("failed to load input files")?;

    let mut session = Session::new();
    let report = pipeline.ingest(&mut session, &batch).await.context("failed to index documents")?;
    eprintln!("{}", ingest_summary(&report));
    info!(files = files.len(), "ready");
    Ok((pipeline, session))
}

/// One-line description of an ingestion for the terminal.
pub fn ingest_summary(report: &IngestReport) -> String {
    let mut summary =
        format!("Indexed {} unit(s) from {} document(s)", report.fragments, report.documents);
    if !report.skipped.is_empty() {
        summary.push_str(&format!(", skipped {}", report.skipped.len()));
    }
    summary
}

async fn chat(pipeline: &SearchPipeline, session: &mut Session) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Ask a question, `:history` to review, `:quit` to exit.");

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        match line.trim() {
            ":quit" | ":q" | ":exit" => break,
            ":history" => {
                print!("{}", render_history(session.history()));
                continue;
            }
            _ => {}
        }

        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str())?;
        }
        match pipeline.ask(session, &line).await {
            Ok(answer) => println!("{answer}\n"),
            Err(e) => eprintln!("error: {e}\n"),
        }
        std::io::stdout().flush()?;
    }
    Ok(())
}

/// Render the chat log, oldest first.
pub fn render_history(history: &ChatHistory) -> String {
    if history.is_empty() {
        return "No questions asked yet.\n".to_string();
    }
    history
        .iter()
        .map(|interaction| {
            format!(
                "[{}] You: {}\n{}\n\n",
                interaction.asked_at.format("%H:%M:%S"),
                interaction.query,
                interaction.answer
            )
        })
        .collect()
}
