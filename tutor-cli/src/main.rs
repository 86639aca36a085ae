//! Command-line study companion.
//!
//! Ingests documents into a session index, then answers questions, runs
//! quizzes, or generates learning roadmaps against it. Expects `GROQ_API_KEY`
//! and `HF_TOKEN` in the environment (a `.env` file is loaded if present).

mod extract;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use tutor_core::Llm;
use tutor_graph::QaGraph;
use tutor_model::GroqClient;
use tutor_rag::{
    Document, HuggingFaceEmbeddingProvider, RagConfig, RagPipeline, RecursiveChunker,
    SessionContext,
};
use tutor_study::{
    OPTION_LABELS, QuizGenerator, QuizSet, RoadmapGenerator, UserSubmission, score,
};

#[derive(Parser)]
#[command(
    name = "tutor",
    about = "AI study companion: ask questions, take quizzes, and plan learning from your own documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest documents and answer a question grounded in them
    Ask {
        /// The question to answer
        question: String,
        /// Document files to ingest (PDF or plain text)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        tuning: Tuning,
        /// Write the answer to this markdown file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Ingest documents and take a multiple-choice quiz on a topic
    Quiz {
        /// The topic to be quizzed on
        topic: String,
        /// Document files to ingest (PDF or plain text)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Number of questions to generate
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Generate a learning roadmap for a domain
    Roadmap {
        /// Domain of interest, e.g. "Data Science"
        domain: String,
        /// Write the roadmap to this markdown file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// The externally tunable retrieval parameters.
#[derive(Args)]
struct Tuning {
    /// Maximum chunk size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value_t = 300)]
    chunk_overlap: usize,
    /// Number of chunks to retrieve per query
    #[arg(long, default_value_t = 4)]
    top_k: usize,
}

impl Tuning {
    fn to_config(&self) -> anyhow::Result<RagConfig> {
        let config = RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .build()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Ask { question, files, tuning, output } => {
            ask(&question, &files, &tuning, output.as_deref()).await
        }
        Command::Quiz { topic, files, count, tuning } => {
            quiz(&topic, &files, count, &tuning).await
        }
        Command::Roadmap { domain, output } => roadmap(&domain, output.as_deref()).await,
    }
}

/// Extract, chunk, embed, and index the given files into a fresh session.
async fn ingest_files(files: &[PathBuf], config: RagConfig) -> anyhow::Result<Arc<RagPipeline>> {
    let embedder = Arc::new(HuggingFaceEmbeddingProvider::from_env()?);
    let chunker = Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap));
    let pipeline = Arc::new(
        RagPipeline::builder()
            .config(config)
            .embedding_provider(embedder)
            .chunker(chunker)
            .session(Arc::new(SessionContext::new()))
            .build()?,
    );

    let documents: Vec<Document> = files
        .iter()
        .map(|path| -> anyhow::Result<Document> {
            let text = extract::extract_text(path)?;
            Ok(Document::new(extract::document_id(path), text))
        })
        .collect::<anyhow::Result<_>>()?;

    let chunk_count = pipeline.ingest(&documents).await?;
    println!("Processed {} file(s) into {chunk_count} chunk(s)", files.len());
    Ok(pipeline)
}

async fn ask(
    question: &str,
    files: &[PathBuf],
    tuning: &Tuning,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let pipeline = ingest_files(files, tuning.to_config()?).await?;
    let llm: Arc<dyn Llm> = Arc::new(GroqClient::from_env()?);

    let graph = QaGraph::new(llm, pipeline);
    let state = graph.run(question).await?;
    let answer = state.answer().unwrap_or("I don't know.");

    println!("\n{answer}");

    if let Some(path) = output {
        let markdown = format!("# {question}\n\n{answer}\n");
        std::fs::write(path, markdown)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nSaved answer to {}", path.display());
    }
    Ok(())
}

async fn quiz(topic: &str, files: &[PathBuf], count: usize, tuning: &Tuning) -> anyhow::Result<()> {
    let pipeline = ingest_files(files, tuning.to_config()?).await?;
    let llm: Arc<dyn Llm> = Arc::new(GroqClient::from_env()?);

    // Quiz retrieval keeps raw nearest-neighbor order; diversity matters
    // less when a single topic is being drilled.
    let context = pipeline.retrieve(topic, false).await?;
    let quiz = QuizGenerator::new(llm).generate(topic, &context, count).await?;

    let submission = prompt_for_answers(&quiz)?;
    let result = score(&quiz, &submission);

    println!("\nYour score: {:.1}% ({}/{} correct)", result.percent(), result.correct, result.total);
    println!("\nCorrect answers:");
    for (i, question) in quiz.questions.iter().enumerate() {
        let label = &question.correct_answer;
        let text = question.options.get(label).map(String::as_str).unwrap_or("?");
        println!("  {}. {label}) {text}", i + 1);
    }
    Ok(())
}

/// Present each question and collect the user's selected labels.
///
/// An empty or unrecognized line leaves the question unanswered; it still
/// counts against the score.
fn prompt_for_answers(quiz: &QuizSet) -> anyhow::Result<UserSubmission> {
    let mut editor = rustyline::DefaultEditor::new()?;
    let mut submission = UserSubmission::new();

    for (i, question) in quiz.questions.iter().enumerate() {
        println!("\nQuestion {}: {}", i + 1, question.question);
        for label in OPTION_LABELS {
            let text = question.options.get(label).map(String::as_str).unwrap_or("?");
            println!("  {label}) {text}");
        }

        let line = editor.readline("Your answer (a/b/c/d, empty to skip): ")?;
        let answer = line.trim().to_lowercase();
        if OPTION_LABELS.contains(&answer.as_str()) {
            submission.insert(i, answer);
        }
    }

    Ok(submission)
}

async fn roadmap(domain: &str, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let llm: Arc<dyn Llm> = Arc::new(GroqClient::from_env()?);
    let markdown = RoadmapGenerator::new(llm).generate(domain).await?;

    println!("\n{markdown}");

    if let Some(path) = output {
        std::fs::write(path, &markdown)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nSaved roadmap to {}", path.display());
    }
    Ok(())
}
