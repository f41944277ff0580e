use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Dataset, UserId};
use encoder::{MiniLmEncoder, SentenceEncoder};
use pipeline::{Evaluator, RecContext, Recommendation, Recommender};
use std::path::PathBuf;
use std::time::Instant;

/// SemaRecs - Content-based movie recommender over sentence embeddings
#[derive(Parser)]
#[command(name = "sema-recs")]
#[command(about = "Movie recommendations by embedding proximity", long_about = None)]
struct Cli {
    /// Path to the data directory (movies.dat, user_last_genres.csv, ratings.dat)
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Path to the movie embedding artifact (reused when present)
    #[arg(long, default_value = "movie_embeddings.bin")]
    embeddings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the movie catalog and save the embedding artifact
    Encode,

    /// Evaluate Precision@k / Recall@k against the held-out ratings
    Evaluate {
        /// k values to evaluate, each as an independent pass
        #[arg(long, value_delimiter = ',', default_values_t = vec![5usize, 10])]
        k: Vec<usize>,

        /// Minimum rating for a held-out movie to count as relevant
        #[arg(long, default_value_t = 0.0)]
        relevance_threshold: f32,
    },

    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value_t = pipeline::DEFAULT_TOP_K)]
        top_k: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load the three input tables (fails fast if any file is missing)
    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let dataset = Dataset::load_from_dir(&cli.data_dir).context("Failed to load dataset")?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Encode => handle_encode(dataset, &cli.embeddings)?,
        Commands::Evaluate {
            k,
            relevance_threshold,
        } => handle_evaluate(dataset, &cli.embeddings, &k, relevance_threshold)?,
        Commands::Recommend { user_id, top_k } => {
            handle_recommend(dataset, &cli.embeddings, user_id, top_k)?
        }
    }

    Ok(())
}

/// Handle the 'encode' command
fn handle_encode(dataset: Dataset, artifact: &PathBuf) -> Result<()> {
    let model = load_model()?;

    let start = Instant::now();
    let embeddings = encoder::encode_catalog(&model, &dataset.catalog)
        .context("Failed to encode movie catalog")?;
    println!(
        "{} Encoded {} movies ({}-d) in {:?}",
        "✓".green(),
        embeddings.len(),
        embeddings.dimension(),
        start.elapsed()
    );

    embeddings
        .save(artifact)
        .with_context(|| format!("Failed to save artifact {}", artifact.display()))?;
    println!("{} Saved embeddings to {}", "✓".green(), artifact.display());
    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(
    dataset: Dataset,
    artifact: &PathBuf,
    k_values: &[usize],
    relevance_threshold: f32,
) -> Result<()> {
    let model = load_model()?;
    let context = RecContext::build(dataset, &model, Some(artifact.as_path()))?;
    let evaluator = Evaluator::new(&context, relevance_threshold);

    println!(
        "{}",
        format!(
            "Evaluation (relevance threshold {:.1}):",
            relevance_threshold
        )
        .bold()
        .blue()
    );
    for &k in k_values {
        let metrics = evaluator.evaluate_at(k)?;
        println!("Precision@{}: {:.4}", k, metrics.precision);
        println!("Recall@{}: {:.4}", k, metrics.recall);
    }
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    dataset: Dataset,
    artifact: &PathBuf,
    user_id: UserId,
    top_k: usize,
) -> Result<()> {
    let model = load_model()?;
    let context = RecContext::build(dataset, &model, Some(artifact.as_path()))?;
    let recommender = Recommender::new(&context);

    match recommender.recommend(user_id, top_k)? {
        Some(rows) => print_recommendations(user_id, top_k, &rows),
        None => println!(
            "{}",
            format!("User ID {} not found in user embeddings.", user_id).yellow()
        ),
    }
    Ok(())
}

/// Load the pretrained sentence encoder (downloads the model on first run)
fn load_model() -> Result<MiniLmEncoder> {
    let start = Instant::now();
    let model = MiniLmEncoder::new().context("Failed to load the sentence encoder")?;
    println!(
        "{} Loaded encoder '{}' ({}-d) in {:?}",
        "✓".green(),
        encoder::MODEL_NAME,
        model.dimension(),
        start.elapsed()
    );
    Ok(model)
}

/// Helper function to format and print the recommendation table
fn print_recommendations(user_id: UserId, top_k: usize, rows: &[Recommendation]) {
    println!(
        "{}",
        format!("Top {} recommended movies for user {}:", top_k, user_id)
            .bold()
            .blue()
    );
    for row in rows {
        println!(
            "{}. [{}] {} ({}) - Score: {:.4}",
            row.rank.to_string().green(),
            row.movie_id,
            row.title,
            row.genres,
            row.score
        );
    }
}
