use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use protolda::config::{load_prototypes, Config};
use protolda::{Corpus, PrototypeTopics, ProtoLda};

/// protolda: semi-supervised topic modeling with prototype topics.
///
/// Mixes ordinary LDA topics with topics seeded by exemplar words, learned
/// with collapsed Gibbs sampling.
#[derive(Parser)]
#[command(name = "protolda", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a corpus and write its topic distributions
    Train {
        #[command(flatten)]
        model: ModelArgs,

        /// Where to write the per-document topic distributions
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Number of top words to show per topic (0 to skip the summary)
        #[arg(long, default_value = "10")]
        top_words: usize,

        /// Print topic summaries as JSON instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Train on a corpus, then infer topic distributions for unseen documents
    Infer {
        #[command(flatten)]
        model: ModelArgs,

        /// Corpus of unseen documents (same four-column format)
        #[arg(long)]
        unseen: PathBuf,

        /// Gibbs sweeps over the unseen documents
        #[arg(long)]
        infer_iterations: Option<usize>,

        /// Where to write the unseen documents' topic distributions
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Options shared by every command that builds a model.
#[derive(Args)]
struct ModelArgs {
    /// Training corpus: source \t types \t labels \t tokens
    #[arg(long)]
    corpus: PathBuf,

    /// JSON file mapping prototype topic names to seed words
    #[arg(long)]
    prototypes: Option<PathBuf>,

    /// Number of regular (unsupervised) topics
    #[arg(long)]
    topics: Option<usize>,

    /// Document-topic smoothing
    #[arg(long)]
    alpha: Option<f64>,

    /// Topic-word smoothing
    #[arg(long)]
    beta: Option<f64>,

    /// Prior boost for a prototype topic's seed words
    #[arg(long)]
    gamma: Option<f64>,

    /// Gibbs sweeps over the training corpus
    #[arg(long)]
    iterations: Option<usize>,

    /// Smoothing added to topic counts in the written distributions
    #[arg(long)]
    smooth: Option<f64>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

impl ModelArgs {
    /// Apply command-line overrides on top of the environment config.
    fn apply(&self, config: &mut Config) {
        if let Some(topics) = self.topics {
            config.topics = topics;
        }
        if let Some(alpha) = self.alpha {
            config.hyper.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            config.hyper.beta = beta;
        }
        if let Some(gamma) = self.gamma {
            config.hyper.gamma = gamma;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(smooth) = self.smooth {
            config.smooth = smooth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("protolda=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            model,
            output,
            top_words,
            json,
        } => {
            let mut config = Config::load()?;
            model.apply(&mut config);
            let (corpus, lda) = build_and_train(&model, &config)?;

            if top_words > 0 {
                let summaries = lda.topic_summaries(corpus.words(), top_words);
                if json {
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                } else {
                    protolda::output::terminal::display_topics(&summaries);
                }
            }

            if let Some(path) = output {
                lda.write_distributions_to_path(&path, &corpus, config.smooth)?;
                println!("Topic distributions written to {}", path.display());
            }
        }

        Commands::Infer {
            model,
            unseen,
            infer_iterations,
            output,
        } => {
            let mut config = Config::load()?;
            model.apply(&mut config);
            if let Some(n) = infer_iterations {
                config.infer_iterations = n;
            }
            let (corpus, mut lda) = build_and_train(&model, &config)?;

            let mut unseen_corpus = Corpus::with_vocabulary(corpus.into_vocabulary());
            unseen_corpus.read_file(&unseen)?;
            let unknown = count_unknown_tokens(&unseen_corpus, &lda);
            if unknown > 0 {
                println!(
                    "{} {} tokens in {} are not in the trained vocabulary and will be skipped",
                    "Note:".yellow(),
                    unknown,
                    unseen.display()
                );
            }

            println!(
                "Inferring topics for {} unseen documents ({} iterations)...",
                unseen_corpus.len(),
                config.infer_iterations
            );
            lda.infer(config.infer_iterations, &mut unseen_corpus)?;

            match output {
                Some(path) => {
                    lda.write_distributions_to_path(&path, &unseen_corpus, config.smooth)?;
                    println!("Topic distributions written to {}", path.display());
                }
                None => {
                    lda.write_distributions(std::io::stdout().lock(), &unseen_corpus, config.smooth)?;
                }
            }
        }
    }

    Ok(())
}

/// Load the training corpus and prototypes, build the model and train it.
fn build_and_train(args: &ModelArgs, config: &Config) -> Result<(Corpus, ProtoLda)> {
    let prototypes = match &args.prototypes {
        Some(path) => load_prototypes(path)?,
        None => PrototypeTopics::new(),
    };
    config.validate(&prototypes)?;

    let mut corpus = load_corpus(&args.corpus)?;
    let mut lda = ProtoLda::new(
        config.topics,
        config.hyper,
        &mut corpus,
        &prototypes,
        config.seed,
    )?;

    println!(
        "Training on {} documents: {} regular + {} prototype topics, {} iterations...",
        corpus.len(),
        config.topics,
        prototypes.len(),
        config.iterations
    );
    lda.train(config.iterations, &mut corpus)?;
    println!("{}", "Training complete.".bold());

    Ok((corpus, lda))
}

fn load_corpus(path: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    corpus.read_file(path)?;
    if corpus.is_empty() {
        anyhow::bail!("Corpus {} contains no documents", path.display());
    }
    info!(
        documents = corpus.len(),
        words = corpus.num_words(),
        labels = corpus.num_labels(),
        types = corpus.num_types(),
        "Training corpus ready"
    );
    Ok(corpus)
}

fn count_unknown_tokens(corpus: &Corpus, lda: &ProtoLda) -> usize {
    let space = lda.topic_space();
    corpus
        .iter()
        .flat_map(|doc| doc.tokens().iter())
        .filter(|&&word| !space.in_vocabulary(word))
        .count()
}
