//! @ai:module:intent CLI for scientific answer equivalence checking
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sci_equiv::{
    answer::{normalize, normalize_fully, Answer, AnswerCategory, AnswerContext},
    comparison::Dispatcher,
    config::{EvalConfig, FilterConfig},
    corpus::{CorpusLoader, CorpusLoaderTrait},
    evaluator::Evaluator,
    judge::{HttpJudge, MockJudge, SemanticJudge},
    metrics::{EvaluationResults, MetricsAggregator, MetricsAggregatorTrait},
    report::ReportGenerator,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_CONFIG_FILE: &str = "sci-equiv.toml";

#[derive(Parser)]
#[command(name = "sci-equiv")]
#[command(about = "Decide whether free-form scientific answers are equivalent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one candidate answer against a reference
    Compare {
        /// Candidate answer as produced by the model
        candidate: String,

        /// Reference answer
        reference: String,

        /// Declared category for both answers (number, physical_quantity, option, ...)
        #[arg(long)]
        category: Option<AnswerCategory>,

        /// Unit of the candidate value
        #[arg(long)]
        candidate_unit: Option<String>,

        /// Unit of the reference value
        #[arg(long)]
        reference_unit: Option<String>,

        /// Treat both answers as multiple-choice selections
        #[arg(long)]
        multiple_choice: bool,

        /// Use a judge that always answers FALSE instead of calling an API
        #[arg(long)]
        offline: bool,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the normalized form and category of a raw answer
    Classify {
        /// Raw answer text
        value: String,

        /// Strip every nested wrapper instead of one layer
        #[arg(long)]
        fully: bool,
    },

    /// Evaluate every pair in the corpus and write reports
    Evaluate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Corpus directory (overrides configuration)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Filter by reference categories (comma-separated)
        #[arg(long)]
        categories: Option<String>,

        /// Filter by pair IDs (comma-separated)
        #[arg(long)]
        pairs: Option<String>,

        /// Maximum comparisons in flight
        #[arg(long)]
        concurrency: Option<usize>,

        /// Run without making API calls
        #[arg(long)]
        dry_run: bool,

        /// Output directory for results (overrides configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate corpus for errors
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Corpus directory (overrides configuration)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sci_equiv=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            candidate,
            reference,
            category,
            candidate_unit,
            reference_unit,
            multiple_choice,
            offline,
            config,
        } => {
            compare(CompareArgs {
                candidate,
                reference,
                category,
                candidate_unit,
                reference_unit,
                multiple_choice,
                offline,
                config,
            })
            .await
        }
        Commands::Classify { value, fully } => classify(&value, fully),
        Commands::Evaluate {
            config,
            corpus,
            categories,
            pairs,
            concurrency,
            dry_run,
            output,
        } => {
            evaluate(EvaluateArgs {
                config,
                corpus,
                categories,
                pairs,
                concurrency,
                dry_run,
                output,
            })
            .await
        }
        Commands::Validate { config, corpus } => validate(config, corpus),
        Commands::Init { output } => init_config(output),
    }
}

struct CompareArgs {
    candidate: String,
    reference: String,
    category: Option<AnswerCategory>,
    candidate_unit: Option<String>,
    reference_unit: Option<String>,
    multiple_choice: bool,
    offline: bool,
    config: Option<PathBuf>,
}

struct EvaluateArgs {
    config: Option<PathBuf>,
    corpus: Option<PathBuf>,
    categories: Option<String>,
    pairs: Option<String>,
    concurrency: Option<usize>,
    dry_run: bool,
    output: Option<PathBuf>,
}

/// @ai:intent Compare a single pair and print verdict plus explanation
/// @ai:effects network
async fn compare(args: CompareArgs) -> Result<()> {
    let config = load_or_default_config(args.config)?;
    let judge = build_judge(&config, args.offline)?;
    let dispatcher = Dispatcher::new(judge);

    let context = |unit: Option<String>| AnswerContext {
        unit,
        multiple_choice: args.multiple_choice,
        category: args.category,
    };
    let candidate = Answer::from_context(&args.candidate, &context(args.candidate_unit.clone()));
    let reference = Answer::from_context(&args.reference, &context(args.reference_unit.clone()));

    println!("Candidate: {} [{}]", candidate, candidate.category);
    println!("Reference: {} [{}]", reference, reference.category);

    let result = dispatcher.compare(&candidate, &reference).await?;

    println!();
    println!("{}", if result.is_equal { "EQUAL" } else { "NOT EQUAL" });
    println!("{}", result.explain());

    Ok(())
}

/// @ai:intent Print normalized form and category of a raw value
/// @ai:effects io
fn classify(value: &str, fully: bool) -> Result<()> {
    let normalized = if fully {
        normalize_fully(value)
    } else {
        normalize(value)
    };
    let answer = Answer::from_raw(&normalized);

    println!("Normalized: {}", normalized);
    println!("Category:   {}", answer.category);
    Ok(())
}

/// @ai:intent Run the corpus through the evaluator and write reports
/// @ai:effects network, fs:write
async fn evaluate(args: EvaluateArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(corpus) = args.corpus {
        config.paths.corpus_dir = corpus;
    }
    if let Some(output) = args.output {
        config.paths.results_dir = output;
    }
    if let Some(concurrency) = args.concurrency {
        config.run.concurrency = concurrency;
    }
    config.run.dry_run |= args.dry_run;
    if args.categories.is_some() || args.pairs.is_some() {
        config.run.filter = build_filter(args.categories, args.pairs)?;
    }

    tracing::info!("Loading corpus from {}", config.paths.corpus_dir.display());

    let loader = CorpusLoader::new();
    let pairs = loader.load_filtered(&config.paths.corpus_dir, &config.run.filter)?;

    if pairs.is_empty() {
        tracing::warn!("No answer pairs match the filter criteria");
        return Ok(());
    }

    tracing::info!("Found {} pairs to evaluate", pairs.len());

    if config.run.dry_run {
        tracing::info!("Running in dry-run mode");
    }
    let judge = build_judge(&config, config.run.dry_run)?;
    let judge_model = judge.model().to_string();

    let evaluator = Evaluator::new(Dispatcher::new(judge), config.run.concurrency);
    let outcomes = evaluator.evaluate_all(pairs).await;

    let results = MetricsAggregator::new().aggregate(outcomes, &judge_model);

    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = config.paths.results_dir.join(timestamp.to_string());
    ReportGenerator::new().generate_all(&results, &output_dir)?;

    print_summary(&results);
    Ok(())
}

/// @ai:intent Load the corpus and list its pairs
/// @ai:effects fs:read
fn validate(config: Option<PathBuf>, corpus: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config)?;
    let corpus_dir = corpus.unwrap_or(config.paths.corpus_dir);

    let pairs = CorpusLoader::new().load_all(&corpus_dir)?;

    println!("Corpus validation passed!");
    println!("Total pairs: {}", pairs.len());

    for pair in &pairs {
        let candidate = pair.candidate_answer();
        let reference = pair.reference_answer();
        let invalid = [&candidate, &reference]
            .iter()
            .filter_map(|answer| answer.validate().err())
            .map(|e| e.to_string())
            .collect::<Vec<_>>();

        println!(
            "  - {} ({} vs {}){}",
            pair.id,
            candidate.category,
            reference.category,
            if invalid.is_empty() {
                String::new()
            } else {
                format!(" WARNING: {}", invalid.join("; "))
            }
        );
    }

    Ok(())
}

/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = EvalConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Judge used for a run: HTTP unless offline
/// @ai:effects env
fn build_judge(config: &EvalConfig, offline: bool) -> Result<Arc<dyn SemanticJudge>> {
    if offline {
        return Ok(Arc::new(MockJudge::new("FALSE")));
    }

    let judge = HttpJudge::new(config.judge.clone()).with_context(|| {
        format!(
            "Cannot create {} judge; set {} or use --offline/--dry-run",
            config.judge.provider.as_str(),
            config.judge.api_key_env()
        )
    })?;
    Ok(Arc::new(judge))
}

/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<EvalConfig> {
    match path {
        Some(p) => EvalConfig::load(&p),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                EvalConfig::load(&default_path)
            } else {
                Ok(EvalConfig::default())
            }
        }
    }
}

fn build_filter(categories: Option<String>, pairs: Option<String>) -> Result<FilterConfig> {
    let categories = categories
        .map(|s| {
            s.split(',')
                .map(|c| c.parse::<AnswerCategory>().map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    Ok(FilterConfig {
        categories,
        pair_ids: pairs.map(|s| s.split(',').map(|p| p.trim().to_string()).collect()),
    })
}

fn print_summary(results: &EvaluationResults) {
    let overall = &results.overall;

    println!();
    println!("Answer Equivalence Results");
    println!("==========================");
    println!();
    println!("Judge model: {}", results.judge_model);
    println!();
    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>10}",
        "Category", "Pairs", "Equal", "Failed", "Accuracy"
    );
    println!("{}", "-".repeat(58));

    for entry in &results.by_category {
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>9.1}%",
            entry.category.as_str(),
            entry.stats.total,
            entry.stats.equal,
            entry.stats.failed,
            entry.stats.accuracy
        );
    }

    println!("{}", "-".repeat(58));
    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>9.1}%",
        "overall", overall.total, overall.equal, overall.failed, overall.accuracy
    );
    println!();

    let failures: Vec<_> = results.failures().collect();
    if !failures.is_empty() {
        println!("Failures:");
        for outcome in failures {
            println!(
                "  {}: {}",
                outcome.pair_id,
                outcome.error.as_deref().unwrap_or_default()
            );
        }
        println!();
    }
}
