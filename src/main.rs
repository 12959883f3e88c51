use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, instrument, warn};
use tracing_subscriber::fmt::format::FmtSpan;

use polarity_io::{
    CorpusReader, CurveRow, DatasetLayout, ExperimentName, ModelReport, ResultWriter, RunConfig,
    VocabularyReader, retain_present,
};
use polarity_tree::{
    Classifier, ClassifierEvaluation, CutoffSweep, DEFAULT_CUTOFF, DEFAULT_TREE_COUNT, Example,
    Id3Config, MetricsReport, RandomForestConfig, RankedAttribute, TreeCountSweep,
};

/// Attribute counts above this make single trees erratic.
const ATTRIBUTE_WARNING_THRESHOLD: usize = 200;

#[derive(Parser)]
#[command(name = "polarity")]
#[command(about = "ID3 and Random Forest sentiment classification over bag-of-words reviews")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility (overrides the config file; default 42)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Log the wall-clock time of every instrumented step when it finishes
    #[arg(long, global = true)]
    timings: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Dataset location, run sizes, and output naming shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Dataset root containing `train/`, `test/`, and `imdb.vocab`
    #[arg(long)]
    data: PathBuf,

    /// JSON run configuration; individual flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Documents to load per corpus, split evenly between categories [100, 250000]
    #[arg(long)]
    example_count: Option<usize>,

    /// Leading vocabulary lines (stop words) to skip [0, 90000]
    #[arg(long)]
    ignored_attributes: Option<usize>,

    /// Vocabulary lines to use as attributes [5, 90000]
    #[arg(long)]
    attribute_count: Option<usize>,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Train ID3 and Random Forest on train/, evaluate both on train/ and test/
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        /// ID3 early-stop cutoff in (0, 1]
        #[arg(long)]
        cutoff: Option<f64>,

        /// Number of trees in the Random Forest
        #[arg(long)]
        n_trees: Option<usize>,

        /// Number of top-ranked attributes to report
        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Sweep the ID3 cutoff, scoring on the first half of train/
    TuneCutoff {
        #[command(flatten)]
        data: DataArgs,

        /// Cutoffs to try (defaults to 0.70, 0.71, ..., 0.99)
        #[arg(long, value_delimiter = ',')]
        cutoffs: Option<Vec<f64>>,
    },

    /// Sweep the Random Forest size, scoring on the first half of train/
    TuneTrees {
        #[command(flatten)]
        data: DataArgs,

        /// ID3 early-stop cutoff used by every tree
        #[arg(long)]
        cutoff: Option<f64>,

        /// Tree counts to try (defaults to 70, 75, ..., 200)
        #[arg(long, value_delimiter = ',')]
        counts: Option<Vec<usize>>,
    },

    /// Record train/test metrics of both classifiers over growing corpus sizes
    Curve {
        #[command(flatten)]
        data: DataArgs,

        /// ID3 early-stop cutoff in (0, 1]
        #[arg(long)]
        cutoff: Option<f64>,

        /// Number of trees in the Random Forest
        #[arg(long)]
        n_trees: Option<usize>,

        /// Corpus sizes to try (defaults to 250, 500, 1000, 2000, ..., 10000)
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: String,
    n_train: usize,
    n_test: usize,
    n_attributes: usize,
    cutoff: f64,
    n_trees: usize,
    id3_nodes: usize,
    id3_leaves: usize,
    id3_depth: usize,
    id3_test_accuracy: f64,
    forest_test_accuracy: f64,
}

#[derive(Serialize)]
struct SweepOutput<T> {
    experiment: String,
    kind: &'static str,
    n_train: usize,
    n_held_out: usize,
    best_value: T,
    best_accuracy: f64,
}

#[derive(Serialize)]
struct CurveOutput {
    experiment: String,
    sizes: Vec<usize>,
    n_rows: usize,
}

/// Training corpus, optional test corpus, and the attributes present in training.
struct LoadedData {
    train: Vec<Example>,
    test: Vec<Example>,
    attributes: Vec<String>,
}

/// Merge the optional config file with command-line overrides and validate the result.
fn resolve_run_config(args: &DataArgs, fallback_example_count: Option<usize>) -> Result<RunConfig> {
    let file = args
        .config
        .as_deref()
        .map(RunConfig::load)
        .transpose()
        .context("failed to load run config")?;

    let pick = |flag: Option<usize>, from_file: Option<usize>, name: &str| -> Result<usize> {
        flag.or(from_file)
            .with_context(|| format!("--{name} is required when no --config provides it"))
    };

    let run = RunConfig {
        example_count: pick(
            args.example_count,
            file.as_ref().map(|f| f.example_count).or(fallback_example_count),
            "example-count",
        )?,
        ignored_attributes: pick(
            args.ignored_attributes,
            file.as_ref().map(|f| f.ignored_attributes),
            "ignored-attributes",
        )?,
        attribute_count: pick(
            args.attribute_count,
            file.as_ref().map(|f| f.attribute_count),
            "attribute-count",
        )?,
        cutoff: file.as_ref().and_then(|f| f.cutoff),
        tree_count: file.as_ref().and_then(|f| f.tree_count),
        seed: file.as_ref().and_then(|f| f.seed),
    };
    run.validate()?;
    Ok(run)
}

fn load_vocabulary(layout: &DatasetLayout, run: &RunConfig) -> Result<Vec<String>> {
    VocabularyReader::new(&layout.vocabulary_path())
        .with_ignored(run.ignored_attributes)
        .with_count(run.attribute_count)
        .read()
        .context("failed to read vocabulary")
}

#[instrument(skip_all, fields(example_count = example_count, with_test = with_test))]
fn load_data(
    layout: &DatasetLayout,
    vocabulary: &[String],
    example_count: usize,
    with_test: bool,
) -> Result<LoadedData> {
    let train = CorpusReader::new(&layout.train_dir())
        .with_limit(example_count)
        .read()
        .context("failed to read training corpus")?;
    let test = if with_test {
        CorpusReader::new(&layout.test_dir())
            .with_limit(example_count)
            .read()
            .context("failed to read test corpus")?
    } else {
        Vec::new()
    };
    let attributes = retain_present(vocabulary.to_vec(), &train);
    info!(
        n_train = train.len(),
        n_test = test.len(),
        n_attributes = attributes.len(),
        "data loaded"
    );
    Ok(LoadedData {
        train,
        test,
        attributes,
    })
}

/// Classify copies of `examples` and summarize the outcome.
fn score<C: Classifier>(model: &C, examples: &[Example]) -> Result<MetricsReport> {
    let mut scored: Vec<Example> = examples.iter().map(Example::copy_of).collect();
    model
        .classify_bulk(&mut scored)
        .context("classification failed")?;
    Ok(ClassifierEvaluation::from_examples(&scored)?.report())
}

/// Train both classifiers and score them on the training and test corpora.
#[instrument(skip_all, fields(n_train = data.train.len(), n_trees = n_trees))]
fn train_and_score(
    data: &LoadedData,
    cutoff: f64,
    n_trees: usize,
    seed: u64,
) -> Result<(Id3Stats, Vec<ModelReport<'static>>, Vec<RankedAttribute>)> {
    let tree = Id3Config::new()
        .with_cutoff(cutoff)
        .fit(&data.train, &data.attributes)
        .context("ID3 training failed")?;
    let forest = RandomForestConfig::new(n_trees)?
        .with_cutoff(cutoff)
        .with_seed(seed)
        .fit(&data.train, &data.attributes)
        .context("random forest training failed")?;

    let models = vec![
        ModelReport {
            model: "id3",
            train: score(&tree, &data.train)?,
            test: score(&tree, &data.test)?,
        },
        ModelReport {
            model: "random_forest",
            train: score(forest.forest(), &data.train)?,
            test: score(forest.forest(), &data.test)?,
        },
    ];
    let stats = Id3Stats {
        n_nodes: tree.n_nodes(),
        n_leaves: tree.n_leaves(),
        depth: tree.depth(),
    };
    Ok((stats, models, forest.importances().to_vec()))
}

struct Id3Stats {
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    let span_events = if cli.timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate {
            data,
            cutoff,
            n_trees,
            top,
        } => {
            let experiment_name = ExperimentName::new(data.experiment.clone())?;
            let run = resolve_run_config(&data, None)?;
            if run.attribute_count > ATTRIBUTE_WARNING_THRESHOLD {
                warn!(
                    attribute_count = run.attribute_count,
                    threshold = ATTRIBUTE_WARNING_THRESHOLD,
                    "many attributes make ID3 results inconsistent"
                );
            }
            let cutoff = cutoff.or(run.cutoff).unwrap_or(DEFAULT_CUTOFF);
            let n_trees = n_trees.or(run.tree_count).unwrap_or(DEFAULT_TREE_COUNT);
            let seed = cli.seed.or(run.seed).unwrap_or(42);

            // 1. Load corpora and vocabulary
            let layout = DatasetLayout::new(&data.data);
            let vocabulary = load_vocabulary(&layout, &run)?;
            let loaded = load_data(&layout, &vocabulary, run.example_count, true)?;

            // 2. Train and score both classifiers
            let (stats, models, importances) = train_and_score(&loaded, cutoff, n_trees, seed)?;
            for report in &models {
                info!(
                    model = report.model,
                    train_accuracy = report.train.accuracy,
                    test_accuracy = report.test.accuracy,
                    test_f1 = report.test.f1,
                    "model evaluated"
                );
            }

            // 3. Write evaluation JSON
            let writer = ResultWriter::new(&data.output_dir, experiment_name)?;
            let top_attributes = &importances[..top.min(importances.len())];
            writer.write_evaluation(loaded.attributes.len(), &models, top_attributes)?;

            // 4. Print summary
            let output = EvaluateOutput {
                experiment: data.experiment,
                n_train: loaded.train.len(),
                n_test: loaded.test.len(),
                n_attributes: loaded.attributes.len(),
                cutoff,
                n_trees,
                id3_nodes: stats.n_nodes,
                id3_leaves: stats.n_leaves,
                id3_depth: stats.depth,
                id3_test_accuracy: models[0].test.accuracy,
                forest_test_accuracy: models[1].test.accuracy,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::TuneCutoff { data, cutoffs } => {
            let experiment_name = ExperimentName::new(data.experiment.clone())?;
            let run = resolve_run_config(&data, None)?;

            let layout = DatasetLayout::new(&data.data);
            let vocabulary = load_vocabulary(&layout, &run)?;
            let loaded = load_data(&layout, &vocabulary, run.example_count, false)?;
            let (held_out, train) = loaded.train.split_at(loaded.train.len() / 2);

            let mut sweep = CutoffSweep::new();
            if let Some(cutoffs) = cutoffs {
                sweep = sweep.with_cutoffs(cutoffs);
            }
            let result = sweep
                .run(train, held_out, &loaded.attributes)
                .context("cutoff sweep failed")?;

            let writer = ResultWriter::new(&data.output_dir, experiment_name)?;
            writer.write_sweep("cutoff", &result)?;

            let output = SweepOutput {
                experiment: data.experiment,
                kind: "cutoff",
                n_train: train.len(),
                n_held_out: held_out.len(),
                best_value: result.best_value(),
                best_accuracy: result.best().metrics.accuracy,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::TuneTrees {
            data,
            cutoff,
            counts,
        } => {
            let experiment_name = ExperimentName::new(data.experiment.clone())?;
            let run = resolve_run_config(&data, None)?;
            let cutoff = cutoff.or(run.cutoff).unwrap_or(DEFAULT_CUTOFF);
            let seed = cli.seed.or(run.seed).unwrap_or(42);

            let layout = DatasetLayout::new(&data.data);
            let vocabulary = load_vocabulary(&layout, &run)?;
            let loaded = load_data(&layout, &vocabulary, run.example_count, false)?;
            let (held_out, train) = loaded.train.split_at(loaded.train.len() / 2);

            let base = RandomForestConfig::default()
                .with_cutoff(cutoff)
                .with_seed(seed);
            let mut sweep = TreeCountSweep::new(base);
            if let Some(counts) = counts {
                sweep = sweep.with_counts(counts);
            }
            let result = sweep
                .run(train, held_out, &loaded.attributes)
                .context("tree count sweep failed")?;

            let writer = ResultWriter::new(&data.output_dir, experiment_name)?;
            writer.write_sweep("trees", &result)?;

            let output = SweepOutput {
                experiment: data.experiment,
                kind: "trees",
                n_train: train.len(),
                n_held_out: held_out.len(),
                best_value: result.best_value(),
                best_accuracy: result.best().metrics.accuracy,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Curve {
            data,
            cutoff,
            n_trees,
            sizes,
        } => {
            let experiment_name = ExperimentName::new(data.experiment.clone())?;
            let sizes = sizes.unwrap_or_else(|| {
                [250, 500]
                    .into_iter()
                    .chain((1000..=10_000).step_by(1000))
                    .collect()
            });
            if sizes.is_empty() {
                anyhow::bail!("--sizes must list at least one corpus size");
            }
            let run = resolve_run_config(&data, sizes.iter().copied().max())?;
            let cutoff = cutoff.or(run.cutoff).unwrap_or(DEFAULT_CUTOFF);
            let n_trees = n_trees.or(run.tree_count).unwrap_or(DEFAULT_TREE_COUNT);
            let seed = cli.seed.or(run.seed).unwrap_or(42);

            let layout = DatasetLayout::new(&data.data);
            let vocabulary = load_vocabulary(&layout, &run)?;

            let mut rows = Vec::with_capacity(sizes.len() * 4);
            for &size in &sizes {
                let loaded = load_data(&layout, &vocabulary, size, true)?;
                let (_, models, _) = train_and_score(&loaded, cutoff, n_trees, seed)?;
                for report in &models {
                    rows.push(CurveRow::new(size, report.model, "train", &report.train));
                    rows.push(CurveRow::new(size, report.model, "test", &report.test));
                }
                info!(size, "curve point complete");
            }

            let writer = ResultWriter::new(&data.output_dir, experiment_name)?;
            writer.write_curve(&rows)?;

            let output = CurveOutput {
                experiment: data.experiment,
                sizes,
                n_rows: rows.len(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
