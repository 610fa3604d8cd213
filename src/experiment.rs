//! Repeated random-trial evaluation.
//!
//! Each trial draws a random training subset of the corpus, induces two
//! decision trees over it (one on all fourteen features, one on the eight
//! visual features alone), and measures both on the rows left out. Feature
//! vectors are extracted once up front; only the split varies per trial.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::color::ColorTable;
use crate::dataset::Dataset;
use crate::dom::Document;
use crate::error::{DetectError, Result};
use crate::features::{Feature, FeatureVector, FEATURE_COUNT, VISUAL_FEATURE_COUNT};
use crate::id3;
use crate::link::LinkFeatures;
use crate::options::ExtractionOptions;
use crate::tree::DecisionTree;
use crate::visual::VisualFeatureExtractor;

pub const DEFAULT_TRIALS: usize = 20;
pub const DEFAULT_TRAIN_SIZE: usize = 300;
pub const DEFAULT_TEST_SIZE: usize = 30;

/// Trial schedule and extraction settings for one experiment run.
#[derive(Debug, Clone)]
pub struct ExperimentOptions {
    /// How many independent random splits to evaluate. Default: `20`
    pub trials: usize,

    /// Rows drawn for training per trial. Default: `300`
    pub train_size: usize,

    /// Rows held out for testing per trial. Default: `30`
    pub test_size: usize,

    /// Fixed seed for reproducible splits; `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Settings passed through to the visual-feature extractor.
    pub extraction: ExtractionOptions,
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            train_size: DEFAULT_TRAIN_SIZE,
            test_size: DEFAULT_TEST_SIZE,
            seed: None,
            extraction: ExtractionOptions::default(),
        }
    }
}

/// Everything observed in one trial: the split, both trees, both scores.
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    pub trial: usize,
    pub training_rows: Vec<usize>,
    pub testing_rows: Vec<usize>,
    pub full_tree: DecisionTree,
    pub visual_tree: DecisionTree,
    pub full_accuracy: f64,
    pub visual_accuracy: f64,
}

/// All trials plus their accuracy means.
///
/// ## Serialization
///
/// The report and every trial in it implement `Serialize`, so a run can be
/// archived as JSON:
///
/// ```rust,no_run
/// use articledetect::{Dataset, ExperimentOptions};
///
/// # fn main() -> articledetect::Result<()> {
/// let dataset = Dataset::from_csv_file("dataset/ready.csv")?;
/// let report = articledetect::run_experiment(&dataset, &ExperimentOptions::default())?;
/// let json = serde_json::to_string_pretty(&report).unwrap();
/// println!("{}", json);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub trials: Vec<TrialReport>,
    pub mean_full_accuracy: f64,
    pub mean_visual_accuracy: f64,
}

/// One page's complete feature vector: the eight detectors over its
/// document plus the six predicates over its URL.
pub fn page_features(
    document: &Document,
    url: &str,
    options: &ExtractionOptions,
    colors: &ColorTable,
) -> FeatureVector {
    let visual = VisualFeatureExtractor::new(document, options, colors).extract();
    let link = LinkFeatures::from_url(url);
    FeatureVector::from_parts(&visual, &link)
}

/// Runs the full schedule. Pages that cannot be read abort the run, so a
/// damaged corpus fails loudly instead of skewing the scores.
pub fn run_experiment(dataset: &Dataset, options: &ExperimentOptions) -> Result<ExperimentReport> {
    validate(dataset, options)?;
    let colors = ColorTable::builtin();
    let vectors = extract_all(dataset, &options.extraction, &colors)?;
    let labels = dataset.labels();
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut trials = Vec::with_capacity(options.trials);
    for trial in 1..=options.trials {
        trials.push(run_trial(trial, &vectors, &labels, options, &mut rng)?);
    }
    let mean_full_accuracy = mean(trials.iter().map(|t| t.full_accuracy));
    let mean_visual_accuracy = mean(trials.iter().map(|t| t.visual_accuracy));
    Ok(ExperimentReport {
        trials,
        mean_full_accuracy,
        mean_visual_accuracy,
    })
}

fn validate(dataset: &Dataset, options: &ExperimentOptions) -> Result<()> {
    if options.trials == 0 {
        return Err(DetectError::Experiment("trial count is zero".to_string()));
    }
    if options.train_size == 0 || options.test_size == 0 {
        return Err(DetectError::Experiment(
            "training and testing sets must be non-empty".to_string(),
        ));
    }
    if options.train_size + options.test_size > dataset.len() {
        return Err(DetectError::Experiment(format!(
            "dataset has {} rows, need {} for training and {} for testing",
            dataset.len(),
            options.train_size,
            options.test_size
        )));
    }
    Ok(())
}

fn extract_all(
    dataset: &Dataset,
    options: &ExtractionOptions,
    colors: &ColorTable,
) -> Result<Vec<FeatureVector>> {
    let mut vectors = Vec::with_capacity(dataset.len());
    for record in dataset.records() {
        let document = Document::from_file(dataset.page_path(record))?;
        vectors.push(page_features(&document, &record.url, options, colors));
    }
    log::debug!("extracted features for {} pages", vectors.len());
    Ok(vectors)
}

fn run_trial(
    trial: usize,
    vectors: &[FeatureVector],
    labels: &[bool],
    options: &ExperimentOptions,
    rng: &mut StdRng,
) -> Result<TrialReport> {
    let (training_rows, testing_rows) =
        split_rows(labels.len(), options.train_size, options.test_size, rng);

    let train_labels: Vec<bool> = training_rows.iter().map(|&row| labels[row]).collect();
    let full_matrix = matrix(vectors, &training_rows, FEATURE_COUNT);
    let full_tree = id3::build_tree(
        &train_labels,
        &full_matrix,
        Feature::descriptions(FEATURE_COUNT),
    );
    let visual_matrix = matrix(vectors, &training_rows, VISUAL_FEATURE_COUNT);
    let visual_tree = id3::build_tree(
        &train_labels,
        &visual_matrix,
        Feature::descriptions(VISUAL_FEATURE_COUNT),
    );

    let test_vectors: Vec<FeatureVector> = testing_rows.iter().map(|&row| vectors[row]).collect();
    let test_labels: Vec<bool> = testing_rows.iter().map(|&row| labels[row]).collect();
    let full_accuracy = id3::accuracy(&full_tree, &test_vectors, &test_labels)?;
    let visual_accuracy = id3::accuracy(&visual_tree, &test_vectors, &test_labels)?;
    log::debug!(
        "trial {}: all-features {:.1}%, visual-only {:.1}%",
        trial,
        full_accuracy * 100.0,
        visual_accuracy * 100.0
    );

    Ok(TrialReport {
        trial,
        training_rows,
        testing_rows,
        full_tree,
        visual_tree,
        full_accuracy,
        visual_accuracy,
    })
}

/// Draws `train_size` distinct rows by rejection sampling, sorts them, and
/// takes the first `test_size` rows of the ascending complement.
fn split_rows(
    total: usize,
    train_size: usize,
    test_size: usize,
    rng: &mut impl Rng,
) -> (Vec<usize>, Vec<usize>) {
    let mut training = Vec::with_capacity(train_size);
    while training.len() < train_size {
        let candidate = rng.gen_range(0..total);
        if !training.contains(&candidate) {
            training.push(candidate);
        }
    }
    training.sort_unstable();

    let mut testing = Vec::with_capacity(test_size);
    for row in 0..total {
        if testing.len() == test_size {
            break;
        }
        if training.binary_search(&row).is_err() {
            testing.push(row);
        }
    }
    (training, testing)
}

/// Feature-major training matrix over the selected rows, restricted to the
/// leading `count` features.
fn matrix(vectors: &[FeatureVector], rows: &[usize], count: usize) -> Vec<Vec<bool>> {
    (0..count)
        .map(|f| rows.iter().map(|&row| vectors[row].values()[f]).collect())
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
