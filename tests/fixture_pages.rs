//! Detector tests over the fixture pages in tests/pages/.
//!
//! Each page is built around one clause of the rule table: either a single
//! element satisfies every condition of its detector, or exactly one
//! condition is broken and the detector must stay quiet. The accompanying
//! ready.csv lists all pages with labels and URLs so the full experiment
//! pipeline can run over the same corpus.

use articledetect::{
    page_features, run_experiment, ColorTable, Dataset, Document, ExperimentOptions,
    ExtractionOptions, Feature, LinkFeatures, VisualFeatureExtractor, VisualFeatures,
};
use std::fs;
use std::path::PathBuf;

fn page_path(name: &str) -> PathBuf {
    PathBuf::from("tests/pages").join(format!("{name}.html"))
}

fn load_page(name: &str) -> Document {
    let path = page_path(name);
    let html = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {:?}: {}", path, e));
    Document::parse(&html)
}

fn features(name: &str) -> VisualFeatures {
    let document = load_page(name);
    let options = ExtractionOptions::default();
    let colors = ColorTable::builtin();
    VisualFeatureExtractor::new(&document, &options, &colors).extract()
}

#[test]
fn exactly_one_of_the_seven_title_pages_has_a_title() {
    for n in 1..=7 {
        let name = format!("testPage{n}");
        assert_eq!(
            features(&name).title,
            n == 2,
            "title detector disagreed on {name}"
        );
    }
}

#[test]
fn publication_dates_need_small_date_shaped_text() {
    // month-day form and numeric form, in <time> and styled <span>
    assert!(features("testPage8").publication_date);
    assert!(features("testPage9").publication_date);
    // an article page whose smallest text is still above the size cap
    assert!(!features("testPage2").publication_date);
}

#[test]
fn bylines_match_on_whole_words() {
    assert!(features("testPage10").author);
    assert!(features("testPage11").author);
    // no by or author anywhere in small text
    assert!(!features("testPage6").author);
}

#[test]
fn comment_links_must_actually_be_links() {
    assert!(features("testPage12").comment_link);
    assert!(features("testPage13").comment_link);
    // testPage11 carries an Add Comment label outside any anchor
    assert!(!features("testPage11").comment_link);
}

#[test]
fn source_lines_accept_black_gray_and_brown() {
    assert!(features("testPage14").source);
    assert!(features("testPage15").source);
    assert!(!features("testPage13").source);
}

#[test]
fn body_copy_counts_only_when_on_screen() {
    assert!(features("testPage16").content);
    assert!(features("testPage2").content);
    // the long paragraph sits past the line cutoff
    assert!(!features("testPage17").content);
}

#[test]
fn breadcrumbs_need_a_separator_in_short_early_text() {
    assert!(features("testPage18").category);
    assert!(features("testPage19").category);
    assert!(!features("testPage14").category);
}

#[test]
fn related_blocks_live_in_the_lower_half() {
    assert!(features("testPage20").related_news_links);
    assert!(features("testPage21").related_news_links);
    assert!(!features("testPage16").related_news_links);
}

#[test]
fn story_urls_fire_all_six_link_features() {
    let link = LinkFeatures::from_url(
        "www.dailyledger.com/2018/9/20/18342070/storm-closes-mountain-passes",
    );
    assert!(link.has_four_slashes);
    assert!(link.has_date);
    assert!(link.has_id_number);
    assert!(link.has_longer_length);
    assert!(link.no_trailing_slash);
    assert!(link.no_reserved_word);
}

#[test]
fn section_urls_fire_none_of_the_positive_link_features() {
    let link = LinkFeatures::from_url("www.dailyledger.com/weather/");
    assert!(!link.has_four_slashes);
    assert!(!link.has_date);
    assert!(!link.has_id_number);
    assert!(!link.has_longer_length);
    assert!(!link.no_trailing_slash);
    assert!(link.no_reserved_word);
}

#[test]
fn media_urls_trip_the_reserved_words() {
    assert!(!LinkFeatures::from_url("www.dailyledger.com/video/18591060/briefing").no_reserved_word);
    assert!(!LinkFeatures::from_url("www.dailyledger.com/photos/week-in-pictures").no_reserved_word);
}

#[test]
fn page_features_join_the_page_and_its_url() {
    let document = load_page("testPage2");
    let options = ExtractionOptions::default();
    let colors = ColorTable::builtin();
    let vector = page_features(
        &document,
        "www.dailyledger.com/2018/9/20/18342070/storm-closes-mountain-passes",
        &options,
        &colors,
    );
    assert!(vector.get(Feature::TitleExists));
    assert!(vector.get(Feature::ContentExists));
    assert!(!vector.get(Feature::PublicationDateExists));
    assert!(vector.get(Feature::LinkHasDate));
    assert!(vector.get(Feature::LinkHasIdNumber));
}

#[test]
fn dataset_resolves_pages_beside_the_csv() {
    let dataset = Dataset::from_csv_file("tests/pages/ready.csv").expect("fixture csv loads");
    assert_eq!(dataset.len(), 21);

    let record = dataset.record(1).expect("row 2 present");
    assert_eq!(record.id, 2);
    assert!(record.label);
    assert!(dataset.page_path(record).exists());

    let labels = dataset.labels();
    assert_eq!(labels.iter().filter(|&&l| l).count(), 13);
}

#[test]
fn the_experiment_runs_end_to_end_over_the_fixture_corpus() {
    let dataset = Dataset::from_csv_file("tests/pages/ready.csv").expect("fixture csv loads");

    let mut options = ExperimentOptions::default();
    options.trials = 2;
    options.train_size = 14;
    options.test_size = 7;
    options.seed = Some(2018);

    let report = run_experiment(&dataset, &options).expect("experiment completes");
    assert_eq!(report.trials.len(), 2);
    assert!((0.0..=1.0).contains(&report.mean_full_accuracy));
    assert!((0.0..=1.0).contains(&report.mean_visual_accuracy));

    for trial in &report.trials {
        assert_eq!(trial.training_rows.len(), 14);
        assert_eq!(trial.testing_rows.len(), 7);
        assert!(!trial.full_tree.is_empty());
        assert!(!trial.visual_tree.is_empty());
        assert!((0.0..=1.0).contains(&trial.full_accuracy));
        assert!((0.0..=1.0).contains(&trial.visual_accuracy));
    }

    // same seed, same splits
    let again = run_experiment(&dataset, &options).expect("experiment repeats");
    assert_eq!(
        report.trials[0].training_rows,
        again.trials[0].training_rows
    );
}
