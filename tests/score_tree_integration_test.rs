use colored::Colorize;
use indoc::indoc;
use pretty_assertions::assert_eq;
use scoretree::config::{load_config_from, parse_config, CONFIG_FILE_NAME};
use scoretree::definition::tree_from_toml_str;
use scoretree::{
    ColorMode, ErrorKind, PlainFormatter, Score, ScoreArea, ScoreNode, ScoreTree,
    ScoreTreeConfig, ScoreTreeError,
};
use tempfile::TempDir;

fn score(name: &str, weight: f64, range: (f64, f64), value: f64, inverse: bool) -> ScoreNode {
    Score::new(name, weight, range, value, inverse).unwrap().into()
}

fn area(name: &str, weight: f64, items: Vec<ScoreNode>) -> ScoreNode {
    ScoreArea::new(name, weight, items).unwrap().into()
}

fn track(name: &str, weight: f64, speed: f64, time: f64, distance: f64) -> ScoreNode {
    area(
        name,
        weight,
        vec![
            score("Top speed (m/s)", 0.5, (0.0, 100.0), speed, false),
            score("Elapsed time (s)", 0.3, (20.0, 60.0), time, true),
            score("Traveled distance (m)", 0.2, (250.0, 785.0), distance, true),
        ],
    )
}

fn two_track_tree() -> ScoreTree {
    ScoreTree::new(
        vec![
            track("Track 1", 0.4, 48.12, 31.2, 327.12),
            track("Track 2", 0.6, 72.32, 26.2, 295.12),
        ],
        false,
    )
    .unwrap()
}

fn nested_track_tree() -> ScoreTree {
    let dynamics = area(
        "Dynamics",
        0.6,
        vec![
            score("Top speed (m/s)", 0.5, (0.0, 100.0), 88.2, false),
            score("Elapsed time (s)", 0.3, (20.0, 60.0), 31.2, true),
            score("Traveled distance (m)", 0.2, (250.0, 785.0), 327.12, true),
        ],
    );
    let energy = area(
        "Energy consumption",
        0.28,
        vec![
            score("Battery consumption (kWh)", 0.65, (0.0, 43.74), 6.0, true),
            score("Regenerative braking (kWh)", 0.35, (0.0, 16.1), 8.16, false),
        ],
    );
    let efficiency = area(
        "Efficiency",
        0.4,
        vec![
            score("Fuel consumption (l)", 0.72, (39.13, 69.32), 58.12, true),
            energy,
        ],
    );

    ScoreTree::new(vec![area("Track 1", 1.0, vec![dynamics, efficiency])], false).unwrap()
}

fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

#[test]
fn test_speed_scenario() {
    let speed = Score::new("Speed", 0.5, (0.0, 100.0), 50.0, false).unwrap();
    assert_eq!(speed.score(), 0.5);
    assert_eq!(speed.to_string(), "Speed (50.00%): 50.00%");
}

#[test]
fn test_inverse_time_scenario() {
    let time = Score::new("Time", 0.3, (20.0, 60.0), 40.0, true).unwrap();
    assert_eq!(time.score(), 0.5);
}

#[test]
fn test_area_of_best_and_worst_scores() {
    let area = ScoreArea::new(
        "Area",
        1.0,
        vec![
            score("best", 0.5, (0.0, 1.0), 1.0, false),
            score("worst", 0.5, (0.0, 1.0), 0.0, false),
        ],
    )
    .unwrap();
    assert_eq!(area.score(), 0.5);
}

#[test]
fn test_tree_with_partial_weight_fails() {
    let err = ScoreTree::new(vec![score("only", 0.9, (0.0, 1.0), 1.0, false)], true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_incomplete_weight_sums_fail() {
    for weights in [vec![0.0], vec![0.5], vec![0.99], vec![1.01], vec![0.5, 0.5, 0.01]] {
        let items = weights
            .iter()
            .enumerate()
            .map(|(i, w)| score(&format!("s{}", i), *w, (0.0, 1.0), 1.0, false))
            .collect::<Vec<_>>();

        let tree_err = ScoreTree::new(items.clone(), false).unwrap_err();
        assert_eq!(tree_err.kind(), ErrorKind::Value, "tree weights {:?}", weights);

        let area_err = ScoreArea::new("area", 1.0, items).unwrap_err();
        assert_eq!(area_err.kind(), ErrorKind::Value, "area weights {:?}", weights);
    }

    let negative = Score::new("s", -0.5, (0.0, 1.0), 1.0, false).unwrap_err();
    assert_eq!(negative.kind(), ErrorKind::Value);
}

#[test]
fn test_float_accumulated_weights_within_tolerance() {
    let items = vec![
        score("a", 0.7, (0.0, 1.0), 1.0, false),
        score("b", 0.2, (0.0, 1.0), 1.0, false),
        score("c", 0.1, (0.0, 1.0), 1.0, false),
    ];

    assert!(ScoreTree::new(items.clone(), false).is_ok());

    let exact = ScoreTree::builder()
        .items(items)
        .tolerance(0.0)
        .colorized(false)
        .build();
    assert_eq!(exact.unwrap_err().kind(), ErrorKind::Value);
}

#[test]
fn test_loose_tolerance_cannot_hide_incomplete_weights() {
    let half = vec![score("a", 0.5, (0.0, 1.0), 1.0, false)];
    let overfull = vec![
        score("a", 0.75, (0.0, 1.0), 1.0, false),
        score("b", 0.75, (0.0, 1.0), 1.0, false),
    ];

    let loose = ScoreTree::builder()
        .items(half.clone())
        .tolerance(0.5)
        .build()
        .unwrap_err();
    assert!(loose
        .violations()
        .iter()
        .any(|e| e.field().map(|f| f.as_string()).as_deref() == Some("weight_tolerance")));

    let config = parse_config("weight_tolerance = 0.5").unwrap();
    assert_eq!(config.weight_tolerance, scoretree::DEFAULT_WEIGHT_TOLERANCE);
    assert_eq!(
        ScoreTree::with_config(half, &config).unwrap_err().kind(),
        ErrorKind::Value
    );
    assert_eq!(
        ScoreTree::with_config(overfull, &config).unwrap_err().kind(),
        ErrorKind::Value
    );
}

#[test]
fn test_colored_render_leaves_global_colors_alone() {
    let before = "x".red().to_string();

    let mut tree = nested_track_tree();
    tree.set_colorized(true);
    let rendered = tree.render();
    assert!(rendered.contains("\x1b[31m"));

    assert_eq!("x".red().to_string(), before);
}

#[test]
fn test_two_track_tree_render() {
    let tree = two_track_tree();

    assert!((tree.score() - 0.7300476635514019).abs() < 1e-12);
    assert_eq!(
        tree.render(),
        indoc! {"
            Track 1 (40.00%): 62.78%
            └── Top Speed (M/S) (50.00%): 48.12%
            └── Elapsed Time (S) (30.00%): 72.00%
            └── Traveled Distance (M) (20.00%): 85.59%
            Track 2 (60.00%): 79.82%
            └── Top Speed (M/S) (50.00%): 72.32%
            └── Elapsed Time (S) (30.00%): 84.50%
            └── Traveled Distance (M) (20.00%): 91.57%"}
    );
}

#[test]
fn test_nested_track_tree_render() {
    let tree = nested_track_tree();

    assert!((tree.score() - 0.6864269251873525).abs() < 1e-12);
    assert_eq!(
        tree.to_string(),
        indoc! {"
            Track 1 (100.00%): 68.64%
            └── Dynamics (60.00%): 82.82%
                └── Top Speed (M/S) (50.00%): 88.20%
                └── Elapsed Time (S) (30.00%): 72.00%
                └── Traveled Distance (M) (20.00%): 85.59%
            └── Efficiency (40.00%): 47.38%
                └── Fuel Consumption (L) (72.00%): 37.10%
                └── Energy Consumption (28.00%): 73.82%
                    └── Battery Consumption (Kwh) (65.00%): 86.28%
                    └── Regenerative Braking (Kwh) (35.00%): 50.68%"}
    );
}

#[test]
fn test_colored_render_carries_same_text() {
    let mut tree = nested_track_tree();
    let plain = tree.render();

    tree.set_colorized(true);
    let colored = tree.render();

    assert_ne!(colored, plain);
    assert!(colored.contains("\x1b[32m"), "expected a green band");
    assert!(colored.contains("\x1b[33m"), "expected a yellow band");
    assert!(colored.contains("\x1b[31m"), "expected a red band");
    assert_eq!(strip_ansi(&colored), plain);
}

#[test]
fn test_render_is_idempotent() {
    let mut tree = nested_track_tree();
    assert_eq!(tree.render(), tree.render());

    tree.set_colorized(true);
    assert_eq!(tree.render(), tree.render());
    assert_eq!(tree.render_with(&PlainFormatter), tree.render_with(&PlainFormatter));
}

#[test]
fn test_rejected_mutation_keeps_tree_intact() {
    let mut tree = two_track_tree();
    let before = tree.render();

    let result = tree.set_items(vec![track("Track 1", 0.4, 48.12, 31.2, 327.12)]);
    assert!(matches!(result, Err(ScoreTreeError::Value(_))));
    assert_eq!(tree.render(), before);
}

#[test]
fn test_definition_matches_code_built_tree() {
    let tree = tree_from_toml_str(indoc! {r#"
        colorized = false

        [[items]]
        name = "Track 1"
        weight = 0.4

        [[items.items]]
        name = "Top speed (m/s)"
        weight = 0.5
        range = [0, 100]
        value = 48.12

        [[items.items]]
        name = "Elapsed time (s)"
        weight = 0.3
        range = [20, 60]
        value = 31.2
        inverse = true

        [[items.items]]
        name = "Traveled distance (m)"
        weight = 0.2
        range = [250, 785]
        value = 327.12
        inverse = true

        [[items]]
        name = "Track 2"
        weight = 0.6

        [[items.items]]
        name = "Top speed (m/s)"
        weight = 0.5
        range = [0, 100]
        value = 72.32

        [[items.items]]
        name = "Elapsed time (s)"
        weight = 0.3
        range = [20, 60]
        value = 26.2
        inverse = true

        [[items.items]]
        name = "Traveled distance (m)"
        weight = 0.2
        range = [250, 785]
        value = 295.12
        inverse = true
    "#})
    .unwrap();

    assert_eq!(tree, two_track_tree());
}

#[test]
fn test_tree_from_discovered_config() {
    let root = TempDir::new().unwrap();
    let nested = root.path().join("project");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        root.path().join(CONFIG_FILE_NAME),
        indoc! {r#"
            weight_tolerance = 0.0

            [display]
            color = "never"
        "#},
    )
    .unwrap();

    let config: ScoreTreeConfig = load_config_from(&nested);
    assert_eq!(config.display.color, ColorMode::Never);

    let sloppy = vec![
        score("a", 0.7, (0.0, 1.0), 1.0, false),
        score("b", 0.2, (0.0, 1.0), 1.0, false),
        score("c", 0.1, (0.0, 1.0), 1.0, false),
    ];
    assert!(ScoreTree::with_config(sloppy, &config).is_err());

    let tree = ScoreTree::with_config(vec![score("a", 1.0, (0.0, 1.0), 0.25, false)], &config)
        .unwrap();
    assert!(!tree.colorized());
    assert_eq!(tree.tolerance(), 0.0);
    assert_eq!(tree.render(), "A (100.00%): 25.00%");
}
