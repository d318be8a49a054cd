//! Algebraic properties of the tiling comparison — symmetry, identity,
//! empty-input laws, monotonicity, and tile disjointness, exercised through
//! the public engine and matcher APIs.

use tessera::tiling::compare;
use tessera::{ComparisonResult, DetectorConfig, Language, SimilarityEngine, Tokenizer};

const LOOP: &str = "for(int i=0;i<n;i++){sum+=i;}";
const LOOP_RENAMED: &str = "for(int j=0;j<m;j++){total+=j;}";
const ADD_FN: &str = "int add(int a,int b){return a+b;}";
const UNRELATED: &str = "while(queue_ready()){drain(queue);}";

fn config(minimum: usize) -> DetectorConfig {
    DetectorConfig::default()
        .with_language(Language::Cpp)
        .with_minimum_token_match(minimum)
}

fn run(a: &str, b: &str, cfg: &DetectorConfig) -> ComparisonResult {
    let tokenizer = Tokenizer::new(Language::Cpp, cfg);
    compare(&tokenizer.tokenize(a), &tokenizer.tokenize(b), cfg)
}

#[test]
fn test_identity_scores_one() {
    let cfg = config(3);
    for src in [LOOP, ADD_FN, UNRELATED] {
        let result = run(src, src, &cfg);
        assert_eq!(result.similarity, 1.0, "self-comparison of {src:?}");
    }
}

#[test]
fn test_similarity_is_symmetric() {
    let cfg = config(3);
    let pairs = [
        (LOOP, LOOP_RENAMED),
        (ADD_FN, UNRELATED),
        (LOOP, ADD_FN),
        ("", LOOP),
    ];
    for (a, b) in pairs {
        let forward = run(a, b, &cfg);
        let backward = run(b, a, &cfg);
        assert_eq!(
            forward.similarity, backward.similarity,
            "symmetry violated for ({a:?}, {b:?})"
        );
        assert_eq!(forward.matched_token_count, backward.matched_token_count);
    }
}

#[test]
fn test_empty_input_laws() {
    let cfg = config(3);
    assert_eq!(run("", "", &cfg).similarity, 1.0);
    assert_eq!(run("", LOOP, &cfg).similarity, 0.0);
    assert_eq!(run(LOOP, "", &cfg).similarity, 0.0);
}

#[test]
fn test_similarity_stays_in_unit_range() {
    let cfg = config(3);
    let sources = [LOOP, LOOP_RENAMED, ADD_FN, UNRELATED, "", "int x;"];
    for a in sources {
        for b in sources {
            let s = run(a, b, &cfg).similarity;
            assert!((0.0..=1.0).contains(&s), "({a:?}, {b:?}) scored {s}");
        }
    }
}

#[test]
fn test_more_shared_content_scores_higher() {
    // A = loop + add. Copying the loop alone scores lower than copying
    // the loop and the function.
    let cfg = config(3);
    let a = format!("{LOOP}\n{ADD_FN}");
    let partial = format!("{LOOP}\n{UNRELATED}");
    let fuller = format!("{LOOP}\n{ADD_FN}\n{UNRELATED}");

    let low = run(&a, &partial, &cfg);
    let high = run(&a, &fuller, &cfg);
    assert!(
        high.similarity > low.similarity,
        "copying more must not lower the score: {} vs {}",
        high.similarity,
        low.similarity
    );
}

#[test]
fn test_unrelated_suffix_never_raises_score() {
    // Appending content to B that overlaps no tile can only dilute the
    // score, never improve it.
    let cfg = config(3);
    let a = format!("{LOOP}\n{ADD_FN}");
    let padded_b = format!("{LOOP}\n{UNRELATED}");

    let base = run(&a, LOOP, &cfg);
    let padded = run(&a, &padded_b, &cfg);
    assert!(
        padded.similarity <= base.similarity,
        "unrelated tokens in B must not raise the score: {} vs {}",
        padded.similarity,
        base.similarity
    );
    assert_eq!(
        padded.matched_token_count, base.matched_token_count,
        "the unrelated suffix must not join any tile"
    );
}

#[test]
fn test_tiles_never_reuse_tokens() {
    // Reordered blocks: the loop and the function match as separate tiles.
    let cfg = config(3);
    let a = format!("{LOOP}\n{ADD_FN}");
    let b = format!("{ADD_FN}\n{LOOP}");
    let result = run(&a, &b, &cfg);

    assert_eq!(result.similarity, 1.0, "reordered full copy still matches");
    assert_eq!(result.tiles.len(), 2);

    let mut end_a = 0usize;
    for tile in &result.tiles {
        assert!(tile.start_a >= end_a, "tiles overlap on side A");
        end_a = tile.start_a + tile.length;
    }
    let mut spans_b: Vec<_> = result
        .tiles
        .iter()
        .map(|t| (t.start_b, t.start_b + t.length))
        .collect();
    spans_b.sort_unstable();
    for pair in spans_b.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "tiles overlap on side B");
    }
}

#[test]
fn test_matched_count_equals_tile_lengths() {
    let cfg = config(3);
    let a = format!("{LOOP}\n{ADD_FN}");
    let b = format!("{ADD_FN}\n{UNRELATED}\n{LOOP}");
    let result = run(&a, &b, &cfg);
    let from_tiles: usize = result.tiles.iter().map(|t| t.length).sum();
    assert_eq!(result.matched_token_count, from_tiles);
}

#[test]
fn test_minimum_token_match_gates_short_runs() {
    // The loop collapses to five structural tokens: below a minimum of six
    // nothing matches, at three the whole run does.
    let strict = run(LOOP, LOOP_RENAMED, &config(6));
    assert_eq!(strict.similarity, 0.0);
    assert!(strict.tiles.is_empty());

    let lenient = run(LOOP, LOOP_RENAMED, &config(3));
    assert_eq!(lenient.similarity, 1.0);
}

#[test]
fn test_rename_invariance_is_structural_only() {
    let structural = run(LOOP, LOOP_RENAMED, &config(3));
    assert_eq!(structural.similarity, 1.0);

    let lexical_cfg = config(3).lexical();
    let tokenizer = Tokenizer::new(Language::Cpp, &lexical_cfg);
    let lexical = compare(
        &tokenizer.tokenize(LOOP),
        &tokenizer.tokenize(LOOP_RENAMED),
        &lexical_cfg,
    );
    assert!(
        lexical.similarity < 1.0,
        "lexical mode must see the renamed identifiers, got {}",
        lexical.similarity
    );
}

#[test]
fn test_minimum_similarity_gates_details_not_score() {
    let cfg = config(3).with_minimum_similarity(0.9);
    let engine = SimilarityEngine::new(cfg).expect("valid config");
    let partial = format!("{LOOP}\n{UNRELATED}");
    let result = engine.evaluate(LOOP, &partial, None);

    assert!(result.comparison.similarity > 0.0);
    assert!(result.comparison.similarity < 0.9);
    assert!(result.details.is_empty(), "details suppressed below threshold");
    assert!(
        !result.comparison.tiles.is_empty(),
        "raw tiles remain available"
    );
}
