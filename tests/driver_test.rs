//! Evaluation driver scenarios
//!
//! Dataset: 10 headwords, each with 5 senses of 6 examples. Four examples of
//! every sense mention a cue word from its definition; the other two share
//! nothing with any definition.

use sense_eval::config::{
    AccuracyMeasure, EvalConfig, GroupedMethod, OfmMethod, PartOfSpeech, PreprocessOptions,
    SampleShape, Task,
};
use sense_eval::dataset::{LexicalDataset, SenseRecord};
use sense_eval::driver::{EvaluationDriver, RunOutcome};
use sense_eval::embedding::EmbeddingModel;
use sense_eval::stats::RunStatistics;
use sense_eval::Error;

const SHAPE: SampleShape = SampleShape {
    senses_per_entry: 3,
    examples_per_sense: 3,
};

const OPTIONS: PreprocessOptions = PreprocessOptions {
    lemmatize: false,
    remove_stopwords: false,
    remove_punctuation: false,
};

fn dataset() -> LexicalDataset {
    let mut data = LexicalDataset::new();
    for w in 0..10 {
        let senses = (0..5)
            .map(|s| {
                let examples = (0..6).map(|e| {
                    if e < 4 {
                        format!("word{w} used with cue{s} in sentence {e}")
                    } else {
                        format!("an unrelated line numbered {w}x{s}x{e}")
                    }
                });
                SenseRecord::new(format!("cue{s} meaning"), examples).with_pos("noun")
            })
            .collect();
        data.insert(format!("word{w}"), senses);
    }
    data.prepare_with(PartOfSpeech::Noun, SHAPE, OPTIONS).unwrap()
}

fn config(task: Task, iterations: usize) -> EvalConfig {
    EvalConfig {
        seed: 42,
        dictionary: "synthetic.json".into(),
        pos: PartOfSpeech::Noun,
        preprocess: OPTIONS,
        shape: SHAPE,
        iterations,
        task,
        word2vec_bin: None,
    }
}

fn run(task: Task, iterations: usize) -> RunOutcome {
    let data = dataset();
    EvaluationDriver::new(&config(task, iterations), &data, None)
        .unwrap()
        .run()
        .unwrap()
}

fn assert_consistent(outcome: &RunOutcome) {
    let s = &outcome.statistics;
    assert!(outcome.trials.iter().all(|a| (0.0..=1.0).contains(a)));
    assert!(s.min <= s.mean && s.mean <= s.max);
    assert!(s.stddev >= 0.0);
    assert!(s.elapsed_seconds >= 0.0);
}

#[test]
fn test_ofm_random_is_near_chance() {
    let outcome = run(
        Task::OneFromMany {
            method: OfmMethod::Random,
        },
        20,
    );
    assert_eq!(outcome.trials.len(), 20);
    assert_consistent(&outcome);
    // 3 senses drawn -> 3 options per instance
    assert!((outcome.statistics.mean - 1.0 / 3.0).abs() < 0.1);
}

#[test]
fn test_grouped_word_crossover_beats_random() {
    let crossover = Task::Grouped {
        method: GroupedMethod::WordCrossover,
        measure: AccuracyMeasure::Total,
    };
    let random = Task::Grouped {
        method: GroupedMethod::Random,
        measure: AccuracyMeasure::Total,
    };

    let first = run(crossover, 20);
    let second = run(crossover, 20);
    let baseline = run(random, 20);

    assert_consistent(&first);
    assert_consistent(&baseline);
    assert!(first.statistics.mean > baseline.statistics.mean);
    assert!(first.statistics.mean < 1.0);
    assert_eq!(first.trials, second.trials);
}

#[test]
fn test_runs_are_deterministic_for_a_seed() {
    for task in [
        Task::OneFromMany {
            method: OfmMethod::Random,
        },
        Task::Grouped {
            method: GroupedMethod::Random,
            measure: AccuracyMeasure::Pairs,
        },
    ] {
        let a = run(task, 8);
        let b = run(task, 8);
        assert_eq!(a.trials, b.trials);
        // wall-clock time is the only field allowed to differ
        let untimed = |s: RunStatistics| RunStatistics {
            elapsed_seconds: 0.0,
            ..s
        };
        assert_eq!(untimed(a.statistics), untimed(b.statistics));
    }
}

#[test]
fn test_different_seeds_draw_different_samples() {
    let data = dataset();
    let task = Task::OneFromMany {
        method: OfmMethod::Random,
    };
    let mut other = config(task, 10);
    other.seed = 7;
    let a = EvaluationDriver::new(&config(task, 10), &data, None)
        .unwrap()
        .run()
        .unwrap();
    let b = EvaluationDriver::new(&other, &data, None).unwrap().run().unwrap();
    assert_ne!(a.trials, b.trials);
}

#[test]
fn test_trial_count_matches_iterations() {
    for iterations in [1, 2, 5, 13] {
        let outcome = run(
            Task::OneFromMany {
                method: OfmMethod::WordCrossover,
            },
            iterations,
        );
        assert_eq!(outcome.trials.len(), iterations);
    }
}

#[test]
fn test_single_iteration_statistics() {
    let outcome = run(
        Task::Grouped {
            method: GroupedMethod::WordCrossover,
            measure: AccuracyMeasure::Pairs,
        },
        1,
    );
    let s = outcome.statistics;
    assert_eq!(s.stddev, 0.0);
    assert_eq!(s.min, s.mean);
    assert_eq!(s.max, s.mean);
}

#[test]
fn test_embedding_method_without_model_fails_before_trials() {
    let data = dataset();
    for task in [
        Task::Grouped {
            method: GroupedMethod::Word2Vec,
            measure: AccuracyMeasure::Total,
        },
        Task::OneFromMany {
            method: OfmMethod::Word2VecCosine,
        },
        Task::OneFromMany {
            method: OfmMethod::Word2VecWordSim,
        },
    ] {
        let err = EvaluationDriver::new(&config(task, 3), &data, None).unwrap_err();
        assert!(matches!(err, Error::MissingModel(_)), "{task}: {err}");
    }
}

#[test]
fn test_embedding_methods_with_model() {
    let data = dataset();
    let model = EmbeddingModel::from_vectors((0..5).map(|s| {
        let mut v = vec![0.0f32; 5];
        v[s] = 1.0;
        (format!("cue{s}"), v)
    }))
    .unwrap();

    for task in [
        Task::Grouped {
            method: GroupedMethod::Word2Vec,
            measure: AccuracyMeasure::Total,
        },
        Task::OneFromMany {
            method: OfmMethod::Word2VecCosine,
        },
        Task::OneFromMany {
            method: OfmMethod::Word2VecWordSim,
        },
    ] {
        let outcome = EvaluationDriver::new(&config(task, 5), &data, Some(&model))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(outcome.trials.len(), 5);
        assert_consistent(&outcome);
    }
}

#[test]
fn test_dataset_is_not_mutated_by_runs() {
    let data = dataset();
    let before = data.clone();
    let task = Task::Grouped {
        method: GroupedMethod::Random,
        measure: AccuracyMeasure::Total,
    };
    EvaluationDriver::new(&config(task, 10), &data, None)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(data, before);
}
