use hpf_core::stopping::{
    IterationCountStoppingCondition, StoppingCondition, ThresholdStoppingCondition,
    TrainingLoopController,
};
use hpf_core::{HpfHyperParameters, HpfOptions, HpfTrainer, LikelihoodMode};

use rec_data::{EntityIndex, RatingEntry, RatingSplit};

use std::cell::RefCell;
use std::rc::Rc;

/// Toy data set: 3 users, 2 items, 4 observed counts; the training
/// entries double as the validation set.
fn toy_split() -> RatingSplit {
    let mut user_index = EntityIndex::new();
    let mut item_index = EntityIndex::new();
    for id in [0u64, 1, 2] {
        user_index.intern(id);
    }
    for id in [0u64, 1] {
        item_index.intern(id);
    }

    let entry = |user, item, value| RatingEntry { user, item, value };
    let train = vec![
        entry(0, 0, 3.0),
        entry(0, 1, 1.0),
        entry(1, 0, 2.0),
        entry(2, 1, 4.0),
    ];
    let validation = train.clone();

    RatingSplit::from_parts(train, validation, user_index, item_index)
}

fn toy_options() -> HpfOptions {
    HpfOptions {
        hyper: HpfHyperParameters {
            num_factors: 2,
            ..Default::default()
        },
        eval_frequency: 1,
        seed: 42,
        ..Default::default()
    }
}

/// Wraps a stopping condition and records every delta fed to it.
struct RecordingCondition<S: StoppingCondition> {
    inner: S,
    deltas: Rc<RefCell<Vec<f64>>>,
}

struct RecordingController {
    inner: Box<dyn TrainingLoopController>,
    deltas: Rc<RefCell<Vec<f64>>>,
}

impl TrainingLoopController for RecordingController {
    fn keep_training(&mut self, delta: f64) -> bool {
        self.deltas.borrow_mut().push(delta);
        self.inner.keep_training(delta)
    }

    fn iteration_count(&self) -> usize {
        self.inner.iteration_count()
    }
}

impl<S: StoppingCondition> StoppingCondition for RecordingCondition<S> {
    fn new_loop(&self) -> Box<dyn TrainingLoopController> {
        Box::new(RecordingController {
            inner: self.inner.new_loop(),
            deltas: self.deltas.clone(),
        })
    }
}

#[test]
fn toy_training_converges_to_positive_factors() {
    let split = toy_split();
    let trainer = HpfTrainer::new(toy_options());

    let deltas = Rc::new(RefCell::new(vec![]));
    let stopping = RecordingCondition {
        inner: ThresholdStoppingCondition {
            threshold: 1e-4,
            min_iterations: 0,
            max_iterations: 50,
        },
        deltas: deltas.clone(),
    };

    let model = trainer.fit(&split, &stopping).unwrap();

    assert_eq!(model.num_users(), 3);
    assert_eq!(model.num_items(), 2);
    assert_eq!(model.num_factors(), 2);
    assert!(model.user_features.iter().all(|&x| x.is_finite() && x > 0.0));
    assert!(model.item_features.iter().all(|&x| x.is_finite() && x > 0.0));

    // the relative change dips under the threshold within 50 iterations
    let deltas = deltas.borrow();
    let iterations = deltas.len() - 1; // last call answered false
    assert!(iterations < 50, "no convergence in {} iterations", iterations);
    assert!(*deltas.last().unwrap() <= 1e-4);

    // expected rates reflect the observed counts: user 2 only rated
    // item 1, heavily, so that pair should outscore (2, 0)
    let seen = model.expected_rate(2, 1).unwrap();
    let unseen = model.expected_rate(2, 0).unwrap();
    assert!(seen > unseen);
}

#[test]
fn training_is_deterministic() {
    let split = toy_split();
    let trainer = HpfTrainer::new(toy_options());
    let stopping = IterationCountStoppingCondition { max_iterations: 12 };

    let a = trainer.fit(&split, &stopping).unwrap();
    let b = trainer.fit(&split, &stopping).unwrap();

    assert_eq!(a.user_features, b.user_features);
    assert_eq!(a.item_features, b.item_features);

    // a different seed lands elsewhere
    let mut other = toy_options();
    other.seed = 43;
    let c = HpfTrainer::new(other).fit(&split, &stopping).unwrap();
    assert_ne!(a.user_features, c.user_features);
}

#[test]
fn likelihood_is_evaluated_only_at_frequency_multiples() {
    let split = toy_split();
    let mut options = toy_options();
    options.eval_frequency = 3;
    let trainer = HpfTrainer::new(options);

    let deltas = Rc::new(RefCell::new(vec![]));
    let stopping = RecordingCondition {
        inner: IterationCountStoppingCondition { max_iterations: 10 },
        deltas: deltas.clone(),
    };

    trainer.fit(&split, &stopping).unwrap();

    // call j asks about iteration j+1; a fresh delta can only appear
    // right after an evaluation, i.e. at j = 3, 6, 9
    let deltas = deltas.borrow();
    assert_eq!(deltas.len(), 11);
    for j in 1..deltas.len() {
        if j % 3 != 0 {
            assert_eq!(deltas[j], deltas[j - 1], "delta changed at call {}", j);
        }
    }
    assert_ne!(deltas[6], deltas[5]);
}

#[test]
fn probability_mode_also_trains() {
    let split = toy_split();
    let mut options = toy_options();
    options.likelihood = LikelihoodMode::Probability;
    let trainer = HpfTrainer::new(options);
    let stopping = IterationCountStoppingCondition { max_iterations: 10 };

    let model = trainer.fit(&split, &stopping).unwrap();
    assert!(model.user_features.iter().all(|&x| x.is_finite() && x > 0.0));
}

#[test]
fn k_equal_one_boundary_trains() {
    let split = toy_split();
    let mut options = toy_options();
    options.hyper.num_factors = 1;
    let trainer = HpfTrainer::new(options);
    let stopping = IterationCountStoppingCondition { max_iterations: 10 };

    let model = trainer.fit(&split, &stopping).unwrap();
    assert_eq!(model.num_factors(), 1);
    assert!(model.user_features.iter().all(|&x| x.is_finite() && x > 0.0));
    assert!(model.item_features.iter().all(|&x| x.is_finite() && x > 0.0));
}

#[test]
fn empty_validation_split_is_rejected() {
    let mut user_index = EntityIndex::new();
    let mut item_index = EntityIndex::new();
    user_index.intern(0);
    item_index.intern(0);
    let train = vec![RatingEntry {
        user: 0,
        item: 0,
        value: 1.0,
    }];
    let split = RatingSplit::from_parts(train, vec![], user_index, item_index);

    let trainer = HpfTrainer::new(toy_options());
    let stopping = IterationCountStoppingCondition { max_iterations: 5 };
    assert!(trainer.fit(&split, &stopping).is_err());
}

#[test]
fn out_of_range_entries_are_rejected() {
    // one interned user/item each, but an entry pointing past them
    let mut user_index = EntityIndex::new();
    let mut item_index = EntityIndex::new();
    user_index.intern(0);
    item_index.intern(0);
    let good = RatingEntry {
        user: 0,
        item: 0,
        value: 1.0,
    };
    let bad = RatingEntry {
        user: 5,
        item: 0,
        value: 1.0,
    };
    let split = RatingSplit::from_parts(vec![good, bad], vec![good], user_index, item_index);

    let trainer = HpfTrainer::new(toy_options());
    let stopping = IterationCountStoppingCondition { max_iterations: 5 };
    assert!(trainer.fit(&split, &stopping).is_err());
}

#[test]
fn invalid_configuration_is_rejected_before_training() {
    let split = toy_split();
    let mut options = toy_options();
    options.hyper.user_activity_mean = 0.0;
    let trainer = HpfTrainer::new(options);
    let stopping = IterationCountStoppingCondition { max_iterations: 5 };
    assert!(trainer.fit(&split, &stopping).is_err());
}
