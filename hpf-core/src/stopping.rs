//! Convergence policy, decoupled from the trainer: a stopping
//! condition spawns one loop controller per training run, and the
//! controller decides iteration by iteration whether to continue
//! given the latest relative-change metric.

/// Per-run iteration controller.
///
/// `keep_training` is queried once per iteration with the most recent
/// relative change of the convergence metric; when it answers `true`
/// it also advances the iteration count, so `iteration_count` is
/// 1-based inside the loop body.
pub trait TrainingLoopController {
    fn keep_training(&mut self, delta: f64) -> bool;
    fn iteration_count(&self) -> usize;
}

/// Factory for loop controllers; one controller per training run.
pub trait StoppingCondition {
    fn new_loop(&self) -> Box<dyn TrainingLoopController>;
}

/// Run for a fixed number of iterations, ignoring the metric.
#[derive(Debug, Clone)]
pub struct IterationCountStoppingCondition {
    pub max_iterations: usize,
}

struct IterationCountController {
    iterations: usize,
    max_iterations: usize,
}

impl TrainingLoopController for IterationCountController {
    fn keep_training(&mut self, _delta: f64) -> bool {
        if self.iterations >= self.max_iterations {
            false
        } else {
            self.iterations += 1;
            true
        }
    }

    fn iteration_count(&self) -> usize {
        self.iterations
    }
}

impl StoppingCondition for IterationCountStoppingCondition {
    fn new_loop(&self) -> Box<dyn TrainingLoopController> {
        Box::new(IterationCountController {
            iterations: 0,
            max_iterations: self.max_iterations,
        })
    }
}

/// Stop at the first check where |delta| falls to the threshold or
/// below, once past `min_iterations`; `max_iterations` is a hard cap.
#[derive(Debug, Clone)]
pub struct ThresholdStoppingCondition {
    pub threshold: f64,
    pub min_iterations: usize,
    pub max_iterations: usize,
}

struct ThresholdController {
    iterations: usize,
    threshold: f64,
    min_iterations: usize,
    max_iterations: usize,
}

impl TrainingLoopController for ThresholdController {
    fn keep_training(&mut self, delta: f64) -> bool {
        if self.iterations >= self.max_iterations {
            return false;
        }
        if self.iterations >= self.min_iterations && delta.abs() <= self.threshold {
            return false;
        }
        self.iterations += 1;
        true
    }

    fn iteration_count(&self) -> usize {
        self.iterations
    }
}

impl StoppingCondition for ThresholdStoppingCondition {
    fn new_loop(&self) -> Box<dyn TrainingLoopController> {
        Box::new(ThresholdController {
            iterations: 0,
            threshold: self.threshold,
            min_iterations: self.min_iterations,
            max_iterations: self.max_iterations,
        })
    }
}
