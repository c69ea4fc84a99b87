/// Step decay: multiply by `decay_rate` every `decay_steps` steps.
///
/// `lr = start_lr * decay_rate^(steps / decay_steps)`
///
/// The training loop steps it once per epoch, so `lr()` is the rate
/// used for the epoch currently running.
#[derive(Debug, Clone)]
pub struct StepLr {
    start_lr:    f64,
    decay_steps: usize,
    decay_rate:  f64,
    steps:       usize,
}

impl StepLr {
    pub fn new(start_lr: f64, decay_steps: usize, decay_rate: f64) -> Self {
        Self { start_lr, decay_steps: decay_steps.max(1), decay_rate, steps: 0 }
    }

    pub fn lr(&self) -> f64 {
        let exponent = (self.steps / self.decay_steps) as i32;
        self.start_lr * self.decay_rate.powi(exponent)
    }

    pub fn step(&mut self) {
        self.steps += 1;
    }
}
