// ============================================================
// Layer 4 — GroupReader
// ============================================================
// Reads a group of systems and serves them to the training loop
// through the SampleReader trait.
//
//   system dirs
//       │  load_system()         (validated, flattened frames)
//       ▼
//   split_train_val()            (per system, seeded)
//       │
//       ▼
//   batches()      → shuffled per-system batches, one epoch
//   sample_train() → one random training batch
//   sample_all()   → every held-out frame stacked together
//
// A batch never mixes systems. All systems in a group must share
// the same frame layout so sample_all() can stack across them.

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::path::Path;

use crate::data::{
    splitter::split_train_val,
    system::{load_system, stack, Frame, FrameLayout, SystemData},
};
use crate::domain::{sample::Sample, traits::SampleReader};

#[derive(Debug, Clone)]
struct SystemSplit {
    name:  String,
    train: Vec<Frame>,
    test:  Vec<Frame>,
}

pub struct GroupReader {
    layout:     FrameLayout,
    systems:    Vec<SystemSplit>,
    batch_size: usize,
    rng:        StdRng,
}

impl GroupReader {
    /// Load every system path and split each one into train / held-out frames.
    pub fn new(
        paths:      &[impl AsRef<Path>],
        batch_size: usize,
        test_ratio: f64,
        seed:       u64,
    ) -> Result<Self> {
        let systems = paths
            .iter()
            .map(|p| load_system(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_systems(systems, batch_size, test_ratio, seed)
    }

    pub fn from_systems(
        systems:    Vec<SystemData>,
        batch_size: usize,
        test_ratio: f64,
        seed:       u64,
    ) -> Result<Self> {
        ensure!(batch_size > 0, "batch size must be positive");
        ensure!(
            (0.0..1.0).contains(&test_ratio),
            "test ratio must be in [0, 1), got {}",
            test_ratio
        );
        let first = systems
            .first()
            .ok_or_else(|| anyhow::anyhow!("a reader needs at least one system"))?;
        let layout = first.layout.clone();

        let mut rng   = StdRng::seed_from_u64(seed);
        let mut split = Vec::with_capacity(systems.len());
        for sys in systems {
            ensure!(
                sys.layout == layout,
                "system '{}' has layout {:?}, expected {:?}",
                sys.name,
                sys.layout,
                layout
            );
            let (train, test) = split_train_val(sys.frames, 1.0 - test_ratio, &mut rng);
            split.push(SystemSplit { name: sys.name, train, test });
        }

        let n_train: usize = split.iter().map(|s| s.train.len()).sum();
        let n_test:  usize = split.iter().map(|s| s.test.len()).sum();
        ensure!(n_train > 0, "no training frames left after the split");
        tracing::info!(
            "Reader ready: {} systems, {} train / {} held-out frames, batch size {}",
            split.len(),
            n_train,
            n_test,
            batch_size
        );

        Ok(Self { layout, systems: split, batch_size, rng })
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Number of batches one call to `batches()` yields.
    pub fn batches_per_epoch(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.train.len().div_ceil(self.batch_size))
            .sum()
    }

    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name.as_str())
    }
}

impl SampleReader for GroupReader {
    fn batches(&mut self) -> impl Iterator<Item = Result<Sample>> + '_ {
        // Plan the epoch first: (system, frame indices) per batch.
        let mut plan = Vec::with_capacity(self.batches_per_epoch());
        for (s, sys) in self.systems.iter().enumerate() {
            let mut order: Vec<usize> = (0..sys.train.len()).collect();
            order.shuffle(&mut self.rng);
            for chunk in order.chunks(self.batch_size) {
                plan.push((s, chunk.to_vec()));
            }
        }
        plan.shuffle(&mut self.rng);

        let systems = &self.systems;
        let layout  = &self.layout;
        plan.into_iter().map(move |(s, idx)| {
            let sys = &systems[s];
            stack(idx.iter().map(|&i| &sys.train[i]), layout)
        })
    }

    fn sample_train(&mut self) -> Result<Sample> {
        let candidates: Vec<usize> = self
            .systems
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.train.is_empty())
            .map(|(i, _)| i)
            .collect();
        let s   = candidates[self.rng.gen_range(0..candidates.len())];
        let sys = &self.systems[s];
        let picked = sys.train.choose_multiple(&mut self.rng, self.batch_size);
        stack(picked, &self.layout)
    }

    fn sample_all(&mut self) -> Result<Sample> {
        let held_out = self.systems.iter().any(|s| !s.test.is_empty());
        if held_out {
            stack(self.systems.iter().flat_map(|s| s.test.iter()), &self.layout)
        } else {
            stack(self.systems.iter().flat_map(|s| s.train.iter()), &self.layout)
        }
    }
}
