// ============================================================
// Layer 4 — System Loader
// ============================================================
// Loads one "system" (a set of frames of the same molecule or
// configuration) from a JSON file.
//
// On-disk layout, either:
//   <dir>/system.json
// or a direct path to a .json file, containing:
//
//   {
//     "label":    [[f64; n_out]; n_frames],
//     "features": [[[[f64; n_desc_k]; n_items]; n_frames]; k]
//   }
//
// Every frame must have the same shape; ragged input is
// rejected here so later stacking never has to check again.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::domain::{array::HostArray, sample::Sample};

/// File name looked up when a system path is a directory.
pub const SYSTEM_FILE: &str = "system.json";

#[derive(Debug, Deserialize)]
struct SystemFile {
    label:    Vec<Vec<f64>>,
    features: Vec<Vec<Vec<Vec<f64>>>>,
}

/// One frame, flattened row-major per array.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub label:    Vec<f64>,
    pub features: Vec<Vec<f64>>,
}

/// Per-frame shape shared by every frame of a system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    pub label_width:    usize,
    pub n_items:        usize,
    pub feature_widths: Vec<usize>,
}

impl FrameLayout {
    /// Total descriptor width once all feature arrays are concatenated.
    pub fn n_desc(&self) -> usize {
        self.feature_widths.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct SystemData {
    pub name:   String,
    pub layout: FrameLayout,
    pub frames: Vec<Frame>,
}

/// Read and validate a system from a directory or a .json file.
pub fn load_system(path: &Path) -> Result<SystemData> {
    let file = if path.is_dir() { path.join(SYSTEM_FILE) } else { path.to_path_buf() };

    let json = fs::read_to_string(&file)
        .with_context(|| format!("Cannot read system file '{}'", file.display()))?;
    let raw: SystemFile = serde_json::from_str(&json)
        .with_context(|| format!("Malformed system file '{}'", file.display()))?;

    let name = path.display().to_string();
    let system = from_raw(name, raw)?;
    tracing::debug!(
        "Loaded system '{}': {} frames, {} items, desc {:?}",
        system.name,
        system.frames.len(),
        system.layout.n_items,
        system.layout.feature_widths,
    );
    Ok(system)
}

fn from_raw(name: String, raw: SystemFile) -> Result<SystemData> {
    let n_frames = raw.label.len();
    ensure!(n_frames > 0, "system '{}' has no frames", name);
    ensure!(!raw.features.is_empty(), "system '{}' has no feature arrays", name);

    let label_width = raw.label[0].len();
    ensure!(label_width > 0, "system '{}' has empty labels", name);

    // Shape of feature k is taken from its first frame.
    let mut n_items        = None;
    let mut feature_widths = Vec::with_capacity(raw.features.len());
    for (k, feat) in raw.features.iter().enumerate() {
        ensure!(
            feat.len() == n_frames,
            "system '{}': feature {} has {} frames, label has {}",
            name, k, feat.len(), n_frames
        );
        let items = feat[0].len();
        ensure!(items > 0, "system '{}': feature {} has no items", name, k);
        match n_items {
            None => n_items = Some(items),
            Some(n) => ensure!(
                n == items,
                "system '{}': feature {} has {} items, expected {}",
                name, k, items, n
            ),
        }
        let width = feat[0][0].len();
        ensure!(width > 0, "system '{}': feature {} has empty descriptors", name, k);
        feature_widths.push(width);
    }
    let layout = FrameLayout {
        label_width,
        n_items: n_items.unwrap_or_default(),
        feature_widths,
    };

    let mut frames = Vec::with_capacity(n_frames);
    for (i, label) in raw.label.iter().enumerate() {
        ensure!(
            label.len() == layout.label_width,
            "system '{}': frame {} label has width {}, expected {}",
            name, i, label.len(), layout.label_width
        );
        let mut features = Vec::with_capacity(raw.features.len());
        for (k, feat) in raw.features.iter().enumerate() {
            let rows = &feat[i];
            ensure!(
                rows.len() == layout.n_items,
                "system '{}': frame {} feature {} has {} items, expected {}",
                name, i, k, rows.len(), layout.n_items
            );
            let mut flat = Vec::with_capacity(layout.n_items * layout.feature_widths[k]);
            for row in rows {
                ensure!(
                    row.len() == layout.feature_widths[k],
                    "system '{}': frame {} feature {} is ragged",
                    name, i, k
                );
                flat.extend_from_slice(row);
            }
            features.push(flat);
        }
        frames.push(Frame { label: label.clone(), features });
    }

    Ok(SystemData { name, layout, frames })
}

/// Stack frames into one sample: label [n, n_out], feature k [n, n_items, w_k].
pub fn stack<'a>(
    frames: impl IntoIterator<Item = &'a Frame>,
    layout: &FrameLayout,
) -> Result<Sample> {
    let mut n        = 0usize;
    let mut labels   = Vec::new();
    let mut features = vec![Vec::new(); layout.feature_widths.len()];

    for frame in frames {
        n += 1;
        labels.extend_from_slice(&frame.label);
        for (acc, values) in features.iter_mut().zip(&frame.features) {
            acc.extend_from_slice(values);
        }
    }

    let label = HostArray::new([n, layout.label_width], labels)?;
    let features = features
        .into_iter()
        .zip(&layout.feature_widths)
        .map(|(values, &w)| HostArray::new([n, layout.n_items, w], values))
        .collect::<Result<Vec<_>>>()?;

    Sample::new(label, features)
}
