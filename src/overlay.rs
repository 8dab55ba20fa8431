//! Segmentation overlays. A multi-label segmentation volume is split into
//! one binary mask layer per label so each structure gets its own color and
//! can be blended independently over the base volume.

use crate::enums::SlicePlane;
use crate::volume::{Volume, display_slice};

use log::{info, warn};
use ndarray::{Array3, ArrayView2};
use rayon::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Segmentation dimensions {seg:?} do not match volume dimensions {base:?}")]
    DimensionMismatch {
        seg: (usize, usize, usize),
        base: (usize, usize, usize),
    },
}

/// Display color assigned to a label layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

/// Palette cycled over labels in ascending order.
pub const LABEL_COLORS: [LabelColor; 6] = [
    LabelColor { name: "red", rgb: [255, 0, 0] },
    LabelColor { name: "green", rgb: [0, 255, 0] },
    LabelColor { name: "blue", rgb: [0, 0, 255] },
    LabelColor { name: "yellow", rgb: [255, 255, 0] },
    LabelColor { name: "cyan", rgb: [0, 255, 255] },
    LabelColor { name: "magenta", rgb: [255, 0, 255] },
];

/// A binary mask volume for a single segmentation label.
#[derive(Debug, Clone)]
pub struct LabelLayer {
    pub label: i32,
    pub color: LabelColor,
    mask: Array3<u8>,
}

impl LabelLayer {
    pub fn mask(&self) -> &Array3<u8> {
        &self.mask
    }

    /// Mask slice in the same display orientation as the base volume.
    pub fn slice(&self, index: usize, plane: SlicePlane) -> Option<ArrayView2<'_, u8>> {
        display_slice(&self.mask, index, plane)
    }
}

/// A loaded segmentation, split into per-label layers.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub layers: Vec<LabelLayer>,
    pub file_name: String,
}

impl Overlay {
    /// Split a segmentation volume into binary per-label layers.
    ///
    /// Labels are the distinct positive integer values in the segmentation
    /// (voxels are rounded, so integer masks stored as floats work too),
    /// sorted ascending. Each layer's mask holds 1 where the voxel carries
    /// that label and 0 elsewhere; colors cycle through [`LABEL_COLORS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the segmentation dimensions differ from the base
    /// volume's.
    pub fn split(
        seg: &Volume,
        base_dim: (usize, usize, usize),
        file_name: impl Into<String>,
    ) -> Result<Overlay, OverlayError> {
        if seg.dim() != base_dim {
            return Err(OverlayError::DimensionMismatch {
                seg: seg.dim(),
                base: base_dim,
            });
        }

        let labels: BTreeSet<i32> = seg
            .data()
            .iter()
            .map(|&v| v.round() as i32)
            .filter(|&label| label > 0)
            .collect();

        if labels.is_empty() {
            warn!("segmentation contains no positive labels");
        } else {
            info!("labels found: {:?}", labels);
        }

        let layers: Vec<LabelLayer> = labels
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(i, label)| LabelLayer {
                label,
                color: LABEL_COLORS[i % LABEL_COLORS.len()],
                mask: seg.data().mapv(|v| u8::from(v.round() as i32 == label)),
            })
            .collect();

        Ok(Overlay {
            layers,
            file_name: file_name.into(),
        })
    }
}
