use crate::volume::Volume;

use flate2::read::GzDecoder;
use log::{debug, info};
use ndarray::{Axis, Ix3};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiObject};
use std::{fs, io::Cursor, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("Volume must be at least 3-dimensional, got {0}D")]
    NotAVolume(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Unexpected volume shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Returns true for the file names the viewer accepts (.nii / .nii.gz).
pub fn is_nifti_filename(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.ends_with(".nii") || name.ends_with(".nii.gz")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a NIfTI file on disk
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let path = path.as_ref();
        info!("loading volume from {}", path.display());
        let bytes = fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }

    /// Load a volume from the raw bytes of a .nii or .nii.gz file
    ///
    /// Gzip compression is detected from the content, not the file name. The
    /// decoder applies `scl_slope` / `scl_inter` (a slope of 0 is treated as
    /// no scaling). 4-dimensional images are reduced to their first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a parseable NIfTI-1 image or the
    /// image has fewer than 3 dimensions.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<Volume, VolumeLoaderError> {
        let object = if is_gzip(bytes) {
            InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes)))?
        } else {
            InMemNiftiObject::from_reader(Cursor::new(bytes))?
        };

        let spacing = Self::get_spacing(object.header());

        let mut array = object.into_volume().into_ndarray::<f32>()?;
        if array.ndim() < 3 {
            return Err(VolumeLoaderError::NotAVolume(array.ndim()));
        }
        // Multi-frame images: keep the first frame only
        while array.ndim() > 3 {
            let last_axis = Axis(array.ndim() - 1);
            array = array.index_axis_move(last_axis, 0);
        }
        let data = array.into_dimensionality::<Ix3>()?;

        debug!(
            "loaded volume {:?}, spacing {:?} mm",
            data.dim(),
            spacing
        );
        Ok(Volume::new(data, spacing))
    }

    fn get_spacing(header: &nifti::NiftiHeader) -> (f32, f32, f32) {
        // pixdim[1..=3] are the voxel sizes; guard against unset headers
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        (
            sanitize(header.pixdim[1]),
            sanitize(header.pixdim[2]),
            sanitize(header.pixdim[3]),
        )
    }
}
