//! # NIfTI-view library
//!
//! This crate backs a desktop viewer for medical imaging volumes in the
//! NIfTI-1 format (.nii and .nii.gz).

//!
//! Parsing of the binary format is delegated to the nifti crate; this
//! library wraps the decoded voxels into a [`Volume`] that can be sliced in
//! the three medical planes:
//!  - Axial
//!  - Coronal
//!  - Sagittal
//!
//!  Slices are rendered through a radiology window/level (with presets for
//!  abdomen, liver, bone, lung, brain and soft tissue), and Coronal and
//!  Sagittal slices can be interpolated to preserve the aspect ratios of
//!  anisotropic acquisitions. A multi-label segmentation volume can be split
//!  into per-label binary mask layers for independently colored overlays.
//!  Volumes are assumed to have the following attributes:
//!   - At least 3 dimensions (only the first frame of a 4D image is used)
//!   - Axial data set (Only Coronal and Sagittal planes are interpolated)
//!
//!   Contributions are highly welcome!
//!
//! # Examples
//!
//! ## Rendering the center sagittal slice of a volume
//!
//! Load a gzipped NIfTI file, then render the image at the center of the
//! volume in the Sagittal plane with the abdomen preset.
//!
//! ```no_run
//! # use nifti_view::enums::{Interpolation, SlicePlane};
//! # use nifti_view::volume_loader::VolumeLoader;
//! # use nifti_view::windowing::WindowPreset;
//! let volume = VolumeLoader::load_from_path("scan.nii.gz")
//!     .expect("should have loaded the volume");
//! let image = volume
//!     .render_slice(
//!         volume.slice_count(SlicePlane::Sagittal) / 2,
//!         SlicePlane::Sagittal,
//!         &WindowPreset::Abdomen.window(),
//!         Interpolation::Bilinear,
//!     )
//!     .expect("should have rendered the image at the center of the volume");
//! image.save("result.png");
//! ```
//!
//! [`Volume`]: crate::volume::Volume

pub mod app;
pub mod enums;
mod interpolator;
pub mod overlay;
pub mod render;
pub mod state;
pub mod volume;
pub mod volume_loader;
pub mod windowing;
