use crate::enums::Interpolation;
use crate::enums::SlicePlane;
use crate::interpolator::Interpolator;
use crate::windowing::WindowLevel;

use image::GrayImage;
use image::ImageBuffer;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::s;
use rayon::prelude::*;

/// An in-memory scalar volume with voxel spacing in millimeters.
///
/// Voxel data is stored in NIfTI order, shape `(nx, ny, nz)` indexed as
/// `[x, y, z]`. Slices are handed out in display orientation: row 0 is the
/// anterior side for axial slices and the superior side for coronal and
/// sagittal slices.
#[derive(Debug, Default, Clone)]
pub struct Volume {
    data: Array3<f32>,
    spacing: (f32, f32, f32),
    interpolated_dim: (u32, u32, u32),
}

impl Volume {
    pub fn new(data: Array3<f32>, spacing: (f32, f32, f32)) -> Self {
        let original_dim = data.dim();
        Self {
            data,
            spacing,
            interpolated_dim: Interpolator::get_isotropic_dimensions(spacing, original_dim),
        }
    }

    /// Get the dimensions of the volume (nx, ny, nz)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Voxel spacing in mm (x, y, z)
    pub fn spacing(&self) -> (f32, f32, f32) {
        self.spacing
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Number of slices along the axis orthogonal to `plane`.
    pub fn slice_count(&self, plane: SlicePlane) -> usize {
        let (nx, ny, nz) = self.data.dim();
        match plane {
            SlicePlane::Axial => nz,
            SlicePlane::Coronal => ny,
            SlicePlane::Sagittal => nx,
        }
    }

    /// Minimum and maximum voxel intensity.
    pub fn value_range(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |acc, &v| (acc.0.min(v), acc.1.max(v)))
    }

    /// Extract an orthogonal slice in display orientation (row, column).
    pub fn get_slice_from_plane(
        &self,
        index: usize,
        plane: SlicePlane,
    ) -> Option<ArrayView2<'_, f32>> {
        display_slice(&self.data, index, plane)
    }

    fn get_output_dimensions(&self, plane: SlicePlane) -> (u32, u32) {
        // Always return (width, height) - standard image convention
        match plane {
            SlicePlane::Axial => {
                // Looking down the Z-axis: X is width, Y is height
                (self.interpolated_dim.0, self.interpolated_dim.1)
            }
            SlicePlane::Coronal => {
                // Looking down the Y-axis: X is width, Z is height
                (self.interpolated_dim.0, self.interpolated_dim.2)
            }
            SlicePlane::Sagittal => {
                // Looking down the X-axis: Y is width, Z is height
                (self.interpolated_dim.1, self.interpolated_dim.2)
            }
        }
    }

    fn slice_to_image(slice: &ArrayView2<'_, f32>, window: &WindowLevel) -> Option<GrayImage> {
        let (height, width) = slice.dim();
        let pixel_data: Vec<u8> = slice.into_par_iter().map(|&v| window.apply(v)).collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }

    /// Render a windowed 8-bit slice image.
    pub fn render_slice(
        &self,
        index: usize,
        plane: SlicePlane,
        window: &WindowLevel,
        interpolation: Interpolation,
    ) -> Option<GrayImage> {
        let slice = self.get_slice_from_plane(index, plane)?;

        match interpolation {
            Interpolation::None => Self::slice_to_image(&slice, window),
            Interpolation::Bilinear => {
                // Axial doesn't need resampling (already isotropic in-plane)
                if matches!(plane, SlicePlane::Axial) {
                    return Self::slice_to_image(&slice, window);
                }
                let (width, height) = self.get_output_dimensions(plane);
                self.interpolate_slice(&slice, width, height, window)
            }
        }
    }

    fn interpolate_slice(
        &self,
        slice: &ArrayView2<'_, f32>,
        width: u32,
        height: u32,
        window: &WindowLevel,
    ) -> Option<GrayImage> {
        let (slice_height, slice_width) = slice.dim();

        let pixel_data: Vec<u8> = (0..height)
            .into_par_iter()
            .flat_map(|y| {
                (0..width)
                    .map(|x| {
                        // Normalized coordinates with half-pixel offset
                        let norm_x = (x as f32 + 0.5) / width as f32;
                        let norm_y = (y as f32 + 0.5) / height as f32;

                        // Convert back to source coordinates
                        let src_x = norm_x * slice_width as f32 - 0.5;
                        let src_y = norm_y * slice_height as f32 - 0.5;

                        // Clamp to valid range
                        let src_x = src_x.max(0.0).min((slice_width - 1) as f32);
                        let src_y = src_y.max(0.0).min((slice_height - 1) as f32);

                        let value = Interpolator::bilinear_interpolate(slice, src_y, src_x);
                        window.apply(value)
                    })
                    .collect::<Vec<u8>>()
            })
            .collect();

        ImageBuffer::from_raw(width, height, pixel_data)
    }
}

/// Orthogonal slice of any voxel array in display orientation: columns along
/// the first remaining axis, rows flipped so the highest index is on top.
pub(crate) fn display_slice<A>(
    data: &Array3<A>,
    index: usize,
    plane: SlicePlane,
) -> Option<ArrayView2<'_, A>> {
    let (nx, ny, nz) = data.dim();
    let count = match plane {
        SlicePlane::Axial => nz,
        SlicePlane::Coronal => ny,
        SlicePlane::Sagittal => nx,
    };
    if index >= count {
        return None;
    }
    let index = index as isize;
    let view = match plane {
        SlicePlane::Axial => data.slice(s![.., .., index]),
        SlicePlane::Coronal => data.slice(s![.., index, ..]),
        SlicePlane::Sagittal => data.slice(s![index, .., ..]),
    };
    Some(view.reversed_axes().slice_move(s![..;-1, ..]))
}
