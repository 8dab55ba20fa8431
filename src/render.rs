//! Composition of windowed base slices with segmentation overlay layers.

use crate::enums::{Interpolation, SlicePlane};
use crate::overlay::Overlay;
use crate::volume::Volume;
use crate::windowing::WindowLevel;

use eframe::egui;
use image::RgbaImage;
use ndarray::ArrayView2;

/// Render one slice of the volume with the overlay blended on top.
///
/// `overlay_opacity` is the effective opacity (the caller passes 0 to hide
/// the overlay). Layers blend largest label first so smaller labels end up
/// on top.
pub fn compose_slice(
    volume: &Volume,
    overlay: Option<&Overlay>,
    overlay_opacity: f32,
    index: usize,
    plane: SlicePlane,
    window: &WindowLevel,
    interpolation: Interpolation,
) -> Option<RgbaImage> {
    let base = volume.render_slice(index, plane, window, interpolation)?;
    let (width, height) = (base.width(), base.height());

    let mut out = RgbaImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let gray = base.get_pixel(x, y).0[0];
        *pixel = image::Rgba([gray, gray, gray, 255]);
    }

    let opacity = overlay_opacity.clamp(0.0, 1.0);
    if let Some(overlay) = overlay
        && opacity > 0.0
    {
        for layer in overlay.layers.iter().rev() {
            let mask = layer.slice(index, plane)?;
            blend_layer(&mut out, &mask, layer.color.rgb, opacity);
        }
    }

    Some(out)
}

/// Alpha-blend a label color into `image` wherever the mask is set. The mask
/// is sampled nearest-neighbor since the base may have been resampled to
/// isotropic dimensions.
fn blend_layer(image: &mut RgbaImage, mask: &ArrayView2<'_, u8>, rgb: [u8; 3], opacity: f32) {
    let (mask_height, mask_width) = mask.dim();
    let (width, height) = (image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let src_row = (((y as f32 + 0.5) / height as f32) * mask_height as f32) as usize;
        let src_col = (((x as f32 + 0.5) / width as f32) * mask_width as f32) as usize;
        let src_row = src_row.min(mask_height - 1);
        let src_col = src_col.min(mask_width - 1);

        if mask[[src_row, src_col]] == 1 {
            for channel in 0..3 {
                let base = pixel.0[channel] as f32;
                pixel.0[channel] = base.mul_add(1.0 - opacity, rgb[channel] as f32 * opacity) as u8;
            }
        }
    }
}

/// Convert a composed slice into an egui texture image.
pub fn to_color_image(image: &RgbaImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn base_volume() -> Volume {
        Volume::new(Array3::zeros((2, 2, 2)), (1.0, 1.0, 1.0))
    }

    fn overlay_on(volume: &Volume) -> Overlay {
        let mut seg = Array3::zeros((2, 2, 2));
        seg[[0, 0, 0]] = 1.0;
        let seg = Volume::new(seg, (1.0, 1.0, 1.0));
        Overlay::split(&seg, volume.dim(), "seg.nii").unwrap()
    }

    #[test]
    fn test_compose_without_overlay_is_grayscale() {
        let volume = base_volume();
        let image = compose_slice(
            &volume,
            None,
            1.0,
            0,
            SlicePlane::Axial,
            &WindowLevel::new(0.0, 2.0),
            Interpolation::None,
        )
        .unwrap();
        // 0 sits at window center
        assert_eq!(image.get_pixel(0, 0).0, [127, 127, 127, 255]);
    }

    #[test]
    fn test_compose_blends_label_color() {
        let volume = base_volume();
        let overlay = overlay_on(&volume);
        let window = WindowLevel::new(100.0, 10.0); // all voxels map to black
        let image = compose_slice(
            &volume,
            Some(&overlay),
            1.0,
            0,
            SlicePlane::Axial,
            &window,
            Interpolation::None,
        )
        .unwrap();
        // label voxel at x=0, y=0 lands in the bottom display row
        assert_eq!(image.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_compose_partial_opacity() {
        let volume = base_volume();
        let overlay = overlay_on(&volume);
        let window = WindowLevel::new(100.0, 10.0);
        let image = compose_slice(
            &volume,
            Some(&overlay),
            0.5,
            0,
            SlicePlane::Axial,
            &window,
            Interpolation::None,
        )
        .unwrap();
        assert_eq!(image.get_pixel(0, 1).0, [127, 0, 0, 255]);
    }

    #[test]
    fn test_compose_zero_opacity_leaves_base() {
        let volume = base_volume();
        let overlay = overlay_on(&volume);
        let window = WindowLevel::new(100.0, 10.0);
        let image = compose_slice(
            &volume,
            Some(&overlay),
            0.0,
            0,
            SlicePlane::Axial,
            &window,
            Interpolation::None,
        )
        .unwrap();
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }
}
