//! End-to-end loading of NIfTI files from disk.

use std::fs;
use std::io::Write;

use flate2::{Compression, write::GzEncoder};
use pretty_assertions::assert_eq;

use nifti_view::enums::{Interpolation, SlicePlane};
use nifti_view::volume_loader::{VolumeLoader, VolumeLoaderError};
use nifti_view::windowing::WindowPreset;

// Minimal little-endian NIfTI-1 file: 348-byte header, 4-byte extender,
// float32 data in Fortran order (x varies fastest).
fn nifti_bytes(dims: &[usize], spacing: (f32, f32, f32), data: &[f32]) -> Vec<u8> {
    let mut header = vec![0u8; 348];
    header[0..4].copy_from_slice(&348i32.to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = dims.len() as i16;
    for (i, &d) in dims.iter().enumerate() {
        dim[i + 1] = d as i16;
    }
    for (i, d) in dim.iter().enumerate() {
        header[40 + i * 2..42 + i * 2].copy_from_slice(&d.to_le_bytes());
    }

    header[70..72].copy_from_slice(&16i16.to_le_bytes()); // NIFTI_TYPE_FLOAT32
    header[72..74].copy_from_slice(&32i16.to_le_bytes()); // bitpix

    let pixdim = [1.0f32, spacing.0, spacing.1, spacing.2, 1.0, 1.0, 1.0, 1.0];
    for (i, p) in pixdim.iter().enumerate() {
        header[76 + i * 4..80 + i * 4].copy_from_slice(&p.to_le_bytes());
    }

    header[108..112].copy_from_slice(&352.0f32.to_le_bytes()); // vox_offset
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes()); // scl_slope
    header[344..348].copy_from_slice(b"n+1\0");

    let mut bytes = header;
    bytes.extend_from_slice(&[0u8; 4]); // extender
    for v in data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

fn gradient_data(nx: usize, ny: usize, nz: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny * nz);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                data.push((x * 100 + y * 10 + z) as f32);
            }
        }
    }
    data
}

#[test]
fn loads_nii_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.nii");
    fs::write(
        &path,
        nifti_bytes(&[4, 3, 2], (0.7, 0.7, 5.0), &gradient_data(4, 3, 2)),
    )
    .unwrap();

    let volume = VolumeLoader::load_from_path(&path).unwrap();
    assert_eq!(volume.dim(), (4, 3, 2));
    assert_eq!(volume.spacing(), (0.7, 0.7, 5.0));
    assert_eq!(volume.data()[[3, 2, 1]], 321.0);
}

#[test]
fn loads_gzipped_nii_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.nii.gz");

    let raw = nifti_bytes(&[2, 2, 3], (1.0, 1.0, 1.0), &gradient_data(2, 2, 3));
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let volume = VolumeLoader::load_from_path(&path).unwrap();
    assert_eq!(volume.dim(), (2, 2, 3));
    assert_eq!(volume.slice_count(SlicePlane::Axial), 3);
}

#[test]
fn renders_loaded_slice_with_preset_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.nii");
    fs::write(
        &path,
        nifti_bytes(&[8, 8, 4], (1.0, 1.0, 1.0), &vec![40.0; 8 * 8 * 4]),
    )
    .unwrap();

    let volume = VolumeLoader::load_from_path(&path).unwrap();
    let image = volume
        .render_slice(
            2,
            SlicePlane::Axial,
            &WindowPreset::Brain.window(),
            Interpolation::Bilinear,
        )
        .unwrap();
    assert_eq!((image.width(), image.height()), (8, 8));
    // 40 HU is the center of the brain window
    assert_eq!(image.get_pixel(4, 4).0[0], 127);
}

#[test]
fn missing_file_reports_io_error() {
    let err = VolumeLoader::load_from_path("/no/such/file.nii").unwrap_err();
    assert!(matches!(err, VolumeLoaderError::Io(_)));
}
