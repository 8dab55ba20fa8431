//! Headless companion to the viewer: render a range of windowed slices to
//! numbered PNG files.

use std::{error::Error, fs, path::PathBuf, time::Instant};

use clap::Parser;
use log::{debug, info};
use rayon::prelude::*;

use nifti_view::enums::{Interpolation, SlicePlane};
use nifti_view::volume_loader::VolumeLoader;
use nifti_view::windowing::{WindowLevel, WindowPreset};

#[derive(Debug, clap::ValueEnum, Clone)]
enum ArgPlane {
    Axial,
    Coronal,
    Sagittal,
}

impl From<ArgPlane> for SlicePlane {
    fn from(plane: ArgPlane) -> Self {
        match plane {
            ArgPlane::Axial => SlicePlane::Axial,
            ArgPlane::Coronal => SlicePlane::Coronal,
            ArgPlane::Sagittal => SlicePlane::Sagittal,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    /// Path to the input .nii or .nii.gz volume
    nifti_path: PathBuf,

    /// Output directory for the PNG files
    dest_path: PathBuf,

    #[arg(long, value_enum, default_value = "axial")]
    plane: ArgPlane,

    /// Windowing preset
    #[arg(long, value_enum, default_value = "abdomen")]
    preset: WindowPreset,

    /// Explicit window center, used together with --width instead of the preset
    #[arg(long, requires = "width")]
    center: Option<f32>,

    /// Explicit window width
    #[arg(long, requires = "center")]
    width: Option<f32>,

    /// 1-indexed first slice to export
    #[arg(long, default_value_t = 1)]
    start_at_slice: usize,

    /// 1-indexed last slice, defaults to the final slice
    #[arg(long)]
    stop_at_slice: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error + Sync + Send>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let t0 = Instant::now();

    let volume = VolumeLoader::load_from_path(&args.nifti_path)?;
    let (nx, ny, nz) = volume.dim();
    info!("dimensions: {nx}x{ny}x{nz}");

    let window = match (args.center, args.width) {
        (Some(center), Some(width)) => WindowLevel::new(center, width),
        _ => args.preset.window(),
    };
    info!("window: W {} L {}", window.width, window.center);

    let plane = SlicePlane::from(args.plane);
    let count = volume.slice_count(plane);
    let start = args.start_at_slice.saturating_sub(1);
    let stop = args.stop_at_slice.unwrap_or(count).min(count);
    assert!(start <= stop);

    fs::create_dir_all(&args.dest_path)?;

    let idxs: Vec<usize> = (start..stop).collect();
    let res: Result<Vec<()>, _> = idxs
        .into_par_iter()
        .map(|i| -> Result<(), Box<dyn Error + Sync + Send>> {
            let image = volume
                .render_slice(i, plane, &window, Interpolation::Bilinear)
                .ok_or("slice index out of range")?;
            let out_path = args.dest_path.join(format!("slice_{:05}.png", i + 1 - start));
            image.save(&out_path)?;
            debug!("created {out_path:?}");
            Ok(())
        })
        .collect();
    res?;

    info!("exported {} slices in {:?}", stop - start, t0.elapsed());

    Ok(())
}
