use std::{error::Error, path::PathBuf};

use clap::Parser;
use eframe::egui;
use nifti_view::app::ViewerApp;

#[derive(Parser, Debug)]
struct Args {
    /// Path to a .nii or .nii.gz volume to open on startup
    nifti_path: Option<PathBuf>,

    /// Segmentation volume to overlay on the loaded volume
    #[arg(short, long)]
    segmentation: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NIfTI Viewer",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ViewerApp::new(args.nifti_path, args.segmentation)))
        }),
    )?;

    Ok(())
}
