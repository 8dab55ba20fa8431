//! The eframe viewer application: home screen, file drop target and the
//! slice viewer with its toolbar and overlay controls.

use std::fs;
use std::path::{Path, PathBuf};

use eframe::egui::{self, DragValue, Slider, TextureHandle, TextureOptions};
use log::{error, info};

use crate::enums::{Interpolation, SlicePlane, SliceType};
use crate::overlay::Overlay;
use crate::render;
use crate::state::{ViewerState, VolumeInfo};
use crate::volume::Volume;
use crate::volume_loader::{VolumeLoader, is_nifti_filename};
use crate::windowing::WindowPreset;

#[derive(Default, PartialEq)]
enum Screen {
    #[default]
    Home,
    Viewer,
}

struct LoadedVolume {
    source_path: PathBuf,
    file_name: String,
    file_size: u64,
    volume: Volume,
}

/// Texture cache key; a texture is re-uploaded only when this changes.
#[derive(Clone, Copy, PartialEq)]
struct SliceKey {
    index: usize,
    center: u32,
    width: u32,
    opacity: u32,
    overlay_generation: u64,
}

#[derive(Default)]
pub struct ViewerApp {
    screen: Screen,
    state: ViewerState,
    loaded: Option<LoadedVolume>,
    overlay: Option<Overlay>,
    overlay_generation: u64,
    // per-plane slice cursors: axial, coronal, sagittal
    cursors: [usize; 3],
    textures: [Option<(SliceKey, TextureHandle)>; 3],
    error: Option<String>,
}

fn plane_index(plane: SlicePlane) -> usize {
    match plane {
        SlicePlane::Axial => 0,
        SlicePlane::Coronal => 1,
        SlicePlane::Sagittal => 2,
    }
}

impl ViewerApp {
    pub fn new(initial_file: Option<PathBuf>, initial_segmentation: Option<PathBuf>) -> Self {
        let mut app = Self::default();
        if let Some(path) = initial_file {
            app.screen = Screen::Viewer;
            app.open_volume(&path);
            if let Some(seg) = initial_segmentation {
                app.open_segmentation(&seg);
            }
        }
        app
    }

    fn active_plane(&self) -> SlicePlane {
        self.state.slice_type.plane().unwrap_or(SlicePlane::Axial)
    }

    fn open_volume(&mut self, path: &Path) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_nifti_filename(&file_name) {
            self.error = Some("Please select a NIfTI file (.nii or .nii.gz)".into());
            return;
        }

        match VolumeLoader::load_from_path(path) {
            Ok(volume) => {
                let (nx, ny, nz) = volume.dim();
                let (sx, sy, sz) = volume.spacing();

                self.state.reset();
                self.state.set_volume_info(VolumeInfo {
                    dimensions: [nx, ny, nz],
                    spacing: [sx, sy, sz],
                });
                // start at the center of the volume
                self.cursors = [nz / 2, ny / 2, nx / 2];
                self.state.set_max_slice(nz.saturating_sub(1));
                self.state.set_current_slice(nz / 2);

                self.overlay = None;
                self.overlay_generation += 1;
                self.error = None;
                self.loaded = Some(LoadedVolume {
                    file_size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
                    source_path: path.to_owned(),
                    file_name,
                    volume,
                });
            }
            Err(err) => {
                error!("failed to load {}: {err}", path.display());
                self.error = Some(format!("Failed to load NIfTI file: {err}"));
            }
        }
    }

    fn open_segmentation(&mut self, path: &Path) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_nifti_filename(&file_name) {
            self.error = Some("Please select a NIfTI file (.nii or .nii.gz)".into());
            return;
        }

        let result = VolumeLoader::load_from_path(path)
            .map_err(|err| format!("Failed to load segmentation: {err}"))
            .and_then(|seg| {
                Overlay::split(&seg, loaded.volume.dim(), file_name.as_str())
                    .map_err(|err| format!("Failed to load segmentation: {err}"))
            });
        match result {
            Ok(overlay) => {
                info!(
                    "segmentation {file_name} split into {} label layers",
                    overlay.layers.len()
                );
                self.overlay = Some(overlay);
                self.overlay_generation += 1;
                self.state.overlay_loaded(file_name);
                self.error = None;
            }
            Err(message) => {
                error!("{message}");
                self.error = Some(message);
            }
        }
    }

    fn clear_segmentation(&mut self) {
        self.overlay = None;
        self.overlay_generation += 1;
        self.state.clear_overlay();
    }

    fn close_volume(&mut self) {
        self.loaded = None;
        self.clear_segmentation();
        self.state.reset();
        self.error = None;
    }

    fn set_active_cursor(&mut self, index: usize) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let plane = self.active_plane();
        let max = loaded.volume.slice_count(plane).saturating_sub(1);
        self.cursors[plane_index(plane)] = index.min(max);
        self.state.set_current_slice(index.min(max));
    }

    fn step_active_cursor(&mut self, delta: isize) {
        let plane = self.active_plane();
        let current = self.cursors[plane_index(plane)];
        let next = current.saturating_add_signed(delta);
        self.set_active_cursor(next);
    }

    /// Called when the view layout changes so the slider and counter track
    /// the newly active plane.
    fn sync_active_plane(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let plane = self.active_plane();
        let max = loaded.volume.slice_count(plane).saturating_sub(1);
        self.state.set_max_slice(max);
        self.state.set_current_slice(self.cursors[plane_index(plane)]);
    }

    fn slice_texture(&mut self, ctx: &egui::Context, plane: SlicePlane) -> Option<TextureHandle> {
        let loaded = self.loaded.as_ref()?;
        let index = self.cursors[plane_index(plane)];
        let key = SliceKey {
            index,
            center: self.state.window.center.to_bits(),
            width: self.state.window.width.to_bits(),
            opacity: self.state.effective_overlay_opacity().to_bits(),
            overlay_generation: self.overlay_generation,
        };

        let slot = plane_index(plane);
        if let Some((cached_key, handle)) = &self.textures[slot]
            && *cached_key == key
        {
            return Some(handle.clone());
        }

        let image = render::compose_slice(
            &loaded.volume,
            self.overlay.as_ref(),
            self.state.effective_overlay_opacity(),
            index,
            plane,
            &self.state.window,
            Interpolation::Bilinear,
        )?;
        let handle = ctx.load_texture(
            format!("slice-{}", plane.label()),
            render::to_color_image(&image),
            TextureOptions::LINEAR,
        );
        self.textures[slot] = Some((key, handle.clone()));
        Some(handle)
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        if self.loaded.is_none() {
            return;
        }
        let (step_up, step_down, jump_start, jump_end, scroll) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowUp) || i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowDown) || i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::Home),
                i.key_pressed(egui::Key::End),
                i.raw_scroll_delta.y,
            )
        });

        if step_up {
            self.step_active_cursor(1);
        }
        if step_down {
            self.step_active_cursor(-1);
        }
        if jump_start {
            self.set_active_cursor(0);
        }
        if jump_end {
            self.set_active_cursor(self.state.max_slice);
        }
        if scroll < 0.0 {
            self.step_active_cursor(1);
        } else if scroll > 0.0 {
            self.step_active_cursor(-1);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.first() {
            self.open_volume(path);
        }
    }

    fn home_screen(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("NIfTI Viewer");
            ui.label("Liver Metastasis Assessment Tool");
            ui.add_space(40.0);

            ui.group(|ui| {
                ui.set_width(360.0);
                ui.heading("Local Mode");
                ui.label("View NIfTI files from your computer");
                ui.label("Load local .nii or .nii.gz files, drag & drop support");
                if ui.button("Open Local Viewer").clicked() {
                    self.screen = Screen::Viewer;
                }
            });
            ui.add_space(12.0);
            ui.group(|ui| {
                ui.set_width(360.0);
                ui.heading("Research Mode");
                ui.label("Structured assessment workflow");
                ui.add_enabled(false, egui::Button::new("Coming Soon"));
            });
        });
    }

    fn empty_viewer_screen(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("⬅").clicked() {
                self.screen = Screen::Home;
            }
            ui.heading("Local Viewer");
        });
        ui.separator();

        if let Some(message) = &self.error {
            ui.colored_label(egui::Color32::LIGHT_RED, message);
        }

        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("Drag & drop a NIfTI file here");
            ui.label("Supports .nii and .nii.gz files");
            ui.add_space(16.0);
            if ui.button("Browse Files…").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("NIfTI", &["nii", "gz"])
                    .pick_file()
            {
                self.open_volume(&path);
            }
        });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label(format!(
                "Slice: {} / {}",
                self.state.current_slice + 1,
                self.state.max_slice + 1
            ));
            ui.separator();

            ui.label(format!(
                "W: {:.0} L: {:.0}",
                self.state.window.width, self.state.window.center
            ));
            let mut center = self.state.window.center;
            let mut width = self.state.window.width;
            let center_response = ui.add(DragValue::new(&mut center).prefix("L "));
            let width_response = ui.add(DragValue::new(&mut width).prefix("W "));
            if center_response.changed() || width_response.changed() {
                self.state.set_window_level(center, width);
            }
            ui.separator();

            for preset in WindowPreset::ALL {
                let selected = self.state.current_preset == Some(preset);
                if ui.selectable_label(selected, preset.label()).clicked() {
                    self.state.apply_preset(preset);
                }
            }
            ui.separator();

            for slice_type in SliceType::ALL {
                let selected = self.state.slice_type == slice_type;
                if ui.selectable_label(selected, slice_type.label()).clicked() {
                    self.state.set_slice_type(slice_type);
                    self.sync_active_plane();
                }
            }
            ui.separator();

            self.overlay_controls(ui);
        });
    }

    fn overlay_controls(&mut self, ui: &mut egui::Ui) {
        if self.overlay.is_none() {
            if ui.button("Load Segmentation").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("NIfTI", &["nii", "gz"])
                    .pick_file()
            {
                self.open_segmentation(&path);
            }
            return;
        }

        if let Some(name) = &self.state.overlay_file {
            ui.monospace(name);
        }

        let eye = if self.state.overlay_visible { "Hide" } else { "Show" };
        if ui
            .selectable_label(self.state.overlay_visible, eye)
            .clicked()
        {
            self.state
                .set_overlay_visible(!self.state.overlay_visible);
        }

        let mut opacity = self.state.overlay_opacity;
        let response = ui.add_enabled(
            self.state.overlay_visible,
            Slider::new(&mut opacity, 0.0..=1.0).text("Opacity").show_value(false),
        );
        if response.changed() {
            self.state.set_overlay_opacity(opacity);
        }
        ui.label(format!("{:.0}%", self.state.overlay_opacity * 100.0));

        if ui.button("✕").clicked() {
            self.clear_segmentation();
        }
    }

    fn plane_image(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, plane: SlicePlane) {
        if let Some(texture) = self.slice_texture(ctx, plane) {
            ui.add(
                egui::Image::new(&texture)
                    .fit_to_exact_size(ui.available_size())
                    .maintain_aspect_ratio(true),
            );
        }
    }

    fn viewer_screen(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let file_name = loaded.file_name.clone();
        let source_path = loaded.source_path.to_string_lossy().into_owned();
        let file_size_mb = loaded.file_size as f64 / 1024.0 / 1024.0;
        let info = self.state.volume_info.clone();

        ui.horizontal(|ui| {
            if ui.button("⬅").clicked() {
                self.close_volume();
                return;
            }
            ui.vertical(|ui| {
                ui.heading(&file_name).on_hover_text(&source_path);
                let mut details = format!("{file_size_mb:.2} MB");
                if let Some(info) = info {
                    details.push_str(&format!(
                        "  ·  {}×{}×{} voxels  ·  {:.2}×{:.2}×{:.2} mm",
                        info.dimensions[0],
                        info.dimensions[1],
                        info.dimensions[2],
                        info.spacing[0],
                        info.spacing[1],
                        info.spacing[2],
                    ));
                }
                ui.label(details);
            });
        });
        if self.loaded.is_none() {
            return;
        }
        self.toolbar(ui);
        if let Some(message) = &self.error {
            ui.colored_label(egui::Color32::LIGHT_RED, message);
        }
        ui.separator();

        // 1-indexed position in the UI
        let mut slider_value = self.state.current_slice + 1;
        let response = ui.add(Slider::new(&mut slider_value, 1..=self.state.max_slice + 1));
        if response.changed() {
            self.set_active_cursor(slider_value - 1);
        }

        match self.state.slice_type {
            SliceType::Multiplanar => {
                ui.columns(3, |columns| {
                    for (column, plane) in columns.iter_mut().zip(SlicePlane::ALL) {
                        column.label(plane.label());
                        self.plane_image(ctx, column, plane);
                    }
                });
            }
            _ => {
                let plane = self.active_plane();
                self.plane_image(ctx, ui, plane);
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.screen == Screen::Viewer {
            self.handle_dropped_files(ctx);
            if self.loaded.is_some() {
                self.handle_input(ctx);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Home => self.home_screen(ui),
            Screen::Viewer => {
                if self.loaded.is_some() {
                    self.viewer_screen(ctx, ui);
                } else {
                    self.empty_viewer_screen(ui);
                }
            }
        });
    }
}
