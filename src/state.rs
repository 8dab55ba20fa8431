//! In-memory session state for the viewer UI, mirroring what the toolbar and
//! overlay controls read and write. Nothing here is persisted.

use crate::enums::SliceType;
use crate::windowing::{WindowLevel, WindowPreset};

/// Shape and spacing summary shown in the viewer header.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeInfo {
    pub dimensions: [usize; 3],
    pub spacing: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    pub slice_type: SliceType,
    pub current_slice: usize,
    pub max_slice: usize,

    pub window: WindowLevel,
    pub current_preset: Option<WindowPreset>,

    pub volume_info: Option<VolumeInfo>,

    pub overlay_visible: bool,
    pub overlay_opacity: f32,
    pub overlay_file: Option<String>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            slice_type: SliceType::Axial,
            current_slice: 0,
            max_slice: 0,
            window: WindowPreset::default().window(),
            current_preset: Some(WindowPreset::default()),
            volume_info: None,
            overlay_visible: true,
            overlay_opacity: 0.5,
            overlay_file: None,
        }
    }
}

impl ViewerState {
    pub fn set_slice_type(&mut self, slice_type: SliceType) {
        self.slice_type = slice_type;
    }

    pub fn set_current_slice(&mut self, slice: usize) {
        self.current_slice = slice.min(self.max_slice);
    }

    pub fn set_max_slice(&mut self, max: usize) {
        self.max_slice = max;
        self.current_slice = self.current_slice.min(max);
    }

    /// Manual window/level adjustment leaves preset mode.
    pub fn set_window_level(&mut self, center: f32, width: f32) {
        self.window = WindowLevel::new(center, width);
        self.current_preset = None;
    }

    pub fn apply_preset(&mut self, preset: WindowPreset) {
        self.window = preset.window();
        self.current_preset = Some(preset);
    }

    pub fn set_volume_info(&mut self, info: VolumeInfo) {
        self.volume_info = Some(info);
    }

    pub fn overlay_loaded(&mut self, file_name: impl Into<String>) {
        self.overlay_file = Some(file_name.into());
        self.overlay_visible = true;
    }

    pub fn clear_overlay(&mut self) {
        self.overlay_file = None;
        self.overlay_visible = true;
        self.overlay_opacity = 0.5;
    }

    pub fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay_visible = visible;
    }

    pub fn set_overlay_opacity(&mut self, opacity: f32) {
        self.overlay_opacity = opacity.clamp(0.0, 1.0);
    }

    /// Opacity actually used for compositing (0 while hidden).
    pub fn effective_overlay_opacity(&self) -> f32 {
        if self.overlay_visible {
            self.overlay_opacity
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_abdomen_preset() {
        let state = ViewerState::default();
        assert_eq!(state.current_preset, Some(WindowPreset::Abdomen));
        assert_eq!(state.window, WindowLevel::new(65.0, 420.0));
        assert_eq!(state.slice_type, SliceType::Axial);
    }

    #[test]
    fn test_manual_window_clears_preset() {
        let mut state = ViewerState::default();
        state.set_window_level(100.0, 200.0);
        assert_eq!(state.current_preset, None);
        assert_eq!(state.window, WindowLevel::new(100.0, 200.0));

        state.apply_preset(WindowPreset::Lung);
        assert_eq!(state.current_preset, Some(WindowPreset::Lung));
    }

    #[test]
    fn test_current_slice_clamped_to_max() {
        let mut state = ViewerState::default();
        state.set_max_slice(10);
        state.set_current_slice(25);
        assert_eq!(state.current_slice, 10);

        state.set_max_slice(4);
        assert_eq!(state.current_slice, 4);
    }

    #[test]
    fn test_overlay_lifecycle() {
        let mut state = ViewerState::default();
        state.overlay_loaded("seg.nii.gz");
        state.set_overlay_visible(false);
        state.set_overlay_opacity(1.4);
        assert_eq!(state.overlay_opacity, 1.0);
        assert_eq!(state.effective_overlay_opacity(), 0.0);

        state.clear_overlay();
        assert_eq!(state.overlay_file, None);
        assert!(state.overlay_visible);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = ViewerState::default();
        state.set_window_level(0.0, 1.0);
        state.set_max_slice(99);
        state.reset();
        assert_eq!(state.current_preset, Some(WindowPreset::Abdomen));
        assert_eq!(state.max_slice, 0);
    }
}
