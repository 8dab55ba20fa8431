//! Window/level ("windowing") math and the radiology presets offered in the
//! toolbar. Values are in the units stored in the volume, Hounsfield units
//! for CT data.

/// A brightness/contrast window over voxel intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLevel {
    pub center: f32,
    pub width: f32,
}

impl WindowLevel {
    pub fn new(center: f32, width: f32) -> Self {
        Self { center, width }
    }

    /// Lower and upper display bounds (cal_min, cal_max).
    pub fn bounds(&self) -> (f32, f32) {
        let half = self.width.max(1.0) / 2.0;
        (self.center - half, self.center + half)
    }

    /// Map a voxel intensity into the 8-bit display range.
    #[inline]
    pub fn apply(&self, value: f32) -> u8 {
        let (min, max) = self.bounds();
        (((value - min) / (max - min)) * 255.0).clamp(0.0, 255.0) as u8
    }
}

impl Default for WindowLevel {
    fn default() -> Self {
        WindowPreset::default().window()
    }
}

/// CT windowing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WindowPreset {
    #[default]
    Abdomen,
    Liver,
    Bone,
    Lung,
    Brain,
    SoftTissue,
}

impl WindowPreset {
    pub const ALL: [WindowPreset; 6] = [
        WindowPreset::Abdomen,
        WindowPreset::Liver,
        WindowPreset::Bone,
        WindowPreset::Lung,
        WindowPreset::Brain,
        WindowPreset::SoftTissue,
    ];

    pub fn window(&self) -> WindowLevel {
        match self {
            WindowPreset::Abdomen => WindowLevel::new(65.0, 420.0),
            WindowPreset::Liver => WindowLevel::new(60.0, 150.0),
            WindowPreset::Bone => WindowLevel::new(300.0, 1500.0),
            WindowPreset::Lung => WindowLevel::new(-600.0, 1500.0),
            WindowPreset::Brain => WindowLevel::new(40.0, 80.0),
            WindowPreset::SoftTissue => WindowLevel::new(50.0, 350.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WindowPreset::Abdomen => "Abdomen",
            WindowPreset::Liver => "Liver",
            WindowPreset::Bone => "Bone",
            WindowPreset::Lung => "Lung",
            WindowPreset::Brain => "Brain",
            WindowPreset::SoftTissue => "Soft Tissue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_center_width() {
        let window = WindowLevel::new(65.0, 420.0);
        assert_eq!(window.bounds(), (-145.0, 275.0));
    }

    #[test]
    fn test_apply_clamps_to_display_range() {
        let window = WindowPreset::Brain.window();
        assert_eq!(window.apply(-1000.0), 0);
        assert_eq!(window.apply(1000.0), 255);
        assert_eq!(window.apply(40.0), 127);
    }

    #[test]
    fn test_zero_width_does_not_divide_by_zero() {
        let window = WindowLevel::new(0.0, 0.0);
        assert_eq!(window.apply(10.0), 255);
        assert_eq!(window.apply(-10.0), 0);
    }

    #[test]
    fn test_preset_values_match_radiology_defaults() {
        assert_eq!(WindowPreset::Lung.window(), WindowLevel::new(-600.0, 1500.0));
        assert_eq!(WindowPreset::Bone.window(), WindowLevel::new(300.0, 1500.0));
        assert_eq!(WindowPreset::SoftTissue.label(), "Soft Tissue");
    }
}
