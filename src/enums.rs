/// One of the three orthogonal anatomical slice planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlicePlane {
    Axial,
    Coronal,
    Sagittal,
}

impl SlicePlane {
    pub const ALL: [SlicePlane; 3] = [SlicePlane::Axial, SlicePlane::Coronal, SlicePlane::Sagittal];

    pub fn label(&self) -> &'static str {
        match self {
            SlicePlane::Axial => "Axial",
            SlicePlane::Coronal => "Coronal",
            SlicePlane::Sagittal => "Sagittal",
        }
    }
}

/// View layout selected in the toolbar. Multiplanar shows all three planes
/// side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliceType {
    #[default]
    Axial,
    Coronal,
    Sagittal,
    Multiplanar,
}

impl SliceType {
    pub const ALL: [SliceType; 4] = [
        SliceType::Axial,
        SliceType::Coronal,
        SliceType::Sagittal,
        SliceType::Multiplanar,
    ];

    /// The single plane shown by this layout, if there is exactly one.
    pub fn plane(&self) -> Option<SlicePlane> {
        match self {
            SliceType::Axial => Some(SlicePlane::Axial),
            SliceType::Coronal => Some(SlicePlane::Coronal),
            SliceType::Sagittal => Some(SlicePlane::Sagittal),
            SliceType::Multiplanar => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SliceType::Axial => "Axial",
            SliceType::Coronal => "Coronal",
            SliceType::Sagittal => "Sagittal",
            SliceType::Multiplanar => "Multiplanar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    None,
    #[default]
    Bilinear,
}
