//! Assumed real-world heights per detector label

use std::collections::HashMap;

/// Height assumed for labels the table does not know (meters)
pub const DEFAULT_HEIGHT_M: f64 = 0.6;

const BUILTIN_HEIGHTS: &[(&str, f64)] = &[
    // People and animals
    ("person", 1.70),
    ("child", 1.20),
    ("dog", 0.50),
    ("cat", 0.25),
    ("bird", 0.15),
    // Furniture
    ("couch", 0.85),
    ("sofa", 0.85),
    ("chair", 0.90),
    ("armchair", 1.00),
    ("bed", 0.60),
    ("dining table", 0.75),
    ("desk", 0.75),
    ("coffee table", 0.45),
    ("side table", 0.55),
    ("shelf", 1.60),
    ("bookcase", 1.80),
    ("wardrobe", 2.00),
    ("cabinet", 0.80),
    ("stool", 0.50),
    ("bench", 0.45),
    ("toilet", 0.45),
    // Appliances and household items
    ("tv", 0.55),
    ("monitor", 0.45),
    ("laptop", 0.25),
    ("refrigerator", 1.75),
    ("microwave", 0.35),
    ("oven", 0.85),
    ("stove", 0.85),
    ("sink", 0.85),
    ("washing machine", 0.85),
    ("vacuum cleaner", 1.00),
    ("clock", 0.30),
    ("vase", 0.35),
    ("potted plant", 0.70),
    ("lamp", 0.50),
    ("chandelier", 0.70),
    ("trash can", 0.50),
    ("bucket", 0.35),
    ("backpack", 0.50),
    ("handbag", 0.30),
    // Vehicles
    ("car", 1.50),
    ("suv", 1.70),
    ("van", 2.00),
    ("truck", 3.00),
    ("bus", 3.20),
    ("bicycle", 1.00),
    ("motorcycle", 1.10),
    ("scooter", 1.00),
    // Street furniture
    ("fire hydrant", 0.80),
    ("stop sign", 2.50),
    ("traffic light", 4.00),
    ("parking meter", 1.30),
    ("bench (outdoor)", 0.80),
    ("mailbox", 1.20),
    ("street light", 6.00),
    ("tree", 5.00),
    ("fence", 1.20),
    // Building features
    ("door", 2.05),
    ("window", 1.20),
    ("stairs", 1.00),
    ("elevator", 2.20),
];

/// Label to height lookup.
///
/// Keys are matched exactly: `"bench"` and `"bench (outdoor)"` are distinct
/// entries and no case folding or trimming happens.
#[derive(Debug, Clone)]
pub struct ReferenceHeightTable {
    heights: HashMap<String, f64>,
    default_height_m: f64,
}

impl Default for ReferenceHeightTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceHeightTable {
    /// Table with the built-in entries and the 0.6m fallback
    pub fn builtin() -> Self {
        Self {
            heights: BUILTIN_HEIGHTS
                .iter()
                .map(|(label, h)| (label.to_string(), *h))
                .collect(),
            default_height_m: DEFAULT_HEIGHT_M,
        }
    }

    /// Replace the fallback height
    pub fn with_default_height(mut self, default_height_m: f64) -> Self {
        self.default_height_m = default_height_m;
        self
    }

    /// Add or replace entries; later entries win
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (label, height) in overrides {
            self.heights.insert(label.into(), height);
        }
        self
    }

    /// Assumed height for `label`, or the fallback when unknown
    pub fn height_for(&self, label: &str) -> f64 {
        self.heights
            .get(label)
            .copied()
            .unwrap_or(self.default_height_m)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.heights.contains_key(label)
    }

    pub fn default_height_m(&self) -> f64 {
        self.default_height_m
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
