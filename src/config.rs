use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::compliance::DEFAULT_MAX_SUBJECTS;
use crate::{FilterOption, ImageSize};

/// Knobs of a scan run. The CLI only ever uses the defaults.
#[derive(Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub image_size: ImageSize,
    #[serde(with = "FilterOption")]
    pub filter: FilterType,
    pub max_subjects_per_day: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            image_size: ImageSize::default(),
            // bilinear, the codec's usual default
            filter: FilterType::Triangle,
            max_subjects_per_day: DEFAULT_MAX_SUBJECTS,
        }
    }
}
