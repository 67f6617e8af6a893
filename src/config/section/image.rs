//! `[image]` section configuration.
//!
//! ```toml
//! [image]
//! header = { width = 1900, height = 800 }    # hero image bounding box
//! body = { width = 778, height = 514 }       # article image bounding box
//! body_min = { width = 778, height = 514 }   # smallest accepted article image
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::image::Dimensions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub header: Dimensions,
    pub body: Dimensions,
    pub body_min: Dimensions,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            header: Dimensions::new(1900, 800),
            body: Dimensions::new(778, 514),
            body_min: Dimensions::new(778, 514),
        }
    }
}

impl ImageConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, dims) in [("image.header", self.header), ("image.body", self.body)] {
            if dims.is_empty() {
                diag.error(field, format!("{dims} has a zero side"));
            }
        }
    }
}
