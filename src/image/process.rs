//! Decode → fit → lossless WebP.

use std::fs;
use std::path::Path;

use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use rayon::prelude::*;

use super::asset::{Dimensions, ImageAsset, ImageRef, ImageRole};
use crate::config::ImageConfig;
use crate::error::{PostError, Result};
use crate::layout::{Layout, Tree};
use crate::logger::ProgressLine;
use crate::debug;

/// Source extensions accepted before decoding is attempted.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Whether a write touched the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    /// Destination already held identical bytes.
    Unchanged,
}

/// Produces WebP derivatives for the preview and export trees.
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    layout: Layout,
    header_max: Dimensions,
    body_max: Dimensions,
    body_min: Dimensions,
}

impl ImagePipeline {
    pub fn new(layout: Layout, config: &ImageConfig) -> Self {
        Self {
            layout,
            header_max: config.header,
            body_max: config.body,
            body_min: config.body_min,
        }
    }

    pub const fn max_for(&self, role: ImageRole) -> Dimensions {
        match role {
            ImageRole::Header => self.header_max,
            ImageRole::Body => self.body_max,
        }
    }

    /// Take a user-picked source into the preview tree.
    ///
    /// Derives the [`ImageRef`] from the source bytes. Body images smaller
    /// than the configured minimum are rejected.
    pub fn import(&self, source: &Path, role: ImageRole) -> Result<ImageRef> {
        let bytes = read_source(source)?;
        let image = ImageRef::from_bytes(role, &bytes);
        let decoded = decode(source, &bytes)?;

        if role == ImageRole::Body {
            let size = Dimensions::new(decoded.width(), decoded.height());
            if !size.covers(self.body_min) {
                return Err(PostError::validation(format!(
                    "image too small for article body (min {}), got {}",
                    self.body_min, size
                )));
            }
        }

        let asset = ImageAsset::new(
            &self.layout,
            source,
            image.clone(),
            Tree::Preview,
            self.max_for(role),
        )?;
        encode_to(&asset, &decoded)?;
        Ok(image)
    }

    /// Produce one derivative of `source` in `tree`, fitted into `max`.
    ///
    /// Same source + same tree ⇒ same destination and bytes.
    pub fn process(
        &self,
        source: &Path,
        tree: Tree,
        image: &ImageRef,
        max: Dimensions,
    ) -> Result<(ImageAsset, Outcome)> {
        let asset = ImageAsset::new(&self.layout, source, image.clone(), tree, max)?;
        let bytes = read_source(source)?;
        let decoded = decode(source, &bytes)?;
        let outcome = encode_to(&asset, &decoded)?;
        Ok((asset, outcome))
    }

    /// Re-derive export-tree images from their preview derivatives.
    ///
    /// Runs on the rayon pool; results come back in input order. Every
    /// failure is logged, the first one is returned.
    pub fn materialize(&self, images: &[ImageRef]) -> Result<Vec<ImageAsset>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let progress = ProgressLine::new("export", &[("images", images.len())]);
        let results: Vec<Result<ImageAsset>> = images
            .par_iter()
            .map(|image| {
                let source = self.layout.image_path(Tree::Preview, image)?;
                if !source.is_file() {
                    return Err(PostError::validation(format!(
                        "preview image `{}` is missing, add the image again",
                        image.file_name()
                    )));
                }
                let result = self.process(&source, Tree::Export, image, self.max_for(image.role));
                progress.inc("images");
                result.map(|(asset, outcome)| {
                    debug!("image"; "{} {:?}", asset.image, outcome);
                    asset
                })
            })
            .collect();
        progress.finish();

        let mut assets = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    crate::log!("error"; "{}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(assets),
        }
    }
}

fn read_source(source: &Path) -> Result<Vec<u8>> {
    let supported = source
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if !supported {
        return Err(PostError::unsupported(
            source,
            "unsupported extension (allowed: .jpg, .jpeg, .png, .webp)",
        ));
    }
    if !source.is_file() {
        return Err(PostError::validation(format!(
            "image not found: {}",
            source.display()
        )));
    }
    fs::read(source).map_err(|e| PostError::io(source, e))
}

fn decode(source: &Path, bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| PostError::unsupported(source, e.to_string()))
}

/// Fit, encode and write unless the destination already matches.
fn encode_to(asset: &ImageAsset, decoded: &DynamicImage) -> Result<Outcome> {
    let size = Dimensions::new(decoded.width(), decoded.height());
    let target = size.fit_within(asset.max);

    let resized;
    let pixels = if target == size {
        decoded
    } else {
        resized = decoded.resize_exact(target.width, target.height, FilterType::Lanczos3);
        &resized
    };

    let bytes = encode_webp(pixels).map_err(|e| PostError::Encode {
        path: asset.source.clone(),
        reason: e.to_string(),
    })?;
    write_if_changed(&asset.destination, &bytes)
}

/// Lossless encoding keeps output bytes a pure function of the pixels.
fn encode_webp(image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    WebPEncoder::new_lossless(&mut out).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

fn write_if_changed(path: &Path, bytes: &[u8]) -> Result<Outcome> {
    if fs::read(path).is_ok_and(|existing| existing == bytes) {
        return Ok(Outcome::Unchanged);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PostError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| PostError::io(path, e))?;
    Ok(Outcome::Written)
}
