use std::io::Cursor;

use anyhow::Context;
use image::{Rgba, RgbaImage, imageops};

use crate::{
    foundation::error::CharmloomResult,
    raster::fetch::ImageFetcher,
    session::placement::DesignSession,
};

/// Output buffer dimensions and encoding quality for one capture.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RasterizerOpts {
    /// Buffer width in pixels.
    pub buffer_width: u32,
    /// Buffer height in pixels.
    pub buffer_height: u32,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for RasterizerOpts {
    fn default() -> Self {
        Self {
            buffer_width: 800,
            buffer_height: 800,
            jpeg_quality: 90,
        }
    }
}

/// Flattened capture of a design session.
#[derive(Clone, Debug)]
pub struct RasterImage {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// JPEG-encoded pixels. Raw payload only; callers that need a data URI
    /// add their own prefix.
    pub jpeg: Vec<u8>,
}

/// Render the session's template plus all placements into a single flattened
/// JPEG buffer suitable for network transmission.
///
/// The template and every placed accessory are fetched and decoded as
/// independently awaited concurrent loads; the composite is drawn only after
/// every constituent has resolved. A failed individual load leaves a gap in
/// the composite rather than stalling or aborting the capture. Accessories
/// are drawn strictly in placement order, so later placements occlude earlier
/// ones where they overlap.
///
/// Returns `Ok(None)` when no renderable buffer can be produced (zero-area
/// dimensions): capture failure is a recoverable, reportable condition, not
/// fatal. Each invocation owns its buffer, so concurrent captures do not
/// interfere.
#[tracing::instrument(skip(session, fetcher))]
pub async fn rasterize(
    session: &DesignSession,
    fetcher: &dyn ImageFetcher,
    opts: &RasterizerOpts,
) -> CharmloomResult<Option<RasterImage>> {
    if opts.buffer_width == 0 || opts.buffer_height == 0 {
        return Ok(None);
    }

    let refs: Vec<&str> = std::iter::once(session.template_image())
        .chain(session.placements().iter().map(|p| p.image_ref.as_str()))
        .collect();

    // Counted barrier over the template plus each accessory: every load
    // resolves exactly once, success or failure.
    let loads = refs.iter().map(|r| load_image(fetcher, r));
    let mut images = futures::future::join_all(loads).await;
    let template = images.remove(0);

    let mut buffer = RgbaImage::from_pixel(
        opts.buffer_width,
        opts.buffer_height,
        Rgba([255, 255, 255, 255]),
    );

    // Background first, stretched to the full buffer. The template may have
    // transparent edges, hence the white fill above.
    if let Some(img) = template {
        let stretched = imageops::resize(
            &img,
            opts.buffer_width,
            opts.buffer_height,
            imageops::FilterType::Triangle,
        );
        imageops::overlay(&mut buffer, &stretched, 0, 0);
    }

    let scale = f64::from(opts.buffer_width) / session.canvas().width;
    for (placement, img) in session.placements().iter().zip(images) {
        let Some(img) = img else {
            tracing::warn!(image_ref = %placement.image_ref, "accessory image missing from composite");
            continue;
        };
        let side_px = (placement.side * scale).round().max(1.0) as u32;
        let scaled = imageops::resize(&img, side_px, side_px, imageops::FilterType::Triangle);
        imageops::overlay(
            &mut buffer,
            &scaled,
            (placement.pos.x * scale).round() as i64,
            (placement.pos.y * scale).round() as i64,
        );
    }

    let jpeg = encode_jpeg(&buffer, opts.jpeg_quality)?;
    Ok(Some(RasterImage {
        width: opts.buffer_width,
        height: opts.buffer_height,
        jpeg,
    }))
}

async fn load_image(fetcher: &dyn ImageFetcher, image_ref: &str) -> Option<RgbaImage> {
    let bytes = match fetcher.fetch(image_ref).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(%image_ref, %err, "image fetch failed");
            return None;
        }
    };
    match image::load_from_memory(&bytes) {
        Ok(img) => Some(img.to_rgba8()),
        Err(err) => {
            tracing::debug!(%image_ref, %err, "image decode failed");
            None
        }
    }
}

fn encode_jpeg(buffer: &RgbaImage, quality: u8) -> CharmloomResult<Vec<u8>> {
    let mut out = Vec::new();
    let rgb = image::DynamicImage::ImageRgba8(buffer.clone()).to_rgb8();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut out), quality);
    rgb.write_with_encoder(encoder)
        .context("encode capture to jpeg")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/compose.rs"]
mod tests;
