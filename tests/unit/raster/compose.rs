use std::collections::HashMap;
use std::io::Cursor;

use super::*;
use crate::{
    catalog::model::{CatalogItem, CatalogItemId, Category},
    foundation::core::{CanvasSize, Point},
    foundation::error::CharmloomError,
};

/// In-memory fetcher serving pre-encoded images by reference.
struct MapFetcher {
    images: HashMap<String, Vec<u8>>,
}

#[async_trait::async_trait]
impl ImageFetcher for MapFetcher {
    async fn fetch(&self, image_ref: &str) -> crate::foundation::error::CharmloomResult<Vec<u8>> {
        self.images
            .get(image_ref)
            .cloned()
            .ok_or_else(|| CharmloomError::transport(format!("no such image '{image_ref}'")))
    }
}

fn png_bytes(r: u8, g: u8, b: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([r, g, b, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn charm(id: &str, image_ref: &str) -> CatalogItem {
    CatalogItem {
        id: CatalogItemId(id.to_string()),
        name: id.to_string(),
        category: Category::Charm,
        price: 10.0,
        image_ref: image_ref.to_string(),
        owner_id: None,
    }
}

fn fetcher() -> MapFetcher {
    let mut images = HashMap::new();
    images.insert("/img/t.png".to_string(), png_bytes(0, 255, 0));
    images.insert("/img/red.png".to_string(), png_bytes(255, 0, 0));
    images.insert("/img/blue.png".to_string(), png_bytes(0, 0, 255));
    MapFetcher { images }
}

fn opts() -> RasterizerOpts {
    RasterizerOpts {
        buffer_width: 100,
        buffer_height: 100,
        jpeg_quality: 90,
    }
}

#[tokio::test]
async fn zero_area_buffer_resolves_empty_not_error() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    let session = DesignSession::new(canvas, "/img/t.png");
    let out = rasterize(
        &session,
        &fetcher(),
        &RasterizerOpts {
            buffer_width: 0,
            buffer_height: 100,
            jpeg_quality: 90,
        },
    )
    .await
    .unwrap();
    assert!(out.is_none());
}

#[tokio::test]
async fn capture_is_deterministic_for_a_fixed_session() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    let mut session = DesignSession::new(canvas, "/img/t.png");
    session
        .place(&charm("c1", "/img/red.png"), Point::new(30.0, 30.0))
        .unwrap();

    let f = fetcher();
    let a = rasterize(&session, &f, &opts()).await.unwrap().unwrap();
    let b = rasterize(&session, &f, &opts()).await.unwrap().unwrap();

    assert_eq!((a.width, a.height), (100, 100));
    assert_eq!((a.width, a.height), (b.width, b.height));
    assert_eq!(a.jpeg, b.jpeg);
}

#[tokio::test]
async fn later_placements_occlude_earlier_ones() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    let mut session = DesignSession::new(canvas, "/img/t.png");
    // Both squares clamp to 100x100 (canvas-sized default side), fully
    // overlapping; the blue one is placed second.
    session
        .place(&charm("c1", "/img/red.png"), Point::new(50.0, 50.0))
        .unwrap();
    session
        .place(&charm("c2", "/img/blue.png"), Point::new(50.0, 50.0))
        .unwrap();

    let out = rasterize(&session, &fetcher(), &opts()).await.unwrap().unwrap();
    let decoded = image::load_from_memory(&out.jpeg).unwrap().to_rgb8();
    let px = decoded.get_pixel(50, 50);
    assert!(px[2] > 200 && px[0] < 80, "expected blue on top, got {px:?}");
}

#[tokio::test]
async fn failed_accessory_load_leaves_a_gap() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    let mut session = DesignSession::new(canvas, "/img/t.png");
    session
        .place(&charm("c1", "/img/missing.png"), Point::new(50.0, 50.0))
        .unwrap();

    let out = rasterize(&session, &fetcher(), &opts()).await.unwrap().unwrap();
    let decoded = image::load_from_memory(&out.jpeg).unwrap().to_rgb8();
    // Template still covers the buffer where the accessory failed to load.
    let px = decoded.get_pixel(50, 50);
    assert!(px[1] > 200, "expected template green, got {px:?}");
}

#[tokio::test]
async fn missing_template_falls_back_to_white_background() {
    let canvas = CanvasSize::new(100.0, 100.0).unwrap();
    let session = DesignSession::new(canvas, "/img/not-there.png");

    let out = rasterize(&session, &fetcher(), &opts()).await.unwrap().unwrap();
    let decoded = image::load_from_memory(&out.jpeg).unwrap().to_rgb8();
    let px = decoded.get_pixel(1, 1);
    assert!(px[0] > 230 && px[1] > 230 && px[2] > 230, "expected white, got {px:?}");
}

#[tokio::test]
async fn accessory_drawn_at_scaled_position() {
    // Canvas twice the buffer size: canvas (60, 60) maps to buffer (30, 30).
    let canvas = CanvasSize::new(200.0, 200.0).unwrap();
    let mut session = DesignSession::new(canvas, "/img/not-there.png");
    let id = session
        .place(&charm("c1", "/img/red.png"), Point::new(100.0, 100.0))
        .unwrap();
    session.move_to(id, 60.0, 60.0);

    let out = rasterize(&session, &fetcher(), &opts()).await.unwrap().unwrap();
    let decoded = image::load_from_memory(&out.jpeg).unwrap().to_rgb8();

    // The 150px square at (60,60) would overflow the 200px canvas, so the
    // move clamps it to (50,50); at scale 0.5 its buffer footprint is
    // [25, 100). Inside is red, the top-left corner stays white.
    let inside = decoded.get_pixel(60, 60);
    assert!(inside[0] > 200 && inside[1] < 80, "expected red, got {inside:?}");
    let outside = decoded.get_pixel(5, 5);
    assert!(outside[0] > 230 && outside[1] > 230, "expected white, got {outside:?}");
}
