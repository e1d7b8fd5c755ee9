//! Shared fixtures for orchestrator integration tests

#![allow(dead_code)]

use bytes::Bytes;
use deckvault_services::{AssetStorage, StorageConfig};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://localhost:3000/files";

/// An orchestrator over a fresh local backend; keep the `TempDir` alive for the test
pub async fn local_assets() -> (AssetStorage, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::local(dir.path().join("store"), BASE_URL).unwrap();
    let assets = AssetStorage::new(config).await.unwrap();
    (assets, dir)
}

pub fn encode(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    Bytes::from(buffer)
}

pub fn dimensions(data: &[u8]) -> (u32, u32) {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap()
}
