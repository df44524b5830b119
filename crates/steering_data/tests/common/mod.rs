#![allow(dead_code)]

use anyhow::Result;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// One row of a fixture dataset.
pub struct Row {
    pub filename: &'static str,
    pub action: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Rows of the standard fixture: a left turn, a right turn and a straight run.
pub fn default_rows() -> Vec<Row> {
    vec![
        Row {
            filename: "000001.png",
            action: "[0.5, -0.25, 1, 0]",
            width: 120,
            height: 100,
        },
        Row {
            filename: "000002.png",
            action: "[0.75, 0.1, 0, 1]",
            width: 96,
            height: 96,
        },
        Row {
            filename: "000003.png",
            action: "[1.0, 0.0, 0, 0]",
            width: 64,
            height: 80,
        },
    ]
}

/// Image with a grey road band on the bottom half and a red marker at the top-left.
pub fn road_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if x == 0 && y == 0 {
            Rgb([255, 0, 0])
        } else if y >= height / 2 {
            Rgb([150, 150, 150])
        } else {
            Rgb([30, 90, 200])
        }
    })
}

/// Writes `<root>/images/*.png` and `<root>/data_log.csv` into a temporary directory.
pub fn write_dataset(rows: &[Row]) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let images = dir.path().join("images");
    fs::create_dir(&images)?;

    let mut writer = csv::Writer::from_path(dir.path().join("data_log.csv"))?;
    writer.write_record(["image_filename", "action"])?;
    for row in rows {
        road_image(row.width, row.height).save(images.join(row.filename))?;
        writer.write_record([row.filename, row.action])?;
    }
    writer.flush()?;
    Ok(dir)
}

/// Overwrites an image with bytes no decoder accepts.
pub fn corrupt_image(root: &Path, filename: &str) -> Result<()> {
    fs::write(root.join("images").join(filename), b"not an image")?;
    Ok(())
}
