use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::grid::{calculate_grid, cell_span};
use crate::error::PackError;

pub const GUIDE_FILE: &str = "print_guide_with_lines.png";
pub const PACK_FILE: &str = "puzzle_pack.zip";
pub const PIECES_DIR: &str = "pieces";
pub const ARCHIVE_PIECES_DIR: &str = "individual_pieces";
pub const MAX_PIECES: u32 = 5000;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Debug)]
pub struct PuzzlePack {
    pub rows: u32,
    pub cols: u32,
    pub zip_path: PathBuf,
}

/// Cuts `image_bytes` into about `pieces` tiles under `session_dir`, draws
/// the print guide and zips both into [`PACK_FILE`].
///
/// `pieces` may not exceed [`MAX_PIECES`] or the pixel count of the image.
pub fn build_pack(
    image_bytes: &[u8],
    pieces: u32,
    session_dir: &Path,
) -> Result<PuzzlePack, PackError> {
    let original = image::load_from_memory(image_bytes)
        .map_err(PackError::Decode)?
        .to_rgba8();
    let (width, height) = original.dimensions();
    if pieces > MAX_PIECES || u64::from(pieces) > u64::from(width) * u64::from(height) {
        return Err(PackError::PieceCount {
            pieces,
            width,
            height,
        });
    }

    // every tile keeps at least one pixel on each side
    let (rows, cols) = calculate_grid(width, height, pieces);
    let (rows, cols) = (rows.min(height), cols.min(width));
    debug!(width, height, rows, cols, "cutting puzzle");

    let pieces_dir = session_dir.join(PIECES_DIR);
    fs::create_dir_all(&pieces_dir)?;

    let mut entries = Vec::new();
    for r in 0..rows {
        let (y0, y1) = cell_span(r, rows, height);
        for c in 0..cols {
            let (x0, x1) = cell_span(c, cols, width);
            let piece =
                image::imageops::crop_imm(&original, x0, y0, x1 - x0, y1 - y0).to_image();
            let name = format!("piece_{r}_{c}.png");
            let path = pieces_dir.join(&name);
            piece.save(&path)?;
            entries.push((format!("{ARCHIVE_PIECES_DIR}/{name}"), path));
        }
    }

    let guide_path = session_dir.join(GUIDE_FILE);
    draw_guide(original, rows, cols).save(&guide_path)?;
    entries.insert(0, (GUIDE_FILE.to_string(), guide_path));

    let zip_path = session_dir.join(PACK_FILE);
    write_zip(&zip_path, &entries)?;

    Ok(PuzzlePack { rows, cols, zip_path })
}

/// Draws every interior cut line as a 3px white band with a 1px black core,
/// so the lines show up on light and dark images alike.
pub fn draw_guide(mut img: RgbaImage, rows: u32, cols: u32) -> RgbaImage {
    let (width, height) = img.dimensions();
    let piece_w = width as f64 / cols as f64;
    let piece_h = height as f64 / rows as f64;

    for c in 1..cols {
        let x = (c as f64 * piece_w) as u32;
        vertical_line(&mut img, x, 1, WHITE);
        vertical_line(&mut img, x, 0, BLACK);
    }
    for r in 1..rows {
        let y = (r as f64 * piece_h) as u32;
        horizontal_line(&mut img, y, 1, WHITE);
        horizontal_line(&mut img, y, 0, BLACK);
    }
    img
}

fn vertical_line(img: &mut RgbaImage, x: u32, half: u32, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    for px in x.saturating_sub(half)..=(x + half).min(width.saturating_sub(1)) {
        for py in 0..height {
            img.put_pixel(px, py, color);
        }
    }
}

fn horizontal_line(img: &mut RgbaImage, y: u32, half: u32, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    for py in y.saturating_sub(half)..=(y + half).min(height.saturating_sub(1)) {
        for px in 0..width {
            img.put_pixel(px, py, color);
        }
    }
}

fn write_zip(zip_path: &Path, entries: &[(String, PathBuf)]) -> Result<(), PackError> {
    let mut writer = ZipWriter::new(File::create(zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, path) in entries {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(&fs::read(path)?)?;
    }
    writer.finish()?;
    Ok(())
}
