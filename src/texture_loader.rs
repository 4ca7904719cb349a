use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::{debug, warn};

use crate::error::{Result, SlideshowError};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Image files directly inside `dir`, sorted by file name.
pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SlideshowError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SlideshowError::io(dir, e))?.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(SlideshowError::NoImages { path: dir.to_path_buf() });
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(str::to_lowercase)
}

/// EXIF orientation tag of a JPEG, 1 (upright) when absent or unreadable.
pub fn exif_orientation(bytes: &[u8]) -> u16 {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("no usable EXIF data: {}", e);
            return 1;
        }
    };

    match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
        Some(Value::Short(values)) => values.first().copied().unwrap_or(1),
        _ => 1,
    }
}

/// Quarter turns clockwise needed to show an image upright.
/// 3 = upside down, 6 = rotated left, 8 = rotated right. Mirrored variants
/// are shown as stored.
pub fn clockwise_quarter_turns(orientation: u16) -> u8 {
    match orientation {
        3 => 2,
        6 => 1,
        8 => 3,
        _ => 0,
    }
}

/// Decodes an image file into a GPU texture with its EXIF rotation baked in.
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path).map_err(|e| SlideshowError::io(image_path, e))?;
    let extension = extension_of(image_path).unwrap_or_default();

    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(&file_bytes)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&format!(".{}", extension), &file_bytes)
        .map_err(|e| SlideshowError::image(image_path, e))?;

    match clockwise_quarter_turns(orientation) {
        3 => image.rotate_ccw(),
        turns => {
            for _ in 0..turns {
                image.rotate_cw();
            }
        }
    }
    if orientation != 1 {
        debug!(path = ?image_path, orientation, "applied EXIF rotation");
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| SlideshowError::image(image_path, e))?;

    if texture.width() == 0 || texture.height() == 0 {
        warn!(path = ?image_path, "image decoded to an empty texture");
    }
    Ok(texture)
}
