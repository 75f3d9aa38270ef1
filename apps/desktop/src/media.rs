use anyhow::{Context as _, Result};
use base64::Engine;
use eframe::egui;
use genimage::ImageData;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// A user-selected image: where it came from plus its encoded payload.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub path: PathBuf,
    pub image: ImageData,
}

/// MIME type for a path, by extension. `None` means the file is not a
/// supported image and the caller must reject it with a user-facing message.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "png",
    }
}

/// Read a file and wrap its bytes as a base64 payload. The MIME type must
/// already be validated; this only fails when the read itself fails.
pub fn load_uploaded_image(path: &Path, mime_type: &str) -> Result<UploadedImage> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(UploadedImage {
        path: path.to_path_buf(),
        image: ImageData::new(mime_type, data),
    })
}

pub fn color_image_from_data(data: &ImageData) -> Result<egui::ColorImage, String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.data.as_bytes())
        .map_err(|err| format!("Invalid image payload: {err}"))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| format!("Could not decode image: {err}"))?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}

pub fn texture_from_image(
    ctx: &egui::Context,
    name: &str,
    data: &ImageData,
) -> Result<egui::TextureHandle, String> {
    let color_image = color_image_from_data(data)?;
    Ok(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

/// Decode a payload and write its bytes to disk verbatim.
pub fn save_image_data(data: &ImageData, path: &Path) -> Result<()> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.data.as_bytes())
        .context("decode image payload")?;
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
