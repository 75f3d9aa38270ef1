use desktop::media;
use genimage::ImageData;
use std::path::Path;

fn png_bytes() -> Vec<u8> {
    let mut img = image::RgbaImage::new(2, 3);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[test]
fn mime_detection_is_extension_based_and_case_insensitive() {
    assert_eq!(
        media::mime_type_for_path(Path::new("/tmp/photo.PNG")),
        Some("image/png")
    );
    assert_eq!(
        media::mime_type_for_path(Path::new("/tmp/photo.jpeg")),
        Some("image/jpeg")
    );
    assert_eq!(media::mime_type_for_path(Path::new("/tmp/notes.txt")), None);
    assert_eq!(media::mime_type_for_path(Path::new("/tmp/no_extension")), None);
}

#[test]
fn uploaded_image_carries_base64_of_the_file_bytes() {
    let bytes = png_bytes();
    let path = std::env::temp_dir().join(format!("media-test-{}.png", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();

    let uploaded = media::load_uploaded_image(&path, "image/png").unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(uploaded.path, path);
    assert_eq!(uploaded.image.mime_type, "image/png");
    assert_eq!(uploaded.image.data, encode(&bytes));
}

#[test]
fn payload_decodes_to_a_color_image_with_matching_dimensions() {
    let data = ImageData::new("image/png", encode(&png_bytes()));

    let color_image = media::color_image_from_data(&data).unwrap();

    assert_eq!(color_image.size, [2, 3]);
    assert_eq!(color_image.pixels[0], egui::Color32::from_rgb(255, 0, 0));
}

#[test]
fn invalid_payloads_are_rejected_with_a_message() {
    let bad_base64 = ImageData::new("image/png", "not base64!!");
    let err = media::color_image_from_data(&bad_base64).unwrap_err();
    assert!(err.contains("Invalid image payload"));

    let not_an_image = ImageData::new("image/png", encode(b"plain text"));
    let err = media::color_image_from_data(&not_an_image).unwrap_err();
    assert!(err.contains("Could not decode image"));
}

#[test]
fn save_writes_the_decoded_bytes_verbatim() {
    let bytes = png_bytes();
    let data = ImageData::new("image/png", encode(&bytes));
    let path = std::env::temp_dir().join(format!("media-save-{}.png", std::process::id()));

    media::save_image_data(&data, &path).unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, bytes);
}

#[test]
fn extension_suggestions_follow_the_mime_type() {
    assert_eq!(media::extension_for_mime("image/jpeg"), "jpg");
    assert_eq!(media::extension_for_mime("image/png"), "png");
    // Unknown types fall back to png.
    assert_eq!(media::extension_for_mime("application/pdf"), "png");
}
