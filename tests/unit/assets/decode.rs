use std::io::Cursor;

use super::*;
use crate::foundation::core::Rgba8;
use crate::surface::bitmap::PixelSource;

fn encode_png(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_keeps_straight_alpha_channels() {
    let buf = encode_png(2, 1, vec![100, 50, 200, 128, 7, 8, 9, 0]);
    let bmp = decode_layer_image(&buf).unwrap();
    assert_eq!(bmp.bounds(), Region::from_origin_size(0, 0, 2, 1));
    assert_eq!(bmp.pixel(0, 0), Some(Rgba8::new(100, 50, 200, 128)));
    assert_eq!(bmp.pixel(1, 0), Some(Rgba8::new(7, 8, 9, 0)));
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_layer_image(b"not an image").is_err());
}

#[test]
fn load_missing_file_is_asset_error() {
    let err = load_layer_image(Path::new("target/definitely/missing.png")).unwrap_err();
    assert!(err.to_string().contains("asset error:"));
}
