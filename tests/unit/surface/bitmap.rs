use super::*;

#[test]
fn from_rgba8_checks_length() {
    let bounds = Region::from_origin_size(0, 0, 2, 2);
    assert!(Bitmap::from_rgba8(bounds, vec![0; 15]).is_err());
    assert!(Bitmap::from_rgba8(bounds, vec![0; 16]).is_ok());
}

#[test]
fn pixel_reads_in_canvas_space() {
    let bounds = Region::from_origin_size(10, 20, 2, 1);
    let bmp = Bitmap::from_rgba8(bounds, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(bmp.pixel(10, 20), Some(Rgba8::new(1, 2, 3, 4)));
    assert_eq!(bmp.pixel(11, 20), Some(Rgba8::new(5, 6, 7, 8)));
    assert_eq!(bmp.pixel(0, 0), None);
    assert_eq!(bmp.pixel(12, 20), None);
    assert_eq!(bmp.pixel(10, 21), None);
}

#[test]
fn with_origin_moves_bounds_only() {
    let bmp = Bitmap::filled(Region::from_origin_size(0, 0, 3, 2), Rgba8::opaque(9, 9, 9)).unwrap();
    let moved = bmp.clone().with_origin(-1, 4).unwrap();
    assert_eq!(moved.bounds(), Region::from_origin_size(-1, 4, 3, 2));
    assert_eq!(moved.as_bytes(), bmp.as_bytes());
    assert_eq!(moved.pixel(-1, 4), Some(Rgba8::opaque(9, 9, 9)));
}

#[test]
fn set_writes_only_inside_bounds() {
    let mut bmp = Bitmap::filled(Region::from_origin_size(0, 0, 2, 2), Rgba8::TRANSPARENT).unwrap();
    assert!(bmp.set(1, 1, Rgba8::opaque(1, 2, 3)));
    assert!(!bmp.set(2, 0, Rgba8::opaque(1, 2, 3)));
    assert_eq!(bmp.pixel(1, 1), Some(Rgba8::opaque(1, 2, 3)));
    assert_eq!(&bmp.as_bytes()[12..16], &[1, 2, 3, 255]);
    assert_eq!(&bmp.as_bytes()[0..12], &[0; 12]);
}

#[test]
fn with_origin_rejects_coordinates_past_i32() {
    let bounds = Region::from_origin_size(0, 0, 2, 2);
    let bmp = Bitmap::from_rgba8(bounds, (0..16).collect()).unwrap();

    let err = bmp.clone().with_origin(i32::MAX - 1, 0).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
    assert!(bmp.clone().with_origin(0, i32::MAX).is_err());

    let edge = bmp.with_origin(i32::MAX - 2, 0).unwrap();
    assert_eq!(edge.bounds().width(), 2);
    assert_eq!(edge.pixel(i32::MAX - 2, 1), Some(Rgba8::new(8, 9, 10, 11)));
}

#[test]
fn filled_matches_bounds_and_empty_has_no_pixels() {
    let bmp = Bitmap::filled(Region::from_origin_size(-2, 3, 3, 1), Rgba8::opaque(4, 5, 6)).unwrap();
    assert_eq!(bmp.as_bytes().len(), 12);
    assert_eq!(bmp.pixel(0, 3), Some(Rgba8::opaque(4, 5, 6)));

    let empty = Bitmap::empty_at(7, 8);
    assert!(empty.bounds().is_empty());
    assert_eq!(empty.pixel(7, 8), None);
    assert!(empty.as_bytes().is_empty());
}
