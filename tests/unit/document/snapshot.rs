use std::io::Cursor;
use std::path::PathBuf;

use super::*;
use crate::foundation::core::Region;

fn solid(w: u32, h: u32, c: Rgba8) -> Arc<dyn PixelSource> {
    Arc::new(Bitmap::filled(Region::from_origin_size(0, 0, w, h), c).unwrap())
}

const CANVAS: Canvas = Canvas {
    width: 2,
    height: 2,
};

#[test]
fn new_resolves_opcode_from_name() {
    let layer = LayerSnapshot::new("glow**2", solid(1, 1, Rgba8::TRANSPARENT));
    assert_eq!(layer.opcode(), Opcode::Add);
    assert!(layer.visible());
    let layer = layer.with_opcode(Opcode::Copy).with_visible(false);
    assert_eq!(layer.opcode(), Opcode::Copy);
    assert!(!layer.visible());
    assert_eq!(layer.name(), "glow**2");
}

#[test]
fn new_rejects_bad_active_layer_and_canvas() {
    let layers = vec![LayerSnapshot::new("a", solid(1, 1, Rgba8::TRANSPARENT))];
    assert!(DocumentSnapshot::new(CANVAS, layers.clone(), 2).is_err());
    assert!(DocumentSnapshot::new(CANVAS, layers.clone(), 1).is_ok());
    let empty = Canvas {
        width: 0,
        height: 2,
    };
    assert!(DocumentSnapshot::new(empty, layers, 0).is_err());
}

#[test]
fn composited_layers_stop_below_active_and_skip_hidden() {
    let layers = vec![
        LayerSnapshot::new("a", solid(1, 1, Rgba8::TRANSPARENT)),
        LayerSnapshot::new("b", solid(1, 1, Rgba8::TRANSPARENT)).with_visible(false),
        LayerSnapshot::new("c", solid(1, 1, Rgba8::TRANSPARENT)),
        LayerSnapshot::new("active", solid(1, 1, Rgba8::TRANSPARENT)),
        LayerSnapshot::new("above", solid(1, 1, Rgba8::TRANSPARENT)),
    ];
    let snap = DocumentSnapshot::new(CANVAS, layers, 3).unwrap();
    let names: Vec<_> = snap.composited_layers().map(|l| l.name()).collect();
    assert_eq!(names, ["a", "c"]);
    assert_eq!(snap.layers().len(), 5);
}

#[test]
fn snapshot_is_detached_from_later_edits() {
    let mut layers = vec![LayerSnapshot::new("a**1", solid(1, 1, Rgba8::TRANSPARENT))];
    let snap = DocumentSnapshot::with_all_layers(CANVAS, layers.clone()).unwrap();
    layers[0] = layers[0].clone().with_opcode(Opcode::Subtract);
    assert_eq!(snap.layers()[0].opcode(), Opcode::Average);
}

fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
    let img = image::RgbaImage::from_raw(w, h, px.repeat((w * h) as usize)).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn load_reads_layers_below_active_with_offsets() {
    let dir = PathBuf::from("target").join("unit_snapshot_load");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("bg.png"), 2, 2, [10, 20, 30, 255]);
    write_png(&dir.join("fx.png"), 1, 1, [200, 0, 0, 255]);

    let doc = Document::from_json_str(
        r##"{
          "canvas": { "width": 2, "height": 2 },
          "background": "#ffffff",
          "active_layer": 2,
          "layers": [
            { "name": "bg", "source": "bg.png" },
            { "name": "fx", "source": "fx.png", "offset": [1, 1], "op": "add" },
            { "name": "not loaded", "source": "missing.png" }
          ]
        }"##,
    )
    .unwrap();

    let snap = DocumentSnapshot::load(&doc, &dir).unwrap();
    assert_eq!(snap.layers().len(), 2);
    assert_eq!(snap.active_layer(), 2);
    assert_eq!(snap.background(), Rgba8::opaque(255, 255, 255));
    assert_eq!(snap.layers()[1].opcode(), Opcode::Add);
    assert_eq!(
        snap.layers()[1].source().bounds(),
        Region::from_origin_size(1, 1, 1, 1)
    );
}

#[test]
fn load_reports_missing_images() {
    let doc = Document::from_json_str(
        r#"{
          "canvas": { "width": 1, "height": 1 },
          "layers": [ { "name": "x", "source": "nope.png" } ]
        }"#,
    )
    .unwrap();
    let err = DocumentSnapshot::load(&doc, Path::new("target/unit_snapshot_missing")).unwrap_err();
    assert!(err.to_string().contains("asset error:"));
}

#[test]
fn load_skips_images_of_hidden_layers() {
    let dir = PathBuf::from("target").join("unit_snapshot_hidden");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("bg.png"), 1, 1, [40, 40, 40, 255]);

    let doc = Document::from_json_str(
        r#"{
          "canvas": { "width": 1, "height": 1 },
          "layers": [
            { "name": "bg", "source": "bg.png" },
            { "name": "ghost**2", "source": "does_not_exist.png", "visible": false, "offset": [3, 4] }
          ]
        }"#,
    )
    .unwrap();

    let snap = DocumentSnapshot::load(&doc, &dir).unwrap();
    assert_eq!(snap.layers().len(), 2);
    let ghost = &snap.layers()[1];
    assert!(!ghost.visible());
    assert_eq!(ghost.opcode(), Opcode::Add);
    assert!(ghost.source().bounds().is_empty());
    let names: Vec<_> = snap.composited_layers().map(|l| l.name()).collect();
    assert_eq!(names, ["bg"]);
}

#[test]
fn load_rejects_offsets_past_i32() {
    let dir = PathBuf::from("target").join("unit_snapshot_far_offset");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("px.png"), 2, 2, [1, 2, 3, 255]);

    let doc = Document::from_json_str(
        r#"{
          "canvas": { "width": 1, "height": 1 },
          "layers": [ { "name": "far", "source": "px.png", "offset": [2147483646, 0] } ]
        }"#,
    )
    .unwrap();
    let err = DocumentSnapshot::load(&doc, &dir).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}
