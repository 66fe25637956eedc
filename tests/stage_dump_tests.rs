//! Diagnostic stage dumps and file loading

use qr_ladder::{DecodeError, ErrorClass, RawImage, Transform, load_path};

fn stripes(width: u32, height: u32) -> RawImage {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            let v = if x % 6 < 3 { 40 } else { 210 };
            rgba.extend_from_slice(&[v, v / 2, 255 - v, 255]);
        }
    }
    RawImage::new(width, height, rgba).unwrap()
}

#[test]
fn test_stage_dump_round_trips_through_png() {
    let dir = tempfile::tempdir().unwrap();
    let image = stripes(30, 12);

    for stage in Transform::LADDER {
        let processed = stage.apply(&image);
        let path = dir
            .path()
            .join(format!("{:02}-{}.png", stage.priority(), stage.name()));
        processed.save_png(&path).unwrap();

        let reloaded = load_path(&path).unwrap();
        assert_eq!(reloaded, processed, "stage {}", stage);
    }
}

#[test]
fn test_decode_path_reports_missing_file_as_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = qr_ladder::decode_path(dir.path().join("absent.png")).unwrap_err();
    assert!(matches!(err, DecodeError::Load(_)));
    assert_eq!(err.class(), ErrorClass::Load);
}

#[test]
fn test_decode_path_reports_non_image_file_as_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"shopping list: eggs, milk").unwrap();
    let err = qr_ladder::decode_path(&path).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Load);
}
