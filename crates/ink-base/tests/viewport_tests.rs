use ink_base::{ViewportError, ViewportSpec};

#[test]
fn test_new_accepts_panel_resolution() {
    let viewport = ViewportSpec::new(640, 400).unwrap();
    assert_eq!(viewport.pixel_count(), 256_000);
    assert_eq!(viewport.to_string(), "640x400");
    assert!((viewport.aspect_ratio() - 1.6).abs() < 1e-9);
}

#[test]
fn test_new_rejects_zero_dimensions() {
    assert_eq!(
        ViewportSpec::new(0, 400),
        Err(ViewportError::ZeroDimension { width: 0, height: 400 })
    );
    assert!(ViewportSpec::new(640, 0).is_err());
}

#[test]
fn test_validate_catches_deserialized_zero() {
    let viewport: ViewportSpec = serde_json::from_str(r#"{"width": 0, "height": 10}"#).unwrap();
    assert!(viewport.validate().is_err());
}
