//! TypeScript Generation Tests
//!
//! Validates that session types can be exported to TypeScript when the
//! tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_core_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, every type a frontend renders is exportable.
    fn assert_type<T: Type>() {}

    assert_type::<shutterlink::CameraId>();
    assert_type::<shutterlink::CameraDescriptor>();
    assert_type::<shutterlink::SessionState>();
    assert_type::<shutterlink::ShotParameters>();
    assert_type::<shutterlink::ParameterField>();
    assert_type::<shutterlink::StoreSnapshot>();
    assert_type::<shutterlink::Controls>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Types still compile without specta::Type.
    let _ = shutterlink::SessionState::default();
}
