use black_division::error::*;

#[test]
fn each_failed_device_is_described() {
    let failed = DeviceFailure::TIMER | DeviceFailure::MOUSE;
    assert_eq!(
        failed.describe(),
        vec!["could not subscribe the timer", "could not subscribe the mouse"]
    );
    assert!(DeviceFailure::empty().describe().is_empty());
    assert_eq!(DeviceFailure::all().describe().len(), 4);
}

#[test]
fn game_error_messages() {
    let e = GameError::from(DrawError::OutOfBounds {
        x: 1030,
        y: 5,
        width: 1024,
        height: 768,
    });
    assert_eq!(
        e.to_string(),
        "draw failed: pixel (1030, 5) outside 1024x768 buffer"
    );
    let e = GameError::Devices(DeviceFailure::KEYBOARD);
    assert_eq!(
        e.to_string(),
        "device startup failed: could not subscribe the keyboard"
    );
}
