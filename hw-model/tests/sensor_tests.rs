/*++

Licensed under the Apache-2.0 license.

File Name:

    sensor_tests.rs

Abstract:

    File contains test cases for the tamper sensor front-end API

--*/

use quartz_drivers::{ResetReason, ResponseMode, SensorChannels, SensorConfig};
use quartz_hw_model::TamperModel;

#[test]
fn test_unconfigured_trips_ignored() {
    let mut model = TamperModel::new();
    model.trip(SensorChannels::all());
    assert_eq!(u32::from(model.sensors().status()), 0);
    assert!(!model.irq_pending());
    assert!(!model.cpu_reset_requested());
}

#[test]
fn test_armed_trip_latches_interrupt() {
    let mut model = TamperModel::new();
    model.sensors().configure(&SensorConfig::default());

    model.trip(SensorChannels::MESH);
    let status = model.sensors().status();
    assert!(status.mesh());
    assert!(status.key_destroy());
    assert!(!status.volt_high());
    assert!(model.irq_pending());
    assert!(!model.cpu_reset_requested());
}

#[test]
fn test_unarmed_channel_does_not_latch() {
    let mut model = TamperModel::new();
    let config = SensorConfig {
        channels: SensorChannels::VOLT_HIGH | SensorChannels::VOLT_LOW,
        ..SensorConfig::default()
    };
    model.sensors().configure(&config);

    model.trip(SensorChannels::TEMP_HIGH);
    assert_eq!(u32::from(model.sensors().status()), 0);
    assert!(!model.irq_pending());
}

#[test]
fn test_clear_status_rearms() {
    let mut model = TamperModel::new();
    let mut sensors = model.sensors();
    sensors.configure(&SensorConfig::default());

    model.trip(SensorChannels::CLOCK_GLITCH);
    sensors.clear_status();
    sensors.clear_interrupt();
    assert_eq!(u32::from(sensors.status()), 0);
    assert!(!model.irq_pending());

    // The next physical event latches again.
    model.trip(SensorChannels::CLOCK_GLITCH);
    assert!(sensors.status().clock_glitch());
    assert!(model.irq_pending());
}

#[test]
fn test_reset_response_bypasses_software() {
    let mut model = TamperModel::new();
    let config = SensorConfig {
        response: ResponseMode::Reset,
        ..SensorConfig::default()
    };
    model.sensors().configure(&config);

    model.trip(SensorChannels::VOLT_LOW);
    assert!(model.cpu_reset_requested());
    assert!(!model.irq_pending());
}

#[test]
fn test_response_mode_switch() {
    let mut model = TamperModel::new();
    let mut sensors = model.sensors();
    sensors.configure(&SensorConfig::default());
    sensors.set_response_mode(ResponseMode::Reset);

    model.trip(SensorChannels::CRYSTAL);
    assert!(model.cpu_reset_requested());
}

#[test]
fn test_reset_reason_cold() {
    let model = TamperModel::new();
    assert_eq!(
        model.reset_service().reset_reason(),
        ResetReason::ColdReset
    );
}

#[test]
fn test_reset_reason_warm() {
    let mut model = TamperModel::new();
    model.warm_reset();
    assert_eq!(
        model.reset_service().reset_reason(),
        ResetReason::WarmReset
    );
}

#[test]
fn test_reset_reason_tamper() {
    let mut model = TamperModel::new();
    let config = SensorConfig {
        response: ResponseMode::Reset,
        ..SensorConfig::default()
    };
    model.sensors().configure(&config);

    model.trip(SensorChannels::MESH);
    assert!(model.cpu_reset_requested());

    // The cause register is sticky across the reset it forced.
    model.warm_reset();
    assert_eq!(
        model.reset_service().reset_reason(),
        ResetReason::TamperReset
    );
}
