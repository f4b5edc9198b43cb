/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the emulated tamper cell peripherals.

--*/

mod bpk;
mod root_bus;
mod sensor;

pub use bpk::{BpkPeriph, BPK_KEY_WORD_COUNT};
pub use root_bus::{TamperRootBus, BPK_BASE, SENSOR_BASE};
pub use sensor::{SensorPeriph, STATUS_KEY_DESTROY};
