/*++

Licensed under the Apache-2.0 license.

File Name:

    root_bus.rs

Abstract:

    File contains the root bus of the emulated tamper cell

--*/

use crate::{BpkPeriph, SensorPeriph};
use quartz_emu_bus::{Bus, BusError};

/// BPK bank base address in the tamper cell
pub const BPK_BASE: u32 = 0x5004_0000;
const BPK_END: u32 = BPK_BASE + 0xFF;

/// Sensor block base address in the tamper cell
pub const SENSOR_BASE: u32 = 0x5004_0400;
const SENSOR_END: u32 = SENSOR_BASE + 0xFF;

/// Routes tamper-cell bus accesses to the emulated peripherals.
///
/// Cloning yields another handle onto the same peripheral state.
#[derive(Clone)]
pub struct TamperRootBus {
    pub bpk: BpkPeriph,
    pub sensors: SensorPeriph,
}

impl TamperRootBus {
    pub fn new() -> Self {
        Self {
            bpk: BpkPeriph::new(),
            sensors: SensorPeriph::new(),
        }
    }
}

impl Default for TamperRootBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for TamperRootBus {
    /// Read the word at given address
    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        match addr {
            BPK_BASE..=BPK_END => self.bpk.read(addr - BPK_BASE),
            SENSOR_BASE..=SENSOR_END => self.sensors.read(addr - SENSOR_BASE),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    /// Write the word at given address
    fn write(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        match addr {
            BPK_BASE..=BPK_END => self.bpk.write(addr - BPK_BASE, val),
            SENSOR_BASE..=SENSOR_END => self.sensors.write(addr - SENSOR_BASE, val),
            _ => Err(BusError::StoreAccessFault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_access_faults() {
        let mut bus = TamperRootBus::new();
        assert_eq!(bus.read(0x1000_0000), Err(BusError::LoadAccessFault));
        assert_eq!(bus.write(0x1000_0000, 0), Err(BusError::StoreAccessFault));
    }

    #[test]
    fn test_routing() {
        let mut bus = TamperRootBus::new();
        // BPK lock register behind its base address.
        bus.write(BPK_BASE + 0x08, 0x3).unwrap();
        assert_eq!(bus.read(BPK_BASE + 0x08).ok(), Some(0x3));
        // Sensor channel mask behind its base address.
        bus.write(SENSOR_BASE + 0x04, 0x7f).unwrap();
        assert_eq!(bus.read(SENSOR_BASE + 0x04).ok(), Some(0x7f));
    }
}
