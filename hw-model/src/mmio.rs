/*++

Licensed under the Apache-2.0 license.

File Name:

    mmio.rs

Abstract:

    File contains an Mmio implementation backed by an emulated bus

--*/

use quartz_drivers::Mmio;
use quartz_emu_bus::Bus;
use std::cell::RefCell;

/// An MMIO implementation that reads and writes through a
/// `quartz_emu_bus::Bus`.
pub struct BusMmio<TBus: Bus> {
    bus: RefCell<TBus>,
}

impl<TBus: Bus> BusMmio<TBus> {
    pub fn new(bus: TBus) -> Self {
        Self {
            bus: RefCell::new(bus),
        }
    }

    pub fn into_inner(self) -> TBus {
        self.bus.into_inner()
    }
}

impl<TBus: Bus> Mmio for BusMmio<TBus> {
    /// Loads from `addr` on the bus and returns the value.
    ///
    /// # Panics
    ///
    /// This function panics if the bus faults.
    fn read_reg(&self, addr: u32) -> u32 {
        self.bus.borrow_mut().read(addr).unwrap()
    }

    /// Stores `val` to `addr` on the bus.
    ///
    /// # Panics
    ///
    /// This function panics if the bus faults.
    fn write_reg(&mut self, addr: u32, val: u32) {
        self.bus.borrow_mut().write(addr, val).unwrap()
    }
}
