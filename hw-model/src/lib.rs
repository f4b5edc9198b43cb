/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains a model of the tamper cell for use by tests.

--*/

mod mmio;

pub use mmio::BusMmio;

use quartz_drivers::{
    Bpk, ResetService, SensorBlock, SensorChannels, TamperMonitor, BPK_KEY_LENGTH,
};
use quartz_emu_periph::TamperRootBus;

/// Emulated tamper cell bound to the production drivers.
///
/// Tests construct drivers over the emulated register bus, inject physical
/// events and power transitions, and inspect raw peripheral state that real
/// hardware would never expose.
pub struct TamperModel {
    bus: TamperRootBus,
}

pub type ModelMmio = BusMmio<TamperRootBus>;

impl TamperModel {
    pub fn new() -> Self {
        Self {
            bus: TamperRootBus::new(),
        }
    }

    fn mmio(&self) -> ModelMmio {
        BusMmio::new(self.bus.clone())
    }

    /// BPK driver over the emulated bank.
    pub fn bpk(&self) -> Bpk<ModelMmio> {
        Bpk::new(self.mmio())
    }

    /// Sensor front-end driver over the emulated block.
    pub fn sensors(&self) -> SensorBlock<ModelMmio> {
        SensorBlock::new(self.mmio())
    }

    /// Tamper monitor over the emulated cell.
    pub fn monitor(&self) -> TamperMonitor<ModelMmio> {
        TamperMonitor::new(self.bpk(), self.sensors())
    }

    /// Reset reason decode over the emulated cell.
    pub fn reset_service(&self) -> ResetService<ModelMmio> {
        ResetService::new(self.mmio())
    }

    /// Simulate a physical tamper event on `channels`.
    pub fn trip(&mut self, channels: SensorChannels) {
        self.bus.sensors.trip(channels.bits());
    }

    /// Latched state of the tamper interrupt line.
    pub fn irq_pending(&self) -> bool {
        self.bus.sensors.irq_pending()
    }

    /// Whether the sensor block has requested a CPU reset.
    pub fn cpu_reset_requested(&self) -> bool {
        self.bus.sensors.reset_requested()
    }

    /// Simulate a main-power cycle; battery-domain state persists.
    pub fn warm_reset(&mut self) {
        self.bus.bpk.warm_reset();
        self.bus.sensors.warm_reset();
    }

    /// Simulate a backup-battery power cycle with the device off.
    ///
    /// The only path that releases the BPK self-lock ratchet.
    pub fn battery_power_cycle(&mut self) {
        self.bus.bpk.battery_power_cycle();
        self.bus.sensors.warm_reset();
    }

    /// Raw view of the key bank, ignoring read locks.
    pub fn bpk_words(&self) -> [u32; BPK_KEY_LENGTH] {
        self.bus.bpk.key_words()
    }

    /// Load the key bank directly, as factory provisioning would.
    pub fn provision_keys(&mut self, words: &[u32; BPK_KEY_LENGTH]) {
        self.bus.bpk.set_key_words(words);
    }

    /// Drop the next `count` key-word writes on the floor.
    pub fn inject_bpk_write_faults(&mut self, count: u32) {
        self.bus.bpk.inject_write_faults(count);
    }

    /// Hold the BPK ready flag deasserted.
    pub fn hold_bpk_not_ready(&mut self, held: bool) {
        self.bus.bpk.hold_not_ready(held);
    }
}

impl Default for TamperModel {
    fn default() -> Self {
        Self::new()
    }
}

// Compile-time check that the emulated bank and the driver agree on the
// key region size.
const _: () = assert!(BPK_KEY_LENGTH == quartz_emu_periph::BPK_KEY_WORD_COUNT);
