/*++

Licensed under the Apache-2.0 license.

File Name:

    sensor.rs

Abstract:

    File contains the emulated tamper sensor block

--*/

use quartz_emu_bus::{Bus, BusError};
use std::cell::RefCell;
use std::rc::Rc;
use tock_registers::{register_bitfields, LocalRegisterCopy};

mod constants {
    #![allow(unused)]

    pub const CTRL_OFFSET: u32 = 0x00;
    pub const CHAN_EN_OFFSET: u32 = 0x04;
    pub const STATUS_OFFSET: u32 = 0x08;
    pub const INT_OFFSET: u32 = 0x0C;
    pub const RST_CAUSE_OFFSET: u32 = 0x10;

    /// Mask of the physical channel bits in the status register
    pub const STATUS_CHANNEL_MASK: u32 = 0x7f;
}

register_bitfields! [
    u32,

    /// Control Register Fields
    pub CTRL [
        CLK_EN OFFSET(0) NUMBITS(1) [],
        AFE_EN OFFSET(1) NUMBITS(1) [],
        GLITCH_FILTER OFFSET(2) NUMBITS(1) [],
        IRQ_RESPONSE OFFSET(3) NUMBITS(1) [],
        SAMPLE_FREQ OFFSET(8) NUMBITS(4) [],
    ],

    /// Interrupt Register Fields
    pub INT [
        PENDING OFFSET(0) NUMBITS(1) [],
    ],

    /// Reset Cause Register Fields
    pub RST_CAUSE [
        TAMPER OFFSET(0) NUMBITS(1) [],
        WARM OFFSET(1) NUMBITS(1) [],
    ],
];

use constants::*;

/// Key-destroy-required condition raised with every armed trip
pub const STATUS_KEY_DESTROY: u32 = 1 << 14;

/// Emulated tamper sensor block
///
/// Physical events are injected with [`SensorPeriph::trip`]; only armed
/// channels latch, and the response path follows the programmed mode:
/// interrupt line or direct CPU reset request.
#[derive(Clone)]
pub struct SensorPeriph {
    regs: Rc<RefCell<SensorRegs>>,
}

impl SensorPeriph {
    /// Create a new instance of the sensor block
    pub fn new() -> Self {
        Self {
            regs: Rc::new(RefCell::new(SensorRegs::new())),
        }
    }

    /// Simulate a physical event on `channels`.
    pub fn trip(&mut self, channels: u32) {
        self.regs.borrow_mut().trip(channels);
    }

    /// Latched state of the interrupt line.
    pub fn irq_pending(&self) -> bool {
        self.regs.borrow().int.is_set(INT::PENDING)
    }

    /// Whether the block has requested a CPU reset.
    pub fn reset_requested(&self) -> bool {
        self.regs.borrow().reset_requested
    }

    /// Raw view of the latched status register.
    pub fn raw_status(&self) -> u32 {
        self.regs.borrow().status
    }

    /// Simulate a main-power cycle.
    ///
    /// The block's configuration lives in the main domain and is lost; the
    /// reset cause register is sticky so boot code can still read it.
    pub fn warm_reset(&mut self) {
        self.regs.borrow_mut().warm_reset();
    }
}

impl Default for SensorPeriph {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SensorPeriph {
    /// Read the word at given address
    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        self.regs.borrow_mut().read(addr)
    }

    /// Write the word at given address
    fn write(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        self.regs.borrow_mut().write(addr, val)
    }
}

/// Sensor block register file
struct SensorRegs {
    /// Control Register
    ctrl: LocalRegisterCopy<u32, CTRL::Register>,

    /// Dynamic channel arm mask
    chan_en: u32,

    /// Latched trip status; write-one-to-clear
    status: u32,

    /// Interrupt Register
    int: LocalRegisterCopy<u32, INT::Register>,

    /// Reset Cause Register; sticky across CPU resets
    rst_cause: LocalRegisterCopy<u32, RST_CAUSE::Register>,

    /// CPU reset line request
    reset_requested: bool,
}

impl SensorRegs {
    fn new() -> Self {
        Self {
            ctrl: LocalRegisterCopy::new(0),
            chan_en: 0,
            status: 0,
            int: LocalRegisterCopy::new(0),
            rst_cause: LocalRegisterCopy::new(0),
            reset_requested: false,
        }
    }

    fn trip(&mut self, channels: u32) {
        // The analog side only observes events while clocked and armed.
        if !self.ctrl.is_set(CTRL::CLK_EN) || !self.ctrl.is_set(CTRL::AFE_EN) {
            return;
        }
        let armed = channels & self.chan_en & STATUS_CHANNEL_MASK;
        if armed == 0 {
            return;
        }
        self.status |= armed | STATUS_KEY_DESTROY;
        if self.ctrl.is_set(CTRL::IRQ_RESPONSE) {
            self.int.modify(INT::PENDING::SET);
        } else {
            self.force_reset();
        }
    }

    fn force_reset(&mut self) {
        self.reset_requested = true;
        self.rst_cause.modify(RST_CAUSE::TAMPER::SET);
    }

    fn warm_reset(&mut self) {
        self.ctrl.set(0);
        self.chan_en = 0;
        self.status = 0;
        self.int.set(0);
        self.reset_requested = false;
        self.rst_cause.modify(RST_CAUSE::WARM::SET);
    }

    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        if addr % 4 != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        match addr {
            CTRL_OFFSET => Ok(self.ctrl.get()),
            CHAN_EN_OFFSET => Ok(self.chan_en),
            STATUS_OFFSET => Ok(self.status),
            INT_OFFSET => Ok(self.int.get()),
            RST_CAUSE_OFFSET => Ok(self.rst_cause.get()),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        if addr % 4 != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        match addr {
            CTRL_OFFSET => {
                self.ctrl.set(val);
                // Dropping back to the reset response with a trip still
                // latched fires the hardware reset path.
                if !self.ctrl.is_set(CTRL::IRQ_RESPONSE) && self.status != 0 {
                    self.force_reset();
                }
                Ok(())
            }
            CHAN_EN_OFFSET => {
                self.chan_en = val & STATUS_CHANNEL_MASK;
                Ok(())
            }
            STATUS_OFFSET => {
                self.status &= !val;
                Ok(())
            }
            INT_OFFSET => {
                let val = LocalRegisterCopy::<u32, INT::Register>::new(val);
                if val.is_set(INT::PENDING) {
                    self.int.modify(INT::PENDING::CLEAR);
                }
                Ok(())
            }
            RST_CAUSE_OFFSET => {
                self.rst_cause.set(self.rst_cause.get() & !val);
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CHANNELS: u32 = STATUS_CHANNEL_MASK;

    fn armed_block(irq_response: bool) -> SensorPeriph {
        let mut sensors = SensorPeriph::new();
        let mut ctrl = LocalRegisterCopy::<u32, CTRL::Register>::new(0);
        ctrl.modify(CTRL::CLK_EN::SET);
        ctrl.modify(CTRL::AFE_EN::SET);
        if irq_response {
            ctrl.modify(CTRL::IRQ_RESPONSE::SET);
        }
        sensors.write(CTRL_OFFSET, ctrl.get()).unwrap();
        sensors.write(CHAN_EN_OFFSET, ALL_CHANNELS).unwrap();
        sensors
    }

    #[test]
    fn test_trip_requires_arming() {
        let mut sensors = SensorPeriph::new();
        sensors.trip(ALL_CHANNELS);
        assert_eq!(sensors.raw_status(), 0);
        assert!(!sensors.irq_pending());
        assert!(!sensors.reset_requested());
    }

    #[test]
    fn test_trip_latches_key_destroy() {
        let mut sensors = armed_block(true);
        sensors.trip(1 << 5);
        assert_eq!(sensors.raw_status(), (1 << 5) | STATUS_KEY_DESTROY);
        assert!(sensors.irq_pending());
        assert!(!sensors.reset_requested());
    }

    #[test]
    fn test_reset_response_trip() {
        let mut sensors = armed_block(false);
        sensors.trip(1 << 0);
        assert!(sensors.reset_requested());
        assert!(!sensors.irq_pending());
    }

    #[test]
    fn test_status_write_one_to_clear() {
        let mut sensors = armed_block(true);
        sensors.trip(1 << 2);
        let status = sensors.read(STATUS_OFFSET).unwrap();
        sensors.write(STATUS_OFFSET, status).unwrap();
        assert_eq!(sensors.raw_status(), 0);

        // Cleared status re-arms the latch.
        sensors.trip(1 << 2);
        assert_eq!(sensors.raw_status(), (1 << 2) | STATUS_KEY_DESTROY);
    }

    #[test]
    fn test_rst_cause_sticky_across_warm_reset() {
        let mut sensors = armed_block(false);
        sensors.trip(1 << 1);
        sensors.warm_reset();
        let cause = sensors.read(RST_CAUSE_OFFSET).unwrap();
        assert_ne!(cause & 1, 0);
    }
}
