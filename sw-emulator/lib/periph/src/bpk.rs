/*++

Licensed under the Apache-2.0 license.

File Name:

    bpk.rs

Abstract:

    File contains the emulated battery-backed key bank

--*/

use quartz_emu_bus::{Bus, BusError};
use std::cell::RefCell;
use std::rc::Rc;
use tock_registers::{register_bitfields, LocalRegisterCopy};

mod constants {
    #![allow(unused)]

    /// Words in the battery-backed bank
    pub const KEY_WORD_COUNT: usize = 16;

    pub const STATUS_OFFSET: u32 = 0x00;
    pub const CTRL_OFFSET: u32 = 0x04;
    pub const LOCK_OFFSET: u32 = 0x08;
    pub const KEY_START_OFFSET: u32 = 0x20;
    pub const KEY_END_OFFSET: u32 = KEY_START_OFFSET + (KEY_WORD_COUNT as u32 - 1) * 4;

    /// Status reads observed before the bank reports ready after a power event
    pub const READY_LATENCY: u32 = 3;

    /// Control reads observed before a clear request completes
    pub const CLEAR_LATENCY: u32 = 2;

    /// Lock register reset value
    pub const LOCK_REG_RESET_VAL: u32 = 0;
}

register_bitfields! [
    u32,

    /// Status Register Fields
    pub STATUS [
        READY OFFSET(0) NUMBITS(1) [],
    ],

    /// Control Register Fields
    pub CONTROL [
        CLEAR0 OFFSET(0) NUMBITS(1) [],
    ],

    /// Lock Register Fields
    pub LOCK [
        WRITE_LOCK0 OFFSET(0) NUMBITS(1) [],
        READ_LOCK0 OFFSET(1) NUMBITS(1) [],
        SELF_LOCK OFFSET(31) NUMBITS(1) [],
    ],
];

use constants::*;

/// Words in the battery-backed bank
pub const BPK_KEY_WORD_COUNT: usize = KEY_WORD_COUNT;

/// Emulated battery-backed key bank
///
/// The bank lives in the backup battery domain: a main-power (warm) reset
/// restarts the readiness latency but preserves contents and lock state,
/// while a battery power cycle releases everything including the
/// self-lock ratchet.
#[derive(Clone)]
pub struct BpkPeriph {
    regs: Rc<RefCell<BpkRegs>>,
}

impl BpkPeriph {
    /// Create a new instance of the BPK bank
    pub fn new() -> Self {
        Self {
            regs: Rc::new(RefCell::new(BpkRegs::new())),
        }
    }

    /// Simulate a main-power cycle; battery-domain state persists.
    pub fn warm_reset(&mut self) {
        self.regs.borrow_mut().warm_reset();
    }

    /// Simulate removal and reinsertion of the backup battery.
    pub fn battery_power_cycle(&mut self) {
        self.regs.borrow_mut().battery_power_cycle();
    }

    /// Raw view of the key words, ignoring read locks.
    pub fn key_words(&self) -> [u32; KEY_WORD_COUNT] {
        self.regs.borrow().keys
    }

    /// Load the key words directly, as factory provisioning would.
    pub fn set_key_words(&mut self, words: &[u32; KEY_WORD_COUNT]) {
        self.regs.borrow_mut().keys = *words;
    }

    /// Drop the next `count` key-word writes on the floor.
    pub fn inject_write_faults(&mut self, count: u32) {
        self.regs.borrow_mut().write_faults = count;
    }

    /// Hold the ready flag deasserted, as a failing battery domain would.
    pub fn hold_not_ready(&mut self, held: bool) {
        self.regs.borrow_mut().ready_held = held;
    }
}

impl Default for BpkPeriph {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for BpkPeriph {
    /// Read the word at given address
    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        self.regs.borrow_mut().read(addr)
    }

    /// Write the word at given address
    fn write(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        self.regs.borrow_mut().write(addr, val)
    }
}

/// BPK register file
struct BpkRegs {
    /// Status reads left until the bank reports ready
    ready_countdown: u32,

    /// Fault injection: bank never becomes ready
    ready_held: bool,

    /// Control reads left until an in-flight clear completes; zero when idle
    clear_countdown: u32,

    /// Lock Register
    lock: LocalRegisterCopy<u32, LOCK::Register>,

    /// Key Registers
    keys: [u32; KEY_WORD_COUNT],

    /// Fault injection: key-word writes left to drop
    write_faults: u32,
}

impl BpkRegs {
    fn new() -> Self {
        Self {
            ready_countdown: READY_LATENCY,
            ready_held: false,
            clear_countdown: 0,
            lock: LocalRegisterCopy::new(LOCK_REG_RESET_VAL),
            keys: [0; KEY_WORD_COUNT],
            write_faults: 0,
        }
    }

    fn warm_reset(&mut self) {
        self.ready_countdown = READY_LATENCY;
        self.clear_countdown = 0;
    }

    fn battery_power_cycle(&mut self) {
        self.warm_reset();
        self.lock.set(LOCK_REG_RESET_VAL);
        self.keys = [0; KEY_WORD_COUNT];
        self.write_faults = 0;
        self.ready_held = false;
    }

    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        if addr % 4 != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        match addr {
            STATUS_OFFSET => {
                if self.ready_held {
                    return Ok(0);
                }
                if self.ready_countdown > 0 {
                    self.ready_countdown -= 1;
                    return Ok(0);
                }
                let mut status = LocalRegisterCopy::<u32, STATUS::Register>::new(0);
                status.modify(STATUS::READY::SET);
                Ok(status.get())
            }
            CTRL_OFFSET => {
                if self.clear_countdown == 0 {
                    return Ok(0);
                }
                self.clear_countdown -= 1;
                if self.clear_countdown == 0 {
                    self.keys = [0; KEY_WORD_COUNT];
                    return Ok(0);
                }
                let mut ctrl = LocalRegisterCopy::<u32, CONTROL::Register>::new(0);
                ctrl.modify(CONTROL::CLEAR0::SET);
                Ok(ctrl.get())
            }
            LOCK_OFFSET => Ok(self.lock.get()),
            KEY_START_OFFSET..=KEY_END_OFFSET => {
                // A read-locked region reads back as zeros.
                if self.lock.is_set(LOCK::READ_LOCK0) {
                    return Ok(0);
                }
                Ok(self.keys[((addr - KEY_START_OFFSET) / 4) as usize])
            }
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        if addr % 4 != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        match addr {
            STATUS_OFFSET => Err(BusError::StoreAccessFault),
            CTRL_OFFSET => {
                let val = LocalRegisterCopy::<u32, CONTROL::Register>::new(val);
                if val.is_set(CONTROL::CLEAR0) && self.clear_countdown == 0 {
                    // A write-locked region latches the request but the
                    // erase never completes.
                    self.clear_countdown = if self.lock.is_set(LOCK::WRITE_LOCK0) {
                        u32::MAX
                    } else {
                        CLEAR_LATENCY
                    };
                }
                Ok(())
            }
            LOCK_OFFSET => {
                // Self-locked banks drop lock writes until the battery
                // domain power cycles.
                if !self.lock.is_set(LOCK::SELF_LOCK) {
                    self.lock.set(val);
                }
                Ok(())
            }
            KEY_START_OFFSET..=KEY_END_OFFSET => {
                if self.lock.is_set(LOCK::WRITE_LOCK0) {
                    return Ok(());
                }
                if self.write_faults > 0 {
                    self.write_faults -= 1;
                    return Ok(());
                }
                self.keys[((addr - KEY_START_OFFSET) / 4) as usize] = val;
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }
}
