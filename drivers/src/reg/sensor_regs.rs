/*++

Licensed under the Apache-2.0 license.

File Name:

    sensor_regs.rs

Abstract:

    File contains register definitions for the tamper sensor block

--*/

/// Sensor block base address within the tamper cell
pub(crate) const SENSOR_REG_BASE: u32 = 0x5004_0400;

/// Control register
pub(crate) const SENSOR_CTRL: u32 = SENSOR_REG_BASE;

/// Dynamic channel arm mask
pub(crate) const SENSOR_CHAN_EN: u32 = SENSOR_REG_BASE + 0x04;

/// Latched trip status; write-one-to-clear
pub(crate) const SENSOR_STATUS: u32 = SENSOR_REG_BASE + 0x08;

/// Interrupt register; write-one-to-clear
pub(crate) const SENSOR_INT: u32 = SENSOR_REG_BASE + 0x0C;

/// Reset cause register; write-one-to-clear, persists across CPU resets
pub(crate) const SENSOR_RST_CAUSE: u32 = SENSOR_REG_BASE + 0x10;

/// Latched interrupt line in the interrupt register
pub(crate) const SENSOR_INT_PENDING: u32 = 1 << 0;

/// Reset forced by the tamper block
pub(crate) const SENSOR_RST_CAUSE_TAMPER: u32 = 1 << 0;

/// Main-domain warm reset
pub(crate) const SENSOR_RST_CAUSE_WARM: u32 = 1 << 1;
