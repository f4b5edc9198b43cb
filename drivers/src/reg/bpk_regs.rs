/*++

Licensed under the Apache-2.0 license.

File Name:

    bpk_regs.rs

Abstract:

    File contains register definitions for the battery-backed key bank

--*/

/// Tamper cell base address; the BPK bank occupies the first page.
pub(crate) const BPK_REG_BASE: u32 = 0x5004_0000;

/// Status register
pub(crate) const BPK_STATUS: u32 = BPK_REG_BASE;

/// Control register; low bits are per-region clear requests
pub(crate) const BPK_CTRL: u32 = BPK_REG_BASE + 0x04;

/// Lock register; write/read lock pair per region, self-lock in bit 31
pub(crate) const BPK_LOCK: u32 = BPK_REG_BASE + 0x08;

/// First key word register
const BPK_KEY0: u32 = BPK_REG_BASE + 0x20;

/// Hardware ready flag in the status register
pub(crate) const BPK_STATUS_READY: u32 = 1 << 0;

pub(crate) fn bpk_key_reg(word: usize) -> u32 {
    BPK_KEY0 + (word as u32) * 4
}
