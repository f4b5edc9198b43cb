/*++

Licensed under the Apache-2.0 license.

File Name:

    bpk.rs

Abstract:

    File contains API for controlling the battery-backed key (BPK) bank

--*/

use bitflags::bitflags;

use crate::reg::bpk_regs::{bpk_key_reg, BPK_CTRL, BPK_LOCK, BPK_STATUS, BPK_STATUS_READY};
use crate::{quartz_err_def, wait, Mmio, QuartzResult};

/// Number of 32-bit words in the battery-backed key bank
pub const BPK_KEY_LENGTH: usize = 16;

/// Poll budget for the hardware ready flag
const MAX_READY_POLLS: u32 = 10_000;

/// Poll budget for a region clear request to complete
const MAX_CLEAR_POLLS: u32 = 10_000;

/// Key Region Identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRegion {
    Region0 = 0,
}

impl From<KeyRegion> for u32 {
    /// Converts to this type from the input type.
    fn from(region: KeyRegion) -> Self {
        region as Self
    }
}

impl From<KeyRegion> for usize {
    /// Converts to this type from the input type.
    fn from(region: KeyRegion) -> Self {
        region as Self
    }
}

bitflags! {
    /// BPK lock register bits
    pub struct LockBits: u32 {
        /// Region 0 write lock
        const WRITE_LOCK_R0 = 1 << 0;

        /// Region 0 read lock; a locked region reads back as zeros
        const READ_LOCK_R0 = 1 << 1;

        /// Bank self-lock; once set, the lock register ignores every
        /// further write until the backup battery domain is power cycled
        const SELF_LOCK = 1 << 31;
    }
}

impl LockBits {
    /// Write lock bit for a region
    pub fn write_lock(region: KeyRegion) -> LockBits {
        match region {
            KeyRegion::Region0 => LockBits::WRITE_LOCK_R0,
        }
    }

    /// Read lock bit for a region
    pub fn read_lock(region: KeyRegion) -> LockBits {
        match region {
            KeyRegion::Region0 => LockBits::READ_LOCK_R0,
        }
    }
}

quartz_err_def! {
    Bpk,
    BpkErr
    {
        // Access attempted while the hardware ready flag was unset
        NotReadyFailure = 0x01,

        // Requested words fall outside the bank
        OutOfRangeFailure = 0x02,

        // Ready flag never asserted within the poll budget
        ReadyTimeoutFailure = 0x03,

        // Clear request never completed within the poll budget
        ClearTimeoutFailure = 0x04,
    }
}

/// Battery-backed key register bank
///
/// Contents persist across main-power loss for as long as the backup
/// battery is present. The bank is word addressed and always operated on
/// as whole key regions by the tamper path.
pub struct Bpk<TMmio: Mmio> {
    mmio: TMmio,
}

impl<TMmio: Mmio> Bpk<TMmio> {
    pub fn new(mmio: TMmio) -> Self {
        Self { mmio }
    }

    /// Retrieve the hardware ready flag.
    ///
    /// The bank takes an unspecified number of cycles to come up after a
    /// power event; callers must observe `true` before any key access.
    pub fn is_ready(&self) -> bool {
        self.mmio.read_reg(BPK_STATUS) & BPK_STATUS_READY != 0
    }

    /// Busy-poll the ready flag.
    ///
    /// The poll is bounded so a dead battery domain surfaces as an error
    /// instead of a hang.
    pub fn wait_ready(&self) -> QuartzResult<()> {
        if !wait::until_bounded(MAX_READY_POLLS, || self.is_ready()) {
            raise_err!(ReadyTimeoutFailure)
        }
        Ok(())
    }

    /// Write `words` into the key bank starting at word `offset`.
    ///
    /// Each word is written individually to its indexed register. The bank
    /// is not mutated on failure.
    pub fn write_key(&mut self, words: &[u32], offset: usize) -> QuartzResult<()> {
        if !self.is_ready() {
            raise_err!(NotReadyFailure)
        }
        if offset + words.len() > BPK_KEY_LENGTH {
            raise_err!(OutOfRangeFailure)
        }
        for (index, &word) in words.iter().enumerate() {
            self.mmio.write_reg(bpk_key_reg(offset + index), word);
        }
        Ok(())
    }

    /// Read `words.len()` words from the key bank starting at word `offset`.
    pub fn read_key(&self, words: &mut [u32], offset: usize) -> QuartzResult<()> {
        if !self.is_ready() {
            raise_err!(NotReadyFailure)
        }
        if offset + words.len() > BPK_KEY_LENGTH {
            raise_err!(OutOfRangeFailure)
        }
        for (index, word) in words.iter_mut().enumerate() {
            *word = self.mmio.read_reg(bpk_key_reg(offset + index));
        }
        Ok(())
    }

    /// Request a hardware clear of `region` and wait for it to complete.
    ///
    /// The clear is performed by the battery domain itself; the request bit
    /// stays asserted until the erase has landed. A write-locked region
    /// never completes, which the bounded poll reports as a timeout.
    pub fn clear_region(&mut self, region: KeyRegion) -> QuartzResult<()> {
        let request = 1u32 << u32::from(region);
        let ctrl = self.mmio.read_reg(BPK_CTRL);
        self.mmio.write_reg(BPK_CTRL, ctrl | request);
        if !wait::until_bounded(MAX_CLEAR_POLLS, || {
            self.mmio.read_reg(BPK_CTRL) & request == 0
        }) {
            raise_err!(ClearTimeoutFailure)
        }
        Ok(())
    }

    /// Set or clear the write lock for `region`.
    pub fn set_write_lock(&mut self, region: KeyRegion, enabled: bool) {
        self.set_lock(LockBits::write_lock(region), enabled);
    }

    /// Set or clear the read lock for `region`.
    pub fn set_read_lock(&mut self, region: KeyRegion, enabled: bool) {
        self.set_lock(LockBits::read_lock(region), enabled);
    }

    /// Set or clear the given lock bits.
    ///
    /// Silently ineffective once the self-lock is engaged; hardware drops
    /// lock-register writes until a battery-domain power cycle.
    pub fn set_lock(&mut self, bits: LockBits, enabled: bool) {
        let mut lock = LockBits::from_bits_truncate(self.mmio.read_reg(BPK_LOCK));
        lock.set(bits, enabled);
        self.mmio.write_reg(BPK_LOCK, lock.bits());
    }

    /// Engage the bank self-lock.
    ///
    /// One-way ratchet: no software path clears it.
    pub fn set_self_lock(&mut self) {
        self.set_lock(LockBits::SELF_LOCK, true);
    }

    /// Retrieve the lock status for the given bits.
    ///
    /// # Returns
    /// * `true` - If every requested lock bit is set
    /// * `false` - Otherwise
    pub fn lock_status(&self, bits: LockBits) -> bool {
        LockBits::from_bits_truncate(self.mmio.read_reg(BPK_LOCK)).contains(bits)
    }
}
