/*++

Licensed under the Apache-2.0 license.

File Name:

    tamper.rs

Abstract:

    File contains the tamper-response handler and the tamper-status query

--*/

use crate::bpk::{Bpk, BPK_KEY_LENGTH};
use crate::printer::HexWord;
use crate::sensor::SensorBlock;
use crate::{cprintln, quartz_err_def, Mmio, QuartzResult};

/// Canonical pattern written over the key region on a tamper event.
///
/// The status query defines "tampered" as the bank matching this exact
/// sequence; writer and reader share this single definition so the
/// convention cannot drift.
pub const WIPE_PATTERN: [u32; BPK_KEY_LENGTH] =
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Destructive write attempts before escalating to a forced reset
const MAX_WIPE_ATTEMPTS: u32 = 4;

quartz_err_def! {
    Tamper,
    TamperErr
    {
        // Key overwrite could not be verified within the attempt budget
        WipeVerifyFailure = 0x01,
    }
}

/// Tamper-detection and key-destruction pipeline
///
/// Owns the key bank and sensor front-end drivers; constructed once at
/// boot and handed to the interrupt glue by reference.
pub struct TamperMonitor<TMmio: Mmio> {
    bpk: Bpk<TMmio>,
    sensors: SensorBlock<TMmio>,
}

impl<TMmio: Mmio> TamperMonitor<TMmio> {
    pub fn new(bpk: Bpk<TMmio>, sensors: SensorBlock<TMmio>) -> Self {
        Self { bpk, sensors }
    }

    /// Interrupt-context entry for a latched sensor trip.
    ///
    /// Runs to completion at its interrupt priority: destroys the key
    /// region if the trip demands it, then acknowledges the trip so the
    /// block re-arms. New trips latch again as soon as the status register
    /// is cleared; the handler is safe to re-enter for those.
    pub fn on_interrupt(&mut self) {
        let status = self.sensors.status();

        // Diagnostic only; must never gate or delay the wipe.
        cprintln!("[tamper] trip status={}", HexWord(u32::from(status)));

        if status.key_destroy() && self.destroy_key().is_err() {
            cprintln!("[tamper] wipe unverified; forcing reset");
            // Leave the trip latched: with the reset response selected the
            // block takes the CPU down in hardware.
            self.sensors.force_reset();
            return;
        }

        self.sensors.clear_status();
        self.sensors.clear_interrupt();
    }

    /// Overwrite the key region with the canonical pattern and verify it.
    ///
    /// Giving up during a tamper event is not acceptable, so every failure
    /// mode inside an attempt simply consumes the attempt: wait for the
    /// bank, write, read back, compare. Exhaustion is reported to the
    /// caller for escalation.
    fn destroy_key(&mut self) -> QuartzResult<()> {
        for _ in 0..MAX_WIPE_ATTEMPTS {
            if self.bpk.wait_ready().is_err() {
                continue;
            }
            if self.bpk.write_key(&WIPE_PATTERN, 0).is_err() {
                continue;
            }
            let mut readback = [0u32; BPK_KEY_LENGTH];
            if self.bpk.read_key(&mut readback, 0).is_err() {
                continue;
            }
            if readback == WIPE_PATTERN {
                return Ok(());
            }
        }
        err!(WipeVerifyFailure)
    }

    /// Compare the key region against the canonical wipe pattern.
    ///
    /// # Returns
    /// * `Ok(true)` - The destructive overwrite has landed
    /// * `Ok(false)` - Bank contents differ from the pattern
    /// * `Err(_)` - The bank could not be read; callers must treat this as
    ///   its own alarm state rather than as "not tampered"
    pub fn tamper_status(&self) -> QuartzResult<bool> {
        let mut words = [0u32; BPK_KEY_LENGTH];
        self.bpk.read_key(&mut words, 0)?;
        Ok(words == WIPE_PATTERN)
    }

    /// Access the underlying key bank driver.
    pub fn bpk(&mut self) -> &mut Bpk<TMmio> {
        &mut self.bpk
    }

    /// Access the underlying sensor front-end driver.
    pub fn sensors(&mut self) -> &mut SensorBlock<TMmio> {
        &mut self.sensors
    }
}
