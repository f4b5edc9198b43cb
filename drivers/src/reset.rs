/*++

Licensed under the Apache-2.0 license.

File Name:

    reset.rs

Abstract:

    File contains reset related API

--*/

use crate::reg::sensor_regs::{
    SENSOR_RST_CAUSE, SENSOR_RST_CAUSE_TAMPER, SENSOR_RST_CAUSE_WARM,
};
use crate::Mmio;

/// Reset Reason
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ResetReason {
    /// Cold Reset
    ColdReset,

    /// Warm Reset
    WarmReset,

    /// Reset forced by the tamper block
    TamperReset,
}

/// Reset Service
///
/// Decodes the tamper cell's reset cause register. Boot logic pairs this
/// with the tamper-status query to pick the recovery flow.
pub struct ResetService<TMmio: Mmio> {
    mmio: TMmio,
}

impl<TMmio: Mmio> ResetService<TMmio> {
    pub fn new(mmio: TMmio) -> Self {
        Self { mmio }
    }

    /// Retrieve reset reason
    pub fn reset_reason(&self) -> ResetReason {
        let cause = self.mmio.read_reg(SENSOR_RST_CAUSE);
        let tamper = cause & SENSOR_RST_CAUSE_TAMPER != 0;
        let warm = cause & SENSOR_RST_CAUSE_WARM != 0;
        match (tamper, warm) {
            (true, _) => ResetReason::TamperReset,
            (false, true) => ResetReason::WarmReset,
            (false, false) => ResetReason::ColdReset,
        }
    }
}
