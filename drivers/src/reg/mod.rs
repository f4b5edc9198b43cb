/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains register definitions for the tamper cell

--*/

pub(crate) mod bpk_regs;
pub(crate) mod sensor_regs;
