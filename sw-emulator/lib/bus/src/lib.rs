/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Quartz emulator bus library.

--*/

mod bus;

pub use bus::{Bus, BusError};
