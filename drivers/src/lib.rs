/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Quartz tamper-protection driver library.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod reg;

mod error;
pub mod printer;
pub mod wait;

mod bpk;
mod mmio;
mod reset;
mod sensor;
mod tamper;

pub type QuartzResult<T> = Result<T, u32>;
pub use bpk::{Bpk, BpkErr, KeyRegion, LockBits, BPK_KEY_LENGTH};
pub use error::QuartzComponent;
pub use mmio::Mmio;
pub use reset::{ResetReason, ResetService};
pub use sensor::{
    ResponseMode, SampleFreq, SensorBlock, SensorChannels, SensorConfig, SensorControl,
    SensorStatus,
};
pub use tamper::{TamperErr, TamperMonitor, WIPE_PATTERN};

cfg_if::cfg_if! {
    if #[cfg(not(feature = "std"))] {
        pub use mmio::RealMmio;
    }
}
