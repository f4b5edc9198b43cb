/*++

Licensed under the Apache-2.0 license.

File Name:

    sensor.rs

Abstract:

    File contains API for configuring and arming the tamper sensor block

--*/

use bitfield::bitfield;
use bitflags::bitflags;

use crate::reg::sensor_regs::{
    SENSOR_CHAN_EN, SENSOR_CTRL, SENSOR_INT, SENSOR_INT_PENDING, SENSOR_STATUS,
};
use crate::Mmio;

bitflags! {
    /// Physical tamper channels
    pub struct SensorChannels: u32 {
        /// Supply voltage above the high threshold
        const VOLT_HIGH = 1 << 0;

        /// Supply voltage below the low threshold
        const VOLT_LOW = 1 << 1;

        /// Die temperature above the high threshold
        const TEMP_HIGH = 1 << 2;

        /// Die temperature below the low threshold
        const TEMP_LOW = 1 << 3;

        /// Glitch detected on the system clock
        const CLOCK_GLITCH = 1 << 4;

        /// Protective mesh continuity broken
        const MESH = 1 << 5;

        /// External crystal removed
        const CRYSTAL = 1 << 6;
    }
}

/// Trip response selected for the sensor block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// A trip resets the CPU directly; no software runs
    Reset,

    /// A trip raises a maskable interrupt for the tamper handler
    Interrupt,
}

/// Dynamic sampling frequency for the sensor excitation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFreq {
    Hz500 = 0,
    Hz1000 = 1,
    Hz2000 = 2,
    Hz4000 = 3,
}

bitfield! {
    /// Sensor block control register
    #[derive(Clone, Copy)]
    pub struct SensorControl(u32);

    /// Block clock domain enable
    pub clock_enable, set_clock_enable: 0;

    /// Analog front-end arm
    pub afe_enable, set_afe_enable: 1;

    /// Glitch filter on the digital trip lines
    pub glitch_filter, set_glitch_filter: 2;

    /// Response select; set for interrupt, clear for direct reset
    pub interrupt_response, set_interrupt_response: 3;

    /// Dynamic sample frequency select
    pub u8, sample_freq, set_sample_freq: 11, 8;
}

bitfield! {
    /// Latched sensor trip status
    #[derive(Default, Clone, Copy, PartialEq, Eq)]
    pub struct SensorStatus(u32);

    pub volt_high, _: 0;
    pub volt_low, _: 1;
    pub temp_high, _: 2;
    pub temp_low, _: 3;
    pub clock_glitch, _: 4;
    pub mesh, _: 5;
    pub crystal, _: 6;

    /// Key-destroy-required condition
    pub key_destroy, _: 14;
}

impl From<SensorStatus> for u32 {
    /// Converts to this type from the input type.
    fn from(status: SensorStatus) -> Self {
        status.0
    }
}

/// One-time sensor front-end configuration
#[derive(Debug, Clone, Copy)]
pub struct SensorConfig {
    /// Channels armed for dynamic sampling
    pub channels: SensorChannels,

    /// Sample and excitation frequency
    pub sample_freq: SampleFreq,

    /// Glitch filtering on the trip lines
    pub glitch_filter: bool,

    /// Trip response
    pub response: ResponseMode,
}

impl Default for SensorConfig {
    /// Production posture: every channel armed, trips filtered, interrupt
    /// response so the key wipe runs before any reset.
    fn default() -> Self {
        Self {
            channels: SensorChannels::all(),
            sample_freq: SampleFreq::Hz1000,
            glitch_filter: true,
            response: ResponseMode::Interrupt,
        }
    }
}

/// Tamper sensor front-end
pub struct SensorBlock<TMmio: Mmio> {
    mmio: TMmio,
}

impl<TMmio: Mmio> SensorBlock<TMmio> {
    pub fn new(mmio: TMmio) -> Self {
        Self { mmio }
    }

    /// One-time boot configuration; leaves the block armed.
    ///
    /// Must run exactly once per boot before tamper events can be trusted.
    /// The analog front-ends are armed last, after every stale trip has
    /// been dropped and the response path is programmed.
    pub fn configure(&mut self, config: &SensorConfig) {
        // Bring up the block clock domain before touching anything else.
        let mut ctrl = SensorControl(0);
        ctrl.set_clock_enable(true);
        self.mmio.write_reg(SENSOR_CTRL, ctrl.0);

        // Drop trip state left over from before this boot.
        self.clear_status();
        self.clear_interrupt();

        self.mmio.write_reg(SENSOR_CHAN_EN, config.channels.bits());

        ctrl.set_sample_freq(config.sample_freq as u8);
        ctrl.set_glitch_filter(config.glitch_filter);
        ctrl.set_interrupt_response(matches!(config.response, ResponseMode::Interrupt));
        self.mmio.write_reg(SENSOR_CTRL, ctrl.0);

        ctrl.set_afe_enable(true);
        self.mmio.write_reg(SENSOR_CTRL, ctrl.0);
    }

    /// Select whether a trip resets the CPU or raises the tamper interrupt.
    pub fn set_response_mode(&mut self, mode: ResponseMode) {
        let mut ctrl = SensorControl(self.mmio.read_reg(SENSOR_CTRL));
        ctrl.set_interrupt_response(matches!(mode, ResponseMode::Interrupt));
        self.mmio.write_reg(SENSOR_CTRL, ctrl.0);
    }

    /// Raw latched trip status.
    pub fn status(&self) -> SensorStatus {
        SensorStatus(self.mmio.read_reg(SENSOR_STATUS))
    }

    /// Acknowledge every latched trip bit.
    ///
    /// Write-one-to-clear; acknowledging re-arms the block for the next
    /// trip.
    pub fn clear_status(&mut self) {
        let status = self.mmio.read_reg(SENSOR_STATUS);
        self.mmio.write_reg(SENSOR_STATUS, status);
    }

    /// Acknowledge the latched interrupt line.
    pub fn clear_interrupt(&mut self) {
        self.mmio.write_reg(SENSOR_INT, SENSOR_INT_PENDING);
    }

    /// Retrieve the latched interrupt line.
    pub fn interrupt_pending(&self) -> bool {
        self.mmio.read_reg(SENSOR_INT) & SENSOR_INT_PENDING != 0
    }

    /// Force the hardware reset response while a trip is latched.
    ///
    /// Last-resort path for the tamper handler: with the trip still
    /// pending, dropping the response mode back to `Reset` makes the block
    /// reset the CPU without further software involvement.
    pub fn force_reset(&mut self) {
        self.set_response_mode(ResponseMode::Reset);
    }
}
