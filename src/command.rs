//! Command bytes understood by the MS5637.
//!
//! Unlike register-mapped sensors, the MS5637 is driven by single command
//! bytes: a reset, one PROM read per calibration word, a conversion start per
//! channel and a read of the ADC result.

/// Value written to register 0x00 to force a power-on reset.
pub(crate) const RESET: u8 = 0x1E;

/// Register holding the 24-bit ADC result.
pub(crate) const ADC_READ: u8 = 0x00;

/// Base address of the calibration PROM. Word `i` lives at `0xA0 + 2 * i`.
pub(crate) const PROM_BASE: u8 = 0xA0;

const CONVERT_D1: u8 = 0x40;
const CONVERT_D2: u8 = 0x50;

/// ADC conversion channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Channel {
    /// D1, the raw pressure sample.
    Pressure,
    /// D2, the raw temperature sample.
    Temperature,
}

impl Channel {
    /// The conversion-start command byte for this channel at the given rate.
    pub(crate) fn command(self, oversampling: OversamplingRatio) -> u8 {
        let base = match self {
            Channel::Pressure => CONVERT_D1,
            Channel::Temperature => CONVERT_D2,
        };

        base | oversampling.rate_bits()
    }
}

/// Number of internal ADC sub-conversions averaged per reading.
///
/// Higher rates trade conversion latency for lower noise. The rate is chosen
/// at construction and fixed for the lifetime of a driver instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OversamplingRatio {
    Osr256,
    Osr512,
    Osr1024,
    Osr2048,
    Osr4096,
    Osr8192,
}

impl OversamplingRatio {
    /// Rate bits OR:ed into the conversion command byte.
    pub(crate) fn rate_bits(self) -> u8 {
        match self {
            OversamplingRatio::Osr256 => 0x00,
            OversamplingRatio::Osr512 => 0x02,
            OversamplingRatio::Osr1024 => 0x04,
            OversamplingRatio::Osr2048 => 0x06,
            OversamplingRatio::Osr4096 => 0x08,
            OversamplingRatio::Osr8192 => 0x0A,
        }
    }

    /// Minimum time the ADC needs to finish a conversion at this rate.
    ///
    /// The MS5637 exposes no conversion-ready flag, so the driver waits this
    /// long unconditionally after starting a conversion.
    pub(crate) fn conversion_time_ms(self) -> u32 {
        match self {
            OversamplingRatio::Osr256 => 1,
            OversamplingRatio::Osr512 => 3,
            OversamplingRatio::Osr1024 => 4,
            OversamplingRatio::Osr2048 => 6,
            OversamplingRatio::Osr4096 => 10,
            OversamplingRatio::Osr8192 => 20,
        }
    }
}
