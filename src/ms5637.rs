use crate::bus::{Bus, I2c};
use crate::calibration::Calibration;
use crate::command::{Channel, OversamplingRatio, ADC_READ, RESET};
use crate::error::Ms5637Error;
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::delay::DelayNs;

/// Type alias for an Ms5637 driver communicating over I2C
type Ms5637I2c<T, D> = Ms5637<I2c<T>, D>;

/// Type alias used to simplify return types throughout the driver
pub type Ms5637Result<T, BusError> = Result<T, Ms5637Error<BusError>>;

/// Time to wait after a power-on reset before the PROM may be read.
const RESET_SETTLE_MS: u32 = 100;

/// Main MS5637 driver struct
///
/// Owns the bus handle and the delay provider for its whole lifetime. The
/// MS5637 offers no conversion-ready flag, so every ADC read blocks on a
/// fixed wait determined by the oversampling ratio.
///
/// The driver is fully synchronous from the device's point of view and is
/// not internally synchronized; callers using it from more than one task
/// must serialize access themselves.
pub struct Ms5637<B, D> {
    bus: B,
    delay: D,
    oversampling: OversamplingRatio,
    calibration: Calibration,
}

impl<T, D> Ms5637I2c<T, D>
where
    T: embedded_hal_async::i2c::I2c,
    I2c<T>: Bus,
    D: DelayNs,
{
    /// Constructs a new Ms5637 driver instance that communicates over I2C.
    ///
    /// This function will:
    /// - Force a power-on reset and wait for the device to settle
    /// - Read the factory calibration words from PROM
    /// - Validate them against the CRC embedded in word 0
    ///
    /// The oversampling ratio is fixed for the lifetime of the returned
    /// driver. On a checksum mismatch no driver is returned; construction
    /// may simply be retried, which re-fetches the calibration from the
    /// device.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::i2c::I2c;
    /// # use ms5637_rs::Ms5637Result;
    ///  use ms5637_rs::{AdoPinState, Ms5637, OversamplingRatio};
    /// # async fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> Ms5637Result<(), I::Error> {
    ///
    ///  let device = Ms5637::new_i2c(
    ///     i2c,
    ///     AdoPinState::Low,
    ///     OversamplingRatio::Osr8192,
    ///     delay,
    ///  ).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_i2c(
        i2c: T,
        ado_pin_state: AdoPinState,
        oversampling: OversamplingRatio,
        delay: D,
    ) -> Ms5637Result<Self, <I2c<T> as Bus>::Error> {
        Self::new(I2c::new(i2c, ado_pin_state.into()), oversampling, delay).await
    }
}

impl<B, D> Ms5637<B, D>
where
    B: Bus,
    D: DelayNs,
{
    /// Creates a new driver instance over an already-wrapped bus.
    pub(crate) async fn new(
        mut bus: B,
        oversampling: OversamplingRatio,
        mut delay: D,
    ) -> Ms5637Result<Self, B::Error> {
        bus.write_register(ADC_READ, RESET)
            .await
            .map_err(Ms5637Error::Bus)?;

        // PROM contents are only valid once the reset has settled.
        delay.delay_ms(RESET_SETTLE_MS).await;

        let calibration = Calibration::new(&mut bus).await?;

        Ok(Ms5637 {
            bus,
            delay,
            oversampling,
            calibration,
        })
    }

    /// Performs one oversampled pressure and temperature measurement.
    ///
    /// Runs a D1 (pressure) and a D2 (temperature) conversion back to back,
    /// waiting out the fixed conversion time after each, then compensates
    /// the raw samples with the calibration coefficients.
    ///
    /// Temperature is in °C, pressure in millibars. Each call blocks for two
    /// conversion waits, up to ~40 ms at the highest oversampling ratio.
    pub async fn read_sensor_data(&mut self) -> Ms5637Result<Measurement, B::Error> {
        let d1 = self.convert(Channel::Pressure).await?;
        let d2 = self.convert(Channel::Temperature).await?;

        Ok(self.calibration.compensate(d1, d2))
    }

    /// Starts a conversion on `channel`, waits out the mandated conversion
    /// time and reads back the 24-bit big-endian result.
    async fn convert(&mut self, channel: Channel) -> Ms5637Result<u32, B::Error> {
        self.bus
            .write_register(channel.command(self.oversampling), 0x00)
            .await
            .map_err(Ms5637Error::Bus)?;

        self.delay
            .delay_ms(self.oversampling.conversion_time_ms())
            .await;

        let mut buf = [0u8; 3];
        self.bus
            .read_registers(ADC_READ, &mut buf)
            .await
            .map_err(Ms5637Error::Bus)?;

        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }
}

/// This enum should reflect the physical state of the ADO pin. It determines
/// the I2C address the device answers at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AdoPinState {
    /// ADO is pulled high by connection to VDDIO
    High,
    /// ADO is pulled low by connection to GND (the usual altimeter wiring)
    Low,
}

impl From<AdoPinState> for SevenBitAddress {
    fn from(state: AdoPinState) -> Self {
        match state {
            AdoPinState::High => 0x77,
            AdoPinState::Low => 0x76,
        }
    }
}

/// Holds one calibrated pressure and temperature sample.
#[derive(Copy, Clone, Debug)]
pub struct Measurement {
    /// Pressure in millibars.
    pub pressure: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}
