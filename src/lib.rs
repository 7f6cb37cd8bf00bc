//! Async driver for the MS5637 barometric pressure and temperature sensor.
//!
//! The MS5637 is a command-driven I2C device. The driver resets it, loads and
//! CRC-validates the factory calibration PROM, and then produces calibrated
//! readings by running oversampled ADC conversions and applying the
//! manufacturer's first- and second-order compensation algorithm.
//!
//! ```rust,no_run
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::i2c::I2c;
//! use ms5637_rs::{AdoPinState, Ms5637, OversamplingRatio};
//! # async fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> Result<(), ms5637_rs::Ms5637Error<I::Error>> {
//!
//! let mut device = Ms5637::new_i2c(
//!     i2c,
//!     AdoPinState::Low,
//!     OversamplingRatio::Osr8192,
//!     delay,
//! ).await?;
//!
//! let measurement = device.read_sensor_data().await?;
//! # let _ = measurement;
//! # Ok(())
//! # }
//! ```
#![no_std]

pub mod bus;
mod calibration;
pub mod command;
pub mod error;
mod ms5637;
pub mod testing;

pub use crate::command::OversamplingRatio;
pub use crate::error::Ms5637Error;
pub use crate::ms5637::{AdoPinState, Measurement, Ms5637, Ms5637Result};
