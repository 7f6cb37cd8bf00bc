//! Errors that can occur when using the MS5637 device.
//!
//! This module provides an error type that encapsulates all possible errors that can occur during communication with the MS5637.
//! It is generic over the underlying bus error type.

/// This represents all possible errors that can occur when using the MS5637 device.
#[derive(Debug)]
pub enum Ms5637Error<BusError> {
    /// An error has occurred in the I2C driver
    Bus(BusError),

    /// The factory calibration PROM failed its CRC-4 check.
    ///
    /// Indicates corrupted calibration data, or a device that is not an
    /// MS5637 answering at the configured address. Construction can be
    /// retried, e.g. after a fresh reset.
    ChecksumMismatch {
        /// The CRC nibble stored in bits 12-15 of PROM word 0.
        expected: u8,
        /// The CRC nibble computed over the words that were read.
        computed: u8,
    },
}
