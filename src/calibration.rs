use crate::bus::Bus;
use crate::command::PROM_BASE;
use crate::error::Ms5637Error;
use crate::ms5637::{Measurement, Ms5637Result};

/// Number of PROM words, including the CRC word and the reserved trailing word.
const PROM_WORDS: usize = 8;

/// Number of PROM words actually stored on the device.
const PROM_WORDS_READ: usize = 7;

/// Factory calibration coefficients plus the second-order correction state.
///
/// The coefficients are converted to `f64` once at load; all compensation
/// arithmetic is done in double precision.
pub struct Calibration {
    /// C1, pressure sensitivity.
    pressure_sensitivity: f64,
    /// C2, pressure offset.
    pressure_offset: f64,
    /// C3, temperature coefficient of pressure sensitivity.
    temp_coeff_sensitivity: f64,
    /// C4, temperature coefficient of pressure offset.
    temp_coeff_offset: f64,
    /// C5, reference temperature.
    reference_temperature: f64,
    /// C6, temperature coefficient of the temperature.
    temp_coeff_temperature: f64,

    // Second-order correction terms. These persist between measurements:
    // when the first-order temperature lands exactly on 20 °C neither
    // correction branch runs, and the reference algorithm reuses whatever
    // the previous measurement left behind.
    t2: f64,
    off2: f64,
    sens2: f64,
}

impl Calibration {
    /// Reads the calibration words from PROM and validates them.
    ///
    /// The device stores 7 big-endian words at `0xA0 + 2 * i`; word 7 does
    /// not exist on the chip and stays zero. Bits 12-15 of word 0 hold the
    /// CRC nibble the rest of the table must match.
    pub(crate) async fn new<B: Bus>(bus: &mut B) -> Ms5637Result<Self, B::Error> {
        let mut words = [0u16; PROM_WORDS];
        for (i, word) in words.iter_mut().take(PROM_WORDS_READ).enumerate() {
            let mut buf = [0u8; 2];
            bus.read_registers(PROM_BASE | ((i as u8) << 1), &mut buf)
                .await
                .map_err(Ms5637Error::Bus)?;

            *word = u16::from_be_bytes(buf);
        }

        Self::from_words(&words)
    }

    /// Validates the CRC embedded in word 0 and extracts the coefficients.
    pub(crate) fn from_words<E>(words: &[u16; PROM_WORDS]) -> Result<Self, Ms5637Error<E>> {
        let expected = (words[0] >> 12) as u8;
        let computed = crc4(words);

        if computed != expected {
            return Err(Ms5637Error::ChecksumMismatch { expected, computed });
        }

        Ok(Self {
            pressure_sensitivity: words[1] as f64,
            pressure_offset: words[2] as f64,
            temp_coeff_sensitivity: words[3] as f64,
            temp_coeff_offset: words[4] as f64,
            reference_temperature: words[5] as f64,
            temp_coeff_temperature: words[6] as f64,
            t2: 0.0,
            off2: 0.0,
            sens2: 0.0,
        })
    }

    /// Turns one raw sample pair into calibrated temperature and pressure.
    ///
    /// First-order compensation per the datasheet, followed by the
    /// second-order low-temperature corrections. The correction branches are
    /// not mutually exclusive, and at a first-order temperature of exactly
    /// 20 °C none of them runs, leaving the terms from the previous call in
    /// effect.
    pub(crate) fn compensate(&mut self, d1: u32, d2: u32) -> Measurement {
        let dt = d2 as f64 - self.reference_temperature * 256.0;

        let mut offset = self.pressure_offset * 131_072.0 + dt * self.temp_coeff_offset / 64.0;
        let mut sens = self.pressure_sensitivity * 65_536.0 + dt * self.temp_coeff_sensitivity / 128.0;

        // First-order estimate, divided down from hundredths of a degree.
        let mut temperature = (2000.0 + dt * self.temp_coeff_temperature / 8_388_608.0) / 100.0;

        if temperature > 20.0 {
            self.t2 = 5.0 * dt * dt / 274_877_906_944.0; // 2^38
            self.off2 = 0.0;
            self.sens2 = 0.0;
        }
        if temperature < 20.0 {
            self.t2 = 3.0 * dt * dt / 8_589_934_592.0; // 2^33
            self.off2 = 61.0 * (100.0 * temperature - 2000.0) * (100.0 * temperature - 2000.0) / 16.0;
            self.sens2 = 29.0 * (100.0 * temperature - 2000.0) * (100.0 * temperature - 2000.0) / 16.0;
        }
        if temperature < -15.0 {
            self.off2 += 17.0 * (100.0 * temperature + 1500.0) * (100.0 * temperature + 1500.0);
            self.sens2 += 9.0 * (100.0 * temperature + 1500.0) * (100.0 * temperature + 1500.0);
        }

        temperature -= self.t2 / 100.0;
        offset -= self.off2;
        sens -= self.sens2;

        let pressure = (((d1 as f64 * sens) / 2_097_152.0 - offset) / 32_768.0) / 100.0;

        Measurement {
            pressure,
            temperature,
        }
    }
}

/// CRC-4/MS5637 over the 8 calibration words.
///
/// Works on a copy: word 0 is masked to its low 12 bits (the stored CRC
/// nibble occupies the top 4) and word 7 is zeroed. The words are then folded
/// byte by byte into a 16-bit remainder, high byte first, with 8 shift/XOR
/// rounds against 0x3000 per byte. The result is the top nibble of the
/// remainder.
pub(crate) fn crc4(words: &[u16; PROM_WORDS]) -> u8 {
    let mut words = *words;
    words[0] &= 0x0FFF;
    words[PROM_WORDS - 1] = 0;

    let mut remainder: u16 = 0;
    for count in 0..PROM_WORDS * 2 {
        if count % 2 == 1 {
            remainder ^= words[count >> 1] & 0x00FF;
        } else {
            remainder ^= words[count >> 1] >> 8;
        }

        for _ in 0..8 {
            remainder = if remainder & 0x8000 != 0 {
                (remainder << 1) ^ 0x3000
            } else {
                remainder << 1
            };
        }
    }

    ((remainder >> 12) & 0x000F) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;

    // Word 0 carries the matching CRC nibble (0x8) in its top 4 bits.
    const GOLDEN_WORDS: [u16; 8] = [0x8000, 46372, 43981, 29059, 27842, 31553, 28165, 0];

    fn golden_calibration() -> Calibration {
        Calibration::from_words::<()>(&GOLDEN_WORDS).unwrap()
    }

    #[test]
    fn crc4_all_zero_words() {
        assert_eq!(0x0, crc4(&[0u16; 8]));
    }

    #[test]
    fn crc4_golden_words() {
        assert_eq!(0x8, crc4(&GOLDEN_WORDS));
    }

    #[test]
    fn crc4_is_deterministic() {
        assert_eq!(crc4(&GOLDEN_WORDS), crc4(&GOLDEN_WORDS));
    }

    #[test]
    fn crc4_masks_crc_nibble_and_reserved_word() {
        // Pre-masking the table by hand must not change the result, since
        // the computation itself works on a masked copy.
        let mut masked = GOLDEN_WORDS;
        masked[0] &= 0x0FFF;
        masked[7] = 0;
        assert_eq!(crc4(&GOLDEN_WORDS), crc4(&masked));

        let mut noisy = GOLDEN_WORDS;
        noisy[7] = 0xFFFF;
        assert_eq!(crc4(&GOLDEN_WORDS), crc4(&noisy));
    }

    #[tokio::test]
    async fn load_calibration_from_prom() {
        let mut bus: FakeBus<16> = FakeBus::new();
        for (i, word) in GOLDEN_WORDS.iter().take(7).enumerate() {
            bus.expect_read(0xA0 + 2 * i as u8, &word.to_be_bytes());
        }

        let calibration = Calibration::new(&mut bus).await.unwrap();

        assert_eq!(46372.0, calibration.pressure_sensitivity);
        assert_eq!(43981.0, calibration.pressure_offset);
        assert_eq!(29059.0, calibration.temp_coeff_sensitivity);
        assert_eq!(27842.0, calibration.temp_coeff_offset);
        assert_eq!(31553.0, calibration.reference_temperature);
        assert_eq!(28165.0, calibration.temp_coeff_temperature);
    }

    #[tokio::test]
    async fn corrupt_prom_word_fails_checksum() {
        let mut corrupted = GOLDEN_WORDS;
        corrupted[3] ^= 0x0001;

        let mut bus: FakeBus<16> = FakeBus::new();
        for (i, word) in corrupted.iter().take(7).enumerate() {
            bus.expect_read(0xA0 + 2 * i as u8, &word.to_be_bytes());
        }

        let result = Calibration::new(&mut bus).await;
        assert!(matches!(
            result,
            Err(Ms5637Error::ChecksumMismatch {
                expected: 0x8,
                computed: 0x9,
            })
        ));
    }

    #[test]
    fn compensate_above_20_degrees() {
        let mut calibration = golden_calibration();

        let measurement = calibration.compensate(6465444, 8077636);

        assert_eq!(20.00228311931423, measurement.temperature);
        assert_eq!(1100.0295763915724, measurement.pressure);
    }

    #[test]
    fn compensate_below_20_degrees() {
        let mut calibration = golden_calibration();

        let measurement = calibration.compensate(6465444, 8000000);

        assert_eq!(17.37461799621582, measurement.temperature);
        assert_eq!(1093.7172708321857, measurement.pressure);
    }

    #[test]
    fn compensate_below_minus_15_degrees() {
        let mut calibration = golden_calibration();

        let measurement = calibration.compensate(6465444, 7035182);

        assert_eq!(-18.79321581864264, measurement.temperature);
        assert_eq!(1009.1283558944147, measurement.pressure);
    }

    #[test]
    fn correction_terms_persist_at_exactly_20_degrees() {
        // d2 == C5 * 2^8 makes dT zero and the first-order temperature
        // exactly 20 °C, so no correction branch runs.
        let mut calibration = golden_calibration();

        let fresh = calibration.compensate(6465444, 31553 * 256);
        assert_eq!(20.0, fresh.temperature);
        assert_eq!(1100.0240797424317, fresh.pressure);

        // A cold measurement leaves nonzero terms behind; the next
        // measurement on the boundary inherits them.
        calibration.compensate(6465444, 8000000);

        let inherited = calibration.compensate(6465444, 31553 * 256);
        assert_eq!(19.978986587524414, inherited.temperature);
        assert_eq!(1099.987330840602, inherited.pressure);
    }
}
