use embedded_hal::i2c::SevenBitAddress;

/// Largest single transfer the MS5637 produces (the 24-bit ADC result).
pub const MAX_TRANSFER_BYTES: usize = 3;

/// Transport abstraction over the two bus operations the MS5637 needs.
#[allow(async_fn_in_trait)]
pub trait Bus {
    type Error;

    /// Writes a single `value` byte to `register`.
    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Reads `data.len()` bytes starting at `register`.
    async fn read_registers(&mut self, register: u8, data: &mut [u8]) -> Result<(), Self::Error>;
}

pub struct I2c<T> {
    i2c: T,
    address: SevenBitAddress,
}

impl<T> I2c<T>
where
    T: embedded_hal_async::i2c::I2c,
{
    pub(crate) fn new(i2c: T, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }
}

impl<T> Bus for I2c<T>
where
    T: embedded_hal_async::i2c::I2c,
{
    type Error = <T as embedded_hal_async::i2c::ErrorType>::Error;

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value]).await?;

        Ok(())
    }

    async fn read_registers(&mut self, register: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[register], data).await?;

        Ok(())
    }
}
