//! Test doubles for exercising the driver without hardware.

use crate::bus::{Bus, MAX_TRANSFER_BYTES};
use embedded_hal_async::delay::DelayNs;
use heapless::{Deque, Vec};

#[derive(Debug)]
struct Response {
    register: u8,
    bytes: [u8; MAX_TRANSFER_BYTES],
    len: usize,
}

/// A scripted bus: reads are served in FIFO order from responses queued with
/// [`FakeBus::expect_read`], writes are recorded for later inspection.
pub struct FakeBus<const N: usize> {
    reads: Deque<Response, N>,
    writes: Vec<(u8, u8), N>,
}

impl<const N: usize> FakeBus<N> {
    pub fn new() -> Self {
        FakeBus {
            reads: Deque::new(),
            writes: Vec::new(),
        }
    }

    /// Queues the next read response for `register`.
    pub fn expect_read(&mut self, register: u8, data: &[u8]) {
        let mut bytes = [0u8; MAX_TRANSFER_BYTES];
        bytes[..data.len()].copy_from_slice(data);
        self.reads
            .push_back(Response {
                register,
                bytes,
                len: data.len(),
            })
            .unwrap();
    }

    /// All `(register, value)` pairs written so far, in order.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }
}

impl<const N: usize> Default for FakeBus<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Bus for FakeBus<N> {
    type Error = ();

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.writes.push((register, value)).unwrap();

        Ok(())
    }

    async fn read_registers(&mut self, register: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        let Some(response) = self.reads.pop_front() else {
            panic!("No scripted response left for register 0x{:02X}", register);
        };

        if response.register != register || response.len != data.len() {
            panic!(
                "Expected a read of {} bytes from register 0x{:02X}, got one of {} bytes from 0x{:02X}",
                response.len, response.register, data.len(), register
            );
        }

        data.copy_from_slice(&response.bytes[..response.len]);

        Ok(())
    }
}

/// A delay that records every requested millisecond wait instead of sleeping.
pub struct FakeDelay {
    delays_ms: Vec<u32, 16>,
}

impl FakeDelay {
    pub fn new() -> Self {
        FakeDelay { delays_ms: Vec::new() }
    }

    /// Every delay requested so far, in milliseconds, in order.
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }
}

impl Default for FakeDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, _: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms).unwrap();
    }
}
