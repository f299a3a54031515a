/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use tokio::io::Result;

/// A device on an I2C bus, addressed by register (word address).
///
/// Implementations move bytes only: every call is one complete bus
/// transaction that either succeeds or fails as a whole.
#[async_trait::async_trait]
pub trait I2cPort: Send + std::fmt::Debug {
    async fn open(&mut self) -> Result<()>;
    async fn close(&mut self) -> Result<()>;

    /// Writes `register` followed by `data`.
    async fn write(&mut self, register: u8, data: &[u8]) -> Result<()>;

    /// Selects `register` and reads back `len` bytes.
    async fn read(&mut self, register: u8, len: usize) -> Result<Vec<u8>>;

    fn get_bus(&self) -> u8;
    fn get_address(&self) -> u16;
    fn get_port_name(&self) -> String;
}
