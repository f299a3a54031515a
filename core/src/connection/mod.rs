/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
pub mod backend;
pub mod port;
use crate::config::AteccConfig;
use crate::connection::port::I2cPort;
use crate::error::Result;
use log::{info, trace};

#[derive(Debug)]
pub struct Connection {
    pub port: Box<dyn I2cPort>,
    pub bus: u8,
    pub address: u16,
}

impl Connection {
    pub fn new(port: Box<dyn I2cPort>) -> Self {
        let bus = port.get_bus();
        let address = port.get_address();

        Connection { port, bus, address }
    }

    pub async fn open(&mut self) -> Result<()> {
        self.port.open().await?;
        info!(
            "Opened {} (bus {}, address {:#04x})",
            self.port.get_port_name(),
            self.bus,
            self.address
        );
        Ok(())
    }

    pub async fn close(&mut self) -> Result<()> {
        self.port.close().await?;
        Ok(())
    }

    pub async fn write(&mut self, register: u8, data: &[u8]) -> Result<()> {
        trace!(
            "I2C write addr:{:#04x} reg:{:#04x} val:{:02x?}",
            self.address, register, data
        );
        self.port.write(register, data).await?;
        Ok(())
    }

    pub async fn read(&mut self, register: u8, size: usize) -> Result<Vec<u8>> {
        trace!("I2C read addr:{:#04x} reg:{:#04x}", self.address, register);
        let buf = self.port.read(register, size).await?;
        trace!("I2C read: {:02x?}", buf);

        if buf.len() != size {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, got {}", size, buf.len()),
            )
            .into());
        }

        Ok(buf)
    }
}

/// Opens the i2c-dev node described by `config`.
#[cfg(feature = "linux-i2c")]
pub async fn get_i2c_connection(config: &AteccConfig) -> Result<Connection> {
    let port = backend::LinuxI2cPort::new(config.bus, config.address);
    let mut connection = Connection::new(Box::new(port));
    connection.open().await?;
    Ok(connection)
}

#[cfg(not(feature = "linux-i2c"))]
pub async fn get_i2c_connection(config: &AteccConfig) -> Result<Connection> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!(
            "no I2C backend for bus {} (built without the linux-i2c feature)",
            config.bus
        ),
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{MockPort, Op};

    #[tokio::test]
    async fn read_and_write_reach_the_port() {
        let mock = MockPort::new();
        mock.push_read(&[0xAB, 0xCD]);
        let mut conn = mock.connection();

        assert_eq!(conn.bus, 0);
        assert_eq!(conn.address, 0x60);

        conn.write(0x03, &[0x01, 0x02]).await.unwrap();
        assert_eq!(conn.read(0x03, 2).await.unwrap(), vec![0xAB, 0xCD]);

        assert_eq!(
            mock.ops(),
            vec![Op::Write(0x03, vec![0x01, 0x02]), Op::Read(0x03, 2)]
        );
    }

    #[tokio::test]
    async fn close_releases_the_port() {
        let mock = MockPort::new();
        let mut conn = mock.connection();

        conn.close().await.unwrap();
        assert_eq!(mock.ops(), vec![Op::Close]);
    }

    #[tokio::test]
    async fn short_read_is_a_transport_error() {
        let mock = MockPort::new();
        mock.push_read(&[0x07]);
        let mut conn = mock.connection();

        match conn.read(0x03, 4).await {
            Err(Error::Transport(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn port_errors_pass_through() {
        let mock = MockPort::new();
        mock.fail_writes_to(0x03);
        let mut conn = mock.connection();

        assert!(matches!(conn.write(0x03, &[0x00]).await, Err(Error::Transport(_))));
    }
}
