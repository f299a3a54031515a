/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::connection::port::I2cPort;
use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CBus, LinuxI2CMessage};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{Error, ErrorKind, Result};
use tokio::sync::Mutex;

pub struct LinuxI2cPort {
    handle: Option<Arc<Mutex<LinuxI2CBus>>>,
    path: PathBuf,
    bus: u8,
    address: u16,
}

impl std::fmt::Debug for LinuxI2cPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinuxI2cPort")
            .field("path", &self.path)
            .field("address", &self.address)
            .field("is_open", &self.handle.is_some())
            .finish()
    }
}

impl LinuxI2cPort {
    pub fn new(bus: u8, address: u16) -> Self {
        Self {
            handle: None,
            path: PathBuf::from(format!("/dev/i2c-{}", bus)),
            bus,
            address,
        }
    }

    fn check_node(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!(
                    "{} missing, ensure that i2c-dev kernel module is loaded",
                    path.display()
                ),
            ));
        }
        Ok(())
    }

    fn handle(&self) -> Result<Arc<Mutex<LinuxI2CBus>>> {
        match &self.handle {
            Some(handle) => Ok(Arc::clone(handle)),
            None => Err(Error::new(ErrorKind::NotConnected, "I2C bus is not open")),
        }
    }
}

#[async_trait::async_trait]
impl I2cPort for LinuxI2cPort {
    async fn open(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        Self::check_node(&self.path)?;

        let path = self.path.clone();
        let bus = tokio::task::spawn_blocking(move || -> Result<LinuxI2CBus> {
            LinuxI2CBus::new(&path).map_err(|e| Error::new(ErrorKind::Other, e.to_string()))
        })
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e))??;

        self.handle = Some(Arc::new(Mutex::new(bus)));
        info!("Opened I2C bus: {}", self.path.display());

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.handle.take().is_some() {
            debug!("Closed I2C bus: {}", self.path.display());
        }
        Ok(())
    }

    async fn write(&mut self, register: u8, data: &[u8]) -> Result<()> {
        let handle = self.handle()?;
        let address = self.address;

        let mut buf = Vec::with_capacity(data.len() + 1);
        buf.push(register);
        buf.extend_from_slice(data);

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut bus = handle.blocking_lock();
            let mut msgs = [LinuxI2CMessage::write(&buf).with_address(address)];

            bus.transfer(&mut msgs)
                .map(|_| ())
                .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))
        })
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e))?
    }

    async fn read(&mut self, register: u8, len: usize) -> Result<Vec<u8>> {
        let handle = self.handle()?;
        let address = self.address;

        // Combined transaction: select the register, then read without
        // releasing the bus in between.
        tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let mut bus = handle.blocking_lock();
            let reg = [register];
            let mut buf = vec![0u8; len];

            {
                let mut msgs = [
                    LinuxI2CMessage::write(&reg).with_address(address),
                    LinuxI2CMessage::read(&mut buf).with_address(address),
                ];
                bus.transfer(&mut msgs)
                    .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;
            }

            Ok(buf)
        })
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e))?
    }

    fn get_bus(&self) -> u8 {
        self.bus
    }

    fn get_address(&self) -> u16 {
        self.address
    }

    fn get_port_name(&self) -> String {
        self.path.display().to_string()
    }
}
