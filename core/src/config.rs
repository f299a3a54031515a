/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::error::{Error, Result};
use std::time::Duration;

pub const DEFAULT_I2C_BUS: u8 = 0;
pub const DEFAULT_I2C_ADDRESS: u16 = 0x60;

/// Wake high delay (tWHI) before the wake response can be read,
/// (p56, 9.3 AC Parameters: All I/O Interfaces, ATECC608A Full Datasheet).
pub const WAKE_SETTLE_TIME: Duration = Duration::from_micros(1500);

/// Max command execution time with the Clock Divider left at its
/// default/recommended value of 0x00, (p66, Table 10-5, ATECC608A Full Datasheet).
pub const CMD_MAX_EXECUTION_TIME: Duration = Duration::from_millis(200);

pub const CMD_EXECUTION_MARGIN: Duration = Duration::from_millis(50);

/// Where the secure element lives and how long to wait on it.
///
/// Both waits may be raised but never lowered below the documented minimums,
/// otherwise responses are read before the device produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AteccConfig {
    pub bus: u8,
    pub address: u16,
    pub wake_settle: Duration,
    pub execution_time: Duration,
}

impl Default for AteccConfig {
    fn default() -> Self {
        AteccConfig {
            bus: DEFAULT_I2C_BUS,
            address: DEFAULT_I2C_ADDRESS,
            wake_settle: WAKE_SETTLE_TIME,
            execution_time: CMD_MAX_EXECUTION_TIME + CMD_EXECUTION_MARGIN,
        }
    }
}

impl AteccConfig {
    pub fn new(bus: u8, address: u16) -> Self {
        AteccConfig {
            bus,
            address,
            ..Default::default()
        }
    }

    pub fn with_wake_settle(mut self, wake_settle: Duration) -> Self {
        self.wake_settle = wake_settle;
        self
    }

    pub fn with_execution_time(mut self, execution_time: Duration) -> Self {
        self.execution_time = execution_time;
        self
    }

    pub fn validate(&self) -> Result<()> {
        // 7-bit addressing only
        if self.address > 0x7F {
            return Err(Error::InvalidConfig(format!(
                "I2C address {:#04x} is out of range",
                self.address
            )));
        }

        if self.wake_settle < WAKE_SETTLE_TIME {
            return Err(Error::InvalidConfig(format!(
                "wake settle time {:?} is below the device minimum of {:?}",
                self.wake_settle, WAKE_SETTLE_TIME
            )));
        }

        if self.execution_time < CMD_MAX_EXECUTION_TIME {
            return Err(Error::InvalidConfig(format!(
                "execution time {:?} is below the device maximum of {:?}",
                self.execution_time, CMD_MAX_EXECUTION_TIME
            )));
        }

        Ok(())
    }
}
