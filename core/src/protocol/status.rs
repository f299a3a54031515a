/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::error::{Error, Result};

/// Device status/error codes, (p64-65, Table 10-3, ATECC608A Full Datasheet).
///
/// A status is only carried by 4 byte responses, longer responses hold
/// command results instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    VerifyMiscompare,
    ParseError,
    EccFault,
    SelfTestError,
    HealthTestError,
    ExecutionError,
    BeforeFirstCommand,
    WatchdogImminent,
    CommunicationError,
    Unknown(u8),
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Status::Success,
            0x01 => Status::VerifyMiscompare,
            0x03 => Status::ParseError,
            0x05 => Status::EccFault,
            0x07 => Status::SelfTestError,
            0x08 => Status::HealthTestError,
            0x0F => Status::ExecutionError,
            0x11 => Status::BeforeFirstCommand,
            0xEE => Status::WatchdogImminent,
            0xFF => Status::CommunicationError,
            other => Status::Unknown(other),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => 0x00,
            Status::VerifyMiscompare => 0x01,
            Status::ParseError => 0x03,
            Status::EccFault => 0x05,
            Status::SelfTestError => 0x07,
            Status::HealthTestError => 0x08,
            Status::ExecutionError => 0x0F,
            Status::BeforeFirstCommand => 0x11,
            Status::WatchdogImminent => 0xEE,
            Status::CommunicationError => 0xFF,
            Status::Unknown(code) => code,
        }
    }
}

impl Status {
    pub fn code(self) -> u8 {
        self.into()
    }

    pub fn description(self) -> &'static str {
        match self {
            Status::Success => "successful command execution",
            Status::VerifyMiscompare => "checkmac or verify miscompare",
            Status::ParseError => "parse error",
            Status::EccFault => "ECC fault",
            Status::SelfTestError => "self test error",
            Status::HealthTestError => "health test error",
            Status::ExecutionError => "execution error",
            Status::BeforeFirstCommand => "after wake, prior to first command",
            Status::WatchdogImminent => "watchdog about to expire",
            Status::CommunicationError => "CRC or other communications error",
            Status::Unknown(_) => "invalid status/error code",
        }
    }

    /// Maps the status of a command response onto a result.
    ///
    /// Unrecognized codes fail closed.
    pub fn check(self) -> Result<()> {
        match self {
            Status::Success => Ok(()),
            Status::Unknown(code) => Err(Error::UnknownStatus(code)),
            other => Err(Error::CommandStatus(other)),
        }
    }

    /// Same as [`Status::check`], but also accepts the status reported right
    /// after a wake-up.
    pub fn check_after_wake(self) -> Result<()> {
        match self {
            Status::BeforeFirstCommand => Ok(()),
            other => other.check(),
        }
    }
}
