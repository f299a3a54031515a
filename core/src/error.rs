/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::core::session::SessionState;
use crate::protocol::Status;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Passed through unchanged from the I2C port.
    #[error("I2C transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("invalid response, got {len} bytes but at least 4 are required")]
    FrameTooShort { len: usize },

    #[error("checksum verification failure (expected {expected:02X?}, got {received:02X?})")]
    ChecksumMismatch { expected: [u8; 2], received: [u8; 2] },

    #[error("wake-up failed: {0}")]
    WakeFailed(#[source] Box<Error>),

    #[error("device status/error: {}", .0.description())]
    CommandStatus(Status),

    #[error("invalid status/error code: {0:#04x}")]
    UnknownStatus(u8),

    #[error("short response, expected at least {expected} bytes but got {received}")]
    ShortResponse { expected: usize, received: usize },

    #[error("device is not awake (session is {0:?})")]
    NotAwake(SessionState),

    #[error("command payload of {len} bytes does not fit in a packet")]
    PayloadTooLarge { len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
