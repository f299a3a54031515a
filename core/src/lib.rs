/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
pub mod config;
pub mod connection;
pub mod core;
pub mod error;
pub mod protocol;

#[cfg(test)]
pub(crate) mod testing;

pub use config::AteccConfig;
pub use connection::{Connection, get_i2c_connection};
pub use crate::core::device::{Atecc, DeviceInfo, SelfTest, SelfTestReport};
pub use crate::core::executor::Executor;
pub use crate::core::session::SessionState;
pub use error::{Error, Result};
