/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
#[cfg(feature = "linux-i2c")]
pub mod linux_backend;
#[cfg(feature = "linux-i2c")]
pub use linux_backend::LinuxI2cPort;
