/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::config::AteccConfig;
use crate::connection::Connection;
use crate::core::executor::Executor;
use crate::error::{Error, Result};
use crate::protocol::{Command, Opcode, Status};
use log::info;
use std::fmt;

// SelfTest param1: run all available tests
const SELF_TEST_ALL: u8 = 0x3B;

// Read param1: 32 byte read from the configuration zone
const READ_CONFIG_32: u8 = 0x80;

const INFO_MIN_LEN: usize = 13;

/// Self test result bits, (p100, Table 11-43, ATECC608A Full Datasheet).
/// A set bit in the result marks a failed test.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTest {
    Rng = 0x20,
    Aes = 0x10,
    Ecdh = 0x08,
    Ecdsa = 0x02,
    Drbg = 0x01,
}

impl SelfTest {
    pub const ALL: [SelfTest; 5] = [
        SelfTest::Rng,
        SelfTest::Aes,
        SelfTest::Ecdh,
        SelfTest::Ecdsa,
        SelfTest::Drbg,
    ];

    pub fn mask(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            SelfTest::Rng => "RNG",
            SelfTest::Aes => "AES",
            SelfTest::Ecdh => "ECDH",
            SelfTest::Ecdsa => "ECDSA",
            SelfTest::Drbg => "DRBG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestReport {
    result: u8,
}

impl SelfTestReport {
    pub fn from_result(result: u8) -> Self {
        SelfTestReport { result }
    }

    pub fn passed(&self, test: SelfTest) -> bool {
        self.result & test.mask() == 0
    }

    pub fn all_passed(&self) -> bool {
        SelfTest::ALL.iter().all(|test| self.passed(*test))
    }

    /// Every test with its outcome, in a fixed order.
    pub fn results(&self) -> impl Iterator<Item = (SelfTest, bool)> + '_ {
        SelfTest::ALL.into_iter().map(|test| (test, self.passed(test)))
    }
}

impl fmt::Display for SelfTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results: Vec<String> = self
            .results()
            .map(|(test, passed)| {
                format!("{}:{}", test.name(), if passed { "PASS" } else { "FAIL" })
            })
            .collect();
        write!(f, "{}", results.join(" "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub serial: [u8; 9],
    pub revision: [u8; 4],
}

impl DeviceInfo {
    /// The first 32 bytes of the configuration zone hold the 72 bit serial
    /// number in bytes <0:3> and <8:12>, and the device revision in <4:7>.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < INFO_MIN_LEN {
            return Err(Error::ShortResponse {
                expected: INFO_MIN_LEN,
                received: data.len(),
            });
        }

        let mut serial = [0u8; 9];
        serial[..4].copy_from_slice(&data[0..4]);
        serial[4..].copy_from_slice(&data[8..13]);

        let mut revision = [0u8; 4];
        revision.copy_from_slice(&data[4..8]);

        Ok(DeviceInfo { serial, revision })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "serial:0x{} revision:0x{}",
            hex::encode(self.serial),
            hex::encode(self.revision)
        )
    }
}

/// ATECC608A/ATECC608B secure element.
#[derive(Debug)]
pub struct Atecc {
    executor: Executor,
}

impl Atecc {
    pub fn new(connection: Connection, config: &AteccConfig) -> Result<Self> {
        Ok(Atecc {
            executor: Executor::new(connection, config)?,
        })
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Runs every self test and reports each outcome.
    pub async fn self_test(&self) -> Result<SelfTestReport> {
        let cmd = Command::new(Opcode::SelfTest, SELF_TEST_ALL, [0x00, 0x00], &[])?;
        let res = self.executor.transact(&cmd, true).await?;

        let result = match res.data().first() {
            Some(result) => *result,
            None => {
                return Err(Error::ShortResponse {
                    expected: 1,
                    received: 0,
                });
            }
        };

        // The result byte shares the status slot: bits outside the test mask
        // can only come from an error status.
        if res.status().is_some() && result & !SELF_TEST_ALL != 0 {
            Status::from(result).check()?;
        }

        let report = SelfTestReport::from_result(result);
        info!("Self test: {}", report);
        Ok(report)
    }

    /// Reads the device serial number and revision.
    pub async fn info(&self) -> Result<DeviceInfo> {
        let cmd = Command::new(Opcode::Read, READ_CONFIG_32, [0x00, 0x00], &[])?;
        let data = self.executor.execute(&cmd, true).await?;

        let info = DeviceInfo::parse(&data)?;
        info!("Device info: {}", info);
        Ok(info)
    }

    pub async fn sleep(&self) -> Result<()> {
        self.executor.sleep().await
    }

    /// Releases the bus. The device is left in whatever power state the
    /// last operation put it in.
    pub async fn close(self) -> Result<()> {
        let mut connection = self.executor.into_connection();
        connection.close().await
    }
}
