/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::config::AteccConfig;
use crate::connection::Connection;
use crate::core::session::{Session, SessionState};
use crate::error::{Error, Result};
use crate::protocol::packet::RESPONSE_MIN_LEN;
use crate::protocol::{Command, Response, WordAddress, decode};
use log::{debug, warn};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Runs command/response exchanges against one device.
///
/// The device has a single output FIFO shared by all responses, so every
/// public method holds the session lock for its whole duration: concurrent
/// callers are queued, never interleaved.
#[derive(Debug)]
pub struct Executor {
    session: Mutex<Session>,
    execution_time: Duration,
}

impl Executor {
    pub fn new(connection: Connection, config: &AteccConfig) -> Result<Self> {
        config.validate()?;
        Ok(Executor {
            session: Mutex::new(Session::new(connection, config.wake_settle)),
            execution_time: config.execution_time,
        })
    }

    /// Gives the connection back, e.g. to close it.
    pub fn into_connection(self) -> Connection {
        self.session.into_inner().into_connection()
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    pub async fn wake(&self) -> Result<()> {
        self.session.lock().await.wake().await
    }

    pub async fn idle(&self) -> Result<()> {
        self.session.lock().await.idle().await
    }

    pub async fn sleep(&self) -> Result<()> {
        self.session.lock().await.sleep().await
    }

    /// Issues `command` and returns its result bytes.
    ///
    /// With `auto_wake` the command runs within its own wake/idle cycle,
    /// otherwise the caller is in charge of waking, idling and sleeping the
    /// device around its command sequence.
    pub async fn execute(&self, command: &Command, auto_wake: bool) -> Result<Vec<u8>> {
        let response = self.transact(command, auto_wake).await?;

        if let Some(status) = response.status() {
            if let Err(e) = status.check() {
                warn!("{} failed: {}", command.opcode().name(), e);
                return Err(e);
            }
        }

        Ok(response.into_data())
    }

    /// Like [`Executor::execute`] but hands back the verified response
    /// without applying the status policy, for commands whose single byte
    /// results overlap with status codes.
    pub async fn transact(&self, command: &Command, auto_wake: bool) -> Result<Response> {
        let mut session = self.session.lock().await;

        if !auto_wake {
            return self.exchange(&mut session, command).await;
        }

        let res = match session.wake().await {
            Ok(()) => self.exchange(&mut session, command).await,
            Err(e) => Err(e),
        };

        // Idle on every exit path, keep the primary outcome.
        if let Err(e) = session.idle().await {
            warn!("Failed to idle device after {}: {}", command.opcode().name(), e);
        }

        res
    }

    async fn exchange(&self, session: &mut Session, command: &Command) -> Result<Response> {
        let connection = session.connection()?;
        let pkt = command.encode();

        debug!("Sending {} command: {:02X?}", command.opcode().name(), pkt);
        connection.write(WordAddress::Command as u8, &pkt).await?;

        sleep(self.execution_time).await;

        // The output FIFO is shared among status, error and command results,
        // so the first read learns how many bytes are waiting,
        // (p64, 10.3 Status/Error Codes, ATECC608A Full Datasheet).
        let count = connection.read(WordAddress::Command as u8, 1).await?;
        let count = count[0] as usize;

        if count < RESPONSE_MIN_LEN {
            return Err(Error::FrameTooShort { len: count });
        }

        // Reading from the word address again restarts at the head of the
        // FIFO, the second read returns the whole frame count byte included.
        let res = connection.read(WordAddress::Command as u8, count).await?;
        debug!("Received {} response: {:02X?}", command.opcode().name(), res);

        decode(&res)
    }
}
