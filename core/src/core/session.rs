/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::protocol::packet::RESPONSE_MIN_LEN;
use crate::protocol::{WordAddress, decode};
use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Sleeping,
    Awake,
    /// Left after a failed wake-up, cleared only by a successful one.
    Faulted,
}

/// Power state of the device and the connection used to drive it.
///
/// Only this type changes the [`SessionState`].
#[derive(Debug)]
pub struct Session {
    connection: Connection,
    state: SessionState,
    wake_settle: Duration,
}

impl Session {
    pub fn new(connection: Connection, wake_settle: Duration) -> Self {
        Session {
            connection,
            state: SessionState::Sleeping,
            wake_settle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The connection, available for command exchanges only while awake.
    pub fn connection(&mut self) -> Result<&mut Connection> {
        match self.state {
            SessionState::Awake => Ok(&mut self.connection),
            other => Err(Error::NotAwake(other)),
        }
    }

    pub fn into_connection(self) -> Connection {
        self.connection
    }

    /// Issues a device wake-up, needed before starting a new command session.
    pub async fn wake(&mut self) -> Result<()> {
        debug!("Waking device from {:?}", self.state);

        // The device never acknowledges the wake pulse, so a write error here
        // is expected (p47, 7.1 I/O Conditions, ATECC608A Full Datasheet).
        if let Err(e) = self.connection.write(WordAddress::Reset as u8, &[]).await {
            warn!("Ignoring wake write error: {}", e);
        }

        sleep(self.wake_settle).await;

        match self.read_wake_response().await {
            Ok(()) => {
                self.state = SessionState::Awake;
                info!("Device awake");
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Faulted;
                error!("Wake-up failed: {}", e);
                Err(Error::WakeFailed(Box::new(e)))
            }
        }
    }

    async fn read_wake_response(&mut self) -> Result<()> {
        let res = self
            .connection
            .read(WordAddress::Reset as u8, RESPONSE_MIN_LEN)
            .await?;
        let response = decode(&res)?;

        match response.status() {
            Some(status) => status.check_after_wake(),
            None => Ok(()),
        }
    }

    /// Puts the device in idle mode, (p50, Table 7-2, ATECC608A Full Datasheet).
    pub async fn idle(&mut self) -> Result<()> {
        self.power_down(WordAddress::Idle).await
    }

    /// Puts the device in sleep mode, (p50, Table 7-2, ATECC608A Full Datasheet).
    pub async fn sleep(&mut self) -> Result<()> {
        self.power_down(WordAddress::Sleep).await
    }

    async fn power_down(&mut self, word_address: WordAddress) -> Result<()> {
        debug!("Entering {:?} mode", word_address);
        let res = self.connection.write(word_address as u8, &[]).await;

        // Not verified by the device, the session counts as asleep either way.
        if self.state != SessionState::Faulted {
            self.state = SessionState::Sleeping;
        }

        if let Err(e) = &res {
            warn!("{:?} write failed: {}", word_address, e);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Status;
    use crate::testing::{MockPort, Op};

    fn session(mock: &MockPort) -> Session {
        Session::new(mock.connection(), Duration::from_micros(1500))
    }

    #[tokio::test(start_paused = true)]
    async fn wake_after_first_command_status() {
        let mock = MockPort::new();
        mock.push_wake(0x11);
        let mut session = session(&mock);

        session.wake().await.unwrap();

        assert_eq!(session.state(), SessionState::Awake);
        assert_eq!(
            mock.ops(),
            vec![Op::Write(0x00, vec![]), Op::Read(0x00, 4)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wake_waits_for_settle_time() {
        let mock = MockPort::new();
        mock.push_wake(0x11);
        let mut session = Session::new(mock.connection(), Duration::from_millis(200));

        let start = tokio::time::Instant::now();
        session.wake().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn wake_write_error_is_ignored() {
        let mock = MockPort::new();
        mock.fail_writes_to(0x00);
        mock.push_wake(0x11);
        let mut session = session(&mock);

        session.wake().await.unwrap();
        assert_eq!(session.state(), SessionState::Awake);
    }

    #[tokio::test(start_paused = true)]
    async fn wake_accepts_success_status() {
        let mock = MockPort::new();
        mock.push_wake(0x00);
        let mut session = session(&mock);

        session.wake().await.unwrap();
        assert_eq!(session.state(), SessionState::Awake);
    }

    #[tokio::test(start_paused = true)]
    async fn wake_error_status_faults() {
        let mock = MockPort::new();
        mock.push_wake(0xFF);
        let mut session = session(&mock);

        match session.wake().await {
            Err(Error::WakeFailed(cause)) => assert!(matches!(
                *cause,
                Error::CommandStatus(Status::CommunicationError)
            )),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Faulted);
    }

    #[tokio::test(start_paused = true)]
    async fn wake_bad_checksum_faults() {
        let mock = MockPort::new();
        mock.push_read(&[0x04, 0x11, 0x33, 0x44]);
        let mut session = session(&mock);

        match session.wake().await {
            Err(Error::WakeFailed(cause)) => {
                assert!(matches!(*cause, Error::ChecksumMismatch { .. }))
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Faulted);
    }

    #[tokio::test(start_paused = true)]
    async fn wake_read_error_faults() {
        let mock = MockPort::new();
        mock.push_read_error(std::io::ErrorKind::BrokenPipe);
        let mut session = session(&mock);

        assert!(matches!(session.wake().await, Err(Error::WakeFailed(_))));
        assert_eq!(session.state(), SessionState::Faulted);
    }

    #[tokio::test(start_paused = true)]
    async fn fault_survives_idle_until_next_wake() {
        let mock = MockPort::new();
        mock.push_wake(0x07);
        mock.push_wake(0x11);
        let mut session = session(&mock);

        assert!(session.wake().await.is_err());
        session.idle().await.unwrap();
        assert_eq!(session.state(), SessionState::Faulted);
        assert!(matches!(
            session.connection(),
            Err(Error::NotAwake(SessionState::Faulted))
        ));

        session.wake().await.unwrap();
        assert_eq!(session.state(), SessionState::Awake);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_and_sleep_use_their_word_address() {
        let mock = MockPort::new();
        mock.push_wake(0x11);
        let mut session = session(&mock);

        session.wake().await.unwrap();
        session.idle().await.unwrap();
        assert_eq!(session.state(), SessionState::Sleeping);
        session.sleep().await.unwrap();

        let ops = mock.ops();
        assert_eq!(&ops[2..], &[Op::Write(0x02, vec![]), Op::Write(0x01, vec![])]);
    }

    #[tokio::test(start_paused = true)]
    async fn connection_requires_awake() {
        let mock = MockPort::new();
        let mut session = session(&mock);

        assert!(matches!(
            session.connection(),
            Err(Error::NotAwake(SessionState::Sleeping))
        ));
    }
}
