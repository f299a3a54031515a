/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::connection::Connection;
use crate::connection::port::I2cPort;
use crate::protocol::checksum;
use log::LevelFilter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{Error, ErrorKind, Result};

pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::max())
        .is_test(true)
        .try_init();
}

/// Builds a response frame around `data`.
pub fn frame(data: &[u8]) -> Vec<u8> {
    let mut res = vec![(data.len() + 3) as u8];
    res.extend_from_slice(data);
    let crc = checksum(&res);
    res.extend_from_slice(&crc);
    res
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(u8, Vec<u8>),
    Read(u8, usize),
    Close,
}

#[derive(Debug, Default)]
struct Script {
    ops: Vec<Op>,
    reads: VecDeque<Result<Vec<u8>>>,
    failing_registers: Vec<u8>,
}

/// Scripted port: records every transfer and replays queued reads.
#[derive(Debug, Clone, Default)]
pub struct MockPort {
    script: Arc<Mutex<Script>>,
}

impl MockPort {
    pub fn new() -> Self {
        init_logger();
        Self::default()
    }

    pub fn connection(&self) -> Connection {
        Connection::new(Box::new(self.clone()))
    }

    pub fn push_read(&self, bytes: &[u8]) {
        self.script.lock().unwrap().reads.push_back(Ok(bytes.to_vec()));
    }

    pub fn push_read_error(&self, kind: ErrorKind) {
        self.script
            .lock()
            .unwrap()
            .reads
            .push_back(Err(Error::new(kind, "scripted read failure")));
    }

    /// Queues a 4 byte wake reply carrying `status`.
    pub fn push_wake(&self, status: u8) {
        self.push_read(&frame(&[status]));
    }

    /// Queues the two reads of a command response: the count byte, then
    /// the full frame.
    pub fn push_response(&self, data: &[u8]) {
        let res = frame(data);
        self.push_read(&res[..1]);
        self.push_read(&res);
    }

    pub fn fail_writes_to(&self, register: u8) {
        self.script.lock().unwrap().failing_registers.push(register);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.script.lock().unwrap().ops.clone()
    }

    pub fn writes_to(&self, register: u8) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, Op::Write(reg, _) if *reg == register))
            .count()
    }

    pub fn pending_reads(&self) -> usize {
        self.script.lock().unwrap().reads.len()
    }
}

#[async_trait::async_trait]
impl I2cPort for MockPort {
    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.script.lock().unwrap().ops.push(Op::Close);
        Ok(())
    }

    async fn write(&mut self, register: u8, data: &[u8]) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        script.ops.push(Op::Write(register, data.to_vec()));

        if script.failing_registers.contains(&register) {
            return Err(Error::new(ErrorKind::Other, "write error"));
        }
        Ok(())
    }

    async fn read(&mut self, register: u8, len: usize) -> Result<Vec<u8>> {
        let mut script = self.script.lock().unwrap();
        script.ops.push(Op::Read(register, len));

        script
            .reads
            .pop_front()
            .unwrap_or_else(|| Err(Error::new(ErrorKind::TimedOut, "no scripted response")))
    }

    fn get_bus(&self) -> u8 {
        0
    }

    fn get_address(&self) -> u16 {
        0x60
    }

    fn get_port_name(&self) -> String {
        String::from("mock")
    }
}
