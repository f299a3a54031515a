/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use crate::error::{Error, Result};
use crate::protocol::crc::checksum;
use crate::protocol::opcode::Opcode;
use crate::protocol::status::Status;

// count (1) + opcode (1) + param1 (1) + param2 (2) + crc16 (2)
pub const CMD_MIN_LEN: usize = 7;

// count (1) + status/data (1) + crc16 (2)
pub const RESPONSE_MIN_LEN: usize = 4;

pub const CRC_LEN: usize = 2;

// The count field is a single byte covering the whole packet.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize - CMD_MIN_LEN;

/// A command to be issued to the device.
///
/// Packet format, (p63, Table 10-1, ATECC608A Full Datasheet):
///   count [1] | opcode [1] | param1 [1] | param2 [2] | data [variable] | crc16 [2]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    opcode: Opcode,
    param1: u8,
    param2: [u8; 2],
    payload: Vec<u8>,
}

impl Command {
    pub fn new(opcode: Opcode, param1: u8, param2: [u8; 2], payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLarge { len: payload.len() });
        }

        Ok(Command {
            opcode,
            param1,
            param2,
            payload: payload.to_vec(),
        })
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn param1(&self) -> u8 {
        self.param1
    }

    pub fn param2(&self) -> [u8; 2] {
        self.param2
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn encode(&self) -> Vec<u8> {
        let count = (CMD_MIN_LEN + self.payload.len()) as u8;

        // The count byte covers the whole packet, itself included.
        let mut pkt = Vec::with_capacity(count as usize);
        pkt.push(count);
        pkt.push(self.opcode as u8);
        pkt.push(self.param1);
        pkt.extend_from_slice(&self.param2);
        pkt.extend_from_slice(&self.payload);

        let crc = checksum(&pkt);
        pkt.extend_from_slice(&crc);
        pkt
    }
}

/// A verified response frame.
///
/// `data` is everything between the count byte and the checksum. When the
/// frame is exactly [`RESPONSE_MIN_LEN`] bytes long its single data byte is
/// also exposed as a [`Status`]. A one byte command result cannot be told
/// apart from a status code at this layer; that is how the device's shared
/// output FIFO works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    data: Vec<u8>,
    status: Option<Status>,
}

impl Response {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }
}

/// Splits and verifies a response frame:
///   count [1] | status/error/response data [variable] | crc16 [2]
pub fn decode(res: &[u8]) -> Result<Response> {
    if res.len() < RESPONSE_MIN_LEN {
        return Err(Error::FrameTooShort { len: res.len() });
    }

    let (payload, crc) = res.split_at(res.len() - CRC_LEN);
    let expected = checksum(payload);

    if crc != expected {
        return Err(Error::ChecksumMismatch {
            expected,
            received: [crc[0], crc[1]],
        });
    }

    let data = payload[1..].to_vec();
    let status = if res.len() == RESPONSE_MIN_LEN {
        Some(Status::from(data[0]))
    } else {
        None
    };

    Ok(Response { data, status })
}
