/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
pub mod crc;
pub mod opcode;
pub mod packet;
pub mod status;

pub use crc::checksum;
pub use opcode::{Opcode, WordAddress};
pub use packet::{Command, Response, decode};
pub use status::Status;
