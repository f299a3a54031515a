/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/

/// Command opcodes, (p65, 10.4.1 Command Summary, ATECC608A Full Datasheet).
///
/// Only `Read` and `SelfTest` have their responses decoded by this crate, the
/// others can be issued through the executor and return raw result bytes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Aes = 0x51,
    CheckMac = 0x28,
    Counter = 0x24,
    DeriveKey = 0x1C,
    Ecdh = 0x43,
    GenDig = 0x15,
    GenKey = 0x40,
    Info = 0x30,
    Kdf = 0x56,
    Lock = 0x17,
    Mac = 0x08,
    Nonce = 0x16,
    PrivWrite = 0x46,
    Random = 0x1B,
    Read = 0x02,
    SecureBoot = 0x80,
    SelfTest = 0x77,
    Sign = 0x41,
    Sha = 0x47,
    UpdateExtra = 0x20,
    Verify = 0x45,
    Write = 0x12,
}

impl Opcode {
    pub const ALL: [Opcode; 22] = [
        Opcode::Aes,
        Opcode::CheckMac,
        Opcode::Counter,
        Opcode::DeriveKey,
        Opcode::Ecdh,
        Opcode::GenDig,
        Opcode::GenKey,
        Opcode::Info,
        Opcode::Kdf,
        Opcode::Lock,
        Opcode::Mac,
        Opcode::Nonce,
        Opcode::PrivWrite,
        Opcode::Random,
        Opcode::Read,
        Opcode::SecureBoot,
        Opcode::SelfTest,
        Opcode::Sign,
        Opcode::Sha,
        Opcode::UpdateExtra,
        Opcode::Verify,
        Opcode::Write,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Aes => "AES",
            Opcode::CheckMac => "CheckMac",
            Opcode::Counter => "Counter",
            Opcode::DeriveKey => "DeriveKey",
            Opcode::Ecdh => "ECDH",
            Opcode::GenDig => "GenDig",
            Opcode::GenKey => "GenKey",
            Opcode::Info => "Info",
            Opcode::Kdf => "KDF",
            Opcode::Lock => "Lock",
            Opcode::Mac => "MAC",
            Opcode::Nonce => "Nonce",
            Opcode::PrivWrite => "PrivWrite",
            Opcode::Random => "Random",
            Opcode::Read => "Read",
            Opcode::SecureBoot => "SecureBoot",
            Opcode::SelfTest => "SelfTest",
            Opcode::Sign => "Sign",
            Opcode::Sha => "SHA",
            Opcode::UpdateExtra => "UpdateExtra",
            Opcode::Verify => "Verify",
            Opcode::Write => "Write",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .into_iter()
            .find(|op| *op as u8 == value)
            .ok_or(value)
    }
}

/// I2C word addresses selecting what the device does with a write,
/// (p50, Table 7-2, ATECC608A Full Datasheet).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordAddress {
    // Also used to read the 4 byte wake response
    Reset = 0x00,
    Sleep = 0x01,
    Idle = 0x02,
    Command = 0x03,
}
