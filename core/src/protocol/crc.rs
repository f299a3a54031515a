/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/

pub const CRC16_POLY: u16 = 0x8005;

/// Bit-serial CRC-16 over `data` as computed by the device.
///
/// Bits are fed least significant first into an MSB-first register, and the
/// result is emitted low byte first. This is not CRC-16/ARC: a table driven
/// variant gives different values for the same input.
pub fn checksum(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;

    for byte in data {
        for bit in 0..8 {
            let data_bit = (byte >> bit) & 0x01;
            let carry_bit = (crc >> 15) as u8;
            crc <<= 1;

            if data_bit != carry_bit {
                crc ^= CRC16_POLY;
            }
        }
    }

    crc.to_le_bytes()
}
