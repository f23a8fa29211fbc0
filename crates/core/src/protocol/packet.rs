//! Binary command frames for the razer LED protocol.
//!
//! Every frame is laid out as
//! `[0xBB, 0x00, len(payload), command, payload.., checksum]`, where the
//! checksum is the running XOR of every byte before it. The length field is
//! a single byte, so a payload can carry at most 255 bytes.

use crate::color::Rgb;
use crate::error::StripError;

/// Frame start marker
pub const MAGIC_BYTE: u8 = 0xBB;

/// Extended-size flag, always zero for this protocol
const EXTENDED_SIZE: u8 = 0x00;

/// Bytes in front of the payload: magic, ext flag, length, command
const HEADER_LEN: usize = 4;

/// Largest payload the single length byte can describe
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Gradient flag and colour count ahead of the RGB triples
const LED_PAYLOAD_HEADER: usize = 2;

/// Most colours a single LED-data frame can carry (84).
pub const MAX_LEDS: usize = (MAX_PAYLOAD_LEN - LED_PAYLOAD_HEADER) / 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch the device into (or out of) externally-controlled mode
    Enable,
    /// Per-LED colour data
    LedData,
}

impl Command {
    pub fn as_byte(self) -> u8 {
        match self {
            Command::Enable => 0xB1,
            Command::LedData => 0xB0,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xB1 => Some(Command::Enable),
            0xB0 => Some(Command::LedData),
            _ => None,
        }
    }
}

/// XOR of all bytes.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Payload length of an LED-data frame carrying `color_count` colours.
pub fn led_payload_len(color_count: usize) -> usize {
    LED_PAYLOAD_HEADER + color_count * 3
}

/// Fails with [`StripError::ProtocolConstraint`] when `color_count` colours
/// would not fit in one LED-data frame.
pub fn check_led_capacity(color_count: usize) -> Result<(), StripError> {
    let payload_len = led_payload_len(color_count);
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(StripError::ProtocolConstraint {
            payload_len,
            max: MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

// Caller guarantees payload.len() <= MAX_PAYLOAD_LEN
fn frame(command: Command, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(HEADER_LEN + payload.len() + 1);
    packet.extend_from_slice(&[
        MAGIC_BYTE,
        EXTENDED_SIZE,
        payload.len() as u8,
        command.as_byte(),
    ]);
    packet.extend_from_slice(payload);
    packet.push(checksum(&packet));
    packet
}

pub fn build_enable_packet(enable: bool) -> Vec<u8> {
    frame(Command::Enable, &[if enable { 0x01 } else { 0x00 }])
}

/// Build an LED-data frame: `[gradient_flag, color_count, r, g, b, ...]`.
pub fn build_color_packet(colors: &[Rgb], gradient_mode: bool) -> Result<Vec<u8>, StripError> {
    check_led_capacity(colors.len())?;

    let mut payload = Vec::with_capacity(led_payload_len(colors.len()));
    payload.push(if gradient_mode { 0x01 } else { 0x00 });
    payload.push(colors.len() as u8);
    for color in colors {
        payload.extend_from_slice(&color.to_bytes());
    }

    Ok(frame(Command::LedData, &payload))
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub command: Command,
    pub payload: Vec<u8>,
}

impl Packet {
    /// Decode and verify a frame.
    pub fn parse(bytes: &[u8]) -> Result<Self, StripError> {
        if bytes.len() < HEADER_LEN + 1 {
            return Err(StripError::Packet(format!(
                "frame of {} bytes is shorter than the header",
                bytes.len()
            )));
        }
        if bytes[0] != MAGIC_BYTE {
            return Err(StripError::Packet(format!(
                "bad magic byte {:#04x}",
                bytes[0]
            )));
        }

        let payload_len = bytes[2] as usize;
        if bytes.len() != HEADER_LEN + payload_len + 1 {
            return Err(StripError::Packet(format!(
                "length byte says {} payload bytes, frame carries {}",
                payload_len,
                bytes.len() - HEADER_LEN - 1
            )));
        }

        if checksum(bytes) != 0 {
            return Err(StripError::Packet("checksum mismatch".to_string()));
        }

        let command = Command::from_byte(bytes[3]).ok_or_else(|| {
            StripError::Packet(format!("unknown command {:#04x}", bytes[3]))
        })?;

        Ok(Packet {
            command,
            payload: bytes[HEADER_LEN..HEADER_LEN + payload_len].to_vec(),
        })
    }

    /// The enable flag of an Enable frame.
    pub fn enabled(&self) -> Option<bool> {
        match (self.command, self.payload.as_slice()) {
            (Command::Enable, [flag]) => Some(*flag != 0),
            _ => None,
        }
    }

    /// Gradient flag and colours of an LED-data frame.
    pub fn colors(&self) -> Option<(bool, Vec<Rgb>)> {
        if self.command != Command::LedData || self.payload.len() < LED_PAYLOAD_HEADER {
            return None;
        }
        let count = self.payload[1] as usize;
        let data = &self.payload[LED_PAYLOAD_HEADER..];
        if data.len() != count * 3 {
            return None;
        }

        let colors = data
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Some((self.payload[0] != 0, colors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_packet_layout() {
        let packet = build_enable_packet(true);
        assert_eq!(packet[..5], [0xBB, 0x00, 0x01, 0xB1, 0x01]);
        assert_eq!(packet[5], 0xBB ^ 0x01 ^ 0xB1 ^ 0x01);

        let off = build_enable_packet(false);
        assert_eq!(off[4], 0x00);
        assert_eq!(checksum(&off), 0);
    }

    #[test]
    fn test_color_packet_layout() {
        let colors = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        let packet = build_color_packet(&colors, true).unwrap();

        assert_eq!(
            packet[..12],
            [0xBB, 0x00, 8, 0xB0, 0x01, 2, 1, 2, 3, 4, 5, 6]
        );
        assert_eq!(packet.len(), 13);

        let flat = build_color_packet(&colors, false).unwrap();
        assert_eq!(flat[4], 0x00);
    }

    #[test]
    fn test_checksum_cancels_out() {
        let colors: Vec<Rgb> = (0..MAX_LEDS as u8)
            .map(|i| Rgb::new(i, i.wrapping_mul(7), 255 - i))
            .collect();

        for packet in [
            build_enable_packet(true),
            build_enable_packet(false),
            build_color_packet(&[], false).unwrap(),
            build_color_packet(&colors[..1], true).unwrap(),
            build_color_packet(&colors, true).unwrap(),
        ] {
            assert_eq!(checksum(&packet), 0, "packet {:02x?}", packet);
        }
    }

    #[test]
    fn test_led_capacity() {
        assert_eq!(MAX_LEDS, 84);
        assert!(build_color_packet(&vec![Rgb::WHITE; MAX_LEDS], true).is_ok());

        match build_color_packet(&vec![Rgb::WHITE; MAX_LEDS + 1], true) {
            Err(StripError::ProtocolConstraint { payload_len, max }) => {
                assert_eq!(payload_len, 257);
                assert_eq!(max, 255);
            }
            other => panic!("expected protocol constraint, got {:?}", other),
        }

        // 100 LEDs would need a 302-byte payload
        assert!(check_led_capacity(100).is_err());
    }

    #[test]
    fn test_parse_color_packet() {
        let colors = vec![Rgb::new(9, 8, 7), Rgb::WHITE, Rgb::BLACK];
        let packet = Packet::parse(&build_color_packet(&colors, true).unwrap()).unwrap();

        assert_eq!(packet.command, Command::LedData);
        assert_eq!(packet.colors(), Some((true, colors)));
        assert_eq!(packet.enabled(), None);
    }

    #[test]
    fn test_parse_rejects_corruption() {
        let mut packet = build_enable_packet(true);
        packet[4] = 0x00;
        assert!(Packet::parse(&packet).is_err());

        let mut bad_magic = build_enable_packet(true);
        bad_magic[0] = 0xAA;
        assert!(Packet::parse(&bad_magic).is_err());

        let truncated = build_color_packet(&[Rgb::WHITE], false).unwrap();
        assert!(Packet::parse(&truncated[..truncated.len() - 2]).is_err());

        assert!(Packet::parse(&[]).is_err());
    }
}
