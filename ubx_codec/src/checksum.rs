//! UBX 8-bit [Fletcher checksum](https://en.wikipedia.org/wiki/Fletcher%27s_checksum).
//!
//! The checksum covers class, id, length and payload: everything after the
//! two sync chars and before the two checksum bytes themselves.

/// Streaming checksum calculator
#[derive(Default, Debug, Clone, Copy)]
pub struct UbxChecksumCalc {
    ck_a: u8,
    ck_b: u8,
}

impl UbxChecksumCalc {
    pub const fn new() -> Self {
        Self { ck_a: 0, ck_b: 0 }
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub const fn update_byte(&mut self, byte: u8) {
        self.ck_a = self.ck_a.wrapping_add(byte);
        self.ck_b = self.ck_b.wrapping_add(self.ck_a);
    }

    /// Get the current checksum result as `(ck_a, ck_b)`
    pub const fn result(self) -> (u8, u8) {
        (self.ck_a, self.ck_b)
    }

    pub const fn is_valid(&self, expected_ck_a: u8, expected_ck_b: u8) -> bool {
        self.ck_a == expected_ck_a && self.ck_b == expected_ck_b
    }
}

/// Single-shot checksum of `bytes`, returns `(ck_a, ck_b)`
pub const fn compute(bytes: &[u8]) -> (u8, u8) {
    let mut calc = UbxChecksumCalc::new();
    calc.update(bytes);
    calc.result()
}

/// Recomputes the checksum of `bytes` and compares it with the expected pair
pub const fn verify(bytes: &[u8], expected_ck_a: u8, expected_ck_b: u8) -> bool {
    let mut calc = UbxChecksumCalc::new();
    calc.update(bytes);
    calc.is_valid(expected_ck_a, expected_ck_b)
}

/// Both checksum bytes packed the way they appear on the wire, for error reports
pub(crate) const fn as_wire_u16(ck: (u8, u8)) -> u16 {
    u16::from_le_bytes([ck.0, ck.1])
}
