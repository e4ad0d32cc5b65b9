/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, fetched big-endian from two consecutive bytes.
/// Their behavior is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category (group 8)
/// - `(_, _, n, n)` more specific behavior within a category (groups E and F)
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an immediate byte assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
pub trait Opcode {
    /// The raw 16-bit instruction word.
    fn word(&self) -> u16;

    /// Returns the Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        let word = self.word();
        (
            ((word & 0xF000) >> 12) as u8,
            ((word & 0x0F00) >> 8) as u8,
            ((word & 0x00F0) >> 4) as u8,
            (word & 0x000F) as u8,
        )
    }

    /// Register index held in the second nibble.
    /// `[_x__]`
    fn x(&self) -> usize {
        usize::from((self.word() & 0x0F00) >> 8)
    }

    /// Register index held in the third nibble.
    /// `[__y_]`
    fn y(&self) -> usize {
        usize::from((self.word() & 0x00F0) >> 4)
    }

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8 {
        (self.word() & 0x000F) as u8
    }

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8 {
        (self.word() & 0x00FF) as u8
    }

    /// The Opcode without its most significant nibble.
    /// `[_adr]`
    fn addr(&self) -> u16 {
        self.word() & 0x0FFF
    }
}

impl Opcode for u16 {
    fn word(&self) -> u16 {
        *self
    }
}

/// Combines the two bytes of an instruction into an opcode.
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from(high) << 8 | u16::from(low)
}
