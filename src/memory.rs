use crate::constants::{MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Error, Fault};
use crate::opcode;

/// # Memory
/// 4096 bytes of addressable memory.
///
/// - 0x000..0x050 the built-in hex digit sprite sheet
/// - 0x050..0x200 reserved
/// - 0x200..0x1000 the loaded program and its working data
///
/// Addresses never wrap: every access is range checked and an access that would run
/// past the end of memory is reported as a `Fault::MemoryOutOfBounds`.
#[derive(Clone, Debug)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Memory containing only the sprite sheet.
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Memory containing the sprite sheet and `program` loaded at 0x200.
    pub fn with_program(program: &[u8]) -> Result<Self, Error> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let mut memory = Memory::new();
        let start = PROGRAM_START as usize;
        memory.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(memory)
    }

    /// Gets the opcode stored at `addr`.
    pub fn word(&self, addr: u16, pc: u16) -> Result<u16, Fault> {
        let bytes = self.slice(addr, 2, pc)?;
        Ok(opcode::from_bytes(bytes[0], bytes[1]))
    }

    /// `len` bytes starting at `addr`.
    ///
    /// # Arguments
    /// * `pc` the address of the instruction performing the access, for diagnostics
    pub fn slice(&self, addr: u16, len: usize, pc: u16) -> Result<&[u8], Fault> {
        let range = Memory::checked_range(addr, len, pc)?;
        Ok(&self.bytes[range])
    }

    /// Mutable `len` bytes starting at `addr`.
    pub fn slice_mut(&mut self, addr: u16, len: usize, pc: u16) -> Result<&mut [u8], Fault> {
        let range = Memory::checked_range(addr, len, pc)?;
        Ok(&mut self.bytes[range])
    }

    /// The whole address space
    pub fn as_bytes(&self) -> &[u8; MEMORY_SIZE] {
        &self.bytes
    }

    fn checked_range(addr: u16, len: usize, pc: u16) -> Result<std::ops::Range<usize>, Fault> {
        let start = usize::from(addr);
        let end = start + len;
        if end > MEMORY_SIZE {
            // report the first byte that doesn't exist
            return Err(Fault::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
                pc,
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
