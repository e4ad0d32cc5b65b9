use crate::constants::{PROGRAM_START, STACK_SIZE};
use crate::error::Error;
use crate::framebuffer::{FrameBuffer, BLANK};
use crate::memory::Memory;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack, never more than 16
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - each counts down towards zero at 60Hz and stops there
///
/// ## Memory
/// - 16 entry stack
///     - stores return addresses when subroutines are called
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
///     - stores the contents of the next frame to be drawn
///     - `draw_flag` is raised whenever it changes
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    /// Power-on state with no program loaded
    pub fn new() -> Self {
        State::from_memory(Memory::new())
    }

    /// Power-on state with `program` loaded at 0x200
    pub fn with_program(program: &[u8]) -> Result<Self, Error> {
        Ok(State::from_memory(Memory::with_program(program)?))
    }

    fn from_memory(memory: Memory) -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: BLANK,
            draw_flag: false,
        }
    }

    /// The flag register VF
    pub fn vf(&self) -> u8 {
        self.v[0xF]
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
