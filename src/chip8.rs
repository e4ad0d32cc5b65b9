use log::trace;

use crate::config::Quirks;
use crate::constants::INSTRUCTION_SIZE;
use crate::error::{Error, Fault};
use crate::framebuffer::FrameBuffer;
use crate::instruction::from_op;
use crate::keypad::Keypad;
use crate::operations::{Context, ProgramCounter};
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// This is the synchronous engine: it owns the `state` and is advanced one
/// step at a time by whoever drives it. `Machine` drives it from three
/// threads; tests and custom hosts can drive it directly.
///
/// Supplies interfaces for:
/// - advancing the CPU by one fetch-decode-execute cycle
/// - counting down the delay and sound timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    quirks: Quirks,
}

impl Chip8 {
    /// A freshly powered on Chip-8 with `program` loaded at 0x200
    pub fn new(program: &[u8]) -> Result<Self, Error> {
        Chip8::with_quirks(program, Quirks::default())
    }

    pub fn with_quirks(program: &[u8], quirks: Quirks) -> Result<Self, Error> {
        Ok(Chip8 {
            state: State::with_program(program)?,
            quirks,
        })
    }

    /// Advances the CPU by a single cycle
    /// - gets the opcode at the pc
    /// - decodes and executes it
    /// - moves the pc on as the instruction dictates
    ///
    /// On a fault nothing has changed, including the pc.
    pub fn step(&mut self, keypad: &Keypad) -> Result<(), Fault> {
        let pc = self.state.pc;
        let op = self.get_op()?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            pc
        );
        let operation = from_op(&op).ok_or(Fault::UnknownOpcode { opcode: op, pc })?;
        let ctx = Context {
            keypad,
            quirks: self.quirks,
        };
        self.state.pc = match operation(&op, &mut self.state, &ctx)? {
            ProgramCounter::Next => pc.wrapping_add(INSTRUCTION_SIZE),
            ProgramCounter::Skip => pc.wrapping_add(INSTRUCTION_SIZE * 2),
            ProgramCounter::Jump(addr) => addr,
            ProgramCounter::Stay => pc,
        };
        Ok(())
    }

    /// Decrements the delay timer unless it has already reached zero
    pub fn tick_delay_timer(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
    }

    /// Decrements the sound timer unless it has already reached zero
    pub fn tick_sound_timer(&mut self) {
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// The current frame
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if it changed since it was last taken
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16, Fault> {
        self.state.memory.word(self.state.pc, self.state.pc)
    }
}
