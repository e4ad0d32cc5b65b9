pub use chip8::Chip8;
pub use config::{Config, Quirks};
pub use constants::{CLOCK_SPEED, DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, TIMER_FREQUENCY};
pub use error::{Error, Fault, Result};
pub use framebuffer::FrameBuffer;
pub use keypad::Keypad;
pub use machine::Machine;
pub use memory::Memory;
pub use state::State;

pub mod constants;
pub mod framebuffer;

mod chip8;
mod config;
mod error;
mod instruction;
mod keypad;
mod machine;
mod memory;
mod opcode;
mod operations;
mod state;
