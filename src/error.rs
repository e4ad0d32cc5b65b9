use thiserror::Error;

/// A fatal condition raised while executing a single instruction.
///
/// Every variant carries the program counter of the offending instruction.
/// State is left exactly as it was before the instruction was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("memory access out of bounds at {address:#06X} (pc {pc:#05X})")]
    MemoryOutOfBounds { address: usize, pc: u16 },

    #[error("stack overflow: CALL at {pc:#05X} exceeds 16 nested subroutines")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: RET at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("key {key:#04X} referenced at {pc:#05X} is not on the keypad")]
    InvalidKey { key: u8, pc: u16 },
}

impl Fault {
    /// The program counter at which the fault occurred
    pub fn pc(&self) -> u16 {
        match *self {
            Fault::UnknownOpcode { pc, .. }
            | Fault::MemoryOutOfBounds { pc, .. }
            | Fault::StackOverflow { pc }
            | Fault::StackUnderflow { pc }
            | Fault::InvalidKey { pc, .. } => pc,
        }
    }
}

/// Errors surfaced to the host driving a `Machine`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("program is {size} bytes but at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("key {0:#04X} is not on the keypad")]
    InvalidKey(u8),

    #[error("machine is already running")]
    AlreadyRunning,

    #[error("machine was never started")]
    NotStarted,

    #[error("failed to spawn {0} thread")]
    Spawn(&'static str, #[source] std::io::Error),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    #[error("instruction cycle aborted: {0}")]
    Fault(#[from] Fault),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_reports_pc() {
        assert_eq!(Fault::StackUnderflow { pc: 0x204 }.pc(), 0x204);
        assert_eq!(
            Fault::MemoryOutOfBounds {
                address: 0x1000,
                pc: 0x2FE
            }
            .pc(),
            0x2FE
        );
    }

    #[test]
    fn test_unknown_opcode_message_has_raw_opcode() {
        let fault = Fault::UnknownOpcode {
            opcode: 0x5121,
            pc: 0x200,
        };
        assert_eq!(fault.to_string(), "unknown opcode 0x5121 at 0x200");
    }

    #[test]
    fn test_fault_converts_into_error() {
        let error: Error = Fault::StackOverflow { pc: 0x300 }.into();
        assert!(matches!(error, Error::Fault(Fault::StackOverflow { pc: 0x300 })));
    }
}
