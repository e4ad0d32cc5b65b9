use log::debug;
use rand::Rng;

use crate::config::Quirks;
use crate::constants::{SPRITE_SIZE, STACK_SIZE};
use crate::error::Fault;
use crate::framebuffer;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::state::State;

/// How the program counter moves once an operation has executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramCounter {
    /// On to the following instruction
    Next,
    /// Over the following instruction
    Skip,
    /// Straight to an address
    Jump(u16),
    /// Run the same instruction again next cycle
    Stay,
}

impl ProgramCounter {
    fn skip_if(condition: bool) -> Self {
        if condition {
            ProgramCounter::Skip
        } else {
            ProgramCounter::Next
        }
    }
}

/// Everything outside of `State` that an operation may consult.
pub struct Context<'a> {
    pub keypad: &'a Keypad,
    pub quirks: Quirks,
}

pub type Operation = fn(op: &dyn Opcode, state: &mut State, ctx: &Context) -> OpResult;
pub type OpResult = Result<ProgramCounter, Fault>;

/// clear
pub fn clr(_op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    framebuffer::clear(&mut state.frame_buffer);
    state.draw_flag = true;
    Ok(ProgramCounter::Next)
}

/// PC = STACK.pop()
/// Resumes at the instruction after the matching CALL
pub fn rts(_op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    if state.sp == 0 {
        return Err(Fault::StackUnderflow { pc: state.pc });
    }
    state.sp -= 1;
    let return_addr = state.stack[usize::from(state.sp)];
    debug!("RET {:03X} -> {:03X}", state.pc, return_addr);
    Ok(ProgramCounter::Jump(return_addr.wrapping_add(2)))
}

/// PC = addr
pub fn jump(op: &dyn Opcode, _state: &mut State, _ctx: &Context) -> OpResult {
    Ok(ProgramCounter::Jump(op.addr()))
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    if usize::from(state.sp) >= STACK_SIZE {
        return Err(Fault::StackOverflow { pc: state.pc });
    }
    state.stack[usize::from(state.sp)] = state.pc;
    state.sp += 1;
    debug!("CALL {:03X} from {:03X} (depth {})", op.addr(), state.pc, state.sp);
    Ok(ProgramCounter::Jump(op.addr()))
}

/// if Vx == kk then pc += 2
pub fn ske(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    Ok(ProgramCounter::skip_if(state.v[op.x()] == op.kk()))
}

/// if Vx != kk then pc += 2
pub fn skne(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    Ok(ProgramCounter::skip_if(state.v[op.x()] != op.kk()))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    Ok(ProgramCounter::skip_if(state.v[op.x()] == state.v[op.y()]))
}

/// Vx = kk
pub fn load(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] = op.kk();
    Ok(ProgramCounter::Next)
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.kk());
    Ok(ProgramCounter::Next)
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] = state.v[op.y()];
    Ok(ProgramCounter::Next)
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] |= state.v[op.y()];
    Ok(ProgramCounter::Next)
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] &= state.v[op.y()];
    Ok(ProgramCounter::Next)
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(ProgramCounter::Next)
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[0xF] = u8::from(over);
    Ok(ProgramCounter::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let (res, under) = state.v[op.x()].overflowing_sub(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[0xF] = u8::from(!under);
    Ok(ProgramCounter::Next)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let vx = state.v[op.x()];
    state.v[op.x()] = vx >> 1;
    state.v[0xF] = vx & 0x1;
    Ok(ProgramCounter::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let (res, under) = state.v[op.y()].overflowing_sub(state.v[op.x()]);
    state.v[op.x()] = res;
    state.v[0xF] = u8::from(!under);
    Ok(ProgramCounter::Next)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let vx = state.v[op.x()];
    state.v[op.x()] = vx << 1;
    state.v[0xF] = vx >> 7;
    Ok(ProgramCounter::Next)
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    Ok(ProgramCounter::skip_if(state.v[op.x()] != state.v[op.y()]))
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.i = op.addr();
    Ok(ProgramCounter::Next)
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    Ok(ProgramCounter::Jump(op.addr() + u16::from(state.v[0x0])))
}

/// Vx = rand_byte, or rand_byte & kk when masking is enabled
pub fn rnd(op: &dyn Opcode, state: &mut State, ctx: &Context) -> OpResult {
    let byte: u8 = rand::thread_rng().gen();
    state.v[op.x()] = if ctx.quirks.mask_random {
        byte & op.kk()
    } else {
        byte
    };
    Ok(ProgramCounter::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let (x, y) = (state.v[op.x()], state.v[op.y()]);
    let sprite = state.memory.slice(state.i, usize::from(op.n()), state.pc)?;
    let erased = framebuffer::draw_sprite(&mut state.frame_buffer, x, y, sprite);
    state.v[0xF] = u8::from(erased);
    state.draw_flag = true;
    Ok(ProgramCounter::Next)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &mut State, ctx: &Context) -> OpResult {
    let pressed = key_state(state.v[op.x()], state.pc, ctx.keypad)?;
    Ok(ProgramCounter::skip_if(pressed))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &mut State, ctx: &Context) -> OpResult {
    let pressed = key_state(state.v[op.x()], state.pc, ctx.keypad)?;
    Ok(ProgramCounter::skip_if(!pressed))
}

fn key_state(key: u8, pc: u16, keypad: &Keypad) -> Result<bool, Fault> {
    keypad
        .is_pressed(key)
        .ok_or(Fault::InvalidKey { key, pc })
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.v[op.x()] = state.delay_timer;
    Ok(ProgramCounter::Next)
}

/// await keypress for Vx
/// Holds the program counter in place until some key is down
pub fn keyd(op: &dyn Opcode, state: &mut State, ctx: &Context) -> OpResult {
    match ctx.keypad.first_pressed() {
        Some(key) => {
            state.v[op.x()] = key;
            Ok(ProgramCounter::Next)
        }
        None => Ok(ProgramCounter::Stay),
    }
}

/// DT = Vx
pub fn loadd(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.delay_timer = state.v[op.x()];
    Ok(ProgramCounter::Next)
}

/// ST = Vx
pub fn loadst(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.sound_timer = state.v[op.x()];
    Ok(ProgramCounter::Next)
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    Ok(ProgramCounter::Next)
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for the low digit of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    state.i = u16::from(state.v[op.x()] & 0xF) * SPRITE_SIZE;
    Ok(ProgramCounter::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let vx = state.v[op.x()];
    let digits = [vx / 100, vx / 10 % 10, vx % 10];
    state
        .memory
        .slice_mut(state.i, digits.len(), state.pc)?
        .copy_from_slice(&digits);
    Ok(ProgramCounter::Next)
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx; I is left unchanged
pub fn stor(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let count = op.x() + 1;
    state
        .memory
        .slice_mut(state.i, count, state.pc)?
        .copy_from_slice(&state.v[..count]);
    Ok(ProgramCounter::Next)
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i; I is left unchanged
pub fn read(op: &dyn Opcode, state: &mut State, _ctx: &Context) -> OpResult {
    let count = op.x() + 1;
    let bytes = state.memory.slice(state.i, count, state.pc)?;
    state.v[..count].copy_from_slice(bytes);
    Ok(ProgramCounter::Next)
}
