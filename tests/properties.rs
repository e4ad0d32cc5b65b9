use emu8vm::constants::{MAX_PROGRAM_SIZE, PROGRAM_START, SPRITE_SHEET};
use emu8vm::framebuffer::BLANK;
use emu8vm::{Chip8, Error, Keypad, Memory};
use proptest::prelude::*;

fn run(chip8: &mut Chip8, cycles: usize) {
    let keypad = Keypad::new();
    for _ in 0..cycles {
        chip8.step(&keypad).unwrap();
    }
}

/// LD V0, a; LD V1, b; then the given ALU op on V0, V1
fn alu(a: u8, b: u8, op: u8) -> Chip8 {
    let mut chip8 = Chip8::new(&[0x60, a, 0x61, b, 0x80, 0x10 | op]).unwrap();
    run(&mut chip8, 3);
    chip8
}

proptest! {
    #[test]
    fn add_wraps_and_flags_carry(a in any::<u8>(), b in any::<u8>()) {
        let chip8 = alu(a, b, 0x4);
        let state = chip8.state();
        prop_assert_eq!(state.v[0], a.wrapping_add(b));
        prop_assert_eq!(state.vf(), u8::from(u16::from(a) + u16::from(b) > 0xFF));
    }

    #[test]
    fn sub_flags_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let chip8 = alu(a, b, 0x5);
        let state = chip8.state();
        prop_assert_eq!(state.v[0], a.wrapping_sub(b));
        prop_assert_eq!(state.vf(), u8::from(a >= b));
    }

    #[test]
    fn subn_flags_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let chip8 = alu(a, b, 0x7);
        let state = chip8.state();
        prop_assert_eq!(state.v[0], b.wrapping_sub(a));
        prop_assert_eq!(state.vf(), u8::from(b >= a));
    }

    #[test]
    fn shifts_flag_the_lost_bit(a in any::<u8>()) {
        let right = alu(a, 0, 0x6);
        prop_assert_eq!(right.state().v[0], a >> 1);
        prop_assert_eq!(right.state().vf(), a & 1);

        let left = alu(a, 0, 0xE);
        prop_assert_eq!(left.state().v[0], a << 1);
        prop_assert_eq!(left.state().vf(), a >> 7);
    }

    #[test]
    fn drawing_twice_erases_the_sprite(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in prop::collection::vec(any::<u8>(), 1..=15),
    ) {
        let n = sprite.len() as u8;
        // LD I, 0x20A; LD V0, x; LD V1, y; DRW V0, V1, n; DRW V0, V1, n; sprite
        let mut program = vec![0xA2, 0x0A, 0x60, x, 0x61, y, 0xD0, 0x10 | n, 0xD0, 0x10 | n];
        program.extend_from_slice(&sprite);
        let mut chip8 = Chip8::new(&program).unwrap();

        run(&mut chip8, 4);
        prop_assert_eq!(chip8.state().vf(), 0);
        let lit = sprite.iter().any(|&row| row != 0);
        prop_assert_eq!(chip8.frame_buffer() != &BLANK, lit);

        run(&mut chip8, 1);
        prop_assert_eq!(chip8.frame_buffer(), &BLANK);
        prop_assert_eq!(chip8.state().vf(), u8::from(lit));
    }

    #[test]
    fn bcd_stores_decimal_digits(value in any::<u8>()) {
        // LD V0, value; LD I, 0x300; LD B, V0
        let mut chip8 = Chip8::new(&[0x60, value, 0xA3, 0x00, 0xF0, 0x33]).unwrap();
        run(&mut chip8, 3);
        let bytes = &chip8.state().memory.as_bytes()[0x300..0x303];
        prop_assert_eq!(u32::from(bytes[0]) * 100 + u32::from(bytes[1]) * 10 + u32::from(bytes[2]), u32::from(value));
        prop_assert!(bytes.iter().all(|&digit| digit < 10));
    }

    #[test]
    fn nested_calls_unwind_in_order(calls in 1usize..=16) {
        // level k sits at 0x200 + 4k as `CALL <level k+1>; RET`, except level 0
        // which parks in `JP 0x202` and the deepest level which is a bare RET
        let level = |k: usize| PROGRAM_START + 4 * k as u16;
        let mut program = Vec::new();
        for k in 0..calls {
            let target = level(k + 1);
            program.extend_from_slice(&[0x20 | (target >> 8) as u8, target as u8]);
            if k == 0 {
                program.extend_from_slice(&[0x12, 0x02]);
            } else {
                program.extend_from_slice(&[0x00, 0xEE]);
            }
        }
        program.extend_from_slice(&[0x00, 0xEE]);
        let mut chip8 = Chip8::new(&program).unwrap();

        for k in 1..=calls {
            run(&mut chip8, 1);
            prop_assert_eq!(chip8.state().pc, level(k));
            prop_assert_eq!(usize::from(chip8.state().sp), k);
        }
        for k in (0..calls).rev() {
            run(&mut chip8, 1);
            prop_assert_eq!(chip8.state().pc, level(k) + 2);
            prop_assert_eq!(usize::from(chip8.state().sp), k);
        }
        prop_assert_eq!(chip8.state().sp, 0);
        prop_assert_eq!(chip8.state().pc, 0x202);
    }

    #[test]
    fn program_is_loaded_after_the_font(program in prop::collection::vec(any::<u8>(), 0..=MAX_PROGRAM_SIZE)) {
        let memory = Memory::with_program(&program).unwrap();
        let bytes = memory.as_bytes();
        let start = usize::from(PROGRAM_START);
        prop_assert_eq!(&bytes[..SPRITE_SHEET.len()], &SPRITE_SHEET[..]);
        prop_assert_eq!(&bytes[start..start + program.len()], &program[..]);
        prop_assert!(bytes[start + program.len()..].iter().all(|&byte| byte == 0));
    }
}

#[test]
fn oversized_program_is_rejected() {
    let program = vec![0; MAX_PROGRAM_SIZE + 1];
    assert!(matches!(
        Chip8::new(&program),
        Err(Error::ProgramTooLarge { size, max }) if size == MAX_PROGRAM_SIZE + 1 && max == MAX_PROGRAM_SIZE
    ));
}
