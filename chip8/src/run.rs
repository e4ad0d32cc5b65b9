use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;

use display::Display;
use emu8vm::Machine;

use crate::keymap::keymap;

const TITLE: &str = "Emu-8";

/// How long the host sleeps between polls of the window and the machine
const FRAME_TIME: Duration = Duration::from_millis(1000 / 60);

/// Drives the window while `machine` runs on its own threads.
///
/// Returns once the window is closed or the machine faults.
pub fn run(mut machine: Machine, scale: u32) -> Result<()> {
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, TITLE, scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    display
        .render(&machine.frame())
        .map_err(|e| anyhow!(e))?;
    machine.start()?;
    let mut beeping = false;

    'event: while machine.is_running() {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = keymap(key) {
                        machine.set_key(key, true)?;
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(key) = keymap(key) {
                        machine.set_key(key, false)?;
                    }
                }
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => machine.release_keys(),
                _ => {}
            }
        }

        if let Some(frame) = machine.take_frame() {
            display.render(&frame).map_err(|e| anyhow!(e))?;
        }

        let sounding = machine.sound_timer() > 0;
        if sounding != beeping {
            beeping = sounding;
            display
                .set_beeping(TITLE, beeping)
                .map_err(|e| anyhow!(e))?;
        }

        std::thread::sleep(FRAME_TIME);
    }

    machine.stop().context("failed to stop the machine")?;
    match machine.fault() {
        Some(fault) => {
            error!("halted at {:#05X}", fault.pc());
            Err(fault).context("program crashed")
        }
        None => {
            info!("window closed");
            Ok(())
        }
    }
}
