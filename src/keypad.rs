use std::sync::atomic::{AtomicBool, Ordering};

use crate::constants::KEY_COUNT;
use crate::error::Error;

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// The latch is written by the host whenever a key changes and read by the
/// instruction cycle, so each key is its own atomic and no lock is needed.
#[derive(Debug, Default)]
pub struct Keypad {
    keys: [AtomicBool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad identifier 0x0..=0xF
    /// * `pressed` whether the key is now held down
    pub fn set(&self, key: u8, pressed: bool) -> Result<(), Error> {
        let slot = self
            .keys
            .get(usize::from(key))
            .ok_or(Error::InvalidKey(key))?;
        slot.store(pressed, Ordering::Release);
        Ok(())
    }

    /// Whether `key` is held down; `None` if it isn't on the keypad.
    pub fn is_pressed(&self, key: u8) -> Option<bool> {
        self.keys
            .get(usize::from(key))
            .map(|slot| slot.load(Ordering::Acquire))
    }

    /// The lowest key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|&key| self.is_pressed(key) == Some(true))
    }


    /// Releases every key.
    pub fn release_all(&self) {
        for slot in &self.keys {
            slot.store(false, Ordering::Release);
        }
    }
}
