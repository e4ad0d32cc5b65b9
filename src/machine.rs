use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::chip8::Chip8;
use crate::config::Config;
use crate::error::{Error, Fault, Result};
use crate::framebuffer::FrameBuffer;
use crate::keypad::Keypad;
use crate::state::State;

/// State shared between the host and the three clock threads.
///
/// All VM state sits behind the one mutex and is held for a single instruction
/// or a single timer decrement. The keypad and the running flag are atomics so
/// the host never waits on the instruction cycle to press a key or stop.
struct Shared {
    chip8: Mutex<Chip8>,
    keypad: Keypad,
    running: AtomicBool,
    fault: Mutex<Option<Fault>>,
}

impl Shared {
    // Each critical section either completes or leaves the state untouched,
    // so a poisoned lock still guards consistent data.
    fn chip8(&self) -> MutexGuard<'_, Chip8> {
        self.chip8.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fault(&self) -> MutexGuard<'_, Option<Fault>> {
        self.fault.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// # Machine
/// A CHIP-8 virtual machine running on its own clocks.
///
/// `start` launches three independently scheduled threads:
/// - the instruction cycle, one fetch-decode-execute per `cycle_interval`
/// - the delay timer, one decrement per `timer_interval`
/// - the sound timer, one decrement per `timer_interval`
///
/// `stop` signals all three and joins them before returning. A fault in the
/// instruction cycle halts all three and is reported by `fault`.
pub struct Machine {
    shared: Arc<Shared>,
    config: Config,
    threads: Vec<(&'static str, JoinHandle<()>)>,
    started: bool,
}

impl Machine {
    /// Loads `program` at 0x200 with the default configuration
    pub fn new(program: &[u8]) -> Result<Self> {
        Machine::with_config(program, Config::default())
    }

    pub fn with_config(program: &[u8], config: Config) -> Result<Self> {
        let chip8 = Chip8::with_quirks(program, config.quirks)?;
        Ok(Machine {
            shared: Arc::new(Shared {
                chip8: Mutex::new(chip8),
                keypad: Keypad::new(),
                running: AtomicBool::new(false),
                fault: Mutex::new(None),
            }),
            config,
            threads: Vec::with_capacity(3),
            started: false,
        })
    }

    /// Launches the instruction cycle and both timers.
    ///
    /// A stopped machine may be started again and carries on from where it stopped.
    /// Starting after a fault clears the fault and retries the faulting instruction.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }
        // a fault leaves finished threads behind
        self.join_threads()?;
        self.shared.fault().take();
        self.shared.running.store(true, Ordering::Release);
        self.started = true;

        if let Err(err) = self.spawn_clocks() {
            // don't leave a partial set of clocks behind
            let _ = self.stop();
            return Err(err);
        }
        info!(
            "started: cycle every {:?}, timers every {:?}",
            self.config.cycle_interval, self.config.timer_interval
        );
        Ok(())
    }

    /// Halts and joins all three threads.
    ///
    /// Fails with `NotStarted` only if the machine was never started; stopping a
    /// stopped machine does nothing. A fault that aborted the instruction cycle
    /// is reported by `fault`, not here.
    pub fn stop(&mut self) -> Result<()> {
        if !self.started {
            return Err(Error::NotStarted);
        }
        self.shared.running.store(false, Ordering::Release);
        self.join_threads()?;
        debug!("stopped");
        Ok(())
    }

    /// Whether the clocks are ticking; false once stopped or after a fault
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// The fault that aborted the instruction cycle, if any
    pub fn fault(&self) -> Option<Fault> {
        *self.shared.fault()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad identifier 0x0..=0xF
    /// * `pressed` whether the key is now held down
    pub fn set_key(&self, key: u8, pressed: bool) -> Result<()> {
        self.shared.keypad.set(key, pressed)
    }

    /// Lets go of every key, e.g. when the host window loses focus
    pub fn release_keys(&self) {
        self.shared.keypad.release_all();
    }

    /// A copy of the current frame
    pub fn frame(&self) -> FrameBuffer {
        *self.shared.chip8().frame_buffer()
    }

    /// A copy of the current frame if it changed since it was last taken
    pub fn take_frame(&self) -> Option<FrameBuffer> {
        self.shared.chip8().take_frame()
    }

    pub fn delay_timer(&self) -> u8 {
        self.shared.chip8().state().delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.shared.chip8().state().sound_timer
    }

    /// A copy of the whole VM state
    pub fn state(&self) -> State {
        self.shared.chip8().state().clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn join_threads(&mut self) -> Result<()> {
        let mut panicked = None;
        for (name, handle) in self.threads.drain(..) {
            if handle.join().is_err() {
                error!("{} thread panicked", name);
                panicked.get_or_insert(name);
            }
        }
        match panicked {
            Some(name) => Err(Error::ThreadPanicked(name)),
            None => Ok(()),
        }
    }

    fn spawn_clocks(&mut self) -> Result<()> {
        let cycle_interval = self.config.cycle_interval;
        let timer_interval = self.config.timer_interval;
        self.spawn("cpu", move |shared| run_cpu(&shared, cycle_interval))?;
        self.spawn("delay timer", move |shared| {
            run_timer(&shared, timer_interval, Chip8::tick_delay_timer)
        })?;
        self.spawn("sound timer", move |shared| {
            run_timer(&shared, timer_interval, Chip8::tick_sound_timer)
        })
    }

    fn spawn<F>(&mut self, name: &'static str, body: F) -> Result<()>
    where
        F: FnOnce(Arc<Shared>) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(format!("chip8 {}", name))
            .spawn(move || body(shared))
            .map_err(|err| Error::Spawn(name, err))?;
        self.threads.push((name, handle));
        Ok(())
    }
}

impl Drop for Machine {
    fn drop(&mut self) {
        if !self.threads.is_empty() {
            let _ = self.stop();
        }
    }
}

/// Sleeps until `next` and pushes it on by `interval`.
/// After a stall longer than one interval the schedule restarts from now
/// rather than bursting to catch up.
fn pace(next: &mut Instant, interval: Duration) {
    let now = Instant::now();
    if now < *next {
        thread::sleep(*next - now);
        *next += interval;
    } else if now - *next > interval {
        *next = now + interval;
    } else {
        *next += interval;
    }
}

fn run_cpu(shared: &Shared, interval: Duration) {
    let mut next = Instant::now();
    while shared.is_running() {
        let result = shared.chip8().step(&shared.keypad);
        if let Err(fault) = result {
            error!("{}", fault);
            *shared.fault() = Some(fault);
            // take the timers down with us
            shared.running.store(false, Ordering::Release);
            break;
        }
        pace(&mut next, interval);
    }
}

fn run_timer(shared: &Shared, interval: Duration, tick: fn(&mut Chip8)) {
    let mut next = Instant::now() + interval;
    while shared.is_running() {
        pace(&mut next, interval);
        if !shared.is_running() {
            break;
        }
        tick(&mut shared.chip8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Config {
        Config {
            cycle_interval: Duration::from_micros(100),
            timer_interval: Duration::from_millis(1),
            ..Config::default()
        }
    }

    #[test]
    fn test_stop_before_start_fails() {
        let mut machine = Machine::new(&[0x12, 0x00]).unwrap();
        assert!(matches!(machine.stop(), Err(Error::NotStarted)));
    }

    fn wait_until_halted(machine: &Machine) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while machine.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_start_twice_fails() {
        let mut machine = Machine::with_config(&[0x12, 0x00], fast_config()).unwrap();
        machine.start().unwrap();
        assert!(matches!(machine.start(), Err(Error::AlreadyRunning)));
        machine.stop().unwrap();
    }

    #[test]
    fn test_stopping_a_stopped_machine_is_fine() {
        let mut machine = Machine::with_config(&[0x12, 0x00], fast_config()).unwrap();
        machine.start().unwrap();
        machine.stop().unwrap();
        machine.stop().unwrap();
        assert!(!machine.is_running());
        assert!(machine.threads.is_empty());
    }

    #[test]
    fn test_fault_stops_every_thread() {
        let mut machine = Machine::with_config(&[0xFF, 0xFF], fast_config()).unwrap();
        machine.start().unwrap();
        wait_until_halted(&machine);
        assert!(!machine.is_running());
        let expected = Fault::UnknownOpcode {
            opcode: 0xFFFF,
            pc: 0x200,
        };
        assert_eq!(machine.fault(), Some(expected));
        machine.stop().unwrap();
        assert!(machine.threads.is_empty());
        assert_eq!(machine.fault(), Some(expected));
    }

    #[test]
    fn test_faulted_machine_can_start_again() {
        let mut machine = Machine::with_config(&[0xFF, 0xFF], fast_config()).unwrap();
        machine.start().unwrap();
        wait_until_halted(&machine);
        assert!(machine.fault().is_some());

        // the finished threads are joined and the same fault comes straight back
        machine.start().unwrap();
        wait_until_halted(&machine);
        assert!(machine.fault().is_some());
        assert_eq!(machine.threads.len(), 3);
        machine.stop().unwrap();
        assert!(machine.threads.is_empty());
    }

    #[test]
    fn test_pace_restarts_after_stall() {
        let interval = Duration::from_millis(1);
        let mut next = Instant::now() - Duration::from_secs(1);
        pace(&mut next, interval);
        assert!(next > Instant::now() - interval);
    }
}
