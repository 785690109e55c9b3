use log::{debug, warn};

use crate::memory::{Memory, RAM_SIZE};
use crate::registers::{Registers, V_COUNT};

pub const MAX_WATCHPOINTS: usize = 16;

/// A condition that pauses execution once the watched byte reaches the
/// expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watchpoint {
    Memory { addr: u16, value: u8 },
    Register { index: u8, value: u8 },
}

/// Discrete debugger mutations, produced by an external input source.
#[derive(Debug, Clone, Copy)]
pub enum DebugCommand {
    TogglePause,
    Step,
    AddMemoryWatch { addr: u16, value: u8 },
    AddRegisterWatch { index: u8, value: u8 },
    DeleteWatch { index: usize },
    PatchMemory { addr: u16, value: u8 },
    PatchRegister { index: u8, value: u8 },
}

/// Pause/step/watchpoint state machine gating the dispatcher.
///
/// Three modes: Running (`paused = false`), Paused (cycles suppressed
/// entirely) and Stepping (`paused && stepping`, transient: exactly one cycle
/// runs, then the machine re-pauses). Watchpoints are evaluated after every
/// executed cycle, never after a suppressed one.
#[derive(Default)]
pub struct Debugger {
    paused: bool,
    stepping: bool,
    watchpoints: Vec<Watchpoint>,
}

impl Debugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the dispatcher may run a cycle right now.
    pub fn should_run(&self) -> bool {
        !self.paused || self.stepping
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("debugger {}", if self.paused { "paused" } else { "running" });
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Permits exactly one cycle; `finish_cycle` re-pauses afterwards.
    pub fn request_step(&mut self) {
        self.paused = true;
        self.stepping = true;
        debug!("debugger stepping one cycle");
    }

    pub fn add_watchpoint(&mut self, wp: Watchpoint) {
        match wp {
            Watchpoint::Memory { addr, .. } if addr as usize >= RAM_SIZE => {
                warn!("refusing watchpoint on out-of-bounds address {addr:#06X}");
                return;
            }
            Watchpoint::Register { index, .. } if index as usize >= V_COUNT => {
                warn!("refusing watchpoint on invalid register V{index:X}");
                return;
            }
            _ => {}
        }
        if self.watchpoints.len() >= MAX_WATCHPOINTS {
            warn!("refusing watchpoint: already tracking {MAX_WATCHPOINTS}");
            return;
        }
        debug!("added watchpoint {wp:?}");
        self.watchpoints.push(wp);
    }

    /// Deletes the watchpoint at `index` in insertion order. Out-of-range
    /// indices are refused with a warning.
    pub fn delete_watchpoint(&mut self, index: usize) {
        if index >= self.watchpoints.len() {
            warn!(
                "refusing to delete watchpoint {index}: only {} live",
                self.watchpoints.len()
            );
            return;
        }
        let wp = self.watchpoints.remove(index);
        debug!("deleted watchpoint {wp:?}");
    }

    pub fn watchpoints(&self) -> &[Watchpoint] {
        &self.watchpoints
    }

    /// Evaluates all live watchpoints against the current machine state and
    /// pauses on the first match. Runs after every executed cycle.
    pub fn check_watchpoints(&mut self, mem: &Memory, regs: &Registers) {
        for wp in &self.watchpoints {
            let hit = match *wp {
                Watchpoint::Memory { addr, value } => mem.get(addr) == Ok(value),
                Watchpoint::Register { index, value } => regs.get(index) == value,
            };
            if hit {
                debug!("watchpoint hit: {wp:?}");
                self.paused = true;
                break;
            }
        }
    }

    /// Closes out a cycle: a pending step always lands back in Paused, even
    /// if the machine was already paused.
    pub fn finish_cycle(&mut self) {
        if self.stepping {
            self.paused = true;
            self.stepping = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let dbg = Debugger::new();
        assert!(!dbg.is_paused());
        assert!(dbg.should_run());
    }

    #[test]
    fn pause_suppresses_cycles() {
        let mut dbg = Debugger::new();
        dbg.toggle_pause();
        assert!(!dbg.should_run());
        dbg.toggle_pause();
        assert!(dbg.should_run());
    }

    #[test]
    fn step_permits_one_cycle_then_repauses() {
        let mut dbg = Debugger::new();
        dbg.pause();
        dbg.request_step();
        assert!(dbg.should_run());
        dbg.finish_cycle();
        assert!(dbg.is_paused());
        assert!(!dbg.should_run());
    }

    #[test]
    fn step_repauses_even_when_started_running() {
        let mut dbg = Debugger::new();
        dbg.request_step();
        dbg.finish_cycle();
        assert!(dbg.is_paused());
    }

    #[test]
    fn memory_watchpoint_pauses_on_match() {
        let mut dbg = Debugger::new();
        let mut mem = Memory::new();
        let regs = Registers::new();
        dbg.add_watchpoint(Watchpoint::Memory {
            addr: 0x300,
            value: 0x42,
        });

        dbg.check_watchpoints(&mem, &regs);
        assert!(!dbg.is_paused());

        mem.set(0x300, 0x42).unwrap();
        dbg.check_watchpoints(&mem, &regs);
        assert!(dbg.is_paused());
    }

    #[test]
    fn register_watchpoint_pauses_on_match() {
        let mut dbg = Debugger::new();
        let mem = Memory::new();
        let mut regs = Registers::new();
        dbg.add_watchpoint(Watchpoint::Register {
            index: 0x3,
            value: 0x07,
        });

        regs.set(0x3, 0x07);
        dbg.check_watchpoints(&mem, &regs);
        assert!(dbg.is_paused());
    }

    #[test]
    fn watchpoint_capacity_is_sixteen() {
        let mut dbg = Debugger::new();
        for addr in 0..=MAX_WATCHPOINTS as u16 {
            dbg.add_watchpoint(Watchpoint::Memory { addr, value: 0xFF });
        }
        assert_eq!(dbg.watchpoints().len(), MAX_WATCHPOINTS);
    }

    #[test]
    fn invalid_watchpoints_are_refused() {
        let mut dbg = Debugger::new();
        dbg.add_watchpoint(Watchpoint::Memory {
            addr: 0x1000,
            value: 0,
        });
        dbg.add_watchpoint(Watchpoint::Register { index: 0x10, value: 0 });
        assert!(dbg.watchpoints().is_empty());
    }

    #[test]
    fn delete_watchpoint_by_index() {
        let mut dbg = Debugger::new();
        dbg.add_watchpoint(Watchpoint::Memory { addr: 0x1, value: 1 });
        dbg.add_watchpoint(Watchpoint::Memory { addr: 0x2, value: 2 });
        dbg.delete_watchpoint(0);
        assert_eq!(
            dbg.watchpoints(),
            &[Watchpoint::Memory { addr: 0x2, value: 2 }]
        );
        // out of range: no-op
        dbg.delete_watchpoint(5);
        assert_eq!(dbg.watchpoints().len(), 1);
    }
}
