use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::debugger::{DebugCommand, Debugger, Watchpoint};
use crate::decode::Opcode;
use crate::display::FrameBuffer;
use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::memory::{Memory, FONT_START};
use crate::registers::{Registers, V_COUNT};

/// The interpreter: register bank, memory, display buffer, keypad, timers
/// and the embedded debugger, all owned by one instance and mutated
/// synchronously by `execute_cycle`.
pub struct Emulator {
    pub regs: Registers,
    pub mem: Memory,
    pub fb: FrameBuffer,
    pub keypad: Keypad,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub debugger: Debugger,
    rng: StdRng,
}

impl Emulator {
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            fb: FrameBuffer::new(),
            keypad: Keypad::new(),
            delay_timer: 0,
            sound_timer: 0,
            debugger: Debugger::new(),
            // seeded once for the whole run, never reseeded
            rng: StdRng::from_entropy(),
        }
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.mem.load_rom(rom)
    }

    /// Whether the external audio collaborator should have the tone on.
    pub fn tone_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Applies 60 Hz timer ticks released by the clock. Each timer only
    /// counts down while above zero.
    pub fn tick_timers(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if self.delay_timer > 0 {
                self.delay_timer -= 1;
            }
            if self.sound_timer > 0 {
                self.sound_timer -= 1;
            }
        }
    }

    /// One fetch-decode-execute cycle, gated by the debugger.
    ///
    /// When paused (and not stepping) nothing happens, not even the fetch.
    /// Otherwise the program counter advances by 2 before the operation body
    /// runs, so control transfers just overwrite or offset it. Watchpoints
    /// are evaluated after the executed cycle, and a pending step always
    /// lands back in Paused.
    pub fn execute_cycle(&mut self) -> Result<(), Chip8Error> {
        if !self.debugger.should_run() {
            return Ok(());
        }
        let result = self.fetch_execute();
        if result.is_ok() {
            self.debugger.check_watchpoints(&self.mem, &self.regs);
        }
        self.debugger.finish_cycle();
        result
    }

    fn fetch_execute(&mut self) -> Result<(), Chip8Error> {
        let hi = self.mem.get(self.regs.pc)?;
        let lo = self.mem.get(self.regs.pc.wrapping_add(1))?;
        self.regs.pc = self.regs.pc.wrapping_add(2);
        let raw = u16::from(hi) << 8 | u16::from(lo);
        self.execute(Opcode::decode(raw))
    }

    fn execute(&mut self, op: Opcode) -> Result<(), Chip8Error> {
        match op {
            Opcode::ClearScreen => self.fb.clear(),
            Opcode::Return => self.regs.pc = self.regs.pop()?,
            Opcode::Jump(addr) => self.regs.pc = addr,
            Opcode::Call(addr) => {
                self.regs.push(self.regs.pc)?;
                self.regs.pc = addr;
            }
            Opcode::SkipEqualByte(x, nn) => {
                if self.regs.get(x) == nn {
                    self.regs.skip();
                }
            }
            Opcode::SkipNotEqualByte(x, nn) => {
                if self.regs.get(x) != nn {
                    self.regs.skip();
                }
            }
            Opcode::SkipEqualReg(x, y) => {
                if self.regs.get(x) == self.regs.get(y) {
                    self.regs.skip();
                }
            }
            Opcode::SetReg(x, nn) => self.regs.set(x, nn),
            Opcode::AddByte(x, nn) => {
                // plain add, no carry flag
                self.regs.set(x, self.regs.get(x).wrapping_add(nn));
            }
            Opcode::Copy(x, y) => self.regs.set(x, self.regs.get(y)),
            Opcode::Or(x, y) => self.regs.set(x, self.regs.get(x) | self.regs.get(y)),
            Opcode::And(x, y) => self.regs.set(x, self.regs.get(x) & self.regs.get(y)),
            Opcode::Xor(x, y) => self.regs.set(x, self.regs.get(x) ^ self.regs.get(y)),
            Opcode::AddReg(x, y) => {
                let (sum, carry) = self.regs.get(x).overflowing_add(self.regs.get(y));
                self.regs.set(0xF, carry as u8);
                self.regs.set(x, sum);
            }
            Opcode::Sub(x, y) => {
                let (diff, borrow) = self.regs.get(x).overflowing_sub(self.regs.get(y));
                self.regs.set(0xF, !borrow as u8);
                self.regs.set(x, diff);
            }
            Opcode::ShiftRight(x) => {
                let vx = self.regs.get(x);
                self.regs.set(0xF, vx & 0x1);
                self.regs.set(x, vx >> 1);
            }
            Opcode::SubReversed(x, y) => {
                let (diff, borrow) = self.regs.get(y).overflowing_sub(self.regs.get(x));
                self.regs.set(0xF, !borrow as u8);
                self.regs.set(x, diff);
            }
            Opcode::ShiftLeft(x) => {
                let vx = self.regs.get(x);
                self.regs.set(0xF, vx >> 7);
                self.regs.set(x, vx << 1);
            }
            Opcode::SkipNotEqualReg(x, y) => {
                if self.regs.get(x) != self.regs.get(y) {
                    self.regs.skip();
                }
            }
            Opcode::SetIndex(addr) => self.regs.i = addr,
            Opcode::JumpOffset(addr) => {
                // always V0, never VX
                self.regs.pc = addr.wrapping_add(u16::from(self.regs.get(0)));
            }
            Opcode::Random(x, nn) => {
                let byte: u8 = self.rng.gen();
                self.regs.set(x, byte & nn);
            }
            Opcode::Draw(x, y, n) => self.draw(x, y, n)?,
            Opcode::SkipKeyPressed(x) => {
                if self.keypad.is_pressed(self.regs.get(x)) {
                    self.regs.skip();
                }
            }
            Opcode::SkipKeyNotPressed(x) => {
                if !self.keypad.is_pressed(self.regs.get(x)) {
                    self.regs.skip();
                }
            }
            Opcode::ReadDelay(x) => self.regs.set(x, self.delay_timer),
            Opcode::WaitKey(x) => match self.keypad.first_pressed() {
                Some(key) => self.regs.set(x, key),
                // re-fetch this instruction next cycle
                None => self.regs.rewind(),
            },
            Opcode::SetDelay(x) => self.delay_timer = self.regs.get(x),
            Opcode::SetSound(x) => self.sound_timer = self.regs.get(x),
            Opcode::AddIndex(x) => {
                self.regs.i = self.regs.i.wrapping_add(u16::from(self.regs.get(x)));
            }
            Opcode::FontChar(x) => {
                self.regs.i = FONT_START + 5 * u16::from(self.regs.get(x));
            }
            Opcode::StoreBcd(x) => {
                let vx = self.regs.get(x);
                self.mem.set(self.index_addr(0)?, vx / 100)?;
                self.mem.set(self.index_addr(1)?, vx / 10 % 10)?;
                self.mem.set(self.index_addr(2)?, vx % 10)?;
            }
            Opcode::StoreRegs(x) => {
                for k in 0..=x {
                    self.mem.set(self.index_addr(k.into())?, self.regs.get(k))?;
                }
            }
            Opcode::LoadRegs(x) => {
                for k in 0..=x {
                    let val = self.mem.get(self.index_addr(k.into())?)?;
                    self.regs.set(k, val);
                }
            }
            Opcode::Unknown(raw) => {
                // silent skip: the +2 advance stands, nothing else changes
                warn!("unknown opcode {raw:#06X}");
            }
        }
        Ok(())
    }

    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
        let mut sprite = [0u8; 15];
        for row in 0..n as usize {
            sprite[row] = self.mem.get(self.index_addr(row as u16)?)?;
        }
        let flag = self
            .fb
            .blit(self.regs.get(x), self.regs.get(y), &sprite[..n as usize]);
        self.regs.set(0xF, flag);
        Ok(())
    }

    /// `I + offset` without wrapping through zero; anything past the address
    /// space fails the cycle at the memory access.
    fn index_addr(&self, offset: u16) -> Result<u16, Chip8Error> {
        self.regs
            .i
            .checked_add(offset)
            .ok_or(Chip8Error::AddressOutOfBounds(self.regs.i))
    }

    /// Applies one discrete debug command from the external input source.
    pub fn apply_debug_command(&mut self, cmd: DebugCommand) {
        match cmd {
            DebugCommand::TogglePause => self.debugger.toggle_pause(),
            DebugCommand::Step => self.debugger.request_step(),
            DebugCommand::AddMemoryWatch { addr, value } => {
                self.debugger.add_watchpoint(Watchpoint::Memory { addr, value });
            }
            DebugCommand::AddRegisterWatch { index, value } => {
                self.debugger
                    .add_watchpoint(Watchpoint::Register { index, value });
            }
            DebugCommand::DeleteWatch { index } => self.debugger.delete_watchpoint(index),
            DebugCommand::PatchMemory { addr, value } => {
                if let Err(e) = self.mem.set(addr, value) {
                    warn!("refusing memory patch: {e}");
                }
            }
            DebugCommand::PatchRegister { index, value } => {
                if (index as usize) < V_COUNT {
                    self.regs.set(index, value);
                } else {
                    warn!("refusing patch of invalid register V{index:X}");
                }
            }
        }
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
