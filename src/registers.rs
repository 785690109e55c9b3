use crate::error::Chip8Error;
use crate::memory::ROM_START;

pub const V_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;

/// The register bank: `V0..VF`, the index register `I`, the program counter
/// and the 16-entry call stack. `VF` doubles as the carry/borrow/collision
/// flag and is written like any other register.
pub struct Registers {
    v: [u8; V_COUNT],
    pub i: u16,
    pub pc: u16,
    stack: [u16; STACK_SIZE],
    sp: usize,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            v: [0; V_COUNT],
            i: 0,
            pc: ROM_START,
            stack: [0; STACK_SIZE],
            sp: 0,
        }
    }

    /// `x` is a decoded nibble, so it always fits the bank.
    pub fn get(&self, x: u8) -> u8 {
        self.v[x as usize]
    }

    pub fn set(&mut self, x: u8, val: u8) {
        self.v[x as usize] = val;
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        if self.sp >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow(STACK_SIZE));
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// Skip the next instruction.
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Undo the fetch advance so the current instruction re-runs next cycle.
    pub fn rewind(&mut self) {
        self.pc = self.pc.wrapping_sub(2);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
