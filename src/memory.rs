use crate::error::Chip8Error;

pub const RAM_SIZE: usize = 4096;
pub const ROM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = RAM_SIZE - ROM_START as usize;
pub const FONT_START: u16 = 0x050;

/// 16 hexadecimal digit glyphs, 5 bytes each, loaded at `FONT_START`.
const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4k byte store. The font table lives at `0x050..0x0A0`, ROM bytes
/// at `0x200` onward. Every access is bounds checked; the dispatcher decides
/// what to do with a failed cycle.
pub struct Memory {
    bytes: [u8; RAM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; RAM_SIZE];
        let start = FONT_START as usize;
        bytes[start..start + FONT_SET.len()].copy_from_slice(&FONT_SET);
        Self { bytes }
    }

    /// Copies ROM bytes to `0x200`. ROMs that would run past the end of
    /// memory are rejected outright, never truncated.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = ROM_START as usize;
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn get(&self, addr: u16) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Chip8Error::AddressOutOfBounds(addr))
    }

    pub fn set(&mut self, addr: u16, val: u8) -> Result<(), Chip8Error> {
        *self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Chip8Error::AddressOutOfBounds(addr))? = val;
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
