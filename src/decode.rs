pub type Addr = u16;

/// One decoded CHIP-8 instruction.
///
/// Opcodes are 16 bits, split into nibbles for dispatch. Groups `0x0`,
/// `0x8`, `0xE` and `0xF` dispatch further on the low byte or low nibble.
/// Anything that matches no defined pattern decodes to `Unknown` carrying
/// the raw word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(Addr),
    /// 2NNN
    Call(Addr),
    /// 3XNN
    SkipEqualByte(u8, u8),
    /// 4XNN
    SkipNotEqualByte(u8, u8),
    /// 5XY0
    SkipEqualReg(u8, u8),
    /// 6XNN
    SetReg(u8, u8),
    /// 7XNN
    AddByte(u8, u8),
    /// 8XY0
    Copy(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4
    AddReg(u8, u8),
    /// 8XY5
    Sub(u8, u8),
    /// 8XY6
    ShiftRight(u8),
    /// 8XY7
    SubReversed(u8, u8),
    /// 8XYE
    ShiftLeft(u8),
    /// 9XY0
    SkipNotEqualReg(u8, u8),
    /// ANNN
    SetIndex(Addr),
    /// BNNN
    JumpOffset(Addr),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipKeyPressed(u8),
    /// EXA1
    SkipKeyNotPressed(u8),
    /// FX07
    ReadDelay(u8),
    /// FX0A
    WaitKey(u8),
    /// FX15
    SetDelay(u8),
    /// FX18
    SetSound(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    FontChar(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    StoreRegs(u8),
    /// FX65
    LoadRegs(u8),
    Unknown(u16),
}

impl Opcode {
    pub fn decode(raw: u16) -> Self {
        let x = ((raw >> 8) & 0xF) as u8;
        let y = ((raw >> 4) & 0xF) as u8;
        let n = (raw & 0xF) as u8;
        let nn = (raw & 0xFF) as u8;
        let nnn = raw & 0xFFF;

        match raw >> 12 {
            0x0 => match raw {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::Return,
                _ => Self::Unknown(raw),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x3 => Self::SkipEqualByte(x, nn),
            0x4 => Self::SkipNotEqualByte(x, nn),
            0x5 if n == 0x0 => Self::SkipEqualReg(x, y),
            0x6 => Self::SetReg(x, nn),
            0x7 => Self::AddByte(x, nn),
            0x8 => match n {
                0x0 => Self::Copy(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::Xor(x, y),
                0x4 => Self::AddReg(x, y),
                0x5 => Self::Sub(x, y),
                0x6 => Self::ShiftRight(x),
                0x7 => Self::SubReversed(x, y),
                0xE => Self::ShiftLeft(x),
                _ => Self::Unknown(raw),
            },
            0x9 if n == 0x0 => Self::SkipNotEqualReg(x, y),
            0xA => Self::SetIndex(nnn),
            0xB => Self::JumpOffset(nnn),
            0xC => Self::Random(x, nn),
            0xD => Self::Draw(x, y, n),
            0xE => match nn {
                0x9E => Self::SkipKeyPressed(x),
                0xA1 => Self::SkipKeyNotPressed(x),
                _ => Self::Unknown(raw),
            },
            0xF => match nn {
                0x07 => Self::ReadDelay(x),
                0x0A => Self::WaitKey(x),
                0x15 => Self::SetDelay(x),
                0x18 => Self::SetSound(x),
                0x1E => Self::AddIndex(x),
                0x29 => Self::FontChar(x),
                0x33 => Self::StoreBcd(x),
                0x55 => Self::StoreRegs(x),
                0x65 => Self::LoadRegs(x),
                _ => Self::Unknown(raw),
            },
            _ => Self::Unknown(raw),
        }
    }
}
