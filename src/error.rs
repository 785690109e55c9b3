use thiserror::Error;

/// Everything that can fail inside the interpreter core.
///
/// Pre-run failures (`RomTooLarge`) abort before the first cycle. In-run
/// failures fail the current cycle; the frame loop reports them and pauses
/// the debugger so the machine state can be inspected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("memory access out of bounds at address {0:#06X}")]
    AddressOutOfBounds(u16),

    #[error("call stack overflow: more than {0} nested subroutines")]
    StackOverflow(usize),

    #[error("call stack underflow: return with no pending subroutine")]
    StackUnderflow,
}
