use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, warn};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::debugger::DebugCommand;
use crate::display::{HEIGHT, WIDTH};
use crate::emulator::Emulator;
use crate::keypad::keymap;
use crate::sound::Beeper;
use crate::timer::{Clock, DEFAULT_CPU_HZ};

mod debugger;
mod decode;
mod display;
mod emulator;
mod error;
mod keypad;
mod memory;
mod registers;
mod sound;
mod timer;

const PIXEL_ON: u32 = 0x00FF_FFFF;
const PIXEL_OFF: u32 = 0x0000_0000;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter with a pause/step/watchpoint debugger")]
struct Args {
    #[arg(
        short,
        long,
        default_value_t = 8,
        help = "Display scale factor (1, 2, 4, 8, 16 or 32)"
    )]
    scale: u32,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CPU_HZ,
        help = "CPU frequency in cycles per second"
    )]
    cpu_hz: u32,

    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,
}

fn window_scale(factor: u32) -> Result<Scale> {
    Ok(match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        16 => Scale::X16,
        32 => Scale::X32,
        other => bail!("unsupported scale factor {other}; pick 1, 2, 4, 8, 16 or 32"),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.cpu_hz == 0 {
        bail!("cpu frequency must be positive");
    }

    let rom = fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM {}", args.rom.display()))?;
    let mut emu = Emulator::new();
    emu.load_rom(&rom)?;

    let mut window = Window::new(
        "CHIP-8",
        WIDTH,
        HEIGHT,
        WindowOptions {
            scale: window_scale(args.scale)?,
            ..WindowOptions::default()
        },
    )
    .context("opening display window")?;
    // cap redraws around 60 fps; the clock decouples emulation speed from this
    window.limit_update_rate(Some(Duration::from_micros(16_600)));

    let mut beeper = match Beeper::new() {
        Ok(beeper) => Some(beeper),
        Err(e) => {
            warn!("audio disabled: {e}");
            None
        }
    };

    let mut clock = Clock::new(args.cpu_hz);
    let mut pixel_buffer = vec![PIXEL_OFF; WIDTH * HEIGHT];
    let mut last_tick = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let (cycles, timer_ticks) = clock.advance(now - last_tick);
        last_tick = now;

        // refresh the keypad once per tick, before any cycles run
        let mut keys = [false; 16];
        for key in window.get_keys() {
            if let Some(k) = keymap(key) {
                keys[k as usize] = true;
            }
        }
        emu.keypad.set_keys(keys);

        for cmd in debug_commands(&window) {
            emu.apply_debug_command(cmd);
        }

        for _ in 0..cycles {
            if let Err(e) = emu.execute_cycle() {
                error!("cycle failed: {e}; pausing");
                emu.debugger.pause();
                break;
            }
        }
        emu.tick_timers(timer_ticks);

        if let Some(beeper) = beeper.as_mut() {
            beeper.set_active(emu.tone_active());
        }

        for (i, &pixel) in emu.fb.pixels().iter().flatten().enumerate() {
            pixel_buffer[i] = if pixel == 1 { PIXEL_ON } else { PIXEL_OFF };
        }
        window
            .update_with_buffer(&pixel_buffer, WIDTH, HEIGHT)
            .context("updating display window")?;
    }

    Ok(())
}

/// Discrete debug triggers for this tick. Pause and step are bound to keys;
/// the operand-carrying commands (watchpoints, patches) are part of the same
/// interface but need an input source that can carry an address and value.
fn debug_commands(window: &Window) -> Vec<DebugCommand> {
    let mut commands = Vec::new();
    if window.is_key_pressed(Key::H, KeyRepeat::No) {
        commands.push(DebugCommand::TogglePause);
    }
    if window.is_key_pressed(Key::G, KeyRepeat::No) {
        commands.push(DebugCommand::Step);
    }
    commands
}
