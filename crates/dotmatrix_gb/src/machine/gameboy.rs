use std::rc::Rc;

use anyhow::{Context, Result};

use super::bus::SystemBus;
use super::cartridge::{Cartridge, RtcClock, SystemClock};
use super::config::{MachineConfig, VramAccess};
use super::joypad::Button;
use super::ppu::{LcdControl, Ppu, PpuMode, VideoPort};
use super::video::FrameBuffer;
use crate::cpu::Cpu;

/// T-cycles in one full frame: 154 lines of 456 cycles.
pub const FRAME_CYCLES: u32 = 70_224;

/// Result of one [`GameBoy::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// T-cycles the CPU consumed, all of which were replayed into the PPU,
    /// timer and DMA.
    pub cycles: u32,
    /// The PPU finished line 143 during this step.
    pub frame_ready: bool,
}

/// A complete DMG: CPU, bus (with timer, joypad, serial and cartridge) and
/// PPU, kept in lockstep one T-cycle at a time.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(super) bus: SystemBus,
    pub(super) ppu: Ppu,
    rtc_clock: Rc<dyn RtcClock>,
    vram_access: VramAccess,
    seed_internal_ram: bool,
    frames: u64,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let MachineConfig {
            vram_access,
            seed_internal_ram,
            rtc_clock,
        } = config;
        let rtc_clock: Rc<dyn RtcClock> = match rtc_clock {
            Some(clock) => Rc::from(clock),
            None => Rc::new(SystemClock),
        };

        let mut bus = SystemBus::new(vram_access, seed_internal_ram);
        let mut ppu = Ppu::new();
        ppu.power_on(&mut bus);

        Self {
            cpu: Cpu::new(),
            bus,
            ppu,
            rtc_clock,
            vram_access,
            seed_internal_ram,
            frames: 0,
        }
    }

    /// Power-cycle the machine. The inserted cartridge, including its RAM
    /// and clock, survives.
    pub fn reset(&mut self) {
        let cartridge = std::mem::replace(self.bus.cartridge_mut(), Cartridge::empty());
        self.bus = SystemBus::new(self.vram_access, self.seed_internal_ram);
        self.bus.insert_cartridge(cartridge);
        self.ppu.power_on(&mut self.bus);
        self.cpu.reset();
        self.frames = 0;
    }

    /// Insert a cartridge built from `rom` and power-cycle.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        let cartridge =
            Cartridge::from_rom(rom, Rc::clone(&self.rtc_clock)).context("failed to load ROM")?;
        self.bus.insert_cartridge(cartridge);
        self.reset();
        Ok(())
    }

    /// Run one CPU step and replay its cycles, one at a time, into the PPU
    /// and then the timer and DMA.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let cycles = self.cpu.step(&mut self.bus)?;
        let mut frame_ready = false;
        for _ in 0..cycles {
            frame_ready |= self.ppu.tick(&mut self.bus);
            self.bus.tick_peripherals();
        }
        if frame_ready {
            self.frames += 1;
            log::debug!("GB: frame {} ready", self.frames);
        }
        Ok(StepOutcome {
            cycles,
            frame_ready,
        })
    }

    /// Step until the next frame-ready event and return the T-cycles run.
    ///
    /// With the LCD off no frame ever completes, so this gives up after one
    /// frame's worth of cycles.
    pub fn step_frame(&mut self) -> Result<u32> {
        let mut total = 0u32;
        loop {
            let outcome = self.step()?;
            total = total.saturating_add(outcome.cycles);
            if outcome.frame_ready {
                return Ok(total);
            }
            let lcd_on = self.bus.lcd().control().contains(LcdControl::LCD_ENABLE);
            if !lcd_on && total >= FRAME_CYCLES {
                return Ok(total);
            }
        }
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.bus.set_button(button, pressed);
    }

    /// The most recent frame; lines past the current LY are from the
    /// previous frame.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        self.ppu.frame()
    }

    /// Bytes sent over the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial_output()
    }

    /// Drain the captured serial bytes. Long-running programs that print
    /// over serial should call this instead of reading `serial_output`.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.bus.take_serial_output()
    }

    pub fn ppu_mode(&self) -> PpuMode {
        self.ppu.mode()
    }

    /// Frames completed since power-on.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Read as the CPU would, access locks included. Does not advance time.
    pub fn read8(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Write as the CPU would. Does not advance time.
    pub fn write8(&mut self, addr: u16, value: u8) {
        crate::cpu::Bus::write8(&mut self.bus, addr, value);
    }

    /// Raise interrupt line `id` (0 = VBlank .. 4 = Joypad). Any other id
    /// is an error.
    pub fn request_interrupt(&mut self, id: u8) -> Result<()> {
        self.bus.request_interrupt(id)
    }
}
