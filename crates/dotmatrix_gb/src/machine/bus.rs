//! The DMG address space.
//!
//! `SystemBus` owns every byte the CPU can see apart from cartridge ROM and
//! RAM, which it forwards to the mapper. The CPU reaches it through
//! [`Bus`](crate::cpu::Bus) and [`InterruptLines`](crate::cpu::InterruptLines);
//! the PPU through the narrower `VideoPort`.

mod access;
mod dma;
mod init;
mod mmio;
mod state;

pub use state::BusState;

use anyhow::Result;

use super::cartridge::Cartridge;
use super::config::VramAccess;
use super::joypad::{Button, Joypad};
use super::ppu::{LcdRegisters, VideoPort};
use super::serial::Serial;
use super::timer::Timer;
use crate::cpu::{Bus, InterruptLines};
use crate::interrupts::{Interrupt, InterruptController, InterruptFlags};

pub(crate) const VRAM_SIZE: usize = 0x2000;
pub(crate) const WRAM_SIZE: usize = 0x2000;
pub(crate) const OAM_SIZE: usize = 0xA0;
pub(crate) const HRAM_SIZE: usize = 0x7F;
pub(crate) const IO_SIZE: usize = 0x80;

pub(crate) struct SystemBus {
    vram: [u8; VRAM_SIZE],
    wram: [u8; WRAM_SIZE],
    oam: [u8; OAM_SIZE],
    hram: [u8; HRAM_SIZE],
    /// Backing store for I/O registers without a dedicated owner (sound,
    /// unused addresses).
    io: [u8; IO_SIZE],
    lcd: LcdRegisters,
    interrupts: InterruptController,
    timer: Timer,
    joypad: Joypad,
    serial: Serial,
    /// T-cycles left in the current OAM DMA; OAM is locked while non-zero.
    dma_cycles_remaining: u32,
    cartridge: Cartridge,
    vram_access: VramAccess,
}

impl SystemBus {
    pub(crate) fn new(vram_access: VramAccess, seed_internal_ram: bool) -> Self {
        let mut bus = Self {
            vram: [0; VRAM_SIZE],
            wram: [0; WRAM_SIZE],
            oam: [0; OAM_SIZE],
            hram: [0; HRAM_SIZE],
            io: [0xFF; IO_SIZE],
            lcd: LcdRegisters::default(),
            interrupts: InterruptController::default(),
            timer: Timer::new(),
            joypad: Joypad::default(),
            serial: Serial::default(),
            dma_cycles_remaining: 0,
            cartridge: Cartridge::empty(),
            vram_access,
        };
        bus.apply_dmg_initial_state(seed_internal_ram);
        bus
    }

    /// CPU-visible read through a shared reference.
    #[inline]
    pub(super) fn peek(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    pub(super) fn insert_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = cartridge;
    }

    pub(super) fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub(super) fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cartridge
    }

    pub(super) fn timer(&self) -> &Timer {
        &self.timer
    }

    pub(super) fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub(super) fn serial_output(&self) -> &[u8] {
        &self.serial.output
    }

    pub(super) fn take_serial_output(&mut self) -> Vec<u8> {
        self.serial.take_output()
    }

    /// Raise interrupt line `id` (0 = VBlank .. 4 = Joypad).
    pub(super) fn request_interrupt(&mut self, id: u8) -> Result<()> {
        self.interrupts.request_id(id)
    }

    pub(super) fn set_button(&mut self, button: Button, pressed: bool) {
        if self.joypad.set_button(button, pressed) {
            self.interrupts.request(Interrupt::Joypad);
        }
    }

    /// One T-cycle of everything the bus clocks itself: the timer and the
    /// OAM DMA countdown.
    pub(super) fn tick_peripherals(&mut self) {
        self.timer.tick(&mut self.interrupts);
        self.tick_dma();
    }
}

impl Bus for SystemBus {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}

impl InterruptLines for SystemBus {
    #[inline]
    fn pending(&self) -> InterruptFlags {
        self.interrupts.pending()
    }

    #[inline]
    fn acknowledge(&mut self, interrupt: Interrupt) {
        self.interrupts.clear(interrupt);
    }
}

impl VideoPort for SystemBus {
    #[inline]
    fn vram(&self, offset: u16) -> u8 {
        self.vram[offset as usize & (VRAM_SIZE - 1)]
    }

    #[inline]
    fn oam(&self, offset: u8) -> u8 {
        self.oam.get(offset as usize).copied().unwrap_or(0xFF)
    }

    #[inline]
    fn lcd(&self) -> &LcdRegisters {
        &self.lcd
    }

    #[inline]
    fn lcd_mut(&mut self) -> &mut LcdRegisters {
        &mut self.lcd
    }

    #[inline]
    fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.interrupts.request(interrupt);
    }
}
