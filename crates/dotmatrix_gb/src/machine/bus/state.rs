use anyhow::{ensure, Result};

use super::super::ppu::LcdRegisters;
use super::{SystemBus, HRAM_SIZE, IO_SIZE, OAM_SIZE, VRAM_SIZE, WRAM_SIZE};
use crate::interrupts::InterruptController;

/// Memory and register contents owned by the bus. Timer and cartridge
/// state are captured separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusState {
    pub vram: Vec<u8>,
    pub wram: Vec<u8>,
    pub oam: Vec<u8>,
    pub hram: Vec<u8>,
    pub io: Vec<u8>,
    pub lcd: LcdRegisters,
    pub interrupts: InterruptController,
    /// P1 select bits, held buttons, held d-pad.
    pub joypad: [u8; 3],
    pub serial_sb: u8,
    pub serial_sc: u8,
    pub dma_cycles_remaining: u32,
}

impl SystemBus {
    pub(in super::super) fn state(&self) -> BusState {
        BusState {
            vram: self.vram.to_vec(),
            wram: self.wram.to_vec(),
            oam: self.oam.to_vec(),
            hram: self.hram.to_vec(),
            io: self.io.to_vec(),
            lcd: self.lcd,
            interrupts: self.interrupts,
            joypad: self.joypad.state(),
            serial_sb: self.serial.sb,
            serial_sc: self.serial.sc,
            dma_cycles_remaining: self.dma_cycles_remaining,
        }
    }

    pub(in super::super) fn validate_state(state: &BusState) -> Result<()> {
        let regions = [
            ("VRAM", state.vram.len(), VRAM_SIZE),
            ("WRAM", state.wram.len(), WRAM_SIZE),
            ("OAM", state.oam.len(), OAM_SIZE),
            ("HRAM", state.hram.len(), HRAM_SIZE),
            ("I/O", state.io.len(), IO_SIZE),
        ];
        for (name, actual, expected) in regions {
            ensure!(
                actual == expected,
                "{name} is {actual} bytes in save state, expected {expected}"
            );
        }
        Ok(())
    }

    /// Caller runs `validate_state` first.
    pub(in super::super) fn set_state(&mut self, state: &BusState) {
        self.vram.copy_from_slice(&state.vram);
        self.wram.copy_from_slice(&state.wram);
        self.oam.copy_from_slice(&state.oam);
        self.hram.copy_from_slice(&state.hram);
        self.io.copy_from_slice(&state.io);
        self.lcd = state.lcd;
        self.interrupts = state.interrupts;
        self.joypad.set_state(state.joypad);
        self.serial.sb = state.serial_sb;
        self.serial.sc = state.serial_sc;
        self.dma_cycles_remaining = state.dma_cycles_remaining;
    }
}
