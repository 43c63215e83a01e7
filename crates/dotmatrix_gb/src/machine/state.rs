//! Whole-machine snapshots.
//!
//! A snapshot is validated in full before any component is touched, so a
//! rejected load leaves the running machine exactly as it was.

use anyhow::{ensure, Context, Result};

use super::bus::{BusState, SystemBus};
use super::cartridge::CartridgeState;
use super::gameboy::GameBoy;
use super::ppu::{Ppu, PpuState};
use super::timer::TimerState;
use crate::cpu::{CpuState, Lockup, Registers};

/// Bumped whenever the layout of [`MachineState`] changes.
pub const STATE_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub regs: Registers,
    pub state: CpuState,
    pub lockup: Option<Lockup>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineState {
    pub version: u32,
    pub cpu: CpuSnapshot,
    pub bus: BusState,
    pub timer: TimerState,
    pub ppu: PpuState,
    pub cartridge: CartridgeState,
}

impl GameBoy {
    /// Capture everything needed to resume at the current instruction
    /// boundary.
    pub fn save_state(&self) -> MachineState {
        MachineState {
            version: STATE_VERSION,
            cpu: CpuSnapshot {
                regs: self.cpu.regs,
                state: self.cpu.state,
                lockup: self.cpu.lockup(),
            },
            bus: self.bus.state(),
            timer: self.bus.timer().state(),
            ppu: self.ppu.state(),
            cartridge: self.bus.cartridge().state(),
        }
    }

    /// Restore a snapshot taken by [`save_state`](Self::save_state).
    ///
    /// Fails without changing anything if the version, cartridge kind or
    /// any memory size does not match this machine.
    pub fn load_state(&mut self, state: &MachineState) -> Result<()> {
        if let Err(err) = self.validate_state(state) {
            log::warn!("GB state: rejected save state: {err:#}");
            return Err(err);
        }

        self.cpu.regs = state.cpu.regs;
        self.cpu.state = state.cpu.state;
        match state.cpu.lockup {
            Some(Lockup { opcode, pc }) => self.cpu.set_lockup(opcode, pc),
            None => self.cpu.clear_lockup(),
        }
        self.bus.set_state(&state.bus);
        self.bus.timer_mut().set_state(&state.timer);
        self.ppu.set_state(&state.ppu);
        self.bus.cartridge_mut().set_state(&state.cartridge);
        log::debug!("GB state: restored snapshot v{}", state.version);
        Ok(())
    }

    fn validate_state(&self, state: &MachineState) -> Result<()> {
        ensure!(
            state.version == STATE_VERSION,
            "save state version {} is not supported (expected {STATE_VERSION})",
            state.version
        );
        self.bus
            .cartridge()
            .validate_state(&state.cartridge)
            .context("cartridge state does not match")?;
        SystemBus::validate_state(&state.bus).context("bus state is malformed")?;
        Ppu::validate_state(&state.ppu).context("PPU state is malformed")?;
        Ok(())
    }
}
