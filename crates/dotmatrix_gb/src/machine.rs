mod bus;
mod cartridge;
mod config;
mod gameboy;
mod joypad;
mod ppu;
mod serial;
mod state;
mod timer;
mod video;

pub use bus::BusState;
pub use cartridge::{
    CartridgeKind, CartridgeState, FixedClock, Mapper, Mbc1State, Mbc3State, RtcClock,
    RtcRegisters, RtcState, SystemClock,
};
pub use config::{MachineConfig, VramAccess};
pub use gameboy::{GameBoy, StepOutcome, FRAME_CYCLES};
pub use joypad::Button;
pub use ppu::{LcdControl, LcdRegisters, LcdStatus, PpuMode, PpuState};
pub use state::{CpuSnapshot, MachineState, STATE_VERSION};
pub use timer::TimerState;
pub use video::FrameBuffer;
