pub mod cpu;
pub mod interrupts;
pub mod machine;

pub use machine::{Button, GameBoy, MachineConfig, MachineState, VramAccess};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
