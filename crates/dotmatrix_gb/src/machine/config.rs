use typed_builder::TypedBuilder;

use super::cartridge::RtcClock;

/// When the CPU loses access to VRAM during rendering.
///
/// Hardware locks VRAM for the whole of mode 3. Some software written
/// against lenient emulators expects it to stay open, so the lock is a
/// switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VramAccess {
    /// Reads return 0xFF and writes are dropped while the PPU is drawing.
    #[default]
    Blocked,
    /// VRAM is always accessible.
    Open,
}

#[derive(TypedBuilder)]
pub struct MachineConfig {
    #[builder(default)]
    pub vram_access: VramAccess,
    /// Fill WRAM/HRAM with a fixed xorshift pattern at power-on instead of
    /// zeros.
    #[builder(default = true)]
    pub seed_internal_ram: bool,
    /// Time source for MBC3 RTC cartridges. `None` uses the host clock.
    #[builder(default, setter(strip_option))]
    pub rtc_clock: Option<Box<dyn RtcClock>>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
