use super::super::ppu::LcdRegisters;
use super::SystemBus;

/// Sound register values left by the boot ROM, FF10..FF26.
const SOUND_DEFAULTS: [(u16, u8); 21] = [
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF13, 0xFF),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF17, 0x00),
    (0xFF18, 0xFF),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1D, 0xFF),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF21, 0x00),
    (0xFF22, 0x00),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
];

impl SystemBus {
    /// I/O registers and RAM as the DMG boot ROM leaves them at PC=0x0100.
    pub(super) fn apply_dmg_initial_state(&mut self, seed_internal_ram: bool) {
        if seed_internal_ram {
            self.randomize_internal_ram();
        }

        // P1 reads 0xCF: both groups selected, nothing pressed.
        self.joypad.write(0x00);
        self.serial.power_on();
        self.timer.power_on();

        // IF has VBlank requested at hand-over.
        self.interrupts.write_if(0x01);
        self.interrupts.write_ie(0x00);

        for (addr, value) in SOUND_DEFAULTS {
            self.io[(addr - 0xFF00) as usize] = value;
        }

        self.lcd = LcdRegisters::power_on();
    }

    /// Fill WRAM and HRAM with a fixed-seed xorshift32 stream. Power-on
    /// RAM is garbage on hardware; a fixed seed keeps runs reproducible.
    fn randomize_internal_ram(&mut self) {
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        for byte in self.wram.iter_mut() {
            *byte = next_byte();
        }
        for byte in self.hram.iter_mut() {
            *byte = next_byte();
        }
    }
}
