use super::{Cpu, CpuState};

impl Cpu {
    /// Reset to the DMG post-boot register state.
    ///
    /// A=01 F=B0 B=00 C=13 D=00 E=D8 H=01 L=4D SP=FFFE PC=0100, IME off.
    pub fn reset(&mut self) {
        self.regs.a = 0x01;
        self.regs.set_f(0xB0);
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
        self.state = CpuState::default();
        self.clear_lockup();
    }
}
