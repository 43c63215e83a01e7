use super::Timer;

impl Timer {
    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => self.read_div(),
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.read_tac(),
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF04 => self.write_div(),
            0xFF05 => self.write_tima(value),
            0xFF06 => self.tma = value,
            0xFF07 => self.write_tac(value),
            _ => {}
        }
    }

    #[inline]
    pub(crate) fn read_div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    #[inline]
    fn read_tac(&self) -> u8 {
        self.tac | 0b1111_1000
    }

    /// DIV write: any value clears the whole system counter. If the
    /// selected bit was high this is a falling edge and TIMA increments.
    fn write_div(&mut self) {
        let before = self.signal();
        self.counter = 0;
        self.detect_edge(before);
    }

    /// TIMA write. Landing inside the overflow window cancels the pending
    /// reload and interrupt.
    fn write_tima(&mut self, value: u8) {
        if self.overflow_pending {
            log::trace!("GB timer: TIMA write cancelled pending reload");
            self.overflow_pending = false;
        }
        self.tima = value;
    }

    /// TAC write. Disabling the timer or moving the select to a low bit
    /// while the input is high produces an increment.
    fn write_tac(&mut self, value: u8) {
        let before = self.signal();
        self.tac = value & 0x07;
        self.detect_edge(before);
    }
}
