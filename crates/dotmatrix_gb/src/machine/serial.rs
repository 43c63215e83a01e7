/// Serial port reduced to SB/SC.
///
/// No link partner is modelled. A transfer started on SC with the
/// internal clock (bits 7 and 0 set) completes at once: SB is appended to
/// `output`, the start bit clears and the caller raises the serial
/// interrupt. Test ROMs print their results this way.
#[derive(Clone, Debug, Default)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(super) fn power_on(&mut self) {
        self.sb = 0x00;
        self.sc = 0x7E;
    }

    #[inline]
    pub(super) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    /// Returns `true` when the write completed a transfer.
    pub(super) fn write_sc(&mut self, value: u8) -> bool {
        self.sc = value;
        if self.sc & 0x81 != 0x81 {
            return false;
        }
        self.output.push(self.sb);
        self.sc &= !0x80;
        true
    }

    pub(super) fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Unused SC bits read as 1.
    #[inline]
    pub(super) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }
}
