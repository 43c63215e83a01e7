/// The eight DMG buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Whether the button sits on the d-pad line (P1 bit 4) rather than
    /// the action line (P1 bit 5).
    #[inline]
    fn is_dpad(self) -> bool {
        matches!(self, Button::Right | Button::Left | Button::Up | Button::Down)
    }

    /// Bit within its group's low nibble.
    #[inline]
    fn bit(self) -> u8 {
        match self {
            Button::Right | Button::A => 0,
            Button::Left | Button::B => 1,
            Button::Up | Button::Select => 2,
            Button::Down | Button::Start => 3,
        }
    }
}

/// P1 (0xFF00). Bits 5 (buttons) and 4 (d-pad) select a group when 0;
/// a pressed button in a selected group reads as 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Joypad {
    select: u8,
    /// Pressed masks, bit=1 means held.
    buttons: u8,
    dpad: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            buttons: 0,
            dpad: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad & 0x0F;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons & 0x0F;
        }
        0xC0 | self.select | low
    }

    /// Only the select bits are writable.
    #[inline]
    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// Update one button. Returns `true` when the change pulls a selected
    /// line low, which is when the joypad interrupt fires.
    pub(crate) fn set_button(&mut self, button: Button, pressed: bool) -> bool {
        let before = self.read() & 0x0F;
        let mask = 1u8 << button.bit();
        let group = if button.is_dpad() {
            &mut self.dpad
        } else {
            &mut self.buttons
        };
        if pressed {
            *group |= mask;
        } else {
            *group &= !mask;
        }
        let after = self.read() & 0x0F;
        before & !after != 0
    }

    pub(crate) fn state(&self) -> [u8; 3] {
        [self.select, self.buttons, self.dpad]
    }

    pub(crate) fn set_state(&mut self, state: [u8; 3]) {
        self.select = state[0] & 0x30;
        self.buttons = state[1] & 0x0F;
        self.dpad = state[2] & 0x0F;
    }
}
