//! MBC3 real-time clock.
//!
//! The clock never reads the host time itself. The mapper passes in "now"
//! from an [`RtcClock`], so tests can drive it with a [`FixedClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const DAY_HIGH_BIT: u8 = 0x01;
const HALT: u8 = 0x40;
const CARRY: u8 = 0x80;

/// Source of wall-clock seconds for the RTC.
pub trait RtcClock {
    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Host wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl RtcClock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock. Clones share the same time, so a test can keep
/// one handle and give the other to the machine.
#[derive(Clone, Debug, Default)]
pub struct FixedClock {
    secs: Arc<AtomicU64>,
}

impl FixedClock {
    pub fn new(secs: u64) -> Self {
        Self {
            secs: Arc::new(AtomicU64::new(secs)),
        }
    }

    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::Relaxed);
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::Relaxed);
    }
}

impl RtcClock for FixedClock {
    fn now_secs(&self) -> u64 {
        self.secs.load(Ordering::Relaxed)
    }
}

/// The five RTC registers, in select order 0x08..=0x0C.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_low: u8,
    /// Bit 0: day counter bit 8, bit 6: halt, bit 7: day carry.
    pub day_high: u8,
}

impl RtcRegisters {
    #[inline]
    fn day(&self) -> u16 {
        ((self.day_high & DAY_HIGH_BIT) as u16) << 8 | self.day_low as u16
    }

    #[inline]
    fn set_day(&mut self, day: u16) {
        self.day_low = day as u8;
        self.day_high = (self.day_high & !DAY_HIGH_BIT) | ((day >> 8) as u8 & DAY_HIGH_BIT);
    }

    fn read(&self, select: u8) -> u8 {
        match select {
            0x08 => self.seconds,
            0x09 => self.minutes,
            0x0A => self.hours,
            0x0B => self.day_low,
            0x0C => self.day_high,
            _ => 0xFF,
        }
    }

    /// Fold `elapsed` seconds into the counters, carrying upward.
    fn advance(&mut self, elapsed: u64) {
        if elapsed == 0 {
            return;
        }
        let total = self.seconds as u64 + elapsed;
        self.seconds = (total % 60) as u8;
        let total = self.minutes as u64 + total / 60;
        self.minutes = (total % 60) as u8;
        let total = self.hours as u64 + total / 60;
        self.hours = (total % 24) as u8;
        let days = self.day() as u64 + total / 24;
        if days > 511 {
            self.day_high |= CARRY;
        }
        self.set_day((days % 512) as u16);
    }
}

/// Snapshot of the clock, including the wall-clock anchor it counts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RtcState {
    pub live: RtcRegisters,
    pub latched: RtcRegisters,
    /// Unix seconds at which `live` was last brought up to date.
    pub anchor_secs: u64,
    pub latch_armed: bool,
}

pub(super) struct Rtc {
    live: RtcRegisters,
    latched: RtcRegisters,
    anchor_secs: u64,
    latch_armed: bool,
}

impl Rtc {
    pub(super) fn new(now: u64) -> Self {
        Self {
            live: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            anchor_secs: now,
            latch_armed: false,
        }
    }

    /// Bring the live counters up to `now`. A halted clock only moves
    /// its anchor.
    fn sync(&mut self, now: u64) {
        let elapsed = now.saturating_sub(self.anchor_secs);
        self.anchor_secs = now;
        if self.live.day_high & HALT == 0 {
            self.live.advance(elapsed);
        }
    }

    /// 0x6000-0x7FFF write: a 0 followed by a 1 copies the live counters
    /// into the latched set.
    pub(super) fn write_latch(&mut self, value: u8, now: u64) {
        if self.latch_armed && value == 0x01 {
            self.sync(now);
            self.latched = self.live;
            log::trace!("GB RTC: latched {:?}", self.latched);
        }
        self.latch_armed = value == 0x00;
    }

    pub(super) fn read(&self, select: u8) -> u8 {
        self.latched.read(select)
    }

    pub(super) fn write(&mut self, select: u8, value: u8, now: u64) {
        self.sync(now);
        let regs = &mut self.live;
        match select {
            0x08 => regs.seconds = value % 60,
            0x09 => regs.minutes = value % 60,
            0x0A => regs.hours = value % 24,
            0x0B => regs.day_low = value,
            0x0C => regs.day_high = value & (DAY_HIGH_BIT | HALT | CARRY),
            _ => return,
        }
        self.latched = self.live;
    }

    pub(super) fn state(&self) -> RtcState {
        RtcState {
            live: self.live,
            latched: self.latched,
            anchor_secs: self.anchor_secs,
            latch_armed: self.latch_armed,
        }
    }

    pub(super) fn set_state(&mut self, state: &RtcState) {
        self.live = state.live;
        self.latched = state.latched;
        self.anchor_secs = state.anchor_secs;
        self.latch_armed = state.latch_armed;
    }
}
