/*!
    realtime request flags shared between the receive interrupt and the main loop

    every mask is a plain byte. The bits are listed as `u8` constants for setting and clearing, and as a [bilge] bitfield for reading them back by name.
*/

use core::{
    marker::PhantomData,
    sync::atomic::AtomicU8,
    sync::atomic::Ordering::*,
    };
use bilge::prelude::*;


/**
    byte of request flags, safe to set and clear from both contexts

    the read-modify-write of [Self::set] and [Self::clear] happens inside a critical section, which saves the previous interrupt state and restores it afterwards, so it is fine to call them from an interrupt handler or while already inside a critical section.
*/
pub struct StateFlags<F> {
    mask: AtomicU8,
    view: PhantomData<fn() -> F>,
}
impl<F> StateFlags<F> {
    pub const fn new() -> Self {
        Self {
            mask: AtomicU8::new(0),
            view: PhantomData,
        }
    }
    /// raise the bits of `mask`, leaving others as they are
    pub fn set(&self, mask: u8) {
        critical_section::with(|_| {
            let current = self.mask.load(Relaxed);
            self.mask.store(current | mask, Relaxed);
        });
    }
    /// lower the bits of `mask`, leaving others as they are
    pub fn clear(&self, mask: u8) {
        critical_section::with(|_| {
            let current = self.mask.load(Relaxed);
            self.mask.store(current & !mask, Relaxed);
        });
    }
    /// lower the bits of `mask` and return those that were set
    pub fn take(&self, mask: u8) -> u8 {
        critical_section::with(|_| {
            let current = self.mask.load(Relaxed);
            self.mask.store(current & !mask, Relaxed);
            current & mask
        })
    }
    /// raw snapshot of all bits
    pub fn bits(&self) -> u8 {
        self.mask.load(Acquire)
    }
    /// true if any bit of `mask` is set
    pub fn contains(&self, mask: u8) -> bool {
        self.bits() & mask != 0
    }
}
impl<F: From<u8>> StateFlags<F> {
    /// snapshot of all bits, decoded
    pub fn get(&self) -> F {
        F::from(self.bits())
    }
}
impl<F> Default for StateFlags<F> {
    fn default() -> Self {
        Self::new()
    }
}


/// execution requests
pub mod exec {
    pub const STATUS_REPORT: u8 = 1 << 0;
    pub const CYCLE_START: u8 = 1 << 1;
    pub const CYCLE_STOP: u8 = 1 << 2;
    pub const FEED_HOLD: u8 = 1 << 3;
    /// also the abort signal polled by blocking writes
    pub const RESET: u8 = 1 << 4;
    pub const SAFETY_DOOR: u8 = 1 << 5;
    pub const MOTION_CANCEL: u8 = 1 << 6;
    pub const SLEEP: u8 = 1 << 7;
}
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct ExecState {
    pub status_report: bool,
    pub cycle_start: bool,
    pub cycle_stop: bool,
    pub feed_hold: bool,
    pub reset: bool,
    pub safety_door: bool,
    pub motion_cancel: bool,
    pub sleep: bool,
}

/// feed and rapid override requests
pub mod motion {
    pub const FEED_RESET: u8 = 1 << 0;
    pub const FEED_COARSE_PLUS: u8 = 1 << 1;
    pub const FEED_COARSE_MINUS: u8 = 1 << 2;
    pub const FEED_FINE_PLUS: u8 = 1 << 3;
    pub const FEED_FINE_MINUS: u8 = 1 << 4;
    pub const RAPID_RESET: u8 = 1 << 5;
    pub const RAPID_MEDIUM: u8 = 1 << 6;
    pub const RAPID_LOW: u8 = 1 << 7;
}
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct MotionOverride {
    pub feed_reset: bool,
    pub feed_coarse_plus: bool,
    pub feed_coarse_minus: bool,
    pub feed_fine_plus: bool,
    pub feed_fine_minus: bool,
    pub rapid_reset: bool,
    pub rapid_medium: bool,
    pub rapid_low: bool,
}

/// spindle and coolant override requests
pub mod accessory {
    pub const SPINDLE_RESET: u8 = 1 << 0;
    pub const SPINDLE_COARSE_PLUS: u8 = 1 << 1;
    pub const SPINDLE_COARSE_MINUS: u8 = 1 << 2;
    pub const SPINDLE_FINE_PLUS: u8 = 1 << 3;
    pub const SPINDLE_FINE_MINUS: u8 = 1 << 4;
    pub const SPINDLE_STOP: u8 = 1 << 5;
    pub const FLOOD_TOGGLE: u8 = 1 << 6;
    pub const MIST_TOGGLE: u8 = 1 << 7;
}
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct AccessoryOverride {
    pub spindle_reset: bool,
    pub spindle_coarse_plus: bool,
    pub spindle_coarse_minus: bool,
    pub spindle_fine_plus: bool,
    pub spindle_fine_minus: bool,
    pub spindle_stop: bool,
    pub flood_toggle: bool,
    pub mist_toggle: bool,
}

/// debugging requests
#[cfg(feature = "debug-report")]
pub mod debug {
    pub const REPORT: u8 = 1 << 0;
}
