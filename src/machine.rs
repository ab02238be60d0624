/*!
    interface to the motion controller state machine

    the HMI never changes machine state itself, it only reads it for status reports and for gating some realtime commands, and calls [Machine::reset] when the reset byte arrives.
*/

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering::*};
use bilge::prelude::*;
use log::*;


/// top level machine state, values are the controller's bit codes
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, Debug, PartialEq)]
pub enum State {
    Idle = 0,
    #[fallback]
    Unknown = 255,

    Alarm = 1,
    CheckMode = 2,
    Homing = 4,
    Cycle = 8,
    Hold = 16,
    Jog = 32,
    SafetyDoor = 64,
    Sleep = 128,
}

/// sub-state details of the suspended states (hold, safety door, jog cancel)
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct Suspend {
    /// hold finished decelerating, ready to resume
    pub hold_complete: bool,
    pub restart_retract: bool,
    pub retract_complete: bool,
    pub initiate_restore: bool,
    pub restore_complete: bool,
    pub safety_door_ajar: bool,
    pub motion_cancel: bool,
    /// the hold is the deceleration of a cancelled jog
    pub jog_cancel: bool,
}

/// override percentages
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Overrides {
    pub feed: u8,
    pub rapid: u8,
    pub spindle: u8,
}
impl Default for Overrides {
    fn default() -> Self {
        Self {feed: 100, rapid: 100, spindle: 100}
    }
}

/// copy of the machine state at one instant, used for a status report
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub state: State,
    pub suspend: Suspend,
    pub overrides: Overrides,
}


/// what the HMI needs from the motion controller
pub trait Machine {
    fn state(&self) -> State;
    fn suspend(&self) -> Suspend;
    fn overrides(&self) -> Overrides;
    /**
        motion control reset entry point

        called directly from the receive interrupt, it must not block
    */
    fn reset(&self);

    /// copy all fields read by status reports
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            suspend: self.suspend(),
            overrides: self.overrides(),
        }
    }
}
impl<M: Machine> Machine for &M {
    fn state(&self) -> State {(*self).state()}
    fn suspend(&self) -> Suspend {(*self).suspend()}
    fn overrides(&self) -> Overrides {(*self).overrides()}
    fn reset(&self) {(*self).reset()}
}


/**
    machine state published through atomics

    the controller writes it from its own loop, the HMI reads it from any context. A reset only raises a pending flag that the controller collects with [Self::take_reset].
*/
pub struct MachineStatus {
    state: AtomicU8,
    suspend: AtomicU8,
    feed: AtomicU8,
    rapid: AtomicU8,
    spindle: AtomicU8,
    reset: AtomicBool,
}
impl MachineStatus {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(0),
            suspend: AtomicU8::new(0),
            feed: AtomicU8::new(100),
            rapid: AtomicU8::new(100),
            spindle: AtomicU8::new(100),
            reset: AtomicBool::new(false),
        }
    }
    pub fn set_state(&self, state: State) {
        self.state.store(u8::from(state), Release);
    }
    pub fn set_suspend(&self, suspend: Suspend) {
        self.suspend.store(u8::from(suspend), Release);
    }
    pub fn set_overrides(&self, overrides: Overrides) {
        self.feed.store(overrides.feed, Release);
        self.rapid.store(overrides.rapid, Release);
        self.spindle.store(overrides.spindle, Release);
    }
    /// true if a reset was requested since last call
    pub fn take_reset(&self) -> bool {
        self.reset.swap(false, AcqRel)
    }
}
impl Default for MachineStatus {
    fn default() -> Self {
        Self::new()
    }
}
impl Machine for MachineStatus {
    fn state(&self) -> State {
        State::from(self.state.load(Acquire))
    }
    fn suspend(&self) -> Suspend {
        Suspend::from(self.suspend.load(Acquire))
    }
    fn overrides(&self) -> Overrides {
        Overrides {
            feed: self.feed.load(Acquire),
            rapid: self.rapid.load(Acquire),
            spindle: self.spindle.load(Acquire),
        }
    }
    fn reset(&self) {
        debug!("machine reset requested");
        self.reset.store(true, Release);
    }
}
