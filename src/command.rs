/*!
    realtime command bytes

    these bytes are picked off the incoming stream before buffering and act immediately. The four always-on commands are printable ASCII, all others are in the extended range above `0x7F`, which never carries normal data.
*/

pub const RESET: u8 = 0x18;
pub const STATUS_REPORT: u8 = b'?';
pub const CYCLE_START: u8 = b'~';
pub const FEED_HOLD: u8 = b'!';

pub const SAFETY_DOOR: u8 = 0x84;
pub const JOG_CANCEL: u8 = 0x85;
pub const DEBUG_REPORT: u8 = 0x86;

pub const FEED_OVR_RESET: u8 = 0x90;
pub const FEED_OVR_COARSE_PLUS: u8 = 0x91;
pub const FEED_OVR_COARSE_MINUS: u8 = 0x92;
pub const FEED_OVR_FINE_PLUS: u8 = 0x93;
pub const FEED_OVR_FINE_MINUS: u8 = 0x94;
pub const RAPID_OVR_RESET: u8 = 0x95;
pub const RAPID_OVR_MEDIUM: u8 = 0x96;
pub const RAPID_OVR_LOW: u8 = 0x97;

pub const SPINDLE_OVR_RESET: u8 = 0x99;
pub const SPINDLE_OVR_COARSE_PLUS: u8 = 0x9A;
pub const SPINDLE_OVR_COARSE_MINUS: u8 = 0x9B;
pub const SPINDLE_OVR_FINE_PLUS: u8 = 0x9C;
pub const SPINDLE_OVR_FINE_MINUS: u8 = 0x9D;
pub const SPINDLE_OVR_STOP: u8 = 0x9E;

pub const COOLANT_FLOOD_OVR_TOGGLE: u8 = 0xA0;
pub const COOLANT_MIST_OVR_TOGGLE: u8 = 0xA1;

/// first byte value of the extended range
pub const EXTENDED: u8 = 0x80;


/// decoded realtime command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reset,
    StatusReport,
    CycleStart,
    FeedHold,
    SafetyDoor,
    /// only honored while jogging
    JogCancel,
    DebugReport,
    /// request for the motion override mask, see [crate::flags::motion]
    Motion(u8),
    /// request for the accessory override mask, see [crate::flags::accessory]
    Accessory(u8),
}

/// how the receive interrupt must handle one incoming byte
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Incoming {
    /// realtime command, not buffered
    Command(Command),
    /// unknown extended byte, thrown away
    Discard,
    /// normal data for the receive buffer
    Data(u8),
}

impl Incoming {
    pub fn classify(byte: u8) -> Self {
        use crate::flags::{motion, accessory};

        let command = match byte {
            RESET => Command::Reset,
            STATUS_REPORT => Command::StatusReport,
            CYCLE_START => Command::CycleStart,
            FEED_HOLD => Command::FeedHold,
            byte if byte < EXTENDED => return Self::Data(byte),

            SAFETY_DOOR => Command::SafetyDoor,
            JOG_CANCEL => Command::JogCancel,
            DEBUG_REPORT if cfg!(feature = "debug-report") => Command::DebugReport,

            FEED_OVR_RESET => Command::Motion(motion::FEED_RESET),
            FEED_OVR_COARSE_PLUS => Command::Motion(motion::FEED_COARSE_PLUS),
            FEED_OVR_COARSE_MINUS => Command::Motion(motion::FEED_COARSE_MINUS),
            FEED_OVR_FINE_PLUS => Command::Motion(motion::FEED_FINE_PLUS),
            FEED_OVR_FINE_MINUS => Command::Motion(motion::FEED_FINE_MINUS),
            RAPID_OVR_RESET => Command::Motion(motion::RAPID_RESET),
            RAPID_OVR_MEDIUM => Command::Motion(motion::RAPID_MEDIUM),
            RAPID_OVR_LOW => Command::Motion(motion::RAPID_LOW),

            SPINDLE_OVR_RESET => Command::Accessory(accessory::SPINDLE_RESET),
            SPINDLE_OVR_COARSE_PLUS => Command::Accessory(accessory::SPINDLE_COARSE_PLUS),
            SPINDLE_OVR_COARSE_MINUS => Command::Accessory(accessory::SPINDLE_COARSE_MINUS),
            SPINDLE_OVR_FINE_PLUS => Command::Accessory(accessory::SPINDLE_FINE_PLUS),
            SPINDLE_OVR_FINE_MINUS => Command::Accessory(accessory::SPINDLE_FINE_MINUS),
            SPINDLE_OVR_STOP => Command::Accessory(accessory::SPINDLE_STOP),
            COOLANT_FLOOD_OVR_TOGGLE => Command::Accessory(accessory::FLOOD_TOGGLE),
            COOLANT_MIST_OVR_TOGGLE => Command::Accessory(accessory::MIST_TOGGLE),

            _ => return Self::Discard,
        };
        Self::Command(command)
    }
}
