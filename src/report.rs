/*!
    realtime status report

    the report is sent as one line `<State[:sub]|Ov:feed,rapid,spindle>\n`. It runs on the same path as motion critical code, so it is written byte by byte into a [Sink] without any formatting machinery or allocation.
*/

use crate::machine::{Snapshot, State};


/// destination of report bytes
pub trait Sink {
    fn put(&mut self, byte: u8);

    fn put_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.put(byte);
        }
    }
}
/// bytes that do not fit are dropped
impl<const N: usize> Sink for heapless::Vec<u8, N> {
    fn put(&mut self, byte: u8) {
        let _ = self.push(byte);
    }
}

/// print an unsigned byte in base 10, without leading zeros
pub fn print_u8(sink: &mut impl Sink, mut n: u8) {
    let mut units = 0;
    let mut tens = 0;
    if n >= 100 {
        units = b'0' + n % 10;
        n /= 10;
    }
    if n >= 10 {
        tens = b'0' + n % 10;
        n /= 10;
    }
    sink.put(b'0' + n);
    if tens != 0  {sink.put(tens)}
    if units != 0  {sink.put(units)}
}

/// print the status line of the given machine snapshot
pub fn realtime_status(sink: &mut impl Sink, snapshot: &Snapshot) {
    let suspend = snapshot.suspend;

    sink.put(b'<');
    match snapshot.state {
        State::Idle => sink.put_str("Idle"),
        State::Cycle => sink.put_str("Run"),
        // a hold caused by a jog cancel is still shown as jogging
        State::Hold if suspend.jog_cancel() => sink.put_str("Jog"),
        State::Hold => {
            sink.put_str("Hold:");
            sink.put(if suspend.hold_complete()  {b'0'} else {b'1'});
        },
        State::Jog => sink.put_str("Jog"),
        State::Homing => sink.put_str("Home"),
        State::Alarm => sink.put_str("Alarm"),
        State::CheckMode => sink.put_str("Check"),
        State::SafetyDoor => {
            sink.put_str("Door:");
            sink.put(
                if suspend.initiate_restore()  {b'3'}
                else if !suspend.retract_complete()  {b'2'}
                else if suspend.safety_door_ajar()  {b'1'}
                else  {b'0'}
                );
        },
        State::Sleep => sink.put_str("Sleep"),
        State::Unknown => {},
    }

    sink.put_str("|Ov:");
    print_u8(sink, snapshot.overrides.feed);
    sink.put(b',');
    print_u8(sink, snapshot.overrides.rapid);
    sink.put(b',');
    print_u8(sink, snapshot.overrides.spindle);

    sink.put(b'>');
    sink.put(b'\n');
}
