use uarthmi::{
    Hmi, Config, MachineStatus,
    machine::{Machine, Snapshot, State, Suspend, Overrides},
    report::{self, Sink},
    };


type Line = heapless::Vec<u8, 64>;

fn status(state: State, suspend: u8, overrides: (u8, u8, u8)) -> String {
    let snapshot = Snapshot {
        state,
        suspend: Suspend::from(suspend),
        overrides: Overrides {feed: overrides.0, rapid: overrides.1, spindle: overrides.2},
        };
    let mut line = Line::new();
    report::realtime_status(&mut line, &snapshot);
    String::from_utf8(line.to_vec()).unwrap()
}

fn number(n: u8) -> String {
    let mut line = Line::new();
    report::print_u8(&mut line, n);
    String::from_utf8(line.to_vec()).unwrap()
}

#[test]
fn numbers_without_padding() {
    assert_eq!(number(0), "0");
    assert_eq!(number(7), "7");
    assert_eq!(number(10), "10");
    assert_eq!(number(42), "42");
    assert_eq!(number(100), "100");
    assert_eq!(number(105), "105");
    assert_eq!(number(255), "255");
    for n in 0 ..= u8::MAX {
        assert_eq!(number(n), n.to_string());
    }
}

#[test]
fn simple_states() {
    assert_eq!(status(State::Idle, 0, (0, 0, 0)), "<Idle|Ov:0,0,0>\n");
    assert_eq!(status(State::Cycle, 0, (100, 100, 100)), "<Run|Ov:100,100,100>\n");
    assert_eq!(status(State::Jog, 0, (10, 25, 200)), "<Jog|Ov:10,25,200>\n");
    assert_eq!(status(State::Homing, 0, (100, 100, 100)), "<Home|Ov:100,100,100>\n");
    assert_eq!(status(State::Alarm, 0, (100, 100, 100)), "<Alarm|Ov:100,100,100>\n");
    assert_eq!(status(State::CheckMode, 0, (100, 100, 100)), "<Check|Ov:100,100,100>\n");
    assert_eq!(status(State::Sleep, 0, (100, 100, 100)), "<Sleep|Ov:100,100,100>\n");
    assert_eq!(status(State::Unknown, 0, (1, 2, 3)), "<|Ov:1,2,3>\n");
}

#[test]
fn hold_substates() {
    // actively holding
    assert_eq!(status(State::Hold, 0, (100, 50, 0)), "<Hold:1|Ov:100,50,0>\n");
    // hold complete
    assert_eq!(status(State::Hold, 0b0000_0001, (100, 50, 0)), "<Hold:0|Ov:100,50,0>\n");
    // hold caused by a jog cancel
    assert_eq!(status(State::Hold, 0b1000_0001, (100, 50, 0)), "<Jog|Ov:100,50,0>\n");
}

#[test]
fn door_substates() {
    let retract_complete = 0b0000_0100;
    let initiate_restore = 0b0000_1000;
    let ajar = 0b0010_0000;
    assert_eq!(status(State::SafetyDoor, retract_complete, (100, 100, 100)), "<Door:0|Ov:100,100,100>\n");
    assert_eq!(status(State::SafetyDoor, retract_complete | ajar, (100, 100, 100)), "<Door:1|Ov:100,100,100>\n");
    assert_eq!(status(State::SafetyDoor, ajar, (100, 100, 100)), "<Door:2|Ov:100,100,100>\n");
    assert_eq!(status(State::SafetyDoor, initiate_restore | retract_complete, (100, 100, 100)), "<Door:3|Ov:100,100,100>\n");
}

#[test]
fn report_through_transmit_path() {
    let machine = MachineStatus::new();
    machine.set_state(State::Hold);
    machine.set_overrides(Overrides {feed: 100, rapid: 50, spindle: 0});
    let hmi = Hmi::<_, 64, 64>::new(Config::DEFAULT, &machine);
    let (mut host, _rx, mut tx) = hmi.split().unwrap();

    host.report();
    assert!(tx.is_armed());
    let mut wire = Vec::new();
    while tx.transmit_ready(|byte| wire.push(byte)) {}
    assert_eq!(wire, b"<Hold:1|Ov:100,50,0>\n");

    let mut line = Line::new();
    line.put_str("default ");
    report::realtime_status(&mut line, &MachineStatus::new().snapshot());
    assert_eq!(&line[..], b"default <Idle|Ov:100,100,100>\n");
}
