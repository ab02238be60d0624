use uarthmi::flags::{StateFlags, ExecState, MotionOverride, AccessoryOverride, exec, motion, accessory};


#[test]
fn set_and_clear_bits() {
    let flags = StateFlags::<ExecState>::new();
    flags.set(exec::FEED_HOLD);
    flags.set(exec::STATUS_REPORT);
    assert_eq!(flags.bits(), exec::FEED_HOLD | exec::STATUS_REPORT);

    flags.clear(exec::FEED_HOLD);
    assert!(!flags.contains(exec::FEED_HOLD));
    assert!(flags.contains(exec::STATUS_REPORT));

    assert_eq!(flags.take(exec::STATUS_REPORT | exec::RESET), exec::STATUS_REPORT);
    assert_eq!(flags.bits(), 0);
}

#[test]
fn decoded_views_match_masks() {
    let flags = StateFlags::<ExecState>::new();
    flags.set(exec::RESET | exec::MOTION_CANCEL);
    let state = flags.get();
    assert!(state.reset());
    assert!(state.motion_cancel());
    assert!(!state.feed_hold());
    assert!(!state.sleep());

    let view = MotionOverride::from(motion::RAPID_LOW | motion::FEED_FINE_MINUS);
    assert!(view.rapid_low());
    assert!(view.feed_fine_minus());
    assert!(!view.feed_reset());

    let view = AccessoryOverride::from(accessory::MIST_TOGGLE | accessory::SPINDLE_STOP);
    assert!(view.mist_toggle());
    assert!(view.spindle_stop());
    assert!(!view.flood_toggle());
}

#[test]
fn nested_critical_section() {
    let flags = StateFlags::<ExecState>::new();
    // clearing from within an already suppressed context must not deadlock nor lose bits
    critical_section::with(|_| {
        flags.set(exec::CYCLE_START | exec::SLEEP);
        flags.clear(exec::CYCLE_START);
    });
    assert_eq!(flags.bits(), exec::SLEEP);
}

#[test]
fn concurrent_bits_are_not_lost() {
    const ROUNDS: usize = 10_000;
    let flags = StateFlags::<ExecState>::new();

    std::thread::scope(|scope| {
        // one side toggles its own bit while the other keeps raising another one
        scope.spawn(|| {
            for _ in 0 .. ROUNDS {
                flags.set(exec::CYCLE_STOP);
                flags.clear(exec::CYCLE_STOP);
            }
        });
        scope.spawn(|| {
            for _ in 0 .. ROUNDS {
                flags.set(exec::SAFETY_DOOR);
                assert!(flags.contains(exec::SAFETY_DOOR), "bit lost by concurrent update");
            }
        });
    });
    assert_eq!(flags.bits(), exec::SAFETY_DOOR);
}
