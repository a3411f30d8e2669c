//! Cruise button spoofing throttles

use bus_if::msg::{Buttons, CanFdPayload, CanPayload, Payload};
use ctrl_lib::car_ctrl::{
    sched::{CANFD_BUTTON_BATCH, CAN_RESUME_BATCH},
    CarCtrl, InputData, OutputData, Params, TuningSnapshot
};
use util::module::State;

fn buttons(out: &OutputData) -> Vec<Buttons> {
    out.can_sends.iter().filter_map(|c| match &c.payload {
        Payload::Can(CanPayload::Clu11 { button, .. }) => Some(*button),
        Payload::CanFd(CanFdPayload::Buttons { button, .. }) => Some(*button),
        _ => None
    }).collect()
}

fn resume_input() -> InputData {
    let mut input = InputData::default();
    input.cc.cruise_control.resume = true;
    input
}

#[test]
fn test_legacy_resume_throttle() {
    let mut ctrl = CarCtrl::new(Params::default(), TuningSnapshot::default()).unwrap();
    let input = resume_input();

    let mut batches = Vec::new();
    for frame in 0..40u64 {
        let (out, _) = ctrl.proc(&input).unwrap();
        let b = buttons(&out);

        if !b.is_empty() {
            assert_eq!(b.len(), CAN_RESUME_BATCH);
            assert!(b.iter().all(|b| *b == Buttons::ResAccel));
            batches.push(frame);
        }

        // Every batch moves the latch
        match frame {
            0..=14 => assert_eq!(ctrl.scheduler().last_button_frame(), Some(0)),
            15..=29 => assert_eq!(ctrl.scheduler().last_button_frame(), Some(15)),
            _ => ()
        }
    }

    // At most one batch per 0.15 s, none between ticks 1 and 14
    assert!(batches.iter().all(|f| !(1..=14).contains(f)));
    assert_eq!(batches, vec![0, 15, 30]);
}

#[test]
fn test_legacy_no_buttons_with_long() {
    let mut p = Params::default();
    p.long_self_managed = true;
    let mut ctrl = CarCtrl::new(p, TuningSnapshot::default()).unwrap();

    let mut input = resume_input();
    input.cc.cruise_control.cancel = true;

    for _ in 0..50 {
        let (out, _) = ctrl.proc(&input).unwrap();
        assert!(buttons(&out).is_empty());
    }
}

#[test]
fn test_canfd_button_throttle() {
    let mut ctrl = CarCtrl::new(Params::canfd(), TuningSnapshot::default()).unwrap();
    let mut input = resume_input();

    let mut batches = Vec::new();
    for frame in 0..60u64 {
        // Switch to cancel half way
        input.cc.cruise_control.cancel = frame >= 30;

        let (out, _) = ctrl.proc(&input).unwrap();
        let b = buttons(&out);
        if !b.is_empty() {
            assert_eq!(b.len(), CANFD_BUTTON_BATCH);
            batches.push((frame, b[0]));
        }
    }

    assert_eq!(batches, vec![
        (0, Buttons::ResAccel),
        (26, Buttons::ResAccel),
        (52, Buttons::Cancel)
    ]);
}

#[test]
fn test_canfd_alt_buttons() {
    let mut p = Params::canfd();
    p.flags.alt_buttons = true;
    let mut ctrl = CarCtrl::new(p, TuningSnapshot::default()).unwrap();

    // No resume message on these platforms, the latch never moves
    let mut input = resume_input();
    for _ in 0..30 {
        let (out, _) = ctrl.proc(&input).unwrap();
        assert!(buttons(&out).is_empty());
    }
    assert_eq!(ctrl.scheduler().last_button_frame(), None);

    // A single cancel message
    input.cc.cruise_control.cancel = true;
    let (out, _) = ctrl.proc(&input).unwrap();
    let cancels = out.can_sends.iter().filter(|c| matches!(
        c.payload,
        Payload::CanFd(CanFdPayload::AccCancel { .. })
    )).count();
    assert_eq!(cancels, 1);
    assert_eq!(ctrl.scheduler().last_button_frame(), Some(30));

    let (out, _) = ctrl.proc(&input).unwrap();
    assert!(!out.can_sends.iter().any(|c| matches!(
        c.payload,
        Payload::CanFd(CanFdPayload::AccCancel { .. })
    )));
}
