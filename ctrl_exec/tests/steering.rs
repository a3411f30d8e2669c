//! Steering command bounds through the whole controller

use ctrl_lib::{
    car_ctrl::{
        angle_limits::{get_max_angle_delta, MIN_LIMIT_SPEED_MS},
        CarCtrl, InputData, Params, TuningSnapshot, CONTROL_FREQUENCY_HZ
    },
    veh_model::VehicleModel
};
use util::module::State;

/// Deterministic sequence of inputs sweeping speed and angle requests.
fn sweep_input(i: u64) -> InputData {
    let mut input = InputData::default();
    let t = i as f64 * 0.01;

    input.cc.enabled = true;
    input.cc.lat_active = i % 400 < 350;
    input.cs.v_ego_raw_ms = 15.0 + 15.0 * (0.1 * t).sin();
    input.cs.steering_angle_deg = 30.0 * (0.3 * t).cos();
    input.cs.steering_pressed = i % 500 > 470;
    input.cc.actuators.steering_angle_deg = 250.0 * (1.3 * t).sin() + 40.0 * (7.0 * t).sin();
    input.cc.actuators.torque = (0.7 * t).sin();

    input
}

#[test]
fn test_angle_bounds_and_rate_law() {
    let params = Params::canfd_angle();
    let steer_angle_max = params.angle.steer_angle_max_deg;
    let hard_cap = params.angle.max_angle_rate_deg;
    let vm = VehicleModel::new(params.veh_model.clone());

    let mut ctrl = CarCtrl::new(params, TuningSnapshot::default()).unwrap();
    let t = ctrl.tuning().clone();
    let mut last: Option<f64> = None;

    for i in 0..3000 {
        let input = sweep_input(i);
        let (out, _) = ctrl.proc(&input).unwrap();
        let angle = out.actuators.steering_angle_deg;
        let gain = out.actuators.torque_output_can;

        assert!(angle.abs() <= steer_angle_max, "angle {} at tick {}", angle, i);

        if input.cc.lat_active {
            assert!(gain >= t.min_gain && gain <= t.max_gain, "gain {} at tick {}", gain, i);

            if let Some(l) = last {
                let v = input.cs.v_ego_raw_ms.max(MIN_LIMIT_SPEED_MS);
                let cap = get_max_angle_delta(v, &vm, CONTROL_FREQUENCY_HZ).min(hard_cap);
                assert!(
                    (angle - l).abs() <= cap + 1e-9,
                    "step {} above {} at tick {}", (angle - l).abs(), cap, i
                );
            }
            last = Some(angle);
        }
        else {
            assert_eq!(gain, 0.0);
            last = None;
        }
    }
}

#[test]
fn test_inactive_idempotence() {
    let mut ctrl = CarCtrl::new(Params::canfd_angle(), TuningSnapshot::default()).unwrap();

    let mut input = InputData::default();
    input.cs.v_ego_raw_ms = 12.0;
    input.cs.steering_angle_deg = -23.4;
    input.cc.actuators.steering_angle_deg = 40.0;

    for _ in 0..2 {
        let (out, _) = ctrl.proc(&input).unwrap();
        assert_eq!(out.actuators.steering_angle_deg, -23.4);
        assert_eq!(out.actuators.torque, 0.0);
    }
    assert_eq!(ctrl.state().apply_angle_last_deg, -23.4);
    assert_eq!(ctrl.state().apply_torque_last, 0.0);
}

#[test]
fn test_end_to_end_determinism() {
    let run = || {
        let mut ctrl = CarCtrl::new(Params::canfd_angle(), TuningSnapshot::default()).unwrap();

        let mut input = InputData::default();
        input.cc.enabled = true;
        input.cc.lat_active = true;
        input.cs.v_ego_raw_ms = 20.0;
        input.cc.actuators.steering_angle_deg = 10.0;

        let (out, _) = ctrl.proc(&input).unwrap();
        out
    };

    let a = run();
    let b = run();

    let angle = a.actuators.steering_angle_deg;
    assert!(angle > 0.0 && angle < 10.0, "angle {}", angle);
    assert_eq!(a.actuators, b.actuators);
    assert_eq!(a.can_sends, b.can_sends);
}

#[test]
fn test_torque_bounds() {
    let params = Params::default();
    let steer_max = params.steer.steer_max;
    let delta_up = params.steer.delta_up;
    let delta_down = params.steer.delta_down;
    let mut ctrl = CarCtrl::new(params, TuningSnapshot::default()).unwrap();
    let mut last = 0.0f64;

    for i in 0..3000 {
        let mut input = sweep_input(i);
        input.cc.actuators.torque *= 1.5;
        input.cs.steering_torque = match input.cs.steering_pressed {
            true => -300.0,
            false => 0.0
        };

        let (out, _) = ctrl.proc(&input).unwrap();
        let torque = out.actuators.torque_output_can;

        assert!(torque.abs() <= steer_max, "torque {} at tick {}", torque, i);
        assert_eq!(torque, torque.round());
        assert!((out.actuators.torque - torque / steer_max).abs() < 1e-12);

        if input.cc.lat_active {
            // Never grows faster than delta_up, never shrinks faster than
            // delta_down
            if torque.abs() > last.abs() && torque.signum() == last.signum() {
                assert!(torque.abs() - last.abs() <= delta_up, "tick {}", i);
            }
            assert!((torque - last).abs() <= delta_down.max(delta_up), "tick {}", i);
            last = torque;
        }
        else {
            assert_eq!(torque, 0.0);
            last = 0.0;
        }
    }
}
