//! Implementations for the CarCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use bus_if::{
    bus::BusProtocol,
    car::{ActuatorsOut, CarControl, LongControlState, VehicleState},
    msg::OutboundCommand
};
use util::{maths::clamp, module::State, params};
use crate::veh_model::VehicleModel;
use super::{
    angle_limits::{apply_steer_angle_limits, AngleLimitInput},
    fault_avoidance::{FaultAvoidance, MAX_ANGLE_DEG},
    sched::{Scheduler, TickCommand},
    sub_ctrl::{AdasDrvInterceptor, Escc, LaneAssist, LongTuning},
    torque_gain::calc_torque_reduction_gain,
    torque_limits::apply_driver_steer_torque_limits,
    tuning::{TuningSnapshot, TuningSource},
    CarCtrlError, ControlMode, Params,
    MS_TO_KPH, MS_TO_MPH
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Car control module state
pub struct CarCtrl {
    params: Params,
    tuning: TuningSnapshot,
    mode: ControlMode,

    /// Reference model for the angle limits.
    veh_model: VehicleModel,

    state: ControllerState,

    escc: Escc,
    interceptor: AdasDrvInterceptor,
    lane_assist: LaneAssist,
    long_tuning: LongTuning,

    sched: Scheduler,

    steer_req_cut_last: bool,
    initialised: bool
}

/// State carried from one tick to the next.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ControllerState {
    /// Number of ticks processed this session.
    pub frame: u64,

    /// Torque sent on the previous tick. On angle steering platforms this is
    /// the torque reduction gain.
    pub apply_torque_last: f64,

    /// Angle sent on the previous tick.
    ///
    /// Units: degrees
    pub apply_angle_last_deg: f64,

    /// Ticks spent actuating above the EPS angle limit.
    pub angle_limit_frames: u32,

    #[serde(skip)]
    fault_avoidance: FaultAvoidance
}

/// Data required to initialise CarCtrl.
pub struct InitData {
    /// Parameter file path, relative to the params directory.
    pub params_path: &'static str,

    /// Tuning overrides, if any.
    pub tuning: Option<Box<dyn TuningSource>>
}

/// Input data to CarCtrl.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Vehicle state sampled before the tick.
    pub cs: VehicleState,

    /// Planner requests for the tick.
    pub cc: CarControl
}

/// Output of CarCtrl for one tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputData {
    /// What was actually commanded.
    pub actuators: ActuatorsOut,

    /// Messages to transmit, in order.
    pub can_sends: Vec<OutboundCommand>
}

/// Status report for CarCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// The steering request was cut to avoid an EPS fault.
    pub steer_req_cut: bool,

    /// The driver is overriding the steering.
    pub driver_override: bool,

    /// The torque (torque steering) or angle (angle steering) command was
    /// limited.
    pub steer_limited: bool,

    /// The acceleration command was clamped.
    pub accel_limited: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CarCtrl {
    /// Build a controller from loaded parameters and a tuning snapshot.
    pub fn new(params: Params, tuning: TuningSnapshot) -> Result<Self, CarCtrlError> {
        params.validate().map_err(CarCtrlError::InvalidParams)?;
        tuning.validate()?;

        let mode = params.control_mode();

        info!("CarCtrl initialised");
        info!("    Protocol: {:?}, mode: {:?}", params.protocol, mode);
        info!("    Long self managed: {}", params.long_self_managed);
        info!(
            "    Gains: min {}, active {}, max {}, override cycles {}, smoothing {}",
            tuning.min_gain,
            tuning.active_gain,
            tuning.max_gain,
            tuning.override_cycles,
            tuning.smoothing_enabled
        );

        Ok(Self::build(params, tuning))
    }

    /// The steering control mode.
    pub fn control_mode(&self) -> ControlMode {
        self.mode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn tuning(&self) -> &TuningSnapshot {
        &self.tuning
    }

    /// State carried between ticks.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Message scheduler, exposing the button latch and last sent
    /// acceleration.
    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    fn build(params: Params, tuning: TuningSnapshot) -> Self {
        Self {
            mode: params.control_mode(),
            veh_model: VehicleModel::new(params.veh_model.clone()),
            state: ControllerState::default(),
            escc: Escc::new(params.flags.escc),
            interceptor: AdasDrvInterceptor::new(params.flags.adas_drv_interceptor),
            lane_assist: LaneAssist::default(),
            long_tuning: LongTuning::new(&params),
            sched: Scheduler::new(&params),
            steer_req_cut_last: false,
            initialised: true,
            params,
            tuning
        }
    }

    /// Torque steering: fault avoidance on the request bit and driver aware
    /// rate limits on the torque.
    fn update_torque_steering(
        &mut self,
        cs: &VehicleState,
        cc: &CarControl,
        report: &mut StatusReport
    ) -> (f64, bool) {
        let over_limit = cs.steering_angle_deg.abs() >= MAX_ANGLE_DEG;
        let steer_req = self.state.fault_avoidance.update(over_limit, cc.lat_active);
        self.state.angle_limit_frames = self.state.fault_avoidance.above_limit_frames();

        let new_torque = (cc.actuators.torque * self.params.steer.steer_max).round_ties_even();
        let apply_torque = apply_driver_steer_torque_limits(
            new_torque,
            self.state.apply_torque_last,
            cs.steering_torque,
            &self.params.steer
        );

        report.steer_limited = apply_torque != new_torque;

        (apply_torque, steer_req)
    }

    /// Angle steering: bounded angle plus the torque reduction gain.
    fn update_angle_steering(
        &mut self,
        cs: &VehicleState,
        cc: &CarControl,
        report: &mut StatusReport
    ) -> (f64, bool) {
        let input = AngleLimitInput {
            desired_angle_deg: cc.actuators.steering_angle_deg,
            v_ego_raw_ms: cs.v_ego_raw_ms,
            steering_angle_deg: cs.steering_angle_deg,
            lat_active: cc.lat_active,
            apply_angle_last_deg: self.state.apply_angle_last_deg
        };

        let apply_angle = apply_steer_angle_limits(
            &input,
            &self.params.angle,
            self.tuning.smoothing_enabled,
            &self.veh_model
        );
        self.state.apply_angle_last_deg = apply_angle;

        report.steer_limited = cc.lat_active
            && (apply_angle - cc.actuators.steering_angle_deg).abs() > f64::EPSILON;

        let gain = calc_torque_reduction_gain(
            cs.steering_pressed,
            self.state.apply_torque_last,
            cc.actuators.torque.abs(),
            &self.tuning
        );
        let gain = clamp(&gain, &self.tuning.min_gain, &self.tuning.max_gain);

        (gain, cc.lat_active && gain != 0.0)
    }
}

impl State for CarCtrl {
    type InitData = InitData;
    type InitError = CarCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = CarCtrlError;

    /// Initialise the CarCtrl module.
    ///
    /// Loads the parameter file and applies the tuning overrides, if given.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data.params_path)
            .map_err(CarCtrlError::ParamLoadError)?;

        let tuning = match init_data.tuning {
            Some(src) => TuningSnapshot::default().with_overrides(src.as_ref())?,
            None => TuningSnapshot::default()
        };

        *self = Self::new(params, tuning)?;

        Ok(())
    }

    /// Perform cyclic processing of Car Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if !self.initialised {
            return Err(CarCtrlError::NotInitialised);
        }

        let cs = &input_data.cs;
        let cc = &input_data.cc;
        let frame = self.state.frame;
        let mut report = StatusReport::default();

        // ---- SUB-CONTROLLERS ----

        self.escc.update(cs);
        self.interceptor.update(cs);
        self.lane_assist.update(cc, frame);

        // Longitudinal runs at the ACC command rate
        if frame % 2 == 0 {
            self.long_tuning.update(cc);
        }

        // ---- STEERING ----

        let (mut apply_torque, steer_req) = match self.mode {
            ControlMode::TorqueSteering => self.update_torque_steering(cs, cc, &mut report),
            ControlMode::AngleSteering => self.update_angle_steering(cs, cc, &mut report)
        };

        if !cc.lat_active {
            apply_torque = 0.0;
        }

        report.driver_override = cc.lat_active && cs.steering_pressed;
        report.steer_req_cut = cc.lat_active && !steer_req;

        // Holding the torque while cutting the request bit makes the EPS
        // report a temporary fault, only understood by legacy platforms
        let torque_fault = self.params.protocol == BusProtocol::Can && report.steer_req_cut;

        if report.steer_req_cut && !self.steer_req_cut_last {
            warn!("Steering request cut at tick {} to avoid an EPS fault", frame);
        }
        self.steer_req_cut_last = report.steer_req_cut;

        self.state.apply_torque_last = apply_torque;

        // ---- LONGITUDINAL ----

        let accel = clamp(
            &cc.actuators.accel,
            &self.params.accel_min_ms2,
            &self.params.accel_max_ms2
        );
        report.accel_limited = cc.long_active && accel != cc.actuators.accel;

        let stopping = cc.actuators.long_control_state == LongControlState::Stopping;

        let set_speed = cc.hud_control.set_speed_ms * match cs.is_metric {
            true => MS_TO_KPH,
            false => MS_TO_MPH
        };

        // ---- MESSAGES ----

        let can_sends = self.sched.build(&TickCommand {
            frame,
            cs,
            cc,
            steer_req,
            apply_torque,
            apply_angle_deg: self.state.apply_angle_last_deg,
            torque_fault,
            accel,
            stopping,
            set_speed,
            lkas_icon: self.lane_assist.lkas_icon(),
            lfa_icon: self.lane_assist.lfa_icon(),
            long_tuning: &self.long_tuning,
            escc: &self.escc,
            interceptor: &self.interceptor
        });

        let actuators = ActuatorsOut {
            torque: apply_torque / self.params.steer.steer_max,
            torque_output_can: apply_torque,
            steering_angle_deg: self.state.apply_angle_last_deg,
            accel: self.long_tuning.actual_accel
        };

        trace!(
            "CarCtrl tick {}: torque {}, req {}, angle {:.3}, accel {:.3}, {} sends",
            frame,
            apply_torque,
            steer_req,
            actuators.steering_angle_deg,
            actuators.accel,
            can_sends.len()
        );

        if report.driver_override {
            debug!("Driver override at tick {}, gain/torque {}", frame, apply_torque);
        }

        self.state.frame += 1;

        Ok((OutputData { actuators, can_sends }, report))
    }
}

impl Default for CarCtrl {
    /// An uninitialised controller, `init` must be called before `proc`.
    fn default() -> Self {
        let mut ctrl = Self::build(Params::default(), TuningSnapshot::default());
        ctrl.initialised = false;
        ctrl
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::car_ctrl::sched::CAN_RESUME_BATCH;
    use bus_if::msg::{Buttons, CanPayload, Payload};

    fn active_input(torque: f64) -> InputData {
        let mut input = InputData::default();
        input.cc.enabled = true;
        input.cc.lat_active = true;
        input.cc.actuators.torque = torque;
        input
    }

    #[test]
    fn test_uninitialised() {
        let mut ctrl = CarCtrl::default();
        assert!(matches!(ctrl.proc(&InputData::default()), Err(CarCtrlError::NotInitialised)));
    }

    #[test]
    fn test_invalid_params() {
        let mut p = Params::default();
        p.flags.angle_steering = true;
        assert!(matches!(
            CarCtrl::new(p, TuningSnapshot::default()),
            Err(CarCtrlError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_torque_ramps_and_echo() {
        let mut ctrl = CarCtrl::new(Params::default(), TuningSnapshot::default()).unwrap();
        let steer = ctrl.params().steer;

        let (out, report) = ctrl.proc(&active_input(1.0)).unwrap();
        assert_eq!(out.actuators.torque_output_can, steer.delta_up);
        assert!((out.actuators.torque - steer.delta_up / steer.steer_max).abs() < 1e-12);
        assert!(report.steer_limited);
        assert_eq!(ctrl.state().apply_torque_last, steer.delta_up);
        assert_eq!(ctrl.state().frame, 1);

        // Dropping lateral zeroes the torque
        let mut input = active_input(1.0);
        input.cc.lat_active = false;
        let (out, _) = ctrl.proc(&input).unwrap();
        assert_eq!(out.actuators.torque_output_can, 0.0);
        assert_eq!(ctrl.state().apply_torque_last, 0.0);
    }

    #[test]
    fn test_torque_request_rounds_half_to_even() {
        let mut params = Params::default();
        params.steer.steer_max = 5.0;
        let mut ctrl = CarCtrl::new(params, TuningSnapshot::default()).unwrap();

        // 0.5 * 5 sits exactly between 2 and 3
        let (out, report) = ctrl.proc(&active_input(0.5)).unwrap();
        assert_eq!(out.actuators.torque_output_can, 2.0);
        assert!(!report.steer_limited);
    }

    #[test]
    fn test_torque_fault_on_long_high_angle() {
        let mut ctrl = CarCtrl::new(Params::default(), TuningSnapshot::default()).unwrap();
        let mut input = active_input(0.5);
        input.cs.steering_angle_deg = 95.0;

        let mut faults = 0;
        for _ in 0..100 {
            let (out, report) = ctrl.proc(&input).unwrap();
            let lkas = out.can_sends.iter().find_map(|c| match &c.payload {
                Payload::Can(CanPayload::Lkas11 { steer_req, torque_fault, .. }) => Some((*steer_req, *torque_fault)),
                _ => None
            }).unwrap();

            assert_eq!(lkas.0, !report.steer_req_cut);
            assert_eq!(lkas.1, report.steer_req_cut);
            if lkas.1 {
                faults += 1;
            }
        }

        // One cut of two ticks within the first 100
        assert_eq!(faults, 2);
    }

    #[test]
    fn test_no_torque_fault_on_canfd() {
        let mut ctrl = CarCtrl::new(Params::canfd(), TuningSnapshot::default()).unwrap();
        let mut input = active_input(0.5);
        input.cs.steering_angle_deg = 95.0;

        let mut cuts = 0;
        for _ in 0..100 {
            let (_, report) = ctrl.proc(&input).unwrap();
            if report.steer_req_cut {
                cuts += 1;
            }
        }
        assert_eq!(cuts, 2);
    }

    #[test]
    fn test_angle_gain_bounds() {
        let mut ctrl = CarCtrl::new(Params::canfd_angle(), TuningSnapshot::default()).unwrap();
        let t = ctrl.tuning().clone();
        let mut input = active_input(0.8);
        input.cs.v_ego_raw_ms = 15.0;
        input.cc.actuators.steering_angle_deg = 5.0;

        for i in 0..300 {
            input.cs.steering_pressed = i % 70 > 50;
            let (out, _) = ctrl.proc(&input).unwrap();
            let gain = out.actuators.torque_output_can;
            assert!(gain >= t.min_gain && gain <= t.max_gain, "gain {} at tick {}", gain, i);
        }

        // Inactive forces the gain to zero
        input.cc.lat_active = false;
        let (out, _) = ctrl.proc(&input).unwrap();
        assert_eq!(out.actuators.torque_output_can, 0.0);
    }

    #[test]
    fn test_set_speed_units() {
        let mut p = Params::default();
        p.long_self_managed = true;
        let mut ctrl = CarCtrl::new(p, TuningSnapshot::default()).unwrap();

        let mut input = InputData::default();
        input.cc.hud_control.set_speed_ms = 10.0;
        input.cs.is_metric = true;

        let (out, _) = ctrl.proc(&input).unwrap();
        let set_speed = out.can_sends.iter().find_map(|c| match &c.payload {
            Payload::Can(CanPayload::AccCommands { set_speed, .. }) => Some(*set_speed),
            _ => None
        }).unwrap();
        assert!((set_speed - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_sent_immediately() {
        let mut ctrl = CarCtrl::new(Params::default(), TuningSnapshot::default()).unwrap();
        let mut input = InputData::default();
        input.cc.cruise_control.cancel = true;
        input.cc.cruise_control.resume = true;

        for _ in 0..3 {
            let (out, _) = ctrl.proc(&input).unwrap();
            let buttons: Vec<Buttons> = out.can_sends.iter().filter_map(|c| match &c.payload {
                Payload::Can(CanPayload::Clu11 { button, .. }) => Some(*button),
                _ => None
            }).collect();

            // Cancel wins over resume
            assert_eq!(buttons, vec![Buttons::Cancel]);
        }

        input.cc.cruise_control.cancel = false;
        let (out, _) = ctrl.proc(&input).unwrap();
        assert_eq!(out.can_sends.len(), 1 + CAN_RESUME_BATCH);
    }
}
