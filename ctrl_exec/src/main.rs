//! Car control simulation executable entry point.
//!
//! # Architecture
//!
//! Drives the control core through a deterministic scenario without any bus
//! attached:
//!
//!     - Initialise the session, logging and CarCtrl
//!     - Main loop, one iteration per tick of simulated time:
//!         - Synthesise the vehicle state and planner requests
//!         - CarCtrl processing
//!         - Feed the commanded actuation back into the vehicle state
//!         - Log a summary every simulated second
//!     - Write the run summary to the session directory
//!
//! The loop never sleeps, ticks are simulated time.
//!
//! # Usage
//!
//! `ctrl_exec [NUM_TICKS] [TUNING_FILE]`, where `TUNING_FILE` is relative to
//! the params directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::env;

// Internal
use bus_if::{car::LongControlState, msg::Cadence};
use ctrl_lib::car_ctrl::{
    CarCtrl, InitData, InputData, TuningSource,
    CONTROL_FREQUENCY_HZ, DT_CTRL_S
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
    time::ticks_to_seconds
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of ticks simulated if none are given.
const DEFAULT_NUM_TICKS: u64 = 6000;

/// Ticks between two summaries.
const SUMMARY_PERIOD_TICKS: u64 = CONTROL_FREQUENCY_HZ as u64;

/// Speed the scenario accelerates to.
///
/// Units: meters/second
const CRUISE_SPEED_MS: f64 = 25.0;

/// Period of the weaving manoeuvre.
///
/// Units: seconds
const WEAVE_PERIOD_S: f64 = 8.0;

/// Amplitude of the weaving manoeuvre.
///
/// Units: degrees
const WEAVE_AMPLITUDE_DEG: f64 = 10.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Totals of a simulation run, written to the session directory.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    num_ticks: u64,
    total_sends: usize,
    sends_by_cadence: BTreeMap<String, usize>,
    steer_req_cut_ticks: u64,
    driver_override_ticks: u64,
    max_abs_angle_deg: f64,
    max_abs_torque: f64,
    final_speed_ms: f64
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new(
        "ctrl_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger, the core is only logged at debug so a run of
    // several minutes stays readable
    logger_init(LevelFilter::Trace, LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Car Control Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- ARGUMENTS ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() > 3 {
        return Err(eyre!(
            "Expected at most two arguments, found {}", args.len() - 1
        ));
    }

    let num_ticks: u64 = match args.get(1) {
        Some(a) => a.parse().wrap_err_with(|| format!("Invalid number of ticks \"{}\"", a))?,
        None => DEFAULT_NUM_TICKS
    };

    let tuning: Option<Box<dyn TuningSource>> = match args.get(2) {
        Some(path) => {
            info!("Loading tuning overrides from \"{}\"", path);
            let table: toml::value::Table = util::params::load(path)
                .wrap_err("Could not load the tuning overrides")?;
            Some(Box::new(table))
        },
        None => None
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut car_ctrl = CarCtrl::default();
    car_ctrl.init(InitData {
        params_path: "car_ctrl.toml",
        tuning
    }).wrap_err("Failed to initialise CarCtrl")?;
    info!("CarCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!(
        "Simulating {} ticks ({:.1} s)\n",
        num_ticks,
        ticks_to_seconds(num_ticks, DT_CTRL_S)
    );

    let mut input = InputData::default();
    let mut summary = RunSummary::default();
    let mut period_counts: HashMap<Cadence, usize> = HashMap::new();

    for frame in 0..num_ticks {
        let t_s = ticks_to_seconds(frame, DT_CTRL_S);

        scenario_inputs(t_s, &mut input);

        let (output, report) = car_ctrl.proc(&input)
            .wrap_err_with(|| format!("CarCtrl processing failed at tick {}", frame))?;

        // ---- FEEDBACK ----

        // The vehicle follows the commands perfectly
        let act = &output.actuators;
        if input.cc.lat_active {
            input.cs.steering_angle_deg = match car_ctrl.control_mode() {
                ctrl_lib::car_ctrl::ControlMode::AngleSteering => act.steering_angle_deg,
                ctrl_lib::car_ctrl::ControlMode::TorqueSteering => act.torque * WEAVE_AMPLITUDE_DEG
            };
        }
        input.cs.v_ego_raw_ms = (input.cs.v_ego_raw_ms + act.accel * DT_CTRL_S).max(0.0);

        // ---- BOOKKEEPING ----

        for cmd in output.can_sends.iter() {
            *period_counts.entry(cmd.cadence).or_insert(0) += 1;
        }

        summary.total_sends += output.can_sends.len();
        summary.steer_req_cut_ticks += report.steer_req_cut as u64;
        summary.driver_override_ticks += report.driver_override as u64;
        summary.max_abs_angle_deg = summary.max_abs_angle_deg.max(act.steering_angle_deg.abs());
        summary.max_abs_torque = summary.max_abs_torque.max(act.torque.abs());

        if (frame + 1) % SUMMARY_PERIOD_TICKS == 0 {
            info!(
                "t = {:5.1} s: v {:5.2} m/s, angle {:7.2} deg, torque {:5.3}, accel {:5.2} m/s^2, sends {:?}",
                t_s,
                input.cs.v_ego_raw_ms,
                act.steering_angle_deg,
                act.torque,
                act.accel,
                period_counts
            );

            for (cadence, count) in period_counts.drain() {
                *summary.sends_by_cadence.entry(format!("{:?}", cadence)).or_insert(0) += count;
            }
        }
    }

    for (cadence, count) in period_counts.drain() {
        *summary.sends_by_cadence.entry(format!("{:?}", cadence)).or_insert(0) += count;
    }

    summary.num_ticks = num_ticks;
    summary.final_speed_ms = input.cs.v_ego_raw_ms;

    if summary.steer_req_cut_ticks > 0 {
        warn!("Steering request was cut on {} ticks", summary.steer_req_cut_ticks);
    }

    // ---- SUMMARY ----

    let mut summary_path = session.session_root.clone();
    summary_path.push("summary.json");

    std::fs::write(
        &summary_path,
        serde_json::to_string_pretty(&summary).wrap_err("Could not serialise the run summary")?
    ).wrap_err("Could not write the run summary")?;

    info!("Run summary written to {:?}", summary_path);
    info!("End of simulation");

    Ok(())
}

/// Planner requests and driver behaviour at time `t_s` of the scenario.
///
/// - 0 to 1 s: disengaged, standing still
/// - from 1 s: engaged, accelerating to the cruise speed then holding it
/// - from 2 s: weaving
/// - 20 to 21 s: the driver overrides the steering
/// - from 50 s: stopping
fn scenario_inputs(t_s: f64, input: &mut InputData) {
    let cc = &mut input.cc;
    let cs = &mut input.cs;

    let engaged = t_s >= 1.0;
    let stopping = t_s >= 50.0;

    cc.enabled = engaged;
    cc.lat_active = engaged;
    cc.long_active = engaged;
    cc.lane_assist.available = true;
    cc.lane_assist.enabled = true;

    cs.is_metric = true;
    cs.main_cruise_enabled = true;
    cs.steering_pressed = (20.0..21.0).contains(&t_s);
    cs.steering_torque = match cs.steering_pressed {
        true => 150.0,
        false => 0.0
    };

    let weave = match t_s >= 2.0 {
        true => (2.0 * std::f64::consts::PI * (t_s - 2.0) / WEAVE_PERIOD_S).sin(),
        false => 0.0
    };
    cc.actuators.steering_angle_deg = WEAVE_AMPLITUDE_DEG * weave;
    cc.actuators.torque = 0.5 * weave;

    cc.hud_control.set_speed_ms = CRUISE_SPEED_MS;
    cc.hud_control.left_lane_visible = true;
    cc.hud_control.right_lane_visible = true;

    let (accel, state) = if stopping {
        match cs.v_ego_raw_ms > 0.0 {
            true => (-2.0, LongControlState::Stopping),
            false => (0.0, LongControlState::Stopping)
        }
    }
    else if cs.v_ego_raw_ms < CRUISE_SPEED_MS {
        (1.5, LongControlState::Pid)
    }
    else {
        (0.0, LongControlState::Pid)
    };

    cc.actuators.accel = accel;
    cc.actuators.long_control_state = match engaged {
        true => state,
        false => LongControlState::Off
    };
}
