//! Legacy CAN message set scheduling

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use bus_if::{
    bus::BusId,
    car::LongControlState,
    msg::{Buttons, Cadence, CanPayload, OutboundCommand}
};
use crate::car_ctrl::hud::process_hud_alert;
use super::{
    Scheduler, TickCommand,
    CAN_RESUME_BATCH, CAN_RESUME_LATCH_TICKS, CAN_RESUME_MIN_TICKS
};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scheduler {
    pub(super) fn create_can_msgs(&mut self, tick: &TickCommand, sends: &mut Vec<OutboundCommand>) {
        let cc = tick.cc;
        let hud = &cc.hud_control;

        // ---- STEERING ----

        let alert = process_hud_alert(cc.enabled, self.ldw_warning_level, hud);

        sends.push(OutboundCommand::can(
            BusId::PT,
            Cadence::EveryTick,
            CanPayload::Lkas11 {
                frame: tick.frame,
                apply_torque: tick.apply_torque,
                steer_req: tick.steer_req,
                torque_fault: tick.torque_fault,
                stock: tick.cs.lkas11.clone(),
                sys_warning: alert.sys_warning,
                sys_state: alert.sys_state,
                enabled: cc.enabled,
                left_lane_visible: hud.left_lane_visible,
                right_lane_visible: hud.right_lane_visible,
                left_lane_warning: alert.left_lane_warning,
                right_lane_warning: alert.right_lane_warning,
                lkas_icon: tick.lkas_icon
            }
        ));

        // ---- CLUSTER ----

        if self.flags.send_lfa && Cadence::Hz20.is_due(tick.frame) {
            sends.push(OutboundCommand::can(
                BusId::PT,
                Cadence::Hz20,
                CanPayload::LfahdaMfc {
                    enabled: cc.enabled,
                    lfa_icon: tick.lfa_icon
                }
            ));
        }

        // ---- BUTTONS ----

        if !self.long_self_managed {
            if cc.cruise_control.cancel {
                sends.push(clu11(tick, Buttons::Cancel));
            }
            else if cc.cruise_control.resume {
                let elapsed = self.ticks_since_button(tick.frame);

                // Batches of resume requests improve the chance one is
                // accepted. Both windows must have passed and every batch
                // moves the latch.
                if elapsed > CAN_RESUME_MIN_TICKS && elapsed >= CAN_RESUME_LATCH_TICKS {
                    let msg = clu11(tick, Buttons::ResAccel);
                    sends.extend(std::iter::repeat(msg).take(CAN_RESUME_BATCH));

                    debug!("Resume batch sent at tick {}", tick.frame);
                    self.last_button_frame = Some(tick.frame);
                }
            }
        }

        // ---- LONGITUDINAL ----

        if self.long_self_managed && Cadence::Hz50.is_due(tick.frame) {
            let jerk = match cc.actuators.long_control_state {
                LongControlState::Pid => 3.0,
                _ => 1.0
            };

            sends.push(OutboundCommand::can(
                BusId::PT,
                Cadence::Hz50,
                CanPayload::AccCommands {
                    enabled: cc.enabled,
                    accel: tick.accel,
                    actual_accel: tick.long_tuning.actual_accel,
                    jerk,
                    idx: tick.frame / 2,
                    lead_visible: hud.lead_visible,
                    set_speed: tick.set_speed,
                    stopping: tick.stopping,
                    long_override: cc.cruise_control.long_override,
                    use_fca: self.flags.use_fca,
                    main_cruise_enabled: tick.cs.main_cruise_enabled,
                    escc: tick.escc.signals()
                }
            ));
        }

        // ---- OPTIONS ----

        if self.long_self_managed && Cadence::Hz5.is_due(tick.frame) {
            sends.push(OutboundCommand::can(
                BusId::PT,
                Cadence::Hz5,
                CanPayload::AccOpt {
                    use_fca: self.flags.use_fca,
                    escc_enabled: tick.escc.enabled()
                }
            ));
        }

        if self.long_self_managed && !tick.escc.enabled() && Cadence::Hz2.is_due(tick.frame) {
            sends.push(OutboundCommand::can(BusId::PT, Cadence::Hz2, CanPayload::FrtRadarOpt));
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn clu11(tick: &TickCommand, button: Buttons) -> OutboundCommand {
    OutboundCommand::can(
        BusId::PT,
        Cadence::Event,
        CanPayload::Clu11 {
            frame: tick.frame,
            stock: tick.cs.clu11.clone(),
            button
        }
    )
}
