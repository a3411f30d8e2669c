//! CAN FD message set scheduling

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use bus_if::msg::{Buttons, Cadence, CanFdPayload, OutboundCommand};
use super::{Scheduler, TickCommand, CANFD_BUTTON_BATCH, CANFD_BUTTON_MIN_TICKS};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scheduler {
    pub(super) fn create_canfd_msgs(&mut self, tick: &TickCommand, sends: &mut Vec<OutboundCommand>) {
        let cc = tick.cc;
        let buses = self.buses;
        let lka_steering = self.flags.lka_steering;
        let lka_steering_long = lka_steering && self.long_self_managed;

        if tick.interceptor.available() {
            sends.push(tick.interceptor.create_msg(buses.ecan, self.long_self_managed));
        }

        // ---- STEERING ----

        let steer_bus = match lka_steering {
            true => buses.acan,
            false => buses.ecan
        };

        sends.push(OutboundCommand::canfd(
            steer_bus,
            Cadence::EveryTick,
            CanFdPayload::Steering {
                enabled: cc.enabled,
                steer_req: tick.steer_req,
                apply_torque: tick.apply_torque,
                apply_angle_deg: tick.apply_angle_deg,
                angle_steering: self.flags.angle_steering,
                lkas_icon: tick.lkas_icon
            }
        ));

        // Report no lane lines to the ADAS ECU so its own LFA stays off
        if lka_steering && Cadence::Hz20.is_due(tick.frame) {
            sends.push(OutboundCommand::canfd(
                buses.acan,
                Cadence::Hz20,
                CanFdPayload::SuppressLfa {
                    stock: tick.cs.lfa_block_msg.clone(),
                    lka_steering_alt: self.flags.lka_steering_alt
                }
            ));
        }

        // ---- CLUSTER ----

        if (!lka_steering || lka_steering_long) && Cadence::Hz20.is_due(tick.frame) {
            sends.push(OutboundCommand::canfd(
                buses.ecan,
                Cadence::Hz20,
                CanFdPayload::LfahdaCluster {
                    enabled: cc.enabled,
                    lfa_icon: tick.lfa_icon
                }
            ));
        }

        if lka_steering && self.flags.enable_blinkers {
            sends.push(OutboundCommand::canfd(
                buses.ecan,
                Cadence::EveryTick,
                CanFdPayload::SpasMessages {
                    left_blinker: cc.left_blinker,
                    right_blinker: cc.right_blinker
                }
            ));
        }

        // ---- LONGITUDINAL ----

        if self.long_self_managed {
            if lka_steering {
                // A fitted interceptor forwards the real frames instead
                if !tick.interceptor.available() {
                    sends.push(OutboundCommand::canfd(
                        buses.ecan,
                        Cadence::EveryTick,
                        CanFdPayload::AdrvMessages { frame: tick.frame }
                    ));
                }
            }
            else {
                sends.push(OutboundCommand::canfd(
                    buses.ecan,
                    Cadence::EveryTick,
                    CanFdPayload::FcaWarningLight { frame: tick.frame }
                ));
            }

            if Cadence::Hz50.is_due(tick.frame) {
                sends.push(OutboundCommand::canfd(
                    buses.ecan,
                    Cadence::Hz50,
                    CanFdPayload::AccControl {
                        enabled: cc.enabled,
                        accel_last: self.accel_last,
                        accel: tick.accel,
                        actual_accel: tick.long_tuning.actual_accel,
                        jerk_upper: tick.long_tuning.jerk_upper,
                        jerk_lower: tick.long_tuning.jerk_lower,
                        stopping: tick.stopping,
                        long_override: cc.cruise_control.long_override,
                        set_speed: tick.set_speed,
                        lead_visible: cc.hud_control.lead_visible,
                        main_cruise_enabled: tick.cs.main_cruise_enabled
                    }
                ));
                self.accel_last = tick.accel;
            }
        }
        else {
            self.create_canfd_buttons(tick, sends);
        }
    }

    fn create_canfd_buttons(&mut self, tick: &TickCommand, sends: &mut Vec<OutboundCommand>) {
        if self.ticks_since_button(tick.frame) <= CANFD_BUTTON_MIN_TICKS {
            return;
        }

        let cruise = &tick.cc.cruise_control;
        // Buttons are injected towards the camera unless the LKA ECU steers
        let bus = match self.flags.lka_steering {
            true => self.buses.ecan,
            false => self.buses.cam
        };
        let counter = tick.cs.buttons_counter.wrapping_add(1);

        let button = |b: Buttons| OutboundCommand::canfd(
            bus,
            Cadence::Event,
            CanFdPayload::Buttons { counter, button: b }
        );

        if cruise.cancel {
            if self.flags.alt_buttons {
                sends.push(OutboundCommand::canfd(
                    bus,
                    Cadence::Event,
                    CanFdPayload::AccCancel { cruise_info: tick.cs.cruise_info.clone() }
                ));
            }
            else {
                sends.extend(std::iter::repeat(button(Buttons::Cancel)).take(CANFD_BUTTON_BATCH));
            }

            debug!("Cancel sent at tick {}", tick.frame);
            self.last_button_frame = Some(tick.frame);
        }
        else if cruise.resume {
            // Alternate button platforms have no resume message
            if !self.flags.alt_buttons {
                sends.extend(std::iter::repeat(button(Buttons::ResAccel)).take(CANFD_BUTTON_BATCH));

                debug!("Resume sent at tick {}", tick.frame);
                self.last_button_frame = Some(tick.frame);
            }
        }
    }
}
