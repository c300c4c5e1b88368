/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::{RigidTransform3D, Rotation3D, Vector3D};

use vrbridge_api::buttons;
use vrbridge_api::clamp_axis;
use vrbridge_api::ControllerState;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Button bits as reported by the controller API.
pub mod raw_buttons {
    pub const CLICK: u32 = 1 << 0;
    pub const APP: u32 = 1 << 1;
    pub const HOME: u32 = 1 << 2;
}

/// The 3DoF controller state polled from the vendor API. There is no
/// positional tracking and no trigger; the touchpad reports unit-interval
/// coordinates that are only meaningful while touched.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct RawController {
    pub connected: bool,
    /// x, y, z, w.
    pub orientation: [f32; 4],
    /// x, y in 0..1.
    pub touchpad: [f32; 2],
    pub touching: bool,
    pub buttons: u32,
}

/// Converts the polled state into the uniform controller record. Total: a
/// missing or disconnected state becomes the explicit inactive sample.
pub fn convert(raw: Option<&RawController>) -> ControllerState {
    let raw = match raw {
        Some(raw) if raw.connected => raw,
        _ => return ControllerState::inactive(),
    };

    // Unit-interval touch coordinates recenter around 0.5; a pad that
    // isn't being touched reports rest, not a stale position.
    let (axis_x, axis_y) = if raw.touching {
        (
            clamp_axis(raw.touchpad[0] * 2.0 - 1.0),
            clamp_axis(raw.touchpad[1] * 2.0 - 1.0),
        )
    } else {
        (0.0, 0.0)
    };

    let mut mask = 0;
    if raw.buttons & raw_buttons::CLICK != 0 {
        mask |= buttons::PRIMARY;
    }
    if raw.buttons & raw_buttons::APP != 0 {
        mask |= buttons::MENU;
    }

    ControllerState {
        connected: true,
        pose: RigidTransform3D::new(
            Rotation3D::unit_quaternion(
                raw.orientation[0],
                raw.orientation[1],
                raw.orientation[2],
                raw.orientation[3],
            ),
            Vector3D::zero(),
        ),
        buttons: mask,
        trigger: 0.0,
        axis_x,
        axis_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(touchpad: [f32; 2], touching: bool, buttons: u32) -> RawController {
        RawController {
            connected: true,
            orientation: [0.0, 0.0, 0.0, 1.0],
            touchpad,
            touching,
            buttons,
        }
    }

    #[test]
    fn touch_coordinates_recenter_around_the_pad_middle() {
        let state = convert(Some(&raw([0.5, 0.5], true, 0)));
        assert_eq!(state.axis_x, 0.0);
        assert_eq!(state.axis_y, 0.0);

        let state = convert(Some(&raw([1.0, 0.0], true, 0)));
        assert_eq!(state.axis_x, 1.0);
        assert_eq!(state.axis_y, -1.0);
    }

    #[test]
    fn untouched_pad_reports_rest() {
        let state = convert(Some(&raw([0.9, 0.9], false, 0)));
        assert_eq!(state.axis_x, 0.0);
        assert_eq!(state.axis_y, 0.0);
    }

    #[test]
    fn click_and_app_map_to_the_fixed_layout() {
        let state = convert(Some(&raw([0.5, 0.5], false, raw_buttons::CLICK)));
        assert!(state.buttons & buttons::PRIMARY != 0);

        let state = convert(Some(&raw([0.5, 0.5], false, raw_buttons::APP)));
        assert!(state.buttons & buttons::MENU != 0);
    }

    #[test]
    fn there_is_no_positional_tracking_or_trigger() {
        let state = convert(Some(&raw([0.5, 0.5], true, raw_buttons::CLICK)));
        assert_eq!(state.position(), [0.0, 0.0, 0.0]);
        assert_eq!(state.trigger, 0.0);
        assert_eq!(state.buttons & buttons::TRIGGER, 0);
    }
}
