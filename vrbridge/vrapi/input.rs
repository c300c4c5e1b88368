/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::{RigidTransform3D, Rotation3D, Vector3D};

use log::warn;

use vrbridge_api::buttons;
use vrbridge_api::clamp_axis;
use vrbridge_api::clamp_trigger;
use vrbridge_api::trigger_engaged;
use vrbridge_api::ControllerState;
use vrbridge_api::PoseSample;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Button bits, bit identical with the vendor's input header.
pub mod raw_buttons {
    pub const A: u32 = 0x0000_0001;
    pub const B: u32 = 0x0000_0002;
    pub const X: u32 = 0x0000_0100;
    pub const Y: u32 = 0x0000_0200;
    /// Touchpad click on the 3DoF remotes, menu on the 6DoF controllers.
    pub const ENTER: u32 = 0x0010_0000;
    pub const BACK: u32 = 0x0020_0000;
    pub const GRIP: u32 = 0x0400_0000;
    pub const JOYSTICK: u32 = 0x8000_0000;
}

/// Controller capability bits, bit identical with the vendor's header.
pub mod raw_caps {
    pub const LEFT_HAND: u32 = 0x0000_0004;
    pub const RIGHT_HAND: u32 = 0x0000_0008;
}

/// One tracked-remote state from the vendor's per-frame update.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct RawRemote {
    pub caps: u32,
    pub position: [f32; 3],
    /// x, y, z, w.
    pub orientation: [f32; 4],
    pub buttons: u32,
    /// 0..1 analog index trigger.
    pub trigger: f32,
    /// 0..1 analog grip trigger.
    pub grip: f32,
    /// -1..1 joystick.
    pub joystick: [f32; 2],
}

/// The head state from the vendor's per-frame update.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct RawHead {
    pub position: [f32; 3],
    pub orientation: [f32; 4],
    pub fov: f32,
    pub ipd: f32,
}

/// Everything the vendor runtime hands over each frame.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct RawUpdate {
    pub head: RawHead,
    pub remotes: Vec<RawRemote>,
}

pub(crate) fn convert_head(raw: &RawHead) -> PoseSample {
    PoseSample {
        transform: transform(raw.position, raw.orientation),
        fov: raw.fov,
        ipd: raw.ipd,
    }
}

/// Assigns remotes to hand slots from their capability bits; slot 0 is the
/// right hand. Arrival order carries no meaning.
pub(crate) fn place(remotes: &[RawRemote]) -> [Option<&RawRemote>; 2] {
    let mut slots = [None, None];
    for remote in remotes {
        if remote.caps & raw_caps::RIGHT_HAND != 0 {
            slots[0] = Some(remote);
        } else if remote.caps & raw_caps::LEFT_HAND != 0 {
            slots[1] = Some(remote);
        } else {
            warn!("remote with no hand capability bits, dropping");
        }
    }
    slots
}

/// Converts one remote into the uniform controller record. Total: a
/// missing remote becomes the explicit inactive sample.
pub fn convert(raw: Option<&RawRemote>) -> ControllerState {
    let raw = match raw {
        Some(raw) => raw,
        None => return ControllerState::inactive(),
    };

    let trigger = clamp_trigger(raw.trigger);

    let mut mask = 0;
    if trigger_engaged(trigger) {
        mask |= buttons::TRIGGER;
    }
    if raw.buttons & raw_buttons::JOYSTICK != 0 {
        mask |= buttons::PRIMARY;
    }
    // Each remote reports only its own grip. Some hardware revisions never
    // set the digital bit, so the analog value counts too.
    if raw.buttons & raw_buttons::GRIP != 0 || trigger_engaged(clamp_trigger(raw.grip)) {
        mask |= buttons::GRIP;
    }
    if raw.buttons & (raw_buttons::ENTER | raw_buttons::BACK) != 0 {
        mask |= buttons::MENU;
    }
    if raw.buttons & (raw_buttons::A | raw_buttons::X) != 0 {
        mask |= buttons::FACE_A;
    }
    if raw.buttons & (raw_buttons::B | raw_buttons::Y) != 0 {
        mask |= buttons::FACE_B;
    }

    ControllerState {
        connected: true,
        pose: transform(raw.position, raw.orientation),
        buttons: mask,
        trigger,
        axis_x: clamp_axis(raw.joystick[0]),
        axis_y: clamp_axis(raw.joystick[1]),
    }
}

fn transform<Src, Dst>(
    position: [f32; 3],
    orientation: [f32; 4],
) -> RigidTransform3D<f32, Src, Dst> {
    RigidTransform3D::new(
        Rotation3D::unit_quaternion(
            orientation[0],
            orientation[1],
            orientation[2],
            orientation[3],
        ),
        Vector3D::new(position[0], position[1], position[2]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(caps: u32) -> RawRemote {
        RawRemote {
            caps,
            position: [0.0, 1.0, 0.0],
            orientation: [0.0, 0.0, 0.0, 1.0],
            buttons: 0,
            trigger: 0.0,
            grip: 0.0,
            joystick: [0.0, 0.0],
        }
    }

    #[test]
    fn placement_follows_capability_bits_not_order() {
        let left_first = [remote(raw_caps::LEFT_HAND), remote(raw_caps::RIGHT_HAND)];
        let slots = place(&left_first);
        assert!(slots[0].unwrap().caps & raw_caps::RIGHT_HAND != 0);
        assert!(slots[1].unwrap().caps & raw_caps::LEFT_HAND != 0);

        let right_first = [remote(raw_caps::RIGHT_HAND), remote(raw_caps::LEFT_HAND)];
        let slots = place(&right_first);
        assert!(slots[0].unwrap().caps & raw_caps::RIGHT_HAND != 0);
        assert!(slots[1].unwrap().caps & raw_caps::LEFT_HAND != 0);
    }

    #[test]
    fn remotes_without_hand_bits_are_dropped() {
        let remotes = [remote(0), remote(raw_caps::RIGHT_HAND)];
        let slots = place(&remotes);
        assert!(slots[0].is_some());
        assert!(slots[1].is_none());
    }

    #[test]
    fn analog_values_are_clamped() {
        let mut raw = remote(raw_caps::RIGHT_HAND);
        raw.trigger = 1.3;
        raw.joystick = [-2.0, 0.75];
        let state = convert(Some(&raw));
        assert_eq!(state.trigger, 1.0);
        assert_eq!(state.axis_x, -1.0);
        assert_eq!(state.axis_y, 0.75);
        assert!(state.buttons & buttons::TRIGGER != 0);
    }

    #[test]
    fn analog_grip_engages_the_grip_bit() {
        let mut raw = remote(raw_caps::LEFT_HAND);
        raw.grip = 0.95;
        assert!(convert(Some(&raw)).buttons & buttons::GRIP != 0);

        raw.grip = 0.2;
        assert_eq!(convert(Some(&raw)).buttons & buttons::GRIP, 0);

        raw.buttons = raw_buttons::GRIP;
        assert!(convert(Some(&raw)).buttons & buttons::GRIP != 0);
    }

    #[test]
    fn face_and_menu_buttons_map_to_the_fixed_layout() {
        let mut raw = remote(raw_caps::RIGHT_HAND);
        raw.buttons = raw_buttons::A | raw_buttons::ENTER;
        let state = convert(Some(&raw));
        assert!(state.buttons & buttons::FACE_A != 0);
        assert!(state.buttons & buttons::MENU != 0);
        assert_eq!(state.buttons & buttons::FACE_B, 0);

        let mut raw = remote(raw_caps::LEFT_HAND);
        raw.buttons = raw_buttons::Y | raw_buttons::JOYSTICK;
        let state = convert(Some(&raw));
        assert!(state.buttons & buttons::FACE_B != 0);
        assert!(state.buttons & buttons::PRIMARY != 0);
    }

    #[test]
    fn missing_remote_is_an_inactive_record() {
        let state = convert(None);
        assert!(!state.connected);
        assert_eq!(state.position(), [0.0, 0.0, 0.0]);
    }
}
