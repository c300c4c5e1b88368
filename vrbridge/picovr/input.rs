/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::{RigidTransform3D, Rotation3D, Vector3D};

use vrbridge_api::buttons;
use vrbridge_api::normalize_axis;
use vrbridge_api::normalize_trigger;
use vrbridge_api::trigger_engaged;
use vrbridge_api::ControllerState;
use vrbridge_api::Hand;
use vrbridge_api::PoseSample;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Button bits as reported by the controller service.
pub mod raw_buttons {
    pub const TOUCHPAD_CLICK: u32 = 1 << 0;
    pub const MENU: u32 = 1 << 1;
    pub const A: u32 = 1 << 2;
    pub const B: u32 = 1 << 3;
    pub const X: u32 = 1 << 4;
    pub const Y: u32 = 1 << 5;
    pub const GRIP_LEFT: u32 = 1 << 6;
    pub const GRIP_RIGHT: u32 = 1 << 7;
}

/// The touchpad rest value. The raw range 0..=255 is not symmetric around
/// it, which is why normalization scales each side separately.
pub const AXIS_CENTER: u8 = 128;
pub const AXIS_MAX: u8 = 255;

/// One controller packet as pushed by the vendor's telemetry service.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct RawController {
    pub connected: bool,
    pub position: [f32; 3],
    /// x, y, z, w.
    pub orientation: [f32; 4],
    pub buttons: u32,
    /// 0..=255.
    pub trigger: u8,
    /// x, y in 0..=255, centered at `AXIS_CENTER`.
    pub touchpad: [u8; 2],
}

/// The head state delivered with each frame-begin callback.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct RawHmd {
    pub position: [f32; 3],
    pub orientation: [f32; 4],
    pub fov: f32,
    pub ipd: f32,
}

pub(crate) fn convert_hmd(raw: &RawHmd) -> PoseSample {
    PoseSample {
        transform: transform(raw.position, raw.orientation),
        fov: raw.fov,
        ipd: raw.ipd,
    }
}

/// Converts one raw packet into the uniform controller record. Total: a
/// missing or disconnected packet becomes the explicit inactive sample.
pub fn convert(hand: Hand, raw: Option<&RawController>) -> ControllerState {
    let raw = match raw {
        Some(raw) if raw.connected => raw,
        _ => return ControllerState::inactive(),
    };

    let trigger = normalize_trigger(raw.trigger);
    let axis_x = normalize_axis(raw.touchpad[0], AXIS_CENTER, AXIS_MAX);
    let axis_y = normalize_axis(raw.touchpad[1], AXIS_CENTER, AXIS_MAX);

    // The service reports both grip buttons in every packet; each slot
    // reads the one on its own controller. Same for the face buttons:
    // A/B live on slot 0, X/Y on slot 1.
    let (grip, face_a, face_b) = match hand {
        Hand::Right => (raw_buttons::GRIP_RIGHT, raw_buttons::A, raw_buttons::B),
        Hand::Left => (raw_buttons::GRIP_LEFT, raw_buttons::X, raw_buttons::Y),
    };

    let mut mask = 0;
    if trigger_engaged(trigger) {
        mask |= buttons::TRIGGER;
    }
    if raw.buttons & raw_buttons::TOUCHPAD_CLICK != 0 {
        mask |= buttons::PRIMARY;
    }
    if raw.buttons & grip != 0 {
        mask |= buttons::GRIP;
    }
    if raw.buttons & raw_buttons::MENU != 0 {
        mask |= buttons::MENU;
    }
    if raw.buttons & face_a != 0 {
        mask |= buttons::FACE_A;
    }
    if raw.buttons & face_b != 0 {
        mask |= buttons::FACE_B;
    }

    ControllerState {
        connected: true,
        pose: transform(raw.position, raw.orientation),
        buttons: mask,
        trigger,
        axis_x,
        axis_y,
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
