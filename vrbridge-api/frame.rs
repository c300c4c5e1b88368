/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::ControllerState;
use crate::Hand;
use crate::Native;
use crate::Viewer;

use euclid::RigidTransform3D;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// The head pose snapshot produced once per frame and consumed exactly once
/// by the frame-begin call.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct PoseSample {
    /// The transform from the viewer to native coordinates.
    pub transform: RigidTransform3D<f32, Viewer, Native>,
    /// Field of view half-angle, in degrees.
    pub fov: f32,
    /// Interpupillary distance, in meters.
    pub ipd: f32,
}

impl PoseSample {
    pub fn position(&self) -> [f32; 3] {
        let t = self.transform.translation;
        [t.x, t.y, t.z]
    }

    pub fn orientation(&self) -> [f32; 4] {
        let r = self.transform.rotation;
        [r.i, r.j, r.k, r.r]
    }
}

/// The pose and controller records of one frame, captured together so the
/// native engine never observes a half-updated frame.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct FrameSnapshot {
    pub pose: PoseSample,
    /// Zero records for a backend without controllers, otherwise one record
    /// per hand, disconnected hands included.
    pub controllers: Vec<(Hand, ControllerState)>,
}
