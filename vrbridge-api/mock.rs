/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::ControllerState;
use crate::Hand;
use crate::PoseSample;
use crate::Viewport;

use euclid::Size2D;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Initial state for a simulated device. The simulator backend in the
/// `vrbridge` crate implements this protocol.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct SimulatedDeviceInit {
    pub pose: PoseSample,
    pub eye_size: Size2D<i32, Viewport>,
    pub controllers: bool,
    pub audio_capture: bool,
    pub service_available: bool,
}

/// Messages that drive a simulated device between frames.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum SimulatedDeviceMsg {
    SetPose(PoseSample),
    ConnectController(Hand, ControllerState),
    DisconnectController(Hand),
    /// Whether the next controller-service bind will succeed.
    SetServiceAvailable(bool),
}
