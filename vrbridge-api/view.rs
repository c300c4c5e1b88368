/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! This crate uses `euclid`'s typed units, and exposes different coordinate spaces.

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// The native 3D coordinate space of the device.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Native {}

/// The coordinate space of the viewer's head.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Viewer {}

/// The coordinate space of a hand controller.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Input {}

/// The unnormalized eye-buffer coordinate space, measured in pixels.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Viewport {}

/// Which eye's view is being rendered by a draw call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// The eye identifier delivered to the native engine.
    pub fn id(self) -> i32 {
        match self {
            Eye::Left => 0,
            Eye::Right => 1,
        }
    }
}
