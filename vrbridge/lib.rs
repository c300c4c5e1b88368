/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! This crate defines the vendor backends of the vrbridge runtime bridge.
//! Each module adapts one vendor SDK's telemetry shapes and callback model
//! onto the uniform contract in `vrbridge-api`.

#[cfg(feature = "gvr")]
pub mod gvr;

#[cfg(feature = "picovr")]
pub mod picovr;

#[cfg(feature = "simulator")]
pub mod simulator;

#[cfg(feature = "vrapi")]
pub mod vrapi;
