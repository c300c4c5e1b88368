/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

/// Traits to be implemented by backends
use crate::ControllerState;
use crate::Error;
use crate::Eye;
use crate::Hand;
use crate::PoseSample;
use crate::Viewport;

use euclid::Size2D;

use std::sync::Arc;

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// The display configuration a backend chooses at session create. It is
/// fixed for the session lifetime, never renegotiated per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Eye buffer dimensions, in pixels.
    pub eye_size: Size2D<i32, Viewport>,
    /// The device's native eye render order.
    pub eye_order: [Eye; 2],
}

/// What a backend can do. Established at session create.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct Capabilities {
    /// The backend exposes hand controllers.
    pub controllers: bool,
    /// The backend supports audio capture, gated by the permission handshake.
    pub audio_capture: bool,
}

/// A vendor backend: the source of raw pose and controller state.
///
/// All query methods are total. A backend with nothing to report returns
/// identity poses and inactive controller records, never an error, so one
/// bad frame can't stall the frame loop. Backends are shared between the
/// lifecycle control thread and the frame thread, and use interior
/// mutability for the raw state their host shell pushes in.
pub trait Backend: Send + Sync + 'static {
    fn display_config(&self) -> DisplayConfig;

    fn capabilities(&self) -> Capabilities;

    /// The head pose for the frame being opened.
    fn query_pose(&self) -> PoseSample;

    /// One record per hand, in slot order. Disconnected hands yield
    /// explicit inactive records. Backends without the controllers
    /// capability are never asked.
    fn query_controllers(&self) -> Vec<(Hand, ControllerState)>;

    /// Acquires the device's controller-telemetry service. Called at
    /// resume; failure is non-fatal and leaves controllers disconnected.
    fn bind_controller_service(&self) -> Result<(), Error>;

    /// Releases the controller-telemetry service. Called at pause.
    fn release_controller_service(&self);
}

/// A trait for discovering VR backends. The bridge walks registered
/// discoveries at session create and takes the first available backend.
pub trait Discovery: 'static {
    fn available(&self) -> bool;

    fn create_backend(&mut self) -> Result<Arc<dyn Backend>, Error>;
}
