/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Backend for the Pico mobile SDK. The host shell receives split
//! frame-begin / draw-eye / frame-end render callbacks and byte-packed
//! controller packets from the vendor's telemetry service, and pushes the
//! raw state here; the frame pump's split entry points mirror the render
//! callbacks one to one.

mod input;

pub use input::raw_buttons;
pub use input::RawController;
pub use input::RawHmd;
pub use input::{convert, AXIS_CENTER, AXIS_MAX};

use vrbridge_api::Backend;
use vrbridge_api::Capabilities;
use vrbridge_api::ControllerState;
use vrbridge_api::Discovery;
use vrbridge_api::DisplayConfig;
use vrbridge_api::Error;
use vrbridge_api::Eye;
use vrbridge_api::Hand;
use vrbridge_api::PoseSample;
use vrbridge_api::Viewport;

use euclid::{RigidTransform3D, Size2D};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const EYE_WIDTH: i32 = 1440;
const EYE_HEIGHT: i32 = 1600;

const DEFAULT_FOV: f32 = 96.0;
const DEFAULT_IPD: f32 = 0.064;

pub struct PicoDiscovery {
    backend: Arc<PicoBackend>,
}

impl PicoDiscovery {
    pub fn new(backend: Arc<PicoBackend>) -> PicoDiscovery {
        PicoDiscovery { backend }
    }
}

impl Discovery for PicoDiscovery {
    fn available(&self) -> bool {
        true
    }

    fn create_backend(&mut self) -> Result<Arc<dyn Backend>, Error> {
        Ok(self.backend.clone())
    }
}

pub struct PicoBackend {
    hmd: Mutex<Option<RawHmd>>,
    controllers: Mutex<[Option<RawController>; 2]>,
    service_available: AtomicBool,
    bound: AtomicBool,
}

impl PicoBackend {
    pub fn new() -> PicoBackend {
        PicoBackend {
            hmd: Mutex::new(None),
            controllers: Mutex::new([None, None]),
            service_available: AtomicBool::new(true),
            bound: AtomicBool::new(false),
        }
    }

    /// Called by the host shell with the head state of each frame-begin
    /// render callback.
    pub fn submit_hmd(&self, raw: RawHmd) {
        *self.hmd.lock().expect("Mutex poisoned") = Some(raw);
    }

    /// Called by the host shell whenever the telemetry service delivers a
    /// controller packet. `None` marks the slot's controller as gone.
    pub fn submit_controller(&self, hand: Hand, raw: Option<RawController>) {
        self.controllers.lock().expect("Mutex poisoned")[hand.index() as usize] = raw;
    }

    /// Whether the vendor's controller service is reachable; decides the
    /// outcome of the next bind.
    pub fn set_service_available(&self, available: bool) {
        self.service_available.store(available, Ordering::SeqCst);
    }
}

impl Default for PicoBackend {
    fn default() -> PicoBackend {
        PicoBackend::new()
    }
}

impl Backend for PicoBackend {
    fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            eye_size: Size2D::<i32, Viewport>::new(EYE_WIDTH, EYE_HEIGHT),
            eye_order: [Eye::Left, Eye::Right],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            controllers: true,
            audio_capture: true,
        }
    }

    fn query_pose(&self) -> PoseSample {
        match *self.hmd.lock().expect("Mutex poisoned") {
            Some(ref raw) => input::convert_hmd(raw),
            None => PoseSample {
                transform: RigidTransform3D::identity(),
                fov: DEFAULT_FOV,
                ipd: DEFAULT_IPD,
            },
        }
    }

    fn query_controllers(&self) -> Vec<(Hand, ControllerState)> {
        if !self.bound.load(Ordering::SeqCst) {
            return Hand::BOTH
                .iter()
                .map(|&hand| (hand, ControllerState::inactive()))
                .collect();
        }
        let slots = self.controllers.lock().expect("Mutex poisoned");
        Hand::BOTH
            .iter()
            .map(|&hand| {
                (
                    hand,
                    input::convert(hand, slots[hand.index() as usize].as_ref()),
                )
            })
            .collect()
    }

    fn bind_controller_service(&self) -> Result<(), Error> {
        if self.service_available.load(Ordering::SeqCst) {
            self.bound.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(Error::ServiceBind("controller service not running".into()))
        }
    }

    fn release_controller_service(&self) {
        self.bound.store(false, Ordering::SeqCst);
        // The service stops pushing while released; drop its last packets
        // instead of serving them stale after the next bind.
        *self.controllers.lock().expect("Mutex poisoned") = [None, None];
    }
}
