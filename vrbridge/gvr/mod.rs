/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Backend for the GVR mobile SDK: one 3DoF controller assigned to the
//! user's dominant hand, the other hand permanently disconnected. The host
//! shell polls the vendor's controller API and pushes the state here.

mod input;

pub use input::convert;
pub use input::raw_buttons;
pub use input::RawController;

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

const EYE_WIDTH: i32 = 1024;
const EYE_HEIGHT: i32 = 1152;

const DEFAULT_FOV: f32 = 95.0;
const DEFAULT_IPD: f32 = 0.064;

pub struct GvrDiscovery {
    backend: Arc<GvrBackend>,
}

impl GvrDiscovery {
    pub fn new(backend: Arc<GvrBackend>) -> GvrDiscovery {
        GvrDiscovery { backend }
    }
}

impl Discovery for GvrDiscovery {
    fn available(&self) -> bool {
        true
    }

    fn create_backend(&mut self) -> Result<Arc<dyn Backend>, Error> {
        Ok(self.backend.clone())
    }
}

struct GvrData {
    pose: Option<PoseSample>,
    controller: Option<RawController>,
    dominant: Hand,
}

pub struct GvrBackend {
    data: Mutex<GvrData>,
    bound: AtomicBool,
}

impl GvrBackend {
    pub fn new() -> GvrBackend {
        GvrBackend {
            data: Mutex::new(GvrData {
                pose: None,
                controller: None,
                dominant: Hand::Right,
            }),
            bound: AtomicBool::new(false),
        }
    }

    /// Called by the host shell with the head pose of each vsync.
    pub fn submit_pose(&self, pose: PoseSample) {
        self.data.lock().expect("Mutex poisoned").pose = Some(pose);
    }

    /// Called by the host shell after polling the vendor's controller API.
    pub fn submit_controller(&self, raw: Option<RawController>) {
        self.data.lock().expect("Mutex poisoned").controller = raw;
    }

    /// The user's handedness preference from the vendor settings; decides
    /// which slot the single controller occupies.
    pub fn set_dominant_hand(&self, hand: Hand) {
        self.data.lock().expect("Mutex poisoned").dominant = hand;
    }
}

impl Default for GvrBackend {
    fn default() -> GvrBackend {
        GvrBackend::new()
    }
}

impl Backend for GvrBackend {
    fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            eye_size: Size2D::<i32, Viewport>::new(EYE_WIDTH, EYE_HEIGHT),
            eye_order: [Eye::Left, Eye::Right],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            controllers: true,
            audio_capture: false,
        }
    }

    fn query_pose(&self) -> PoseSample {
        match self.data.lock().expect("Mutex poisoned").pose {
            Some(ref pose) => pose.clone(),
            None => PoseSample {
                transform: RigidTransform3D::identity(),
                fov: DEFAULT_FOV,
                ipd: DEFAULT_IPD,
            },
        }
    }

    fn query_controllers(&self) -> Vec<(Hand, ControllerState)> {
        let data = self.data.lock().expect("Mutex poisoned");
        let bound = self.bound.load(Ordering::SeqCst);
        Hand::BOTH
            .iter()
            .map(|&hand| {
                let state = if bound && hand == data.dominant {
                    input::convert(data.controller.as_ref())
                } else {
                    ControllerState::inactive()
                };
                (hand, state)
            })
            .collect()
    }

    fn bind_controller_service(&self) -> Result<(), Error> {
        self.bound.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release_controller_service(&self) {
        self.bound.store(false, Ordering::SeqCst);
    }
}
