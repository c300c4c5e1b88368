/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Backend for the Oculus mobile runtime. The vendor hands the host shell
//! one update per vsync with the head pose and every tracked remote; the
//! host pushes that update here and drives whole frames through the frame
//! pump's `pump_frame`.

mod input;

pub use input::raw_buttons;
pub use input::raw_caps;
pub use input::{convert, RawHead, RawRemote, RawUpdate};

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
const EYE_HEIGHT: i32 = 1024;

const DEFAULT_FOV: f32 = 90.0;
const DEFAULT_IPD: f32 = 0.064;

pub struct VrapiDiscovery {
    backend: Arc<VrapiBackend>,
}

impl VrapiDiscovery {
    pub fn new(backend: Arc<VrapiBackend>) -> VrapiDiscovery {
        VrapiDiscovery { backend }
    }
}

impl Discovery for VrapiDiscovery {
    fn available(&self) -> bool {
        true
    }

    fn create_backend(&mut self) -> Result<Arc<dyn Backend>, Error> {
        Ok(self.backend.clone())
    }
}

pub struct VrapiBackend {
    update: Mutex<Option<RawUpdate>>,
    bound: AtomicBool,
}

impl VrapiBackend {
    pub fn new() -> VrapiBackend {
        VrapiBackend {
            update: Mutex::new(None),
            bound: AtomicBool::new(false),
        }
    }

    /// Called by the host shell with the vendor's per-vsync update.
    pub fn submit_update(&self, update: RawUpdate) {
        *self.update.lock().expect("Mutex poisoned") = Some(update);
    }
}

impl Default for VrapiBackend {
    fn default() -> VrapiBackend {
        VrapiBackend::new()
    }
}

impl Backend for VrapiBackend {
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
        match *self.update.lock().expect("Mutex poisoned") {
            Some(ref update) => input::convert_head(&update.head),
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
        let update = self.update.lock().expect("Mutex poisoned");
        let remotes: &[RawRemote] = match *update {
            Some(ref update) => &update.remotes,
            None => &[],
        };
        let slots = input::place(remotes);
        Hand::BOTH
            .iter()
            .map(|&hand| (hand, input::convert(slots[hand.index() as usize])))
            .collect()
    }

    fn bind_controller_service(&self) -> Result<(), Error> {
        // Remote enumeration comes with the runtime itself; binding can't
        // fail once the session exists.
        self.bound.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release_controller_service(&self) {
        self.bound.store(false, Ordering::SeqCst);
    }
}
