/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::session::Shared;
use crate::Backend;
use crate::DeviceSession;
use crate::Discovery;
use crate::EngineSink;
use crate::Error;
use crate::FramePump;
use crate::Session;

use log::warn;

use std::sync::Arc;

/// The entry point: holds the registered vendor discoveries and creates
/// sessions from them. Exactly one session is live at a time; the backend
/// is chosen once at create and never changes for the session's lifetime.
pub struct Bridge {
    discoveries: Vec<Box<dyn Discovery>>,
}

impl Bridge {
    pub fn new() -> Bridge {
        Bridge {
            discoveries: Vec::new(),
        }
    }

    pub fn register<D: Discovery>(&mut self, discovery: D) {
        self.discoveries.push(Box::new(discovery));
    }

    /// Activity create: selects the first available backend, delivers the
    /// one-time native session-create call with the backend's display
    /// configuration, and splits the session into its control-thread
    /// handle and frame-thread pump.
    ///
    /// This is the only fallible lifecycle operation; an error here aborts
    /// the bridge.
    pub fn create_session<E: EngineSink>(
        &mut self,
        mut engine: E,
    ) -> Result<(Session, FramePump<E>), Error> {
        let backend = self.select_backend()?;
        let config = backend.display_config();
        engine.on_session_create(&config)?;

        let shared = Arc::new(Shared::new(backend.clone()));
        let session = Session::new(shared.clone());
        let pump = FramePump::new(engine, DeviceSession::new(backend), shared);
        Ok((session, pump))
    }

    fn select_backend(&mut self) -> Result<Arc<dyn Backend>, Error> {
        for discovery in &mut self.discoveries {
            if !discovery.available() {
                continue;
            }
            match discovery.create_backend() {
                Ok(backend) => return Ok(backend),
                Err(err) => warn!("backend failed to start: {:?}", err),
            }
        }
        Err(Error::NoMatchingBackend)
    }
}

impl Default for Bridge {
    fn default() -> Bridge {
        Bridge::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capabilities;
    use crate::ControllerState;
    use crate::DisplayConfig;
    use crate::EngineCall;
    use crate::EngineLog;
    use crate::Eye;
    use crate::Hand;
    use crate::PoseSample;
    use crate::Viewport;

    use euclid::{RigidTransform3D, Size2D};

    struct StubBackend;

    impl Backend for StubBackend {
        fn display_config(&self) -> DisplayConfig {
            DisplayConfig {
                eye_size: Size2D::<i32, Viewport>::new(64, 64),
                eye_order: [Eye::Left, Eye::Right],
            }
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                controllers: false,
                audio_capture: false,
            }
        }

        fn query_pose(&self) -> PoseSample {
            PoseSample {
                transform: RigidTransform3D::identity(),
                fov: 90.0,
                ipd: 0.064,
            }
        }

        fn query_controllers(&self) -> Vec<(Hand, ControllerState)> {
            Vec::new()
        }

        fn bind_controller_service(&self) -> Result<(), Error> {
            Ok(())
        }

        fn release_controller_service(&self) {}
    }

    struct StubDiscovery {
        available: bool,
        fails: bool,
    }

    impl Discovery for StubDiscovery {
        fn available(&self) -> bool {
            self.available
        }

        fn create_backend(&mut self) -> Result<Arc<dyn Backend>, Error> {
            if self.fails {
                Err(Error::BackendSpecific("runtime failed to start".into()))
            } else {
                Ok(Arc::new(StubBackend))
            }
        }
    }

    struct RejectingEngine;

    impl EngineSink for RejectingEngine {
        fn on_session_create(&mut self, _: &DisplayConfig) -> Result<(), Error> {
            Err(Error::SessionFailed("no display surface".into()))
        }

        fn on_permission_event(&mut self, _: i32, _: bool) {}
        fn on_frame_begin(&mut self, _: [f32; 3], _: [f32; 4], _: f32, _: f32) {}
        fn on_controller_update(&mut self, _: u32, _: bool, _: [f32; 3], _: [f32; 4]) {}
        fn on_controller_input(&mut self, _: u32, _: u32, _: f32, _: f32, _: f32) {}
        fn on_draw_eye(&mut self, _: i32) {}
        fn on_frame_end(&mut self) {}
        fn on_session_destroy(&mut self) {}
    }

    #[test]
    fn no_discoveries_means_no_backend() {
        let mut bridge = Bridge::new();
        assert_eq!(
            bridge.create_session(EngineLog::new()).err(),
            Some(Error::NoMatchingBackend)
        );
    }

    #[test]
    fn selection_skips_unavailable_and_failing_discoveries() {
        let mut bridge = Bridge::new();
        bridge.register(StubDiscovery {
            available: false,
            fails: false,
        });
        bridge.register(StubDiscovery {
            available: true,
            fails: true,
        });
        bridge.register(StubDiscovery {
            available: true,
            fails: false,
        });

        let (_session, pump) = bridge.create_session(EngineLog::new()).unwrap();
        assert!(matches!(
            pump.engine().calls[0],
            EngineCall::SessionCreate(config) if config.eye_size == Size2D::new(64, 64)
        ));
    }

    #[test]
    fn engine_rejection_aborts_session_create() {
        let mut bridge = Bridge::new();
        bridge.register(StubDiscovery {
            available: true,
            fails: false,
        });
        assert_eq!(
            bridge.create_session(RejectingEngine).err(),
            Some(Error::SessionFailed("no display surface".into()))
        );
    }
}
