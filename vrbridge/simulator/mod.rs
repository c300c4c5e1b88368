/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The generic headset/controller runtime: a simulated device for desktop
//! development and testing, driven between frames through the
//! `SimulatedDeviceMsg` protocol.

use crossbeam_channel::Receiver;

use vrbridge_api::Backend;
use vrbridge_api::Capabilities;
use vrbridge_api::ControllerState;
use vrbridge_api::Discovery;
use vrbridge_api::DisplayConfig;
use vrbridge_api::Error;
use vrbridge_api::Eye;
use vrbridge_api::Hand;
use vrbridge_api::PoseSample;
use vrbridge_api::SimulatedDeviceInit;
use vrbridge_api::SimulatedDeviceMsg;

use std::sync::{Arc, Mutex, MutexGuard};

pub struct SimulatorDiscovery {
    backend: Arc<SimulatorBackend>,
}

impl SimulatorDiscovery {
    pub fn new(
        init: SimulatedDeviceInit,
        receiver: Receiver<SimulatedDeviceMsg>,
    ) -> SimulatorDiscovery {
        SimulatorDiscovery {
            backend: Arc::new(SimulatorBackend::new(init, receiver)),
        }
    }
}

impl Discovery for SimulatorDiscovery {
    fn available(&self) -> bool {
        true
    }

    fn create_backend(&mut self) -> Result<Arc<dyn Backend>, Error> {
        Ok(self.backend.clone())
    }
}

struct SimData {
    pose: PoseSample,
    controllers: [Option<ControllerState>; 2],
    service_available: bool,
    bound: bool,
}

impl SimData {
    fn apply(&mut self, msg: SimulatedDeviceMsg) {
        match msg {
            SimulatedDeviceMsg::SetPose(pose) => self.pose = pose,
            SimulatedDeviceMsg::ConnectController(hand, state) => {
                self.controllers[hand.index() as usize] = Some(state);
            }
            SimulatedDeviceMsg::DisconnectController(hand) => {
                self.controllers[hand.index() as usize] = None;
            }
            SimulatedDeviceMsg::SetServiceAvailable(available) => {
                self.service_available = available;
            }
        }
    }
}

pub struct SimulatorBackend {
    config: DisplayConfig,
    capabilities: Capabilities,
    data: Mutex<SimData>,
    receiver: Receiver<SimulatedDeviceMsg>,
}

impl SimulatorBackend {
    fn new(init: SimulatedDeviceInit, receiver: Receiver<SimulatedDeviceMsg>) -> SimulatorBackend {
        SimulatorBackend {
            config: DisplayConfig {
                eye_size: init.eye_size,
                eye_order: [Eye::Left, Eye::Right],
            },
            capabilities: Capabilities {
                controllers: init.controllers,
                audio_capture: init.audio_capture,
            },
            data: Mutex::new(SimData {
                pose: init.pose,
                controllers: [None, None],
                service_available: init.service_available,
                bound: false,
            }),
            receiver,
        }
    }

    /// Locks the device state after draining any pending messages, so
    /// simulated changes land between frames, never inside one.
    fn sync(&self) -> MutexGuard<SimData> {
        let mut data = self.data.lock().expect("Mutex poisoned");
        while let Ok(msg) = self.receiver.try_recv() {
            data.apply(msg);
        }
        data
    }
}

impl Backend for SimulatorBackend {
    fn display_config(&self) -> DisplayConfig {
        self.config
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn query_pose(&self) -> PoseSample {
        self.sync().pose.clone()
    }

    fn query_controllers(&self) -> Vec<(Hand, ControllerState)> {
        let data = self.sync();
        Hand::BOTH
            .iter()
            .map(|&hand| {
                let state = if data.bound {
                    data.controllers[hand.index() as usize]
                        .clone()
                        .unwrap_or_else(ControllerState::inactive)
                } else {
                    ControllerState::inactive()
                };
                (hand, state)
            })
            .collect()
    }

    fn bind_controller_service(&self) -> Result<(), Error> {
        let mut data = self.sync();
        if data.service_available {
            data.bound = true;
            Ok(())
        } else {
            Err(Error::ServiceBind("simulated service unavailable".into()))
        }
    }

    fn release_controller_service(&self) {
        self.sync().bound = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::{RigidTransform3D, Size2D};

    fn init() -> SimulatedDeviceInit {
        SimulatedDeviceInit {
            pose: PoseSample {
                transform: RigidTransform3D::identity(),
                fov: 90.0,
                ipd: 0.064,
            },
            eye_size: Size2D::new(256, 256),
            controllers: true,
            audio_capture: true,
            service_available: true,
        }
    }

    #[test]
    fn messages_apply_before_the_next_query() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut discovery = SimulatorDiscovery::new(init(), receiver);
        let backend = discovery.create_backend().unwrap();
        backend.bind_controller_service().unwrap();

        let mut state = ControllerState::inactive();
        state.connected = true;
        state.trigger = 0.5;
        sender
            .send(SimulatedDeviceMsg::ConnectController(Hand::Left, state))
            .unwrap();

        let controllers = backend.query_controllers();
        assert!(!controllers[0].1.connected);
        assert!(controllers[1].1.connected);
        assert_eq!(controllers[1].1.trigger, 0.5);

        sender
            .send(SimulatedDeviceMsg::DisconnectController(Hand::Left))
            .unwrap();
        let controllers = backend.query_controllers();
        assert!(!controllers[1].1.connected);
    }

    #[test]
    fn pose_updates_apply_before_the_next_query() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut discovery = SimulatorDiscovery::new(init(), receiver);
        let backend = discovery.create_backend().unwrap();

        sender
            .send(SimulatedDeviceMsg::SetPose(PoseSample {
                transform: RigidTransform3D::from_translation(euclid::Vector3D::new(
                    0.0, 1.8, -0.5,
                )),
                fov: 100.0,
                ipd: 0.066,
            }))
            .unwrap();

        let pose = backend.query_pose();
        assert_eq!(pose.position(), [0.0, 1.8, -0.5]);
        assert_eq!(pose.fov, 100.0);
    }

    #[test]
    fn service_availability_gates_binding() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut discovery = SimulatorDiscovery::new(init(), receiver);
        let backend = discovery.create_backend().unwrap();

        sender
            .send(SimulatedDeviceMsg::SetServiceAvailable(false))
            .unwrap();
        assert!(backend.bind_controller_service().is_err());

        sender
            .send(SimulatedDeviceMsg::SetServiceAvailable(true))
            .unwrap();
        assert!(backend.bind_controller_service().is_ok());
    }

    #[test]
    fn unbound_service_reports_disconnected() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut discovery = SimulatorDiscovery::new(init(), receiver);
        let backend = discovery.create_backend().unwrap();

        let mut state = ControllerState::inactive();
        state.connected = true;
        sender
            .send(SimulatedDeviceMsg::ConnectController(Hand::Right, state))
            .unwrap();

        // Not bound yet: the packet is there but the hand stays inactive.
        assert!(!backend.query_controllers()[0].1.connected);
        backend.bind_controller_service().unwrap();
        assert!(backend.query_controllers()[0].1.connected);
    }
}
