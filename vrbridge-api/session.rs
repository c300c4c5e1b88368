/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::Backend;
use crate::Capabilities;
use crate::DisplayConfig;
use crate::EngineSink;
use crate::Eye;
use crate::FrameSnapshot;
use crate::Mailbox;
use crate::Permission;
use crate::PermissionEvent;
use crate::Permissions;
use crate::RequestOutcome;

use log::debug;
use log::warn;

use std::sync::Arc;
use std::sync::Mutex;

/// Pause/resume transitions posted by the control thread. Latest wins: the
/// transitions are idempotent, so an unread signal is safely replaced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ControlSignal {
    Pause,
    Resume,
}

/// State shared between the control-thread `Session` handle and the
/// frame-thread `FramePump`, crossed only through single-slot mailboxes.
pub(crate) struct Shared {
    backend: Arc<dyn Backend>,
    control: Mailbox<ControlSignal>,
    destroy: Mailbox<()>,
    permission: Mailbox<PermissionEvent>,
    permissions: Mutex<Permissions>,
}

impl Shared {
    pub(crate) fn new(backend: Arc<dyn Backend>) -> Shared {
        Shared {
            backend,
            control: Mailbox::new(),
            destroy: Mailbox::new(),
            permission: Mailbox::new(),
            permissions: Mutex::new(Permissions::new()),
        }
    }
}

/// The control-thread face of a live session. The host shell maps its OS
/// activity callbacks onto these methods; they never block and never touch
/// the native engine directly.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    pub(crate) fn new(shared: Arc<Shared>) -> Session {
        Session { shared }
    }

    /// Activity pause: releases exclusive device-service bindings and
    /// signals the frame pump to stop opening frames.
    pub fn pause(&self) {
        self.shared.backend.release_controller_service();
        self.shared.control.post(ControlSignal::Pause);
    }

    /// Activity resume: re-acquires bindings and signals the frame pump.
    /// A bind failure is non-fatal; that device class stays disconnected.
    pub fn resume(&self) {
        if let Err(err) = self.shared.backend.bind_controller_service() {
            warn!("controller service bind failed, continuing without: {:?}", err);
        }
        self.shared.control.post(ControlSignal::Resume);
    }

    /// Activity destroy. Preempts anything still outstanding; the frame
    /// pump tears the native session down when it observes the signal, or
    /// at the latest when the host drops it.
    pub fn destroy(&self) {
        self.shared.destroy.post(());
    }

    /// Issues a permission request on the engine's behalf.
    /// `already_granted` is the host's synchronous OS permission check; a
    /// held grant is notified immediately without waiting for a callback
    /// that some OS versions never send.
    pub fn request_permission(
        &self,
        permission: Permission,
        already_granted: bool,
    ) -> RequestOutcome {
        let outcome = self
            .shared
            .permissions
            .lock()
            .expect("Mutex poisoned")
            .request(permission, already_granted);
        if outcome == RequestOutcome::AlreadyGranted {
            self.shared.permission.post(PermissionEvent {
                permission,
                granted: true,
            });
        }
        outcome
    }

    /// Applies the OS permission-result callback. Duplicates are dropped;
    /// only the first terminal result reaches the engine.
    pub fn permission_result(&self, permission: Permission, granted: bool) {
        let event = self
            .shared
            .permissions
            .lock()
            .expect("Mutex poisoned")
            .resolve(permission, granted);
        if let Some(event) = event {
            self.shared.permission.post(event);
        }
    }
}

/// One live vendor backend and what it can do.
pub struct DeviceSession {
    backend: Arc<dyn Backend>,
    config: DisplayConfig,
    capabilities: Capabilities,
    audio_capture_granted: bool,
}

impl DeviceSession {
    pub(crate) fn new(backend: Arc<dyn Backend>) -> DeviceSession {
        let config = backend.display_config();
        let capabilities = backend.capabilities();
        DeviceSession {
            backend,
            config,
            capabilities,
            audio_capture_granted: false,
        }
    }

    pub fn config(&self) -> DisplayConfig {
        self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether the audio-capture handshake has reached `Granted`.
    pub fn audio_capture_granted(&self) -> bool {
        self.audio_capture_granted
    }

    /// Captures the pose and controller records of one frame together.
    fn snapshot(&self) -> FrameSnapshot {
        let pose = self.backend.query_pose();
        let controllers = if self.capabilities.controllers {
            self.backend.query_controllers()
        } else {
            Vec::new()
        };
        FrameSnapshot { pose, controllers }
    }
}

/// Frame pump lifecycle state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PumpState {
    Idle,
    Active,
    Paused,
    Destroyed,
}

/// The frame-thread side of a session: sequences the display layer's
/// callbacks into ordered native engine calls.
///
/// Hosts with split display callbacks drive `frame_begin`, `draw_eye`, and
/// `frame_end` directly; hosts with a single vsync callback use
/// `pump_frame`. Either way, pose and controller delivery strictly precede
/// the frame's draw calls, and no frame-begin is ever left without its
/// frame-end.
pub struct FramePump<E: EngineSink> {
    engine: E,
    session: DeviceSession,
    shared: Arc<Shared>,
    state: PumpState,
    in_flight: bool,
    frame_count: u64,
    torn_down: bool,
}

impl<E: EngineSink> FramePump<E> {
    pub(crate) fn new(engine: E, session: DeviceSession, shared: Arc<Shared>) -> FramePump<E> {
        FramePump {
            engine,
            session,
            shared,
            state: PumpState::Idle,
            in_flight: false,
            frame_count: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    /// Completed frames since session create.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Opens a frame: forwards any terminal permission event, captures one
    /// coherent snapshot, and delivers frame-begin plus the per-hand
    /// controller calls. Returns false if the pump is not active and no
    /// frame was opened.
    pub fn frame_begin(&mut self) -> bool {
        if self.torn_down || self.check_destroy() {
            return false;
        }
        self.apply_control();
        if self.state != PumpState::Active {
            return false;
        }
        if self.in_flight {
            warn!("frame-begin while a frame is open, ignoring");
            return false;
        }

        if let Some(event) = self.shared.permission.take() {
            if event.granted && event.permission == Permission::AudioCapture {
                self.session.audio_capture_granted = true;
            }
            self.engine
                .on_permission_event(event.permission.id(), event.granted);
        }

        let snapshot = self.session.snapshot();
        self.engine.on_frame_begin(
            snapshot.pose.position(),
            snapshot.pose.orientation(),
            snapshot.pose.fov,
            snapshot.pose.ipd,
        );
        for (hand, state) in &snapshot.controllers {
            self.engine.on_controller_update(
                hand.index(),
                state.connected,
                state.position(),
                state.orientation(),
            );
            if state.connected {
                self.engine.on_controller_input(
                    hand.index(),
                    state.buttons,
                    state.trigger,
                    state.axis_x,
                    state.axis_y,
                );
            }
        }
        self.in_flight = true;
        true
    }

    /// Delivers one per-eye draw call. Ignored when no frame is open, so a
    /// draw callback racing a pause or destroy can't reorder the protocol.
    pub fn draw_eye(&mut self, eye: Eye) {
        if self.torn_down || self.check_destroy() {
            return;
        }
        if !self.in_flight {
            debug!("draw for {:?} eye ignored: no frame open", eye);
            return;
        }
        self.engine.on_draw_eye(eye.id());
    }

    /// Closes the frame. A pause that arrived mid-frame takes effect only
    /// after the bracket closes, so no partial frame crosses the boundary.
    pub fn frame_end(&mut self) {
        if self.torn_down || self.check_destroy() {
            return;
        }
        if !self.in_flight {
            return;
        }
        self.engine.on_frame_end();
        self.in_flight = false;
        self.frame_count += 1;
        self.apply_control();
    }

    /// Runs one whole frame in the session's native eye order, for hosts
    /// whose display layer issues a single per-frame callback. Returns
    /// false if the pump is not active.
    pub fn pump_frame(&mut self) -> bool {
        if !self.frame_begin() {
            return false;
        }
        let order = self.session.config.eye_order;
        for eye in order.iter() {
            self.draw_eye(*eye);
        }
        self.frame_end();
        true
    }

    /// Tears down the native session. Runs at most once, closing any open
    /// frame bracket first; later lifecycle signals are ignored.
    pub fn destroy(&mut self) {
        if self.torn_down {
            return;
        }
        if self.in_flight {
            self.engine.on_frame_end();
            self.in_flight = false;
        }
        self.engine.on_session_destroy();
        self.torn_down = true;
        self.state = PumpState::Destroyed;
    }

    fn check_destroy(&mut self) -> bool {
        if self.shared.destroy.take().is_some() {
            self.destroy();
            true
        } else {
            false
        }
    }

    fn apply_control(&mut self) {
        if self.state == PumpState::Destroyed {
            return;
        }
        match self.shared.control.take() {
            Some(ControlSignal::Pause) => {
                if self.state == PumpState::Active {
                    self.state = PumpState::Paused;
                }
            }
            Some(ControlSignal::Resume) => {
                if self.state == PumpState::Idle || self.state == PumpState::Paused {
                    self.state = PumpState::Active;
                }
            }
            None => {}
        }
    }
}

impl<E: EngineSink> Drop for FramePump<E> {
    fn drop(&mut self) {
        if !self.torn_down {
            // Destroy always wins, even when the host never signaled it.
            debug!("frame pump dropped without destroy, tearing down");
            self.destroy();
        }
    }
}
