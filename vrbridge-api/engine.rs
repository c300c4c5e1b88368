use crate::DisplayConfig;
use crate::Error;

/// The fixed call contract delivered to the native engine. The shapes are
/// identical for every vendor backend; only the values differ.
///
/// Apart from session create, every call is infallible: device faults and
/// permission denials arrive as data, not errors.
pub trait EngineSink: 'static {
    /// One-time session setup, carrying the backend-chosen display
    /// configuration. The only engine call allowed to fail.
    fn on_session_create(&mut self, config: &DisplayConfig) -> Result<(), Error>;

    /// The one-time terminal outcome of a permission request.
    fn on_permission_event(&mut self, permission: i32, granted: bool);

    fn on_frame_begin(&mut self, position: [f32; 3], orientation: [f32; 4], fov: f32, ipd: f32);

    fn on_controller_update(
        &mut self,
        hand: u32,
        active: bool,
        position: [f32; 3],
        orientation: [f32; 4],
    );

    fn on_controller_input(
        &mut self,
        hand: u32,
        buttons: u32,
        trigger: f32,
        axis_x: f32,
        axis_y: f32,
    );

    fn on_draw_eye(&mut self, eye: i32);

    fn on_frame_end(&mut self);

    /// One-time session teardown.
    fn on_session_destroy(&mut self);
}

/// One recorded engine call.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    SessionCreate(DisplayConfig),
    PermissionEvent {
        permission: i32,
        granted: bool,
    },
    FrameBegin {
        position: [f32; 3],
        orientation: [f32; 4],
        fov: f32,
        ipd: f32,
    },
    ControllerUpdate {
        hand: u32,
        active: bool,
        position: [f32; 3],
        orientation: [f32; 4],
    },
    ControllerInput {
        hand: u32,
        buttons: u32,
        trigger: f32,
        axis_x: f32,
        axis_y: f32,
    },
    DrawEye {
        eye: i32,
    },
    FrameEnd,
    SessionDestroy,
}

/// Convenience sink that records every call in order, for tests and for
/// host shells that want to inspect the call stream.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub calls: Vec<EngineCall>,
}

impl EngineLog {
    pub fn new() -> EngineLog {
        EngineLog::default()
    }
}

impl EngineSink for EngineLog {
    fn on_session_create(&mut self, config: &DisplayConfig) -> Result<(), Error> {
        self.calls.push(EngineCall::SessionCreate(*config));
        Ok(())
    }

    fn on_permission_event(&mut self, permission: i32, granted: bool) {
        self.calls.push(EngineCall::PermissionEvent {
            permission,
            granted,
        });
    }

    fn on_frame_begin(&mut self, position: [f32; 3], orientation: [f32; 4], fov: f32, ipd: f32) {
        self.calls.push(EngineCall::FrameBegin {
            position,
            orientation,
            fov,
            ipd,
        });
    }

    fn on_controller_update(
        &mut self,
        hand: u32,
        active: bool,
        position: [f32; 3],
        orientation: [f32; 4],
    ) {
        self.calls.push(EngineCall::ControllerUpdate {
            hand,
            active,
            position,
            orientation,
        });
    }

    fn on_controller_input(
        &mut self,
        hand: u32,
        buttons: u32,
        trigger: f32,
        axis_x: f32,
        axis_y: f32,
    ) {
        self.calls.push(EngineCall::ControllerInput {
            hand,
            buttons,
            trigger,
            axis_x,
            axis_y,
        });
    }

    fn on_draw_eye(&mut self, eye: i32) {
        self.calls.push(EngineCall::DrawEye { eye });
    }

    fn on_frame_end(&mut self) {
        self.calls.push(EngineCall::FrameEnd);
    }

    fn on_session_destroy(&mut self) {
        self.calls.push(EngineCall::SessionDestroy);
    }
}
