/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! This crate defines the engine-facing contract of the vrbridge runtime
//! bridge. Vendor backends implementing it live in the `vrbridge` crate.

mod device;
mod engine;
mod error;
mod frame;
mod input;
mod mailbox;
mod mock;
mod permission;
mod registry;
mod session;
mod view;

pub use device::Backend;
pub use device::Capabilities;
pub use device::Discovery;
pub use device::DisplayConfig;

pub use engine::EngineCall;
pub use engine::EngineLog;
pub use engine::EngineSink;

pub use error::Error;

pub use frame::FrameSnapshot;
pub use frame::PoseSample;

pub use input::buttons;
pub use input::clamp_axis;
pub use input::clamp_trigger;
pub use input::normalize_axis;
pub use input::normalize_trigger;
pub use input::trigger_engaged;
pub use input::ControllerState;
pub use input::Hand;
pub use input::TRIGGER_ENGAGED;

pub use mailbox::Mailbox;

pub use mock::SimulatedDeviceInit;
pub use mock::SimulatedDeviceMsg;

pub use permission::Permission;
pub use permission::PermissionEvent;
pub use permission::PermissionState;
pub use permission::Permissions;
pub use permission::RequestOutcome;

pub use registry::Bridge;

pub use session::DeviceSession;
pub use session::FramePump;
pub use session::PumpState;
pub use session::Session;

pub use view::Eye;
pub use view::Input;
pub use view::Native;
pub use view::Viewer;
pub use view::Viewport;
