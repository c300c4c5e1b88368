/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// Errors that can abort session setup or teardown. Everything that can go
/// wrong after a session is live (device faults, permission denials, bind
/// failures at resume) is reported through degraded state instead.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Error {
    /// No registered backend is available on this device.
    NoMatchingBackend,
    /// The native engine rejected session creation.
    SessionFailed(String),
    /// A device-service binding could not be acquired.
    ServiceBind(String),
    /// A backend-specific failure.
    BackendSpecific(String),
}
