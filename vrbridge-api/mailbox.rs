/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Mutex;

/// A thread-safe single-slot mailbox. Posting replaces any unread value:
/// every event type routed through one of these is idempotent or terminal,
/// so only the latest posting matters and no backlog can build up.
#[derive(Debug, Default)]
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Mailbox<T> {
        Mailbox {
            slot: Mutex::new(None),
        }
    }

    pub fn post(&self, value: T) {
        *self.slot.lock().expect("Mutex poisoned") = Some(value);
    }

    pub fn take(&self) -> Option<T> {
        self.slot.lock().expect("Mutex poisoned").take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_the_slot() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.take(), None::<u32>);
        mailbox.post(1);
        assert_eq!(mailbox.take(), Some(1));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn posting_replaces_an_unread_value() {
        let mailbox = Mailbox::new();
        mailbox.post(1);
        mailbox.post(2);
        assert_eq!(mailbox.take(), Some(2));
    }
}
