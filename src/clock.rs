// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};

/// Source of the current time for everything that checks expiry.
pub(crate) trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub(crate) struct System;

impl Clock for System {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Utc};

    use super::Clock;

    /// A clock that only moves when told to.
    pub(crate) struct Manual(Mutex<DateTime<Utc>>);

    impl Manual {
        pub(crate) fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut guard = self.0.lock().unwrap();
            *guard = *guard + by;
        }
    }

    impl Clock for Manual {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }
}
