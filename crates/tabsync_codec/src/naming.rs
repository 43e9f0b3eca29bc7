//! Names for freshly embedded images.

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use tracing::warn;

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Issues unique resource names for images embedded into a buffer.
///
/// Names have the form `image_<YYYYmmddHHMMSSffffff>.png`. Two requests
/// inside the same clock tick would produce the same name; instead of
/// reusing it the namer logs a warning and appends a `_<n>` suffix.
pub struct ImageNamer {
    clock: Clock,
    last: Mutex<(String, u32)>,
}

impl ImageNamer {
    /// Creates a namer backed by the local wall clock.
    pub fn new() -> Self {
        Self::with_clock(|| Local::now().naive_local())
    }

    /// Creates a namer with a custom clock.
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        Self {
            clock: Box::new(clock),
            last: Mutex::new((String::new(), 0)),
        }
    }

    /// Returns the next image name.
    pub fn next_name(&self) -> String {
        let stamp = (self.clock)().format("%Y%m%d%H%M%S%6f").to_string();
        let mut last = self.last.lock();

        if last.0 == stamp {
            last.1 += 1;
            warn!(
                stamp = %stamp,
                seq = last.1,
                "image name collision within one clock tick"
            );
            return format!("image_{stamp}_{}.png", last.1);
        }

        *last = (stamp.clone(), 0);
        format!("image_{stamp}.png")
    }
}

impl Default for ImageNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageNamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageNamer")
            .field("last", &self.last.lock().0)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn at(micros: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_micro_opt(9, 8, 7, micros)
            .unwrap()
    }

    #[test]
    fn name_format() {
        let namer = ImageNamer::with_clock(|| at(42));
        assert_eq!(namer.next_name(), "image_20240305090807000042.png");
    }

    #[test]
    fn same_tick_is_disambiguated() {
        let namer = ImageNamer::with_clock(|| at(1));
        let first = namer.next_name();
        let second = namer.next_name();
        let third = namer.next_name();

        assert_eq!(first, "image_20240305090807000001.png");
        assert_eq!(second, "image_20240305090807000001_1.png");
        assert_eq!(third, "image_20240305090807000001_2.png");
    }

    #[test]
    fn new_tick_resets_sequence() {
        let tick = Arc::new(AtomicU32::new(1));
        let clock_tick = Arc::clone(&tick);
        let namer = ImageNamer::with_clock(move || at(clock_tick.load(Ordering::SeqCst)));

        namer.next_name();
        namer.next_name();
        tick.store(2, Ordering::SeqCst);
        assert_eq!(namer.next_name(), "image_20240305090807000002.png");
    }

    #[test]
    fn wall_clock_names_are_unique() {
        let namer = ImageNamer::new();
        let names: std::collections::HashSet<_> = (0..100).map(|_| namer.next_name()).collect();
        assert_eq!(names.len(), 100);
    }
}
