//! Filename and id generation for assets and history entries.
//!
//! Every name is derived from a millisecond timestamp. [`MillisClock`]
//! guarantees that successive readings within one process are strictly
//! increasing, so two jobs finishing in the same millisecond still get
//! distinct filenames and ledger ids.

use std::sync::atomic::{AtomicI64, Ordering};

/// Prefix of every generated image filename.
pub const GENERATED_PREFIX: &str = "generated-";

/// Monotonic millisecond clock.
#[derive(Debug, Default)]
pub struct MillisClock {
    last: AtomicI64,
}

impl MillisClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current Unix time in milliseconds, bumped past the previous reading
    /// if the wall clock has not advanced (or went backwards).
    pub fn next(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Name under which an uploaded file is stored: `<millis>-<original name>`.
///
/// The original name is reduced to its final path component and any
/// character outside `[A-Za-z0-9._-]` becomes `_`.
///
/// ```
/// use restyle_core::naming::upload_filename;
///
/// assert_eq!(upload_filename(1700, "cat.jpg"), "1700-cat.jpg");
/// assert_eq!(upload_filename(1700, "../../etc/my cat.jpg"), "1700-my_cat.jpg");
/// ```
pub fn upload_filename(millis: i64, original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    while clean.contains("..") {
        clean = clean.replace("..", ".");
    }
    let clean = clean.trim_start_matches('.');

    if clean.is_empty() {
        format!("{millis}-upload")
    } else {
        format!("{millis}-{clean}")
    }
}

/// Name under which a generated image is stored: `generated-<millis>.<ext>`.
pub fn generated_filename(millis: i64, extension: &str) -> String {
    format!("{GENERATED_PREFIX}{millis}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_strictly_increasing() {
        let clock = MillisClock::new();
        let mut prev = clock.next();
        for _ in 0..1000 {
            let next = clock.next();
            assert!(next > prev, "{next} should be greater than {prev}");
            prev = next;
        }
    }

    #[test]
    fn clock_tracks_wall_time() {
        let clock = MillisClock::new();
        let before = chrono::Utc::now().timestamp_millis();
        let reading = clock.next();
        assert!(reading >= before);
    }

    #[test]
    fn upload_filename_keeps_safe_characters() {
        assert_eq!(upload_filename(1, "My_Photo-01.PNG"), "1-My_Photo-01.PNG");
    }

    #[test]
    fn upload_filename_strips_directories_and_dots() {
        assert_eq!(upload_filename(5, "C:\\Users\\me\\pic.webp"), "5-pic.webp");
        assert_eq!(upload_filename(5, ".hidden.png"), "5-hidden.png");
        assert_eq!(upload_filename(5, "a..b.png"), "5-a.b.png");
    }

    #[test]
    fn upload_filename_falls_back_when_nothing_is_left() {
        assert_eq!(upload_filename(9, ""), "9-upload");
        assert_eq!(upload_filename(9, "dir/"), "9-upload");
        assert_eq!(upload_filename(9, "..."), "9-upload");
    }

    #[test]
    fn generated_filename_format() {
        assert_eq!(generated_filename(1718000000000, "png"), "generated-1718000000000.png");
    }
}
