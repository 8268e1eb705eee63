//! Hours/minutes/seconds helpers

use core::fmt::Write;

use heapless::String;

/// Formatted `HH:MM:SS` string
pub type HmsString = String<24>;

/// A duration split into hours, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Split a duration in seconds
    pub const fn from_seconds(total_s: u64) -> Self {
        Self {
            hours: total_s / 3600,
            minutes: (total_s % 3600) / 60,
            seconds: total_s % 60,
        }
    }

    /// Total duration in seconds
    ///
    /// Fields are not required to be normalised (`0:90:00` is 5400s).
    pub const fn to_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// Format seconds as zero-padded `HH:MM:SS`
///
/// Hours grow past two digits rather than wrapping.
pub fn format_hms(total_s: u64) -> HmsString {
    let hms = Hms::from_seconds(total_s);
    let mut out = HmsString::new();
    // 20 digits of hours plus ":MM:SS" fits in 24 bytes
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        hms.hours, hms.minutes, hms.seconds
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let hms = Hms::from_seconds(3725);
        assert_eq!(hms.hours, 1);
        assert_eq!(hms.minutes, 2);
        assert_eq!(hms.seconds, 5);
        assert_eq!(hms.to_seconds(), 3725);
    }

    #[test]
    fn test_unnormalised_fields() {
        let hms = Hms {
            hours: 0,
            minutes: 90,
            seconds: 75,
        };
        assert_eq!(hms.to_seconds(), 5475);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_hms(0).as_str(), "00:00:00");
        assert_eq!(format_hms(855).as_str(), "00:14:15");
        assert_eq!(format_hms(300).as_str(), "00:05:00");
        assert_eq!(format_hms(360_000).as_str(), "100:00:00");
    }

    #[test]
    fn test_format_max() {
        let s = format_hms(u64::MAX);
        assert!(s.ends_with(":15"));
    }
}
