/// Size formatting — human-readable byte counts for listing rows.
///
/// Uses decimal units (1 K = 1000) with truncating integer division, so the
/// rendered value never carries a fractional digit: 1 500 000 bytes is
/// `"1MB"`, not `"1.5MB"`. The suffix ladder stops at `T`; values past
/// 999 TB render with however many digits remain (`"2000TB"`).
use compact_str::{format_compact, CompactString};

const SUFFIXES: [&str; 4] = ["K", "M", "G", "T"];

/// Render a byte count, e.g. `0 → "0B"`, `1000 → "1KB"`, `1500000 → "1MB"`.
pub fn format_size(bytes: u64) -> CompactString {
    let mut value = bytes;
    let mut suffix = "";
    for s in SUFFIXES {
        if value < 1000 {
            break;
        }
        value /= 1000;
        suffix = s;
    }
    format_compact!("{value}{suffix}B")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bytes() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1), "1B");
        assert_eq!(format_size(999), "999B");
    }

    #[test]
    fn decimal_boundaries() {
        assert_eq!(format_size(1000), "1KB");
        assert_eq!(format_size(999_999), "999KB");
        assert_eq!(format_size(1_000_000), "1MB");
        assert_eq!(format_size(1_000_000_000), "1GB");
        assert_eq!(format_size(1_000_000_000_000), "1TB");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 1 500 000 / 1000 / 1000 = 1 (integer division), never 1.5 or 2.
        assert_eq!(format_size(1_500_000), "1MB");
        assert_eq!(format_size(1_999), "1KB");
    }

    #[test]
    fn suffix_ladder_stops_at_tera() {
        assert_eq!(format_size(999_999_999_999_999), "999TB");
        // Past 999 TB there is no further suffix; digits just grow.
        assert_eq!(format_size(2_000_000_000_000_000), "2000TB");
    }
}
