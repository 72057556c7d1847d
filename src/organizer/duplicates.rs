//! Near-duplicate classification.
//!
//! Rips often contain several copies of the main title that differ only in
//! audio tracks or angle, and so only slightly in size. Those are disposable.
//! Classification never touches the filesystem.

use ripsort_common::{CandidateFile, Error, Result};

/// Default fractional tolerance.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Fixed-point scale for tolerance comparisons (nine decimal places).
const TOLERANCE_SCALE: u128 = 1_000_000_000;

/// Reject tolerances outside `[0, 1)`.
pub fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || !(0.0..1.0).contains(&tolerance) {
        return Err(Error::invalid_input(format!(
            "tolerance must be in [0, 1), got {}",
            tolerance
        )));
    }
    Ok(())
}

/// Whether two sizes are within `tolerance` of each other, relative to the
/// larger one. The bound is inclusive.
///
/// The tolerance is rounded to nine decimal places and the comparison is done
/// in integers, so `0.29` of `100` admits a difference of exactly `29`.
pub fn is_duplicate(principal_size: u64, candidate_size: u64, tolerance: f64) -> bool {
    let diff = u128::from(principal_size.abs_diff(candidate_size));
    let larger = u128::from(principal_size.max(candidate_size));
    let scaled = (tolerance.max(0.0) * TOLERANCE_SCALE as f64).round() as u128;
    diff * TOLERANCE_SCALE <= scaled * larger
}

/// Every file other than the principal whose size is within tolerance of it,
/// in input order.
pub fn find_duplicates<'a>(
    principal: &CandidateFile,
    files: &'a [CandidateFile],
    tolerance: f64,
) -> Vec<&'a CandidateFile> {
    files
        .iter()
        .filter(|f| f.path != principal.path)
        .filter(|f| is_duplicate(principal.size, f.size, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn file(name: &str, size: u64) -> CandidateFile {
        CandidateFile::new(format!("/rips/{}", name), size)
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(is_duplicate(100, 95, 0.05));
        assert!(!is_duplicate(100, 94, 0.05));
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(is_duplicate(100, 105, 0.05), is_duplicate(105, 100, 0.05));
        assert!(is_duplicate(105, 100, 0.05));
        assert!(!is_duplicate(100, 106, 0.05));
    }

    #[test]
    fn test_boundary_is_inclusive_for_inexact_tolerances() {
        // 0.29 * 100 and 0.57 * 100 land just below the integer in f64
        for (tolerance, bound) in [(0.29, 29), (0.57, 57), (0.07, 7), (0.1, 10), (0.3, 30)] {
            assert!(
                is_duplicate(100, 100 - bound, tolerance),
                "{} of 100 rejected at {}",
                bound,
                tolerance
            );
            assert!(
                !is_duplicate(100, 100 - bound - 1, tolerance),
                "{} of 100 accepted at {}",
                bound + 1,
                tolerance
            );
        }
    }

    #[test]
    fn test_boundary_at_disc_sizes() {
        let larger = 2050 * MB;
        let bound = larger / 20;
        assert!(is_duplicate(larger, larger - bound, 0.05));
        assert!(!is_duplicate(larger, larger - bound - 1, 0.05));
    }

    #[test]
    fn test_zero_tolerance_matches_equal_sizes_only() {
        assert!(is_duplicate(100, 100, 0.0));
        assert!(!is_duplicate(100, 99, 0.0));
    }

    #[test]
    fn test_validate_tolerance() {
        validate_tolerance(0.0).unwrap();
        validate_tolerance(0.99).unwrap();
        for bad in [-0.01, 1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(validate_tolerance(bad), Err(Error::InvalidInput(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_equal_sizes_always_duplicate() {
        assert!(is_duplicate(100, 100, 0.0));
        assert!(is_duplicate(0, 0, 0.0));
        assert!(!is_duplicate(100, 99, 0.0));
    }

    #[test]
    fn test_singleton_has_no_duplicates() {
        let files = vec![file("only.mkv", 700 * MB)];
        assert!(find_duplicates(&files[0], &files, 0.5).is_empty());
    }

    #[test]
    fn test_principal_excluded_and_order_kept() {
        let files = vec![
            file("a.mkv", 2000 * MB),
            file("b.mkv", 2050 * MB),
            file("c.mkv", 50 * MB),
            file("d.mkv", 2050 * MB),
        ];

        let dupes = find_duplicates(&files[1], &files, DEFAULT_TOLERANCE);
        let names: Vec<String> = dupes.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.mkv", "d.mkv"]);
    }

    #[test]
    fn test_idempotent() {
        let files = vec![
            file("a.mkv", 1000),
            file("b.mkv", 960),
            file("c.mkv", 10),
        ];

        let first = find_duplicates(&files[0], &files, DEFAULT_TOLERANCE);
        let second = find_duplicates(&files[0], &files, DEFAULT_TOLERANCE);
        assert_eq!(first, second);
    }
}
