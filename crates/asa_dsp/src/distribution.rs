//! Bin-to-Line Distribution
//!
//! Partitions `b` contiguous FFT bins into `l` output lines. Line `j` gets a
//! run of `g[j]` bins, and the runs always add up to exactly `b`.
//!
//! # Algorithm
//!
//! - `p == 1`: uniform. Every line gets `b / l` bins and the remainder is
//!   spread at even spacing across the line range.
//! - `1 < p <= 2`: line `j` targets the real weight
//!   `b * (1 - p) * p^j / (1 - p^l)` (a normalised geometric series), rounded
//!   up. Rounding up over-allocates by at most one bin per line, and the
//!   surplus is shaved off one bin at a time from the line with the largest
//!   `|g - target| * ln(target)` (first line on ties) until the sum is exact.
//!   Candidates sit in a max-heap, so startup stays `O(l log l)` even for
//!   tens of thousands of lines.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::DspError;

/// Smallest accepted distribution power (uniform)
pub const MIN_POWER: f64 = 1.0;

/// Largest accepted distribution power
pub const MAX_POWER: f64 = 2.0;

/// An immutable partition of `bins` FFT bins into `counts.len()` lines
///
/// Only constructed by [`distribute`], so `counts` always sums to `bins`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDistribution {
    counts: Vec<usize>,
    bins: usize,
}

impl LineDistribution {
    /// Number of bins folded into each line, in line order
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of output lines
    pub fn lines(&self) -> usize {
        self.counts.len()
    }

    /// Total number of bins covered
    pub fn bins(&self) -> usize {
        self.bins
    }
}

/// Distribute `bins` bins to `lines` lines following the power curve `power`
///
/// # Arguments
/// * `bins` - Number of retained FFT bins (`b`)
/// * `lines` - Number of output lines (`l`), `1 <= l <= b`
/// * `power` - Curve shape (`p`), `1.0` is uniform, up to `2.0`
pub fn distribute(bins: usize, lines: usize, power: f64) -> Result<LineDistribution, DspError> {
    if lines == 0 || lines > bins {
        return Err(DspError::InvalidLineCount { bins, lines });
    }
    if !(MIN_POWER..=MAX_POWER).contains(&power) {
        return Err(DspError::InvalidPower(power));
    }

    let counts = if (power - 1.0).abs() < f64::EPSILON {
        distribute_uniform(bins, lines)
    } else {
        distribute_power(bins, lines, power)?
    };

    let sum: usize = counts.iter().sum();
    if sum != bins {
        return Err(DspError::DistributionMismatch { sum, bins });
    }

    Ok(LineDistribution { counts, bins })
}

/// Uniform case, the removable singularity of the power formula at `p = 1`
fn distribute_uniform(bins: usize, lines: usize) -> Vec<usize> {
    let mut counts = vec![bins / lines; lines];
    let missing = bins % lines;

    // missing < lines, so step > 1 and every k lands on a distinct line
    let step = lines as f64 / (1 + missing) as f64;
    for k in 1..=missing {
        let index = ((k as f64 * step).floor() as usize).min(lines - 1);
        counts[index] += 1;
    }

    counts
}

/// Real-valued target weight of every line
///
/// Written as `p^(j - l) / (1 - p^-l)` so large `l` cannot overflow `p^l`.
fn power_targets(bins: usize, lines: usize, power: f64) -> Vec<f64> {
    let norm = bins as f64 * (power - 1.0) / (1.0 - power.powi(-(lines as i32)));
    (0..lines)
        .map(|j| norm * power.powi(j as i32 - lines as i32))
        .collect()
}

/// Surplus-removal candidate, ordered by weight, then by lowest line index
#[derive(Debug, Clone, Copy)]
struct Candidate {
    weight: f64,
    line: usize,
}

impl Candidate {
    /// `None` once the line is down to a single bin
    fn new(line: usize, count: usize, target: f64) -> Option<Self> {
        (count > 1).then(|| Self {
            weight: (count as f64 - target).abs() * target.ln(),
            line,
        })
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.line.cmp(&self.line))
    }
}

fn distribute_power(bins: usize, lines: usize, power: f64) -> Result<Vec<usize>, DspError> {
    let targets = power_targets(bins, lines, power);
    let mut counts: Vec<usize> = targets
        .iter()
        .map(|t| (t.ceil() as usize).max(1))
        .collect();
    let mut sum: usize = counts.iter().sum();

    // Only the shaved line changes weight, so every line keeps exactly one
    // live entry and each removal costs O(log l)
    let mut candidates: BinaryHeap<Candidate> = counts
        .iter()
        .zip(&targets)
        .enumerate()
        .filter_map(|(j, (&count, &target))| Candidate::new(j, count, target))
        .collect();

    // Each ceil adds less than one bin, so at most `lines` removals
    let mut iterations = 0;
    while sum > bins {
        if iterations == lines {
            return Err(DspError::DistributionMismatch { sum, bins });
        }

        // sum > bins >= lines means some line still holds more than one bin
        let Some(Candidate { line, .. }) = candidates.pop() else {
            return Err(DspError::DistributionMismatch { sum, bins });
        };
        counts[line] -= 1;
        candidates.extend(Candidate::new(line, counts[line], targets[line]));
        sum -= 1;
        iterations += 1;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Plain linear-scan shave, for comparison with the heap
    fn shave_by_scan(bins: usize, lines: usize, power: f64) -> Vec<usize> {
        let targets = power_targets(bins, lines, power);
        let mut counts: Vec<usize> = targets.iter().map(|t| (t.ceil() as usize).max(1)).collect();
        while counts.iter().sum::<usize>() > bins {
            let mut victim: Option<(usize, f64)> = None;
            for (j, (&count, &target)) in counts.iter().zip(&targets).enumerate() {
                if count <= 1 {
                    continue;
                }
                let weight = (count as f64 - target).abs() * target.ln();
                if victim.map_or(true, |(_, best)| weight > best) {
                    victim = Some((j, weight));
                }
            }
            counts[victim.unwrap().0] -= 1;
        }
        counts
    }

    #[test]
    fn test_candidate_order() {
        let low = Candidate { weight: 0.5, line: 0 };
        let high = Candidate { weight: 2.0, line: 3 };
        let tie = Candidate { weight: 2.0, line: 1 };
        assert!(high > low);
        // Equal weights favour the earlier line
        assert!(tie > high);
        assert!(Candidate::new(4, 1, 0.7).is_none());
    }

    #[test]
    fn test_many_lines_stay_fast() {
        let start = std::time::Instant::now();
        let g = distribute(65536, 32768, 1.0001).unwrap();
        assert_eq!(g.counts().iter().sum::<usize>(), 65536);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_uniform_exact_division() {
        let g = distribute(12, 4, 1.0).unwrap();
        assert_eq!(g.counts(), &[3, 3, 3, 3]);
        assert_eq!(g.bins(), 12);
        assert_eq!(g.lines(), 4);
    }

    #[test]
    fn test_uniform_spreads_remainder() {
        // 2 leftover bins over 10 lines: step 10/3 puts them at lines 3 and 6
        let g = distribute(32, 10, 1.0).unwrap();
        assert_eq!(g.counts(), &[3, 3, 3, 4, 3, 3, 4, 3, 3, 3]);
    }

    #[test]
    fn test_single_line_takes_everything() {
        assert_eq!(distribute(17, 1, 1.0).unwrap().counts(), &[17]);
        assert_eq!(distribute(17, 1, 1.7).unwrap().counts(), &[17]);
    }

    #[test]
    fn test_one_bin_per_line() {
        assert_eq!(distribute(5, 5, 2.0).unwrap().counts(), &[1; 5]);
    }

    #[test]
    fn test_power_two_doubles() {
        // Targets are exactly 1, 2, 4, 8
        let g = distribute(15, 4, 2.0).unwrap();
        assert_eq!(g.counts(), &[1, 2, 4, 8]);
    }

    #[test]
    fn test_power_is_non_decreasing() {
        let g = distribute(1024, 32, 1.2).unwrap();
        for pair in g.counts().windows(2) {
            assert!(pair[0] <= pair[1] + 1, "{:?}", g.counts());
        }
        assert!(g.counts()[31] > g.counts()[0]);
    }

    #[test]
    fn test_large_line_count_does_not_overflow() {
        let g = distribute(60000, 4000, 2.0).unwrap();
        assert_eq!(g.counts().iter().sum::<usize>(), 60000);
        assert!(g.counts().iter().all(|&c| c >= 1));
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            distribute(4, 0, 1.0),
            Err(DspError::InvalidLineCount { bins: 4, lines: 0 })
        );
        assert_eq!(
            distribute(4, 5, 1.0),
            Err(DspError::InvalidLineCount { bins: 4, lines: 5 })
        );
        assert!(matches!(distribute(4, 2, 0.5), Err(DspError::InvalidPower(_))));
        assert!(matches!(distribute(4, 2, 2.5), Err(DspError::InvalidPower(_))));
        assert!(matches!(
            distribute(4, 2, f64::NAN),
            Err(DspError::InvalidPower(_))
        ));
    }

    proptest! {
        #[test]
        fn test_sum_is_exact(
            (bins, lines) in (1usize..5000).prop_flat_map(|b| (Just(b), 1..=b)),
            power in 1.0f64..=2.0,
        ) {
            let g = distribute(bins, lines, power).unwrap();
            prop_assert_eq!(g.counts().len(), lines);
            prop_assert_eq!(g.counts().iter().sum::<usize>(), bins);
        }

        #[test]
        fn test_every_line_gets_a_bin(
            (bins, lines) in (1usize..5000).prop_flat_map(|b| (Just(b), 1..=b)),
            power in 1.0f64..=2.0,
        ) {
            let g = distribute(bins, lines, power).unwrap();
            prop_assert!(g.counts().iter().all(|&c| c >= 1));
        }

        #[test]
        fn test_uniform_spread_is_at_most_one(
            (bins, lines) in (1usize..5000).prop_flat_map(|b| (Just(b), 1..=b)),
        ) {
            let g = distribute(bins, lines, 1.0).unwrap();
            let max = g.counts().iter().max().unwrap();
            let min = g.counts().iter().min().unwrap();
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn test_heap_matches_linear_scan(
            (bins, lines) in (2usize..1500).prop_flat_map(|b| (Just(b), 1..=b)),
            power in 1.0001f64..=2.0,
        ) {
            let g = distribute(bins, lines, power).unwrap();
            prop_assert_eq!(
                g.counts(),
                &shave_by_scan(bins, lines, power)[..]
            );
        }

        #[test]
        fn test_distribution_is_deterministic(
            (bins, lines) in (1usize..2000).prop_flat_map(|b| (Just(b), 1..=b)),
            power in 1.0f64..=2.0,
        ) {
            prop_assert_eq!(
                distribute(bins, lines, power).unwrap(),
                distribute(bins, lines, power).unwrap()
            );
        }
    }
}
