//! Bar/space run-length extraction and shape validation.

use super::config::PatternLimits;
use crate::models::{Run, RunLengthPattern, RunState};
use thiserror::Error;

/// Why a run-length pattern does not look like a barcode
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternRejection {
    #[error("{0} runs is too few")]
    TooFewRuns(usize),
    #[error("{0} runs is too many")]
    TooManyRuns(usize),
    #[error("only {0} distinct run widths")]
    TooUniform(usize),
    #[error("{0} consecutive runs share one width")]
    RepeatedWidths(usize),
    #[error("widest run is {0:.1}x the narrowest")]
    WidthRatio(f32),
}

/// Split one scan line into bar/space runs.
///
/// The line is thresholded at its own mean: pixels at or below the mean are
/// bars, brighter pixels are spaces.
pub fn extract_run_pattern(line: &[u8]) -> RunLengthPattern {
    if line.is_empty() {
        return RunLengthPattern::default();
    }

    let mean = line.iter().map(|&p| p as f64).sum::<f64>() / line.len() as f64;
    let state_of = |p: u8| {
        if p as f64 <= mean {
            RunState::Bar
        } else {
            RunState::Space
        }
    };

    let mut runs = Vec::new();
    let mut current = state_of(line[0]);
    let mut width = 0u32;
    for &p in line {
        let state = state_of(p);
        if state == current {
            width += 1;
        } else {
            runs.push(Run {
                state: current,
                width,
            });
            current = state;
            width = 1;
        }
    }
    runs.push(Run {
        state: current,
        width,
    });

    RunLengthPattern::from_runs(runs)
}

/// Check the pattern against the barcode shape heuristics
pub fn validate_pattern(
    pattern: &RunLengthPattern,
    limits: &PatternLimits,
) -> Result<(), PatternRejection> {
    let len = pattern.len();
    if len < limits.min_runs {
        return Err(PatternRejection::TooFewRuns(len));
    }
    if len > limits.max_runs {
        return Err(PatternRejection::TooManyRuns(len));
    }

    let mut distinct: Vec<u32> = pattern.widths().collect();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < limits.min_distinct_widths {
        return Err(PatternRejection::TooUniform(distinct.len()));
    }

    let streak = longest_equal_streak(pattern);
    if streak > limits.max_equal_streak {
        return Err(PatternRejection::RepeatedWidths(streak));
    }

    // distinct is sorted and non-empty here
    let (min, max) = (distinct[0], distinct[distinct.len() - 1]);
    let ratio = max as f32 / min.max(1) as f32;
    if ratio > limits.max_width_ratio {
        return Err(PatternRejection::WidthRatio(ratio));
    }

    Ok(())
}

/// Length of the longest run of neighbouring runs with identical width
fn longest_equal_streak(pattern: &RunLengthPattern) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for width in pattern.widths() {
        if previous == Some(width) {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
        previous = Some(width);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(ws: &[u32]) -> RunLengthPattern {
        RunLengthPattern::from_widths(RunState::Bar, ws)
    }

    fn limits() -> PatternLimits {
        PatternLimits::default()
    }

    /// Render widths as a 0/255 scan line starting with a bar
    fn line_from(ws: &[u32]) -> Vec<u8> {
        ws.iter()
            .enumerate()
            .flat_map(|(i, &w)| {
                let value = if i % 2 == 0 { 0 } else { 255 };
                std::iter::repeat_n(value, w as usize)
            })
            .collect()
    }

    #[test]
    fn test_extract_runs() {
        let ws = [2, 1, 3, 1, 1, 4];
        let pattern = extract_run_pattern(&line_from(&ws));
        assert_eq!(pattern.widths().collect::<Vec<_>>(), ws);
        assert_eq!(pattern.runs()[0].state, RunState::Bar);
        assert_eq!(pattern.runs()[1].state, RunState::Space);
    }

    #[test]
    fn test_extract_uniform_line() {
        let pattern = extract_run_pattern(&[90; 12]);
        assert_eq!(pattern.len(), 1);
        assert!(extract_run_pattern(&[]).is_empty());
    }

    #[test]
    fn test_valid_pattern() {
        let ws = [2, 1, 1, 3, 1, 2, 2, 1, 3, 1, 1, 2];
        assert_eq!(validate_pattern(&widths(&ws), &limits()), Ok(()));
    }

    #[test]
    fn test_single_repeated_width_rejected() {
        let ws = [2; 20];
        assert!(validate_pattern(&widths(&ws), &limits()).is_err());
    }

    #[test]
    fn test_run_count_bounds() {
        let short = [1, 2, 3, 1, 2, 3, 1, 2, 3];
        assert_eq!(
            validate_pattern(&widths(&short), &limits()),
            Err(PatternRejection::TooFewRuns(9))
        );

        let long: Vec<u32> = (0..201).map(|i| [1, 2, 3][i % 3]).collect();
        assert_eq!(
            validate_pattern(&widths(&long), &limits()),
            Err(PatternRejection::TooManyRuns(201))
        );

        let at_limit: Vec<u32> = (0..200).map(|i| [1, 2, 3][i % 3]).collect();
        assert_eq!(validate_pattern(&widths(&at_limit), &limits()), Ok(()));
    }

    #[test]
    fn test_three_equal_neighbours_rejected() {
        let ws = [1, 2, 3, 3, 3, 1, 2, 1, 2, 1, 3];
        assert_eq!(
            validate_pattern(&widths(&ws), &limits()),
            Err(PatternRejection::RepeatedWidths(3))
        );
    }

    #[test]
    fn test_extreme_ratio_rejected() {
        let ws = [1, 2, 3, 1, 2, 11, 1, 2, 3, 1, 2];
        assert!(matches!(
            validate_pattern(&widths(&ws), &limits()),
            Err(PatternRejection::WidthRatio(_))
        ));
    }
}
