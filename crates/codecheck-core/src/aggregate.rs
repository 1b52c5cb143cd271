//! Filtering and score aggregation over parsed file results.

use crate::types::{AggregateReport, FileResult, Filter};

/// Running sum/count of scores, fed one file at a time.
#[derive(Debug, Default, Clone)]
pub struct ScoreAccumulator {
    processed: usize,
    scored: usize,
    sum: f64,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one processed file; `None` counts as processed but unscored.
    pub fn add(&mut self, score: Option<f64>) {
        self.processed += 1;
        if let Some(score) = score {
            self.scored += 1;
            self.sum += score;
        }
    }

    pub fn average(&self) -> Option<f64> {
        (self.scored > 0).then(|| self.sum / self.scored as f64)
    }

    pub fn finish(&self) -> AggregateReport {
        AggregateReport {
            processed_count: self.processed,
            scored_count: self.scored,
            average_score: self.average(),
        }
    }
}

/// Whether a file survives the filter.
///
/// `ErrorsOnly` changes rendering, not selection, so it keeps every file.
/// `ScoresLessThan` drops files without a score.
pub fn keep_file(file: &FileResult, filter: Option<&Filter>) -> bool {
    match filter {
        None | Some(Filter::ErrorsOnly) => true,
        Some(Filter::Select(code)) => file.messages.iter().any(|m| m.code_matches(code)),
        Some(Filter::ScoresLessThan(threshold)) => file.score.is_some_and(|s| s < *threshold),
    }
}

/// Files that survive the filter, in their original order.
pub fn apply_filter(files: Vec<FileResult>, filter: Option<&Filter>) -> Vec<FileResult> {
    files.into_iter().filter(|f| keep_file(f, filter)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    fn scored(path: &str, score: f64) -> FileResult {
        FileResult {
            path: path.into(),
            score: Some(score),
            messages: Vec::new(),
        }
    }

    fn with_codes(path: &str, codes: &[&str]) -> FileResult {
        FileResult {
            path: path.into(),
            score: None,
            messages: codes
                .iter()
                .map(|code| Message {
                    line: Some(1),
                    column: Some(1),
                    code: Some(code.to_string()),
                    text: format!("{path}:1:1: {code} msg"),
                })
                .collect(),
        }
    }

    fn paths(files: &[FileResult]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_average_of_scored_files() {
        let mut acc = ScoreAccumulator::new();
        for s in [10.0, 5.0, 7.5] {
            acc.add(Some(s));
        }
        let report = acc.finish();
        assert_eq!(report.processed_count, 3);
        assert_eq!(report.scored_count, 3);
        assert!((report.average_score.unwrap() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unscored_files_excluded_from_average() {
        let mut acc = ScoreAccumulator::new();
        acc.add(Some(10.0));
        acc.add(None);
        acc.add(Some(5.0));
        let report = acc.finish();
        assert_eq!(report.processed_count, 3);
        assert_eq!(report.scored_count, 2);
        assert!((report.average_score.unwrap() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_scores_no_average() {
        let mut acc = ScoreAccumulator::new();
        assert_eq!(acc.average(), None);
        acc.add(None);
        assert_eq!(acc.finish().average_score, None);
    }

    #[test]
    fn test_select_reports_files_containing_code() {
        let files = vec![
            with_codes("a.py", &["E501", "W291"]),
            with_codes("b.py", &["F401"]),
            with_codes("c.py", &["E501"]),
            with_codes("d.py", &[]),
            with_codes("e.py", &["W291", "F401"]),
        ];

        let e501 = apply_filter(files.clone(), Some(&Filter::Select("E501".into())));
        assert_eq!(paths(&e501), vec!["a.py", "c.py"]);

        let f401 = apply_filter(files.clone(), Some(&Filter::Select("F401".into())));
        assert_eq!(paths(&f401), vec!["b.py", "e.py"]);

        let c901 = apply_filter(files.clone(), Some(&Filter::Select("C901".into())));
        assert!(c901.is_empty());

        let all = apply_filter(files, None);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_select_is_prefix_match() {
        let files = vec![with_codes("a.py", &["E101"]), with_codes("b.py", &["E201"])];
        let e1 = apply_filter(files, Some(&Filter::Select("E1".into())));
        assert_eq!(paths(&e1), vec!["a.py"]);
    }

    #[test]
    fn test_scores_less_than() {
        let files = vec![
            scored("ten.py", 10.0),
            scored("five.py", 5.0),
            scored("seven.py", 7.5),
        ];
        let kept = apply_filter(files, Some(&Filter::ScoresLessThan(8.0)));
        assert_eq!(paths(&kept), vec!["five.py", "seven.py"]);
    }

    #[test]
    fn test_scores_less_than_is_strict() {
        let files = vec![scored("eight.py", 8.0), scored("low.py", 7.99)];
        let kept = apply_filter(files, Some(&Filter::ScoresLessThan(8.0)));
        assert_eq!(paths(&kept), vec!["low.py"]);
    }

    #[test]
    fn test_errors_only_keeps_everything() {
        let files = vec![scored("a.py", 10.0), scored("b.py", 2.0)];
        assert_eq!(apply_filter(files, Some(&Filter::ErrorsOnly)).len(), 2);
    }
}
