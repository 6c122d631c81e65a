use super::Violation;
use crate::network::NetworkModel;

/// Every line must run in at least one of the five time periods: a line
/// whose HEADWAY/FREQ values are all zero (or absent) is a violation.
/// Violations are collected across the whole model, never short-circuited.
pub fn check_frequencies(model: &NetworkModel) -> Vec<Violation> {
    model
        .line_iter()
        .filter(|line| !line.has_service())
        .map(|line| Violation::ZeroFrequency {
            line: line.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::check_frequencies;
    use crate::model::{Entry, Line};
    use crate::network::NetworkModel;
    use crate::validate::Violation;

    fn model_with(lines: Vec<Line>) -> NetworkModel {
        let mut model = NetworkModel::new();
        model.lines = lines.into_iter().map(Entry::Record).collect();
        model
    }

    #[test]
    fn test_all_zero_frequencies_fail() {
        let mut dead = Line::new("DEAD");
        dead.attrs.set("HEADWAY[1]", "0");
        dead.attrs.set("FREQ[4]", "0");
        let violations = check_frequencies(&model_with(vec![dead]));
        assert_eq!(
            violations,
            vec![Violation::ZeroFrequency {
                line: "DEAD".to_string()
            }]
        );
    }

    #[test]
    fn test_any_nonzero_frequency_passes() {
        for period in 1..=5u8 {
            let mut line = Line::new("LIVE");
            line.attrs.set(&format!("FREQ[{period}]"), "30");
            assert!(check_frequencies(&model_with(vec![line])).is_empty());
        }
    }

    #[test]
    fn test_violations_are_collected_not_short_circuited() {
        let violations = check_frequencies(&model_with(vec![
            Line::new("DEAD1"),
            Line::new("DEAD2"),
        ]));
        assert_eq!(violations.len(), 2);
    }
}
