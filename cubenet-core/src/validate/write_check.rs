use super::Violation;
use crate::network::NetworkModel;

/// maximum line-name length Cube will re-ingest.
pub const MAX_LINE_NAME_LEN: usize = 12;

/// Write-time invariants the external writer depends on: pairwise-distinct
/// upper-cased line names, names of at most 12 characters, and no stop
/// repeated anywhere except exactly first-and-last.
pub fn check_write_invariants(model: &NetworkModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen: Vec<(String, &str)> = Vec::new();

    for line in model.line_iter() {
        let key = line.name_key();
        if key.len() > MAX_LINE_NAME_LEN {
            violations.push(Violation::NameTooLong {
                line: line.name.clone(),
                len: key.len(),
            });
        }
        if let Some((_, first)) = seen.iter().find(|(k, _)| *k == key) {
            violations.push(Violation::DuplicateName {
                key: key.clone(),
                first: first.to_string(),
                second: line.name.clone(),
            });
        } else {
            seen.push((key, line.name.as_str()));
        }

        for station in line.duplicate_stops() {
            violations.push(Violation::DuplicateStop {
                line: line.name.clone(),
                station,
            });
        }
    }

    violations
}

#[cfg(test)]
mod test {
    use super::check_write_invariants;
    use crate::model::{Entry, Line, Node};
    use crate::network::NetworkModel;
    use crate::validate::{validate_for_write, Violation};

    fn model_with(lines: Vec<Line>) -> NetworkModel {
        let mut model = NetworkModel::new();
        model.lines = lines.into_iter().map(Entry::Record).collect();
        model
    }

    #[test]
    fn test_names_differing_only_by_case_collide() {
        let model = model_with(vec![Line::new("mun_49"), Line::new("MUN_49")]);
        let violations = check_write_invariants(&model);
        assert!(matches!(
            violations.as_slice(),
            [Violation::DuplicateName { key, .. }] if key == "MUN_49"
        ));
        assert!(validate_for_write(&model).is_err());
    }

    #[test]
    fn test_name_over_twelve_characters() {
        let model = model_with(vec![Line::new("0_452-111_452_pk1")]);
        let violations = check_write_invariants(&model);
        assert!(matches!(
            violations.as_slice(),
            [Violation::NameTooLong { len: 17, .. }]
        ));
    }

    #[test]
    fn test_interior_duplicate_stop_fails_write() {
        let mut line = Line::new("LOOP");
        line.nodes = [10, 20, 10, 30].iter().map(|n| Node::new(*n)).collect();
        assert!(validate_for_write(&model_with(vec![line])).is_err());
    }

    #[test]
    fn test_clean_model_passes() {
        let mut line = Line::new("MUN_49");
        line.nodes = [10, 20, 30, 10].iter().map(|n| Node::new(*n)).collect();
        assert!(validate_for_write(&model_with(vec![line])).is_ok());
    }
}
