use super::NetworkFragment;
use crate::error::{CollisionError, ModelError};
use crate::model::{
    Dialect, Entry, Faresystem, Line, LinkItem, Linki, PnrLink, PtSystem, Supplink, ZacLink,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// a merge is fatal either because the composition is structurally invalid
/// (mixed dialects) or because a unique identity collided.
#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Collision(#[from] CollisionError),
}

/// The aggregate transit network: ordered entry sequences per record
/// family, PNR buckets keyed by source-file base name, and NUMBER-keyed
/// faresystem / PT system maps. Fragments fold in through [`merge`].
///
/// [`merge`]: NetworkModel::merge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkModel {
    pub dialect: Dialect,
    pub lines: Vec<Entry<Line>>,
    pub links: Vec<Entry<LinkItem>>,
    pub zacs: Vec<Entry<ZacLink>>,
    pub supplinks: Vec<Entry<Supplink>>,
    pub accesslis: Vec<Entry<Linki>>,
    pub xferlis: Vec<Entry<Linki>>,
    pub nodes: Vec<Entry<Linki>>,
    pub pnrs: IndexMap<String, Vec<Entry<PnrLink>>>,
    pub faresystems: IndexMap<u32, Faresystem>,
    pub ptsystem: PtSystem,
}

impl NetworkModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a fragment's records into this network.
    ///
    /// A line whose name is already present replaces the old one in place
    /// when `insert_or_replace` is set; otherwise the old line is removed
    /// and the new one appended at the end. Every appended block is
    /// preceded by a generated `From: <source_label>` marker comment.
    /// Non-identity-keyed records (links, ZACs, support links) always
    /// append, so merging the same fragment twice without replacement
    /// intentionally duplicates them (legacy overlay semantics).
    pub fn merge(
        &mut self,
        fragment: NetworkFragment,
        source_label: &str,
        insert_or_replace: bool,
    ) -> Result<(), MergeError> {
        let mut logstr = format!("merging {source_label}:");

        if !fragment.lines.is_empty() {
            logstr.push_str(&format!(" {} lines", fragment.line_count()));
            if self.line_count() == 0 {
                self.dialect = fragment.dialect;
            } else if !self.dialect.compatible_with(fragment.dialect) {
                return Err(ModelError::MixedDialects {
                    model: self.dialect.to_string(),
                    fragment: fragment.dialect.to_string(),
                }
                .into());
            }

            let mut extend: Vec<Entry<Line>> = Vec::new();
            for entry in fragment.lines {
                match entry {
                    Entry::Comment(cmt) => extend.push(Entry::Comment(cmt)),
                    Entry::Record(line) => match self.line_position(&line.name) {
                        Some(idx) if insert_or_replace => {
                            self.lines[idx] = Entry::Record(line);
                        }
                        Some(idx) => {
                            self.lines.remove(idx);
                            extend.push(Entry::Record(line));
                        }
                        None => extend.push(Entry::Record(line)),
                    },
                }
            }
            if !extend.is_empty() {
                self.lines.push(Entry::Comment(from_marker(source_label)));
                self.lines.extend(extend);
            }
        }

        append_block(&mut self.links, fragment.links, source_label, &mut logstr, "links");
        append_block(&mut self.zacs, fragment.zacs, source_label, &mut logstr, "zacs");
        append_block(
            &mut self.supplinks,
            fragment.supplinks,
            source_label,
            &mut logstr,
            "supplinks",
        );
        append_block(
            &mut self.accesslis,
            fragment.accesslis,
            source_label,
            &mut logstr,
            "access links",
        );
        append_block(
            &mut self.xferlis,
            fragment.xferlis,
            source_label,
            &mut logstr,
            "xfer links",
        );
        append_block(&mut self.nodes, fragment.nodes, source_label, &mut logstr, "nodes");

        if !fragment.pnrs.is_empty() {
            let bucket_key = source_base_name(source_label);
            logstr.push_str(&format!(" {} {}_PNRs", fragment.pnrs.len(), bucket_key));
            let bucket = self.pnrs.entry(bucket_key).or_default();
            bucket.push(Entry::Comment(from_marker(source_label)));
            bucket.extend(fragment.pnrs);
        }

        for (number, faresystem) in fragment.faresystems {
            match self.faresystems.get(&number) {
                Some(existing) if *existing != faresystem => {
                    log::error!("existing FARESYSTEM NUMBER={number}: {existing}");
                    log::error!("incoming FARESYSTEM NUMBER={number}: {faresystem}");
                    return Err(CollisionError::Faresystem { number }.into());
                }
                Some(_) => {}
                None => {
                    self.faresystems.insert(number, faresystem);
                }
            }
        }

        if !fragment.ptsystem.is_empty() {
            self.ptsystem.merge(fragment.ptsystem)?;
        }

        log::debug!("{logstr} ...done");
        Ok(())
    }

    /// a fresh iterator over the typed lines in declaration order, skipping
    /// comment entries. Construct a new one per traversal; it is not safe
    /// across concurrent mutation.
    pub fn line_iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter_map(Entry::record)
    }

    /// exact lookup by case-insensitive line name.
    pub fn line(&self, name: &str) -> Option<&Line> {
        self.line_iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn line_count(&self) -> usize {
        self.line_iter().count()
    }

    fn line_position(&self, name: &str) -> Option<usize> {
        self.lines.iter().position(|entry| {
            entry
                .record()
                .is_some_and(|l| l.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.links.is_empty() && self.pnrs.is_empty()
    }
}

fn from_marker(source_label: &str) -> String {
    format!(";######################### From: {source_label}")
}

fn source_base_name(source_label: &str) -> String {
    Path::new(source_label)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_label)
        .to_string()
}

fn append_block<T>(
    into: &mut Vec<Entry<T>>,
    from: Vec<Entry<T>>,
    source_label: &str,
    logstr: &mut String,
    what: &str,
) {
    if from.is_empty() {
        return;
    }
    logstr.push_str(&format!(" {} {what}", from.len()));
    into.push(Entry::Comment(from_marker(source_label)));
    into.extend(from);
}

#[cfg(test)]
mod test {
    use super::{MergeError, NetworkModel};
    use crate::error::CollisionError;
    use crate::model::{Dialect, Entry, Faresystem, Line, PnrLink};
    use crate::network::NetworkFragment;

    fn named_line(name: &str, headway: &str) -> Line {
        let mut line = Line::new(name);
        line.attrs.set("MODE", "5");
        line.attrs.set("HEADWAY[1]", headway);
        line
    }

    fn fragment_with_lines(lines: &[(&str, &str)]) -> NetworkFragment {
        let mut fragment = NetworkFragment::new();
        for (name, headway) in lines {
            fragment.lines.push(Entry::Record(named_line(name, headway)));
        }
        fragment
    }

    #[test]
    fn test_replace_merge_is_idempotent_for_lines() {
        let mut model = NetworkModel::new();
        let fragment = fragment_with_lines(&[("A", "10"), ("B", "20")]);
        model.merge(fragment.clone(), "base.lin", true).unwrap();
        let names_once: Vec<String> = model.line_iter().map(|l| l.name.clone()).collect();

        model.merge(fragment, "base.lin", true).unwrap();
        let names_twice: Vec<String> = model.line_iter().map(|l| l.name.clone()).collect();
        assert_eq!(names_once, names_twice);
        assert_eq!(model.line_count(), 2);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut model = NetworkModel::new();
        model
            .merge(fragment_with_lines(&[("A", "10"), ("B", "20")]), "base.lin", true)
            .unwrap();
        model
            .merge(fragment_with_lines(&[("a", "15")]), "update.lin", true)
            .unwrap();

        let lines: Vec<&Line> = model.line_iter().collect();
        assert_eq!(lines[0].name, "a");
        assert_eq!(lines[0].attrs.get("HEADWAY[1]"), Some("15"));
        assert_eq!(lines[1].name, "B");
    }

    #[test]
    fn test_non_replace_moves_line_to_end() {
        let mut model = NetworkModel::new();
        model
            .merge(fragment_with_lines(&[("A", "10"), ("B", "20")]), "base.lin", false)
            .unwrap();
        model
            .merge(fragment_with_lines(&[("A", "15")]), "overlay.lin", false)
            .unwrap();

        let names: Vec<String> = model.line_iter().map(|l| l.name.clone()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(model.line("A").unwrap().attrs.get("HEADWAY[1]"), Some("15"));
    }

    #[test]
    fn test_appended_blocks_carry_from_marker() {
        let mut model = NetworkModel::new();
        model
            .merge(fragment_with_lines(&[("A", "10")]), "routes/base.lin", true)
            .unwrap();
        match &model.lines[0] {
            Entry::Comment(cmt) => assert!(cmt.contains("From: routes/base.lin")),
            other => panic!("expected marker comment, got {other:?}"),
        }
    }

    #[test]
    fn test_dialect_adopted_then_enforced() {
        let mut model = NetworkModel::new();
        let mut pt = fragment_with_lines(&[("A", "10")]);
        pt.dialect = Dialect::Pt;
        model.merge(pt, "a.lin", true).unwrap();
        assert_eq!(model.dialect, Dialect::Pt);

        let mut unknown = fragment_with_lines(&[("B", "10")]);
        unknown.dialect = Dialect::Unknown;
        model.merge(unknown, "b.lin", true).unwrap();

        let mut trnbuild = fragment_with_lines(&[("C", "10")]);
        trnbuild.dialect = Dialect::Trnbuild;
        assert!(matches!(
            model.merge(trnbuild, "c.lin", true),
            Err(MergeError::Model(_))
        ));
    }

    #[test]
    fn test_faresystem_collision_only_on_content_mismatch() {
        let mut base = NetworkFragment::new();
        let mut fs = Faresystem::new();
        fs.attrs.set("NUMBER", "5");
        fs.attrs.set("NAME", "cash");
        base.faresystems.insert(5, fs.clone());

        let mut model = NetworkModel::new();
        model.merge(base.clone(), "a.lin", true).unwrap();
        // identical content is a no-op
        model.merge(base, "b.lin", true).unwrap();

        let mut conflicting = NetworkFragment::new();
        let mut fs2 = Faresystem::new();
        fs2.attrs.set("NUMBER", "5");
        fs2.attrs.set("NAME", "clipper");
        conflicting.faresystems.insert(5, fs2);
        assert!(matches!(
            model.merge(conflicting, "c.lin", true),
            Err(MergeError::Collision(CollisionError::Faresystem { number: 5 }))
        ));

        let mut different_id = NetworkFragment::new();
        let mut fs9 = Faresystem::new();
        fs9.attrs.set("NUMBER", "9");
        different_id.faresystems.insert(9, fs9);
        assert!(model.merge(different_id, "d.lin", true).is_ok());
    }

    #[test]
    fn test_pnrs_bucket_by_source_base_name() {
        let mut fragment = NetworkFragment::new();
        fragment.pnrs.push(Entry::Record(PnrLink::new("24670,13301")));

        let mut model = NetworkModel::new();
        model.merge(fragment.clone(), "lots/bart.pnr", false).unwrap();
        model.merge(fragment, "lots/bart.pnr", false).unwrap();

        let bucket = model.pnrs.get("bart").unwrap();
        let records = bucket.iter().filter(|e| e.record().is_some()).count();
        assert_eq!(records, 2);
    }

    #[test]
    fn test_line_iter_skips_comments_and_restarts() {
        let mut fragment = fragment_with_lines(&[("A", "10"), ("B", "20")]);
        fragment.lines.insert(1, Entry::Comment("; overlay".to_string()));

        let mut model = NetworkModel::new();
        model.merge(fragment, "base.lin", true).unwrap();

        let first: Vec<&str> = model.line_iter().map(|l| l.name.as_str()).collect();
        let second: Vec<&str> = model.line_iter().map(|l| l.name.as_str()).collect();
        assert_eq!(first, vec!["A", "B"]);
        assert_eq!(first, second);
    }
}
