//! File-level entry points: read a line file to a string, derive its kind
//! from the filename suffix, and parse it into a network fragment.

use crate::convert::{self, FileKind};
use crate::error::ParseError;
use crate::grammar;
use cubenet_core::network::NetworkFragment;
use std::path::Path;

/// file kind from the filename suffix, the upstream routing convention.
pub fn file_kind(path: &Path) -> Option<FileKind> {
    let suffix = path.extension()?.to_str()?;
    match suffix.to_lowercase().as_str() {
        "lin" => Some(FileKind::Lin),
        "link" => Some(FileKind::Link),
        "pnr" => Some(FileKind::Pnr),
        "zac" => Some(FileKind::Zac),
        "access" => Some(FileKind::Access),
        "xfer" => Some(FileKind::Xfer),
        "node" => Some(FileKind::Node),
        "pts" => Some(FileKind::Pts),
        _ => None,
    }
}

/// Parse one file's text into a fragment. The whole text is buffered
/// before parsing; there is no streaming mode.
pub fn parse_text(
    text: &str,
    kind: FileKind,
    source_label: &str,
) -> Result<NetworkFragment, ParseError> {
    let leaves = grammar::parse(text)?;
    let fragment = convert::fold(leaves, kind, source_label)?;
    log::debug!(
        "parsed {source_label} as {kind}: {} lines, {} links, {} pnrs",
        fragment.line_count(),
        fragment.links.len(),
        fragment.pnrs.len()
    );
    Ok(fragment)
}

/// Read and parse one file, deriving its kind from the suffix.
pub fn read_fragment(path: &Path) -> Result<NetworkFragment, ParseError> {
    let kind = file_kind(path).ok_or_else(|| ParseError::UnknownFileKind {
        path: path.display().to_string(),
    })?;
    let text = std::fs::read_to_string(path)?;
    parse_text(&text, kind, &path.display().to_string())
}

#[cfg(test)]
mod test {
    use super::{file_kind, parse_text, FileKind};

    #[test]
    fn test_suffix_routing() {
        use std::path::Path;
        assert_eq!(file_kind(Path::new("muni.lin")), Some(FileKind::Lin));
        assert_eq!(file_kind(Path::new("a/b/stops.ACCESS")), Some(FileKind::Access));
        assert_eq!(file_kind(Path::new("system.pts")), Some(FileKind::Pts));
        assert_eq!(file_kind(Path::new("readme.md")), None);
        assert_eq!(file_kind(Path::new("no_suffix")), None);
    }

    #[test]
    fn test_parse_text_routes_by_kind() {
        let fragment = parse_text("1 2 0.5\n", FileKind::Xfer, "t.xfer").unwrap();
        assert_eq!(fragment.xferlis.len(), 1);
        assert!(fragment.accesslis.is_empty());
    }

    #[test]
    fn test_parse_merge_validate_diff_pipeline() {
        use cubenet_core::diff::{diff, PropertyChange, RouteComparison};
        use cubenet_core::network::NetworkModel;
        use cubenet_core::validate::{self, ModelType, Violation};

        let base_lin = concat!(
            ";;<<PT>><<LINE>>;;\n",
            "LINE NAME=\"0_452-111_452_pk1\", MODE=\"5\", HEADWAY[1]=10\n",
            " N=39249, -39240, 54648\n",
        );
        let build_lin = base_lin.replace("HEADWAY[1]=10", "HEADWAY[1]=15");

        let mut base = NetworkModel::new();
        base.merge(
            parse_text(base_lin, FileKind::Lin, "base.lin").unwrap(),
            "base.lin",
            true,
        )
        .unwrap();
        let mut build = NetworkModel::new();
        build
            .merge(
                parse_text(&build_lin, FileKind::Lin, "build.lin").unwrap(),
                "build.lin",
                true,
            )
            .unwrap();

        validate::validate(&base, ModelType::Champ).unwrap();
        // the 17-character name is fine in memory but not writable
        let err = validate::validate_for_write(&base).unwrap_err();
        assert!(matches!(err.violations[0], Violation::NameTooLong { len: 17, .. }));

        let comparisons = diff(&base, &build);
        assert_eq!(comparisons.len(), 1);
        let RouteComparison::Matched {
            property_changes,
            shape_changed,
            ..
        } = &comparisons[0]
        else {
            panic!("expected a matched route");
        };
        assert_eq!(
            property_changes,
            &vec![PropertyChange {
                property: "headway_secs".to_string(),
                change: Some(300.0),
                set: None,
            }]
        );
        assert!(!shape_changed);
    }
}
