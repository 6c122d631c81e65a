//! Folds parse leaves into typed records, preserving order and comments
//! so a written network reproduces its source layout.

use crate::grammar::{Leaf, LeafTag, Piece};
use cubenet_core::error::ModelError;
use cubenet_core::model::{
    AttrMap, Dialect, Entry, Factor, Faresystem, Line, LinkItem, Linki, Node, PnrLink, Supplink,
    TransitLink, ZacLink,
};
use cubenet_core::network::NetworkFragment;
use indexmap::IndexMap;
use std::fmt;

/// Which record family a file contributes. Routing is supplied by the
/// caller per parse call; [`crate::reader`] derives it from the filename
/// suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Lin,
    Link,
    Pnr,
    Zac,
    Access,
    Xfer,
    Node,
    Pts,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Lin => "lin",
            FileKind::Link => "link",
            FileKind::Pnr => "pnr",
            FileKind::Zac => "zac",
            FileKind::Access => "access",
            FileKind::Xfer => "xfer",
            FileKind::Node => "node",
            FileKind::Pts => "pts",
        };
        write!(f, "{name}")
    }
}

fn tag_name(tag: LeafTag) -> &'static str {
    match tag {
        LeafTag::Smcw => "comment",
        LeafTag::LinAttr | LeafTag::LinNode => "LINE",
        LeafTag::Link => "LINK",
        LeafTag::Factor => "FACTOR",
        LeafTag::Pnr => "PNR",
        LeafTag::Zac => "ZONEACCESS",
        LeafTag::Supplink => "SUPPLINK",
        LeafTag::Faresystem => "FARESYSTEM",
        LeafTag::WaitCrvDef => "WAITCRVDEF",
        LeafTag::CrowdCrvDef => "CROWDCRVDEF",
        LeafTag::Operator => "OPERATOR",
        LeafTag::Mode => "MODE",
        LeafTag::VehicleType => "VEHICLETYPE",
        LeafTag::AccessRow => "node-pair row",
    }
}

/// Fold a leaf sequence into a fragment, routed by file kind. A leaf the
/// kind cannot accept fails the whole conversion; no partial record is
/// ever emitted.
pub fn fold(
    leaves: Vec<Leaf>,
    kind: FileKind,
    source_label: &str,
) -> Result<NetworkFragment, ModelError> {
    let mut fragment = NetworkFragment::new();
    match kind {
        FileKind::Lin => fold_lines(leaves, source_label, &mut fragment)?,
        FileKind::Link => fold_links(leaves, source_label, &mut fragment)?,
        FileKind::Pnr => fold_pnrs(leaves, source_label, &mut fragment)?,
        FileKind::Zac => fold_zacs(leaves, source_label, &mut fragment)?,
        FileKind::Access | FileKind::Xfer | FileKind::Node => {
            fold_rows(leaves, kind, source_label, &mut fragment)?
        }
        FileKind::Pts => fold_pts(leaves, source_label, &mut fragment)?,
    }
    Ok(fragment)
}

fn unexpected(source_label: &str, kind: FileKind, tag: LeafTag) -> ModelError {
    ModelError::UnexpectedRecord {
        source_label: source_label.to_string(),
        kind: kind.to_string(),
        found: tag_name(tag).to_string(),
    }
}

fn leaf_comment(leaf: &Leaf) -> Option<String> {
    leaf.pieces.iter().find_map(|p| match p {
        Piece::Comment(cmt) => Some(cmt.clone()),
        _ => None,
    })
}

fn attrs_of(leaf: &Leaf) -> AttrMap {
    let mut attrs = AttrMap::new();
    for piece in &leaf.pieces {
        if let Piece::Attr { name, value, .. } = piece {
            attrs.set(name, value.clone());
        }
    }
    attrs
}

/// `NAME=` opens a new line; free comments are buffered while a line is
/// open so flushing them on the next `NAME=` keeps the file order intact.
fn fold_lines(
    leaves: Vec<Leaf>,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    let mut current: Option<Line> = None;
    let mut buffered: Vec<String> = Vec::new();

    for leaf in leaves {
        match leaf.tag {
            LeafTag::Smcw => {
                let Some(cmt) = leaf_comment(&leaf) else {
                    continue;
                };
                if let Some(dialect) = Dialect::detect(&cmt) {
                    fragment.dialect = dialect;
                }
                if current.is_some() {
                    buffered.push(cmt);
                } else {
                    fragment.lines.push(Entry::Comment(cmt));
                }
            }
            LeafTag::LinAttr => {
                for piece in &leaf.pieces {
                    let Piece::Attr {
                        name,
                        value,
                        comment,
                    } = piece
                    else {
                        continue;
                    };
                    if name.eq_ignore_ascii_case("NAME") {
                        if let Some(done) = current.take() {
                            fragment.lines.push(Entry::Record(done));
                        }
                        for cmt in buffered.drain(..) {
                            fragment.lines.push(Entry::Comment(cmt));
                        }
                        current = Some(Line::new(value.clone()));
                    } else {
                        let line = current.as_mut().ok_or_else(|| {
                            ModelError::MalformedAttribute {
                                source_label: source_label.to_string(),
                                detail: format!("{name}= before any NAME= opens a line"),
                            }
                        })?;
                        line.attrs.set(name, value.clone());
                    }
                    if let Some(cmt) = comment {
                        if let Some(line) = current.as_mut() {
                            line.comment = Some(cmt.clone());
                        }
                    }
                }
            }
            LeafTag::LinNode => {
                let line =
                    current
                        .as_mut()
                        .ok_or_else(|| ModelError::MalformedAttribute {
                            source_label: source_label.to_string(),
                            detail: "routing node before any NAME= opens a line".to_string(),
                        })?;
                let mut node: Option<Node> = None;
                for piece in &leaf.pieces {
                    match piece {
                        Piece::NodeNum(num) => node = Some(Node::new(*num)),
                        Piece::Attr { name, value, .. } => {
                            if let Some(n) = node.as_mut() {
                                n.attrs.set(name, value.clone());
                            }
                        }
                        Piece::Comment(cmt) => {
                            if let Some(n) = node.as_mut() {
                                n.comment = Some(cmt.clone());
                            }
                        }
                        _ => {}
                    }
                }
                let node = node.ok_or_else(|| ModelError::MalformedAttribute {
                    source_label: source_label.to_string(),
                    detail: "routing node leaf without a node number".to_string(),
                })?;
                line.nodes.push(node);
            }
            LeafTag::Faresystem => fold_faresystem_leaf(&leaf, source_label, fragment)?,
            LeafTag::WaitCrvDef
            | LeafTag::CrowdCrvDef
            | LeafTag::Operator
            | LeafTag::Mode
            | LeafTag::VehicleType => fold_pts_leaf(&leaf, source_label, fragment)?,
            other => return Err(unexpected(source_label, FileKind::Lin, other)),
        }
    }

    if let Some(done) = current.take() {
        fragment.lines.push(Entry::Record(done));
    }
    for cmt in buffered.drain(..) {
        fragment.lines.push(Entry::Comment(cmt));
    }
    Ok(())
}

fn fold_links(
    leaves: Vec<Leaf>,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    for leaf in leaves {
        match leaf.tag {
            LeafTag::Smcw => {
                if let Some(cmt) = leaf_comment(&leaf) {
                    fragment.links.push(Entry::Comment(cmt));
                }
            }
            LeafTag::Link => {
                let (a, b) = leaf.node_pair().ok_or_else(|| {
                    ModelError::UnresolvedNodePair {
                        source_label: source_label.to_string(),
                        detail: "LINK statement without a NODES= pair".to_string(),
                    }
                })?;
                let mut link = TransitLink::new(a, b);
                link.attrs = attrs_of(&leaf);
                link.comment = leaf_comment(&leaf);
                fragment.links.push(Entry::Record(LinkItem::Link(link)));
            }
            LeafTag::Factor => {
                let mut factor = Factor::new();
                factor.attrs = attrs_of(&leaf);
                factor.comment = leaf_comment(&leaf);
                fragment.links.push(Entry::Record(LinkItem::Factor(factor)));
            }
            LeafTag::Supplink => {
                let (a, b) = leaf.node_pair().ok_or_else(|| {
                    ModelError::UnresolvedNodePair {
                        source_label: source_label.to_string(),
                        detail: "SUPPLINK statement without a node pair".to_string(),
                    }
                })?;
                let mut supplink = Supplink::new(a, b);
                supplink.attrs = attrs_of(&leaf);
                supplink.comment = leaf_comment(&leaf);
                fragment.supplinks.push(Entry::Record(supplink));
            }
            other => return Err(unexpected(source_label, FileKind::Link, other)),
        }
    }
    Ok(())
}

fn fold_pnrs(
    leaves: Vec<Leaf>,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    for leaf in leaves {
        match leaf.tag {
            LeafTag::Smcw => {
                if let Some(cmt) = leaf_comment(&leaf) {
                    fragment.pnrs.push(Entry::Comment(cmt));
                }
            }
            LeafTag::Pnr => {
                let id = leaf
                    .pieces
                    .iter()
                    .find_map(|p| match p {
                        Piece::NodePair(a, b) => Some(format!("{a},{b}")),
                        Piece::NodeNum(a) => Some(a.to_string()),
                        _ => None,
                    })
                    .ok_or_else(|| ModelError::UnresolvedNodePair {
                        source_label: source_label.to_string(),
                        detail: "PNR statement without a NODE= identity".to_string(),
                    })?;
                let mut pnr = PnrLink::new(id);
                pnr.attrs = attrs_of(&leaf);
                pnr.comment = leaf_comment(&leaf);
                fragment.pnrs.push(Entry::Record(pnr));
            }
            other => return Err(unexpected(source_label, FileKind::Pnr, other)),
        }
    }
    Ok(())
}

fn fold_zacs(
    leaves: Vec<Leaf>,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    for leaf in leaves {
        match leaf.tag {
            LeafTag::Smcw => {
                if let Some(cmt) = leaf_comment(&leaf) {
                    fragment.zacs.push(Entry::Comment(cmt));
                }
            }
            LeafTag::Zac => {
                let (a, b) = leaf.node_pair().ok_or_else(|| {
                    ModelError::UnresolvedNodePair {
                        source_label: source_label.to_string(),
                        detail: "ZONEACCESS statement without a LINK= pair".to_string(),
                    }
                })?;
                let mut zac = ZacLink::new(a, b);
                zac.attrs = attrs_of(&leaf);
                zac.comment = leaf_comment(&leaf);
                fragment.zacs.push(Entry::Record(zac));
            }
            other => return Err(unexpected(source_label, FileKind::Zac, other)),
        }
    }
    Ok(())
}

/// access/xfer/node files: bare `a b [wnr|pnr] [value]` rows. A float
/// value is a distance, an integer value is a transfer time.
fn fold_rows(
    leaves: Vec<Leaf>,
    kind: FileKind,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    for leaf in leaves {
        match leaf.tag {
            LeafTag::Smcw => {
                let entry = match leaf_comment(&leaf) {
                    Some(cmt) => Entry::Comment(cmt),
                    None => continue,
                };
                match kind {
                    FileKind::Access => fragment.accesslis.push(entry),
                    FileKind::Xfer => fragment.xferlis.push(entry),
                    _ => fragment.nodes.push(entry),
                }
            }
            LeafTag::AccessRow => {
                let mut nums = leaf.pieces.iter().filter_map(|p| match p {
                    Piece::Num(n) => Some(*n),
                    _ => None,
                });
                let (Some(a), Some(b)) = (nums.next(), nums.next()) else {
                    return Err(ModelError::UnresolvedNodePair {
                        source_label: source_label.to_string(),
                        detail: format!("{kind} row needs two node numbers"),
                    });
                };
                let mut linki = Linki::new(a, b);
                linki.xfer_time = nums.next().map(|t| t.to_string());
                for piece in &leaf.pieces {
                    match piece {
                        Piece::FloatVal(fl) => linki.distance = Some(fl.clone()),
                        Piece::AccessTag(tag) => linki.access_type = Some(tag.clone()),
                        Piece::Comment(cmt) => linki.comment = Some(cmt.clone()),
                        _ => {}
                    }
                }
                let entry = Entry::Record(linki);
                match kind {
                    FileKind::Access => fragment.accesslis.push(entry),
                    FileKind::Xfer => fragment.xferlis.push(entry),
                    _ => fragment.nodes.push(entry),
                }
            }
            other => return Err(unexpected(source_label, kind, other)),
        }
    }
    Ok(())
}

fn fold_pts(
    leaves: Vec<Leaf>,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    for leaf in leaves {
        match leaf.tag {
            // PT control files carry no ordered entry stream, so free
            // comments have nowhere to live
            LeafTag::Smcw => {}
            LeafTag::Faresystem => fold_faresystem_leaf(&leaf, source_label, fragment)?,
            LeafTag::WaitCrvDef
            | LeafTag::CrowdCrvDef
            | LeafTag::Operator
            | LeafTag::Mode
            | LeafTag::VehicleType => fold_pts_leaf(&leaf, source_label, fragment)?,
            other => return Err(unexpected(source_label, FileKind::Pts, other)),
        }
    }
    Ok(())
}

fn fold_faresystem_leaf(
    leaf: &Leaf,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    let mut faresystem = Faresystem::new();
    faresystem.attrs = attrs_of(leaf);
    let number = faresystem
        .number()
        .ok_or_else(|| ModelError::MissingNumber {
            source_label: source_label.to_string(),
            statement: "FARESYSTEM".to_string(),
        })?;
    fragment.faresystems.insert(number, faresystem);
    Ok(())
}

fn fold_pts_leaf(
    leaf: &Leaf,
    source_label: &str,
    fragment: &mut NetworkFragment,
) -> Result<(), ModelError> {
    let attrs = attrs_of(leaf);
    let number: u32 = attrs
        .get("NUMBER")
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| ModelError::MissingNumber {
            source_label: source_label.to_string(),
            statement: tag_name(leaf.tag).to_string(),
        })?;
    let category = match leaf.tag {
        LeafTag::WaitCrvDef => &mut fragment.ptsystem.wait_curve_defs,
        LeafTag::CrowdCrvDef => &mut fragment.ptsystem.crowd_curve_defs,
        LeafTag::Operator => &mut fragment.ptsystem.operators,
        LeafTag::Mode => &mut fragment.ptsystem.modes,
        _ => &mut fragment.ptsystem.vehicle_types,
    };
    category.insert(number, attrs);
    Ok(())
}

/// Reads the companion farezone-matrix format: whitespace/comma-delimited
/// rows `<ref> <origin> <dest> <fare> [<fare> ...]`, extra fares
/// incrementing the destination zone. Each row updates every faresystem
/// whose `FAREMATRIX` reference suffix equals the row's ref.
pub fn read_fare_matrix(
    text: &str,
    faresystems: &mut IndexMap<u32, Faresystem>,
    source_label: &str,
) -> Result<(), ModelError> {
    let malformed = |detail: String| ModelError::MalformedAttribute {
        source_label: source_label.to_string(),
        detail,
    };
    for row in text.lines() {
        let row = row.trim();
        if row.is_empty() {
            continue;
        }
        let fields: Vec<&str> = row
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < 4 {
            return Err(malformed(format!("farezone matrix row too short: {row}")));
        }
        let matrix_ref = fields[0];
        let origin: u32 = fields[1]
            .parse()
            .map_err(|_| malformed(format!("bad origin zone in row: {row}")))?;
        let mut dest: u32 = fields[2]
            .parse()
            .map_err(|_| malformed(format!("bad destination zone in row: {row}")))?;
        for fare_field in &fields[3..] {
            let fare: f64 = fare_field
                .parse()
                .map_err(|_| malformed(format!("bad fare value in row: {row}")))?;
            for faresystem in faresystems.values_mut() {
                if faresystem.fare_matrix_id() == Some(matrix_ref) {
                    faresystem.set_farezone_od(origin, dest, fare);
                }
            }
            dest += 1;
        }
    }
    Ok(())
}
