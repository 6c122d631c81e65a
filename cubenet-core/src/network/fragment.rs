use crate::model::{
    Dialect, Entry, Faresystem, Line, LinkItem, Linki, PnrLink, PtSystem, Supplink, ZacLink,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything one parsed file contributes to a network: ordered entry
/// sequences per record family plus the NUMBER-keyed faresystem and PT
/// system maps. Fragments are produced once per parse and consumed by
/// [`super::NetworkModel::merge`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFragment {
    pub dialect: Dialect,
    pub lines: Vec<Entry<Line>>,
    pub links: Vec<Entry<LinkItem>>,
    pub pnrs: Vec<Entry<PnrLink>>,
    pub zacs: Vec<Entry<ZacLink>>,
    pub supplinks: Vec<Entry<Supplink>>,
    pub accesslis: Vec<Entry<Linki>>,
    pub xferlis: Vec<Entry<Linki>>,
    pub nodes: Vec<Entry<Linki>>,
    pub faresystems: IndexMap<u32, Faresystem>,
    pub ptsystem: PtSystem,
}

impl NetworkFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_count(&self) -> usize {
        self.lines.iter().filter(|e| e.record().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.links.is_empty()
            && self.pnrs.is_empty()
            && self.zacs.is_empty()
            && self.supplinks.is_empty()
            && self.accesslis.is_empty()
            && self.xferlis.is_empty()
            && self.nodes.is_empty()
            && self.faresystems.is_empty()
            && self.ptsystem.is_empty()
    }
}
