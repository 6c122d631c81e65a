mod attr_map;
mod dialect;
mod entry;
mod factor;
mod faresystem;
mod line;
mod link;
mod node;
mod pnr;
mod ptsystem;

pub use attr_map::AttrMap;
pub use dialect::Dialect;
pub use entry::Entry;
pub use factor::Factor;
pub use faresystem::Faresystem;
pub use line::Line;
pub use link::{Linki, LinkItem, Supplink, TransitLink, ZacLink};
pub use node::Node;
pub use pnr::{PnrLink, UNNUMBERED};
pub use ptsystem::PtSystem;
