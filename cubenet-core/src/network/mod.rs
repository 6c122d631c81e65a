mod fragment;
mod network_model;
mod registry;

pub use fragment::NetworkFragment;
pub use network_model::{MergeError, NetworkModel};
pub use registry::NetworkRegistry;
