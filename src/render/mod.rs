//! Output documents
//!
//! Both renderers are pure functions of a [`ServiceTopology`]: the same
//! topology always renders to byte-identical output, with processes in
//! topology order (broker first).
//!
//! [`ServiceTopology`]: crate::topology::ServiceTopology

pub mod compose;
pub mod supervisor;

pub use compose::render_compose;
pub use supervisor::render_supervisor;

/// Service name of the internal broker in both documents
pub const BROKER_SERVICE: &str = "mqtt";
