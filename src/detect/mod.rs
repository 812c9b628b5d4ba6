mod backend;
mod backends;
mod registry;

pub use backend::{Detection, DetectorBackend};
pub use backends::{FixedBackend, StubBackend};
pub use registry::BackendRegistry;
