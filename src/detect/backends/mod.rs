pub mod fixed;
pub mod stub;

pub use fixed::FixedBackend;
pub use stub::StubBackend;
