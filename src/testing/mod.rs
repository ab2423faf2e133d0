mod fake_registry;
mod fake_release_source;

pub use fake_registry::FakeRegistry;
pub use fake_release_source::FakeReleaseSource;
