mod package_registry;
mod release_source;

pub use package_registry::PackageRegistry;
pub use release_source::ReleaseSource;
