pub mod natives;
pub mod resolver;

pub use natives::extract_natives;
pub use resolver::{
    classpath, join_classpath, plan_libraries, resolve, with_client_jar, LibraryFailure,
    LibraryResolution, PlannedLibrary,
};
