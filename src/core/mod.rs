// ─── Launchpipe Core ───
// Turns a version id into an installed game directory and a ready-to-spawn
// command line.
//
// Architecture:
//   core/
//     rules        Allow-rule evaluation against a launch context
//     launch/      Context, variable expansion, argument engine, command
//     store/       Content-addressed acquisition with SHA-1 verification
//     version/     Catalog, version descriptors, metadata caching
//     libraries/   Library filtering, classpath, native bundles
//     assets/      Asset index + object acquisition
//     install      End-to-end install pipeline
//     auth/        Offline account identity
//     config       Launcher settings
//     layout       On-disk directory layout

pub mod assets;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod install;
pub mod launch;
pub mod layout;
pub mod libraries;
pub mod rules;
pub mod store;
pub mod version;
