pub mod arguments;
pub mod command;
pub mod context;
pub mod expand;
pub mod plan;

pub use arguments::{build_tokens, legacy_jvm_spec, ArgumentSpec, ArgumentValue};
pub use command::{synthesize, LaunchCommand};
pub use context::{LaunchContext, LaunchContextBuilder, Platform};
pub use expand::{expand, expand_all};
pub use plan::{build_command, prepare_launch, LaunchRequest};
