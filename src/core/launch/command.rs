// ─── Command Synthesizer ───
// Final hand-off: interpreter + JVM tokens + entry point + program tokens.

use std::path::Path;

/// A fully resolved process invocation. The first token is the
/// interpreter; nothing here spawns anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    tokens: Vec<String>,
}

/// `[interpreter] ++ jvm_tokens ++ [main_class] ++ program_tokens`.
pub fn synthesize(
    interpreter: &Path,
    jvm_tokens: Vec<String>,
    main_class: &str,
    program_tokens: Vec<String>,
) -> LaunchCommand {
    let mut tokens = Vec::with_capacity(jvm_tokens.len() + program_tokens.len() + 2);
    tokens.push(interpreter.to_string_lossy().to_string());
    tokens.extend(jvm_tokens);
    tokens.push(main_class.to_string());
    tokens.extend(program_tokens);
    LaunchCommand { tokens }
}

impl LaunchCommand {
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Unspawned `Command` for the process-execution layer.
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(self.program());
        cmd.args(self.args());
        cmd
    }
}

/// Copy/paste-friendly rendering for logs.
impl std::fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .tokens
            .iter()
            .map(|token| shell_escape(token))
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&rendered)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
