use std::io::IsTerminal;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

use crate::domain::AppError;
use crate::ports::PackageRegistry;

/// Development server tooling installed next to an npm installation.
const DEV_TOOLS: [&str; 2] = ["webpack-dev-server@~3.8.0", "webpack-cli@~3.3.6"];

/// Package registry backed by the `npm` command line client.
#[derive(Debug, Clone)]
pub struct NpmCommandAdapter {
    program: String,
}

impl NpmCommandAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args);
        if std::io::stdout().is_terminal() {
            command.env("FORCE_COLOR", "1");
        }
        command
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    fn capture(&self, args: &[&str]) -> Result<Output, AppError> {
        tracing::debug!(command = %self.describe(args), "running");
        self.command(args).stdin(Stdio::null()).output().map_err(|e| AppError::ExternalToolError {
            tool: self.describe(args),
            error: e.to_string(),
        })
    }

    fn run_visible(&self, args: &[&str]) -> Result<(), AppError> {
        tracing::debug!(command = %self.describe(args), "running");
        let status = self.command(args).status().map_err(|e| AppError::ExternalToolError {
            tool: self.describe(args),
            error: e.to_string(),
        })?;

        if !status.success() {
            return Err(AppError::ExternalToolError {
                tool: self.describe(args),
                error: match status.code() {
                    Some(code) => format!("exited with code {}", code),
                    None => "terminated by signal".to_string(),
                },
            });
        }
        Ok(())
    }
}

impl PackageRegistry for NpmCommandAdapter {
    fn list_versions(&self, package: &str) -> Result<Vec<String>, AppError> {
        let args = ["view", package, "versions", "--json"];
        let output = self.capture(&args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AppError::ExternalToolError {
                tool: self.describe(&args),
                error: if stderr.is_empty() { "Unknown error".to_string() } else { stderr },
            });
        }
        parse_versions(&String::from_utf8_lossy(&output.stdout)).map_err(|details| {
            AppError::ExternalToolError { tool: self.describe(&args), error: details }
        })
    }

    fn version_exists(&self, package: &str, version: &str) -> Result<bool, AppError> {
        let spec = format!("{}@{}", package, version);
        let output = self.capture(&["view", &spec, "version"])?;
        Ok(output.status.success() && !String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }

    fn install(&self, package: &str, version: &str, prefix: &Path) -> Result<(), AppError> {
        let spec = format!("{}@{}", package, version);
        let prefix = prefix.to_string_lossy().into_owned();
        self.run_visible(&["i", "--prefix", &prefix, &spec])
    }

    fn install_dev_tools(&self, prefix: &Path) -> Result<(), AppError> {
        let prefix = prefix.to_string_lossy().into_owned();
        let mut args: Vec<&str> = vec!["i", "--silent", "--prefix", &prefix];
        args.extend(DEV_TOOLS);
        self.run_visible(&args)
    }
}

/// Parse `npm view <pkg> versions --json`, which prints a bare string when
/// only one version is published.
fn parse_versions(stdout: &str) -> Result<Vec<String>, String> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| format!("unexpected version list output: {}", e))?;
    match value {
        Value::String(version) => Ok(vec![version]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(version) => Ok(version),
                other => Err(format!("unexpected version entry: {}", other)),
            })
            .collect(),
        other => Err(format!("unexpected version list: {}", other)),
    }
}
