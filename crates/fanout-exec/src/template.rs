use std::fmt;

use serde::{Deserialize, Serialize};

use fanout_model::Target;

use crate::ExecError;

/// Placeholder substituted with the target identifier when rendering.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Command template parameterized by the target identifier.
///
/// Every occurrence of `{target}` in the program name or any argument is
/// replaced at render time, e.g.
/// `forge script deploy.s.sol --rpc-url {target} --broadcast`.
/// A template without the placeholder is allowed; it then runs the same
/// command for every target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Build a template from a program and its argument list.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, ExecError> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(ExecError::EmptyTemplate);
        }
        Ok(Self {
            program,
            args: args.into_iter().collect(),
        })
    }

    /// Parse a template from a single command line, split on whitespace.
    ///
    /// No quoting or escaping is interpreted; arguments that need embedded
    /// whitespace must be passed through [`CommandTemplate::new`].
    pub fn parse(command_line: &str) -> Result<Self, ExecError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ExecError::EmptyTemplate)?;
        Self::new(program, parts)
    }

    /// The program name, unrendered.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument list, unrendered.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns `true` if any part of the template mentions the placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.program.contains(TARGET_PLACEHOLDER)
            || self.args.iter().any(|a| a.contains(TARGET_PLACEHOLDER))
    }

    /// Substitute the target identifier into every part of the template.
    pub fn render(&self, target: &Target) -> RenderedCommand {
        let id = target.as_str();
        RenderedCommand {
            program: self.program.replace(TARGET_PLACEHOLDER, id),
            args: self
                .args
                .iter()
                .map(|a| a.replace(TARGET_PLACEHOLDER, id))
                .collect(),
        }
    }
}

/// One concrete command for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    program: String,
    args: Vec<String>,
}

impl RenderedCommand {
    /// The program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The rendered argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for RenderedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
