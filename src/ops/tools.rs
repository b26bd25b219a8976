//! Where the configured tool commands actually live.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolution of one tool command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub command: String,
    /// Executable the command runs, if it could be found
    pub path: Option<PathBuf>,
}

/// Look up each tool's executable, on `$PATH` unless the command names a path.
pub fn resolve_tools(tools: &BTreeMap<String, String>) -> Vec<ToolStatus> {
    tools
        .iter()
        .map(|(name, command)| ToolStatus {
            name: name.clone(),
            command: command.clone(),
            path: locate(command),
        })
        .collect()
}

fn locate(command: &str) -> Option<PathBuf> {
    let program = command.split_whitespace().next()?;
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    which::which(program).ok()
}
