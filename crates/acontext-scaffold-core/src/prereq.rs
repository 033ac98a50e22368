//! Prerequisite tool detection for scaffolded projects.

/// A tool a language's projects expect on `PATH` but which is not installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTool {
    pub tool_name: String,
}

/// Return the tools from `tools` that `which` cannot find.
pub fn check_tools(tools: &[String]) -> Vec<MissingTool> {
    tools
        .iter()
        .filter(|tool| which::which(tool.as_str()).is_err())
        .map(|tool| MissingTool {
            tool_name: tool.clone(),
        })
        .collect()
}
