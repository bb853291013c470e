//! Logging demonstration tool.
//!
//! Echoes its input while emitting diagnostics on the log channel (stderr),
//! never on the protocol channel.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::domains::tools::{InputContract, ToolDefinition, ToolError, ToolOutput};

/// Parameters for the debug example tool.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugExampleParams {
    pub input: String,
}

/// Processes a string and logs each step.
pub struct DebugExampleTool;

#[async_trait]
impl ToolDefinition for DebugExampleTool {
    const NAME: &'static str = "debug-example";
    const DESCRIPTION: &'static str =
        "Process an input string while logging diagnostics to stderr.";

    type Params = DebugExampleParams;

    fn contract() -> InputContract {
        InputContract::new().string("input", "Text to process")
    }

    #[instrument(skip_all, fields(input_len = params.input.len()))]
    async fn execute(&self, params: DebugExampleParams) -> Result<ToolOutput, ToolError> {
        info!(input = %params.input, "debug-example call");

        let result = format!("process input {}", params.input);
        debug!(chars = params.input.chars().count(), "debug-example processed input");

        info!(result = %result, "debug-example success");
        Ok(ToolOutput::text(result))
    }
}
