//! Addition tool definition.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::{InputContract, ToolDefinition, ToolError, ToolOutput};

/// Parameters for the addition tool.
#[derive(Debug, Clone, Deserialize)]
pub struct AddParams {
    pub a: f64,
    pub b: f64,
}

/// Adds two numbers.
pub struct AddTool;

#[async_trait]
impl ToolDefinition for AddTool {
    const NAME: &'static str = "add";
    const DESCRIPTION: &'static str = "Add two numbers and return the sum.";

    type Params = AddParams;

    fn contract() -> InputContract {
        InputContract::new()
            .number("a", "First number")
            .number("b", "Second number")
    }

    async fn execute(&self, params: AddParams) -> Result<ToolOutput, ToolError> {
        let sum = params.a + params.b;
        info!("add: {} + {} = {}", params.a, params.b, sum);
        Ok(ToolOutput::text(format!(
            "{} + {} = {}",
            params.a, params.b, sum
        )))
    }
}
