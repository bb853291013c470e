//! Multiplication tool definition.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::domains::tools::{InputContract, ToolDefinition, ToolError, ToolOutput};

/// Parameters for the multiplication tool.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplyParams {
    pub x: f64,
    pub y: f64,
}

/// Multiplies two numbers.
pub struct MultiplyTool;

#[async_trait]
impl ToolDefinition for MultiplyTool {
    const NAME: &'static str = "multiply";
    const DESCRIPTION: &'static str = "Multiply two numbers and return the product.";

    type Params = MultiplyParams;

    fn contract() -> InputContract {
        InputContract::new()
            .number("x", "First number")
            .number("y", "Second number")
    }

    async fn execute(&self, params: MultiplyParams) -> Result<ToolOutput, ToolError> {
        let product = params.x * params.y;
        info!("multiply: {} × {} = {}", params.x, params.y, product);
        Ok(ToolOutput::text(format!(
            "{} × {} = {}",
            params.x, params.y, product
        )))
    }
}
