//! Greeting tool definition.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domains::tools::{InputContract, ToolDefinition, ToolError, ToolOutput};

/// Parameters for the greeting tool.
#[derive(Debug, Clone, Deserialize)]
pub struct GreetParams {
    /// Name of the person to greet.
    pub x: String,
}

/// Returns a greeting for the given name.
pub struct GreetTool;

#[async_trait]
impl ToolDefinition for GreetTool {
    const NAME: &'static str = "greetmsg";
    const DESCRIPTION: &'static str = "Greet someone by name.";

    type Params = GreetParams;

    fn contract() -> InputContract {
        InputContract::new().string("x", "name")
    }

    async fn execute(&self, params: GreetParams) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(format!("Nice to meet you, {}!", params.x)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::first_text;

    #[tokio::test]
    async fn test_greeting() {
        let output = GreetTool
            .execute(GreetParams {
                x: "Minji".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(first_text(&output.content), "Nice to meet you, Minji!");
    }
}
