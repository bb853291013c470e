//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod add;
pub mod debug_example;
pub mod greet;
pub mod large_file;
pub mod multiply;
pub mod weather;

pub use add::{AddParams, AddTool};
pub use debug_example::{DebugExampleParams, DebugExampleTool};
pub use greet::{GreetParams, GreetTool};
pub use large_file::{FileAnalysis, ProcessLargeFileParams, ProcessLargeFileTool, SAMPLE_SIZE};
pub use multiply::{MultiplyParams, MultiplyTool};
pub use weather::{OpenMeteoClient, WeatherParams, WeatherService, WeatherTool};

/// Text of the first content block.
#[cfg(test)]
pub(crate) fn first_text(content: &[rmcp::model::Content]) -> &str {
    match &content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}
