//! Large file analysis tool.
//!
//! Counts the lines of an arbitrarily large file while keeping only the first
//! [`SAMPLE_SIZE`] lines. Memory use is bounded by the sample plus the read
//! buffer; lines past the sample are counted without being buffered.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, instrument};

use crate::domains::tools::{InputContract, ToolDefinition, ToolError, ToolOutput};

/// Number of leading lines kept as a sample.
pub const SAMPLE_SIZE: usize = 5;

const READ_BUFFER_SIZE: usize = 64 * 1024;

// ============================================================================
// Line stream
// ============================================================================

/// Lazy, single-pass sequence of lines over a buffered reader.
///
/// `\n`, `\r\n` and a lone `\r` each terminate exactly one line. A final line
/// without a terminator still counts; a terminator at end of input does not
/// start a new line. The underlying reader is released when the stream is
/// dropped.
pub struct LineStream<R> {
    reader: R,
    /// The previous line ended in `\r`; a `\n` right after it belongs to
    /// the same terminator.
    pending_cr: bool,
}

impl<R: AsyncBufRead + Unpin> LineStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending_cr: false,
        }
    }

    /// Read the next line, without its terminator.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        if self.advance(Some(&mut line)).await? {
            Ok(Some(String::from_utf8_lossy(&line).into_owned()))
        } else {
            Ok(None)
        }
    }

    /// Move past the next line without keeping its bytes.
    ///
    /// Returns `false` once the input is exhausted.
    pub async fn skip_line(&mut self) -> io::Result<bool> {
        self.advance(None).await
    }

    async fn advance(&mut self, mut sink: Option<&mut Vec<u8>>) -> io::Result<bool> {
        let mut seen_bytes = false;

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                self.pending_cr = false;
                return Ok(seen_bytes);
            }

            let mut start = 0;
            if std::mem::take(&mut self.pending_cr) && buf[0] == b'\n' {
                start = 1;
            }

            match buf[start..]
                .iter()
                .position(|&b| b == b'\n' || b == b'\r')
            {
                Some(offset) => {
                    let end = start + offset;
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.extend_from_slice(&buf[start..end]);
                    }
                    self.pending_cr = buf[end] == b'\r';
                    self.reader.consume(end + 1);
                    return Ok(true);
                }
                None => {
                    let len = buf.len();
                    if len > start {
                        seen_bytes = true;
                        if let Some(sink) = sink.as_deref_mut() {
                            sink.extend_from_slice(&buf[start..]);
                        }
                    }
                    self.reader.consume(len);
                }
            }
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Result of analysing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    /// Total number of lines in the file.
    pub total_lines: u64,
    /// The first lines of the file, in order (at most 5).
    pub sample: Vec<String>,
}

/// Count every line of `reader`, keeping the first [`SAMPLE_SIZE`] lines.
pub async fn analyze<R: AsyncBufRead + Unpin>(reader: R) -> io::Result<FileAnalysis> {
    let mut lines = LineStream::new(reader);
    let mut total_lines = 0u64;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);

    while sample.len() < SAMPLE_SIZE {
        match lines.next_line().await? {
            Some(line) => {
                total_lines += 1;
                sample.push(line);
            }
            None => {
                return Ok(FileAnalysis {
                    total_lines,
                    sample,
                });
            }
        }
    }

    while lines.skip_line().await? {
        total_lines += 1;
    }

    Ok(FileAnalysis {
        total_lines,
        sample,
    })
}

/// Open `path` and analyse it.
pub async fn analyze_file(path: &str) -> Result<FileAnalysis, ToolError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ToolError::input_unavailable(path, e))?;

    analyze(BufReader::with_capacity(READ_BUFFER_SIZE, file))
        .await
        .map_err(|e| ToolError::execution_failed(format!("Failed to read '{}': {}", path, e)))
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Parameters for the large file tool.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessLargeFileParams {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

/// Memory-bounded line counting tool.
pub struct ProcessLargeFileTool;

#[async_trait]
impl ToolDefinition for ProcessLargeFileTool {
    const NAME: &'static str = "process-large-file";
    const DESCRIPTION: &'static str = "Count the lines of a (possibly very large) text file and return the first 5 lines as a sample. Reads the file as a stream with bounded memory.";

    type Params = ProcessLargeFileParams;

    fn contract() -> InputContract {
        InputContract::new().string("filePath", "Path of the file to analyse")
    }

    fn output_schema() -> Option<Arc<JsonObject>> {
        Some(Arc::new(schema_for_type::<FileAnalysis>()))
    }

    #[instrument(skip_all, fields(path = %params.file_path))]
    async fn execute(&self, params: ProcessLargeFileParams) -> Result<ToolOutput, ToolError> {
        let analysis = analyze_file(&params.file_path).await?;
        info!(
            "Analysed {}: {} lines",
            params.file_path, analysis.total_lines
        );

        let summary = format!(
            "File analysis complete:\nTotal lines: {}\nSample lines:\n{}",
            analysis.total_lines,
            analysis.sample.join("\n")
        );
        let structured = serde_json::to_value(&analysis)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        Ok(ToolOutput::text(summary).with_structured(structured))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::first_text;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn numbered_file(lines: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        {
            let mut writer = std::io::BufWriter::new(file.as_file_mut());
            for i in 1..=lines {
                writeln!(writer, "line {}", i).unwrap();
            }
        }
        file
    }

    fn expected_sample(lines: usize) -> Vec<String> {
        (1..=lines.min(SAMPLE_SIZE))
            .map(|i| format!("line {}", i))
            .collect()
    }

    async fn analyze_bytes(bytes: &[u8]) -> FileAnalysis {
        analyze(BufReader::new(Cursor::new(bytes.to_vec())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_line_counts_and_samples() {
        for n in [0, 5, 6, 10_000] {
            let file = numbered_file(n);
            let analysis = analyze_file(file.path().to_str().unwrap()).await.unwrap();
            assert_eq!(analysis.total_lines, n as u64, "N = {}", n);
            assert_eq!(analysis.sample, expected_sample(n), "N = {}", n);
        }
    }

    #[tokio::test]
    async fn test_mixed_terminators_count_once() {
        let analysis = analyze_bytes(b"a\r\nb\rc\nd").await;
        assert_eq!(analysis.total_lines, 4);
        assert_eq!(analysis.sample, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_blank_lines_are_lines() {
        let analysis = analyze_bytes(b"\n\r\n\rx\n").await;
        assert_eq!(analysis.total_lines, 4);
        assert_eq!(analysis.sample, vec!["", "", "", "x"]);
    }

    #[tokio::test]
    async fn test_crlf_split_across_reads() {
        // A one-byte buffer forces "\r" and "\n" into separate reads.
        let reader = BufReader::with_capacity(1, Cursor::new(b"one\r\ntwo\r\n\r\nfour".to_vec()));
        let analysis = analyze(reader).await.unwrap();
        assert_eq!(analysis.total_lines, 4);
        assert_eq!(analysis.sample, vec!["one", "two", "", "four"]);
    }

    #[tokio::test]
    async fn test_counting_past_sample_with_small_buffer() {
        let input = "x\r\n".repeat(50);
        let reader = BufReader::with_capacity(2, Cursor::new(input.into_bytes()));
        let analysis = analyze(reader).await.unwrap();
        assert_eq!(analysis.total_lines, 50);
        assert_eq!(analysis.sample.len(), SAMPLE_SIZE);
    }

    #[tokio::test]
    async fn test_terminators_split_across_chunks() {
        let reader = tokio_test::io::Builder::new()
            .read(b"first\r")
            .read(b"\nsecond\r")
            .read(b"third")
            .build();
        let analysis = analyze(BufReader::new(reader)).await.unwrap();
        assert_eq!(analysis.total_lines, 3);
        assert_eq!(analysis.sample, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_read_error_mid_stream_propagates() {
        let reader = tokio_test::io::Builder::new()
            .read(b"1\n2\n3\n4\n5\n6\n")
            .read_error(io::Error::new(io::ErrorKind::Other, "disk detached"))
            .build();
        let err = analyze(BufReader::new(reader)).await.unwrap_err();
        assert_eq!(err.to_string(), "disk detached");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let analysis = analyze_bytes(b"ok\n\xff\xfe\n").await;
        assert_eq!(analysis.total_lines, 2);
        assert_eq!(analysis.sample[1], "\u{FFFD}\u{FFFD}");
    }

    #[tokio::test]
    async fn test_missing_file_is_input_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = analyze_file(missing.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, ToolError::InputUnavailable { .. }));
        assert_eq!(err.kind(), "input_unavailable");
    }

    #[tokio::test]
    async fn test_execute_reports_summary_and_structured_output() {
        let file = numbered_file(7);
        let output = ProcessLargeFileTool
            .execute(ProcessLargeFileParams {
                file_path: file.path().to_string_lossy().to_string(),
            })
            .await
            .unwrap();

        let text = first_text(&output.content);
        assert!(text.contains("Total lines: 7"));
        assert!(text.ends_with("line 5"));
        assert!(!text.contains("line 6"));

        let structured = output.structured.unwrap();
        assert_eq!(structured["totalLines"], serde_json::json!(7));
        assert_eq!(
            structured["sample"],
            serde_json::json!(["line 1", "line 2", "line 3", "line 4", "line 5"])
        );
    }
}
