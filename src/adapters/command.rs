//! Subject classifier backed by an external command.
//!
//! The command receives a JSON request on stdin and prints the detected
//! subjects on stdout, either as a bare JSON array or as an object with a
//! `subjects` array. Markdown code fences around the JSON are tolerated,
//! since model-backed scripts often emit them.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::{ClassifierError, SubjectClassifier};

/// Request written to the command's stdin
#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
    subjects: &'a [&'a str],
    max_subjects: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    List(Vec<String>),
    Object { subjects: Vec<String> },
}

/// Classifier using subprocess mode
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, request: &ClassifyRequest<'_>) -> Result<String, ClassifierError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ClassifierError::Failed(format!("Failed to encode request: {}", e)))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
            // Drop stdin to signal EOF
        }

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ClassifierError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClassifierError::Failed(format!(
                "'{}' exited with code {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| ClassifierError::Malformed("output is not valid UTF-8".to_string()))
    }
}

#[async_trait]
impl SubjectClassifier for CommandClassifier {
    fn name(&self) -> &str {
        "command"
    }

    async fn classify(
        &self,
        text: &str,
        vocabulary: &[&str],
        max_subjects: usize,
    ) -> Result<Vec<String>, ClassifierError> {
        let request = ClassifyRequest {
            text,
            subjects: vocabulary,
            max_subjects,
        };
        let stdout = self.run(&request).await?;
        parse_response(&stdout)
    }
}

/// Parse classifier output into raw tags
pub fn parse_response(output: &str) -> Result<Vec<String>, ClassifierError> {
    let body = strip_code_fence(output.trim());
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let response: ClassifyResponse = serde_json::from_str(body)
        .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

    Ok(match response {
        ClassifyResponse::List(tags) => tags,
        ClassifyResponse::Object { subjects } => subjects,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip an optional language tag on the opening fence line
    let rest = rest.find('\n').map(|i| &rest[i + 1..]).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
