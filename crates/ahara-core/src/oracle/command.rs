//! Subprocess-backed oracle.
//!
//! The generator is any executable that reads a prompt on stdin and writes
//! generated text to stdout. Generation parameters are passed through the
//! environment:
//!
//! | variable | value |
//! |---|---|
//! | `AHARA_MAX_LENGTH` / `AHARA_MIN_LENGTH` | token bounds |
//! | `AHARA_TEMPERATURE`, `AHARA_TOP_K`, `AHARA_TOP_P` | sampling |
//! | `AHARA_NUM_BEAMS` | beam width |
//! | `AHARA_MODEL_DIR` | model directory, when configured |

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::debug;

use super::trait_def::Oracle;
use super::{GenerationParams, OracleError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct CommandOracle {
    name: String,
    program: String,
    args: Vec<String>,
    model_dir: Option<PathBuf>,
    timeout: Duration,
}

impl CommandOracle {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            model_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build_command(&self, params: &GenerationParams) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env("AHARA_MAX_LENGTH", params.max_length.to_string())
            .env("AHARA_MIN_LENGTH", params.min_length.to_string())
            .env("AHARA_TEMPERATURE", params.temperature.to_string())
            .env("AHARA_TOP_K", params.top_k.to_string())
            .env("AHARA_TOP_P", params.top_p.to_string())
            .env("AHARA_NUM_BEAMS", params.num_beams.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.model_dir {
            cmd.env("AHARA_MODEL_DIR", dir);
        }
        cmd
    }
}

#[async_trait]
impl Oracle for CommandOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, OracleError> {
        let mut child = self
            .build_command(params)
            .spawn()
            .map_err(|source| OracleError::Spawn {
                command: self.command_line(),
                source,
            })?;

        let stdin_pipe = child.stdin.take();
        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();

        // The child may exit without reading stdin; a broken pipe there is
        // not an error in itself.
        let write_prompt = async {
            if let Some(mut pipe) = stdin_pipe {
                let _ = pipe.write_all(prompt.as_bytes()).await;
                let _ = pipe.shutdown().await;
            }
        };

        let read_stdout = async {
            let mut buf = Vec::new();
            if let Some(ref mut pipe) = stdout_pipe {
                pipe.read_to_end(&mut buf).await?;
            }
            Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
        };

        let read_stderr = async {
            let mut buf = Vec::new();
            if let Some(ref mut pipe) = stderr_pipe {
                pipe.read_to_end(&mut buf).await.ok();
            }
            String::from_utf8_lossy(&buf).into_owned()
        };

        let outcome = tokio::time::timeout(self.timeout, async {
            let (status, (), stdout, stderr) =
                tokio::join!(child.wait(), write_prompt, read_stdout, read_stderr);
            (status, stdout, stderr)
        })
        .await;

        match outcome {
            Ok((Ok(status), Ok(stdout), stderr)) => {
                if !status.success() {
                    return Err(OracleError::NonZeroExit {
                        command: self.command_line(),
                        code: status.code(),
                        stderr: stderr.trim().to_string(),
                    });
                }
                let text = stdout.trim().to_string();
                if text.is_empty() {
                    return Err(OracleError::EmptyOutput {
                        command: self.command_line(),
                    });
                }
                debug!(oracle = %self.name, bytes = text.len(), "oracle produced text");
                Ok(text)
            }
            Ok((Err(source), _, _)) | Ok((_, Err(source), _)) => Err(OracleError::Io {
                command: self.command_line(),
                source,
            }),
            Err(_) => {
                let _ = child.kill().await;
                Err(OracleError::Timeout {
                    command: self.command_line(),
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}
