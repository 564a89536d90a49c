//! Boundary to the external plan-text generator.
//!
//! The generator is modelled as an [`Oracle`]: it takes a prompt plus
//! [`GenerationParams`] and returns text, or an [`OracleError`] that the
//! planning pipeline converts into "no text".

pub mod command;
pub mod prompt;
pub mod registry;
pub mod trait_def;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command::CommandOracle;
pub use prompt::{format_day_prompt, format_weekly_prompt};
pub use registry::OracleRegistry;
pub use trait_def::Oracle;

/// Model type served by the subprocess oracle when none is configured.
pub const DEFAULT_MODEL_TYPE: &str = "t5";

/// Failures at the oracle boundary.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("failed to start generator `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("generator `{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("generator `{command}` exited with {}: {stderr}", exit_description(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("generator `{command}` produced no output")]
    EmptyOutput { command: String },

    #[error("I/O error talking to generator `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Raised by in-process oracles that have no subprocess to blame.
    #[error("{0}")]
    Other(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

/// Decoding parameters forwarded to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub num_beams: u32,
}

impl GenerationParams {
    /// Parameters for a seven-day plan.
    pub fn weekly() -> Self {
        Self {
            max_length: 512,
            min_length: 50,
            ..Self::daily()
        }
    }

    /// Parameters for a single day.
    pub fn daily() -> Self {
        Self {
            max_length: 256,
            min_length: 20,
            temperature: 0.9,
            top_k: 50,
            top_p: 0.95,
            num_beams: 3,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_share_sampling_settings() {
        let weekly = GenerationParams::weekly();
        let daily = GenerationParams::daily();
        assert_eq!((weekly.max_length, weekly.min_length), (512, 50));
        assert_eq!((daily.max_length, daily.min_length), (256, 20));
        assert_eq!(weekly.temperature, daily.temperature);
        assert_eq!(weekly.num_beams, 3);
    }

    #[test]
    fn non_zero_exit_message() {
        let err = OracleError::NonZeroExit {
            command: "gen".into(),
            code: None,
            stderr: "killed".into(),
        };
        assert_eq!(err.to_string(), "generator `gen` exited with a signal: killed");
    }
}
