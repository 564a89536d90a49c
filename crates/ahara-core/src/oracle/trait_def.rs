//! The `Oracle` trait: the boundary to an external text generator.

use async_trait::async_trait;

use super::{GenerationParams, OracleError};

/// A source of generated plan text.
///
/// Output is untrusted. Callers parse it leniently and treat any `Err` as
/// "no text", so implementations should map every failure to an
/// [`OracleError`] instead of panicking.
///
/// The trait is object-safe so that oracles can be held as
/// `Arc<dyn Oracle>` in an [`super::OracleRegistry`].
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Model type this oracle serves (e.g. "t5").
    fn name(&self) -> &str;

    /// Generate text for a formatted prompt.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, OracleError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn Oracle) {}
};
