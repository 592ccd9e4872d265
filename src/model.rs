use async_trait::async_trait;

use crate::error::Result;

/// Capability contract for models that score evaluation outputs.
///
/// Exactly four operations: a lazily constructed client handle, a
/// synchronous single-prompt completion, its async counterpart, and the
/// model identifier. Provider implementations translate these onto their
/// own wire format; evaluation code never sees the concrete provider.
#[async_trait]
pub trait EvalModel: Send + Sync {
    /// Handle to the provider's underlying transport client.
    type Client;

    /// Return the underlying client, constructing it on first use.
    ///
    /// Construction itself cannot fail; a missing or invalid credential
    /// surfaces as an authentication error from the first request.
    fn load_model(&self) -> &Self::Client;

    /// Issue one completion request for `prompt` with greedy decoding
    /// (temperature 0) and a single user-role message, returning the first
    /// choice's text content.
    ///
    /// Blocking. Must not be called from inside an async runtime; use
    /// [`EvalModel::a_generate`] there instead.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Async counterpart of [`EvalModel::generate`].
    ///
    /// Produces the identical result for the same prompt (there is no
    /// independent network path). May suspend the calling task while the
    /// underlying request runs, but must not stall unrelated tasks longer
    /// than the request itself takes.
    async fn a_generate(&self, prompt: &str) -> Result<String>;

    /// The configured model identifier. Pure.
    fn model_name(&self) -> &str;
}
