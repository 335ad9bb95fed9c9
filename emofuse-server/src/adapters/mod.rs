//! Signal Adapters
//!
//! One adapter per modality. Each turns one raw input into exactly one
//! [`SignalResult`].
//!
//! # Contract
//! - Absent input -> `NoData` with an empty diagnostic, no collaborator call
//! - Any fault -> `Error` with the fault text as diagnostic
//! - Otherwise the collaborator output goes through the label normalizer
//!
//! Adapters never return an error to the orchestrator.

pub mod speech;
pub mod text;
pub mod visual;

use async_trait::async_trait;
use emofuse_common::{Modality, SignalResult};

pub use speech::{AudioFormatPolicy, AudioRoute, SpeechAdapter};
pub use text::{TextAdapter, TextSignal};
pub use visual::VisualAdapter;

#[async_trait]
pub trait SignalAdapter: Send + Sync {
    /// Raw input this adapter consumes
    type Input: Send + 'static;

    fn modality(&self) -> Modality;

    /// Analyze an input that was supplied
    async fn analyze_input(&self, input: Self::Input) -> SignalResult;

    /// Analyze a possibly absent input
    async fn analyze(&self, input: Option<Self::Input>) -> SignalResult {
        match input {
            Some(input) => self.analyze_input(input).await,
            None => SignalResult::no_data(self.modality()),
        }
    }
}
