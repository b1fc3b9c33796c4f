//! Writing assistance for an editor host.
//!
//! Wraps an [`AssistTransport`](quill_transport::AssistTransport) with the
//! editor-side behaviour around it:
//!
//! - [`coordinator`]: debounced, single-flight analysis of one document
//! - [`links`]: best-effort link suggestions for a selection
//! - [`recommend`]: related documents for the active document, plus navigation
//! - [`graph`]: neighbourhood view over recommendations
//! - [`suggestions`]: grouped presentation of an analysis
//! - [`hub`]: one coordinator per open document
//!
//! ```text
//!  editor ──▶ AssistHub ──▶ AnalysisCoordinator ──▶ Debouncer ──▶ transport
//!                 │                 │
//!                 │                 └─▶ watch<AnalysisSnapshot> ──▶ UI
//!                 └─▶ LinkResolver / RecommendationPanel ──────────▶ transport
//! ```

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod graph;
pub mod hub;
pub mod links;
pub mod recommend;
pub mod suggestions;
pub mod token;

#[cfg(test)]
mod testing;

pub use config::{AnalysisConfig, AssistConfig, ConfigError, LinkConfig};
pub use coordinator::{AnalysisCoordinator, AnalysisOutcome, AnalysisPhase, AnalysisSnapshot, DocumentContext};
pub use debounce::Debouncer;
pub use graph::{EdgeRelation, GraphEdge, GraphNode, GraphView};
pub use hub::AssistHub;
pub use links::LinkResolver;
pub use quill_transport;
pub use recommend::{DocumentCollection, RecommendationFetcher, RecommendationList, RecommendationPanel, navigate};
pub use suggestions::{PriorityCounts, SuggestionSet};
pub use token::{AnalysisToken, GenerationClock};
