pub mod classify;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod output;
pub mod render;
pub mod resolve;
pub mod walk;

use error::ConvertError;
use fetch::Transport;
use output::CaseSink;
use render::CaseRenderer;
use walk::WalkSummary;

/// Fetch the Swagger document at `url` and hand one rendered case per operation
/// to `sink`.
pub fn convert(
    transport: &dyn Transport,
    url: &str,
    renderer: &CaseRenderer,
    sink: &mut dyn CaseSink,
) -> Result<WalkSummary, ConvertError> {
    let document = fetch::fetch_document(transport, url)?;
    walk::walk(&document, renderer, sink)
}
