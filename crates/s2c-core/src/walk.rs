use crate::classify::classify;
use crate::document::Document;
use crate::error::ConvertError;
use crate::output::CaseSink;
use crate::render::CaseRenderer;

/// Counts gathered while walking a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Cases handed to the sink.
    pub emitted: usize,
    /// Operations without a `parameters` key.
    pub skipped: usize,
    /// Path items or operations with an unexpected shape.
    pub malformed: usize,
}

/// Render one case per `(path, method)` pair that declares `parameters` and hand
/// it to `sink`.
///
/// Malformed entries are logged and counted; only render and output failures stop
/// the walk.
pub fn walk(
    document: &Document,
    renderer: &CaseRenderer,
    sink: &mut dyn CaseSink,
) -> Result<WalkSummary, ConvertError> {
    let mut summary = WalkSummary::default();
    log::debug!(
        "walking Swagger {} document",
        document.swagger_version().unwrap_or("(unversioned)")
    );

    for entry in document.operations() {
        let operation = match entry {
            Ok(operation) => operation,
            Err(malformed) => {
                log::warn!("skipping {malformed}");
                summary.malformed += 1;
                continue;
            }
        };

        if operation.parameters.is_none() {
            log::debug!(
                "{} {} declares no parameters, skipped",
                operation.method,
                operation.path
            );
            summary.skipped += 1;
            continue;
        }

        let params = classify(&operation, document.definitions());
        if params.is_empty() {
            log::debug!(
                "{} {} has no query, form or body fields",
                operation.method,
                operation.path
            );
        }
        let case = renderer.render(operation.method, operation.path, &params)?;
        sink.accept(&case)?;
        summary.emitted += 1;
    }

    log::info!(
        "converted {} operations ({} without parameters, {} malformed)",
        summary.emitted,
        summary.skipped,
        summary.malformed
    );
    Ok(summary)
}
