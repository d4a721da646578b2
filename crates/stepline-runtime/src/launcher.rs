use crate::{Result, TraceEngine};
use stepline_types::{RunFailure, RunResult, SessionContext};
use std::io::Write;

/// Run the context's current target once under the engine and report an
/// abnormal end on `out`.
///
/// Engine errors are reported the same way as script failures; neither ends
/// the session. Only a failure to write the report is returned as an error.
pub fn launch(
    engine: &mut dyn TraceEngine,
    ctx: &SessionContext,
    stop_immediately: bool,
    out: &mut dyn Write,
) -> Result<RunResult> {
    tracing::info!(
        script = %ctx.target(),
        stop = stop_immediately,
        post_mortem = ctx.settings.post_mortem,
        linetrace = ctx.settings.linetrace,
        "launching debug session"
    );

    let result = match engine.debug_load(ctx, stop_immediately) {
        Ok(failure) => RunResult::from(failure),
        Err(err) => {
            tracing::warn!(error = %err, "engine failed to run target");
            RunResult::Failed(RunFailure::new(err.to_string(), Vec::new()))
        }
    };

    if let Some(failure) = result.failure() {
        report_failure(failure, out)?;
    }

    Ok(result)
}

fn report_failure(failure: &RunFailure, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}", failure.message)?;
    for frame in &failure.backtrace {
        writeln!(out, "\t{}", frame)?;
    }
    out.flush()
}
