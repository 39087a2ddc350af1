//! The `sign` command.

use super::{EXIT_BATCH_FAILURES, EXIT_MANUAL_INSTALL, EXIT_OK};
use crate::cli::{RuntimeConfig, SignArgs, StdinPrompt};
use crate::error::Result;
use crate::signer::{
    BatchEvent, BatchSummary, BatchVerdict, Credential, Error, JobResult, RecoveryChoice,
    RecoveryPrompt, SigningSession,
};
use serde::Serialize;

/// JSON report printed with `--json`.
#[derive(Serialize)]
struct SignReport<'a> {
    results: &'a [JobResult],
    summary: BatchSummary,
    verdict: BatchVerdict,
}

/// Signs the requested files and reports per-file results.
pub async fn sign(args: &SignArgs, config: &RuntimeConfig) -> Result<i32> {
    let mut session = SigningSession::new(args.settings()?);

    // worklist
    let added = session.artifacts_mut().add_all(args.files.iter().cloned());
    if added > 0 {
        let _ = config.verbose_println(&format!("Added {added} file(s)"));
    }
    for folder in &args.folders {
        let added = session.add_folder(folder).await?;
        let _ = config.verbose_println(&format!(
            "Added {added} file(s) from folder {}",
            folder.display()
        ));
    }

    // signtool
    match &args.signtool {
        Some(path) => {
            let tool = session.set_manual_tool(path)?;
            let _ = config.verbose_println(&format!("Using signtool at: {tool}"));
        }
        None => {
            let status = session.refresh().await;
            let _ = config.verbose_println(&status.to_string());
        }
    }

    let credential = Credential::new(
        args.pfx.clone().unwrap_or_default(),
        args.password.clone().unwrap_or_default(),
    );
    let prompt: Box<dyn RecoveryPrompt> = if args.non_interactive {
        Box::new(|| RecoveryChoice::Abort)
    } else {
        Box::new(StdinPrompt)
    };

    let batch = match session
        .sign(credential, &*prompt, |line| {
            let _ = config.indent(line);
        })
        .await
    {
        Ok(batch) => batch,
        Err(Error::ManualInstallRequired { url }) => {
            if let Err(e) = session.open_download_page().await {
                log::warn!("Could not open browser: {}", e);
            }
            let _ = config.error(&Error::ManualInstallRequired { url }.to_string());
            return Ok(EXIT_MANUAL_INSTALL);
        }
        Err(e) => return Err(e.into()),
    };

    let _ = config.section("Signing files");
    let mut results = Vec::new();
    let summary = batch
        .wait_with_events(|event| match event {
            BatchEvent::Log(line) => {
                let _ = config.indent(&line);
            }
            BatchEvent::Warning(warning) => {
                let _ = config.warn(&warning);
            }
            BatchEvent::Job(result) => results.push(result),
            BatchEvent::Finished(_) => {}
        })
        .await?;

    if args.json {
        let report = SignReport {
            results: &results,
            summary,
            verdict: summary.verdict(),
        };
        config.output().println(&serde_json::to_string_pretty(&report)?)?;
    } else {
        let _ = config.progress(&summary.to_string());
        match summary.verdict() {
            BatchVerdict::AllSigned => {
                let _ = config.success(&summary.notification());
            }
            BatchVerdict::Partial | BatchVerdict::AllFailed => {
                let _ = config.warn(&summary.notification());
            }
        }
    }

    Ok(if summary.failure_count == 0 {
        EXIT_OK
    } else {
        EXIT_BATCH_FAILURES
    })
}
