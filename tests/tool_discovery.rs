//! signtool discovery, caching, provisioning and the recovery protocol.

mod common;

use common::{MISSING_TOOL_NAME, Workspace, settings_builder, unavailable_backend};
use signtool_batch::signer::{
    Error, ProvisionOutcome, RecoveryChoice, SigningSession, ToolLocator, ToolPathCache,
    ToolProvisioner, ToolRecovery, ToolStatus,
};
use std::path::PathBuf;
use std::time::Duration;

const JOB_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn locate_misses_cleanly() {
    let ws = Workspace::new();
    let settings = settings_builder(JOB_TIMEOUT)
        .known_install_paths([ws.absent("x64/signtool.exe"), ws.absent("x86/signtool.exe")])
        .build()
        .unwrap();
    let locator = ToolLocator::new(&settings);

    assert_eq!(locator.locate().await, None);

    let cache = ToolPathCache::new();
    assert_eq!(locator.locate_into(&cache).await, None);
    assert_eq!(cache.status(), ToolStatus::Missing);
}

#[tokio::test]
async fn first_existing_known_path_wins() {
    let ws = Workspace::new();
    let x86 = ws.artifact("x86/signtool.exe");
    let arm = ws.artifact("arm64/signtool.exe");
    let settings = settings_builder(JOB_TIMEOUT)
        .known_install_paths([ws.absent("x64/signtool.exe"), x86.clone(), arm])
        .build()
        .unwrap();
    let locator = ToolLocator::new(&settings);

    let first = locator.locate().await.expect("found");
    let second = locator.locate().await.expect("found again");
    assert_eq!(first.as_path(), x86);
    assert_eq!(first, second);
}

#[cfg(unix)]
#[tokio::test]
async fn search_path_is_checked_before_known_paths() {
    let ws = Workspace::new();
    let known = ws.artifact("x64/signtool.exe");
    let settings = settings_builder(JOB_TIMEOUT)
        .tool_name("sh")
        .known_install_paths([known.clone()])
        .build()
        .unwrap();

    let found = ToolLocator::new(&settings).locate().await.expect("sh is on PATH");
    assert_ne!(found.as_path(), known);
    assert!(found.as_path().ends_with("sh"));
}

#[tokio::test]
async fn discovery_hit_is_cached_and_revalidated() {
    let ws = Workspace::new();
    let tool = ws.artifact("bin/signtool.exe");
    let settings = settings_builder(JOB_TIMEOUT)
        .known_install_paths([tool.clone()])
        .build()
        .unwrap();
    let cache = ToolPathCache::new();

    let found = ToolLocator::new(&settings).locate_into(&cache).await;
    assert_eq!(found.as_ref().map(|p| p.as_path().to_path_buf()), Some(tool.clone()));
    assert_eq!(cache.current(), found);

    std::fs::remove_file(&tool).unwrap();
    assert_eq!(cache.current(), None);
}

#[tokio::test]
async fn manual_override_is_shared_between_clones() {
    let ws = Workspace::new();
    let tool = ws.artifact("custom/signtool.exe");
    let cache = ToolPathCache::new();
    let view = cache.clone();

    cache.set_manual_override(&tool).expect("existing path accepted");
    assert_eq!(view.current().map(|p| p.as_path().to_path_buf()), Some(tool));
}

#[tokio::test]
async fn no_backend_means_manual_install() {
    let settings = settings_builder(JOB_TIMEOUT)
        .backends(vec![unavailable_backend("winget"), unavailable_backend("choco")])
        .download_url("https://example.invalid/sdk")
        .build()
        .unwrap();
    let provisioner = ToolProvisioner::new(&settings);

    let mut lines = Vec::new();
    let outcome = provisioner
        .provision()
        .expect("starts")
        .wait_with_progress(|line| lines.push(line.to_string()))
        .await
        .expect("completes");

    assert_eq!(
        outcome,
        ProvisionOutcome::ManualRequired {
            url: "https://example.invalid/sdk".to_string()
        }
    );
    assert!(lines.iter().any(|l| l.contains("No package manager")));
    assert!(!provisioner.is_running());
}

#[cfg(unix)]
mod with_shell_backends {
    use super::*;
    use common::shell_backend;

    #[tokio::test]
    async fn install_output_is_streamed() {
        let settings = settings_builder(JOB_TIMEOUT)
            .backends(vec![
                unavailable_backend("winget"),
                shell_backend("choco", "echo downloading sdk; echo 'note: reboot later' >&2; exit 0"),
            ])
            .build()
            .unwrap();
        let provisioner = ToolProvisioner::new(&settings);

        let mut lines = Vec::new();
        let outcome = provisioner
            .provision()
            .expect("starts")
            .wait_with_progress(|line| lines.push(line.to_string()))
            .await
            .expect("completes");

        assert_eq!(
            outcome,
            ProvisionOutcome::Installed {
                backend: "choco".to_string()
            }
        );
        for expected in ["Found choco", "downloading sdk", "note: reboot later", "completed"] {
            assert!(
                lines.iter().any(|l| l.contains(expected)),
                "missing {expected:?} in {lines:?}"
            );
        }
    }

    #[tokio::test]
    async fn install_output_in_legacy_code_page_is_drained() {
        let script = "printf 'Fortschritt \\344 10%%\\n'; \
                      i=0; while [ $i -lt 2000 ]; do echo line $i; i=$((i+1)); done; \
                      exit 0";
        let settings = settings_builder(JOB_TIMEOUT)
            .backends(vec![shell_backend("winget", script)])
            .build()
            .unwrap();

        let mut lines = Vec::new();
        let outcome = ToolProvisioner::new(&settings)
            .provision()
            .expect("starts")
            .wait_with_progress(|line| lines.push(line.to_string()))
            .await
            .expect("completes");

        assert_eq!(
            outcome,
            ProvisionOutcome::Installed {
                backend: "winget".to_string()
            }
        );
        assert!(lines.iter().any(|l| l == "Fortschritt \u{FFFD} 10%"), "{lines:?}");
        assert!(lines.iter().any(|l| l == "line 1999"));
    }

    #[tokio::test]
    async fn failing_install_collects_output() {
        let settings = settings_builder(JOB_TIMEOUT)
            .backends(vec![shell_backend("winget", "echo access denied; exit 3")])
            .build()
            .unwrap();

        let outcome = ToolProvisioner::new(&settings)
            .provision()
            .expect("starts")
            .finish()
            .await
            .expect("completes");

        assert_eq!(
            outcome,
            ProvisionOutcome::Failed {
                backend: "winget".to_string(),
                exit_code: Some(3),
                output: vec!["access denied".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn concurrent_provisioning_is_rejected() {
        let settings = settings_builder(JOB_TIMEOUT)
            .backends(vec![shell_backend("winget", "sleep 1")])
            .build()
            .unwrap();
        let provisioner = ToolProvisioner::new(&settings);

        let running = provisioner.provision().expect("first run starts");
        assert!(matches!(provisioner.provision(), Err(Error::ProvisionInFlight)));
        assert!(matches!(
            provisioner.clone().provision(),
            Err(Error::ProvisionInFlight)
        ));

        running.finish().await.expect("first run completes");
        let again = provisioner.provision().expect("free after completion");
        again.finish().await.expect("second run completes");
    }

    #[tokio::test]
    async fn recovery_installs_then_rediscovers() {
        let ws = Workspace::new();
        let target = ws.absent("sdk/signtool.exe");
        let script = format!(
            "mkdir -p '{}' && touch '{}'",
            target.parent().unwrap().display(),
            target.display()
        );
        let settings = settings_builder(JOB_TIMEOUT)
            .known_install_paths([target.clone()])
            .backends(vec![shell_backend("winget", &script)])
            .build()
            .unwrap();
        let cache = ToolPathCache::new();
        let locator = ToolLocator::new(&settings);
        let provisioner = ToolProvisioner::new(&settings);

        let tool = ToolRecovery::new(&cache, &locator, &provisioner)
            .recover(&|| RecoveryChoice::Provision, |_| {})
            .await
            .expect("installed and found");
        assert_eq!(tool.as_path(), target);
        assert_eq!(cache.current(), Some(tool));
    }

    #[tokio::test]
    async fn install_without_detection_is_tool_not_found() {
        let settings = settings_builder(JOB_TIMEOUT)
            .backends(vec![shell_backend("winget", "exit 0")])
            .build()
            .unwrap();
        let cache = ToolPathCache::new();
        let locator = ToolLocator::new(&settings);
        let provisioner = ToolProvisioner::new(&settings);

        let err = ToolRecovery::new(&cache, &locator, &provisioner)
            .recover(&|| RecoveryChoice::Provision, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { ref tool } if tool == MISSING_TOOL_NAME));
    }
}

#[tokio::test]
async fn cached_tool_skips_the_prompt() {
    let ws = Workspace::new();
    let tool = ws.artifact("signtool.exe");
    let settings = settings_builder(JOB_TIMEOUT).build().unwrap();
    let cache = ToolPathCache::new();
    cache.set_manual_override(&tool).unwrap();

    let recovered = ToolRecovery::new(
        &cache,
        &ToolLocator::new(&settings),
        &ToolProvisioner::new(&settings),
    )
    .recover(&|| -> RecoveryChoice { panic!("prompt must not be shown") }, |_| {})
    .await
    .expect("cached path used");
    assert_eq!(recovered.as_path(), tool);
}

#[tokio::test]
async fn recovery_abort_and_manual_path() {
    let ws = Workspace::new();
    let settings = settings_builder(JOB_TIMEOUT).build().unwrap();
    let cache = ToolPathCache::new();
    let locator = ToolLocator::new(&settings);
    let provisioner = ToolProvisioner::new(&settings);
    let recovery = ToolRecovery::new(&cache, &locator, &provisioner);

    let err = recovery
        .recover(&|| RecoveryChoice::Abort, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RecoveryAborted));

    let bogus = ws.absent("nowhere/signtool.exe");
    let err = recovery
        .recover(&move || RecoveryChoice::ManualPath(bogus.clone()), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidToolPath(_)));
    assert_eq!(cache.current(), None);

    let real = ws.artifact("tools/signtool.exe");
    let chosen = real.clone();
    let tool = recovery
        .recover(&move || RecoveryChoice::ManualPath(chosen.clone()), |_| {})
        .await
        .expect("manual path accepted");
    assert_eq!(tool.as_path(), real);
}

#[tokio::test]
async fn missing_tool_without_backends_aborts_batch() {
    let ws = Workspace::new();
    let settings = settings_builder(JOB_TIMEOUT)
        .backends(vec![unavailable_backend("winget"), unavailable_backend("choco")])
        .build()
        .unwrap();
    let mut session = SigningSession::new(settings);
    session.artifacts_mut().add(ws.artifact("a.exe"));

    let credential = signtool_batch::signer::Credential::new(ws.cert(), "secret");
    let result = session
        .sign(credential, &|| RecoveryChoice::Provision, |_| {})
        .await;

    assert!(matches!(result, Err(Error::ManualInstallRequired { .. })));
    assert!(!session.is_signing());
    assert_eq!(session.status(), ToolStatus::Missing);
}

#[tokio::test]
async fn validation_happens_before_prompting() {
    let ws = Workspace::new();
    let settings = settings_builder(JOB_TIMEOUT).build().unwrap();
    let session = SigningSession::new(settings);

    let credential = signtool_batch::signer::Credential::new(ws.cert(), "secret");
    let result = session
        .sign(
            credential,
            &|| -> RecoveryChoice { panic!("prompt must not be shown") },
            |_| {},
        )
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation(signtool_batch::signer::ValidationError::NoArtifacts))
    ));
}

#[tokio::test]
async fn refresh_keeps_manual_override() {
    let ws = Workspace::new();
    let tool: PathBuf = ws.artifact("manual/signtool.exe");
    let session = SigningSession::new(settings_builder(JOB_TIMEOUT).build().unwrap());
    session.set_manual_tool(&tool).unwrap();

    match session.refresh().await {
        ToolStatus::Found(path) => assert_eq!(path.as_path(), tool),
        ToolStatus::Missing => panic!("manual override lost on refresh"),
    }
}
