//! Installation orchestrator.
//!
//! One run moves through these steps:
//!
//! 1. refuse an existing target unless overwriting was confirmed
//! 2. read the previous configuration files into memory
//! 3. acquire new content in a staging directory next to the target
//! 4. back up the previous configuration and park the backup directory
//! 5. replace the target with the staged content
//! 6. merge the previous configuration into the new files
//! 7. write the installer choices
//! 8. restore the backup directory
//!
//! Nothing inside the target is touched before step 4, so any failure
//! during acquisition leaves a previous installation intact.

mod acquire;
pub mod patch;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::AppContext;
use crate::app::services::{backup, config_merge};
use crate::domain::backup::TagStrategy;
use crate::domain::installation::validate_site_name;
use crate::domain::layout::{self, VERSION_FILE};
use crate::domain::release::sort_versions;
use crate::domain::{
    AppError, BACKUP_DIR, BackupTag, ConfigFiles, ConfigKind, InstallRequest, JsonDocument,
    MergeMiss,
};
use crate::ports::{PackageRegistry, ReleaseSource};

/// Merge result for one configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMerge {
    pub kind: ConfigKind,
    pub path: PathBuf,
    pub misses: Vec<MergeMiss>,
}

/// Result of a completed installation.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub target: PathBuf,
    pub version: String,
    /// Whether a previous installation was replaced.
    pub updated: bool,
    pub backups: Vec<PathBuf>,
    pub merges: Vec<FileMerge>,
    pub warnings: Vec<String>,
}

impl InstallOutcome {
    pub fn misses(&self) -> impl Iterator<Item = &MergeMiss> {
        self.merges.iter().flat_map(|merge| merge.misses.iter())
    }

    pub fn has_misses(&self) -> bool {
        self.misses().next().is_some()
    }
}

/// Configuration of the installation being replaced.
struct PriorConfig {
    kind: ConfigKind,
    source: PathBuf,
    document: JsonDocument,
}

/// Version to install: `requested` when given, the newest published
/// version otherwise.
pub fn resolve_version<R, S>(
    ctx: &AppContext<R, S>,
    requested: Option<&str>,
) -> Result<String, AppError>
where
    R: PackageRegistry,
    S: ReleaseSource,
{
    if let Some(version) = requested.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(version.trim_start_matches('v').to_string());
    }

    let package = &ctx.config().registry.package;
    let versions = sort_versions(ctx.registry().list_versions(package)?);
    versions.last().cloned().ok_or_else(|| {
        AppError::config_error(format!("No published versions found for {}", package))
    })
}

/// Run an installation.
pub fn execute<R, S>(
    ctx: &AppContext<R, S>,
    request: &InstallRequest,
) -> Result<InstallOutcome, AppError>
where
    R: PackageRegistry,
    S: ReleaseSource,
{
    validate_site_name(&request.site_name)?;
    let target = request.target_dir.as_path();
    let existing = target.exists();

    if existing && !request.overwrite {
        return Err(AppError::TargetExists(target.display().to_string()));
    }

    let prior = if existing { probe(target)? } else { Vec::new() };
    let stamp = BackupTag::from_datetime(&Local::now());
    let tag = backup_tag(ctx.config().merge.backup_tag, target, &stamp);
    tracing::debug!(dir = %target.display(), existing, prior = prior.len(), tag = %tag, "probed");

    let parent = parent_dir(target);
    fs::create_dir_all(&parent)?;
    let staging = tempfile::Builder::new().prefix(".create-conjoon-").tempdir_in(&parent)?;
    let acquired = acquire::acquire(ctx, request, staging.path())?;

    let backup_dir = target.join(BACKUP_DIR);
    let mut backups = Vec::new();
    let mut holding = None;
    if existing {
        let sources: Vec<&Path> = prior.iter().map(|config| config.source.as_path()).collect();
        backups = backup::snapshot(&sources, &backup_dir, &tag)?;
        holding = backup::relocate(&backup_dir, &stamp)?;
    }

    let replaced = replace(target, existing, &acquired.root).and_then(|()| {
        let merges = merge_prior(target, &prior)?;
        patch::apply(target, request, ctx.config().merge.collision_policy)?;
        fs::write(target.join(VERSION_FILE), format!("{}\n", acquired.version))?;
        if let Some(holding) = &holding {
            backup::restore(holding, &backup_dir)?;
        }
        Ok(merges)
    });

    let merges = match replaced {
        Ok(merges) => merges,
        Err(err) => return Err(abort(target, existing, holding, err)),
    };

    Ok(InstallOutcome {
        target: target.to_path_buf(),
        version: acquired.version,
        updated: existing,
        backups,
        merges,
        warnings: acquired.warnings,
    })
}

fn probe(target: &Path) -> Result<Vec<PriorConfig>, AppError> {
    let files = ConfigFiles::probe(target);
    files
        .iter()
        .map(|(kind, source)| {
            tracing::debug!(kind = kind.label(), source = %source.display(), "found configuration");
            Ok(PriorConfig {
                kind,
                source: source.to_path_buf(),
                document: JsonDocument::read(source)?,
            })
        })
        .collect()
}

fn backup_tag(strategy: TagStrategy, target: &Path, stamp: &BackupTag) -> BackupTag {
    if strategy == TagStrategy::Version {
        let pinned = fs::read_to_string(target.join(VERSION_FILE)).ok();
        match pinned.as_deref().map(BackupTag::from_version) {
            Some(Ok(tag)) => return tag,
            _ => tracing::debug!("no usable version pin, tagging backups by date"),
        }
    }
    stamp.clone()
}

fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn replace(target: &Path, existing: bool, staged: &Path) -> Result<(), AppError> {
    if existing {
        if target.is_dir() {
            fs::remove_dir_all(target)?;
        } else {
            fs::remove_file(target)?;
        }
    }

    if let Err(err) = fs::rename(staged, target) {
        tracing::debug!(error = %err, "rename failed, copying staged content");
        backup::copy_tree(staged, target)?;
    }
    Ok(())
}

fn merge_prior(target: &Path, prior: &[PriorConfig]) -> Result<Vec<FileMerge>, AppError> {
    prior
        .iter()
        .map(|config| {
            let path = layout::locate(target, config.kind)
                .or_else(|| layout::candidates(target, config.kind).into_iter().next())
                .unwrap_or_else(|| target.join(config.kind.file_name()));
            let misses = config_merge::merge_into_file(&config.document, &path)?;
            Ok(FileMerge { kind: config.kind, path, misses })
        })
        .collect()
}

/// Turn a failure after acquisition into the error reported to the user.
fn abort(target: &Path, existing: bool, holding: Option<PathBuf>, err: AppError) -> AppError {
    if !existing
        && target.exists()
        && let Err(cleanup) = fs::remove_dir_all(target)
    {
        tracing::warn!(error = %cleanup, "failed to remove partial installation");
    }
    match holding {
        Some(holding) => AppError::ReplaceAborted {
            holding: holding.display().to_string(),
            source: Box::new(err),
        },
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BundleType, InstallType, InstallerConfig};
    use crate::testing::{FakeRegistry, FakeReleaseSource};
    use serde_json::{Value, json};

    const PROD: &str = "resources/coon-js/conjoon.conf.json";
    const DEV: &str = "resources/coon-js/conjoon.dev.conf.json";

    fn request(target: &Path, version: &str) -> InstallRequest {
        InstallRequest {
            site_name: "mysite".to_string(),
            target_dir: target.to_path_buf(),
            version: version.to_string(),
            install_type: InstallType::Quick,
            bundle: BundleType::Release,
            urls: None,
            auth_package: "extjs-app-imapuser".to_string(),
            overwrite: false,
        }
    }

    fn release(files: &[(&str, Value)]) -> FakeReleaseSource {
        files.iter().fold(FakeReleaseSource::new(), |source, (path, value)| {
            source.with_file(path, &value.to_string())
        })
    }

    fn context(
        releases: FakeReleaseSource,
        config: InstallerConfig,
    ) -> AppContext<FakeRegistry, FakeReleaseSource> {
        AppContext::new(FakeRegistry::new().with_versions(&["1.0.0", "1.0.1"]), releases, config)
    }

    fn read(path: &Path) -> Value {
        JsonDocument::read(path).unwrap().into_value()
    }

    fn write(path: &Path, value: Value) {
        JsonDocument::from_value(value).unwrap().write(path).unwrap();
    }

    fn version_tagged_config() -> InstallerConfig {
        let mut config = InstallerConfig::default();
        config.merge.backup_tag = TagStrategy::Version;
        config
    }

    fn staging_leftovers(parent: &Path) -> Vec<String> {
        fs::read_dir(parent)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".create-conjoon-"))
            .collect()
    }

    #[test]
    fn fresh_install_patches_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        let releases = release(&[(PROD, json!({"conjoon": {"application": {"title": "x"}}}))]);
        let ctx = context(releases, InstallerConfig::default());

        let outcome = execute(&ctx, &request(&target, "1.0.1")).unwrap();

        assert!(!outcome.updated);
        assert!(outcome.backups.is_empty());
        assert!(!outcome.has_misses());
        assert_eq!(outcome.version, "1.0.1");
        assert_eq!(read(&target.join(PROD))["conjoon"]["application"]["title"], json!("mysite"));
        assert_eq!(fs::read_to_string(target.join(VERSION_FILE)).unwrap(), "1.0.1\n");
        assert!(staging_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn existing_target_without_overwrite_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        write(&target.join(PROD), json!({"a": 1}));
        let ctx = context(release(&[]), InstallerConfig::default());

        let err = execute(&ctx, &request(&target, "1.0.1")).unwrap_err();

        assert!(matches!(err, AppError::TargetExists(_)));
        assert!(ctx.releases().fetched().is_empty());
        assert_eq!(read(&target.join(PROD)), json!({"a": 1}));
        assert!(!target.join(BACKUP_DIR).exists());
    }

    #[test]
    fn update_merges_previous_values_and_reports_misses() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        write(
            &target.join(PROD),
            json!({"conjoon": {
                "application": {"title": "mysite"},
                "packages": {"extjs-app-imapuser": {"config": {"service": {"rest-imapuser": {
                    "base": "https://mail.example/auth/"
                }}}}, "extjs-legacy": {"enabled": true}}
            }}),
        );
        write(&target.join(DEV), json!({"debug": true}));
        fs::write(target.join(VERSION_FILE), "1.0.0\n").unwrap();
        let releases = release(&[
            (
                PROD,
                json!({"conjoon": {"application": {"title": "conjoon"}, "packages": {
                    "extjs-app-imapuser": {"config": {"service": {"rest-imapuser": {
                        "base": "https://ddev-ms-email.ddev.site/rest-imapuser/api/v0/"
                    }}}}
                }}}),
            ),
            (DEV, json!({"debug": false, "level": 2})),
        ]);
        let ctx = context(releases, version_tagged_config());
        let mut request = request(&target, "1.0.1");
        request.overwrite = true;

        let outcome = execute(&ctx, &request).unwrap();

        assert!(outcome.updated);
        let prod = read(&target.join(PROD));
        assert_eq!(
            prod["conjoon"]["packages"]["extjs-app-imapuser"]["config"]["service"]["rest-imapuser"]
                ["base"],
            json!("https://mail.example/auth/")
        );
        assert!(prod["conjoon"]["packages"].get("extjs-legacy").is_none());
        let dev = read(&target.join(DEV));
        assert_eq!((&dev["debug"], &dev["level"]), (&json!(true), &json!(2)));

        let misses: Vec<String> = outcome.misses().map(ToString::to_string).collect();
        assert_eq!(misses, ["conjoon.packages.extjs-legacy.enabled: true"]);

        assert_eq!(
            outcome.backups,
            [
                target.join(BACKUP_DIR).join("conjoon.conf.v1.0.0.json"),
                target.join(BACKUP_DIR).join("conjoon.dev.conf.v1.0.0.json"),
            ]
        );
        for backup in &outcome.backups {
            assert!(backup.is_file(), "{} missing", backup.display());
        }
        assert_eq!(fs::read_to_string(target.join(VERSION_FILE)).unwrap(), "1.0.1\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "mysite")
            .collect();
        assert!(leftovers.is_empty(), "unexpected leftovers: {:?}", leftovers);
    }

    #[test]
    fn repeated_updates_keep_every_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        write(&target.join(PROD), json!({"conjoon": {"application": {"title": "mysite"}}}));
        fs::write(target.join(VERSION_FILE), "1.0.0\n").unwrap();
        let releases = release(&[(PROD, json!({"conjoon": {"application": {"title": "x"}}}))]);
        let ctx = context(releases, version_tagged_config());

        let mut first = request(&target, "1.0.1");
        first.overwrite = true;
        execute(&ctx, &first).unwrap();
        let mut second = request(&target, "1.0.2");
        second.overwrite = true;
        execute(&ctx, &second).unwrap();

        let backup_dir = target.join(BACKUP_DIR);
        assert!(backup_dir.join("conjoon.conf.v1.0.0.json").is_file());
        assert!(backup_dir.join("conjoon.conf.v1.0.1.json").is_file());
    }

    #[test]
    fn failed_download_leaves_previous_installation_intact() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        write(&target.join(PROD), json!({"a": 1}));
        let ctx = context(FakeReleaseSource::new().missing_release(), InstallerConfig::default());
        let mut request = request(&target, "9.9.9");
        request.overwrite = true;

        let err = execute(&ctx, &request).unwrap_err();

        assert!(matches!(err, AppError::Download { .. }));
        assert_eq!(read(&target.join(PROD)), json!({"a": 1}));
        assert!(!target.join(BACKUP_DIR).exists());
        assert!(staging_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn failure_after_replacement_names_parked_backups() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        write(&target.join(PROD), json!({"conjoon": {"application": {"title": "mysite"}}}));
        let releases = release(&[(PROD, json!({"conjoon": {"application": "legacy"}}))]);
        let mut config = InstallerConfig::default();
        config.merge.collision_policy = crate::domain::CollisionPolicy::Reject;
        let ctx = context(releases, config);
        let mut request = request(&target, "1.0.1");
        request.overwrite = true;

        let err = execute(&ctx, &request).unwrap_err();

        let AppError::ReplaceAborted { holding, .. } = &err else {
            panic!("unexpected error: {err:?}");
        };
        let holding = PathBuf::from(holding);
        assert!(holding.is_dir());
        let parked: Vec<_> = fs::read_dir(&holding).unwrap().collect();
        assert_eq!(parked.len(), 1);
        assert!(err.to_string().contains("copy them back manually"));
    }

    #[test]
    fn failed_fresh_install_removes_partial_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        let releases = release(&[(PROD, json!({"conjoon": {"application": 1}}))]);
        let mut config = InstallerConfig::default();
        config.merge.collision_policy = crate::domain::CollisionPolicy::Reject;
        let ctx = context(releases, config);

        let err = execute(&ctx, &request(&target, "1.0.1")).unwrap_err();

        assert!(matches!(err, AppError::PathCollision { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn npm_install_uses_installed_package() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mysite");
        let registry = FakeRegistry::new()
            .with_versions(&["1.0.1"])
            .with_package_manifest("{\"name\": \"@conjoon/conjoon\", \"version\": \"1.0.1\"}")
            .with_file(PROD, "{\"conjoon\": {}}");
        let ctx = AppContext::new(registry, FakeReleaseSource::new(), InstallerConfig::default());
        let mut request = request(&target, "1.0.1");
        request.bundle = BundleType::Npm;

        let outcome = execute(&ctx, &request).unwrap();

        assert_eq!(outcome.version, "1.0.1");
        assert_eq!(read(&target.join("package.json"))["name"], json!("mysite"));
        assert_eq!(read(&target.join(PROD))["conjoon"]["application"]["title"], json!("mysite"));
    }

    #[test]
    fn resolves_latest_published_version() {
        let registry = FakeRegistry::new().with_versions(&["1.10.0", "1.2.0", "1.9.1"]);
        let ctx = AppContext::new(registry, FakeReleaseSource::new(), InstallerConfig::default());

        assert_eq!(resolve_version(&ctx, None).unwrap(), "1.10.0");
        assert_eq!(resolve_version(&ctx, Some(" v2.0.0 ")).unwrap(), "2.0.0");
    }

    #[test]
    fn resolving_without_published_versions_fails() {
        let ctx = AppContext::new(
            FakeRegistry::new(),
            FakeReleaseSource::new(),
            InstallerConfig::default(),
        );
        assert!(resolve_version(&ctx, None).is_err());
    }
}
