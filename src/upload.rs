//! Best-effort uploads to an object store through an external client.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::LabError;
use crate::runner::run_with_timeout;

/// Environment variable holding a JSON client command override.
pub(crate) const UPLOAD_COMMAND_ENV: &str = "HASHLAB_UPLOAD_COMMAND";
/// Region used when none is configured.
pub(crate) const DEFAULT_REGION: &str = "us-east-1";
/// Credential profile used when none is configured.
pub(crate) const DEFAULT_PROFILE: &str = "default";
/// Key prefix for the unmodified artifacts.
pub(crate) const ORIGINAL_PREFIX: &str = "original";
/// Key prefix for the mutated artifacts.
pub(crate) const MODIFIED_PREFIX: &str = "modified";

/// Pushes a local file to `key` in the configured bucket.
pub(crate) trait Uploader {
    fn upload(&self, key: &str, local_path: &Path) -> Result<(), LabError>;

    /// Human-readable destination, used in progress messages.
    fn describe(&self, key: &str) -> String {
        key.to_string()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UploadCommandConfig {
    command: Vec<String>,
}

/// Bucket and credential settings substituted into the client command.
#[derive(Debug, Clone)]
pub(crate) struct ObjectStoreTarget {
    pub(crate) bucket: String,
    pub(crate) region: String,
    pub(crate) profile: String,
}

/// Uploader backed by a command-line object-store client.
///
/// Arguments may contain `{bucket}`, `{key}`, `{file}`, `{region}` and
/// `{profile}` placeholders.
pub(crate) struct CommandUploader {
    argv: Vec<String>,
    target: ObjectStoreTarget,
    timeout: Duration,
}

impl CommandUploader {
    pub(crate) fn new(argv: Vec<String>, target: ObjectStoreTarget, timeout: Duration) -> Self {
        Self {
            argv,
            target,
            timeout,
        }
    }

    /// Build the uploader from `HASHLAB_UPLOAD_COMMAND`, falling back to the AWS CLI.
    pub(crate) fn from_env(target: ObjectStoreTarget, timeout: Duration) -> Result<Self> {
        let argv = match env::var(UPLOAD_COMMAND_ENV) {
            Ok(raw) => {
                parse_command_config(&raw).with_context(|| format!("parse {UPLOAD_COMMAND_ENV}"))?
            }
            Err(_) => default_upload_command(),
        };
        Ok(Self::new(argv, target, timeout))
    }

    fn render_argv(&self, key: &str, local_path: &Path) -> Vec<String> {
        let file = local_path.display().to_string();
        self.argv
            .iter()
            .map(|arg| {
                arg.replace("{bucket}", &self.target.bucket)
                    .replace("{key}", key)
                    .replace("{file}", &file)
                    .replace("{region}", &self.target.region)
                    .replace("{profile}", &self.target.profile)
            })
            .collect()
    }
}

impl Uploader for CommandUploader {
    fn upload(&self, key: &str, local_path: &Path) -> Result<(), LabError> {
        let argv = self.render_argv(key, local_path);
        log::debug!("upload command: {argv:?}");
        let output = run_with_timeout(&argv, self.timeout)
            .map_err(|err| LabError::upload(key, format!("{err:#}")))?;
        log::debug!("upload of {key} finished in {} ms", output.wall_time_ms);
        if output.success() {
            return Ok(());
        }
        if output.timed_out {
            return Err(LabError::upload(
                key,
                format!("client timed out after {} ms", self.timeout.as_millis()),
            ));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let status = match output.exit_code {
            Some(code) => format!("client exited with status {code}"),
            None => "client terminated by signal".to_string(),
        };
        if stderr.is_empty() {
            Err(LabError::upload(key, status))
        } else {
            Err(LabError::upload(key, format!("{status}: {stderr}")))
        }
    }

    fn describe(&self, key: &str) -> String {
        format!("s3://{}/{}", self.target.bucket, key)
    }
}

fn parse_command_config(raw: &str) -> Result<Vec<String>> {
    let config: UploadCommandConfig =
        serde_json::from_str(raw).context("parse upload command JSON")?;
    if config.command.is_empty() {
        return Err(anyhow!("upload command is empty"));
    }
    Ok(config.command)
}

fn default_upload_command() -> Vec<String> {
    [
        "aws",
        "s3api",
        "put-object",
        "--bucket",
        "{bucket}",
        "--key",
        "{key}",
        "--body",
        "{file}",
        "--region",
        "{region}",
        "--profile",
        "{profile}",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

/// Object key for `local_path` under `prefix`: `<prefix>/<file name>`.
pub(crate) fn object_key(prefix: &str, local_path: &Path) -> Result<String, LabError> {
    let name = local_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            LabError::upload(
                prefix,
                format!("{} has no usable file name", local_path.display()),
            )
        })?;
    Ok(format!("{}/{}", prefix.trim_end_matches('/'), name))
}
