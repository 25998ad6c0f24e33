mod check;
mod generate;
mod init;

use std::path::Path;

use stanza_core::{NodeProject, StanzaConfig};

/// Image tag used when neither stanza.toml nor package.json names one.
pub(crate) const FALLBACK_IMAGE_NAME: &str = "app";

pub use check::check;
pub use generate::generate;
pub use init::init_project;

/// Pick the image tag for the command hints: `[image].name`, then the
/// package.json name, then the directory name.
pub(crate) fn image_name(config: &StanzaConfig, project_dir: &Path) -> String {
    if let Some(name) = &config.image.name {
        return name.clone();
    }

    let package_name = if project_dir.join(NodeProject::MANIFEST).exists() {
        match NodeProject::detect(project_dir) {
            Ok(project) => project.name,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read package name; using directory name");
                None
            }
        }
    } else {
        None
    };

    let dir_name = project_dir
        .canonicalize()
        .map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));

    let candidate = match (package_name, dir_name) {
        (Some(name), _) => Some(name),
        (None, Ok(name)) => name,
        (None, Err(e)) => {
            tracing::warn!(error = %e, "failed to resolve project directory name");
            None
        }
    };

    candidate
        .as_deref()
        .and_then(stanza_build::commands::sanitize_image_name)
        .unwrap_or_else(|| FALLBACK_IMAGE_NAME.to_owned())
}
