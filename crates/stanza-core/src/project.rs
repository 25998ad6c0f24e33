//! Node.js project discovery from `package.json` and lockfiles.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The package manager a project uses, inferred from its lockfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Lockfiles in lookup order; the first one present wins.
    const LOCKFILES: &'static [(&'static str, PackageManager)] = &[
        ("pnpm-lock.yaml", PackageManager::Pnpm),
        ("yarn.lock", PackageManager::Yarn),
        ("package-lock.json", PackageManager::Npm),
    ];

    pub fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    pub fn install_command(self) -> Vec<String> {
        vec![self.program().to_owned(), "install".to_owned()]
    }

    pub fn start_command(self) -> Vec<String> {
        vec![self.program().to_owned(), "start".to_owned()]
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

/// Metadata extracted from the project's package.json
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeProject {
    pub name: Option<String>,
    pub package_manager: PackageManager,
    /// Lockfile found next to package.json, if any
    pub lockfile: Option<String>,
    pub has_start_script: bool,
}

#[derive(Deserialize)]
struct PackageJson {
    name: Option<String>,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

impl NodeProject {
    pub const MANIFEST: &'static str = "package.json";

    /// Read `package.json` in `project_dir` and detect the package manager.
    ///
    /// # Errors
    ///
    /// - [`Error::ManifestNotFound`](crate::Error::ManifestNotFound) if there is no package.json
    /// - [`Error::ManifestRead`](crate::Error::ManifestRead) / [`Error::ManifestParse`](crate::Error::ManifestParse) on I/O or JSON failures
    pub fn detect(project_dir: &Path) -> crate::Result<Self> {
        let manifest_path = project_dir.join(Self::MANIFEST);
        if !manifest_path.exists() {
            return Err(crate::Error::ManifestNotFound {
                dir: project_dir.to_path_buf(),
            });
        }

        let content =
            std::fs::read_to_string(&manifest_path).map_err(|e| crate::Error::ManifestRead {
                path: manifest_path.clone(),
                source: e,
            })?;
        let parsed: PackageJson =
            serde_json::from_str(&content).map_err(|e| crate::Error::ManifestParse {
                path: manifest_path.clone(),
                source: e,
            })?;

        let found = PackageManager::LOCKFILES
            .iter()
            .find(|(file, _)| project_dir.join(file).exists());
        let (package_manager, lockfile) = match found {
            Some((file, manager)) => (*manager, Some((*file).to_owned())),
            None => (PackageManager::Npm, None),
        };

        let project = Self {
            name: parsed.name.filter(|n| !n.trim().is_empty()),
            package_manager,
            lockfile,
            has_start_script: parsed.scripts.contains_key("start"),
        };

        tracing::debug!(
            name = ?project.name,
            manager = %project.package_manager,
            lockfile = ?project.lockfile,
            "node project detected"
        );

        Ok(project)
    }

    /// Files to copy before installing: the manifest, then the lockfile.
    pub fn manifest_files(&self) -> Vec<String> {
        let mut files = vec![Self::MANIFEST.to_owned()];
        if let Some(lockfile) = &self.lockfile {
            files.push(lockfile.clone());
        }
        files
    }
}
