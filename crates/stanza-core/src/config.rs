use serde::{Deserialize, Serialize};

use crate::Error;

/// File name of the project configuration, looked up in the project root.
pub const CONFIG_FILE: &str = "stanza.toml";

/// stanza.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StanzaConfig {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// `[build]` table as written in stanza.toml.
///
/// Everything except `source_copy` is optional here so that CLI flags can
/// fill the gaps; [`StanzaConfig::build_config`] refuses to produce a
/// [`BuildConfig`] while any of them is still unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSection {
    /// Runtime image, e.g. `node:18-alpine`
    pub base_image: Option<String>,
    /// Working directory inside the container
    pub work_dir: Option<String>,
    /// Files copied before the install step (package manifest, lockfile)
    pub manifest_files: Option<Vec<String>>,
    /// Dependency install command, one token per element
    pub install_command: Option<Vec<String>>,
    /// Application source copy (defaults to `. -> .`)
    pub source_copy: Option<SourceCopy>,
    /// Port the application listens on
    pub exposed_port: Option<u32>,
    /// Startup command, exec form
    pub start_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCopy {
    pub source: String,
    pub dest: String,
}

/// `[image]` table: only used to print the `docker build` / `docker run` hints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Image tag passed to `docker build -t` (defaults to the package name)
    pub name: Option<String>,
    /// Host side of the `-p host:container` mapping (defaults to the exposed port)
    pub host_port: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Write a `.dockerignore` next to the Dockerfile
    #[serde(default = "default_ignore_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ignore_patterns")]
    pub patterns: Vec<String>,
}

/// Validated input of the Dockerfile renderer.
///
/// No `Default`: every field is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub base_image: String,
    pub work_dir: String,
    pub manifest_files: Vec<String>,
    pub install_command: Vec<String>,
    pub source_copy: SourceCopy,
    pub exposed_port: u32,
    pub start_command: Vec<String>,
}

impl Default for SourceCopy {
    fn default() -> Self {
        Self {
            source: ".".to_owned(),
            dest: ".".to_owned(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_ignore_enabled(),
            patterns: default_ignore_patterns(),
        }
    }
}

impl StanzaConfig {
    /// Load from stanza.toml at the given path, or return an empty config if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, starting empty");
            Ok(Self::default())
        }
    }

    /// Resolve the `[build]` table into a validated [`BuildConfig`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] naming the first unset or invalid field.
    pub fn build_config(&self) -> crate::Result<BuildConfig> {
        self.build.resolve()
    }
}

impl BuildSection {
    /// Layer `other` on top of `self`: every field set in `other` wins.
    pub fn overlay(self, other: BuildSection) -> BuildSection {
        BuildSection {
            base_image: other.base_image.or(self.base_image),
            work_dir: other.work_dir.or(self.work_dir),
            manifest_files: other.manifest_files.or(self.manifest_files),
            install_command: other.install_command.or(self.install_command),
            source_copy: other.source_copy.or(self.source_copy),
            exposed_port: other.exposed_port.or(self.exposed_port),
            start_command: other.start_command.or(self.start_command),
        }
    }

    pub fn resolve(&self) -> crate::Result<BuildConfig> {
        let config = BuildConfig {
            base_image: required("base_image", &self.base_image)?,
            work_dir: required("work_dir", &self.work_dir)?,
            manifest_files: required("manifest_files", &self.manifest_files)?,
            install_command: required("install_command", &self.install_command)?,
            source_copy: match &self.source_copy {
                Some(copy) => copy.clone(),
                None => SourceCopy::default(),
            },
            exposed_port: required("exposed_port", &self.exposed_port)?,
            start_command: required("start_command", &self.start_command)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<BuildConfig> for BuildSection {
    fn from(config: BuildConfig) -> Self {
        Self {
            base_image: Some(config.base_image),
            work_dir: Some(config.work_dir),
            manifest_files: Some(config.manifest_files),
            install_command: Some(config.install_command),
            source_copy: Some(config.source_copy),
            exposed_port: Some(config.exposed_port),
            start_command: Some(config.start_command),
        }
    }
}

impl BuildConfig {
    pub const MIN_PORT: u32 = 1;
    pub const MAX_PORT: u32 = 65535;

    /// Check every field constraint.
    ///
    /// A line break or a trailing backslash (line continuation) in any value
    /// would split or merge stanzas, so those are rejected everywhere.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> crate::Result<()> {
        if self.base_image.trim().is_empty() {
            return Err(Error::invalid("base_image", "must not be empty"));
        }
        if self.base_image.chars().any(char::is_whitespace) {
            return Err(Error::invalid("base_image", "must not contain whitespace"));
        }
        check_line("base_image", &self.base_image)?;

        check_line("work_dir", &self.work_dir)?;
        if !self.work_dir.starts_with('/') {
            return Err(Error::invalid(
                "work_dir",
                format!("must be an absolute path, got {:?}", self.work_dir),
            ));
        }

        check_tokens("manifest_files", &self.manifest_files)?;
        check_tokens("install_command", &self.install_command)?;

        check_line("source_copy.source", &self.source_copy.source)?;
        if self.source_copy.source.trim().is_empty() {
            return Err(Error::invalid("source_copy.source", "must not be empty"));
        }
        check_line("source_copy.dest", &self.source_copy.dest)?;
        if self.source_copy.dest.trim().is_empty() {
            return Err(Error::invalid("source_copy.dest", "must not be empty"));
        }

        check_port("exposed_port", self.exposed_port)?;
        check_tokens("start_command", &self.start_command)?;

        Ok(())
    }
}

/// Render a commented stanza.toml with every `[build]` field spelled out.
pub fn config_template(build: &BuildConfig, image_name: Option<&str>) -> String {
    let image = match image_name {
        Some(name) => format!("name = {}", toml_str(name)),
        None => "# name = \"my-app\"".to_owned(),
    };

    format!(
        r#"# Dockerfile recipe: FROM, WORKDIR, COPY, RUN, COPY, EXPOSE, CMD
[build]
base_image = {base_image}
work_dir = {work_dir}
manifest_files = {manifest_files}
install_command = {install_command}
exposed_port = {port}
start_command = {start_command}

[build.source_copy]
source = {source}
dest = {dest}

[image]
{image}
# host_port = {port}

[ignore]
# enabled = true
# patterns = ["node_modules", ".next", ".git"]
"#,
        base_image = toml_str(&build.base_image),
        work_dir = toml_str(&build.work_dir),
        manifest_files = toml_array(&build.manifest_files),
        install_command = toml_array(&build.install_command),
        port = build.exposed_port,
        start_command = toml_array(&build.start_command),
        source = toml_str(&build.source_copy.source),
        dest = toml_str(&build.source_copy.dest),
        image = image,
    )
}

fn toml_str(value: &str) -> String {
    toml::Value::String(value.to_owned()).to_string()
}

fn toml_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| toml_str(v)).collect();
    format!("[{}]", items.join(", "))
}

/// Reject ports outside 1-65535.
pub fn check_port(field: &'static str, port: u32) -> crate::Result<()> {
    if (BuildConfig::MIN_PORT..=BuildConfig::MAX_PORT).contains(&port) {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!(
                "must be between {} and {}, got {port}",
                BuildConfig::MIN_PORT,
                BuildConfig::MAX_PORT
            ),
        ))
    }
}

fn required<T: Clone>(field: &'static str, value: &Option<T>) -> crate::Result<T> {
    value
        .clone()
        .ok_or_else(|| Error::invalid(field, "not set"))
}

fn check_line(field: &'static str, value: &str) -> crate::Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(Error::invalid(field, "must not contain line breaks"));
    }
    // `\` is Docker's escape character: at the end of a line it continues the stanza
    if value.trim_end().ends_with('\\') {
        return Err(Error::invalid(field, "must not end with a backslash"));
    }
    Ok(())
}

fn check_tokens(field: &'static str, tokens: &[String]) -> crate::Result<()> {
    if tokens.is_empty() {
        return Err(Error::invalid(field, "must not be empty"));
    }
    for token in tokens {
        if token.trim().is_empty() {
            return Err(Error::invalid(field, "must not contain blank entries"));
        }
        check_line(field, token)?;
    }
    Ok(())
}

fn default_ignore_enabled() -> bool {
    true
}

fn default_ignore_patterns() -> Vec<String> {
    [
        "node_modules",
        ".next",
        ".git",
        "npm-debug.log",
        "Dockerfile",
        ".dockerignore",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
