use std::borrow::Cow;
use std::fmt;

use stanza_core::BuildConfig;

/// One Dockerfile line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    From(String),
    Workdir(String),
    Copy { sources: Vec<String>, dest: String },
    Run(Vec<String>),
    Expose(u32),
    /// Exec form, rendered as a JSON array
    Cmd(Vec<String>),
}

impl Instruction {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::From(_) => "FROM",
            Self::Workdir(_) => "WORKDIR",
            Self::Copy { .. } => "COPY",
            Self::Run(_) => "RUN",
            Self::Expose(_) => "EXPOSE",
            Self::Cmd(_) => "CMD",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.keyword())?;
        match self {
            Self::From(image) => f.write_str(image),
            Self::Workdir(dir) => f.write_str(dir),
            Self::Copy { sources, dest } => {
                let paths = || sources.iter().chain(std::iter::once(dest));
                if paths().any(|p| needs_json_form(p)) {
                    write_json_array(f, paths())
                } else {
                    write!(f, "{} {dest}", sources.join(" "))
                }
            }
            Self::Run(tokens) => {
                let quoted: Vec<Cow<'_, str>> = tokens.iter().map(|t| shell_quote(t)).collect();
                f.write_str(&quoted.join(" "))
            }
            Self::Expose(port) => write!(f, "{port}"),
            Self::Cmd(tokens) => write_json_array(f, tokens.iter()),
        }
    }
}

/// `["a", "b"]`, each element a JSON string (quotes, backslashes and control
/// characters escaped).
fn write_json_array<'s>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'s String>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", serde_json::Value::from(item.as_str()))?;
    }
    f.write_str("]")
}

/// Shell-form `COPY` splits on whitespace and treats a leading `[` as JSON.
fn needs_json_form(path: &str) -> bool {
    path.starts_with('[') || path.chars().any(char::is_whitespace)
}

/// Quote a `RUN` token for `/bin/sh` so it stays a single argument.
///
/// Plain words pass through; anything else is wrapped in single quotes with
/// embedded `'` written as `'\''`.
fn shell_quote(token: &str) -> Cow<'_, str> {
    let plain = !token.is_empty()
        && token.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | '%' | '+' | ',')
        });
    if plain {
        Cow::Borrowed(token)
    } else {
        Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
    }
}

/// Renders a single-stage Dockerfile for a Node.js application.
///
/// Stanza order is fixed: `FROM`, `WORKDIR`, `COPY` (manifests), `RUN`
/// (install), `COPY` (source), `EXPOSE`, `CMD`.
pub struct DockerfileGenerator<'a> {
    config: &'a BuildConfig,
}

impl<'a> DockerfileGenerator<'a> {
    /// Manifests land in the working directory.
    const MANIFEST_DEST: &'static str = "./";

    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    /// The stanzas in render order.
    ///
    /// # Errors
    ///
    /// [`stanza_core::Error::InvalidConfig`] if the config violates any constraint.
    pub fn instructions(&self) -> stanza_core::Result<Vec<Instruction>> {
        self.config.validate()?;
        let config = self.config;

        Ok(vec![
            Instruction::From(config.base_image.clone()),
            Instruction::Workdir(config.work_dir.clone()),
            Instruction::Copy {
                sources: config.manifest_files.clone(),
                dest: Self::MANIFEST_DEST.to_owned(),
            },
            Instruction::Run(config.install_command.clone()),
            Instruction::Copy {
                sources: vec![config.source_copy.source.clone()],
                dest: config.source_copy.dest.clone(),
            },
            Instruction::Expose(config.exposed_port),
            Instruction::Cmd(config.start_command.clone()),
        ])
    }

    /// Render the Dockerfile text, one stanza per line with a trailing newline.
    ///
    /// Nothing is produced unless the whole config is valid.
    pub fn render(&self) -> stanza_core::Result<String> {
        let instructions = self.instructions()?;

        let mut out = String::new();
        for instruction in &instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }

        tracing::debug!(
            base_image = %self.config.base_image,
            port = self.config.exposed_port,
            lines = instructions.len(),
            "dockerfile rendered"
        );

        Ok(out)
    }
}

/// Shorthand for `DockerfileGenerator::new(config).render()`.
pub fn render(config: &BuildConfig) -> stanza_core::Result<String> {
    DockerfileGenerator::new(config).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_escapes_quotes() {
        let cmd = Instruction::Cmd(vec!["node".to_owned(), r#"say "hi""#.to_owned()]);
        assert_eq!(cmd.to_string(), r#"CMD ["node", "say \"hi\""]"#);
    }

    #[test]
    fn copy_joins_sources() {
        let copy = Instruction::Copy {
            sources: vec!["package.json".to_owned(), "yarn.lock".to_owned()],
            dest: "./".to_owned(),
        };
        assert_eq!(copy.to_string(), "COPY package.json yarn.lock ./");
    }

    #[test]
    fn run_is_shell_form() {
        let run = Instruction::Run(vec!["npm".to_owned(), "ci".to_owned()]);
        assert_eq!(run.to_string(), "RUN npm ci");
    }

    #[test]
    fn run_quotes_tokens_with_spaces_and_operators() {
        let run = Instruction::Run(vec![
            "sh".to_owned(),
            "-c".to_owned(),
            "npm ci && npm run build".to_owned(),
        ]);
        assert_eq!(run.to_string(), "RUN sh -c 'npm ci && npm run build'");
    }

    #[test]
    fn run_escapes_single_quotes() {
        let run = Instruction::Run(vec!["echo".to_owned(), "it's".to_owned()]);
        assert_eq!(run.to_string(), r"RUN echo 'it'\''s'");
    }

    #[test]
    fn run_keeps_scoped_packages_plain() {
        let run = Instruction::Run(vec![
            "npm".to_owned(),
            "install".to_owned(),
            "@acme/ui@1.2.0".to_owned(),
            "--omit=dev".to_owned(),
        ]);
        assert_eq!(run.to_string(), "RUN npm install @acme/ui@1.2.0 --omit=dev");
    }

    #[test]
    fn run_quotes_empty_token() {
        let run = Instruction::Run(vec!["npm".to_owned(), String::new()]);
        assert_eq!(run.to_string(), "RUN npm ''");
    }

    #[test]
    fn copy_with_space_uses_json_form() {
        let copy = Instruction::Copy {
            sources: vec!["my package.json".to_owned(), "yarn.lock".to_owned()],
            dest: "./".to_owned(),
        };
        assert_eq!(
            copy.to_string(),
            r#"COPY ["my package.json", "yarn.lock", "./"]"#
        );
    }

    #[test]
    fn copy_with_spaced_dest_uses_json_form() {
        let copy = Instruction::Copy {
            sources: vec![".".to_owned()],
            dest: "/srv/my app".to_owned(),
        };
        assert_eq!(copy.to_string(), r#"COPY [".", "/srv/my app"]"#);
    }
}
