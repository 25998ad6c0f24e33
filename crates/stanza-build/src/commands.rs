use std::fmt;

use stanza_core::config::check_port;

/// The `docker build` / `docker run` invocations for a generated Dockerfile.
///
/// Only printed for the user; stanza never runs the container engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCommands {
    image: String,
    host_port: u32,
    container_port: u32,
}

impl ContainerCommands {
    const ENGINE: &'static str = "docker";

    /// # Errors
    ///
    /// [`stanza_core::Error::InvalidConfig`] for an image name Docker would
    /// reject or a port outside 1-65535.
    pub fn new(image: &str, host_port: u32, container_port: u32) -> stanza_core::Result<Self> {
        validate_image_name(image)?;
        check_port("image.host_port", host_port)?;
        check_port("exposed_port", container_port)?;
        Ok(Self {
            image: image.to_owned(),
            host_port,
            container_port,
        })
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// `docker build -t <image> .`
    pub fn build_args(&self) -> Vec<String> {
        vec![
            Self::ENGINE.to_owned(),
            "build".to_owned(),
            "-t".to_owned(),
            self.image.clone(),
            ".".to_owned(),
        ]
    }

    /// `docker run -p <host>:<container> <image>`
    pub fn run_args(&self) -> Vec<String> {
        vec![
            Self::ENGINE.to_owned(),
            "run".to_owned(),
            "-p".to_owned(),
            format!("{}:{}", self.host_port, self.container_port),
            self.image.clone(),
        ]
    }
}

impl fmt::Display for ContainerCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", self.build_args().join(" "))?;
        write!(f, "  {}", self.run_args().join(" "))
    }
}

/// Turn an arbitrary project name into something usable as an image tag.
///
/// Lowercases, maps disallowed characters to `-` and collapses runs of
/// separators (`a..b` -> `a.b`, `a//b` -> `a/b`). Only the first `:` starts
/// the tag; later ones become `-`. Returns `None` when nothing usable is left.
pub fn sanitize_image_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if is_image_char(c) { c } else { '-' }
        })
        .collect();

    let (repo, tag) = match cleaned.split_once(':') {
        Some((repo, tag)) => (repo, Some(tag)),
        None => (cleaned.as_str(), None),
    };

    let repo = repo
        .split('/')
        .map(collapse_separators)
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if repo.is_empty() {
        return None;
    }

    match tag.map(|tag| collapse_separators(&tag.replace(['/', ':'], "-"))) {
        Some(tag) if !tag.is_empty() => Some(format!("{repo}:{tag}")),
        _ => Some(repo),
    }
}

/// `"--a..b_-"` -> `"a.b"`: one separator between alphanumeric runs, none at
/// either end.
fn collapse_separators(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    let mut after_separator = true;
    for c in component.chars() {
        let separator = !c.is_ascii_alphanumeric();
        if !(separator && after_separator) {
            out.push(c);
        }
        after_separator = separator;
    }
    out.truncate(out.trim_end_matches(|c: char| !c.is_ascii_alphanumeric()).len());
    out
}

fn is_image_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/' | ':')
}

/// Path components follow Docker's reference grammar: alphanumeric runs
/// joined by `.`, `_`, `__` or any number of `-`.
fn is_valid_component(component: &str) -> bool {
    let alnum_ends = component.starts_with(|c: char| c.is_ascii_alphanumeric())
        && component.ends_with(|c: char| c.is_ascii_alphanumeric());
    alnum_ends
        && component
            .split(|c: char| c.is_ascii_alphanumeric())
            .all(|sep| matches!(sep, "." | "_" | "__") || sep.chars().all(|c| c == '-'))
}

fn validate_image_name(image: &str) -> stanza_core::Result<()> {
    let invalid = |reason: &str| stanza_core::Error::InvalidConfig {
        field: "image.name",
        reason: format!("{reason}, got {image:?}"),
    };

    if image.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !image.chars().all(is_image_char) {
        return Err(invalid(
            "may only contain lowercase letters, digits and . _ - / :",
        ));
    }

    let (repo, tag) = match image.split_once(':') {
        Some((repo, tag)) => (repo, Some(tag)),
        None => (image, None),
    };
    if let Some(tag) = tag {
        if tag.is_empty() || tag.contains([':', '/']) {
            return Err(invalid("must have at most one `:` followed by a tag"));
        }
        if !tag.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("tag must start with a letter, digit or `_`"));
        }
    }
    if !repo.split('/').all(is_valid_component) {
        return Err(invalid(
            "each `/` component must start and end with a letter or digit, \
             with single separators between",
        ));
    }
    Ok(())
}
