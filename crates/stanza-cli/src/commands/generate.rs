use stanza_build::{ContainerCommands, DockerfileGenerator, render_dockerignore, write};
use stanza_core::{BuildSection, SourceCopy, StanzaConfig};
use std::path::Path;

use crate::GenerateArgs;

/// Render the Dockerfile and write it (plus .dockerignore) to the output directory.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let config = StanzaConfig::load(project_dir)?;

    let section = config.build.clone().overlay(flag_overrides(args, &config.build));
    let build = section.resolve()?;
    let dockerfile = DockerfileGenerator::new(&build).render()?;

    if args.stdout {
        print!("{dockerfile}");
        return Ok(());
    }

    // Validated up front so a bad [image] table leaves no files behind
    let image = super::image_name(&config, project_dir);
    let host_port = config.image.host_port.unwrap_or(build.exposed_port);
    let commands = ContainerCommands::new(&image, host_port, build.exposed_port)?;

    let path = write::write_dockerfile(&args.output, &dockerfile, args.force)?;
    println!("Wrote {}", path.display());

    if config.ignore.enabled && !args.no_ignore {
        let ignore = render_dockerignore(&config.ignore.patterns);
        if let Some(path) = write::write_dockerignore_if_absent(&args.output, &ignore)? {
            println!("Wrote {}", path.display());
        }
    }

    println!();
    println!("Build and run the image:");
    println!();
    println!("{commands}");

    Ok(())
}

/// CLI flags as a `[build]` layer; unset flags leave the file value alone.
fn flag_overrides(args: &GenerateArgs, file: &BuildSection) -> BuildSection {
    let source_copy = if args.source.is_some() || args.dest.is_some() {
        let base = match &file.source_copy {
            Some(copy) => copy.clone(),
            None => SourceCopy::default(),
        };
        Some(SourceCopy {
            source: args.source.clone().unwrap_or(base.source),
            dest: args.dest.clone().unwrap_or(base.dest),
        })
    } else {
        None
    };

    BuildSection {
        base_image: args.base_image.clone(),
        work_dir: args.work_dir.clone(),
        manifest_files: if args.manifest_files.is_empty() {
            None
        } else {
            Some(args.manifest_files.clone())
        },
        install_command: args.install.as_deref().map(split_command),
        source_copy,
        exposed_port: args.port,
        start_command: args.start.as_deref().map(split_command),
    }
}

/// `"npm run start"` -> `["npm", "run", "start"]`
fn split_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_owned).collect()
}
