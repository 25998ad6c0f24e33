use stanza_build::commands::sanitize_image_name;
use stanza_build::write;
use stanza_core::{BuildConfig, CONFIG_FILE, NodeProject, SourceCopy, config_template};
use std::path::Path;

const DEFAULT_BASE_IMAGE: &str = "node:18-alpine";
const DEFAULT_WORK_DIR: &str = "/app";
const DEFAULT_PORT: u32 = 3000;

/// Initialize stanza in an existing Node.js project.
pub fn init_project(force: bool) -> anyhow::Result<()> {
    let project_dir = Path::new(".");

    // Must be inside a Node.js project
    let project = NodeProject::detect(project_dir)?;

    let build = BuildConfig {
        base_image: DEFAULT_BASE_IMAGE.to_owned(),
        work_dir: DEFAULT_WORK_DIR.to_owned(),
        manifest_files: project.manifest_files(),
        install_command: project.package_manager.install_command(),
        source_copy: SourceCopy::default(),
        exposed_port: DEFAULT_PORT,
        start_command: project.package_manager.start_command(),
    };
    let image_name = project.name.as_deref().and_then(sanitize_image_name);
    let template = config_template(&build, image_name.as_deref());

    let path = write::write_file(&project_dir.join(CONFIG_FILE), &template, force)?;
    println!("Created {}", path.display());

    if !project.has_start_script {
        eprintln!(
            "warning: package.json has no \"start\" script; adjust start_command in {CONFIG_FILE}"
        );
    }

    println!();
    println!("Detected {} project.", project.package_manager);
    println!();
    println!("Next steps:");
    println!();
    println!("  1. Review {CONFIG_FILE} (base image, port, start command)");
    println!();
    println!("  2. Generate the Dockerfile:");
    println!("     stanza generate");

    Ok(())
}
