use stanza_build::DockerfileGenerator;
use stanza_core::{CONFIG_FILE, StanzaConfig};
use std::path::Path;

pub fn check() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    if !project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!("{CONFIG_FILE} not found. Run `stanza init` first.");
    }

    let config = StanzaConfig::load(project_dir)?;
    let build = config.build_config()?;
    let instructions = DockerfileGenerator::new(&build).instructions()?;

    println!("{CONFIG_FILE} is valid ({} stanzas)", instructions.len());
    Ok(())
}
