use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn stanza() -> assert_cmd::Command {
    cargo_bin_cmd!("stanza")
}

const HELLO_WORLD_CONFIG: &str = r#"
[build]
base_image = "node:18-alpine"
work_dir = "/app"
manifest_files = ["package.json"]
install_command = ["npm", "install"]
exposed_port = 3000
start_command = ["npm", "start"]

[image]
name = "next-hello-world"
"#;

const HELLO_WORLD_DOCKERFILE: &str = "\
FROM node:18-alpine
WORKDIR /app
COPY package.json ./
RUN npm install
COPY . .
EXPOSE 3000
CMD [\"npm\", \"start\"]
";

fn project_with_config(config: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("package.json"),
        r#"{ "name": "next-hello-world", "scripts": { "start": "next start" } }"#,
    )
    .unwrap();
    std::fs::write(tmp.path().join("stanza.toml"), config).unwrap();
    tmp
}

// ── Help / Version ──

#[test]
fn shows_help() {
    stanza()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scaffold Dockerfiles"));
}

#[test]
fn shows_version() {
    stanza()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stanza"));
}

// ── Init Command ──

#[test]
fn init_writes_config_for_npm_project() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("package.json"),
        r#"{ "name": "next-hello-world", "scripts": { "start": "next start" } }"#,
    )
    .unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("npm"));

    let content = std::fs::read_to_string(tmp.path().join("stanza.toml")).unwrap();
    assert!(content.contains("node:18-alpine"));
    assert!(content.contains("exposed_port = 3000"));
    assert!(content.contains("next-hello-world"));
}

#[test]
fn init_uses_yarn_lockfile() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("package.json"), r#"{ "name": "web" }"#).unwrap();
    std::fs::write(tmp.path().join("yarn.lock"), "").unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("no \"start\" script"));

    let content = std::fs::read_to_string(tmp.path().join("stanza.toml")).unwrap();
    assert!(content.contains("yarn.lock"));
    assert!(content.contains(r#"install_command = ["yarn", "install"]"#));
}

#[test]
fn init_fails_without_package_json() {
    let tmp = TempDir::new().unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.json"));

    assert!(!tmp.path().join("stanza.toml").exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let tmp = project_with_config("# hand-written\n");

    stanza()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(tmp.path().join("stanza.toml")).unwrap();
    assert_eq!(content, "# hand-written\n");
}

#[test]
fn init_then_generate() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("package.json"),
        r#"{ "name": "next-hello-world", "scripts": { "start": "next start" } }"#,
    )
    .unwrap();

    stanza().current_dir(tmp.path()).arg("init").assert().success();
    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success();

    let dockerfile = std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
    assert_eq!(dockerfile, HELLO_WORLD_DOCKERFILE);
}

// ── Generate Command ──

#[test]
fn generate_writes_dockerfile_and_prints_commands() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "docker build -t next-hello-world .",
        ))
        .stdout(predicate::str::contains(
            "docker run -p 3000:3000 next-hello-world",
        ));

    let dockerfile = std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
    assert_eq!(dockerfile, HELLO_WORLD_DOCKERFILE);

    let ignore = std::fs::read_to_string(tmp.path().join(".dockerignore")).unwrap();
    assert!(ignore.contains("node_modules"));
}

#[test]
fn generate_stdout_writes_nothing() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .args(["generate", "--stdout"])
        .assert()
        .success()
        .stdout(HELLO_WORLD_DOCKERFILE);

    assert!(!tmp.path().join("Dockerfile").exists());
    assert!(!tmp.path().join(".dockerignore").exists());
}

#[test]
fn generate_flags_override_config() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .args([
            "generate",
            "--stdout",
            "--port",
            "8080",
            "--start",
            "node server.js",
            "--manifest",
            "package.json",
            "--manifest",
            "package-lock.json",
            "--install",
            "npm ci",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXPOSE 8080"))
        .stdout(predicate::str::contains(r#"CMD ["node", "server.js"]"#))
        .stdout(predicate::str::contains(
            "COPY package.json package-lock.json ./",
        ))
        .stdout(predicate::str::contains("RUN npm ci"));
}

#[test]
fn generate_from_flags_only() {
    let tmp = TempDir::new().unwrap();

    stanza()
        .current_dir(tmp.path())
        .args([
            "generate",
            "--stdout",
            "--base-image",
            "node:20-slim",
            "--work-dir",
            "/srv",
            "--manifest",
            "package.json",
            "--install",
            "npm install",
            "--source",
            "dist",
            "--dest",
            "./dist",
            "--port",
            "4000",
            "--start",
            "node dist/index.js",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("FROM node:20-slim\nWORKDIR /srv\n"))
        .stdout(predicate::str::contains("COPY dist ./dist"));
}

#[test]
fn generate_rejects_out_of_range_port() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .args(["generate", "--port", "70000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exposed_port"));

    assert!(!tmp.path().join("Dockerfile").exists());
}

#[test]
fn generate_rejects_empty_start_command() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .args(["generate", "--start", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start_command"));

    assert!(!tmp.path().join("Dockerfile").exists());
}

#[test]
fn generate_reports_missing_fields() {
    let tmp = TempDir::new().unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_image"))
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn generate_refuses_to_overwrite_without_force() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);
    std::fs::write(tmp.path().join("Dockerfile"), "FROM scratch\n").unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    stanza()
        .current_dir(tmp.path())
        .args(["generate", "--force"])
        .assert()
        .success();

    let dockerfile = std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
    assert_eq!(dockerfile, HELLO_WORLD_DOCKERFILE);
}

#[test]
fn generate_keeps_existing_dockerignore() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);
    std::fs::write(tmp.path().join(".dockerignore"), "custom\n").unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success();

    let ignore = std::fs::read_to_string(tmp.path().join(".dockerignore")).unwrap();
    assert_eq!(ignore, "custom\n");
}

#[test]
fn generate_no_ignore_flag() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .args(["generate", "--no-ignore"])
        .assert()
        .success();

    assert!(tmp.path().join("Dockerfile").exists());
    assert!(!tmp.path().join(".dockerignore").exists());
}

#[test]
fn generate_into_output_directory() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .args(["generate", "-o", "docker"])
        .assert()
        .success();

    assert!(tmp.path().join("docker/Dockerfile").exists());
    assert!(tmp.path().join("docker/.dockerignore").exists());
}

#[test]
fn generate_uses_host_port_mapping() {
    let config = format!("{HELLO_WORLD_CONFIG}host_port = 8080\n");
    let tmp = project_with_config(&config);

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("-p 8080:3000"));
}

#[test]
fn generate_invalid_image_name_writes_nothing() {
    let config = HELLO_WORLD_CONFIG.replace("next-hello-world", "MyApp");
    let tmp = project_with_config(&config);

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("image.name"));

    assert!(!tmp.path().join("Dockerfile").exists());
    assert!(!tmp.path().join(".dockerignore").exists());
}

#[test]
fn generate_invalid_host_port_writes_nothing() {
    let config = format!("{HELLO_WORLD_CONFIG}host_port = 0\n");
    let tmp = project_with_config(&config);

    stanza()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("image.host_port"));

    assert!(!tmp.path().join("Dockerfile").exists());
    assert!(!tmp.path().join(".dockerignore").exists());
}

// ── Check Command ──

#[test]
fn check_accepts_valid_config() {
    let tmp = project_with_config(HELLO_WORLD_CONFIG);

    stanza()
        .current_dir(tmp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid (7 stanzas)"));

    assert!(!tmp.path().join("Dockerfile").exists());
}

#[test]
fn check_rejects_invalid_config() {
    let config = HELLO_WORLD_CONFIG.replace("exposed_port = 3000", "exposed_port = 0");
    let tmp = project_with_config(&config);

    stanza()
        .current_dir(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exposed_port"));
}

#[test]
fn check_requires_config_file() {
    let tmp = TempDir::new().unwrap();

    stanza()
        .current_dir(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stanza init"));
}
