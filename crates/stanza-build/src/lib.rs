//! Dockerfile generation and file output for stanza.
//!
//! # Generate pipeline
//!
//! ```text
//! stanza generate
//!   1. Config      ── stanza.toml + CLI flags → BuildConfig
//!   2. Dockerfile  ── DockerfileGenerator::render()
//!   3. Ignore file ── render_dockerignore() (skipped if one exists)
//!   4. Write       ── write::write_dockerfile()
//!   5. Hints       ── ContainerCommands (docker build / docker run)
//! ```
//!
//! # Dockerfile shape
//!
//! Always seven stanzas, in this order:
//!
//! ```text
//! FROM node:18-alpine
//! WORKDIR /app
//! COPY package.json ./
//! RUN npm install
//! COPY . .
//! EXPOSE 3000
//! CMD ["npm", "start"]
//! ```

pub mod commands;
pub mod dockerfile;
pub mod ignore;
pub mod write;

pub use commands::ContainerCommands;
pub use dockerfile::{DockerfileGenerator, Instruction, render};
pub use ignore::render_dockerignore;
