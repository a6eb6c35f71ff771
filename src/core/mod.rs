// ─── mc-bundler Core ───
// Builds a self-contained client bundle from the Mojang version manifest.
//
// Architecture:
//   core/
//     rules/      : Environment + manifest OS rule evaluation
//     version/    : Mojang manifest + version JSON
//     downloader/ : Sequential downloads with SHA-1 validation
//     archive/    : First-writer-wins jar merging
//     launch/     : Argument substitution + launch script rendering
//     report      : build_info.txt
//     bundle/     : Pipeline tying the above together

pub mod archive;
pub mod bundle;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod report;
pub mod rules;
pub mod version;
