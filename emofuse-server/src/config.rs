//! Server configuration resolution
//!
//! Layers command-line / environment overrides on top of the TOML file
//! (see [`emofuse_common::config`]). `None` means "not given on the command
//! line or in the environment" and leaves the file value in place.

use emofuse_common::config::TomlConfig;
use std::net::SocketAddr;

/// Values from the highest-priority tiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub snapshot_url: Option<String>,
    pub face_detector_url: Option<String>,
    pub translator_url: Option<String>,
    pub ffmpeg_path: Option<String>,
}

/// Apply overrides to the file configuration
pub fn apply_overrides(mut config: TomlConfig, overrides: &CliOverrides) -> TomlConfig {
    if let Some(bind) = &overrides.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }
    if let Some(url) = &overrides.snapshot_url {
        config.camera.snapshot_url = Some(url.clone());
    }
    if let Some(url) = &overrides.face_detector_url {
        config.services.face_detector_url = Some(url.clone());
    }
    if let Some(url) = &overrides.translator_url {
        config.services.translator_url = Some(url.clone());
    }
    if let Some(path) = &overrides.ffmpeg_path {
        config.audio.ffmpeg_path = path.clone();
    }
    config
}

/// Listen address from `[server]`
pub fn listen_addr(config: &TomlConfig) -> emofuse_common::Result<SocketAddr> {
    format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .map_err(|e| {
            emofuse_common::Error::Config(format!(
                "Invalid listen address {}:{}: {}",
                config.server.bind, config.server.port, e
            ))
        })
}
