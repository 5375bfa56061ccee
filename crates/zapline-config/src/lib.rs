// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Zapline assistant backend.
//!
//! Layered TOML configuration with compiled defaults, XDG file hierarchy,
//! and `ZAPLINE_*` environment variable overrides.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CampaignConfig, WindowConfig, ZaplineConfig};
