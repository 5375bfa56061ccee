// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed repositories over the durable store.
//!
//! All key construction lives in [`keys`]; every other crate goes through
//! [`WindowRepository`] or [`CampaignRepository`] and never touches raw keys.

pub mod campaign;
pub mod keys;
pub mod window;

pub use campaign::CampaignRepository;
pub use window::WindowRepository;
