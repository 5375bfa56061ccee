// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engagement window tracking for the Zapline assistant backend.
//!
//! The messaging platform only allows free-form outbound messages within 24
//! hours of a user's last inbound message. This crate answers "is user X
//! currently reachable" and maintains the global reachability index that
//! campaign dispatch partitions against.

pub mod tracker;

pub use tracker::WindowTracker;
