// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Zapline workspace.
//!
//! Deterministic in-process implementations of every consumed capability:
//! the durable store, the outbound transport, the user directory, and the
//! observability sink.

pub mod memory_store;
pub mod mock_directory;
pub mod mock_transport;
pub mod recording_sink;

pub use memory_store::MemoryStore;
pub use mock_directory::MockDirectory;
pub use mock_transport::MockTransport;
pub use recording_sink::RecordingSink;
