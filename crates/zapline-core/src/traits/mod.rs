// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the external collaborators Zapline consumes.

pub mod directory;
pub mod observability;
pub mod store;
pub mod transport;

pub use directory::UserDirectory;
pub use observability::EventSink;
pub use store::DurableStore;
pub use transport::MessageTransport;
