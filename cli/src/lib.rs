//! Terminal front end for the todo service.
//!
//! # Overview
//! A login screen followed by the list screen, both backed by the
//! `todo-core` state machines. This crate is the host in the host-does-IO
//! split: it owns the terminal and the ureq transport.

pub mod app;
pub mod command;
pub mod transport;

pub use app::{run, Config};
pub use transport::UreqTransport;
