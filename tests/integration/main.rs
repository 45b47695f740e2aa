//! Integration tests for the installer
//!
//! Full runs against temporary projects, with the network served by
//! wiremock or a mocked package client.

mod cli;
mod common;
mod install_flow;
