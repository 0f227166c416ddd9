//! Process exit codes for the lovegen CLI.
//!
//! - 0: Success
//! - 1: Command not implemented yet
//! - 2: Usage error (clap uses the same code for bad arguments)
//! - 3: Configuration error, such as a missing API key
//! - 4: Gemini request failed (network, HTTP status, undecodable reply)
//! - 5: Gemini replied without usable code
//! - 6: Local I/O failure while saving the project

pub const SUCCESS: u8 = 0;

pub const NOT_IMPLEMENTED: u8 = 1;

pub const USAGE_ERROR: u8 = 2;

pub const CONFIG_ERROR: u8 = 3;

pub const TRANSPORT_ERROR: u8 = 4;

pub const EMPTY_RESPONSE: u8 = 5;

pub const IO_ERROR: u8 = 6;
