//! HTTP end-to-end tests: a real listener on 127.0.0.1:0, driven with reqwest.

mod common;
mod cors;
mod errors;
mod health;
mod init_logging;
mod operations;
mod upstream;
