#![allow(dead_code)]

pub mod flaky_server;
pub mod sockets;
