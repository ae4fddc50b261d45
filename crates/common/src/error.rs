//! Error related data structures to be shared and used.
//!
//! This module contains the [`Error`] enum, which is used to represent
//! errors that can occur within the soundboy domain.

use std::fmt::{self, Display, Formatter};

/// Top level enum for error handling within soundboy.
///
/// Most of the time, you will want to use the `CustomError` variant
/// to provide a more detailed error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidData,
    RomSize,
    UnknownOpcode(u16, u8),
    SubsongOutOfRange(u8, u8),
    InvalidParameter(String),
    CustomError(String),
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::InvalidData => String::from("Invalid data format"),
            Error::RomSize => String::from("Invalid ROM size"),
            Error::UnknownOpcode(addr, opcode) => {
                format!("Unknown opcode 0x{:02x} at 0x{:04x}", opcode, addr)
            }
            Error::SubsongOutOfRange(subsong, count) => {
                format!("Subsong {} out of range (min=1, max={})", subsong, count)
            }
            Error::InvalidParameter(message) => format!("Invalid parameter: {}", message),
            Error::CustomError(message) => String::from(message),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::CustomError(format!("I/O error: {}", error))
    }
}
