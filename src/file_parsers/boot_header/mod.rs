use crate::{error::Result, file_parsers::FileParser};

pub mod parser;
pub mod types;
use parser::parse_boot_header_bytes;
use types::BootloaderHeader;

pub struct BootHeaderParser;

impl FileParser for BootHeaderParser {
    type Output = BootloaderHeader;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output> {
        parse_boot_header_bytes(bytes)
    }
}
