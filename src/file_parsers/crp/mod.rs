use bytes::Bytes;

use crate::{error::Result, file_parsers::FileParser};

pub mod parser;
pub mod types;
pub mod writer;
use parser::parse_crp_bytes;
use types::CrpContainer;

pub struct CrpParser;

impl FileParser for CrpParser {
    type Output = CrpContainer;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output> {
        parse_crp_bytes(Bytes::copy_from_slice(bytes))
    }
}
