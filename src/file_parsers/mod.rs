pub mod boot_header;
pub mod crp;

use crate::error::Result;

pub trait FileParser {
    type Output;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output>;
}
