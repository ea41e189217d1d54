//! Flash sizing rules for payloads accepted by the T4e bootloader

use std::fmt::Display;

use crate::{
    error::{CrpError, Result},
    file_parsers::boot_header::types::HEADER_LEN,
    xtea::BLOCK_LEN,
};

/// The two flash destinations the bootloader accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashRegion {
    /// 0x10000
    Calibration,
    /// 0x20000
    Program,
}

impl FlashRegion {
    pub fn from_addr(addr: u32) -> Result<Self> {
        match addr {
            0x10000 => Ok(Self::Calibration),
            0x20000 => Ok(Self::Program),
            x => Err(CrpError::InvalidAddress(x)),
        }
    }

    pub fn addr(&self) -> u32 {
        match self {
            Self::Calibration => 0x10000,
            Self::Program => 0x20000,
        }
    }

    /// Largest payload the region can hold
    pub fn max_size(&self) -> u32 {
        match self {
            Self::Calibration => 0xC000,
            Self::Program => 0x5FFFE,
        }
    }
}

/// Non-fatal adjustments made while sizing a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeWarning {
    NoSizeGiven { bin_size: u32 },
    Truncated { bin_size: u32, requested: u32 },
    Oversized { bin_size: u32, requested: u32 },
    Clamped { requested: u32, max: u32 },
    OddSize { from: u32, to: u32 },
}

impl Display for SizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SizeWarning::*;
        match self {
            NoSizeGiven { bin_size } => {
                write!(f, "No flash size given, using .BIN size ({bin_size} bytes)")
            }
            Truncated {
                bin_size,
                requested,
            } => write!(
                f,
                "Flash size {requested} is less than .BIN size {bin_size}, truncating .BIN data"
            ),
            Oversized {
                bin_size,
                requested,
            } => write!(
                f,
                "Flash size {requested} is bigger than .BIN size {bin_size}, padding with 0xFF"
            ),
            Clamped { requested, max } => write!(
                f,
                "Flash size 0x{requested:X} exceeds the 0x{max:X} byte limit of this address, adjusting"
            ),
            OddSize { from, to } => {
                write!(f, "Flash size must be a multiple of 2, adjusting {from} -> {to}")
            }
        }
    }
}

/// Result of sizing a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashLayout {
    pub region: FlashRegion,
    /// Bytes of payload to encrypt, including `padding_size`
    pub flash_size: u32,
    /// 0xFF bytes appended so header + payload fill whole cipher blocks
    pub padding_size: u32,
    pub warnings: Vec<SizeWarning>,
}

impl FlashLayout {
    /// Payload length without the block padding, as recorded in the bootloader header
    pub fn payload_len(&self) -> u32 {
        self.flash_size - self.padding_size
    }
}

/// Work out how many bytes of `bin_size` get flashed to `flash_addr`.
///
/// `requested` of `None` or `Some(0)` means "use the whole binary".
pub fn compute_flash_size(
    bin_size: u32,
    requested: Option<u32>,
    flash_addr: u32,
    with_header: bool,
) -> Result<FlashLayout> {
    let region = FlashRegion::from_addr(flash_addr)?;
    let mut warnings = vec![];

    let mut flash_size = match requested.filter(|&r| r > 0) {
        None => {
            warnings.push(SizeWarning::NoSizeGiven { bin_size });
            bin_size
        }
        Some(requested) if requested < bin_size => {
            warnings.push(SizeWarning::Truncated {
                bin_size,
                requested,
            });
            requested
        }
        Some(requested) if requested > bin_size => {
            warnings.push(SizeWarning::Oversized {
                bin_size,
                requested,
            });
            requested
        }
        Some(requested) => requested,
    };

    let max = region.max_size();
    if flash_size > max {
        warnings.push(SizeWarning::Clamped {
            requested: flash_size,
            max,
        });
        flash_size = max;
    }

    if flash_size % 2 != 0 {
        // Round up only when the binary actually has the extra byte
        let to = if bin_size > flash_size {
            flash_size + 1
        } else {
            flash_size - 1
        };
        warnings.push(SizeWarning::OddSize {
            from: flash_size,
            to,
        });
        flash_size = to;
    }

    let mut padding_size = 0;
    if with_header {
        let block = BLOCK_LEN as u32;
        let offset = (flash_size + HEADER_LEN as u32) % block;
        if offset != 0 {
            padding_size = block - offset;
            flash_size += padding_size;
        }
    }

    Ok(FlashLayout {
        region,
        flash_size,
        padding_size,
        warnings,
    })
}

/// Copy as much of `bin` as fits into a `flash_size` buffer of erased (0xFF) flash
pub fn fill_flash(bin: &[u8], flash_size: u32) -> Vec<u8> {
    let mut buf = vec![0xFF; flash_size as usize];
    let n = bin.len().min(buf.len());
    buf[..n].copy_from_slice(&bin[..n]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_size_even() {
        let layout = compute_flash_size(100, None, 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 100);
        assert_eq!(layout.padding_size, 0);
        assert_eq!(
            layout.warnings,
            vec![SizeWarning::NoSizeGiven { bin_size: 100 }]
        );
    }

    #[test]
    fn test_zero_request_means_none() {
        let layout = compute_flash_size(100, Some(0), 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 100);
    }

    #[test]
    fn test_odd_rounds_down_without_extra_bytes() {
        let layout = compute_flash_size(99, None, 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 98);
        assert!(layout
            .warnings
            .contains(&SizeWarning::OddSize { from: 99, to: 98 }));
    }

    #[test]
    fn test_odd_rounds_up_with_extra_bytes() {
        let layout = compute_flash_size(101, Some(99), 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 100);
        assert_eq!(
            layout.warnings,
            vec![
                SizeWarning::Truncated {
                    bin_size: 101,
                    requested: 99
                },
                SizeWarning::OddSize { from: 99, to: 100 },
            ]
        );
    }

    #[test]
    fn test_odd_bin_without_request() {
        let layout = compute_flash_size(101, None, 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 100);
    }

    #[test]
    fn test_oversized_request_kept() {
        let layout = compute_flash_size(100, Some(200), 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 200);
        assert_eq!(
            layout.warnings,
            vec![SizeWarning::Oversized {
                bin_size: 100,
                requested: 200
            }]
        );
    }

    #[test]
    fn test_program_clamp() {
        let layout = compute_flash_size(0x70000, Some(0x70000), 0x20000, false).unwrap();
        assert_eq!(layout.flash_size, 0x5FFFE);
        assert_eq!(layout.region, FlashRegion::Program);
        assert!(layout.warnings.contains(&SizeWarning::Clamped {
            requested: 0x70000,
            max: 0x5FFFE
        }));
    }

    #[test]
    fn test_calibration_clamp() {
        let layout = compute_flash_size(0x10000, None, 0x10000, false).unwrap();
        assert_eq!(layout.flash_size, 0xC000);
    }

    #[test]
    fn test_invalid_address() {
        let err = compute_flash_size(100, None, 0x30000, false).unwrap_err();
        assert!(matches!(err, CrpError::InvalidAddress(0x30000)));
    }

    #[test]
    fn test_header_padding() {
        // 76 + 1024 = 1100, 1100 % 8 = 4
        let layout = compute_flash_size(1024, None, 0x10000, true).unwrap();
        assert_eq!(layout.padding_size, 4);
        assert_eq!(layout.flash_size, 1028);
        assert_eq!(layout.payload_len(), 1024);
        assert_eq!((layout.flash_size as usize + HEADER_LEN) % BLOCK_LEN, 0);
    }

    #[test]
    fn test_header_no_padding_needed() {
        // 76 + 100 = 176
        let layout = compute_flash_size(100, None, 0x10000, true).unwrap();
        assert_eq!(layout.padding_size, 0);
        assert_eq!(layout.flash_size, 100);
    }

    #[test]
    fn test_fill_flash() {
        assert_eq!(fill_flash(&[1, 2], 4), vec![1, 2, 0xFF, 0xFF]);
        assert_eq!(fill_flash(&[1, 2, 3], 2), vec![1, 2]);
    }
}
