use std::path::PathBuf;

/// Which CRC computation scheme the generated code uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Straight register simulation, one bit at a time, with an augmented
    /// message. Smallest code, slowest.
    BitByBit,
    /// Bit-at-a-time without message augmentation.
    BitByBitFast,
    /// Table lookup, one table index per step.
    TableDriven,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BitByBit => "bit-by-bit",
            Algorithm::BitByBitFast => "bit-by-bit-fast",
            Algorithm::TableDriven => "table-driven",
        }
    }
}

/// The C standard the generated sources target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CStd {
    C89,
    C99,
}

/// The full parameter set for one generation or checksum request.
///
/// The five CRC model parameters and the width are optional: a parameter
/// left `None` is compiled into the generated code as a runtime `cfg`
/// struct field instead of a constant. Checksum computation requires all
/// of them.
#[derive(Clone, Debug)]
pub struct CrcParams {
    pub width: Option<u32>,
    pub poly: Option<u64>,
    pub reflect_in: Option<bool>,
    pub xor_in: Option<u64>,
    pub reflect_out: Option<bool>,
    pub xor_out: Option<u64>,
    /// Bits of message consumed per table lookup step.
    pub tbl_idx_width: u32,
    pub algorithm: Algorithm,
    pub c_std: CStd,
    /// Prefix for all generated C symbols.
    pub symbol_prefix: String,
    pub output_file: Option<PathBuf>,
    /// Extra `#include` lines for the generated header.
    pub include_files: Vec<String>,
}

impl Default for CrcParams {
    fn default() -> Self {
        CrcParams {
            width: None,
            poly: None,
            reflect_in: None,
            xor_in: None,
            reflect_out: None,
            xor_out: None,
            tbl_idx_width: 8,
            algorithm: Algorithm::BitByBit,
            c_std: CStd::C99,
            symbol_prefix: "crc_".to_string(),
            output_file: None,
            include_files: Vec::new(),
        }
    }
}

impl CrcParams {
    /// All-ones mask of `width` bits, built without shifting by the full
    /// word size.
    pub fn mask(&self) -> Option<u64> {
        let msb = self.msb_mask()?;
        Some(((msb - 1) << 1) | 1)
    }

    pub fn msb_mask(&self) -> Option<u64> {
        Some(1u64 << (self.width? - 1))
    }

    /// Number of entries in the lookup table.
    pub fn tbl_width(&self) -> u64 {
        1u64 << self.tbl_idx_width
    }

    /// Left shift applied to the register so that sub-byte widths can use
    /// byte-wide table lookups. Only the table-driven algorithm shifts;
    /// `None` when the algorithm needs the shift but the width is unknown.
    pub fn tbl_shift(&self) -> Option<u32> {
        if self.algorithm != Algorithm::TableDriven {
            return Some(0);
        }
        match self.width? {
            w if w < 8 => Some(8 - w),
            _ => Some(0),
        }
    }

    /// Names of the model parameters that are still undefined, in the
    /// order they appear in the generated `cfg` struct.
    pub fn undefined_params(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.width.is_none() {
            names.push("width");
        }
        if self.poly.is_none() {
            names.push("poly");
        }
        if self.reflect_in.is_none() {
            names.push("reflect_in");
        }
        if self.xor_in.is_none() {
            names.push("xor_in");
        }
        if self.reflect_out.is_none() {
            names.push("reflect_out");
        }
        if self.xor_out.is_none() {
            names.push("xor_out");
        }
        names
    }

    pub fn is_fully_defined(&self) -> bool {
        self.undefined_params().is_empty()
    }

    /// The C integer type wide enough to hold the CRC register.
    pub fn underlying_crc_t(&self) -> &'static str {
        match self.c_std {
            CStd::C89 => match self.width {
                Some(w) if w <= 8 => "unsigned char",
                Some(w) if w <= 16 => "unsigned int",
                _ => "unsigned long int",
            },
            CStd::C99 => match self.width {
                Some(w) if w <= 8 => "uint_fast8_t",
                Some(w) if w <= 16 => "uint_fast16_t",
                Some(w) if w <= 32 => "uint_fast32_t",
                Some(_) => "uint_fast64_t",
                None => "unsigned long long int",
            },
        }
    }
}

/// Format an optional value as a fixed-width hex literal, padded to the
/// nibble count of `width`. Unknown values print as `Undefined`; an
/// unknown width falls back to unpadded hex.
pub fn pretty_hex(value: Option<u64>, width: Option<u32>) -> String {
    let Some(value) = value else {
        return "Undefined".to_string();
    };
    match width {
        Some(width) => {
            let digits = ((width + 3) / 4) as usize;
            format!("{:#0digits$x}", value, digits = digits + 2)
        }
        None => format!("{:#x}", value),
    }
}

pub fn pretty_bool(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "True",
        Some(false) => "False",
        None => "Undefined",
    }
}

pub fn pretty_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "Undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        let params = CrcParams {
            width: Some(16),
            ..CrcParams::default()
        };
        assert_eq!(params.mask(), Some(0xffff));
        assert_eq!(params.msb_mask(), Some(0x8000));
    }

    #[test]
    fn test_full_width_mask_does_not_overflow() {
        let params = CrcParams {
            width: Some(64),
            ..CrcParams::default()
        };
        assert_eq!(params.mask(), Some(u64::MAX));
        assert_eq!(params.msb_mask(), Some(1 << 63));
    }

    #[test]
    fn test_tbl_shift() {
        let narrow = CrcParams {
            width: Some(5),
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        assert_eq!(narrow.tbl_shift(), Some(3));

        let wide = CrcParams {
            width: Some(32),
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        assert_eq!(wide.tbl_shift(), Some(0));

        let unknown_width = CrcParams {
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        assert_eq!(unknown_width.tbl_shift(), None);

        // The bit-at-a-time algorithms never shift.
        let narrow_bbb = CrcParams {
            width: Some(5),
            ..CrcParams::default()
        };
        assert_eq!(narrow_bbb.tbl_shift(), Some(0));
    }

    #[test]
    fn test_undefined_params() {
        let mut params = CrcParams::default();
        assert_eq!(
            params.undefined_params(),
            vec!["width", "poly", "reflect_in", "xor_in", "reflect_out", "xor_out"]
        );
        params.width = Some(32);
        params.poly = Some(0x04c11db7);
        params.reflect_in = Some(true);
        params.xor_in = Some(0xffffffff);
        params.reflect_out = Some(true);
        params.xor_out = Some(0xffffffff);
        assert!(params.is_fully_defined());
    }

    #[test]
    fn test_underlying_crc_t() {
        let mut params = CrcParams {
            width: Some(32),
            ..CrcParams::default()
        };
        assert_eq!(params.underlying_crc_t(), "uint_fast32_t");
        params.c_std = CStd::C89;
        assert_eq!(params.underlying_crc_t(), "unsigned long int");
        params.width = Some(8);
        assert_eq!(params.underlying_crc_t(), "unsigned char");
        params.width = None;
        assert_eq!(params.underlying_crc_t(), "unsigned long int");
    }

    #[test]
    fn test_pretty_hex_padding() {
        assert_eq!(pretty_hex(Some(0x05), Some(5)), "0x05");
        assert_eq!(pretty_hex(Some(0x8005), Some(16)), "0x8005");
        assert_eq!(pretty_hex(Some(0x07), Some(16)), "0x0007");
        assert_eq!(pretty_hex(Some(0x1b), None), "0x1b");
        assert_eq!(pretty_hex(None, Some(16)), "Undefined");
    }

    #[test]
    fn test_pretty_bool() {
        assert_eq!(pretty_bool(Some(true)), "True");
        assert_eq!(pretty_bool(Some(false)), "False");
        assert_eq!(pretty_bool(None), "Undefined");
    }
}
