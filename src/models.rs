use crate::params::CrcParams;

/// A well-known CRC parameter set.
///
/// `check` is the checksum of the ASCII string `"123456789"` and pins the
/// model down: two models that agree on the check value and width compute
/// the same function.
#[derive(Clone, Copy, Debug)]
pub struct CrcModel {
    pub name: &'static str,
    pub width: u32,
    pub poly: u64,
    pub reflect_in: bool,
    pub xor_in: u64,
    pub reflect_out: bool,
    pub xor_out: u64,
    pub check: u64,
}

pub const MODELS: &[CrcModel] = &[
    CrcModel {
        name: "crc-5",
        width: 5,
        poly: 0x05,
        reflect_in: true,
        xor_in: 0x1f,
        reflect_out: true,
        xor_out: 0x1f,
        check: 0x19,
    },
    CrcModel {
        name: "crc-8",
        width: 8,
        poly: 0x07,
        reflect_in: false,
        xor_in: 0x0,
        reflect_out: false,
        xor_out: 0x0,
        check: 0xf4,
    },
    CrcModel {
        name: "dallas-1-wire",
        width: 8,
        poly: 0x31,
        reflect_in: true,
        xor_in: 0x0,
        reflect_out: true,
        xor_out: 0x0,
        check: 0xa1,
    },
    CrcModel {
        name: "crc-15",
        width: 15,
        poly: 0x4599,
        reflect_in: false,
        xor_in: 0x0,
        reflect_out: false,
        xor_out: 0x0,
        check: 0x59e,
    },
    CrcModel {
        name: "crc-16",
        width: 16,
        poly: 0x8005,
        reflect_in: true,
        xor_in: 0x0,
        reflect_out: true,
        xor_out: 0x0,
        check: 0xbb3d,
    },
    CrcModel {
        name: "crc-16-usb",
        width: 16,
        poly: 0x8005,
        reflect_in: true,
        xor_in: 0xffff,
        reflect_out: true,
        xor_out: 0xffff,
        check: 0xb4c8,
    },
    CrcModel {
        name: "ccitt",
        width: 16,
        poly: 0x1021,
        reflect_in: false,
        xor_in: 0xffff,
        reflect_out: false,
        xor_out: 0x0,
        check: 0x29b1,
    },
    CrcModel {
        name: "r-crc-16",
        width: 16,
        poly: 0x0589,
        reflect_in: false,
        xor_in: 0x0,
        reflect_out: false,
        xor_out: 0x0001,
        check: 0x007e,
    },
    CrcModel {
        name: "kermit",
        width: 16,
        poly: 0x1021,
        reflect_in: true,
        xor_in: 0x0,
        reflect_out: true,
        xor_out: 0x0,
        check: 0x2189,
    },
    CrcModel {
        name: "x-25",
        width: 16,
        poly: 0x1021,
        reflect_in: true,
        xor_in: 0xffff,
        reflect_out: true,
        xor_out: 0xffff,
        check: 0x906e,
    },
    CrcModel {
        name: "xmodem",
        width: 16,
        poly: 0x8408,
        reflect_in: true,
        xor_in: 0x0,
        reflect_out: true,
        xor_out: 0x0,
        check: 0x0c73,
    },
    CrcModel {
        name: "zmodem",
        width: 16,
        poly: 0x1021,
        reflect_in: false,
        xor_in: 0x0,
        reflect_out: false,
        xor_out: 0x0,
        check: 0x31c3,
    },
    CrcModel {
        name: "crc-24",
        width: 24,
        poly: 0x864cfb,
        reflect_in: false,
        xor_in: 0xb704ce,
        reflect_out: false,
        xor_out: 0x0,
        check: 0x21cf02,
    },
    CrcModel {
        name: "crc-32",
        width: 32,
        poly: 0x4c11db7,
        reflect_in: true,
        xor_in: 0xffffffff,
        reflect_out: true,
        xor_out: 0xffffffff,
        check: 0xcbf43926,
    },
    CrcModel {
        name: "crc-32c",
        width: 32,
        poly: 0x1edc6f41,
        reflect_in: true,
        xor_in: 0xffffffff,
        reflect_out: true,
        xor_out: 0xffffffff,
        check: 0xe3069283,
    },
    CrcModel {
        name: "posix",
        width: 32,
        poly: 0x4c11db7,
        reflect_in: false,
        xor_in: 0x0,
        reflect_out: false,
        xor_out: 0xffffffff,
        check: 0x765e7680,
    },
    CrcModel {
        name: "jam",
        width: 32,
        poly: 0x4c11db7,
        reflect_in: true,
        xor_in: 0xffffffff,
        reflect_out: true,
        xor_out: 0x0,
        check: 0x340bc6d9,
    },
    CrcModel {
        name: "xfer",
        width: 32,
        poly: 0x000000af,
        reflect_in: false,
        xor_in: 0x0,
        reflect_out: false,
        xor_out: 0x0,
        check: 0xbd0be338,
    },
    CrcModel {
        name: "crc-64",
        width: 64,
        poly: 0x1b,
        reflect_in: true,
        xor_in: 0x0,
        reflect_out: true,
        xor_out: 0x0,
        check: 0x46a5a9388a5beffe,
    },
];

/// Look up a model by name, case-insensitively.
pub fn find(name: &str) -> Option<&'static CrcModel> {
    MODELS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

impl CrcModel {
    /// Copy the six model parameters into a parameter set. The other
    /// fields (algorithm, prefix, C standard) are left alone.
    pub fn apply_to(&self, params: &mut CrcParams) {
        params.width = Some(self.width);
        params.poly = Some(self.poly);
        params.reflect_in = Some(self.reflect_in);
        params.xor_in = Some(self.xor_in);
        params.reflect_out = Some(self.reflect_out);
        params.xor_out = Some(self.xor_out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        assert!(find("CRC-32").is_some());
        assert!(find("ccitt").is_some());
        assert!(find("no-such-model").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in MODELS.iter().enumerate() {
            for b in &MODELS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_apply_to() {
        let model = find("crc-32").expect("model exists");
        let mut params = CrcParams::default();
        model.apply_to(&mut params);
        assert_eq!(params.width, Some(32));
        assert_eq!(params.poly, Some(0x04c11db7));
        assert_eq!(params.reflect_in, Some(true));
        assert_eq!(params.xor_out, Some(0xffffffff));
    }

    #[test]
    fn test_widths_fit_the_register() {
        for model in MODELS {
            assert!(model.width >= 1 && model.width <= 64, "{}", model.name);
            if model.width < 64 {
                let mask = (1u64 << model.width) - 1;
                assert_eq!(model.poly & !mask, 0, "{}", model.name);
                assert_eq!(model.check & !mask, 0, "{}", model.name);
            }
        }
    }
}
