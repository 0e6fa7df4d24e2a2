//! Generator for CRC checksum implementations in C.
//!
//! A CRC function is pinned down by six parameters: the register width,
//! the generator polynomial, the input and output reflection flags and
//! the XOR constants applied before and after the computation. From such
//! a parameter set this crate renders a C header and source file with an
//! `init`/`update`/`finalize` API, using one of three computation
//! schemes, and can also evaluate the checksum of a byte string directly
//! to cross-check the generated code.
//!
//! Parameters may be left undefined. The generated code then carries a
//! runtime configuration struct, and a bitwise expression simplifier
//! keeps the emitted C expressions free of operations on the constants
//! that are known.

pub mod algorithms;
pub mod error;
pub mod expr;
pub mod lexeme;
pub mod lexer;
pub mod models;
pub mod params;
pub mod parser;
pub mod span;
pub mod symtable;
pub mod template;
pub mod templates;

pub use algorithms::Crc;
pub use error::Error;
pub use params::{Algorithm, CStd, CrcParams};
pub use symtable::SymbolTable;
pub use template::Interpreter;

/// What kind of output file to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The `.h` file declaring the API.
    Header,
    /// The `.c` file implementing it.
    Source,
    /// The `.c` file plus a `main` function for standalone testing.
    SourceWithMain,
    /// Just the lookup table initializer.
    Table,
}

/// Render one output file for the given parameter set.
pub fn generate(params: &CrcParams, target: Target) -> Result<String, Error> {
    let symbols = SymbolTable::new(params);
    generate_with(&symbols, target)
}

/// Render one output file against a prepared symbol table. Callers that
/// need reproducible output register an override for `datetime` first.
pub fn generate_with(symbols: &SymbolTable, target: Target) -> Result<String, Error> {
    let interpreter = Interpreter::new(symbols);
    match target {
        Target::Header => interpreter.expand("{%h_template%}"),
        Target::Source => interpreter.expand("{%c_template%}"),
        Target::SourceWithMain => {
            interpreter.expand("{%c_template%}{%main_template%}")
        }
        Target::Table => interpreter.expand("{%crc_table_init%}"),
    }
}

/// Compute the checksum of `data` with the algorithm selected in
/// `params`. `None` when a model parameter is undefined, or when the
/// table-driven algorithm is asked for a register narrower than its
/// table index.
pub fn checksum(params: &CrcParams, data: &[u8]) -> Option<u64> {
    let crc = Crc::from_params(params)?;
    let value = match params.algorithm {
        Algorithm::BitByBit => crc.bit_by_bit(data),
        Algorithm::BitByBitFast => crc.bit_by_bit_fast(data),
        Algorithm::TableDriven => {
            if crc.width < 8 {
                return None;
            }
            crc.table_driven(data)
        }
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_params(name: &str, algorithm: Algorithm) -> CrcParams {
        let mut params = CrcParams {
            algorithm,
            ..CrcParams::default()
        };
        models::find(name).expect("model exists").apply_to(&mut params);
        params
    }

    #[test]
    fn test_checksum_dispatch() {
        for algorithm in [
            Algorithm::BitByBit,
            Algorithm::BitByBitFast,
            Algorithm::TableDriven,
        ] {
            let params = model_params("crc-32", algorithm);
            assert_eq!(checksum(&params, b"123456789"), Some(0xcbf43926));
        }
    }

    #[test]
    fn test_checksum_requires_defined_parameters() {
        let params = CrcParams::default();
        assert_eq!(checksum(&params, b"123456789"), None);
    }

    #[test]
    fn test_checksum_table_driven_rejects_narrow_widths() {
        let params = model_params("crc-5", Algorithm::TableDriven);
        assert_eq!(checksum(&params, b"123456789"), None);
    }

    #[test]
    fn test_generate_header_declares_api() {
        let params = model_params("crc-32", Algorithm::TableDriven);
        let header = generate(&params, Target::Header).expect("header renders");
        assert!(header.contains("typedef uint_fast32_t crc_t;"));
        // All parameters are constants, so init and finalize inline.
        assert!(header.contains("static inline crc_t crc_init(void)"));
        assert!(header.contains("return 0xffffffff;"));
        assert!(header.contains("crc_t crc_update(crc_t crc, const void *data, size_t data_len);"));
        assert!(header.contains("static inline crc_t crc_finalize(crc_t crc)"));
        assert!(header.contains("#define __CRCGEN_STDOUT__"));
    }

    #[test]
    fn test_generate_source_embeds_table() {
        let params = model_params("crc-32", Algorithm::TableDriven);
        let source = generate(&params, Target::Source).expect("source renders");
        assert!(source.contains("static const crc_t crc_table[256]"));
        assert!(source.contains("0x77073096"));
        assert!(source.contains("#include \"crcgen_stdout.h\""));
    }

    #[test]
    fn test_generate_table_target() {
        let params = model_params("crc-32", Algorithm::TableDriven);
        let table = generate(&params, Target::Table).expect("table renders");
        assert!(table.starts_with("{\n"));
        assert!(table.ends_with("\n}"));
        assert!(table.contains("0x77073096"));
    }
}
