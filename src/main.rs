use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crcgen::models;
use crcgen::params::{pretty_bool, pretty_hex, pretty_opt};
use crcgen::{checksum, generate_with, Algorithm, CStd, Crc, CrcParams, Error, SymbolTable, Target};

#[derive(Parser)]
#[command(
    name = "crcgen",
    version,
    about = "CRC checksum calculator and C source generator"
)]
struct Cli {
    /// Use the parameters of a well-known CRC model (see --list-models)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Width of the CRC register in bits
    #[arg(long, value_name = "NUM")]
    width: Option<u32>,

    /// Generator polynomial, without the leading term
    #[arg(long, value_name = "HEX", value_parser = parse_number)]
    poly: Option<u64>,

    /// Reflect the octets of the message
    #[arg(long, value_name = "BOOL", value_parser = parse_bool_word)]
    reflect_in: Option<bool>,

    /// Initial value XOR-ed into the register
    #[arg(long, value_name = "HEX", value_parser = parse_number)]
    xor_in: Option<u64>,

    /// Reflect the final register value
    #[arg(long, value_name = "BOOL", value_parser = parse_bool_word)]
    reflect_out: Option<bool>,

    /// Value XOR-ed onto the final register value
    #[arg(long, value_name = "HEX", value_parser = parse_number)]
    xor_out: Option<u64>,

    /// Bits of message consumed per table lookup; one of 1, 2, 4, 8
    #[arg(long, value_name = "NUM", default_value_t = 8)]
    table_idx_width: u32,

    /// Computation scheme: bit-by-bit, bit-by-bit-fast or table-driven
    #[arg(long, value_name = "ALGO", default_value = "bit-by-bit")]
    algorithm: String,

    /// C standard of the generated code: c89 or c99
    #[arg(long = "std", value_name = "STD", default_value = "c99")]
    c_std: String,

    /// Prefix of the generated C symbols
    #[arg(long, value_name = "PREFIX", default_value = "crc_")]
    symbol_prefix: String,

    /// Add an #include line to the generated files; may be repeated
    #[arg(long, value_name = "FILE")]
    include_file: Vec<String>,

    /// Write the output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Compute the checksum of the given string
    #[arg(long, value_name = "STRING")]
    check_string: Option<String>,

    /// Compute the checksum of the given file
    #[arg(long, value_name = "FILE")]
    check_file: Option<PathBuf>,

    /// Render a source file: h, c, c-main or table
    #[arg(long, value_name = "CODE")]
    generate: Option<String>,

    /// List the known CRC models and exit
    #[arg(long)]
    list_models: bool,

    /// Print the parameters before the result
    #[arg(short, long)]
    verbose: bool,
}

/// Accept decimal or 0x-prefixed hexadecimal numbers.
fn parse_number(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| format!("invalid number '{}'", text))
}

fn parse_bool_word(text: &str) -> Result<bool, String> {
    match text.to_ascii_lowercase().as_str() {
        "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        _ => Err(format!("invalid boolean '{}'", text)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("crcgen: error: {}", message);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        err.render();
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    if cli.list_models {
        for model in models::MODELS {
            println!("{}", model.name);
        }
        return Ok(());
    }

    let mut params = build_params(&cli);

    let action_count = cli.check_string.is_some() as u32
        + cli.check_file.is_some() as u32
        + cli.generate.is_some() as u32;
    if action_count > 1 {
        fail("too many actions specified");
    }

    let target = cli.generate.as_deref().map(|arg| {
        match arg.to_ascii_lowercase().as_str() {
            "h" => Target::Header,
            "c" => Target::Source,
            "c-main" => Target::SourceWithMain,
            "table" => Target::Table,
            other => fail(&format!("don't know how to generate '{}'", other)),
        }
    });

    if target == Some(Target::Table) {
        if params.algorithm != Algorithm::TableDriven && cli.algorithm != "bit-by-bit" {
            fail("the --generate table option is incompatible with the --algorithm option");
        }
        params.algorithm = Algorithm::TableDriven;
    }

    // A checksum request, and the table dump, need every parameter.
    let computes_checksum = target.is_none();
    if computes_checksum || target == Some(Target::Table) {
        if !params.is_fully_defined() {
            let flags: Vec<String> = params
                .undefined_params()
                .iter()
                .map(|name| format!("--{}", name.replace('_', "-")))
                .collect();
            fail(&format!(
                "undefined parameters: add {} or use --model",
                flags.join(", ")
            ));
        }
    }
    if computes_checksum {
        if params.tbl_idx_width != 8 {
            eprintln!("crcgen: warning: reverting to table index width 8 for the checksum");
            params.tbl_idx_width = 8;
        }
        if params.algorithm == Algorithm::TableDriven && params.width < Some(8) {
            fail("the table-driven algorithm needs a width of at least 8 bits");
        }
    }

    if cli.verbose {
        print_params(&params);
    }

    match target {
        Some(target) => {
            let symbols = SymbolTable::new(&params);
            let out = generate_with(&symbols, target)?;
            match &params.output_file {
                Some(path) => fs::write(path, &out).map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?,
                None => println!("{}", out),
            }
        }
        None => {
            let crc = match &cli.check_file {
                Some(path) => file_checksum(&params, path)?,
                None => {
                    let data = cli.check_string.as_deref().unwrap_or("123456789");
                    let Some(crc) = checksum(&params, data.as_bytes()) else {
                        fail("the parameters do not describe a computable checksum");
                    };
                    crc
                }
            };
            println!("0x{:x}", crc);
        }
    }
    Ok(())
}

fn build_params(cli: &Cli) -> CrcParams {
    let mut params = CrcParams::default();

    if let Some(name) = &cli.model {
        match models::find(name) {
            Some(model) => model.apply_to(&mut params),
            None => {
                let names: Vec<&str> = models::MODELS.iter().map(|m| m.name).collect();
                fail(&format!(
                    "unknown model '{}'; known models are {}",
                    name,
                    names.join(", ")
                ));
            }
        }
    }

    // Explicit flags override the model.
    if let Some(width) = cli.width {
        if !(1..=64).contains(&width) {
            fail("width must be between 1 and 64");
        }
        params.width = Some(width);
    }
    if let Some(poly) = cli.poly {
        params.poly = Some(poly);
    }
    if let Some(reflect_in) = cli.reflect_in {
        params.reflect_in = Some(reflect_in);
    }
    if let Some(xor_in) = cli.xor_in {
        params.xor_in = Some(xor_in);
    }
    if let Some(reflect_out) = cli.reflect_out {
        params.reflect_out = Some(reflect_out);
    }
    if let Some(xor_out) = cli.xor_out {
        params.xor_out = Some(xor_out);
    }
    if let (Some(width), Some(mask)) = (params.width, params.mask()) {
        for (flag, value) in [
            ("--poly", params.poly),
            ("--xor-in", params.xor_in),
            ("--xor-out", params.xor_out),
        ] {
            if value.is_some_and(|v| v & !mask != 0) {
                fail(&format!("{} value does not fit into {} bits", flag, width));
            }
        }
    }

    if !matches!(cli.table_idx_width, 1 | 2 | 4 | 8) {
        fail("table index width must be one of 1, 2, 4, 8");
    }
    params.tbl_idx_width = cli.table_idx_width;

    params.algorithm = match cli.algorithm.as_str() {
        "bit-by-bit" | "bbb" => Algorithm::BitByBit,
        "bit-by-bit-fast" | "bbf" => Algorithm::BitByBitFast,
        "table-driven" | "tbl" => Algorithm::TableDriven,
        other => fail(&format!("unknown algorithm '{}'", other)),
    };
    params.c_std = match cli.c_std.to_ascii_lowercase().as_str() {
        "c89" | "ansi" => CStd::C89,
        "c99" => CStd::C99,
        other => fail(&format!("unknown C standard '{}'", other)),
    };
    params.symbol_prefix = cli.symbol_prefix.clone();
    params.output_file = cli.output.clone();
    params.include_files = cli.include_file.clone();
    params
}

/// Checksum of a file, fed through the register in chunks. All three
/// algorithms agree on the final value, so the streaming update is used
/// regardless of the selected scheme.
fn file_checksum(params: &CrcParams, path: &PathBuf) -> Result<u64, Error> {
    let Some(crc) = Crc::from_params(params) else {
        fail("the parameters do not describe a computable checksum");
    };
    let io_error = |source| Error::Io {
        path: path.clone(),
        source,
    };
    let mut file = fs::File::open(path).map_err(io_error)?;
    let mut register = crc.xor_in;
    let mut buffer = [0u8; 1024];
    loop {
        let n = file.read(&mut buffer).map_err(io_error)?;
        if n == 0 {
            break;
        }
        register = crc.update(register, &buffer[..n]);
    }
    Ok(crc.finalize(register))
}

fn print_params(params: &CrcParams) {
    println!("{:<16} = {}", "width", pretty_opt(params.width));
    println!("{:<16} = {}", "poly", pretty_hex(params.poly, params.width));
    println!("{:<16} = {}", "reflect_in", pretty_bool(params.reflect_in));
    println!("{:<16} = {}", "xor_in", pretty_hex(params.xor_in, params.width));
    println!("{:<16} = {}", "reflect_out", pretty_bool(params.reflect_out));
    println!("{:<16} = {}", "xor_out", pretty_hex(params.xor_out, params.width));
    println!("{:<16} = {}", "algorithm", params.algorithm.name());
}
