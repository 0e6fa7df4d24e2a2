use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::algorithms::Crc;
use crate::error::Error;
use crate::expr;
use crate::params::{pretty_bool, pretty_hex, pretty_opt, Algorithm, CStd, CrcParams};
use crate::templates;

pub const PROGRAM_URL: &str = "https://crates.io/crates/crcgen";

/// Static symbols whose value is a template text.
const TEMPLATE_SYMBOLS: &[(&str, &str)] = &[
    ("h_template", templates::H_TEMPLATE),
    ("source_header", templates::SOURCE_HEADER),
    ("crc_reflect_doc", templates::CRC_REFLECT_DOC),
    ("crc_reflect_function_def", templates::CRC_REFLECT_FUNCTION_DEF),
    ("crc_reflect_function_gen", templates::CRC_REFLECT_FUNCTION_GEN),
    ("crc_init_function_gen", templates::CRC_INIT_FUNCTION_GEN),
    ("crc_update_function_gen", templates::CRC_UPDATE_FUNCTION_GEN),
    ("crc_finalize_function_gen", templates::CRC_FINALIZE_FUNCTION_GEN),
    ("crc_table_driven_func_gen", templates::CRC_TABLE_DRIVEN_FUNC_GEN),
    ("crc_table_gen_doc", templates::CRC_TABLE_GEN_DOC),
    ("crc_table_gen_function_def", templates::CRC_TABLE_GEN_FUNCTION_DEF),
    ("crc_init_doc", templates::CRC_INIT_DOC),
    ("crc_init_function_def", templates::CRC_INIT_FUNCTION_DEF),
    ("crc_update_doc", templates::CRC_UPDATE_DOC),
    ("crc_update_function_def", templates::CRC_UPDATE_FUNCTION_DEF),
    ("crc_finalize_doc", templates::CRC_FINALIZE_DOC),
    ("crc_finalize_function_def", templates::CRC_FINALIZE_FUNCTION_DEF),
    ("c_template", templates::C_TEMPLATE),
    ("c_table_gen", templates::C_TABLE_GEN),
    ("main_template", templates::MAIN_TEMPLATE),
    ("getopt_template", templates::GETOPT_TEMPLATE),
];

/// The symbol table of the template interpreter.
///
/// Symbols are resolved lazily: nothing is computed until a template asks
/// for it, and computed values are memoized so the price of an expensive
/// symbol (the lookup table dump, chiefly) is paid once per generation run
/// no matter how often a template mentions it.
pub struct SymbolTable<'a> {
    params: &'a CrcParams,
    overrides: HashMap<String, String>,
    cache: RefCell<HashMap<String, String>>,
}

impl<'a> SymbolTable<'a> {
    pub fn new(params: &'a CrcParams) -> SymbolTable<'a> {
        SymbolTable {
            params,
            overrides: HashMap::new(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Pin a symbol to a fixed value, shadowing the built-in definition.
    pub fn register(&mut self, name: &str, value: &str) {
        self.overrides.insert(name.to_string(), value.to_string());
    }

    /// Resolve a symbol to its expansion text. The empty name resolves to
    /// the empty string, so `{%%}` is a no-op in templates.
    pub fn lookup(&self, name: &str) -> Result<String, Error> {
        if name.is_empty() {
            return Ok(String::new());
        }
        if let Some(value) = self.overrides.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.cache.borrow().get(name) {
            return Ok(value.clone());
        }
        if let Some(&(_, text)) = TEMPLATE_SYMBOLS.iter().find(|&&(n, _)| n == name) {
            return Ok(text.to_string());
        }
        let value = self.generate(name)?;
        self.cache
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn generate(&self, name: &str) -> Result<String, Error> {
        let p = self.params;
        let value = match name {
            "datetime" => asctime_now(),
            "program_version" => format!("crcgen v{}", env!("CARGO_PKG_VERSION")),
            "program_url" => PROGRAM_URL.to_string(),
            "filename" => self.filename(),
            "header_filename" => self.header_filename(),
            "header_protection" => self.header_protection(),

            "crc_algorithm" => p.algorithm.name().to_string(),
            "crc_width" => pretty_opt(p.width),
            "crc_poly" => pretty_hex(p.poly, p.width),
            "crc_reflect_in" => pretty_bool(p.reflect_in).to_string(),
            "crc_xor_in" => pretty_hex(p.xor_in, p.width),
            "crc_reflect_out" => pretty_bool(p.reflect_out).to_string(),
            "crc_xor_out" => pretty_hex(p.xor_out, p.width),
            "crc_table_idx_width" => p.tbl_idx_width.to_string(),
            "crc_table_width" => p.tbl_width().to_string(),
            "crc_table_mask" => pretty_hex(Some(p.tbl_width() - 1), Some(8)),
            "crc_mask" => pretty_hex(p.mask(), p.width),
            "crc_msb_mask" => pretty_hex(p.msb_mask(), p.width),
            "crc_shift" => pretty_opt(p.tbl_shift()),

            "cfg_width" => self.cfg_value(p.width.is_some(), "crc_width", "cfg->width")?,
            "cfg_poly" => self.cfg_value(p.poly.is_some(), "crc_poly", "cfg->poly")?,
            "cfg_reflect_in" => {
                self.cfg_value(p.reflect_in.is_some(), "crc_reflect_in", "cfg->reflect_in")?
            }
            "cfg_xor_in" => self.cfg_value(p.xor_in.is_some(), "crc_xor_in", "cfg->xor_in")?,
            "cfg_reflect_out" => {
                self.cfg_value(p.reflect_out.is_some(), "crc_reflect_out", "cfg->reflect_out")?
            }
            "cfg_xor_out" => self.cfg_value(p.xor_out.is_some(), "crc_xor_out", "cfg->xor_out")?,
            "cfg_table_idx_width" => p.tbl_idx_width.to_string(),
            "cfg_table_width" => p.tbl_width().to_string(),
            "cfg_mask" => self.cfg_value(p.mask().is_some(), "crc_mask", "cfg->crc_mask")?,
            "cfg_msb_mask" => {
                self.cfg_value(p.msb_mask().is_some(), "crc_msb_mask", "cfg->msb_mask")?
            }
            "cfg_shift" => {
                self.cfg_value(p.tbl_shift().is_some(), "crc_shift", "cfg->crc_shift")?
            }
            "cfg_poly_shifted" => self.shifted("cfg_poly", p.poly)?,
            "cfg_mask_shifted" => self.shifted("cfg_mask", p.mask())?,
            "cfg_msb_mask_shifted" => self.shifted("cfg_msb_mask", p.msb_mask())?,

            "undefined_parameters" | "use_cfg_t" => {
                pretty_bool(Some(!p.is_fully_defined())).to_string()
            }
            "c_std" => match p.c_std {
                CStd::C89 => "C89".to_string(),
                CStd::C99 => "C99".to_string(),
            },
            "c_bool" => self.c89("int", "bool"),
            "c_true" => self.c89("1", "true"),
            "c_false" => self.c89("0", "false"),
            "underlying_crc_t" => p.underlying_crc_t().to_string(),
            "include_files" => return self.include_files(name),

            "crc_prefix" => p.symbol_prefix.clone(),
            "crc_t" => format!("{}t", p.symbol_prefix),
            "cfg_t" => format!("{}cfg_t", p.symbol_prefix),
            "crc_reflect_function" => format!("{}reflect", p.symbol_prefix),
            "crc_table_gen_function" => format!("{}table_gen", p.symbol_prefix),
            "crc_init_function" => format!("{}init", p.symbol_prefix),
            "crc_update_function" => format!("{}update", p.symbol_prefix),
            "crc_finalize_function" => format!("{}finalize", p.symbol_prefix),

            "constant_crc_init" => pretty_bool(Some(self.init_value().is_some())).to_string(),
            "constant_crc_table" => {
                let constant =
                    p.width.is_some() && p.poly.is_some() && p.reflect_in.is_some();
                pretty_bool(Some(constant)).to_string()
            }
            "simple_crc_update_def" => pretty_bool(Some(self.simple_update_def())).to_string(),
            "inline_crc_finalize" => pretty_bool(Some(self.inline_finalize())).to_string(),
            "simple_crc_finalize_def" => {
                pretty_bool(Some(self.simple_finalize_def())).to_string()
            }
            "use_reflect_func" => pretty_bool(Some(self.use_reflect_func())).to_string(),
            "static_reflect_func" => pretty_bool(Some(self.static_reflect_func())).to_string(),

            "crc_init_value" => self.init_value().unwrap_or_default(),
            "crc_final_value" => self.final_value()?,
            "crc_table_init" => self.table_init(),
            "crc_table_core_algorithm_nonreflected" => self.table_core(false),
            "crc_table_core_algorithm_reflected" => self.table_core(true),

            _ => {
                return Err(Error::UnknownSymbol {
                    name: name.to_string(),
                })
            }
        };
        Ok(value)
    }

    fn c89(&self, c89: &str, c99: &str) -> String {
        match self.params.c_std {
            CStd::C89 => c89.to_string(),
            CStd::C99 => c99.to_string(),
        }
    }

    /// A `cfg_*` symbol: the constant when the parameter is known, a
    /// `cfg` struct member access otherwise.
    fn cfg_value(
        &self,
        defined: bool,
        constant_symbol: &str,
        cfg_member: &str,
    ) -> Result<String, Error> {
        if defined {
            self.lookup(constant_symbol)
        } else {
            Ok(cfg_member.to_string())
        }
    }

    /// A `cfg_*_shifted` symbol. When both the value and the shift count
    /// are known constants the shift folds down to a single literal;
    /// otherwise the shift stays as a C expression.
    fn shifted(&self, base_symbol: &str, value: Option<u64>) -> Result<String, Error> {
        match self.params.tbl_shift() {
            Some(0) => self.lookup(base_symbol),
            Some(shift) => match value {
                Some(value) => expr::simplify_text(&format!("{:#x} << {}", value, shift)),
                None => Ok(format!(
                    "({} << {})",
                    self.lookup(base_symbol)?,
                    self.lookup("cfg_shift")?
                )),
            },
            None => Ok(format!(
                "({} << {})",
                self.lookup(base_symbol)?,
                self.lookup("cfg_shift")?
            )),
        }
    }

    fn filename(&self) -> String {
        match &self.params.output_file {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "crcgen_stdout".to_string()),
            None => "crcgen_stdout".to_string(),
        }
    }

    fn header_filename(&self) -> String {
        if self.params.output_file.is_none() {
            return "crcgen_stdout.h".to_string();
        }
        let filename = self.filename();
        match filename.strip_suffix(".c") {
            Some(stem) => format!("{}.h", stem),
            None => format!("{}.h", filename),
        }
    }

    fn header_protection(&self) -> String {
        let filename = match self.params.output_file {
            Some(_) => self.filename(),
            None => "crcgen_stdout".to_string(),
        };
        let mangled: String = filename
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("__{}__", mangled)
    }

    fn include_files(&self, name: &str) -> Result<String, Error> {
        if self.params.include_files.is_empty() {
            // No includes behaves like an undefined symbol, so templates
            // can guard on `$include_files != Undefined`.
            return Err(Error::UnknownSymbol {
                name: name.to_string(),
            });
        }
        let lines: Vec<String> = self
            .params
            .include_files
            .iter()
            .map(|file| {
                if file.starts_with('"') || file.starts_with('<') {
                    format!("#include {}", file)
                } else {
                    format!("#include \"{}\"", file)
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn simple_update_def(&self) -> bool {
        let p = self.params;
        match p.algorithm {
            Algorithm::BitByBit | Algorithm::BitByBitFast => {
                p.width.is_some() && p.poly.is_some() && p.reflect_in.is_some()
            }
            Algorithm::TableDriven => p.width.is_some() && p.reflect_in.is_some(),
        }
    }

    fn inline_finalize(&self) -> bool {
        let p = self.params;
        matches!(
            p.algorithm,
            Algorithm::BitByBitFast | Algorithm::TableDriven
        ) && p.width.is_some()
            && p.reflect_in.is_some()
            && p.reflect_out.is_some()
            && p.xor_out.is_some()
    }

    fn simple_finalize_def(&self) -> bool {
        let p = self.params;
        match p.algorithm {
            Algorithm::BitByBit => {
                p.width.is_some()
                    && p.poly.is_some()
                    && p.reflect_out.is_some()
                    && p.xor_out.is_some()
            }
            Algorithm::BitByBitFast => {
                p.width.is_some() && p.reflect_out.is_some() && p.xor_out.is_some()
            }
            Algorithm::TableDriven => {
                p.width.is_some()
                    && p.reflect_in.is_some()
                    && p.reflect_out.is_some()
                    && p.xor_out.is_some()
            }
        }
    }

    fn use_reflect_func(&self) -> bool {
        let p = self.params;
        match (p.reflect_in, p.reflect_out) {
            (None, _) | (_, None) => true,
            (Some(reflect_in), Some(reflect_out)) => match p.algorithm {
                Algorithm::TableDriven => reflect_in != reflect_out,
                Algorithm::BitByBit | Algorithm::BitByBitFast => reflect_in || reflect_out,
            },
        }
    }

    fn static_reflect_func(&self) -> bool {
        let p = self.params;
        if p.algorithm == Algorithm::TableDriven {
            false
        } else {
            !(p.reflect_out.is_some() && p.algorithm == Algorithm::BitByBitFast)
        }
    }

    /// The constant initial register value, when the parameters pin it
    /// down. `None` means the generated code must compute it at runtime.
    fn init_value(&self) -> Option<String> {
        let p = self.params;
        let init = match p.algorithm {
            Algorithm::BitByBit => {
                let (width, poly, xor_in) = (p.width?, p.poly?, p.xor_in?);
                let crc = Crc::new(
                    width,
                    poly,
                    p.reflect_in.unwrap_or(false),
                    xor_in,
                    p.reflect_out.unwrap_or(false),
                    p.xor_out.unwrap_or(0),
                    p.tbl_idx_width,
                );
                crc.nondirect_init()
            }
            Algorithm::BitByBitFast => p.xor_in?,
            Algorithm::TableDriven => {
                let (width, reflect_in, xor_in) = (p.width?, p.reflect_in?, p.xor_in?);
                if reflect_in {
                    Crc::reflect(xor_in, width)
                } else {
                    xor_in
                }
            }
        };
        Some(pretty_hex(Some(init), p.width))
    }

    /// The expression a finalize call reduces to when it can be inlined.
    /// The plain variant runs through the expression simplifier, so an
    /// all-zero XOR parameter leaves just `crc`.
    fn final_value(&self) -> Result<String, Error> {
        let p = self.params;
        let plain = |table: &SymbolTable| -> Result<String, Error> {
            match p.xor_out {
                Some(xor_out) => expr::simplify_text(&format!("crc ^ {}", xor_out)),
                None => Ok(format!("crc ^ {}", table.lookup("crc_xor_out")?)),
            }
        };
        let reflected = |table: &SymbolTable| -> Result<String, Error> {
            Ok(format!(
                "{}(crc, {}) ^ {}",
                table.lookup("crc_reflect_function")?,
                table.lookup("crc_width")?,
                table.lookup("crc_xor_out")?
            ))
        };
        if p.algorithm == Algorithm::TableDriven {
            if pretty_bool(p.reflect_in) == pretty_bool(p.reflect_out) {
                plain(self)
            } else {
                reflected(self)
            }
        } else if p.reflect_out == Some(true) {
            reflected(self)
        } else {
            plain(self)
        }
    }

    /// The lookup table as a braced C initializer, or `"0"` when the
    /// table cannot be computed at generation time.
    fn table_init(&self) -> String {
        let p = self.params;
        if p.algorithm != Algorithm::TableDriven {
            return "0".to_string();
        }
        let (width, poly, reflect_in) = match (p.width, p.poly, p.reflect_in) {
            (Some(w), Some(poly), Some(r)) => (w, poly, r),
            _ => return "0".to_string(),
        };
        let crc = Crc::new(width, poly, reflect_in, 0, false, 0, p.tbl_idx_width);
        let table = crc.gen_table();

        let values_per_line = if width > 32 {
            4
        } else if width >= 16 {
            8
        } else {
            16
        };
        let format_width = width.max(8);

        let mut out = String::from("{\n");
        for (i, &entry) in table.iter().enumerate() {
            if i % values_per_line == 0 {
                out.push_str("    ");
            }
            out.push_str(&pretty_hex(Some(entry), Some(format_width)));
            if i == table.len() - 1 {
                // last entry, no separator
            } else if i % values_per_line == values_per_line - 1 {
                out.push_str(",\n");
            } else {
                out.push_str(", ");
            }
        }
        out.push_str("\n}");
        out
    }

    /// One step of the table-driven update loop. The emitted text still
    /// contains control spans and symbol references; the interpreter
    /// expands them recursively.
    fn table_core(&self, reflected: bool) -> String {
        let p = self.params;
        if p.algorithm != Algorithm::TableDriven {
            return String::new();
        }
        let indent = if p.is_fully_defined() {
            " ".repeat(8)
        } else {
            " ".repeat(12)
        };
        let idx_width = p.tbl_idx_width;

        let shifted_reg = if reflected {
            "crc".to_string()
        } else {
            match p.width {
                None => "(crc >> ({%cfg_width%} - {%cfg_table_idx_width%}))".to_string(),
                Some(w) => {
                    let shift = w as i64 - idx_width as i64;
                    if shift < 0 {
                        format!("(crc << {})", -shift)
                    } else if shift == 0 && w >= 8 {
                        "crc".to_string()
                    } else {
                        format!("(crc >> {})", shift)
                    }
                }
            }
        };

        let xor_expr = match p.width {
            Some(w) if w <= idx_width => String::new(),
            _ if reflected => " ^ (crc >> {%cfg_table_idx_width%})".to_string(),
            _ => " ^ (crc << {%cfg_table_idx_width%})".to_string(),
        };

        let mut lines = Vec::new();
        if idx_width == 8 {
            lines.push(format!(
                "{}tbl_idx = ({} ^ *d){{%if ($crc_width > 8)%}} & {{%crc_table_mask%}}{{%endif%}};",
                indent, shifted_reg
            ));
            lines.push(format!(
                "{}crc = (crc_table[tbl_idx]{}) & {{%cfg_mask%}};",
                indent, xor_expr
            ));
        } else {
            for i in 0..(8 / idx_width) {
                let message_shift = if reflected {
                    format!("({} * {{%cfg_table_idx_width%}})", i)
                } else {
                    format!("{}", 8 - (i + 1) * idx_width)
                };
                lines.push(format!(
                    "{}tbl_idx = {} ^ (*d >> {});",
                    indent, shifted_reg, message_shift
                ));
                lines.push(format!(
                    "{}crc = crc_table[tbl_idx & {{%crc_table_mask%}}]{};",
                    indent, xor_expr
                ));
            }
        }
        lines.join("\n")
    }
}

fn asctime_now() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    asctime_utc(secs)
}

/// Format seconds since the epoch the way `asctime` does, in UTC.
fn asctime_utc(secs: u64) -> String {
    const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (hour, minute, second) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    // Civil-from-days conversion on the proleptic Gregorian calendar.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };

    format!(
        "{} {} {:>2} {:02}:{:02}:{:02} {}",
        WEEKDAYS[(days % 7) as usize],
        MONTHS[(month - 1) as usize],
        day,
        hour,
        minute,
        second,
        year
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models;

    fn crc32_params() -> CrcParams {
        let mut params = CrcParams {
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        models::find("crc-32")
            .expect("model exists")
            .apply_to(&mut params);
        params
    }

    #[test]
    fn test_unknown_symbol() {
        let params = CrcParams::default();
        let table = SymbolTable::new(&params);
        match table.lookup("no_such_symbol") {
            Err(Error::UnknownSymbol { name }) => assert_eq!(name, "no_such_symbol"),
            other => panic!("expected unknown symbol error, got {:?}", other.ok()),
        }
    }

    #[test]
    fn test_empty_name_is_empty_expansion() {
        let params = CrcParams::default();
        let table = SymbolTable::new(&params);
        assert_eq!(table.lookup("").ok().as_deref(), Some(""));
    }

    #[test]
    fn test_register_shadows_builtin() {
        let params = CrcParams::default();
        let mut table = SymbolTable::new(&params);
        table.register("datetime", "Thu Jan  1 00:00:00 1970");
        assert_eq!(
            table.lookup("datetime").ok().as_deref(),
            Some("Thu Jan  1 00:00:00 1970")
        );
    }

    #[test]
    fn test_prefixed_names() {
        let params = CrcParams {
            symbol_prefix: "my_".to_string(),
            ..CrcParams::default()
        };
        let table = SymbolTable::new(&params);
        assert_eq!(table.lookup("crc_t").ok().as_deref(), Some("my_t"));
        assert_eq!(table.lookup("cfg_t").ok().as_deref(), Some("my_cfg_t"));
        assert_eq!(
            table.lookup("crc_update_function").ok().as_deref(),
            Some("my_update")
        );
    }

    #[test]
    fn test_cfg_symbols_pick_constant_or_struct_member() {
        let params = crc32_params();
        let table = SymbolTable::new(&params);
        assert_eq!(table.lookup("cfg_poly").ok().as_deref(), Some("0x04c11db7"));
        assert_eq!(table.lookup("cfg_mask").ok().as_deref(), Some("0xffffffff"));

        let undefined = CrcParams::default();
        let table = SymbolTable::new(&undefined);
        assert_eq!(table.lookup("cfg_poly").ok().as_deref(), Some("cfg->poly"));
        assert_eq!(
            table.lookup("cfg_mask").ok().as_deref(),
            Some("cfg->crc_mask")
        );
    }

    #[test]
    fn test_shifted_symbols_fold_for_narrow_widths() {
        let mut params = CrcParams {
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        models::find("crc-5")
            .expect("model exists")
            .apply_to(&mut params);
        let table = SymbolTable::new(&params);
        // 0x05 << 3, folded by the expression engine.
        assert_eq!(table.lookup("cfg_poly_shifted").ok().as_deref(), Some("40u"));
        assert_eq!(table.lookup("crc_shift").ok().as_deref(), Some("3"));
    }

    #[test]
    fn test_shifted_symbols_stay_plain_for_byte_widths() {
        let params = crc32_params();
        let table = SymbolTable::new(&params);
        assert_eq!(
            table.lookup("cfg_poly_shifted").ok().as_deref(),
            Some("0x04c11db7")
        );
    }

    #[test]
    fn test_final_value_simplifies_zero_xor() {
        let mut params = CrcParams::default();
        models::find("crc-8")
            .expect("model exists")
            .apply_to(&mut params);
        let table = SymbolTable::new(&params);
        // xor_out is zero, so finalize degenerates to the register itself.
        assert_eq!(table.lookup("crc_final_value").ok().as_deref(), Some("crc"));
    }

    #[test]
    fn test_final_value_reflected() {
        let mut params = CrcParams {
            algorithm: Algorithm::BitByBitFast,
            ..CrcParams::default()
        };
        models::find("crc-16")
            .expect("model exists")
            .apply_to(&mut params);
        params.xor_out = Some(0xffff);
        let table = SymbolTable::new(&params);
        assert_eq!(
            table.lookup("crc_final_value").ok().as_deref(),
            Some("crc_reflect(crc, 16) ^ 0xffff")
        );
    }

    #[test]
    fn test_table_init_contains_crc32_entries() {
        let params = crc32_params();
        let table = SymbolTable::new(&params);
        let init = table.lookup("crc_table_init").expect("table init");
        assert!(init.starts_with("{\n"));
        assert!(init.ends_with("\n}"));
        assert!(init.contains("0x77073096"));
        assert!(init.contains("0x2d02ef8d"));
    }

    #[test]
    fn test_table_init_is_zero_without_parameters() {
        let params = CrcParams {
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        let table = SymbolTable::new(&params);
        assert_eq!(table.lookup("crc_table_init").ok().as_deref(), Some("0"));
    }

    #[test]
    fn test_include_files_quoting() {
        let params = CrcParams {
            include_files: vec!["config.h".to_string(), "<inttypes.h>".to_string()],
            ..CrcParams::default()
        };
        let table = SymbolTable::new(&params);
        assert_eq!(
            table.lookup("include_files").ok().as_deref(),
            Some("#include \"config.h\"\n#include <inttypes.h>")
        );
    }

    #[test]
    fn test_include_files_empty_is_undefined() {
        let params = CrcParams::default();
        let table = SymbolTable::new(&params);
        assert!(matches!(
            table.lookup("include_files"),
            Err(Error::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn test_header_protection() {
        let params = CrcParams {
            output_file: Some("out/crc-32.c".into()),
            ..CrcParams::default()
        };
        let table = SymbolTable::new(&params);
        assert_eq!(
            table.lookup("header_protection").ok().as_deref(),
            Some("__CRC_32_C__")
        );
        assert_eq!(
            table.lookup("header_filename").ok().as_deref(),
            Some("crc-32.h")
        );
    }

    #[test]
    fn test_init_value_per_algorithm() {
        let mut params = CrcParams::default();
        models::find("ccitt").expect("model exists").apply_to(&mut params);

        params.algorithm = Algorithm::BitByBitFast;
        let table = SymbolTable::new(&params);
        assert_eq!(table.lookup("crc_init_value").ok().as_deref(), Some("0xffff"));

        params.algorithm = Algorithm::TableDriven;
        let table = SymbolTable::new(&params);
        assert_eq!(table.lookup("crc_init_value").ok().as_deref(), Some("0xffff"));
    }

    #[test]
    fn test_table_core_byte_index() {
        let params = crc32_params();
        let table = SymbolTable::new(&params);
        let core = table
            .lookup("crc_table_core_algorithm_reflected")
            .expect("core text");
        assert!(core.contains("tbl_idx = (crc ^ *d)"));
        assert!(core.contains("crc_table[tbl_idx]"));
        assert!(!core.ends_with('\n'));
    }

    #[test]
    fn test_asctime_format() {
        // 2026-08-30 12:34:56 UTC is a Sunday.
        assert_eq!(asctime_utc(1_788_093_296), "Sun Aug 30 12:34:56 2026");
        assert_eq!(asctime_utc(0), "Thu Jan  1 00:00:00 1970");
    }
}
