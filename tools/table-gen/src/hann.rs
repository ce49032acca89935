//! Hann window lookup table generator
//!
//! Emits a combinational SystemVerilog module mapping every sample index
//! `n` in `[0, N]` (with `N = 2^n_bits - 1`) to the fixed-point coefficient
//! `floor(2^out_bits * sin(pi * n / N)^2)`.

use std::f64::consts::PI;
use std::fmt::Write as FmtWrite;

use crate::error::TableError;

/// Default index width
pub const N_BITS: u32 = 12;

/// Default coefficient width
pub const OUT_BITS: u32 = 24;

/// Widest index supported (keeps the case table to 16M lines)
pub const MAX_N_BITS: u32 = 24;

/// Widest coefficient that still scales exactly in an f64
pub const MAX_OUT_BITS: u32 = 52;

pub const DEFAULT_MODULE_NAME: &str = "hann";

const INDENT: &str = "    ";

/// Table dimensions and output naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HannParams {
    pub n_bits: u32,
    pub out_bits: u32,
    pub module_name: String,
}

impl Default for HannParams {
    fn default() -> Self {
        Self {
            n_bits: N_BITS,
            out_bits: OUT_BITS,
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

impl HannParams {
    pub fn new(n_bits: u32, out_bits: u32) -> Self {
        Self {
            n_bits,
            out_bits,
            ..Self::default()
        }
    }

    /// Highest sample index, `N = 2^n_bits - 1`
    pub fn domain_max(&self) -> u64 {
        1u64.checked_shl(self.n_bits).map_or(u64::MAX, |v| v - 1)
    }

    /// Largest representable coefficient, `2^out_bits - 1`
    pub fn coeff_max(&self) -> u64 {
        1u64.checked_shl(self.out_bits).map_or(u64::MAX, |v| v - 1)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.n_bits == 0 {
            return Err(TableError::DomainComputation {
                n_bits: self.n_bits,
            });
        }
        if self.n_bits > MAX_N_BITS {
            return Err(TableError::WidthOutOfRange {
                name: "n_bits",
                bits: self.n_bits,
                min: 1,
                max: MAX_N_BITS,
            });
        }
        if self.out_bits == 0 || self.out_bits > MAX_OUT_BITS {
            return Err(TableError::WidthOutOfRange {
                name: "out_bits",
                bits: self.out_bits,
                min: 1,
                max: MAX_OUT_BITS,
            });
        }
        if !is_identifier(&self.module_name) {
            return Err(TableError::InvalidModuleName(self.module_name.clone()));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Scaled window weight; caller guarantees `0 <= n <= max` and `max > 0`
fn window(n: u64, max: u64, params: &HannParams) -> u64 {
    let c = (PI * n as f64 / max as f64).sin();
    let raw = (1u64 << params.out_bits) as f64 * (c * c);
    tracing::trace!("hann({}) = {}", n, raw);

    // `as` truncates toward zero
    (raw as u64).min(params.coeff_max())
}

/// Coefficient for a single sample index
pub fn coefficient(n: u64, params: &HannParams) -> Result<u64, TableError> {
    params.validate()?;

    let max = params.domain_max();
    if n > max {
        return Err(TableError::IndexOutOfDomain { n, max });
    }
    Ok(window(n, max, params))
}

/// Coefficients for the whole domain in index order
pub fn coefficients(params: &HannParams) -> Result<Vec<u64>, TableError> {
    params.validate()?;

    let max = params.domain_max();
    Ok((0..=max).map(|n| window(n, max, params)).collect())
}

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

/// Render the lookup module source
pub fn generate_hann_table(params: &HannParams) -> Result<String, TableError> {
    let coeffs = coefficients(params)?;

    tracing::debug!(
        "{}: {} entries, {}-bit index, {}-bit coefficient",
        params.module_name,
        coeffs.len(),
        params.n_bits,
        params.out_bits
    );

    let mut output = String::new();
    writeln!(
        output,
        "module {}(input logic [{}:0] n, output logic [{}:0] coeff);",
        params.module_name,
        params.n_bits - 1,
        params.out_bits - 1
    )?;
    writeln!(output, "{}always_comb begin", indent(1))?;
    writeln!(output, "{}case(n)", indent(2))?;

    let entry_indent = indent(3);
    for (n, coeff) in coeffs.iter().enumerate() {
        writeln!(
            output,
            "{}{}'d{}: coeff = {}'d{};",
            entry_indent, params.n_bits, n, params.out_bits, coeff
        )?;
    }

    writeln!(output, "{}endcase", indent(2))?;
    writeln!(output, "{}end", indent(1))?;
    writeln!(output, "endmodule")?;

    Ok(output)
}
