//! Device form-factor and hypervisor detection
//!
//! The form factor is read from the first lines of a configuration dump:
//! a quoted product string containing "VA" marks a virtual appliance, a
//! `vADC Id <n>` comment marks a VX host (n = 0) or a vADC instance
//! (n > 0), anything else is a standalone appliance.

use confgen_core::{FormFactor, Hypervisor};
use regex::Regex;
use std::sync::OnceLock;

/// Number of leading lines inspected for form-factor markers
pub const HEADER_SCAN_LINES: usize = 15;

fn va_quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""[^"]*\sVA\s*""#).unwrap())
}

fn va_leading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""VA\s"#).unwrap())
}

fn vadc_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)vADC\s+Id\s+(\d+)").unwrap())
}

/// Detect the device form factor from the leading header lines
pub fn detect_form_factor(header_lines: &[&str]) -> FormFactor {
    if let Some(first_line) = header_lines.first() {
        if va_quoted_re().is_match(first_line) || va_leading_re().is_match(first_line) {
            return FormFactor::Va;
        }
    }

    for line in header_lines {
        if !line.trim_start().starts_with("/*") {
            continue;
        }
        if let Some(captures) = vadc_id_re().captures(line) {
            let vadc_id: u64 = captures[1].parse().unwrap_or(0);
            return if vadc_id == 0 {
                FormFactor::Vx
            } else {
                FormFactor::Vadc
            };
        }
    }

    FormFactor::Sa
}

/// Detect the hypervisor restriction of a VA module from its path
///
/// `None` means the module applies to all hypervisors.
pub fn detect_hypervisor(module_path: &str) -> Option<Hypervisor> {
    let path = module_path.to_lowercase();
    if path.contains("aws") {
        Some(Hypervisor::Aws)
    } else if path.contains("azure") {
        Some(Hypervisor::Azure)
    } else if path.contains("gcp") {
        Some(Hypervisor::Gcp)
    } else {
        None
    }
}
