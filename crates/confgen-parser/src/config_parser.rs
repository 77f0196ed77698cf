//! Stateful line-oriented configuration parser
//!
//! A single forward pass over the input with three cooperating modes:
//! header lines (starting with `/`) open a new block, indented lines
//! belong to the current block, and certificate/script import signatures
//! switch into a verbatim multi-line mode until the `-----END` marker.

use crate::error::Result;
use crate::form_factor::{detect_form_factor, detect_hypervisor, HEADER_SCAN_LINES};
use confgen_core::{FormFactor, ModuleBlock, ModuleType};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Keywords that mark a header as an action command
const ACTION_KEYWORDS: [&str; 6] = ["clear", "add", "delete", "remove", "on", "off"];

/// Marker ending a multi-line content block
const MULTILINE_END_MARKER: &str = "-----END";

fn cert_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)import\s+(cert|request|key)\s+"([^"]+)"\s+text"#).unwrap()
    })
}

fn script_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)import\s+text").unwrap())
}

/// Parser for hierarchical CLI-style configuration files
#[derive(Debug, Default)]
pub struct ConfigParser {
    modules: Vec<ModuleBlock>,
    current: Option<ModuleBlock>,
    in_multiline: bool,
    multiline_buffer: Vec<String>,
    line_number: usize,
    form_factor: Option<FormFactor>,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration text into module blocks
    ///
    /// Orphan sub-lines (indented lines with no open block) are dropped
    /// silently; an unterminated multi-line block at end of input leaves
    /// `multiline_content` unset.
    pub fn parse(&mut self, config_text: &str) -> Vec<ModuleBlock> {
        self.modules = Vec::new();
        self.current = None;
        self.in_multiline = false;
        self.multiline_buffer = Vec::new();
        self.line_number = 0;

        let lines: Vec<&str> = config_text.split('\n').collect();
        let scan = lines.len().min(HEADER_SCAN_LINES);
        self.form_factor = Some(detect_form_factor(&lines[..scan]));

        for line in &lines {
            self.line_number += 1;
            self.process_line(line);
        }

        self.finalize_current();
        std::mem::take(&mut self.modules)
    }

    /// Form factor detected by the last `parse` call
    pub fn detected_form_factor(&self) -> Option<FormFactor> {
        self.form_factor
    }

    fn process_line(&mut self, line: &str) {
        if self.in_multiline {
            self.process_multiline(line);
            return;
        }

        if line.starts_with('/') {
            self.process_header(line);
            return;
        }

        if !line.is_empty() && (line.starts_with('\t') || line.starts_with(' ')) {
            self.process_subline(line);
        }
        // Anything else is a blank or unrecognized line
    }

    fn process_header(&mut self, line: &str) {
        self.finalize_current();

        let mut block = ModuleBlock::new(self.line_number);
        block.raw_lines.push(line.to_string());
        Self::parse_header_tokens(&mut block, line.trim());

        block.form_factor = self.form_factor;
        if self.form_factor == Some(FormFactor::Va) {
            block.hypervisor_support = detect_hypervisor(&block.module_path);
        }

        self.current = Some(block);
    }

    /// Split a header line into path, optional index, and action parameters
    fn parse_header_tokens(block: &mut ModuleBlock, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(path) = tokens.first() else {
            return;
        };
        block.module_path = path.to_string();

        let last_segment = path.rsplit('/').next().unwrap_or_default().to_lowercase();
        let last_token = tokens.last().unwrap_or(&"").to_lowercase();

        if ACTION_KEYWORDS.contains(&last_segment.as_str()) {
            // Action keyword is part of the path itself
            block.module_type = ModuleType::Action;
            block.action_params = tokens[1..].iter().map(|t| t.to_string()).collect();
        } else if tokens.len() > 1 && ACTION_KEYWORDS.contains(&last_token.as_str()) {
            // Action keyword trails the header; tokens in between are parameters
            block.module_type = ModuleType::Action;
            if tokens.len() > 2 {
                block.action_params = tokens[1..tokens.len() - 1]
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
            }
        } else if tokens.len() > 1 {
            // Remaining tokens form the index, which may be a multi-word name
            block.index = Some(tokens[1..].join(" "));
        }
    }

    fn process_subline(&mut self, line: &str) {
        let Some(current) = self.current.as_mut() else {
            // Orphan sub-line without a module
            return;
        };

        current.raw_lines.push(line.to_string());
        current.end_line = self.line_number;

        let normalized = line.trim();
        if normalized.is_empty() {
            return;
        }

        if self.check_multiline_trigger(normalized) {
            return;
        }

        // check_multiline_trigger re-borrows, so fetch the block again
        if let Some(current) = self.current.as_mut() {
            current.sub_lines.push(normalized.to_string());
        }
    }

    /// Switch into multi-line mode when the line is a cert or script import
    fn check_multiline_trigger(&mut self, line: &str) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };

        if let Some(captures) = cert_import_re().captures(line) {
            current
                .multiline_metadata
                .insert("cert_type".to_string(), captures[1].to_string());
            current
                .multiline_metadata
                .insert("cert_name".to_string(), captures[2].to_string());
            current.module_type = ModuleType::MultilineCert;
            current.sub_lines.push(line.to_string());

            self.in_multiline = true;
            self.multiline_buffer = Vec::new();
            return true;
        }

        if script_import_re().is_match(line) {
            if let Some(index) = current.index.clone() {
                current
                    .multiline_metadata
                    .insert("script_id".to_string(), index);
            }
            current.module_type = ModuleType::MultilineScript;
            current.sub_lines.push(line.to_string());

            self.in_multiline = true;
            self.multiline_buffer = Vec::new();
            return true;
        }

        false
    }

    fn process_multiline(&mut self, line: &str) {
        if let Some(current) = self.current.as_mut() {
            current.raw_lines.push(line.to_string());
            current.end_line = self.line_number;
        }

        if line.trim_start().starts_with(MULTILINE_END_MARKER) {
            self.multiline_buffer.push(line.to_string());
            if let Some(current) = self.current.as_mut() {
                current.multiline_content = Some(self.multiline_buffer.join("\n"));
            }
            self.in_multiline = false;
            self.multiline_buffer = Vec::new();
            return;
        }

        self.multiline_buffer.push(line.to_string());
    }

    fn finalize_current(&mut self) {
        let Some(mut block) = self.current.take() else {
            return;
        };

        if block.module_type == ModuleType::Standard && block.is_contentless() {
            block.module_type = ModuleType::Empty;
        }

        log::trace!("finalized module block {}", block);
        self.modules.push(block);
    }
}

/// Parse a configuration file from disk
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<ModuleBlock>> {
    let content = std::fs::read_to_string(path)?;
    let mut parser = ConfigParser::new();
    Ok(parser.parse(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::Hypervisor;

    fn parse(text: &str) -> Vec<ModuleBlock> {
        ConfigParser::new().parse(text)
    }

    #[test]
    fn test_standard_module_with_sublines() {
        let config = "/c/l3/if 1\n\tena\n\tipver v4\n\taddr 10.250.18.26\n\tmask 255.255.255.0\n\tvlan 818\n";
        let modules = parse(config);

        assert_eq!(modules.len(), 1);
        let block = &modules[0];
        assert_eq!(block.module_path, "/c/l3/if");
        assert_eq!(block.index.as_deref(), Some("1"));
        assert_eq!(block.module_type, ModuleType::Standard);
        assert_eq!(block.sub_lines.len(), 5);
        assert_eq!(block.sub_lines[2], "addr 10.250.18.26");
        assert_eq!(block.start_line, 1);
        assert_eq!(block.end_line, 6);
    }

    #[test]
    fn test_back_to_back_headers_yield_empty_block() {
        let config = "/c/slb\n/c/slb/real 1\n\trip 10.0.0.5\n";
        let modules = parse(config);

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].module_type, ModuleType::Empty);
        assert!(modules[0].sub_lines.is_empty());
        assert_eq!(modules[1].module_type, ModuleType::Standard);
    }

    #[test]
    fn test_action_keyword_in_path() {
        let config = "/c/l2/stg/clear 1\n";
        let modules = parse(config);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_type, ModuleType::Action);
        assert_eq!(modules[0].module_path, "/c/l2/stg/clear");
        assert_eq!(modules[0].action_params, vec!["1"]);
        assert!(modules[0].index.is_none());
    }

    #[test]
    fn test_action_keyword_as_last_token() {
        let config = "/c/slb/group 3 delete\n";
        let modules = parse(config);

        assert_eq!(modules[0].module_type, ModuleType::Action);
        assert_eq!(modules[0].action_params, vec!["3"]);
    }

    #[test]
    fn test_multi_word_index() {
        let config = "/c/slb/real Vision Analytics\n\trip 10.1.1.9\n";
        let modules = parse(config);
        assert_eq!(modules[0].index.as_deref(), Some("Vision Analytics"));
    }

    #[test]
    fn test_cert_import_multiline() {
        let config = concat!(
            "/c/slb/ssl/certs/srvrcert\n",
            "\timport cert \"web-cert\" text\n",
            "-----BEGIN CERTIFICATE-----\n",
            "MIIBxzCCAXACAQE=\n",
            "-----END CERTIFICATE-----\n",
            "/c/slb/ssl\n",
            "\ton\n",
        );
        let modules = parse(config);

        assert_eq!(modules.len(), 2);
        let cert = &modules[0];
        assert_eq!(cert.module_type, ModuleType::MultilineCert);
        assert_eq!(cert.multiline_metadata.get("cert_type").unwrap(), "cert");
        assert_eq!(cert.multiline_metadata.get("cert_name").unwrap(), "web-cert");
        let content = cert.multiline_content.as_deref().unwrap();
        assert!(content.starts_with("-----BEGIN CERTIFICATE-----"));
        assert!(content.ends_with("-----END CERTIFICATE-----"));
        // The import command itself stays in sub_lines
        assert_eq!(cert.sub_lines, vec!["import cert \"web-cert\" text"]);
    }

    #[test]
    fn test_script_import_multiline() {
        let config = concat!(
            "/c/slb/appshape/script hello_script\n",
            "\tena\n",
            "\timport text\n",
            "when HTTP_REQUEST {\n",
            "}\n",
            "-----END\n",
        );
        let modules = parse(config);

        let script = &modules[0];
        assert_eq!(script.module_type, ModuleType::MultilineScript);
        assert_eq!(
            script.multiline_metadata.get("script_id").unwrap(),
            "hello_script"
        );
        assert_eq!(
            script.multiline_content.as_deref().unwrap(),
            "when HTTP_REQUEST {\n}\n-----END"
        );
        assert_eq!(script.sub_lines, vec!["ena", "import text"]);
    }

    #[test]
    fn test_unterminated_multiline_is_dropped() {
        let config = "/c/slb/ssl/certs/key\n\timport key \"k1\" text\n-----BEGIN KEY-----\nAAAA\n";
        let modules = parse(config);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_type, ModuleType::MultilineCert);
        assert!(modules[0].multiline_content.is_none());
    }

    #[test]
    fn test_orphan_subline_is_dropped() {
        let config = "\tena\n/c/sys\n\tidle 60\n";
        let modules = parse(config);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].sub_lines, vec!["idle 60"]);
    }

    #[test]
    fn test_raw_lines_round_trip() {
        let text = "/c/l3/if 1\n\tena\n\taddr 10.250.18.26\n\tmask 255.255.255.0";
        let modules = parse(text);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].raw_lines.join("\n"), text);
    }

    #[test]
    fn test_form_factor_uniform_across_blocks() {
        let config = concat!(
            "/* Configuration dump \"Application Switch VA\" */\n",
            "/c/sys\n",
            "\tidle 60\n",
            "/c/slb/real 1\n",
            "\trip 10.0.0.1\n",
        );
        let modules = parse(config);

        assert!(modules.len() >= 2);
        assert!(modules
            .iter()
            .all(|m| m.form_factor == Some(FormFactor::Va)));
    }

    #[test]
    fn test_hypervisor_only_for_va() {
        let va_config = concat!(
            "/* dump \"Switch VA\" */\n",
            "/c/sys/azure/net\n",
            "\tena\n",
        );
        let modules = parse(va_config);
        // Block 0 is the comment pseudo-header; block 1 is the azure module
        let azure = modules
            .iter()
            .find(|m| m.module_path == "/c/sys/azure/net")
            .unwrap();
        assert_eq!(azure.hypervisor_support, Some(Hypervisor::Azure));

        let sa_config = "/c/sys/azure/net\n\tena\n";
        let modules = parse(sa_config);
        assert_eq!(modules[0].form_factor, Some(FormFactor::Sa));
        assert!(modules[0].hypervisor_support.is_none());
    }

    #[test]
    fn test_block_count_matches_header_count() {
        let config = "/c/sys\n\tidle 10\n\n/c/port 1\n\tpvid 818\n\n/c/l2/vlan 818\n\tena\n";
        let modules = parse(config);
        assert_eq!(modules.len(), 3);
    }
}
