//! Query building for template retrieval
//!
//! Derives category hints and an embedding query text from a
//! natural-language requirement using a fixed keyword table.

/// Category keyword table; first match order is the hint order
const CATEGORY_KEYWORDS: [(&str, &[&str]); 7] = [
    (
        "load_balancing",
        &[
            "load balanc",
            "virtual server",
            "vip",
            "real server",
            "backend",
            "pool",
            "server group",
            "slb",
        ],
    ),
    (
        "network_layer3",
        &[
            "ip address",
            "layer 3",
            "l3",
            "routing",
            "gateway",
            "interface",
            "subnet",
        ],
    ),
    (
        "network_layer2",
        &["vlan", "layer 2", "l2", "switch port", "ethernet"],
    ),
    (
        "security_ssl",
        &["ssl", "tls", "certificate", "cert", "https", "offload"],
    ),
    (
        "security_access",
        &["user", "authentication", "password", "login", "credential"],
    ),
    (
        "monitoring",
        &["monitor", "log", "ntp", "snmp", "syslog"],
    ),
    ("system_management", &["management", "admin", "mgmt"]),
];

/// Builds retrieval queries from requirement text
#[derive(Debug, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Categories suggested by the requirement, in table order
    pub fn categories_for(&self, requirement: &str) -> Vec<String> {
        let text = requirement.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(category, _)| category.to_string())
            .collect()
    }

    /// Text to embed for similarity search
    ///
    /// The lower-cased requirement enriched with its category hints, so
    /// templates annotated with the same category pull closer.
    pub fn query_text(&self, requirement: &str) -> String {
        let mut text = requirement.to_lowercase();
        let categories = self.categories_for(requirement);
        if !categories.is_empty() {
            text.push_str(" | ");
            text.push_str(&categories.join(" "));
        }
        text
    }
}
