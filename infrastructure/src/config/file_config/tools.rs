//! Tools configuration from TOML (`[tools]` section)
//!
//! One table per research tool. Every key is optional; omitted keys keep
//! the tool's own defaults (which differ per tool, e.g. the LLM-backed
//! tools allow longer timeouts and fewer retries).
//!
//! Example configuration:
//!
//! ```toml
//! [tools.search]
//! default_max_results = 5
//!
//! [tools.fetch]
//! cache_ttl_secs = 600
//!
//! [tools.synthesize]
//! enabled = false
//! ```

use crate::tools::analyze::AnalyzeConfig;
use crate::tools::fetch::FetchConfig;
use crate::tools::search::SearchConfig;
use crate::tools::synthesize::SynthesizeConfig;
use serde::{Deserialize, Serialize};

/// `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub analyze: AnalyzeConfig,
    pub synthesize: SynthesizeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_domain::research::SearchDepth;

    #[test]
    fn test_per_tool_defaults_survive_partial_tables() {
        let config: FileToolsConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileToolsConfig::default());

        let config: FileToolsConfig = toml::from_str(
            r#"
[search]
default_depth = "advanced"

[synthesize]
timeout_ms = 120000
"#,
        )
        .unwrap();
        assert_eq!(config.search.default_depth, SearchDepth::Advanced);
        assert_eq!(config.search.max_retries, 3);
        assert_eq!(config.synthesize.timeout_ms, 120_000);
        assert_eq!(config.synthesize.max_retries, 2);
        assert_eq!(config.analyze.timeout_ms, 60_000);
    }

    #[test]
    fn test_disable_a_tool() {
        let config: FileToolsConfig = toml::from_str("[fetch]\nenabled = false\n").unwrap();
        assert!(!config.fetch.enabled);
        assert!(!config.fetch.tool_config().enabled);
        assert!(config.search.enabled);
    }
}
