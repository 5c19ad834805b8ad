//! Tool Registry
//!
//! The [`ToolRegistry`] owns the tool instances, executes them by name and
//! keeps a bounded execution history from which usage statistics are
//! derived.
//!
//! # Usage
//!
//! ```ignore
//! use sleuth_infrastructure::tools::{ToolRegistry, register_research_tools};
//!
//! let registry = ToolRegistry::new();
//! register_research_tools(&registry, ports, &config.tools);
//!
//! let result = registry
//!     .execute_tool("web_search", json!({"query": "rust 2024 edition"}), &ToolContext::new())
//!     .await;
//! let stats = registry.get_tool_statistics("web_search");
//! ```
//!
//! # Guarantees
//!
//! - `execute_tool` never fails: unknown tools, registry-disabled tools and
//!   panics inside a tool all come back as a failed [`ToolResult`].
//! - The history keeps the most recent `max_history_size` executions across
//!   all tools; success rate and average duration only cover those.
//! - All state sits behind locks that are never held across an `.await`,
//!   so the registry can be shared (`Arc<ToolRegistry>`) between tasks.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use sleuth_application::{BatchOptions, Tool, ToolContext, process_in_batches};
use sleuth_domain::tool::entities::DEFAULT_MAX_HISTORY_SIZE;
use sleuth_domain::{
    HistoryQuery, ToolEntryMetadata, ToolError, ToolExecutionLog, ToolResult, ToolSchema,
    ToolStatistics,
};
use tracing::{debug, error, warn};

struct RegisteredTool {
    tool: Arc<dyn Tool>,
    metadata: ToolEntryMetadata,
}

/// Public view of one registry entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolListing {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(flatten)]
    pub metadata: ToolEntryMetadata,
}

/// Statistics about the registry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_tools: usize,
    pub enabled_tools: usize,
    pub tools_per_category: HashMap<String, usize>,
    pub history_size: usize,
}

/// Registry of named tools with usage tracking.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, RegisteredTool>>,
    history: Mutex<VecDeque<ToolExecutionLog>>,
    max_history_size: usize,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY_SIZE)
    }

    pub fn with_max_history(max_history_size: usize) -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            history: Mutex::new(VecDeque::new()),
            max_history_size,
        }
    }

    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    fn read_tools(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, RegisteredTool>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tools(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, RegisteredTool>> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, VecDeque<ToolExecutionLog>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `tool` under its own name, replacing any tool of that name.
    pub fn register_tool(&self, tool: Arc<dyn Tool>, metadata: ToolEntryMetadata) {
        let name = tool.name().to_string();
        debug!(tool = %name, category = %metadata.category, "Registered tool");

        let previous = self
            .write_tools()
            .insert(name.clone(), RegisteredTool { tool, metadata });
        if previous.is_some() {
            warn!(tool = %name, "Tool was already registered, replaced");
        }
    }

    pub fn register<T: Tool + 'static>(&self, tool: T, metadata: ToolEntryMetadata) {
        self.register_tool(Arc::new(tool), metadata);
    }

    /// Remove a tool. Its history records are kept.
    pub fn unregister_tool(&self, name: &str) -> bool {
        let removed = self.write_tools().remove(name).is_some();
        if removed {
            debug!(tool = name, "Unregistered tool");
        }
        removed
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.read_tools().get(name).map(|entry| entry.tool.clone())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.read_tools().contains_key(name)
    }

    /// All entries, sorted by name.
    pub fn list_tools(&self) -> Vec<ToolListing> {
        let mut listings: Vec<ToolListing> = self
            .read_tools()
            .iter()
            .map(|(name, entry)| ToolListing {
                name: name.clone(),
                description: entry.tool.description().to_string(),
                version: entry.tool.version().to_string(),
                metadata: entry.metadata.clone(),
            })
            .collect();
        listings.sort_by(|a, b| a.name.cmp(&b.name));
        listings
    }

    fn names_where(&self, predicate: impl Fn(&ToolEntryMetadata) -> bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .read_tools()
            .iter()
            .filter(|(_, entry)| predicate(&entry.metadata))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn tools_by_category(&self, category: &str) -> Vec<String> {
        self.names_where(|meta| meta.category == category)
    }

    pub fn tools_by_tag(&self, tag: &str) -> Vec<String> {
        self.names_where(|meta| meta.has_tag(tag))
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        match self.write_tools().get_mut(name) {
            Some(entry) => {
                entry.metadata.enabled = enabled;
                debug!(tool = name, enabled, "Tool availability changed");
                true
            }
            None => false,
        }
    }

    /// Returns false for unknown tools.
    pub fn enable_tool(&self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    /// Returns false for unknown tools.
    pub fn disable_tool(&self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.read_tools()
            .get(name)
            .is_some_and(|entry| entry.metadata.enabled)
    }

    /// Look up, gate and count one execution of `name`.
    fn begin_execution(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        let mut tools = self.write_tools();
        let entry = tools
            .get_mut(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        if !entry.metadata.enabled {
            return Err(ToolError::Disabled);
        }
        entry.metadata.usage_count += 1;
        entry.metadata.last_used = Some(Utc::now());
        Ok(entry.tool.clone())
    }

    /// Execute a tool by name.
    ///
    /// Unknown and registry-disabled tools are answered without touching
    /// the tool and are not recorded in the history.
    pub async fn execute_tool(&self, name: &str, input: Value, ctx: &ToolContext) -> ToolResult<Value> {
        let tool = match self.begin_execution(name) {
            Ok(tool) => tool,
            Err(err) => {
                warn!(tool = name, code = err.code(), "Tool execution rejected: {}", err);
                return ToolResult::failure(&err);
            }
        };

        let start_time = Utc::now();
        let started = Instant::now();

        let result = match AssertUnwindSafe(tool.execute(input.clone(), ctx))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                let err = ToolError::Execution(format!("tool panicked: {}", panic_message(&*panic)));
                error!(tool = name, "Tool execution panicked: {}", err);
                ToolResult::failure(&err).with_duration(started.elapsed().as_millis() as u64)
            }
        };

        self.record(ToolExecutionLog::new(
            name,
            input,
            result.clone(),
            start_time,
            Utc::now(),
        ));
        result
    }

    /// Run `name` over many inputs with bounded concurrency, results in
    /// input order.
    pub async fn execute_many(
        &self,
        name: &str,
        inputs: Vec<Value>,
        ctx: &ToolContext,
        options: &BatchOptions,
    ) -> Vec<ToolResult<Value>> {
        process_in_batches(inputs, |input| self.execute_tool(name, input, ctx), options).await
    }

    fn record(&self, log: ToolExecutionLog) {
        let mut history = self.lock_history();
        history.push_back(log);
        while history.len() > self.max_history_size {
            history.pop_front();
        }
    }

    /// Schemas of enabled tools, sorted by name.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .read_tools()
            .values()
            .filter(|entry| entry.metadata.enabled && entry.tool.config().enabled)
            .map(|entry| entry.tool.schema())
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    pub fn get_tool_statistics(&self, name: &str) -> Option<ToolStatistics> {
        let (usage_count, last_used) = {
            let tools = self.read_tools();
            let entry = tools.get(name)?;
            (entry.metadata.usage_count, entry.metadata.last_used)
        };

        let history = self.lock_history();
        Some(ToolStatistics::from_history(
            usage_count,
            last_used,
            history.iter().filter(|log| log.tool_name == name),
        ))
    }

    /// Matching records, oldest first; `limit` keeps the most recent ones.
    pub fn get_execution_history(&self, query: &HistoryQuery) -> Vec<ToolExecutionLog> {
        let history = self.lock_history();
        let matching: Vec<&ToolExecutionLog> = history.iter().filter(|log| query.matches(log)).collect();
        let skip = query
            .limit
            .map_or(0, |limit| matching.len().saturating_sub(limit));
        matching.into_iter().skip(skip).cloned().collect()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        let tools = self.read_tools();
        let mut tools_per_category = HashMap::new();
        for entry in tools.values() {
            *tools_per_category
                .entry(entry.metadata.category.clone())
                .or_insert(0) += 1;
        }

        RegistryStats {
            total_tools: tools.len(),
            enabled_tools: tools.values().filter(|e| e.metadata.enabled).count(),
            tools_per_category,
            history_size: self.lock_history().len(),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
