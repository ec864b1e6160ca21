//! WebAssembly tool plugins.
//!
//! A `.wasm` plugin is one tool compiled to a module without imports. The
//! module exports:
//!
//! - `memory`
//! - `alloc(len: i32) -> i32`, returning room for the request body
//! - `metadata() -> i64`, pointing at a JSON object with `name`, `category`
//!   and `description`, plus optional `version` and `inputSchema`
//! - `execute(ptr: i32, len: i32) -> i64`, reading the JSON request body and
//!   pointing at `{"result": ...}` or `{"error": "..."}`
//!
//! Returned pointers carry the offset in the high 32 bits and the length in
//! the low 32 bits. Every call runs in a fresh store and instance bounded by
//! [`WasmLimits`], so no state survives between requests.

use std::path::Path;

use anyhow::{bail, Context};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};
use wasmtime::{Config, Engine, Instance, Memory, Module, Store, StoreLimits, StoreLimitsBuilder, Trap};

use super::error::{PluginError, PluginResult};
use crate::domains::tools::{Tool, ToolError, ToolResult};

/// Per-call resource bounds for WebAssembly tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmLimits {
    /// Fuel granted to each call, roughly one unit per instruction.
    pub fuel: u64,

    /// Largest linear memory a module may grow to.
    pub max_memory_bytes: usize,
}

impl Default for WasmLimits {
    fn default() -> Self {
        Self {
            fuel: 1_000_000_000,
            max_memory_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Compiles WebAssembly plugins. One engine serves every module.
pub struct WasmRuntime {
    engine: Engine,
    limits: WasmLimits,
}

impl WasmRuntime {
    pub fn new(limits: WasmLimits) -> PluginResult<Self> {
        let mut config = Config::new();
        config.wasm_bulk_memory(true);
        config.consume_fuel(true);

        let engine = Engine::new(&config).map_err(|e| PluginError::Runtime(format!("{e:#}")))?;
        Ok(Self { engine, limits })
    }

    /// Compile `bytes` and read the tool's metadata from it.
    #[instrument(skip(self, bytes), fields(path = %path.display(), size = bytes.len()))]
    pub fn compile(&self, bytes: &[u8], path: &Path) -> PluginResult<WasmTool> {
        let module = Module::new(&self.engine, bytes)
            .map_err(|e| PluginError::invalid_module(path, format!("{e:#}")))?;

        let raw = Sandbox::new(&self.engine, &module, self.limits)
            .and_then(|mut sandbox| sandbox.metadata())
            .map_err(|e| PluginError::invalid_module(path, format!("{e:#}")))?;
        let metadata: WasmMetadata = serde_json::from_slice(&raw).map_err(|e| {
            PluginError::invalid_module(path, format!("metadata is not valid JSON: {e}"))
        })?;
        metadata
            .validate()
            .map_err(|message| PluginError::invalid_module(path, message))?;

        debug!("Compiled WebAssembly tool '{}'", metadata.name);
        Ok(WasmTool {
            metadata,
            engine: self.engine.clone(),
            module: RwLock::new(Some(module)),
            limits: self.limits,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmMetadata {
    name: String,
    category: String,
    description: String,

    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    input_schema: Option<Value>,
}

impl WasmMetadata {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("category", &self.category),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(format!("metadata field '{field}' is empty"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct WasmReply {
    #[serde(default)]
    result: Option<Value>,

    #[serde(default)]
    error: Option<String>,
}

struct SandboxState {
    limits: StoreLimits,
}

/// One instantiation of a module.
struct Sandbox {
    store: Store<SandboxState>,
    instance: Instance,
    memory: Memory,
}

impl Sandbox {
    fn new(engine: &Engine, module: &Module, limits: WasmLimits) -> anyhow::Result<Self> {
        let state = SandboxState {
            limits: StoreLimitsBuilder::new()
                .memory_size(limits.max_memory_bytes)
                .instances(1)
                .build(),
        };
        let mut store = Store::new(engine, state);
        store.limiter(|state| &mut state.limits);
        store.set_fuel(limits.fuel)?;

        let instance =
            Instance::new(&mut store, module, &[]).context("failed to instantiate module")?;
        let memory = instance
            .get_memory(&mut store, "memory")
            .context("module does not export 'memory'")?;

        Ok(Self {
            store,
            instance,
            memory,
        })
    }

    fn metadata(&mut self) -> anyhow::Result<Vec<u8>> {
        let metadata = self
            .instance
            .get_typed_func::<(), i64>(&mut self.store, "metadata")?;
        let packed = metadata.call(&mut self.store, ())?;
        self.read(packed)
    }

    fn execute(&mut self, request: &[u8]) -> anyhow::Result<Vec<u8>> {
        let len = i32::try_from(request.len()).context("request body is too large")?;
        let alloc = self
            .instance
            .get_typed_func::<i32, i32>(&mut self.store, "alloc")?;
        let execute = self
            .instance
            .get_typed_func::<(i32, i32), i64>(&mut self.store, "execute")?;

        let ptr = alloc.call(&mut self.store, len)?;
        self.memory
            .write(&mut self.store, ptr as u32 as usize, request)?;
        let packed = execute.call(&mut self.store, (ptr, len))?;
        self.read(packed)
    }

    /// Copy out the bytes a packed pointer refers to.
    fn read(&self, packed: i64) -> anyhow::Result<Vec<u8>> {
        let packed = packed as u64;
        let offset = (packed >> 32) as usize;
        let len = (packed & 0xffff_ffff) as usize;

        if offset.saturating_add(len) > self.memory.data_size(&self.store) {
            bail!("module returned a range outside its memory");
        }
        let mut buf = vec![0u8; len];
        self.memory.read(&self.store, offset, &mut buf)?;
        Ok(buf)
    }
}

/// A tool backed by a WebAssembly module.
pub struct WasmTool {
    metadata: WasmMetadata,
    engine: Engine,

    /// Released on `stop`.
    module: RwLock<Option<Module>>,
    limits: WasmLimits,
}

impl WasmTool {
    pub fn version(&self) -> &str {
        self.metadata.version.as_deref().unwrap_or("0.0.0")
    }
}

fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Trap>() {
        Some(Trap::OutOfFuel) => "Plugin exceeded its execution budget.".to_string(),
        _ => format!("Plugin failed: {err:#}"),
    }
}

impl Tool for WasmTool {
    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn category(&self) -> &str {
        &self.metadata.category
    }

    fn description(&self) -> &str {
        &self.metadata.description
    }

    fn input_schema(&self) -> Value {
        self.metadata
            .input_schema
            .clone()
            .unwrap_or_else(|| json!({ "type": "object" }))
    }

    #[instrument(skip_all, fields(tool = %self.metadata.name))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let Some(module) = self.module.read().clone() else {
            return Err(ToolError::execution_failed("Plugin has been unloaded."));
        };

        let request = serde_json::to_vec(input)?;
        let raw = Sandbox::new(&self.engine, &module, self.limits)
            .and_then(|mut sandbox| sandbox.execute(&request))
            .map_err(|e| ToolError::execution_failed(describe(&e)))?;

        let reply: WasmReply = serde_json::from_slice(&raw).map_err(|e| {
            ToolError::execution_failed(format!("Plugin returned invalid JSON: {e}"))
        })?;
        match reply.error {
            Some(error) => Err(ToolError::execution_failed(error)),
            None => Ok(reply.result.unwrap_or(Value::Null)),
        }
    }

    fn stop(&self) {
        if self.module.write().take().is_some() {
            info!("Released WebAssembly module of '{}'", self.metadata.name);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> WasmRuntime {
        WasmRuntime::new(WasmLimits::default()).unwrap()
    }

    fn compile(source: &str) -> PluginResult<WasmTool> {
        runtime().compile(source.as_bytes(), Path::new("echo.wasm"))
    }

    #[test]
    fn test_metadata_read_from_module() {
        let tool = compile(&fixtures::echo()).unwrap();
        assert_eq!(tool.name(), "Echo");
        assert_eq!(tool.slug(), "echo");
        assert_eq!(tool.category(), "Development");
        assert_eq!(tool.version(), "0.2.0");
        assert_eq!(tool.input_schema(), json!({ "type": "object" }));
    }

    #[test]
    fn test_execute_round_trips_json() {
        let tool = compile(&fixtures::echo()).unwrap();
        let input = json!({ "text": "hi", "n": [1, 2] });
        assert_eq!(tool.execute(&input).unwrap(), input);

        // A fresh instance per call: the bump allocator starts over.
        assert_eq!(tool.execute(&json!("again")).unwrap(), json!("again"));
    }

    #[test]
    fn test_module_error_becomes_tool_error() {
        let tool = compile(&fixtures::failing()).unwrap();
        let err = tool.execute(&json!({})).unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_fuel_bounds_runaway_modules() {
        let runtime = WasmRuntime::new(WasmLimits {
            fuel: 100_000,
            ..WasmLimits::default()
        })
        .unwrap();
        let tool = runtime
            .compile(fixtures::spinning().as_bytes(), Path::new("spin.wasm"))
            .unwrap();

        let err = tool.execute(&json!({})).unwrap_err();
        assert_eq!(err.message(), "Plugin exceeded its execution budget.");
    }

    #[test]
    fn test_stop_releases_module() {
        let tool = compile(&fixtures::echo()).unwrap();
        tool.stop();
        let err = tool.execute(&json!({})).unwrap_err();
        assert_eq!(err.message(), "Plugin has been unloaded.");
    }

    #[test]
    fn test_invalid_modules_rejected() {
        assert!(matches!(
            compile("not a module"),
            Err(PluginError::InvalidModule { .. })
        ));

        // Imports are never satisfied.
        let importing = r#"(module (import "env" "f" (func)) (memory (export "memory") 1))"#;
        assert!(matches!(compile(importing), Err(PluginError::InvalidModule { .. })));

        let no_metadata = r#"(module (memory (export "memory") 1))"#;
        assert!(matches!(compile(no_metadata), Err(PluginError::InvalidModule { .. })));

        let blank = fixtures::echo_with_metadata(r#"{"name":"","category":"X","description":"Y"}"#);
        assert!(matches!(compile(&blank), Err(PluginError::InvalidModule { .. })));
    }
}
