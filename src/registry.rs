/// Capability registry for optional subsystems.
///
/// The level predictor and the bulletin board can each fail to
/// initialize (missing training data, unreachable database) without
/// taking the core risk endpoints down. Each capability's startup
/// outcome is captured here: failures are reported at startup and on
/// /health, and handlers consult readiness before serving routes that
/// depend on a capability.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Capability state
// ---------------------------------------------------------------------------

/// Capability name for the river level regression.
pub const CAP_LEVEL_PREDICTOR: &str = "level_predictor";

/// Capability name for the bulletin board storage.
pub const CAP_BULLETIN_BOARD: &str = "bulletin_board";

/// One optional subsystem's initialization outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    pub name: &'static str,
    pub ready: bool,
    /// Human-readable detail: what was initialized, or why it failed.
    pub detail: String,
}

/// Registry of capability initialization outcomes, built once at startup.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
        }
    }

    /// Record a capability that initialized successfully.
    pub fn record_success(&mut self, name: &'static str, detail: impl Into<String>) {
        self.capabilities.push(Capability {
            name,
            ready: true,
            detail: detail.into(),
        });
    }

    /// Record a capability whose initialization failed. The failure is
    /// captured and reported; it never aborts startup.
    pub fn record_failure(&mut self, name: &'static str, detail: impl Into<String>) {
        self.capabilities.push(Capability {
            name,
            ready: false,
            detail: detail.into(),
        });
    }

    /// Whether a named capability initialized successfully.
    /// Unregistered names are not ready.
    pub fn is_ready(&self, name: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.name == name && c.ready)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    /// JSON report for the /health endpoint.
    pub fn report(&self) -> serde_json::Value {
        serde_json::to_value(&self.capabilities).unwrap_or_else(|_| serde_json::json!([]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
