use serde::{Deserialize, Serialize};

/// Result of one health poll. Recomputed every cycle, never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServiceHealth {
    pub reachable: bool,
    pub browser_ready: bool,
}

impl ServiceHealth {
    pub fn disconnected() -> Self {
        Self::default()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Firefox,
    Chrome,
    Edge,
}

impl BrowserEngine {
    pub const ALL: [BrowserEngine; 3] =
        [BrowserEngine::Firefox, BrowserEngine::Chrome, BrowserEngine::Edge];

    pub fn as_str(self) -> &'static str {
        match self {
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Chrome => "chrome",
            BrowserEngine::Edge => "edge",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BrowserEngine::Firefox => "Firefox",
            BrowserEngine::Chrome => "Chrome",
            BrowserEngine::Edge => "Edge",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "chrome" => BrowserEngine::Chrome,
            "edge" => BrowserEngine::Edge,
            _ => BrowserEngine::Firefox,
        }
    }
}

impl Default for BrowserEngine {
    fn default() -> Self {
        BrowserEngine::Firefox
    }
}

/// One looked-up product: an open field-name -> value mapping in wire order.
/// serde_json is built with `preserve_order`, so iteration order is the order
/// the service emitted the fields in.
pub type ResultRecord = serde_json::Map<String, serde_json::Value>;

/// Flattens a JSON scalar into the string shown in a table cell or exported
/// to a worksheet. Missing fields and null render empty.
pub fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// In-flight request flags. Only the UI event loop writes these.
#[derive(Clone, Copy, Debug, Default)]
pub struct Busy {
    pub initializing: bool,
    pub querying: bool,
}

/// What the initialize control should say in its current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitLabel {
    NotConnected,
    Initialize,
    Reinitialize,
}

/// Enabled/disabled/labelled states for the controls, derived purely from
/// `(ServiceHealth, Busy)`. The two health flags mutate only through monitor
/// polls and initialize/query completions; nothing else feeds this table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affordances {
    pub init_enabled: bool,
    pub init_label: InitLabel,
    pub engine_select_enabled: bool,
    pub query_enabled: bool,
}

impl Affordances {
    pub fn derive(health: ServiceHealth, busy: Busy) -> Self {
        let base = match (health.reachable, health.browser_ready) {
            (false, _) => Affordances {
                init_enabled: false,
                init_label: InitLabel::NotConnected,
                engine_select_enabled: false,
                query_enabled: false,
            },
            (true, false) => Affordances {
                init_enabled: true,
                init_label: InitLabel::Initialize,
                engine_select_enabled: true,
                query_enabled: false,
            },
            (true, true) => Affordances {
                init_enabled: true,
                init_label: InitLabel::Reinitialize,
                engine_select_enabled: true,
                query_enabled: true,
            },
        };

        Affordances {
            init_enabled: base.init_enabled && !busy.initializing,
            query_enabled: base.query_enabled && !busy.querying && !busy.initializing,
            ..base
        }
    }
}
