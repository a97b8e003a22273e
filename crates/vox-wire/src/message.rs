//! Typed bodies carried over the framing.

use serde::{Deserialize, Serialize};

// ── Worker control channel ───────────────────────────────────────────

/// Requests sent to the out-of-process NLU worker.
///
/// Serialized as `{"request": "<verb>", ...parameters}`. Responses are
/// matched by arrival order, not by ID: callers must keep at most one
/// response-bearing request in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum WorkerRequest {
    /// Register one intent definition file. Fire-and-forget.
    RegisterIntent { name: String, file_name: String },

    /// Compile the model from everything registered so far.
    /// Fire-and-forget; sent once after all registrations.
    Train,

    /// Score an utterance. The worker replies with a JSON object
    /// mapping namespaced identifiers to `{confidence, matches, ...}`.
    CalcIntents { query: String },
}

impl WorkerRequest {
    /// The wire verb, used in timeout diagnostics.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::RegisterIntent { .. } => "register_intent",
            Self::Train => "train",
            Self::CalcIntents { .. } => "calc_intents",
        }
    }
}

// ── Wake-word notifier channel ───────────────────────────────────────

/// Body sent by the wake-word notifier over the same framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeMessage {
    pub detect: WakeDetection,
}

/// One wake-word detection event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeDetection {
    /// The phrase that was detected.
    pub phrase: String,

    /// Direction of arrival, degrees.
    pub azimuth: f64,

    /// Notifier-local timestamp string.
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shape() {
        let req = WorkerRequest::RegisterIntent {
            name: "TimeSkill:time.ask".into(),
            file_name: "/skills/time_skill/vocab/en-us/time.ask.intent".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["request"], "register_intent");
        assert_eq!(value["name"], "TimeSkill:time.ask");

        let train = serde_json::to_value(WorkerRequest::Train).unwrap();
        assert_eq!(train, json!({"request": "train"}));

        let calc = serde_json::to_value(WorkerRequest::CalcIntents {
            query: "what time is it".into(),
        })
        .unwrap();
        assert_eq!(calc["request"], "calc_intents");
        assert_eq!(calc["query"], "what time is it");
    }

    #[test]
    fn wake_message_shape() {
        let value = json!({
            "detect": {"phrase": "hey vox", "azimuth": 42.5, "time": "12:03:11"}
        });
        let msg: WakeMessage = serde_json::from_value(value).unwrap();
        assert_eq!(msg.detect.phrase, "hey vox");
        assert_eq!(msg.detect.azimuth, 42.5);
    }
}
