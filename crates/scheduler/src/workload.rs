// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Workload kinds and the degradation registry.
//!
//! Every submitted task carries a [`WorkloadKind`] so telemetry and queue
//! snapshots can be sliced per engine family. The [`WorkloadRegistry`] is a
//! separate, name-keyed map consulted by collaborators (a tool registry,
//! a session manager) to decide what to drop first under reduced
//! quality-of-service; the supervisor stores the mapping but never acts on
//! it directly.

use crate::SchedulerError;
use std::collections::BTreeMap;

/// The engine family a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkloadKind {
    /// Autoregressive text generation (chat turns, completions).
    TextGeneration,
    /// Image understanding and captioning.
    VisionDescription,
    /// Audio to text transcription.
    SpeechTranscription,
    /// Embedding computation for retrieval.
    Embedding,
    /// Housekeeping work (cache warm-up, index compaction).
    Maintenance,
}

impl WorkloadKind {
    /// All workload kinds, in display order.
    pub const ALL: [WorkloadKind; 5] = [
        WorkloadKind::TextGeneration,
        WorkloadKind::VisionDescription,
        WorkloadKind::SpeechTranscription,
        WorkloadKind::Embedding,
        WorkloadKind::Maintenance,
    ];

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextGeneration => "text-generation",
            Self::VisionDescription => "vision-description",
            Self::SpeechTranscription => "speech-transcription",
            Self::Embedding => "embedding",
            Self::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkloadKind {
    type Err = SchedulerError;

    /// Parses a workload kind from its label.
    ///
    /// Accepts kebab-case labels and common aliases (`"text"`, `"vision"`,
    /// `"speech"`, `"embed"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text-generation" | "text_generation" | "text" => Ok(Self::TextGeneration),
            "vision-description" | "vision_description" | "vision" => Ok(Self::VisionDescription),
            "speech-transcription" | "speech_transcription" | "speech" => {
                Ok(Self::SpeechTranscription)
            }
            "embedding" | "embed" => Ok(Self::Embedding),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(SchedulerError::UnknownWorkload {
                input: other.to_string(),
            }),
        }
    }
}

/// How readily a workload may be degraded under pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradationPriority {
    /// Drop early; the user barely notices (prefetch, background indexing).
    Low,
    /// Keep alive as long as possible (the active chat turn).
    High,
}

impl std::fmt::Display for DegradationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::High => f.write_str("high"),
        }
    }
}

/// Name-keyed map from workload identifier to degradation priority.
#[derive(Debug, Clone, Default)]
pub struct WorkloadRegistry {
    entries: BTreeMap<String, DegradationPriority>,
}

impl WorkloadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a workload, returning the previous priority if the name
    /// was already present.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        priority: DegradationPriority,
    ) -> Option<DegradationPriority> {
        self.entries.insert(name.into(), priority)
    }

    /// Removes a workload, returning its priority if it was registered.
    pub fn unregister(&mut self, name: &str) -> Option<DegradationPriority> {
        self.entries.remove(name)
    }

    /// Looks up the degradation priority for a workload name.
    pub fn degradation_for(&self, name: &str) -> Option<DegradationPriority> {
        self.entries.get(name).copied()
    }

    /// Number of registered workloads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, priority)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DegradationPriority)> {
        self.entries.iter().map(|(name, &p)| (name.as_str(), p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_workload_labels() {
        assert_eq!(WorkloadKind::TextGeneration.as_str(), "text-generation");
        assert_eq!(format!("{}", WorkloadKind::Embedding), "embedding");
        assert_eq!(WorkloadKind::ALL.len(), 5);
    }

    #[test]
    fn test_workload_from_str() {
        assert_eq!(
            WorkloadKind::from_str("text-generation").unwrap(),
            WorkloadKind::TextGeneration
        );
        assert_eq!(
            WorkloadKind::from_str("  SPEECH  ").unwrap(),
            WorkloadKind::SpeechTranscription
        );
        assert_eq!(
            WorkloadKind::from_str("embed").unwrap(),
            WorkloadKind::Embedding
        );
        assert!(WorkloadKind::from_str("juggling").is_err());
    }

    #[test]
    fn test_workload_serde_kebab_case() {
        let json = serde_json::to_string(&WorkloadKind::VisionDescription).unwrap();
        assert_eq!(json, "\"vision-description\"");
        let back: WorkloadKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WorkloadKind::VisionDescription);
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let mut reg = WorkloadRegistry::new();
        assert!(reg.is_empty());

        assert_eq!(reg.register("summarizer", DegradationPriority::Low), None);
        assert_eq!(reg.register("chat", DegradationPriority::High), None);
        assert_eq!(reg.len(), 2);

        assert_eq!(
            reg.degradation_for("summarizer"),
            Some(DegradationPriority::Low)
        );
        assert_eq!(reg.degradation_for("nope"), None);

        // Re-registering reports the previous priority.
        assert_eq!(
            reg.register("chat", DegradationPriority::Low),
            Some(DegradationPriority::High)
        );
    }

    #[test]
    fn test_registry_unregister() {
        let mut reg = WorkloadRegistry::new();
        reg.register("prefetch", DegradationPriority::Low);
        assert_eq!(
            reg.unregister("prefetch"),
            Some(DegradationPriority::Low)
        );
        assert_eq!(reg.unregister("prefetch"), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_registry_iter_is_name_ordered() {
        let mut reg = WorkloadRegistry::new();
        reg.register("zeta", DegradationPriority::Low);
        reg.register("alpha", DegradationPriority::High);
        let names: Vec<&str> = reg.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
