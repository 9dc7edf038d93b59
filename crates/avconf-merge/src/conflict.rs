use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use avconf_types::fragment::display_name;
use avconf_types::{ConfigMap, ConfigValue, KeyPath};

/// A key path where an incoming fragment overwrote a value already present
/// in the working result (from the master or from an earlier fragment).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Conflict {
    /// The fragment whose value won.
    pub source: PathBuf,
    /// Where the collision happened.
    pub path: KeyPath,
    /// The value that was overwritten.
    pub existing: ConfigValue,
    /// The value that replaced it.
    pub incoming: ConfigValue,
}

impl Conflict {
    /// File name of the fragment that caused the conflict.
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_name(), self.path)
    }
}

/// The merged mapping plus every conflict found while producing it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub merged: ConfigMap,
    pub conflicts: Vec<Conflict>,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Human-readable conflict lines, `"<file name>: <dotted path>"`.
    pub fn conflict_messages(&self) -> Vec<String> {
        self.conflicts.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_file_name_and_dotted_path() {
        let c = Conflict {
            source: PathBuf::from("/r/params/nodes/lidar.yaml"),
            path: KeyPath::parse("lidar.rate"),
            existing: ConfigValue::from(10),
            incoming: ConfigValue::from(20),
        };
        assert_eq!(c.to_string(), "lidar.yaml: lidar.rate");
    }

    #[test]
    fn outcome_messages() {
        let outcome = MergeOutcome {
            merged: ConfigMap::new(),
            conflicts: vec![Conflict {
                source: PathBuf::from("a.yaml"),
                path: KeyPath::parse("x"),
                existing: ConfigValue::null(),
                incoming: ConfigValue::from(true),
            }],
        };
        assert!(outcome.has_conflicts());
        assert_eq!(outcome.conflict_messages(), vec!["a.yaml: x"]);
        assert!(!MergeOutcome::default().has_conflicts());
    }
}
