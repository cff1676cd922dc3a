use crate::error::{Result, VigilError};
use crate::metrics::Descriptor;

/// Label pairs of one series, in the descriptor's declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    pub(crate) fn from_key(names: &[String], values: &[String]) -> Self {
        Self {
            pairs: names.iter().cloned().zip(values.iter().cloned()).collect(),
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when every `(name, value)` in `expected` is present.
    pub fn matches(&self, expected: &[(&str, &str)]) -> bool {
        expected.iter().all(|(k, v)| self.get(k) == Some(*v))
    }
}

/// Resolve caller-supplied pairs into the series key (values in declared order).
///
/// Pairs may come in any order but must name exactly the declared labels, each once.
pub(crate) fn resolve_key(desc: &Descriptor, labels: &[(&str, &str)]) -> Result<Vec<String>> {
    let declared = desc.label_names();
    let mismatch = || VigilError::LabelMismatch {
        metric: desc.name().to_string(),
        expected: declared.to_vec(),
        got: labels.iter().map(|(k, _)| (*k).to_string()).collect(),
    };

    if labels.len() != declared.len() {
        return Err(mismatch());
    }

    let mut key = Vec::with_capacity(declared.len());
    for name in declared {
        let mut found = labels.iter().filter(|(k, _)| *k == name.as_str());
        match (found.next(), found.next()) {
            (Some((_, v)), None) => key.push((*v).to_string()),
            _ => return Err(mismatch()),
        }
    }
    Ok(key)
}
