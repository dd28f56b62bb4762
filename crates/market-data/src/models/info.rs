use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely-typed ticker metadata as returned by a provider.
///
/// Keys follow the provider's own naming (`longName`, `marketCap`,
/// `companyOfficers`, ...). Values are plain JSON; `null` is never stored, so
/// a present key always carries data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerInfo(Map<String, Value>);

impl TickerInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unless the key is already populated. `null` is dropped.
    ///
    /// Returns true if the value was stored.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: Value) -> bool {
        if value.is_null() {
            return false;
        }
        let key = key.into();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for TickerInfo {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut info = TickerInfo::new();
        for (key, value) in iter {
            info.insert_if_absent(key, value);
        }
        info
    }
}
