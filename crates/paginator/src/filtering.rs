//! Value filters discovered from the current items
//!
//! For each configured attribute the filter keeps the distinct values seen
//! in the list, each with an on/off switch. An attribute with no switch on
//! does not constrain anything.

use crate::ordmap::OrderedMap;

#[derive(Debug, Clone, Default)]
pub struct Filtering {
    attributes: OrderedMap<String, OrderedMap<String, bool>>,
}

impl Filtering {
    pub fn new<I, A>(attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut filtering = Self::default();
        filtering.setup(attributes);
        filtering
    }

    /// Reset to a fixed set of attributes with no discovered values
    pub fn setup<I, A>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.attributes = OrderedMap::new();
        for attribute in attributes {
            self.attributes.set(attribute.into(), OrderedMap::new());
        }
    }

    /// Rebuild the discovered values from `items`
    ///
    /// Values that disappeared are dropped, surviving values keep their
    /// position and switch state, new values are appended switched off.
    pub fn classify<T>(&mut self, items: &[T], mut stringify: impl FnMut(&T, &str) -> String) {
        for (attribute, values) in self.attributes.iter_mut() {
            let mut seen: OrderedMap<String, ()> = OrderedMap::new();
            for item in items {
                seen.set(stringify(item, attribute), ());
            }

            values.retain(|value, _| seen.contains_key(value.as_str()));
            for value in seen.keys() {
                if !values.contains_key(value.as_str()) {
                    values.set(value.clone(), false);
                }
            }
        }
    }

    /// Flip the switch of one value
    ///
    /// Returns `false` when the attribute or the value is unknown.
    pub fn toggle(&mut self, attribute: &str, value: &str) -> bool {
        let Some(values) = self.attributes.get_mut(attribute) else {
            tracing::warn!("Filter attribute not configured: {}", attribute);
            return false;
        };
        match values.get_mut(value) {
            Some(enabled) => {
                *enabled = !*enabled;
                true
            }
            None => {
                tracing::debug!("Filter value {:?} not present for {}", value, attribute);
                false
            }
        }
    }

    /// Whether an item passes every attribute's filter
    pub fn keep<T>(&self, item: &T, mut stringify: impl FnMut(&T, &str) -> String) -> bool {
        self.attributes.iter().all(|(attribute, values)| {
            if !values.values().any(|enabled| *enabled) {
                return true;
            }
            let value = stringify(item, attribute);
            values.get(value.as_str()).copied().unwrap_or(false)
        })
    }

    pub fn is_enabled(&self, attribute: &str, value: &str) -> Option<bool> {
        self.attributes.get(attribute)?.get(value).copied()
    }

    /// Attributes with their discovered values, in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OrderedMap<String, bool>)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self, attribute: &str) -> Vec<(&str, bool)> {
        self.attributes
            .get(attribute)
            .map(|values| values.iter().map(|(v, e)| (v.as_str(), *e)).collect())
            .unwrap_or_default()
    }
}
