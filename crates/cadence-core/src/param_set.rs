//! The immutable parameter catalog.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ParamError;
use crate::param_info::ParamDescriptor;

/// Process-lifetime catalog of parameter descriptors.
///
/// Built once at startup with [`ParameterSet::new`], which rejects duplicate
/// ids, empty ids, malformed ranges and out-of-range defaults. Cloning is
/// cheap: clones share the same descriptor storage.
///
/// Iteration order is registration order.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    descriptors: Arc<[ParamDescriptor]>,
    index: Arc<HashMap<String, usize>>,
}

impl ParameterSet {
    /// Validates and freezes a list of descriptors.
    pub fn new(descriptors: Vec<ParamDescriptor>) -> Result<Self, ParamError> {
        let mut index = HashMap::with_capacity(descriptors.len());

        for (i, desc) in descriptors.iter().enumerate() {
            if desc.id.is_empty() {
                return Err(ParamError::EmptyId(desc.name.clone()));
            }
            desc.range.validate(&desc.id)?;
            if !desc.range.contains(desc.default) {
                return Err(ParamError::DefaultOutOfRange {
                    id: desc.id.clone(),
                    default: desc.default,
                    min: desc.range.min,
                    max: desc.range.max,
                });
            }
            if index.insert(desc.id.clone(), i).is_some() {
                return Err(ParamError::DuplicateId(desc.id.clone()));
            }
        }

        Ok(Self {
            descriptors: descriptors.into(),
            index: Arc::new(index),
        })
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Position of `id` in registration order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: &str) -> Option<&ParamDescriptor> {
        self.index_of(id).map(|i| &self.descriptors[i])
    }

    /// Descriptor at a registration index.
    pub fn get_index(&self, index: usize) -> Option<&ParamDescriptor> {
        self.descriptors.get(index)
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.descriptors.iter()
    }

    /// Iterates ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.id.as_str())
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a ParamDescriptor;
    type IntoIter = std::slice::Iter<'a, ParamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::ParamRange;

    fn desc(id: &str, default: f32) -> ParamDescriptor {
        ParamDescriptor::new(id, id.to_uppercase(), ParamRange::new(0.0, 1.0), default)
    }

    #[test]
    fn lookup_by_id_and_index() {
        let set = ParameterSet::new(vec![desc("a", 0.1), desc("b", 0.2)]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.index_of("b"), Some(1));
        assert_eq!(set.get("a").unwrap().default, 0.1);
        assert_eq!(set.get_index(1).unwrap().id, "b");
        assert!(set.get("c").is_none());
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ParameterSet::new(vec![desc("a", 0.0), desc("a", 0.5)]).unwrap_err();
        assert_eq!(err, ParamError::DuplicateId("a".to_string()));
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = ParameterSet::new(vec![desc("", 0.0)]).unwrap_err();
        assert!(matches!(err, ParamError::EmptyId(_)));
    }

    #[test]
    fn default_outside_range_is_rejected() {
        let err = ParameterSet::new(vec![desc("a", 2.0)]).unwrap_err();
        assert!(matches!(err, ParamError::DefaultOutOfRange { .. }));
    }

    #[test]
    fn clones_share_storage() {
        let set = ParameterSet::new(vec![desc("a", 0.0)]).unwrap();
        let other = set.clone();
        assert!(Arc::ptr_eq(&set.descriptors, &other.descriptors));
    }
}
