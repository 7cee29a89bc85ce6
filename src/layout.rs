//! Named variable layout of a knot-point vector.
//!
//! Components are packed in insertion order. The timestep is either a fixed
//! scalar shared by every knot point, or a named length-one component.

use std::ops::Range;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimestepSpec {
    Fixed(f64),
    Variable(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryLayout {
    components: Vec<(String, Range<usize>)>,
    dim: usize,
    timestep: TimestepSpec,
}

impl TrajectoryLayout {
    pub fn new(timestep: TimestepSpec) -> Self {
        Self { components: Vec::new(), dim: 0, timestep }
    }

    /// Appends a component of length `len`
    pub fn with_component(mut self, name: &str, len: usize) -> Result<Self> {
        if self.components.iter().any(|(n, _)| n == name) {
            return Err(Error::DuplicateComponent(name.to_owned()));
        }
        self.components.push((name.to_owned(), self.dim..self.dim + len));
        self.dim += len;
        Ok(self)
    }

    /// Total knot-point dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn timestep(&self) -> &TimestepSpec {
        &self.timestep
    }

    pub fn names(&self) -> impl Iterator<Item=&str> {
        self.components.iter().map(|(n, _)| n.as_str())
    }

    pub fn range(&self, name: &str) -> Result<Range<usize>> {
        self.components.iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| Error::UnknownComponent(name.to_owned()))
    }

    pub fn component(&self, name: &str) -> Result<Vec<usize>> {
        Ok(self.range(name)?.collect())
    }

    /// Index of the timestep within a knot point, if the timestep is a variable
    pub fn timestep_index(&self) -> Result<Option<usize>> {
        match &self.timestep {
            TimestepSpec::Fixed(_) => Ok(None),
            TimestepSpec::Variable(name) => {
                let r = self.range(name)?;
                if r.len() != 1 {
                    return Err(Error::TimestepComponent(name.clone()));
                }
                Ok(Some(r.start))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_packing() {
        let layout = TrajectoryLayout::new(TimestepSpec::Variable("dt".into()))
            .with_component("psi", 4).unwrap()
            .with_component("a", 2).unwrap()
            .with_component("dt", 1).unwrap();
        assert_eq!(layout.dim(), 7);
        assert_eq!(layout.component("a").unwrap(), vec![4, 5]);
        assert_eq!(layout.timestep_index().unwrap(), Some(6));
        assert_eq!(layout.names().collect::<Vec<_>>(), vec!["psi", "a", "dt"]);
        assert_eq!(layout.component("u").unwrap_err(), Error::UnknownComponent("u".into()));
    }

    #[test]
    fn test_layout_errors() {
        let layout = TrajectoryLayout::new(TimestepSpec::Variable("dt".into()))
            .with_component("dt", 2).unwrap();
        assert_eq!(layout.timestep_index().unwrap_err(), Error::TimestepComponent("dt".into()));
        assert_eq!(layout.with_component("dt", 1).unwrap_err(),
                   Error::DuplicateComponent("dt".into()));

        let fixed = TrajectoryLayout::new(TimestepSpec::Fixed(0.1));
        assert_eq!(fixed.timestep_index().unwrap(), None);
    }
}
