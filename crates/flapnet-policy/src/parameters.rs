//! Named tensors describing the trainable state of a network.
//!
//! A [`Parameters`] value is an ordered list of [`Tensor`]s (weight matrices and
//! bias vectors). Every network shares the same names and shapes, which is what
//! lets the genetic operators combine two networks tensor by tensor.
//!
//! Tensor shapes cannot change through the public API: mutable access hands
//! out only the fixed-length value slices, never the tensors themselves. The
//! only way to introduce a different shape is to build or deserialize a new
//! value, which
//! [`PolicyNetwork::import_parameters`](crate::PolicyNetwork::import_parameters)
//! validates.

use std::slice;

use serde::{Deserialize, Serialize};

/// Error raised when tensors do not match the expected layout.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParameterShapeError {
    #[display("expected {expected} tensors, got {actual}")]
    TensorCount { expected: usize, actual: usize },
    #[display("tensor #{index}: expected name `{expected}`, got `{actual}`")]
    Name {
        index: usize,
        expected: String,
        actual: String,
    },
    #[display("tensor `{name}`: expected shape {expected:?}, got {actual:?}")]
    Shape {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[display("tensor `{name}`: shape {shape:?} needs {expected} values, got {actual}")]
    ValueCount {
        name: String,
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[display("tensor `{name}` contains non-finite values")]
    NonFinite { name: String },
}

/// A named, row-major block of `f32` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    name: String,
    shape: Vec<usize>,
    values: Vec<f32>,
}

impl Tensor {
    /// Creates a tensor, checking that `values` fills `shape` exactly.
    pub fn new(
        name: impl Into<String>,
        shape: Vec<usize>,
        values: Vec<f32>,
    ) -> Result<Self, ParameterShapeError> {
        let name = name.into();
        let expected = shape.iter().product();
        if values.len() != expected {
            return Err(ParameterShapeError::ValueCount {
                name,
                shape,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            name,
            shape,
            values,
        })
    }

    /// Creates a tensor whose values are produced by `f`, in row-major order.
    pub fn from_fn<F>(name: impl Into<String>, shape: Vec<usize>, f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        let len = shape.iter().product();
        Self {
            name: name.into(),
            shape,
            values: (0..len).map(f).collect(),
        }
    }

    /// Creates a tensor with every element set to `value`.
    pub fn filled(name: impl Into<String>, shape: Vec<usize>, value: f32) -> Self {
        Self::from_fn(name, shape, |_| value)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check_consistent(&self) -> Result<(), ParameterShapeError> {
        let expected = self.shape.iter().product();
        if self.values.len() != expected {
            return Err(ParameterShapeError::ValueCount {
                name: self.name.clone(),
                shape: self.shape.clone(),
                expected,
                actual: self.values.len(),
            });
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(ParameterShapeError::NonFinite {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered set of named tensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    tensors: Vec<Tensor>,
}

impl Parameters {
    #[must_use]
    pub fn new(tensors: Vec<Tensor>) -> Self {
        Self { tensors }
    }

    pub fn iter(&self) -> slice::Iter<'_, Tensor> {
        self.tensors.iter()
    }

    /// Mutable value slices, one per tensor, in order.
    pub fn values_mut_iter(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.tensors.iter_mut().map(Tensor::values_mut)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Tensor] {
        &self.tensors
    }

    /// Number of tensors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Total number of scalar values across all tensors.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.tensors.iter().map(Tensor::len).sum()
    }

    /// Checks that `self` has exactly the names and shapes of `layout`, and that
    /// every value is finite.
    pub fn check_layout(&self, layout: &[(String, Vec<usize>)]) -> Result<(), ParameterShapeError> {
        if self.tensors.len() != layout.len() {
            return Err(ParameterShapeError::TensorCount {
                expected: layout.len(),
                actual: self.tensors.len(),
            });
        }
        for (index, (tensor, (name, shape))) in self.tensors.iter().zip(layout).enumerate() {
            if tensor.name != *name {
                return Err(ParameterShapeError::Name {
                    index,
                    expected: name.clone(),
                    actual: tensor.name.clone(),
                });
            }
            if tensor.shape != *shape {
                return Err(ParameterShapeError::Shape {
                    name: name.clone(),
                    expected: shape.clone(),
                    actual: tensor.shape.clone(),
                });
            }
            tensor.check_consistent()?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Tensor;
    type IntoIter = slice::Iter<'a, Tensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Vec<(String, Vec<usize>)> {
        vec![("w".to_owned(), vec![2, 3]), ("b".to_owned(), vec![2])]
    }

    fn sample() -> Parameters {
        Parameters::new(vec![
            Tensor::from_fn("w", vec![2, 3], |i| i as f32),
            Tensor::filled("b", vec![2], 0.5),
        ])
    }

    #[test]
    fn test_tensor_new_checks_value_count() {
        assert!(Tensor::new("w", vec![2, 2], vec![0.0; 4]).is_ok());
        let err = Tensor::new("w", vec![2, 2], vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            ParameterShapeError::ValueCount {
                name: "w".to_owned(),
                shape: vec![2, 2],
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_value_count_and_lookup() {
        let params = sample();
        assert_eq!(params.len(), 2);
        assert_eq!(params.value_count(), 8);
        assert_eq!(params.get("w").unwrap().values()[5], 5.0);
        assert!(params.get("missing").is_none());
    }

    #[test]
    fn test_check_layout_accepts_matching() {
        sample().check_layout(&layout()).unwrap();
    }

    #[test]
    fn test_check_layout_rejects_mismatches() {
        let short = Parameters::new(vec![Tensor::filled("w", vec![2, 3], 0.0)]);
        assert!(matches!(
            short.check_layout(&layout()),
            Err(ParameterShapeError::TensorCount {
                expected: 2,
                actual: 1
            })
        ));

        let renamed = Parameters::new(vec![
            Tensor::filled("w", vec![2, 3], 0.0),
            Tensor::filled("bias", vec![2], 0.0),
        ]);
        assert!(matches!(
            renamed.check_layout(&layout()),
            Err(ParameterShapeError::Name { index: 1, .. })
        ));

        let reshaped = Parameters::new(vec![
            Tensor::filled("w", vec![3, 2], 0.0),
            Tensor::filled("b", vec![2], 0.0),
        ]);
        assert!(matches!(
            reshaped.check_layout(&layout()),
            Err(ParameterShapeError::Shape { .. })
        ));

        let mut poisoned = sample();
        poisoned.values_mut_iter().next().unwrap()[0] = f32::NAN;
        assert!(matches!(
            poisoned.check_layout(&layout()),
            Err(ParameterShapeError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_mutable_access_keeps_layout() {
        let mut params = sample();
        for values in params.values_mut_iter() {
            values.fill(1.5);
        }
        params.check_layout(&layout()).unwrap();
        assert!(params.iter().all(|t| t.values().iter().all(|v| *v == 1.5)));
        assert_eq!(params.value_count(), 8);
    }

    #[test]
    fn test_deserialized_value_count_is_checked() {
        let json = r#"[{"name":"w","shape":[2,3],"values":[1.0]},{"name":"b","shape":[2],"values":[0.0,0.0]}]"#;
        let params: Parameters = serde_json::from_str(json).unwrap();
        assert!(matches!(
            params.check_layout(&layout()),
            Err(ParameterShapeError::ValueCount { expected: 6, actual: 1, .. })
        ));
    }
}
