//! Normalisation of score collections
//!
//! Multi-model comparisons accept scores in several shapes: a label to
//! scores mapping, nested vectors, a 2-D matrix with one model per row, or a
//! rank-2 [`ScoreTensor`]. Each is turned into a [`ScoreCollection`], an
//! ordered list of validated samples with one label per sample. Inputs
//! without labels get positional labels `"0"`, `"1"`, ...
//!
//! Statically typed callers go through [`IntoScoreCollection`]. Callers that
//! only hold a `&dyn Any` use a [`ConverterRegistry`], which dispatches on
//! the concrete `TypeId` and can be extended with new converters at runtime.

use aso_core::{Error, Result, Sample};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;

/// Canonical form of a collection of model scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreCollection")]
pub struct ScoreCollection {
    labels: Vec<String>,
    samples: Vec<Sample>,
}

#[derive(Deserialize)]
struct RawScoreCollection {
    labels: Vec<String>,
    samples: Vec<Sample>,
}

impl TryFrom<RawScoreCollection> for ScoreCollection {
    type Error = Error;

    fn try_from(raw: RawScoreCollection) -> Result<Self> {
        Self::new(raw.labels, raw.samples)
    }
}

impl ScoreCollection {
    /// Build a labelled collection of at least two groups
    pub fn new(labels: Vec<String>, samples: Vec<Sample>) -> Result<Self> {
        if labels.len() != samples.len() {
            return Err(Error::InvalidArgument(format!(
                "Got {} labels for {} score groups",
                labels.len(),
                samples.len()
            )));
        }
        if samples.len() < 2 {
            return Err(Error::too_few_groups(samples.len()));
        }
        Ok(Self { labels, samples })
    }

    /// Build from labelled raw score vectors, validating each group
    pub fn from_labelled<I, L>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, Vec<f64>)>,
        L: Into<String>,
    {
        let (labels, samples): (Vec<String>, Vec<Result<Sample>>) = groups
            .into_iter()
            .map(|(label, scores)| (label.into(), Sample::new(scores)))
            .unzip();
        let samples = samples.into_iter().collect::<Result<Vec<_>>>()?;
        Self::new(labels, samples)
    }

    /// Build from unlabelled groups; labels are positions
    pub fn from_groups<I>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        Self::from_labelled(
            groups
                .into_iter()
                .enumerate()
                .map(|(i, scores)| (i.to_string(), scores)),
        )
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed collection
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Group labels in order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Samples in order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at position `i`
    pub fn get(&self, i: usize) -> Option<&Sample> {
        self.samples.get(i)
    }

    /// Position of the group labelled `label`
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Iterate over `(label, sample)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sample)> {
        self.labels.iter().map(String::as_str).zip(self.samples.iter())
    }
}

/// Row-major rank-2 tensor of scores; row `i` holds model `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreTensor")]
pub struct ScoreTensor {
    data: Vec<f64>,
    shape: Vec<usize>,
}

#[derive(Deserialize)]
struct RawScoreTensor {
    data: Vec<f64>,
    shape: Vec<usize>,
}

impl TryFrom<RawScoreTensor> for ScoreTensor {
    type Error = Error;

    fn try_from(raw: RawScoreTensor) -> Result<Self> {
        Self::new(raw.data, raw.shape)
    }
}

impl ScoreTensor {
    /// Wrap flat `data` with the given `shape`
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        if shape.len() != 2 {
            return Err(Error::InvalidArgument(format!(
                "Score tensor must have rank 2, found shape {shape:?}"
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::InvalidArgument(format!(
                "Score tensor of shape {shape:?} needs {expected} values, {} found",
                data.len()
            )));
        }
        Ok(Self { data, shape })
    }

    /// Tensor shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat row-major data
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn rows(&self) -> Vec<Vec<f64>> {
        let width = self.shape[1];
        if width == 0 {
            return vec![Vec::new(); self.shape[0]];
        }
        self.data.chunks(width).map(<[f64]>::to_vec).collect()
    }
}

/// Conversion into a [`ScoreCollection`]
pub trait IntoScoreCollection {
    /// Normalise `self` into labelled samples
    fn into_score_collection(self) -> Result<ScoreCollection>;
}

impl IntoScoreCollection for ScoreCollection {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        Ok(self)
    }
}

impl IntoScoreCollection for &ScoreCollection {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        Ok(self.clone())
    }
}

impl IntoScoreCollection for Vec<Vec<f64>> {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        ScoreCollection::from_groups(self)
    }
}

impl IntoScoreCollection for &[Vec<f64>] {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        ScoreCollection::from_groups(self.iter().cloned())
    }
}

impl<L: Into<String>> IntoScoreCollection for Vec<(L, Vec<f64>)> {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        ScoreCollection::from_labelled(self)
    }
}

impl IntoScoreCollection for BTreeMap<String, Vec<f64>> {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        ScoreCollection::from_labelled(self)
    }
}

impl IntoScoreCollection for HashMap<String, Vec<f64>> {
    /// Groups are ordered by label so the result does not depend on hashing
    fn into_score_collection(self) -> Result<ScoreCollection> {
        let ordered: BTreeMap<String, Vec<f64>> = self.into_iter().collect();
        ordered.into_score_collection()
    }
}

impl IntoScoreCollection for DMatrix<f64> {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        (&self).into_score_collection()
    }
}

impl IntoScoreCollection for &DMatrix<f64> {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        ScoreCollection::from_groups(
            self.row_iter()
                .map(|row| row.iter().copied().collect::<Vec<f64>>()),
        )
    }
}

impl IntoScoreCollection for ScoreTensor {
    fn into_score_collection(self) -> Result<ScoreCollection> {
        ScoreCollection::from_groups(self.rows())
    }
}

/// Converter from one concrete representation to a [`ScoreCollection`]
pub trait ScoreConverter: Send + Sync {
    /// Convert `input`; fails with `UnsupportedType` if it is not the
    /// representation this converter handles
    fn convert(&self, input: &dyn Any) -> Result<ScoreCollection>;

    /// Name of the handled representation
    fn representation(&self) -> &'static str;
}

/// Converter backed by a closure over a concrete type
struct FnConverter<T, F> {
    convert: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> ScoreConverter for FnConverter<T, F>
where
    T: Any,
    F: Fn(&T) -> Result<ScoreCollection> + Send + Sync,
{
    fn convert(&self, input: &dyn Any) -> Result<ScoreCollection> {
        let value = input.downcast_ref::<T>().ok_or_else(|| {
            Error::UnsupportedType(format!("expected {}", type_name::<T>()))
        })?;
        (self.convert)(value)
    }

    fn representation(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Dispatch table from concrete input type to converter
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Box<dyn ScoreConverter>>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.converters.values().map(|c| c.representation()).collect();
        names.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("representations", &names)
            .finish()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConverterRegistry {
    /// Registry without any converter
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registry with converters for every built-in representation
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register::<ScoreCollection>();
        registry.register::<Vec<Vec<f64>>>();
        registry.register::<Vec<(String, Vec<f64>)>>();
        registry.register::<BTreeMap<String, Vec<f64>>>();
        registry.register::<HashMap<String, Vec<f64>>>();
        registry.register::<DMatrix<f64>>();
        registry.register::<ScoreTensor>();
        registry
    }

    /// Register a type that already knows how to convert itself
    pub fn register<T>(&mut self)
    where
        T: Any + Clone + IntoScoreCollection,
    {
        self.register_fn(|value: &T| value.clone().into_score_collection());
    }

    /// Register a conversion closure for `T`, replacing any previous one
    pub fn register_fn<T, F>(&mut self, convert: F)
    where
        T: Any,
        F: Fn(&T) -> Result<ScoreCollection> + Send + Sync + 'static,
    {
        self.converters.insert(
            TypeId::of::<T>(),
            Box::new(FnConverter {
                convert,
                _marker: PhantomData,
            }),
        );
    }

    /// Whether `T` has a registered converter
    pub fn supports<T: Any>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered representations
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Convert a type-erased input
    pub fn convert(&self, input: &dyn Any) -> Result<ScoreCollection> {
        match self.converters.get(&input.type_id()) {
            Some(converter) => converter.convert(input),
            None => Err(Error::UnsupportedType(
                "no converter registered for this score collection type".to_string(),
            )),
        }
    }

    /// Convert a typed input, naming the type on failure
    pub fn convert_value<T: Any>(&self, input: &T) -> Result<ScoreCollection> {
        match self.converters.get(&TypeId::of::<T>()) {
            Some(converter) => converter.convert(input),
            None => Err(Error::UnsupportedType(format!(
                "no converter registered for {}",
                type_name::<T>()
            ))),
        }
    }
}
