//! The immutable descriptor of a series, supplied once at writer construction.

use crate::value::{EncodingSpec, ScalarType};

/// Immutable descriptor of a series.
///
/// Never mutated after construction; a [`crate::writer::ChunkWriter`] holds
/// exactly one of these for its whole lifetime, across chunk reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementSchema {
    id: String,
    scalar_type: ScalarType,
    time_encoder_spec: EncodingSpec,
    value_encoder_spec: EncodingSpec,
}

impl MeasurementSchema {
    pub fn new(id: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            id: id.into(),
            scalar_type,
            time_encoder_spec: EncodingSpec::default(),
            value_encoder_spec: EncodingSpec::default(),
        }
    }

    pub fn with_time_encoder_spec(mut self, spec: EncodingSpec) -> Self {
        self.time_encoder_spec = spec;
        self
    }

    pub fn with_value_encoder_spec(mut self, spec: EncodingSpec) -> Self {
        self.value_encoder_spec = spec;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    pub fn time_encoder_spec(&self) -> EncodingSpec {
        self.time_encoder_spec
    }

    pub fn value_encoder_spec(&self) -> EncodingSpec {
        self.value_encoder_spec
    }
}
