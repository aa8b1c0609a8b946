//! Measures and measurements

use std::sync::Arc;

/// Measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Seconds
    Seconds,
    /// Plain count
    Dimensionless,
}

impl Unit {
    /// UCUM symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Seconds => "s",
            Unit::Dimensionless => "1",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct MeasureInner {
    name: String,
    description: String,
    unit: Unit,
}

/// A named quantity that can be measured.
///
/// Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Measure(Arc<MeasureInner>);

impl Measure {
    /// Create a measure
    pub fn new(name: impl Into<String>, description: impl Into<String>, unit: Unit) -> Self {
        Measure(Arc::new(MeasureInner {
            name: name.into(),
            description: description.into(),
            unit,
        }))
    }

    /// Measure name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Measure description
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// Measure unit
    pub fn unit(&self) -> Unit {
        self.0.unit
    }

    /// Create a measurement of this measure
    pub fn m(&self, value: f64) -> Measurement {
        Measurement {
            measure: self.clone(),
            value,
        }
    }
}

/// One value of a measure
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    measure: Measure,
    value: f64,
}

impl Measurement {
    /// Measure this value belongs to
    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    /// Measured value
    pub fn value(&self) -> f64 {
        self.value
    }
}
