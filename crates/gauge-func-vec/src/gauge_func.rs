//! A single lazily evaluated gauge

use prometheus::core::Desc;
use prometheus::proto::{Gauge, LabelPair, Metric};
use std::fmt;
use std::sync::Arc;

/// Read function backing a gauge
pub type ValueFn = Box<dyn Fn() -> f64 + Send + Sync>;

/// One registered label combination and the function that reads its value.
///
/// Entries are immutable once created, so they are safe to use without the
/// vector's lock.
pub struct GaugeFunc {
    desc: Arc<Desc>,
    label_pairs: Vec<LabelPair>,
    function: ValueFn,
}

impl GaugeFunc {
    pub(crate) fn new(desc: Arc<Desc>, label_pairs: Vec<LabelPair>, function: ValueFn) -> Self {
        Self {
            desc,
            label_pairs,
            function,
        }
    }

    /// Descriptor shared with the owning vector
    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    /// Constant and variable label pairs, sorted by name
    pub fn label_pairs(&self) -> &[LabelPair] {
        &self.label_pairs
    }

    /// Call the read function now.
    ///
    /// Nothing is cached: a panic or a hang inside the function reaches the
    /// caller unchanged.
    pub fn current_value(&self) -> f64 {
        (self.function)()
    }

    /// Materialize the entry as a gauge sample
    pub fn metric(&self) -> Metric {
        let mut gauge = Gauge::default();
        gauge.set_value(self.current_value());

        let mut metric = Metric::default();
        metric.set_label(self.label_pairs.clone().into());
        metric.set_gauge(gauge);
        metric
    }
}

impl fmt::Debug for GaugeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaugeFunc")
            .field("fq_name", &self.desc.fq_name)
            .field("label_pairs", &self.label_pairs)
            .finish_non_exhaustive()
    }
}
