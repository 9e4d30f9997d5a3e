//! Vector of gauge functions sharing one metric family

use crate::error::{Error, RegisterError, Result};
use crate::gauge_func::GaugeFunc;
use crate::labels::{label_names, label_pairs, label_pairs_to_key, merge};
use parking_lot::RwLock;
use prometheus::core::{Collector, Desc};
use prometheus::proto::{LabelPair, MetricFamily, MetricType};
use prometheus::Opts;
use std::collections::HashMap;
use std::sync::Arc;

/// A [`Collector`] publishing one gauge per registered label combination.
///
/// Every combination is backed by its own read function, called each time the
/// vector is collected. Combinations can be added at any time, including from
/// inside a read function, and stay registered for the lifetime of the vector.
///
/// Read functions run on the scraping thread without a timeout: a slow
/// function delays the whole scrape.
///
/// Cloning is cheap and every clone shares the same entries, so one handle
/// can be registered with a [`prometheus::Registry`] while another keeps
/// registering functions.
#[derive(Clone)]
pub struct GaugeFuncVec {
    core: Arc<GaugeFuncVecCore>,
}

struct GaugeFuncVecCore {
    desc: Arc<Desc>,
    entries: RwLock<HashMap<String, Arc<GaugeFunc>>>,
    const_label_pairs: Vec<LabelPair>,
    label_names: Vec<String>,
}

impl GaugeFuncVec {
    /// Create a vector for the metric described by `opts`.
    ///
    /// `variable_label_names` are the labels every registration must supply;
    /// they replace `opts.variable_labels` and must not repeat any of
    /// `opts.const_labels`.
    pub fn new(opts: Opts, variable_label_names: &[&str]) -> Result<Self> {
        let variable_labels: Vec<String> =
            variable_label_names.iter().map(|s| s.to_string()).collect();

        if let Some(name) = variable_labels
            .iter()
            .find(|name| opts.const_labels.contains_key(name.as_str()))
        {
            return Err(Error::OverlappingLabels {
                variable_labels: variable_labels.clone(),
                name: name.clone(),
                const_labels: label_names(&opts.const_labels),
            });
        }

        let const_label_pairs = label_pairs(&opts.const_labels);
        let desc = Desc::new(
            opts.fq_name(),
            opts.help,
            variable_labels.clone(),
            opts.const_labels,
        )?;

        tracing::debug!(
            metric = %desc.fq_name,
            variable_labels = ?variable_labels,
            "created gauge func vector"
        );

        Ok(Self {
            core: Arc::new(GaugeFuncVecCore {
                desc: Arc::new(desc),
                entries: RwLock::new(HashMap::new()),
                const_label_pairs,
                label_names: variable_labels,
            }),
        })
    }

    /// Register `function` as the value source for `labels`.
    ///
    /// Checks run in order and the first failure is returned: label count,
    /// constant label override, missing declared label, duplicate
    /// combination. A wrong count is always reported as such, whatever else
    /// is wrong with the set.
    pub fn register<F>(
        &self,
        labels: &HashMap<&str, &str>,
        function: F,
    ) -> std::result::Result<(), RegisterError>
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        let core = &self.core;
        let mut entries = core.entries.write();

        if labels.len() != core.label_names.len() {
            return Err(RegisterError::UnexpectedLabelCount {
                expected: core.label_names.clone(),
                got: label_names(labels),
            });
        }

        if let Some(pair) = core
            .const_label_pairs
            .iter()
            .find(|pair| labels.contains_key(pair.get_name()))
        {
            return Err(RegisterError::ConstLabelOverride {
                name: pair.get_name().to_string(),
                const_labels: label_pairs_to_key(&core.const_label_pairs),
            });
        }

        if let Some(name) = core
            .label_names
            .iter()
            .find(|name| !labels.contains_key(name.as_str()))
        {
            return Err(RegisterError::MissingLabel {
                name: name.clone(),
                expected: core.label_names.clone(),
                got: label_names(labels),
            });
        }

        let pairs = merge(&core.const_label_pairs, labels);
        let key = label_pairs_to_key(&pairs);
        if entries.contains_key(&key) {
            return Err(RegisterError::Duplicate { key });
        }

        tracing::debug!(metric = %core.desc.fq_name, labels = %key, "registered gauge func");

        let gauge = GaugeFunc::new(core.desc.clone(), pairs, Box::new(function));
        entries.insert(key, Arc::new(gauge));
        Ok(())
    }

    /// Like [`register`](Self::register), but panics if the labels are refused.
    ///
    /// Meant for registrations done once at startup where a bad label set is
    /// a programming error.
    pub fn must_register<F>(&self, labels: &HashMap<&str, &str>, function: F)
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        if let Err(err) = self.register(labels, function) {
            panic!("{err}");
        }
    }

    /// Snapshot of the registered entries, in no particular order.
    ///
    /// The lock is released before this returns, so read functions can be
    /// evaluated (and can register new entries) while iterating.
    pub fn entries(&self) -> impl Iterator<Item = Arc<GaugeFunc>> {
        let snapshot: Vec<Arc<GaugeFunc>> = self.core.entries.read().values().cloned().collect();
        snapshot.into_iter()
    }

    /// Descriptor shared by every entry
    pub fn desc(&self) -> &Desc {
        &self.core.desc
    }

    /// Number of registered label combinations
    pub fn len(&self) -> usize {
        self.core.entries.read().len()
    }

    /// Whether nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Collector for GaugeFuncVec {
    fn desc(&self) -> Vec<&Desc> {
        vec![self.core.desc.as_ref()]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let metrics: Vec<_> = self.entries().map(|gauge| gauge.metric()).collect();
        tracing::trace!(metric = %self.core.desc.fq_name, series = metrics.len(), "collected gauge funcs");

        let mut family = MetricFamily::default();
        family.set_name(self.core.desc.fq_name.clone());
        family.set_help(self.core.desc.help.clone());
        family.set_field_type(MetricType::GAUGE);
        family.set_metric(metrics.into());
        vec![family]
    }
}

impl std::fmt::Debug for GaugeFuncVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaugeFuncVec")
            .field("fq_name", &self.core.desc.fq_name)
            .field("label_names", &self.core.label_names)
            .field("entries", &self.len())
            .finish()
    }
}
