use log::*;
use std::collections::HashMap;

use crate::plugin::{LifecycleStage, Plugin};

/// Plugins in registration order, indexed by the stages they declare.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    stages: HashMap<LifecycleStage, Vec<usize>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        let index = self.plugins.len();
        let mut stages = plugin.stages();
        stages.sort();
        stages.dedup();

        debug!("registering plugin {} for {:?}", plugin.name(), stages);

        for stage in stages {
            self.stages.entry(stage).or_default().push(index);
        }

        self.plugins.push(plugin);
    }

    /// Plugins registered for `stage`, in registration order.
    pub fn for_stage(
        &self,
        stage: LifecycleStage,
    ) -> impl Iterator<Item = &dyn Plugin> {
        self.stages
            .get(&stage)
            .into_iter()
            .flatten()
            .map(|&i| self.plugins[i].as_ref())
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
