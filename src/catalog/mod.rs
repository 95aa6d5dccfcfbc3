//! Component catalog.
//!
//! The library is read-only once built. Components arrive either from the
//! backend (`GET /api/components`) or from the offline [`ComponentLibrary::builtin`]
//! set; in both cases each component's [`ComponentKind`] is resolved here.

mod builtin;
mod component;
mod template;

pub use component::{Component, ComponentKind, EvaluatorKind, ParamKind, ParamSpec, TaskFamily};
pub use template::{Template, TemplateNode, TemplateNodeData, TemplatePipeline};

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ComponentLibrary {
    components: Vec<Component>,
    index: HashMap<String, usize>,
    templates: Vec<Template>,
}

impl ComponentLibrary {
    pub fn new(components: Vec<Component>) -> Self {
        let mut library = Self::default();
        for mut component in components {
            if component.kind() == ComponentKind::Other {
                component.resolve_kind();
            }
            library
                .index
                .insert(component.id.clone(), library.components.len());
            library.components.push(component);
        }
        library
    }

    /// The offline catalog with starter templates.
    pub fn builtin() -> Self {
        Self::new(builtin::components()).with_templates(builtin::templates())
    }

    pub fn with_templates(mut self, templates: Vec<Template>) -> Self {
        self.templates = templates;
        self
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.index.get(id).map(|&i| &self.components[i])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn all(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&Component>)> {
        let mut groups: Vec<(&str, Vec<&Component>)> = Vec::new();
        for component in &self.components {
            match groups.iter_mut().find(|(cat, _)| *cat == component.category) {
                Some((_, members)) => members.push(component),
                None => groups.push((component.category.as_str(), vec![component])),
            }
        }
        groups
    }

    /// Case-insensitive match on name or description. Empty filter matches all.
    pub fn search(&self, filter: &str) -> Vec<&Component> {
        let needle = filter.trim().to_lowercase();
        self.components
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn icon_name(&self, id: &str) -> &'static str {
        self.get(id)
            .map(Component::icon_name)
            .unwrap_or_else(|| ComponentKind::Other.icon_name())
    }

    /// Role of the component behind `component_id`; unknown ids are `Other`.
    pub fn kind_of(&self, component_id: &str) -> ComponentKind {
        self.get(component_id)
            .map(Component::kind)
            .unwrap_or_else(|| ComponentKind::from_component_id(component_id))
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }
}
