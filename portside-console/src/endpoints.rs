//! Multi-endpoint selector
//!
//! Presentational helpers for picking several endpoints at once: endpoints
//! are listed under their group, and only groups that actually contain one
//! of the offered endpoints are shown.

use portside_common::endpoint::{Endpoint, EndpointGroup, Tag};

pub struct MultiEndpointSelector {
    endpoints: Vec<Endpoint>,
    groups: Vec<EndpointGroup>,
    tags: Vec<Tag>,
    available_groups: Vec<EndpointGroup>,
}

impl MultiEndpointSelector {
    pub fn new(endpoints: Vec<Endpoint>, groups: Vec<EndpointGroup>, tags: Vec<Tag>) -> Self {
        let mut selector = Self {
            endpoints,
            groups,
            tags,
            available_groups: Vec::new(),
        };
        selector.on_init();
        selector
    }

    pub fn on_init(&mut self) {
        self.available_groups = filter_empty_groups(&self.groups, &self.endpoints);
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Groups holding at least one endpoint, in their original order
    pub fn available_groups(&self) -> &[EndpointGroup] {
        &self.available_groups
    }

    /// Stable sort by group name
    pub fn sort_groups(groups: &[EndpointGroup]) -> Vec<EndpointGroup> {
        let mut sorted = groups.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Name of the available group the endpoint belongs to
    pub fn group_endpoints(&self, endpoint: &Endpoint) -> Option<&str> {
        self.available_groups
            .iter()
            .find(|group| group.id == endpoint.group_id)
            .map(|group| group.name.as_str())
    }

    /// Resolve tag ids to names, keeping order. Unknown ids become "".
    pub fn tag_ids_to_tag_names(&self, tag_ids: &[u32]) -> Vec<String> {
        tag_ids
            .iter()
            .map(|id| {
                self.tags
                    .iter()
                    .find(|tag| tag.id == *id)
                    .map(|tag| tag.name.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Available groups sorted by name, each with its endpoints
    pub fn grouped(&self) -> Vec<(EndpointGroup, Vec<&Endpoint>)> {
        Self::sort_groups(&self.available_groups)
            .into_iter()
            .map(|group| {
                let members = self
                    .endpoints
                    .iter()
                    .filter(|endpoint| endpoint.group_id == group.id)
                    .collect();
                (group, members)
            })
            .collect()
    }
}

/// Groups containing at least one of `endpoints`
pub fn filter_empty_groups(groups: &[EndpointGroup], endpoints: &[Endpoint]) -> Vec<EndpointGroup> {
    groups
        .iter()
        .filter(|group| endpoints.iter().any(|endpoint| endpoint.group_id == group.id))
        .cloned()
        .collect()
}
