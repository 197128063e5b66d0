//! Ingress class form conversion and change planning
//!
//! A namespace has at most one ingress per ingress class, named after the
//! class. The form tracks, per class, whether it was selected when loaded
//! and whether it is selected now; the pair decides what the save does.

use crate::kubernetes::form_values::{AnnotationFormValue, IngressClassFormValue};
use portside_common::kubernetes::{Ingress, IngressClass, IngressClassType};
use portside_common::{Error, Result};
use std::collections::BTreeMap;

/// Annotation enabling path rewriting on nginx ingresses
pub const NGINX_REWRITE_TARGET_ANNOTATION: &str = "nginx.ingress.kubernetes.io/rewrite-target";
pub const NGINX_REWRITE_TARGET_VALUE: &str = "/$1";

/// What a save does for one ingress class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressAction {
    Create,
    Delete,
    Patch,
    None,
}

impl IngressAction {
    pub fn for_pair(was_selected: bool, selected: bool) -> Self {
        match (was_selected, selected) {
            (false, true) => IngressAction::Create,
            (true, false) => IngressAction::Delete,
            (true, true) => IngressAction::Patch,
            (false, false) => IngressAction::None,
        }
    }
}

/// Backend request derived from one ingress class
#[derive(Debug, Clone, PartialEq)]
pub enum IngressChange {
    Create(Ingress),
    Delete(Ingress),
    Patch { old: Ingress, new: Ingress },
}

impl IngressChange {
    pub fn name(&self) -> &str {
        match self {
            IngressChange::Create(ingress) | IngressChange::Delete(ingress) => &ingress.name,
            IngressChange::Patch { new, .. } => &new.name,
        }
    }
}

/// Build one form value per configured ingress class, pre-selecting the
/// classes that already have an ingress in `ingresses`.
pub fn ingress_classes_to_form_values(
    classes: &[IngressClass],
    ingresses: &[Ingress],
) -> Vec<IngressClassFormValue> {
    classes
        .iter()
        .map(|class| {
            let mut fv = IngressClassFormValue::new(class.clone());

            if let Some(ingress) = ingresses.iter().find(|ing| ing.name == class.name) {
                fv.selected = true;
                fv.was_selected = true;
                fv.host = ingress.host.clone();
                fv.namespace = ingress.namespace.clone();

                for (key, value) in &ingress.annotations {
                    if key == NGINX_REWRITE_TARGET_ANNOTATION {
                        fv.rewrite_target = true;
                    } else {
                        fv.annotations.push(AnnotationFormValue {
                            key: key.clone(),
                            value: value.clone(),
                        });
                    }
                }
                fv.advanced_config = !fv.annotations.is_empty();
            }

            fv
        })
        .collect()
}

/// Ingress described by a form value. Annotations with a blank key are dropped.
pub fn form_value_to_ingress(fv: &IngressClassFormValue) -> Ingress {
    let mut annotations: BTreeMap<String, String> = fv
        .annotations
        .iter()
        .filter(|a| !a.key.trim().is_empty())
        .map(|a| (a.key.clone(), a.value.clone()))
        .collect();

    if fv.rewrite_target && fv.ingress_class.class_type == IngressClassType::Nginx {
        annotations.insert(
            NGINX_REWRITE_TARGET_ANNOTATION.to_string(),
            NGINX_REWRITE_TARGET_VALUE.to_string(),
        );
    }

    Ingress {
        name: fv.ingress_class.name.clone(),
        namespace: fv.namespace.clone(),
        host: fv.host().map(str::to_string),
        ingress_class_name: Some(fv.ingress_class.name.clone()),
        annotations,
        paths: Vec::new(),
        previous_host: None,
    }
}

/// Turn the ingress class form into backend requests.
///
/// `existing` holds the namespace's current ingresses; a patch keeps the
/// routed paths of the existing ingress and records its host as the
/// previous host.
pub fn plan_ingress_changes(
    classes: &[IngressClassFormValue],
    existing: &[Ingress],
) -> Result<Vec<IngressChange>> {
    let mut changes = Vec::new();

    for fv in classes {
        match fv.action() {
            IngressAction::Create => changes.push(IngressChange::Create(form_value_to_ingress(fv))),
            IngressAction::Delete => changes.push(IngressChange::Delete(form_value_to_ingress(fv))),
            IngressAction::Patch => {
                let old = existing
                    .iter()
                    .find(|ing| ing.name == fv.ingress_class.name)
                    .ok_or_else(|| {
                        Error::NotFound(format!(
                            "ingress {} in namespace {}",
                            fv.ingress_class.name, fv.namespace
                        ))
                    })?;

                let mut new = form_value_to_ingress(fv);
                new.paths = old.paths.clone();
                new.previous_host = old.host.clone();
                changes.push(IngressChange::Patch {
                    old: old.clone(),
                    new,
                });
            }
            IngressAction::None => {}
        }
    }

    Ok(changes)
}
