//! Group activation
//!
//! Activation is a pure function of the form state, recomputed on every
//! call. A group with no rule is always active. A group with a rule is
//! active the moment every dependency field has a non-empty value.

use super::schema::FormSchema;
use super::types::{FormState, GroupState};
use crate::error::{Error, Result};

/// Computes group visibility for one schema
#[derive(Debug, Clone, Copy)]
pub struct GroupActivationEngine<'s> {
    schema: &'s FormSchema,
}

impl<'s> GroupActivationEngine<'s> {
    pub fn new(schema: &'s FormSchema) -> Self {
        Self { schema }
    }

    /// State of every group, indexed like `schema.groups()`
    fn evaluate(&self, state: &FormState) -> Vec<GroupState> {
        self.schema
            .groups()
            .iter()
            .map(|group| {
                if group.dependencies().iter().all(|dep| state.is_set(dep)) {
                    GroupState::Active
                } else {
                    GroupState::Inactive
                }
            })
            .collect()
    }

    /// Whether `group` is active
    pub fn is_active(&self, group: &str, state: &FormState) -> Result<bool> {
        Ok(self.state_of(group, state)? == GroupState::Active)
    }

    /// State of one group
    pub fn state_of(&self, group: &str, state: &FormState) -> Result<GroupState> {
        let position = self
            .schema
            .group_position(group)
            .ok_or_else(|| Error::unknown_group(group))?;
        Ok(self.evaluate(state)[position])
    }

    /// Every group with its state, in declaration order
    pub fn group_states(&self, state: &FormState) -> Vec<(&'s str, GroupState)> {
        self.schema
            .groups()
            .iter()
            .zip(self.evaluate(state))
            .map(|(group, s)| (group.name.as_str(), s))
            .collect()
    }

    /// Names of active groups, in declaration order
    pub fn active_groups(&self, state: &FormState) -> Vec<&'s str> {
        self.group_states(state)
            .into_iter()
            .filter(|(_, s)| *s == GroupState::Active)
            .map(|(name, _)| name)
            .collect()
    }

    /// Ids of fields in active groups, in declaration order
    pub fn active_fields(&self, state: &FormState) -> Vec<&'s str> {
        let states = self.evaluate(state);
        self.schema
            .fields()
            .iter()
            .filter(|field| {
                self.schema
                    .group_position(&field.group)
                    .is_some_and(|gi| states[gi] == GroupState::Active)
            })
            .map(|field| field.id.as_str())
            .collect()
    }

    /// Whether a field is currently visible
    pub fn is_field_active(&self, field: &str, state: &FormState) -> Result<bool> {
        let descriptor = self
            .schema
            .field(field)
            .ok_or_else(|| Error::unknown_field(field))?;
        self.is_active(&descriptor.group, state)
    }
}

impl FormSchema {
    /// Activation engine for this schema
    pub fn activation(&self) -> GroupActivationEngine<'_> {
        GroupActivationEngine::new(self)
    }

    /// Shorthand for `activation().active_fields(state)`
    pub fn active_fields(&self, state: &FormState) -> Vec<&str> {
        self.activation().active_fields(state)
    }
}
