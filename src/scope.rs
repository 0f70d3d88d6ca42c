//! Capability descriptor resolved once per request.
//!
//! Every gateway and analytics operation receives a [`Scope`] explicitly and
//! asks it what the principal may see or change. Role checks do not live
//! anywhere else.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::Role,
    error::{AppError, AppResult},
};

/// The authenticated identity as stored, before scoping.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    /// Organization owner for managers and staff; `None` for owners.
    pub owner_id: Option<Uuid>,
    pub assigned_salon_ids: BTreeSet<Uuid>,
    pub can_view_own_schedule: bool,
    pub restrict_to_current_day: bool,
}

impl Principal {
    pub fn organization_owner_id(&self) -> Option<Uuid> {
        match self.role {
            Role::Owner => Some(self.id),
            Role::Manager | Role::Staff => self.owner_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Scope {
    pub principal_id: Uuid,
    pub role: Role,
    pub organization_owner_id: Option<Uuid>,
    #[schema(value_type = Vec<Uuid>)]
    pub accessible_salon_ids: BTreeSet<Uuid>,
    pub can_view_own_schedule: bool,
    pub restrict_to_current_day: bool,
}

impl Scope {
    /// Resolves the scope of `principal` given the ids of every salon owned by
    /// its organization.
    pub fn resolve(principal: &Principal, organization_salons: &[Uuid]) -> Self {
        let organization_owner_id = principal.organization_owner_id();
        let accessible_salon_ids = match (principal.role, organization_owner_id) {
            (_, None) => BTreeSet::new(),
            (Role::Owner, Some(_)) => organization_salons.iter().copied().collect(),
            (Role::Manager | Role::Staff, Some(_)) => organization_salons
                .iter()
                .filter(|id| principal.assigned_salon_ids.contains(id))
                .copied()
                .collect(),
        };

        Self {
            principal_id: principal.id,
            role: principal.role,
            organization_owner_id,
            accessible_salon_ids,
            can_view_own_schedule: principal.can_view_own_schedule,
            restrict_to_current_day: principal.role == Role::Staff
                && principal.restrict_to_current_day,
        }
    }

    /// Scope of a principal that could not be resolved: least privilege, no salons.
    pub fn empty(principal_id: Uuid) -> Self {
        Self {
            principal_id,
            role: Role::Staff,
            organization_owner_id: None,
            accessible_salon_ids: BTreeSet::new(),
            can_view_own_schedule: false,
            restrict_to_current_day: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accessible_salon_ids.is_empty()
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn can_manage(&self) -> bool {
        matches!(self.role, Role::Owner | Role::Manager) && self.organization_owner_id.is_some()
    }

    pub fn ensure_manager(&self) -> AppResult<()> {
        if self.can_manage() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    pub fn ensure_owner(&self) -> AppResult<()> {
        if self.is_owner() && self.organization_owner_id.is_some() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Organization owner id for writes; fails when the principal has no organization.
    pub fn require_organization(&self) -> AppResult<Uuid> {
        self.organization_owner_id.ok_or(AppError::PermissionDenied)
    }

    pub fn can_access_salon(&self, salon_id: Uuid) -> bool {
        self.accessible_salon_ids.contains(&salon_id)
    }

    pub fn ensure_salon(&self, salon_id: Uuid) -> AppResult<()> {
        if self.can_access_salon(salon_id) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Salons a read should cover: every accessible salon, or the requested
    /// one if it is accessible. Never widens beyond the scope.
    pub fn resolve_salons(&self, salon_filter: Option<Uuid>) -> Vec<Uuid> {
        match salon_filter {
            None => self.accessible_salon_ids.iter().copied().collect(),
            Some(id) if self.can_access_salon(id) => vec![id],
            Some(_) => Vec::new(),
        }
    }

    /// Staff id every sale, appointment and schedule read must be narrowed to.
    pub fn staff_filter(&self) -> Option<Uuid> {
        self.is_staff().then_some(self.principal_id)
    }

    pub fn can_see_staff_record(&self, staff_id: Option<Uuid>) -> bool {
        match self.staff_filter() {
            None => true,
            Some(own) => staff_id == Some(own),
        }
    }

    /// Calendar gate for a given day. Owners and managers always pass; staff
    /// pass when the day is allowed by `restrict_to_current_day` and they may
    /// view their own schedule or are tagged present that day.
    pub fn has_access_to_date(&self, date: NaiveDate, today: NaiveDate, tagged_present: bool) -> bool {
        if self.can_manage() {
            return true;
        }
        if !self.is_staff() || self.is_empty() {
            return false;
        }
        let day_allowed = !self.restrict_to_current_day || date == today;
        day_allowed && (self.can_view_own_schedule || tagged_present)
    }
}
