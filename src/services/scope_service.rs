use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    entity::{
        enums::{Role, StaffStatus},
        salon_members, salons, Profiles, SalonMembers, Salons, Staff,
    },
    error::AppResult,
    scope::{Principal, Scope},
    state::AppState,
};

/// Loads the stored identity behind `principal_id`. Invited collaborators
/// that never activated their account are treated as unknown.
pub async fn load_principal(state: &AppState, principal_id: Uuid) -> AppResult<Option<Principal>> {
    if Profiles::find_by_id(principal_id)
        .one(&state.orm)
        .await?
        .is_some()
    {
        return Ok(Some(Principal {
            id: principal_id,
            role: Role::Owner,
            owner_id: None,
            assigned_salon_ids: Default::default(),
            can_view_own_schedule: true,
            restrict_to_current_day: false,
        }));
    }

    let Some(member) = Staff::find_by_id(principal_id).one(&state.orm).await? else {
        return Ok(None);
    };
    if member.status == StaffStatus::Invited {
        return Ok(None);
    }

    Ok(Some(Principal {
        id: member.id,
        role: member.role,
        owner_id: Some(member.owner_id),
        assigned_salon_ids: member_salon_ids(state, member.id).await?.into_iter().collect(),
        can_view_own_schedule: member.can_view_own_schedule,
        restrict_to_current_day: member.restrict_to_current_day,
    }))
}

/// Resolves the capability descriptor for a request. Unknown principals get
/// an empty scope rather than an error.
pub async fn resolve_scope(state: &AppState, principal_id: Uuid) -> AppResult<Scope> {
    let Some(principal) = load_principal(state, principal_id).await? else {
        tracing::debug!(%principal_id, "unknown principal, empty scope");
        return Ok(Scope::empty(principal_id));
    };

    let organization_salons = match principal.organization_owner_id() {
        Some(owner_id) => organization_salon_ids(state, owner_id).await?,
        None => Vec::new(),
    };
    let scope = Scope::resolve(&principal, &organization_salons);
    tracing::debug!(
        %principal_id,
        role = scope.role.as_str(),
        salons = scope.accessible_salon_ids.len(),
        "scope resolved"
    );
    Ok(scope)
}

pub(crate) async fn organization_salon_ids(state: &AppState, owner_id: Uuid) -> AppResult<Vec<Uuid>> {
    let ids = Salons::find()
        .select_only()
        .column(salons::Column::Id)
        .filter(salons::Column::OwnerId.eq(owner_id))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?;
    Ok(ids)
}

pub(crate) async fn member_salon_ids(state: &AppState, staff_id: Uuid) -> AppResult<Vec<Uuid>> {
    let ids = SalonMembers::find()
        .select_only()
        .column(salon_members::Column::SalonId)
        .filter(salon_members::Column::StaffId.eq(staff_id))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?;
    Ok(ids)
}
