use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        Deleted,
        staff::{InviteStaffRequest, StaffList, UpdateStaffRequest},
    },
    entity::{
        enums::{Role, StaffStatus},
        salon_members, staff, Profiles, SalonMembers, Salons, Staff,
    },
    error::{AppError, AppResult},
    events::DomainEvent,
    models::StaffMember,
    response::{ApiResponse, Meta},
    routes::params::SalonFilter,
    scope::Scope,
    services::{auth_service, scope_service},
    state::AppState,
};

pub async fn list_staff(
    state: &AppState,
    scope: &Scope,
    filter: SalonFilter,
) -> AppResult<ApiResponse<StaffList>> {
    let items = fetch_staff(state, scope, filter.salon_id).await?;
    let total = items.len();
    Ok(ApiResponse::success(
        "Staff",
        StaffList { items },
        Some(Meta::listed(total)),
    ))
}

/// Organization owner first, then every collaborator with a membership in
/// one of the resolved salons, each listed once.
pub(crate) async fn fetch_staff(
    state: &AppState,
    scope: &Scope,
    salon_filter: Option<Uuid>,
) -> AppResult<Vec<StaffMember>> {
    let salons = scope.resolve_salons(salon_filter);
    let Some(owner_id) = scope.organization_owner_id else {
        return Ok(Vec::new());
    };
    if salons.is_empty() {
        return Ok(Vec::new());
    }

    let mut members = Vec::new();
    if let Some(owner) = Profiles::find_by_id(owner_id).one(&state.orm).await? {
        members.push(StaffMember {
            id: owner.id,
            owner_id: None,
            email: owner.email,
            name: owner.name,
            role: Role::Owner,
            status: StaffStatus::Active,
            salon_ids: scope_service::organization_salon_ids(state, owner_id).await?,
            is_bookable: false,
            can_view_own_schedule: true,
            restrict_to_current_day: false,
        });
    }

    let staff_ids: BTreeSet<Uuid> = SalonMembers::find()
        .select_only()
        .column(salon_members::Column::StaffId)
        .filter(salon_members::Column::SalonId.is_in(salons))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?
        .into_iter()
        .collect();
    if staff_ids.is_empty() {
        return Ok(members);
    }

    let rows = Staff::find()
        .filter(staff::Column::Id.is_in(staff_ids.iter().copied()))
        .filter(staff::Column::OwnerId.eq(owner_id))
        .order_by_asc(staff::Column::Name)
        .all(&state.orm)
        .await?;
    let memberships = memberships_by_staff(state, &staff_ids).await?;

    members.extend(rows.into_iter().map(|row| {
        let salon_ids = memberships.get(&row.id).cloned().unwrap_or_default();
        staff_member_from(row, salon_ids)
    }));
    Ok(members)
}

/// Active, bookable collaborators of a salon.
pub(crate) async fn bookable_staff(state: &AppState, salon_id: Uuid) -> AppResult<Vec<StaffMember>> {
    let staff_ids: BTreeSet<Uuid> = SalonMembers::find()
        .select_only()
        .column(salon_members::Column::StaffId)
        .filter(salon_members::Column::SalonId.eq(salon_id))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?
        .into_iter()
        .collect();
    if staff_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = Staff::find()
        .filter(staff::Column::Id.is_in(staff_ids.iter().copied()))
        .filter(staff::Column::IsBookable.eq(true))
        .filter(staff::Column::Status.eq(StaffStatus::Active))
        .order_by_asc(staff::Column::Name)
        .all(&state.orm)
        .await?;
    let memberships = memberships_by_staff(state, &staff_ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let salon_ids = memberships.get(&row.id).cloned().unwrap_or_default();
            staff_member_from(row, salon_ids)
        })
        .collect())
}

pub async fn invite_staff(
    state: &AppState,
    scope: &Scope,
    payload: InviteStaffRequest,
) -> AppResult<ApiResponse<StaffMember>> {
    scope.ensure_manager()?;
    let owner_id = scope.require_organization()?;
    ensure_can_assign_role(scope, payload.role)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    let salon_ids: BTreeSet<Uuid> = payload.salon_ids.iter().copied().collect();
    if salon_ids.is_empty() {
        return Err(AppError::validation("at least one salon is required"));
    }
    for salon_id in &salon_ids {
        scope.ensure_salon(*salon_id)?;
    }
    let email = auth_service::normalize_email(&payload.email)?;
    auth_service::ensure_email_available(state, &email).await?;
    let invitation = auth_service::issue_invitation_token()?;

    let txn = state.orm.begin().await?;
    let member = staff::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        email: Set(email),
        name: Set(name),
        role: Set(payload.role),
        status: Set(StaffStatus::Invited),
        is_bookable: Set(payload.is_bookable),
        can_view_own_schedule: Set(payload.can_view_own_schedule),
        restrict_to_current_day: Set(payload.restrict_to_current_day),
        password_hash: Set(None),
        invitation_token_hash: Set(Some(invitation.hash)),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    for salon_id in &salon_ids {
        salon_members::ActiveModel {
            id: Set(Uuid::new_v4()),
            staff_id: Set(member.id),
            salon_id: Set(*salon_id),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "staff_invite",
        "staff",
        serde_json::json!({ "staff_id": member.id, "role": member.role.as_str() }),
    )
    .await;

    let salon_name = match salon_ids.first() {
        Some(id) => Salons::find_by_id(*id)
            .one(&state.orm)
            .await?
            .map(|salon| salon.name)
            .unwrap_or_default(),
        None => String::new(),
    };
    state.events.publish(DomainEvent::StaffInvited {
        staff_id: member.id,
        email: member.email.clone(),
        inviter_name: principal_name(state, scope.principal_id).await?,
        salon_name,
        invitation_token: invitation.token,
    });

    let member = staff_member_from(member, salon_ids.into_iter().collect());
    Ok(ApiResponse::success("Staff invited", member, None))
}

pub async fn update_staff(
    state: &AppState,
    scope: &Scope,
    id: Uuid,
    payload: UpdateStaffRequest,
) -> AppResult<ApiResponse<StaffMember>> {
    scope.ensure_manager()?;
    let existing = find_managed_staff(state, scope, id).await?;
    if let Some(role) = payload.role {
        ensure_can_assign_role(scope, role)?;
    }

    let new_salons: Option<BTreeSet<Uuid>> = payload
        .salon_ids
        .as_ref()
        .map(|ids| ids.iter().copied().collect());
    if let Some(ids) = &new_salons {
        for salon_id in ids {
            scope.ensure_salon(*salon_id)?;
        }
    }

    let name = payload.name.map(|n| n.trim().to_string());
    if name.as_ref().is_some_and(|n| n.is_empty()) {
        return Err(AppError::validation("name is required"));
    }

    let txn = state.orm.begin().await?;
    let mut active: staff::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(flag) = payload.is_bookable {
        active.is_bookable = Set(flag);
    }
    if let Some(flag) = payload.can_view_own_schedule {
        active.can_view_own_schedule = Set(flag);
    }
    if let Some(flag) = payload.restrict_to_current_day {
        active.restrict_to_current_day = Set(flag);
    }
    let member = active.update(&txn).await?;

    if let Some(ids) = new_salons {
        // Memberships outside the caller's scope are left untouched.
        SalonMembers::delete_many()
            .filter(salon_members::Column::StaffId.eq(id))
            .filter(salon_members::Column::SalonId.is_in(scope.accessible_salon_ids.iter().copied()))
            .exec(&txn)
            .await?;
        for salon_id in ids {
            salon_members::ActiveModel {
                id: Set(Uuid::new_v4()),
                staff_id: Set(id),
                salon_id: Set(salon_id),
            }
            .insert(&txn)
            .await?;
        }
    }
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "staff_update",
        "staff",
        serde_json::json!({ "staff_id": id }),
    )
    .await;

    let salon_ids = scope_service::member_salon_ids(state, id).await?;
    Ok(ApiResponse::success(
        "Staff updated",
        staff_member_from(member, salon_ids),
        None,
    ))
}

/// Removes a collaborator and their memberships. The organization owner
/// cannot be removed.
pub async fn remove_staff(state: &AppState, scope: &Scope, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    scope.ensure_manager()?;
    if scope.organization_owner_id == Some(id) {
        return Err(AppError::PermissionDenied);
    }
    find_managed_staff(state, scope, id).await?;

    let txn = state.orm.begin().await?;
    SalonMembers::delete_many()
        .filter(salon_members::Column::StaffId.eq(id))
        .exec(&txn)
        .await?;
    Staff::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "staff_remove",
        "staff",
        serde_json::json!({ "staff_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Staff removed", Deleted { id }, None))
}

/// Display name of a principal, owner or collaborator.
pub(crate) async fn principal_name(state: &AppState, id: Uuid) -> AppResult<String> {
    if let Some(owner) = Profiles::find_by_id(id).one(&state.orm).await? {
        return Ok(owner.name);
    }
    Ok(Staff::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(|member| member.name)
        .unwrap_or_default())
}

/// Collaborator row the caller may modify: same organization, sharing at
/// least one salon with a manager's scope, and never a manager for managers.
async fn find_managed_staff(state: &AppState, scope: &Scope, id: Uuid) -> AppResult<staff::Model> {
    let owner_id = scope.require_organization()?;
    let member = Staff::find_by_id(id)
        .one(&state.orm)
        .await?
        .filter(|member| member.owner_id == owner_id)
        .ok_or(AppError::NotFound)?;

    if !scope.is_owner() {
        if member.role != Role::Staff {
            return Err(AppError::PermissionDenied);
        }
        let shares_salon = scope_service::member_salon_ids(state, id)
            .await?
            .into_iter()
            .any(|salon_id| scope.can_access_salon(salon_id));
        if !shares_salon {
            return Err(AppError::PermissionDenied);
        }
    }
    Ok(member)
}

fn ensure_can_assign_role(scope: &Scope, role: Role) -> AppResult<()> {
    match role {
        Role::Owner => Err(AppError::validation("an organization has a single owner")),
        Role::Manager if !scope.is_owner() => Err(AppError::PermissionDenied),
        Role::Manager | Role::Staff => Ok(()),
    }
}

async fn memberships_by_staff(
    state: &AppState,
    staff_ids: &BTreeSet<Uuid>,
) -> AppResult<BTreeMap<Uuid, Vec<Uuid>>> {
    let rows = SalonMembers::find()
        .filter(salon_members::Column::StaffId.is_in(staff_ids.iter().copied()))
        .all(&state.orm)
        .await?;
    let mut by_staff: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    for row in rows {
        by_staff.entry(row.staff_id).or_default().push(row.salon_id);
    }
    for salons in by_staff.values_mut() {
        salons.sort();
        salons.dedup();
    }
    Ok(by_staff)
}

fn staff_member_from(model: staff::Model, salon_ids: Vec<Uuid>) -> StaffMember {
    StaffMember {
        id: model.id,
        owner_id: Some(model.owner_id),
        email: model.email,
        name: model.name,
        role: model.role,
        status: model.status,
        salon_ids,
        is_bookable: model.is_bookable,
        can_view_own_schedule: model.can_view_own_schedule,
        restrict_to_current_day: model.restrict_to_current_day,
    }
}
