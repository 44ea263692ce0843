use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::domain::cluster::{cluster_name, AtlasCluster, ClusterStatus};
use crate::domain::event::{Event, EventStatus};
use crate::domain::repositories::Filter;
use crate::domain::team::Team;
use crate::infrastructure::atlas::ClusterProvisioner;
use crate::state::AppState;

use super::common::{load, require_member, require_member_or_staff};

fn provisioner(state: &AppState) -> Result<Arc<dyn ClusterProvisioner>, ApiError> {
    state
        .provisioner
        .clone()
        .ok_or_else(|| ApiError::service_unavailable("Cluster provisioning is not configured"))
}

async fn active_cluster(state: &AppState, team_id: Uuid) -> Result<Option<AtlasCluster>, ApiError> {
    Ok(state
        .collection::<AtlasCluster>()
        .find(Filter::new().eq("team_id", team_id))
        .await?
        .into_iter()
        .rev()
        .find(AtlasCluster::is_active))
}

/// Provision a free-tier database for the team
///
/// POST /api/teams/:id/cluster
pub async fn create_cluster(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AtlasCluster>), ApiError> {
    let provisioner = provisioner(&state)?;

    let team: Team = load(&state, team_id, "Team").await?;
    require_member(&team, &caller)?;

    let event: Event = load(&state, team.event_id(), "Event").await?;
    if !matches!(event.status(), EventStatus::Open | EventStatus::InProgress) {
        return Err(ApiError::bad_request(format!(
            "Clusters cannot be created while the event is {}",
            event.status()
        )));
    }

    if active_cluster(&state, team_id).await?.is_some() {
        return Err(ApiError::conflict("Team already has a cluster"));
    }

    let name = cluster_name(team.name(), team_id);
    let observed = provisioner.create(&name).await?;

    let mut cluster = AtlasCluster::new(
        team_id,
        event.id(),
        name,
        provisioner.region().to_string(),
        caller.id,
    );
    cluster.refresh(observed.status, observed.connection_string);
    state.collection::<AtlasCluster>().insert(&cluster).await?;

    tracing::info!(
        cluster_id = %cluster.id(),
        team_id = %team_id,
        name = %cluster.name(),
        "Cluster provisioning started"
    );

    Ok((StatusCode::CREATED, Json(cluster)))
}

/// Current cluster of the team, refreshed from the provider while it is being created
///
/// GET /api/teams/:id/cluster
pub async fn get_cluster(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<AtlasCluster>, ApiError> {
    let provisioner = provisioner(&state)?;

    let team: Team = load(&state, team_id, "Team").await?;
    require_member_or_staff(&team, &caller)?;

    let mut cluster = active_cluster(&state, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cluster not found"))?;

    if cluster.status() == ClusterStatus::Creating {
        match provisioner.status(cluster.name()).await {
            Ok(observed) => {
                cluster.refresh(observed.status, observed.connection_string);
                state.collection::<AtlasCluster>().save(&cluster).await?;
            }
            Err(e) => {
                tracing::warn!(cluster_id = %cluster.id(), error = %e, "Cluster status refresh failed")
            }
        }
    }

    Ok(Json(cluster))
}

/// DELETE /api/teams/:id/cluster
pub async fn delete_cluster(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<AtlasCluster>, ApiError> {
    let provisioner = provisioner(&state)?;

    let team: Team = load(&state, team_id, "Team").await?;
    require_member_or_staff(&team, &caller)?;

    let mut cluster = active_cluster(&state, team_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cluster not found"))?;

    provisioner.delete(cluster.name()).await?;
    cluster.mark_deleted()?;
    state.collection::<AtlasCluster>().save(&cluster).await?;

    tracing::info!(cluster_id = %cluster.id(), team_id = %team_id, "Cluster deleted");

    Ok(Json(cluster))
}

/// GET /api/admin/clusters
pub async fn list_clusters(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<AtlasCluster>>, ApiError> {
    caller.require_admin()?;
    provisioner(&state)?;

    Ok(Json(state.collection::<AtlasCluster>().all().await?))
}
