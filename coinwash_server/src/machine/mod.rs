//! Restful API for machine management.

use ::coinwash_common::{
    anyhow::anyhow,
    database::Database,
    error::CoinwashError,
    machine::{
        Machine, MachineId, MachineInfo, MachineStatus, MachineTime, SetStatusRequest,
        StartMachineRequest, StartMachineResponse,
    },
    tracing::{info, warn},
};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::{error::Result, state::AppState};

async fn list_machines<DB: Database>(
    State(state): State<AppState<DB>>,
) -> Result<Json<Vec<Machine>>> {
    let machines = state.get_db().list_machines().await?;
    Ok(Json(machines))
}

/// Create the default fleet if there is no machine yet.
/// Return the machines in the store either way.
async fn initialize_machines<DB: Database>(
    State(state): State<AppState<DB>>,
) -> Result<Json<Vec<Machine>>> {
    let db = state.get_db();
    let existing = db.list_machines().await?;
    if !existing.is_empty() {
        info!(
            "{} machines exist already, skip initialization",
            existing.len()
        );
        return Ok(Json(existing));
    }
    let machines = state.get_fleet().machines();
    if let Err(e) = db.add_machines(machines.clone()).await {
        // a concurrent initialization may have created the fleet first
        let existing = db.list_machines().await?;
        if existing.is_empty() {
            return Err(e.into());
        }
        warn!("Fleet initialized by others, skip initialization: {}", e);
        return Ok(Json(existing));
    }
    info!("Initialized {} machines", machines.len());
    Ok(Json(machines))
}

/// Pay for a cycle and start the machine.
async fn start_machine<DB: Database>(
    Path(id): Path<MachineId>,
    State(state): State<AppState<DB>>,
    Json(body): Json<StartMachineRequest>,
) -> Result<Json<StartMachineResponse>> {
    let db = state.get_db();
    let info = get_machine_helper(db, id).await?;
    let (running, change) = info.start(body.amount, MachineTime::now())?;
    update_machine_helper(db, id, &info.status, &running).await?;
    info!(
        "Machine {} started with {} coins, change {}, ends at {:?}",
        id,
        body.amount,
        change,
        running.end_time().map(ToString::to_string)
    );
    Ok(Json(StartMachineResponse {
        machine: Machine::new(id, running),
        change,
    }))
}

/// Set the status directly, e.g. for maintenance or after a cycle is finished.
async fn set_machine_status<DB: Database>(
    Path(id): Path<MachineId>,
    State(state): State<AppState<DB>>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<Machine>> {
    let db = state.get_db();
    let info = get_machine_helper(db, id).await?;
    let updated = info.set_status(body.status)?;
    update_machine_helper(db, id, &info.status, &updated).await?;
    info!(
        "Machine {} status updated from {} to {}",
        id, info.status, updated.status
    );
    Ok(Json(Machine::new(id, updated)))
}

pub(crate) fn get_machine_router<DB: Database>() -> Router<AppState<DB>> {
    Router::new()
        .route(
            "/",
            get(list_machines::<DB>).post(initialize_machines::<DB>),
        )
        .route("/:id/start", post(start_machine::<DB>))
        .route("/:id/status", put(set_machine_status::<DB>))
}

// ----------------- helper functions -----------------

fn machine_not_found(id: MachineId) -> CoinwashError {
    CoinwashError::not_found(anyhow!("Machine {} not found", id))
}

async fn get_machine_helper<DB: Database>(db: &DB, id: MachineId) -> Result<MachineInfo> {
    let info = db
        .get_machine(id)
        .await?
        .ok_or_else(|| machine_not_found(id))?;
    Ok(info)
}

/// Store `after` if nobody changed the machine since it was read with status `before`.
async fn update_machine_helper<DB: Database>(
    db: &DB,
    id: MachineId,
    before: &MachineStatus,
    after: &MachineInfo,
) -> Result<()> {
    let response = db
        .update_machine(id, before, after)
        .await?
        .ok_or_else(|| machine_not_found(id))?;
    if response.update_success {
        Ok(())
    } else {
        Err(CoinwashError::invalid_state(anyhow!(
            "Machine {} has been changed to {} by others",
            id,
            response.before_status
        ))
        .into())
    }
}
