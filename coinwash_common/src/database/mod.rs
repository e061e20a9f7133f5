//! Datastore to record machines' information

pub mod surrealdb_client;

use ::core::{future::Future, num::NonZeroU32};

use ::serde::Deserialize;

use crate::error::Result;
use crate::machine::{Machine, MachineId, MachineInfo, MachineStatus};

/// Response of a conditional machine update.
/// # Fields
/// - `before_status`: The machine status before the update.
/// - `update_success`: Whether the update is successful.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct UpdateMachineResponse {
    pub before_status: MachineStatus,
    pub update_success: bool,
}

/// Database for storing the machines.
/// A machine is stored in the format of using [MachineId] as key and [MachineInfo] as value.
pub trait Database: Sized + Send + Sync + 'static {
    /// Add machines with the given ids.
    /// # Return
    /// - `Ok(())` if all machines are added.
    /// - `Err(_)` if any id is taken or any error occurs in the database.
    fn add_machines(&self, machines: Vec<Machine>) -> impl Future<Output = Result<()>> + Send;

    /// Replace the machine information by `after` only when
    /// the machine exists and its current status is `before`.
    /// # Parameters
    /// - `id`: The id of the machine.
    /// - `before`: The expected status of the machine before the update.
    /// - `after`: The machine information to store.
    /// # Return
    /// - `Ok(None)` if the machine does not exist.
    /// - `Ok(Some(UpdateMachineResponse))` if the machine exists.
    /// - `Err(_)` if any error occurs in the database.
    fn update_machine(
        &self,
        id: MachineId,
        before: &MachineStatus,
        after: &MachineInfo,
    ) -> impl Future<Output = Result<Option<UpdateMachineResponse>>> + Send;

    /// Return `Ok(None)` if the machine does not exist
    fn get_machine(&self, id: MachineId)
        -> impl Future<Output = Result<Option<MachineInfo>>> + Send;

    /// Return all machines sorted by id
    fn list_machines(&self) -> impl Future<Output = Result<Vec<Machine>>> + Send;

    /// Remove every machine.
    fn remove_all_machines(&self) -> impl Future<Output = Result<()>> + Send;

    /// Set the cycle length of every machine, return how many were updated.
    fn set_all_durations(&self, minutes: NonZeroU32) -> impl Future<Output = Result<usize>> + Send;
}
