//! Client of SurrealDB

use ::core::num::NonZeroU32;

use ::serde::Deserialize;
use ::surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Surreal,
};
use ::tracing::debug;

use super::{Database, UpdateMachineResponse};
use crate::{
    config::{Credentials, DatabaseConfig},
    error::{CoinwashError, Result},
    machine::{Machine, MachineId, MachineInfo, MachineStatus},
};

/// Row shape of [SurrealDBClient::list_machines]
#[derive(Deserialize)]
struct MachineRecord {
    id: MachineId,
    info: MachineInfo,
}

/// Client to interact with the database.
/// Store the machines of the laundromat
#[derive(Clone)]
pub struct SurrealDBClient {
    /// preserve `uri` for logging
    uri: String,
    client: Surreal<Any>,
}

impl SurrealDBClient {
    const TABLE: &'static str = "machines";
    const NAMESPACE: &'static str = "coinwash";
    const DATABASE: &'static str = "coinwash";

    pub fn get_uri(&self) -> &str {
        &self.uri
    }

    /// Connect to the database described by `config`.
    /// `mem://` creates an in-process database which lives as long as the client.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let DatabaseConfig { credentials, uri } = config;
        let client = connect(uri.as_str())
            .await
            .map_err(CoinwashError::fail_to_connect_database)?;
        if let Some(Credentials { username, password }) = credentials {
            client
                .signin(Root { username, password })
                .await
                .map_err(CoinwashError::fail_to_connect_database)?;
        }
        client
            .use_ns(Self::NAMESPACE)
            .use_db(Self::DATABASE)
            .await
            .map_err(CoinwashError::fail_to_connect_database)?;
        debug!("Connected to database {}", uri);
        Ok(Self {
            uri: uri.clone(),
            client,
        })
    }
}

impl Database for SurrealDBClient {
    async fn add_machines(&self, machines: Vec<Machine>) -> Result<()> {
        let sql = r#"
            CREATE type::thing($tb, $id)
            SET info = $machine
            RETURN NONE;
        "#;

        for Machine { id, info } in machines {
            self.client
                .query(sql)
                .bind(("tb", Self::TABLE))
                .bind(("id", id.get()))
                .bind(("machine", info))
                .await
                .map_err(CoinwashError::fail_to_update_database)?
                .check()
                .map_err(CoinwashError::fail_to_update_database)?;
        }
        Ok(())
    }

    async fn update_machine(
        &self,
        id: MachineId,
        before: &MachineStatus,
        after: &MachineInfo,
    ) -> Result<Option<UpdateMachineResponse>> {
        // The query returns None if the machine does not exist
        // Otherwise, update the machine only if its status is `before`
        // and return the status before update
        let sql = r#"
            LET $record_id = type::thing($tb, $id);             // 0th return value
            BEGIN TRANSACTION;
            {
                LET $current_status = (SELECT VALUE info.status FROM ONLY $record_id);
                IF $current_status IS NONE {
                    RETURN NONE;                                                             // 1st return value
                } ELSE IF $current_status = $before {
                    UPDATE ONLY $record_id SET info = $after;
                    RETURN {before_status: $current_status, update_success: true};          // 1st return value
                } ELSE {
                    RETURN {before_status: $current_status, update_success: false};         // 1st return value
                }
            };
            COMMIT TRANSACTION;
        "#;

        let response: Option<UpdateMachineResponse> = self
            .client
            .query(sql)
            .bind(("tb", Self::TABLE))
            .bind(("id", id.get()))
            .bind(("before", *before))
            .bind(("after", after.clone()))
            .await
            .map_err(CoinwashError::fail_to_update_database)?
            .take(1)
            .map_err(CoinwashError::fail_to_update_database)?; // The 1st statement is the if-else which is what we want

        Ok(response)
    }

    async fn get_machine(&self, id: MachineId) -> Result<Option<MachineInfo>> {
        let sql = r#"
            SELECT VALUE info
            FROM ONLY type::thing($tb, $id);
        "#;
        let info: Option<MachineInfo> = self
            .client
            .query(sql)
            .bind(("tb", Self::TABLE))
            .bind(("id", id.get()))
            .await
            .map_err(CoinwashError::fail_to_read_database)?
            .take(0)
            .map_err(CoinwashError::fail_to_read_database)?;
        Ok(info)
    }

    async fn list_machines(&self) -> Result<Vec<Machine>> {
        let sql = r#"
            SELECT record::id(id) AS id, info FROM type::table($tb);
        "#;

        let mut records: Vec<MachineRecord> = self
            .client
            .query(sql)
            .bind(("tb", Self::TABLE))
            .await
            .map_err(CoinwashError::fail_to_read_database)?
            .take(0)
            .map_err(CoinwashError::fail_to_read_database)?;
        records.sort_by_key(|record| record.id);
        Ok(records
            .into_iter()
            .map(|MachineRecord { id, info }| Machine::new(id, info))
            .collect())
    }

    async fn remove_all_machines(&self) -> Result<()> {
        let sql = r#"
            DELETE type::table($tb);
        "#;
        self.client
            .query(sql)
            .bind(("tb", Self::TABLE))
            .await
            .map_err(CoinwashError::fail_to_update_database)?
            .check()
            .map_err(CoinwashError::fail_to_update_database)?;
        Ok(())
    }

    async fn set_all_durations(&self, minutes: NonZeroU32) -> Result<usize> {
        let sql = r#"
            UPDATE type::table($tb)
            SET info.duration = $duration
            RETURN VALUE record::id(id);
        "#;
        let ids: Vec<MachineId> = self
            .client
            .query(sql)
            .bind(("tb", Self::TABLE))
            .bind(("duration", minutes.get()))
            .await
            .map_err(CoinwashError::fail_to_update_database)?
            .take(0)
            .map_err(CoinwashError::fail_to_update_database)?;
        Ok(ids.len())
    }
}
