use ::core::num::NonZeroU32;

use ::coinwash_common::{
    database::{Database, UpdateMachineResponse},
    error::*,
    machine::{FleetConfig, Machine, MachineId, MachineInfo, MachineStatus},
};
use ::coinwash_server::get_server;
use ::mockall::mock;
use axum_test::TestServer;

mock! {
    pub DB{}
    impl Database for DB {
        async fn add_machines(&self, machines: Vec<Machine>) -> Result<()>;
        async fn update_machine(
            &self,
            id: MachineId,
            before: &MachineStatus,
            after: &MachineInfo,
        ) -> Result<Option<UpdateMachineResponse>>;
        async fn get_machine(&self, id: MachineId) -> Result<Option<MachineInfo>>;
        async fn list_machines(&self) -> Result<Vec<Machine>>;
        async fn remove_all_machines(&self) -> Result<()>;
        async fn set_all_durations(&self, minutes: NonZeroU32) -> Result<usize>;
    }
}

pub async fn get_test_server(db: MockDB) -> Result<TestServer> {
    let app = get_server(db, FleetConfig::default());
    TestServer::new(app).map_err(CoinwashError::fail_to_start_server)
}
