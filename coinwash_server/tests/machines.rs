mod common;

use ::std::time::Duration;

use ::coinwash_common::{
    database::UpdateMachineResponse,
    error::*,
    machine::{
        FleetConfig, Machine, MachineId, MachineInfo, MachineStatus::*, MachineTime,
        StartMachineResponse,
    },
    serde_json::json,
    tokio,
};
use ::mockall::{predicate, Sequence};
use common::{get_test_server, MockDB};
use http::StatusCode;

fn available_machine() -> MachineInfo {
    MachineInfo::new("Machine 1".to_owned(), 20, 30)
}

fn running_machine() -> Result<MachineInfo> {
    let (running, _) = available_machine().start(20, MachineTime::now())?;
    Ok(running)
}

#[tokio::test]
async fn undefined_handler() -> Result<()> {
    let db = MockDB::new();
    let server = get_test_server(db).await?;

    let response = server.get("/any").await;

    response.assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn root_get_request() -> Result<()> {
    let db = MockDB::new();
    let server = get_test_server(db).await?;

    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_text("welcome to coinwash");
    Ok(())
}

#[tokio::test]
async fn list_machines() -> Result<()> {
    let mut db = MockDB::new();
    let machines = vec![
        Machine::new(MachineId::new(1)?, available_machine()),
        Machine::new(MachineId::new(2)?, running_machine()?),
    ];
    let machines_cloned = machines.clone();
    db.expect_list_machines()
        .times(1)
        .returning(move || Ok(machines.clone()));
    let server = get_test_server(db).await?;

    let response: Vec<Machine> = server.get("/machines").await.json();
    assert_eq!(response, machines_cloned);
    Ok(())
}

#[tokio::test]
async fn list_machines_with_database_error() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_list_machines().times(1).returning(|| {
        Err(CoinwashError::fail_to_read_database(
            ::coinwash_common::anyhow::anyhow!("connection reset"),
        ))
    });
    let server = get_test_server(db).await?;

    let response = server.get("/machines").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "error": "Fail to read database: connection reset"
    }));
    Ok(())
}

#[tokio::test]
async fn initialize_empty_store() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_list_machines().times(1).returning(|| Ok(vec![]));
    db.expect_add_machines()
        .withf(|machines| {
            machines.len() == 4
                && machines
                    .iter()
                    .all(|m| m.info.status == Available && m.info.price == 20)
        })
        .times(1)
        .returning(|_| Ok(()));
    let server = get_test_server(db).await?;

    let response = server.post("/machines").await;

    response.assert_status_ok();
    let machines: Vec<Machine> = response.json();
    let names: Vec<_> = machines.iter().map(|m| m.info.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Machine 1", "Machine 2", "Machine 3", "Machine 4"]
    );
    Ok(())
}

#[tokio::test]
async fn initialize_existing_store_is_noop() -> Result<()> {
    let mut db = MockDB::new();
    let existing = vec![Machine::new(MachineId::new(7)?, running_machine()?)];
    let existing_cloned = existing.clone();
    db.expect_list_machines()
        .times(1)
        .returning(move || Ok(existing.clone()));
    let server = get_test_server(db).await?;

    let response: Vec<Machine> = server.post("/machines").await.json();
    assert_eq!(response, existing_cloned);
    Ok(())
}

#[tokio::test]
async fn initialize_store_filled_concurrently() -> Result<()> {
    let mut db = MockDB::new();
    let mut seq = Sequence::new();
    let fleet: Vec<_> = FleetConfig::default().machines();
    let fleet_cloned = fleet.clone();
    db.expect_list_machines()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![]));
    db.expect_add_machines()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Err(CoinwashError::fail_to_update_database(
                ::coinwash_common::anyhow::anyhow!("Database record `machines:1` already exists"),
            ))
        });
    db.expect_list_machines()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move || Ok(fleet.clone()));
    let server = get_test_server(db).await?;

    let response = server.post("/machines").await;

    response.assert_status_ok();
    let machines: Vec<Machine> = response.json();
    assert_eq!(machines, fleet_cloned);
    Ok(())
}

#[tokio::test]
async fn initialize_fails_when_store_stays_empty() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_list_machines().times(2).returning(|| Ok(vec![]));
    db.expect_add_machines().times(1).returning(|_| {
        Err(CoinwashError::fail_to_update_database(
            ::coinwash_common::anyhow::anyhow!("connection reset"),
        ))
    });
    let server = get_test_server(db).await?;

    let response = server.post("/machines").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "error": "Fail to update database: connection reset"
    }));
    Ok(())
}

#[tokio::test]
async fn start_nonexistent_machine() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .with(predicate::eq(MachineId::new(9)?))
        .times(1)
        .returning(|_| Ok(None));
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/9/start")
        .json(&json!({"amount": 20}))
        .await;

    response.assert_status_not_found();
    response.assert_json(&json!({"error": "Not found: Machine 9 not found"}));
    Ok(())
}

#[tokio::test]
async fn start_machine_with_invalid_id() -> Result<()> {
    let db = MockDB::new();
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/0/start")
        .json(&json!({"amount": 20}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/machines/abc/start")
        .json(&json!({"amount": 20}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn start_machine_with_missing_amount() -> Result<()> {
    let db = MockDB::new();
    let server = get_test_server(db).await?;

    let response = server.post("/machines/1/start").json(&json!({})).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("missing field `amount`"));
    Ok(())
}

#[tokio::test]
async fn start_machine_with_insufficient_funds() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .with(predicate::eq(MachineId::new(1)?))
        .times(1)
        .returning(|_| Ok(Some(available_machine())));
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/1/start")
        .json(&json!({"amount": 10}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "error": "Insufficient funds: Machine 1 costs 20, only 10 inserted"
    }));
    Ok(())
}

#[tokio::test]
async fn start_machine_without_cycle() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .times(1)
        .returning(|_| Ok(Some(MachineInfo::new("Machine 1".to_owned(), 20, 0))));
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/1/start")
        .json(&json!({"amount": 20}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "error": "Illegal argument: Machine 1 has a cycle of 0 minutes"
    }));
    Ok(())
}

#[tokio::test]
async fn start_running_machine() -> Result<()> {
    let mut db = MockDB::new();
    let running = running_machine()?;
    db.expect_get_machine()
        .with(predicate::eq(MachineId::new(1)?))
        .times(1)
        .returning(move |_| Ok(Some(running.clone())));
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/1/start")
        .json(&json!({"amount": 20}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("Machine 1 is RUNNING, cannot be started"));
    Ok(())
}

#[tokio::test]
async fn start_machine() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .with(predicate::eq(MachineId::new(1)?))
        .times(1)
        .returning(|_| Ok(Some(available_machine())));
    db.expect_update_machine()
        .withf(|id, before, after| {
            let cycle = match (after.start_time(), after.end_time()) {
                (Some(start), Some(end)) => end.saturating_duration_since(start),
                _ => Duration::ZERO,
            };
            id.get() == 1
                && matches!(before, Available)
                && after.status == Running
                && cycle == Duration::from_secs(30 * 60)
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(Some(UpdateMachineResponse {
                before_status: Available,
                update_success: true,
            }))
        });
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/1/start")
        .json(&json!({"amount": 25}))
        .await;

    response.assert_status_ok();
    let response: StartMachineResponse = response.json();
    assert_eq!(response.change, 5);
    assert_eq!(response.machine.id, MachineId::new(1)?);
    assert_eq!(response.machine.info.status, Running);
    assert!(response.machine.info.end_time().is_some());
    Ok(())
}

#[tokio::test]
async fn start_machine_taken_concurrently() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .with(predicate::eq(MachineId::new(1)?))
        .times(1)
        .returning(|_| Ok(Some(available_machine())));
    db.expect_update_machine()
        .times(1)
        .returning(|_, _, _| {
            Ok(Some(UpdateMachineResponse {
                before_status: Running,
                update_success: false,
            }))
        });
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/1/start")
        .json(&json!({"amount": 20}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "error": "Invalid state: Machine 1 has been changed to RUNNING by others"
    }));
    Ok(())
}

#[tokio::test]
async fn start_machine_removed_concurrently() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .times(1)
        .returning(|_| Ok(Some(available_machine())));
    db.expect_update_machine()
        .times(1)
        .returning(|_, _, _| Ok(None));
    let server = get_test_server(db).await?;

    let response = server
        .post("/machines/1/start")
        .json(&json!({"amount": 20}))
        .await;

    response.assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn finish_running_machine() -> Result<()> {
    let mut db = MockDB::new();
    let running = running_machine()?;
    db.expect_get_machine()
        .with(predicate::eq(MachineId::new(1)?))
        .times(1)
        .returning(move |_| Ok(Some(running.clone())));
    db.expect_update_machine()
        .withf(|id, before, after| {
            id.get() == 1
                && matches!(before, Running)
                && after.status == Available
                && after.start_time().is_none()
                && after.end_time().is_none()
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(Some(UpdateMachineResponse {
                before_status: Running,
                update_success: true,
            }))
        });
    let server = get_test_server(db).await?;

    let response = server
        .put("/machines/1/status")
        .json(&json!({"status": "AVAILABLE"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "id": 1,
        "name": "Machine 1",
        "status": "AVAILABLE",
        "price": 20,
        "duration": 30,
        "startTime": null,
        "endTime": null
    }));
    Ok(())
}

#[tokio::test]
async fn put_machine_under_maintenance() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .times(1)
        .returning(|_| Ok(Some(available_machine())));
    db.expect_update_machine()
        .withf(|_, before, after| matches!(before, Available) && after.status == Maintenance)
        .times(1)
        .returning(|_, _, _| {
            Ok(Some(UpdateMachineResponse {
                before_status: Available,
                update_success: true,
            }))
        });
    let server = get_test_server(db).await?;

    let response: Machine = server
        .put("/machines/1/status")
        .json(&json!({"status": "MAINTENANCE"}))
        .await
        .json();

    assert_eq!(response.info.status, Maintenance);
    Ok(())
}

#[tokio::test]
async fn cannot_set_running_directly() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine()
        .times(1)
        .returning(|_| Ok(Some(available_machine())));
    let server = get_test_server(db).await?;

    let response = server
        .put("/machines/1/status")
        .json(&json!({"status": "RUNNING"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("Machine 1 is AVAILABLE, cannot be set to RUNNING"));
    Ok(())
}

#[tokio::test]
async fn set_unknown_status() -> Result<()> {
    let db = MockDB::new();
    let server = get_test_server(db).await?;

    let response = server
        .put("/machines/1/status")
        .json(&json!({"status": "BROKEN"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("unknown variant `BROKEN`"));
    Ok(())
}

#[tokio::test]
async fn set_status_of_nonexistent_machine() -> Result<()> {
    let mut db = MockDB::new();
    db.expect_get_machine().times(1).returning(|_| Ok(None));
    let server = get_test_server(db).await?;

    let response = server
        .put("/machines/5/status")
        .json(&json!({"status": "AVAILABLE"}))
        .await;

    response.assert_status_not_found();
    Ok(())
}
