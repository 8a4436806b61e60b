//! Resource and health commands.

use std::io::Write;

use backoffice_client::ResourceService;
use backoffice_core::{Resource, ServiceKind};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::print_json;
use crate::cli::CrudCommand;
use crate::error::{CommandError, ErrorCode};
use crate::state::AppState;

/// Runs a CRUD operation on any resource. `--data` is parsed into the
/// resource's input type, so unknown fields are ignored and wrong types
/// are reported before validation.
pub(super) async fn run_crud<R>(
    service: &ResourceService<R>,
    command: CrudCommand,
    out: &mut dyn Write,
) -> Result<(), CommandError>
where
    R: Resource,
    R::Input: DeserializeOwned,
{
    debug!(resource = R::PATH, ?command, "Running resource command");
    let payload = match command {
        CrudCommand::List => service.list().await?,
        CrudCommand::Get { id } => service.get_by_id(&id).await?,
        CrudCommand::Create(args) => {
            let input: R::Input = serde_json::from_str(&args.data)?;
            service.create(&input).await?
        }
        CrudCommand::Update { id, data } => {
            let input: R::Input = serde_json::from_str(&data.data)?;
            service.update(&id, &input).await?
        }
        CrudCommand::Delete { id } => service.delete(&id).await?,
    };
    print_json(out, &payload)
}

/// Checks one service, or all four when `service` is `None`.
///
/// With all four, a report is printed either way and the command fails if
/// any service did not answer successfully.
pub(super) async fn health(
    state: &AppState,
    service: Option<ServiceKind>,
    db: bool,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let check = |kind: ServiceKind| async move {
        if db {
            state.backend.health_check(kind).await
        } else {
            state.backend.service_health(kind).await
        }
    };

    if let Some(kind) = service {
        let payload = check(kind).await?;
        return print_json(out, &payload);
    }

    let mut report = Map::new();
    let mut down = 0;
    for kind in ServiceKind::ALL {
        let entry = match check(kind).await {
            Ok(response) => json!({"status": "up", "response": response}),
            Err(e) => {
                down += 1;
                json!({"status": "down", "error": e.to_string()})
            }
        };
        report.insert(kind.as_str().to_string(), entry);
    }
    print_json(out, &Value::Object(report))?;

    if down > 0 {
        return Err(CommandError::new(
            ErrorCode::ServerError,
            format!("{} of {} services unhealthy", down, ServiceKind::ALL.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DataArgs;
    use crate::testing::{state_for, FakeService};
    use backoffice_core::RecordId;

    fn data(raw: &str) -> DataArgs {
        DataArgs {
            data: raw.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_sale_sends_normalized_body() {
        let fake = FakeService::start().await;
        fake.respond("POST", "/sales", 201, json!({"id": 7}));
        let state = state_for(&fake);

        let mut out = Vec::new();
        run_crud(
            state.backend.sales(),
            CrudCommand::Create(data(
                r#"{"id":7,"producto":"Lapiz","cantidad":2,"precioUnitario":1.5,
                    "cliente":"Ana","vendedor":3,"fecha":"2024-01-01"}"#,
            )),
            &mut out,
        )
        .await
        .unwrap();

        let body = fake.requests()[0].body.clone().unwrap();
        assert_eq!(body["precioUnitario"], json!(1.5));
        assert_eq!(body["fecha"], json!("2024-01-01"));
        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let fake = FakeService::start().await;
        let state = state_for(&fake);

        let mut out = Vec::new();
        let err = run_crud(
            state.backend.users(),
            CrudCommand::Create(data(r#"{"name":"Ana"}"#)),
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("email"));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_data_is_invalid_input() {
        let fake = FakeService::start().await;
        let state = state_for(&fake);

        let mut out = Vec::new();
        let err = run_crud(
            state.backend.products(),
            CrudCommand::Create(data("{name:")),
            &mut out,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_not_found() {
        let fake = FakeService::start().await;
        fake.respond("GET", "/refunds/42", 404, json!({"error": "Refund not found"}));
        let state = state_for(&fake);

        let mut out = Vec::new();
        let refunds = state.backend.refunds();
        run_crud(refunds, CrudCommand::Delete { id: RecordId::Number(5) }, &mut out)
            .await
            .unwrap();
        let err = run_crud(refunds, CrudCommand::Get { id: RecordId::Number(42) }, &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        let seen = fake.requests();
        assert_eq!(seen[0].method, "DELETE");
        assert_eq!(seen[0].path, "/refunds/5");
    }

    #[tokio::test]
    async fn test_health_reports_every_service() {
        let fake = FakeService::start().await;
        fake.respond("GET", "/db/health", 200, json!({"status": "ok"}));
        let state = state_for(&fake);

        let mut out = Vec::new();
        health(&state, None, true, &mut out).await.unwrap();

        let report: Value = serde_json::from_slice(&out).unwrap();
        for kind in ServiceKind::ALL {
            assert_eq!(report[kind.as_str()]["status"], json!("up"));
        }
        assert_eq!(fake.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_health_fails_when_a_service_is_down() {
        let fake = FakeService::start().await;
        fake.respond("GET", "/health", 503, json!({"error": "starting"}));
        let state = state_for(&fake);

        let mut out = Vec::new();
        let err = health(&state, Some(ServiceKind::Sales), false, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ServerError);

        let err = health(&state, None, false, &mut out).await.unwrap_err();
        assert_eq!(err.message, "4 of 4 services unhealthy");
    }
}
