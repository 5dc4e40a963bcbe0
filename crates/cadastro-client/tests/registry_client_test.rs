//! Contract tests for RegistryClient against a PostgREST endpoint.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET | `/rest/v1/cadastro_inicial?select=cpf&cpf=eq.{cpf}&limit=1` | `exists_*` |
//! | POST | `/rest/v1/cadastro_inicial` | `save_*`, `submit_*` |

use cadastro_client::{
    CadastroClient, ClientConfig, ClientError, PostalConfig, RegistryConfig, SaveError,
    SubmitError,
};
use cadastro_core::{Address, MaritalStatus, NationalId, RegistrationForm, RegistrationRecord, Sex};
use chrono::{TimeZone, Utc};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE_PATH: &str = "/rest/v1/cadastro_inicial";

/// Build a CadastroClient with the registry URL pointed at a wiremock server.
async fn test_client(mock_server: &MockServer) -> CadastroClient {
    let config = ClientConfig {
        postal: PostalConfig {
            base_url: "http://127.0.0.1:19002".parse().unwrap(),
            timeout_secs: 5,
        },
        registry: RegistryConfig {
            base_url: mock_server.uri().parse().unwrap(),
            api_key: zeroize::Zeroizing::new("test-key".into()),
            table: "cadastro_inicial".into(),
            timeout_secs: 5,
        },
    };
    CadastroClient::new(config).unwrap()
}

fn complete_form() -> RegistrationForm {
    RegistrationForm {
        full_name: "João Pereira".into(),
        national_id: "111.444.777-35".into(),
        phone: "(21) 3456-7890".into(),
        postal_code: "20040-002".into(),
        address: Address {
            street: "Avenida Rio Branco".into(),
            number: "156".into(),
            complement: String::new(),
            neighborhood: "Centro".into(),
            city: "Rio de Janeiro".into(),
            state: "RJ".into(),
        },
        marital_status: Some(MaritalStatus::UniaoEstavel),
        has_children: Some(true),
        children_count: Some(3),
        sex: Some(Sex::Masculino),
    }
}

fn sample_record() -> RegistrationRecord {
    complete_form().validate().unwrap().into_record(
        Uuid::parse_str("6f1c2a4e-8b3d-4e5f-9a0b-1c2d3e4f5a6b").unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 0).unwrap(),
    )
}

// ── GET /rest/v1/{table} (uniqueness) ────────────────────────────────

#[tokio::test]
async fn exists_sends_filter_and_both_auth_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("select", "cpf"))
        .and(query_param("cpf", "eq.11144477735"))
        .and(query_param("limit", "1"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"cpf": "11144477735"}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let cpf = NationalId::new("111.444.777-35").unwrap();
    assert!(client.registry().national_id_exists(&cpf).await.unwrap());
}

#[tokio::test]
async fn exists_empty_array_is_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let cpf = NationalId::new("52998224725").unwrap();
    assert!(!client.registry().national_id_exists(&cpf).await.unwrap());
}

#[tokio::test]
async fn exists_handles_401() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid API key"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let cpf = NationalId::new("52998224725").unwrap();

    match client.registry().national_id_exists(&cpf).await.unwrap_err() {
        ClientError::Api { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}

// ── POST /rest/v1/{table} (insert) ───────────────────────────────────

#[tokio::test]
async fn save_posts_single_row_array_with_column_names() {
    let mock_server = MockServer::start().await;
    let record = sample_record();

    let expected_body = serde_json::json!([{
        "uuid_usuario": "6f1c2a4e-8b3d-4e5f-9a0b-1c2d3e4f5a6b",
        "timestamp_cadastro": "2024-05-17T13:45:00Z",
        "nome_completo": "João Pereira",
        "cpf": "11144477735",
        "telefone": "2134567890",
        "cep": "20040002",
        "logradouro": "Avenida Rio Branco",
        "numero": "156",
        "complemento": null,
        "bairro": "Centro",
        "localidade": "Rio de Janeiro",
        "estado": "RJ",
        "estado_civil": "UNIAO_ESTAVEL",
        "qtd_filhos": 3,
        "sexo": "MASCULINO"
    }]);

    let mut stored_row = expected_body[0].clone();
    stored_row["id_linha"] = serde_json::json!(42);

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .and(header("prefer", "return=representation"))
        .and(header("apikey", "test-key"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([stored_row])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let stored = client.registry().save(&record).await.unwrap();
    assert_eq!(stored.row_id, Some(42));
    assert_eq!(stored.national_id, record.national_id);
    assert_eq!(stored.children_count, 3);
}

#[tokio::test]
async fn save_without_representation_returns_submitted_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let record = sample_record();
    let stored = client.registry().save(&record).await.unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn save_with_undecodable_representation_still_succeeds() {
    let mock_server = MockServer::start().await;
    let record = sample_record();

    // A `timestamp` column without zone comes back without an offset.
    let mut stored_row = serde_json::to_value(&record).unwrap();
    stored_row["id_linha"] = serde_json::json!(7);
    stored_row["timestamp_cadastro"] = serde_json::json!("2024-05-17T13:45:00.123456");

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([stored_row])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let stored = client.registry().save(&record).await.unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn save_maps_cpf_unique_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505",
            "details": "Key (cpf)=(11144477735) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"cadastro_inicial_cpf_key\""
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client.registry().save(&sample_record()).await.unwrap_err();
    assert!(matches!(err, SaveError::DuplicateNationalId));
    assert!(err.to_string().starts_with("Este CPF já foi cadastrado"));
}

#[tokio::test]
async fn save_maps_not_null_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "23502",
            "details": null,
            "hint": null,
            "message": "null value in column \"numero\" violates not-null constraint"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client.registry().save(&sample_record()).await.unwrap_err();
    assert!(matches!(err, SaveError::MissingRequiredField));
}

#[tokio::test]
async fn save_passes_other_database_errors_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "22001",
            "details": null,
            "hint": null,
            "message": "value too long for type character varying(2)"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    match client.registry().save(&sample_record()).await.unwrap_err() {
        SaveError::Rejected { code, message } => {
            assert_eq!(code.as_deref(), Some("22001"));
            assert!(message.contains("value too long"));
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn save_non_postgrest_error_stays_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    match client.registry().save(&sample_record()).await.unwrap_err() {
        SaveError::Client(ClientError::Api { status, body, .. }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("expected Client(Api), got: {other:?}"),
    }
}

// ── Workflow over both endpoints ─────────────────────────────────────

#[tokio::test]
async fn submit_checks_then_inserts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("cpf", "eq.11144477735"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let user_id = Uuid::new_v4();
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 0).unwrap();

    let stored = client
        .service()
        .submit(&complete_form(), user_id, at)
        .await
        .unwrap();
    assert_eq!(stored.user_id, user_id);
    assert_eq!(stored.complement, None);
}

#[tokio::test]
async fn submit_duplicate_never_inserts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"cpf": "11144477735"}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let result = client
        .service()
        .submit(&complete_form(), Uuid::new_v4(), Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(SubmitError::Save(SaveError::DuplicateNationalId))
    ));
}
