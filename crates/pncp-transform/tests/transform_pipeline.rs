//! End-to-end tests for `run_transform` over a temporary data directory.

use pncp_core::{CollectionStatus, Parametros};
use pncp_store::{ArtifactStore, RawArtifacts};
use pncp_transform::run_transform;
use serde_json::{json, Value};

fn params(filters: &[&str]) -> Parametros {
    Parametros {
        orgaos_nome_filtro: filters.iter().map(|s| (*s).to_owned()).collect(),
        ..Parametros::default()
    }
}

fn read(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn acme_contracts() -> Vec<Value> {
    vec![
        json!({
            "orgaoEntidade": {"nomeOrgao": "Prefeitura SP"},
            "fornecedor": {"razaoSocial": "ACME", "cpfCnpj": "123"},
            "valorFinal": "1.000,00"
        }),
        json!({
            "orgaoEntidade": {"nomeOrgao": "Prefeitura SP"},
            "fornecedor": {"razaoSocial": "ACME", "cpfCnpj": "123"},
            "valorFinal": "500,00"
        }),
    ]
}

fn seed(store: &ArtifactStore, contratos: &[Value], success: bool) {
    store
        .save_raw(&RawArtifacts {
            contratos,
            contratacoes: &[],
            status: CollectionStatus { success },
        })
        .unwrap();
}

#[test]
fn aggregates_same_tax_id_into_one_supplier() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    seed(&store, &acme_contracts(), true);

    let summary = run_transform(&store, &params(&["PREFEITURA"])).unwrap();

    assert_eq!(summary.contracts, 2);
    assert_eq!(summary.suppliers, 1);
    assert!(!summary.fetch_failed);

    let facts = read(&store.contract_facts_path());
    assert_eq!(facts.as_array().unwrap().len(), 2);
    assert_eq!(facts[0]["valor_contratado"], json!(1000.0));
    assert_eq!(facts[0]["data_publicacao"], json!(null));

    let suppliers = read(&store.suppliers_path());
    assert_eq!(
        suppliers,
        json!([{"cnpj": "123", "nome": "ACME", "total_contratado": 1500.0, "total_pago": 0.0}])
    );

    let flags = read(&store.flags_path());
    assert_eq!(flags["top_fornecedores_contratados"][0]["cnpj"], json!("123"));
    assert!(flags["msg"].as_str().unwrap().contains("pagamentos PMSP"));

    assert_eq!(read(&store.payment_facts_path()), json!([]));
}

#[test]
fn failed_collection_produces_only_the_failure_flag() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    seed(&store, &acme_contracts(), false);

    let summary = run_transform(&store, &params(&["PREFEITURA"])).unwrap();

    assert!(summary.fetch_failed);
    assert_eq!(read(&store.contract_facts_path()), json!([]));
    assert_eq!(read(&store.suppliers_path()), json!([]));
    assert_eq!(read(&store.flags_path()), json!({"fetch_failed": true}));
}

#[test]
fn runs_standalone_without_any_raw_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    let summary = run_transform(&store, &Parametros::default()).unwrap();

    assert_eq!(summary.contracts, 0);
    assert!(!summary.fetch_failed);
    assert_eq!(
        read(&store.flags_path()),
        json!({
            "top_fornecedores_contratados": [],
            "msg": "Alertas completos só serão gerados após integração dos pagamentos PMSP."
        })
    );
}

#[test]
fn rerun_fully_overwrites_previous_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    seed(&store, &acme_contracts(), true);
    run_transform(&store, &params(&[])).unwrap();

    seed(&store, &[], true);
    let summary = run_transform(&store, &params(&[])).unwrap();

    assert_eq!(summary.contracts, 0);
    assert_eq!(read(&store.contract_facts_path()), json!([]));
    assert_eq!(read(&store.suppliers_path()), json!([]));
}

#[test]
fn malformed_raw_contracts_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    std::fs::create_dir_all(store.contracts_path().parent().unwrap()).unwrap();
    std::fs::write(store.contracts_path(), r#"{"data": "not a list"}"#).unwrap();

    assert!(run_transform(&store, &Parametros::default()).is_err());
}
