//! Shared utilities for integration tests: fake seams, mock explorer and
//! mock JSON-RPC servers, temporary artifact trees.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{address, b256, Address, Bytes, TxHash};
use axum::extract::{Form, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::time::Instant;

use voting_deployer::artifacts::{ContractFactory, ContractId};
use voting_deployer::blockchain::{BlockchainError, DeployedContract};
use voting_deployer::config::schema::{DeployerConfig, ExplorerEndpoint};
use voting_deployer::config::DeploymentEnv;
use voting_deployer::deploy::{
    DeployResult, Deployer, FactoryResolver, VerificationOutcome, VerificationRequest, Verifier,
};
use voting_deployer::explorer::ExplorerError;

// Well-known test private key (Anvil's first account)
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const DEPLOYED_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const DEPLOY_TX_HASH: TxHash =
    b256!("abababababababababababababababababababababababababababababababab");

pub const VOTING_ABI: &str = r#"[
    {
        "inputs": [{ "internalType": "address", "name": "_token", "type": "address" }],
        "stateMutability": "nonpayable",
        "type": "constructor"
    }
]"#;

pub fn voting_factory() -> ContractFactory {
    ContractFactory::new(
        ContractId::new("contracts/SimpleVoting.sol", "SimpleVoting"),
        serde_json::from_str::<JsonAbi>(VOTING_ABI).unwrap(),
        Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
    )
}

// ---------------------------------------------------------------------------
// Fake seams
// ---------------------------------------------------------------------------

/// One call made by the driver, with the (possibly paused) clock reading.
#[derive(Debug, Clone)]
pub enum Call {
    Resolve(String),
    Submit(Vec<DynSolValue>),
    Confirm(TxHash),
    Verify(VerificationRequest),
}

pub type CallLog = Arc<Mutex<Vec<(Call, Instant)>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn record(log: &CallLog, call: Call) {
    log.lock().unwrap().push((call, Instant::now()));
}

pub struct FakeResolver {
    pub log: CallLog,
}

impl FactoryResolver for FakeResolver {
    fn contract_factory(&self, name: &str) -> DeployResult<ContractFactory> {
        record(&self.log, Call::Resolve(name.to_string()));
        Ok(voting_factory())
    }
}

pub struct FakeDeployer {
    pub log: CallLog,
    pub fail_submit: bool,
    pub fail_confirm: bool,
}

impl Deployer for FakeDeployer {
    async fn submit(&self, _factory: &ContractFactory, args: &[DynSolValue]) -> DeployResult<TxHash> {
        record(&self.log, Call::Submit(args.to_vec()));
        if self.fail_submit {
            return Err(BlockchainError::Rpc("insufficient funds for gas * price + value".into()).into());
        }
        Ok(DEPLOY_TX_HASH)
    }

    async fn confirm(&self, tx_hash: TxHash) -> DeployResult<DeployedContract> {
        record(&self.log, Call::Confirm(tx_hash));
        if self.fail_confirm {
            return Err(BlockchainError::Reverted("deployment reverted".into()).into());
        }
        Ok(DeployedContract {
            address: DEPLOYED_ADDRESS,
            tx_hash,
            block_number: 16,
        })
    }
}

pub struct FakeVerifier {
    pub log: CallLog,
    pub fail: bool,
}

impl Verifier for FakeVerifier {
    async fn verify(&self, request: &VerificationRequest) -> DeployResult<VerificationOutcome> {
        record(&self.log, Call::Verify(request.clone()));
        if self.fail {
            return Err(ExplorerError::VerificationFailed {
                address: request.address,
                reason: "Fail - Unable to verify".into(),
            }
            .into());
        }
        Ok(VerificationOutcome::Verified {
            url: format!("https://kovan.etherscan.io/address/{}#code", request.address),
        })
    }
}

// ---------------------------------------------------------------------------
// Mock Etherscan
// ---------------------------------------------------------------------------

/// Programmable Etherscan API.
pub struct MockExplorer {
    pub already_verified: AtomicBool,
    /// (status, result) returned by `verifysourcecode`.
    pub submit_response: Mutex<(String, String)>,
    /// Results returned by successive `checkverifystatus` calls.
    pub statuses: Mutex<VecDeque<String>>,
    /// Result once `statuses` is exhausted.
    pub default_status: Mutex<String>,
    pub submissions: Mutex<Vec<HashMap<String, String>>>,
    pub status_checks: AtomicU32,
}

impl MockExplorer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            already_verified: AtomicBool::new(false),
            submit_response: Mutex::new(("1".into(), "guid-0001".into())),
            statuses: Mutex::new(VecDeque::new()),
            default_status: Mutex::new("Pass - Verified".into()),
            submissions: Mutex::new(Vec::new()),
            status_checks: AtomicU32::new(0),
        })
    }

    pub fn queue_statuses(&self, statuses: &[&str]) {
        self.statuses
            .lock()
            .unwrap()
            .extend(statuses.iter().map(|s| s.to_string()));
    }

    pub fn set_submit_response(&self, status: &str, result: &str) {
        *self.submit_response.lock().unwrap() = (status.to_string(), result.to_string());
    }
}

async fn explorer_get(
    State(mock): State<Arc<MockExplorer>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    match query.get("action").map(String::as_str) {
        Some("getsourcecode") => {
            let source = if mock.already_verified.load(Ordering::SeqCst) {
                "pragma solidity 0.8.10; contract SimpleVoting {}"
            } else {
                ""
            };
            Json(json!({
                "status": "1",
                "message": "OK",
                "result": [{ "SourceCode": source, "ContractName": "" }]
            }))
        }
        Some("checkverifystatus") => {
            mock.status_checks.fetch_add(1, Ordering::SeqCst);
            let result = mock
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| mock.default_status.lock().unwrap().clone());
            let status = if result == "Pass - Verified" { "1" } else { "0" };
            Json(json!({ "status": status, "message": "OK", "result": result }))
        }
        _ => Json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Error! Missing Or invalid Action name"
        })),
    }
}

async fn explorer_post(
    State(mock): State<Arc<MockExplorer>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    mock.submissions.lock().unwrap().push(form);
    let (status, result) = mock.submit_response.lock().unwrap().clone();
    let message = if status == "1" { "OK" } else { "NOTOK" };
    Json(json!({ "status": status, "message": message, "result": result }))
}

/// Start the mock explorer on an ephemeral port.
pub async fn start_mock_explorer(mock: Arc<MockExplorer>) -> SocketAddr {
    let app = Router::new()
        .route("/api", get(explorer_get).post(explorer_post))
        .with_state(mock);
    serve(app).await
}

// ---------------------------------------------------------------------------
// Mock JSON-RPC node
// ---------------------------------------------------------------------------

/// Minimal Ethereum node: enough for one deployment and a code lookup.
pub struct MockChain {
    pub chain_id: u64,
    pub revert: AtomicBool,
    pub deployed: AtomicBool,
    pub methods: Mutex<Vec<String>>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Arc<Self> {
        Arc::new(Self {
            chain_id,
            revert: AtomicBool::new(false),
            deployed: AtomicBool::new(false),
            methods: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self, method: &str) -> usize {
        self.methods.lock().unwrap().iter().filter(|m| *m == method).count()
    }
}

fn receipt(chain: &MockChain) -> Value {
    let status = if chain.revert.load(Ordering::SeqCst) { "0x0" } else { "0x1" };
    json!({
        "transactionHash": DEPLOY_TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
        "blockNumber": "0x10",
        "from": TEST_DEPLOYER,
        "to": null,
        "cumulativeGasUsed": "0x4c4b40",
        "gasUsed": "0x4c4b40",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": DEPLOYED_ADDRESS,
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "type": "0x0",
        "status": status
    })
}

async fn rpc(State(chain): State<Arc<MockChain>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    chain.methods.lock().unwrap().push(method.clone());

    let result = match method.as_str() {
        "eth_chainId" => json!(format!("0x{:x}", chain.chain_id)),
        "eth_blockNumber" => json!("0x10"),
        "eth_getTransactionCount" => json!("0x0"),
        "eth_gasPrice" => json!("0x3b9aca00"),
        "eth_estimateGas" => json!("0x4c4b40"),
        "eth_sendRawTransaction" => {
            chain.deployed.store(true, Ordering::SeqCst);
            json!(DEPLOY_TX_HASH)
        }
        "eth_getTransactionReceipt" => receipt(&chain),
        "eth_getCode" => {
            if chain.deployed.load(Ordering::SeqCst) {
                json!("0x6080604052")
            } else {
                json!("0x")
            }
        }
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {} not supported", method) }
            }))
        }
    };

    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

/// Start the mock node on an ephemeral port.
pub async fn start_mock_rpc(chain: Arc<MockChain>) -> SocketAddr {
    let app = Router::new().route("/", post(rpc)).with_state(chain);
    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

// ---------------------------------------------------------------------------
// Configuration and artifacts
// ---------------------------------------------------------------------------

/// Built-in profile pointed at local mocks, with fast polling.
pub fn local_env(
    rpc: Option<SocketAddr>,
    explorer: Option<SocketAddr>,
    private_key: Option<&str>,
    api_key: Option<&str>,
) -> DeploymentEnv {
    let mut config = DeployerConfig::default();
    if let Some(kovan) = config.networks.get_mut("kovan") {
        kovan.poll_interval_ms = 10;
        kovan.confirmation_timeout_secs = 5;
        kovan.rpc_timeout_secs = 5;
    }
    if let Some(addr) = explorer {
        config.etherscan.endpoints.insert(
            "kovan".into(),
            ExplorerEndpoint {
                api_url: format!("http://{}/api", addr),
                browser_url: "https://kovan.etherscan.io".into(),
            },
        );
    }
    config.etherscan.poll_interval_ms = 10;
    config.etherscan.verification_timeout_secs = 2;

    let mut vars = HashMap::new();
    if let Some(addr) = rpc {
        vars.insert("ALCHEMY_API_KEY_URL".to_string(), format!("http://{}", addr));
    }
    if let Some(key) = private_key {
        vars.insert("KOVAN_PRIVATE_KEY".to_string(), key.to_string());
    }
    if let Some(key) = api_key {
        vars.insert("ETHERSCAN_KEY".to_string(), key.to_string());
    }

    voting_deployer::config::env::resolve(&config, "kovan", |var| vars.get(var).cloned()).unwrap()
}

static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Temporary directory removed on drop.
pub struct TempDir(pub PathBuf);

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "{}-{}-{}",
            prefix,
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Write a SimpleVoting artifact, its debug file and build-info.
pub fn write_simple_voting_artifacts(root: &Path, solc_version: &str) {
    let contract_dir = root.join("contracts/SimpleVoting.sol");
    fs::create_dir_all(&contract_dir).unwrap();
    fs::create_dir_all(root.join("build-info")).unwrap();

    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": "SimpleVoting",
        "sourceName": "contracts/SimpleVoting.sol",
        "abi": serde_json::from_str::<Value>(VOTING_ABI).unwrap(),
        "bytecode": "0x6080604052",
        "deployedBytecode": "0x6080604052",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(contract_dir.join("SimpleVoting.json"), artifact.to_string()).unwrap();

    let dbg = json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/b1.json" });
    fs::write(contract_dir.join("SimpleVoting.dbg.json"), dbg.to_string()).unwrap();

    let build_info = json!({
        "_format": "hh-sol-build-info-1",
        "id": "b1",
        "solcVersion": solc_version,
        "solcLongVersion": format!("{}+commit.fc410830", solc_version),
        "input": {
            "language": "Solidity",
            "sources": { "contracts/SimpleVoting.sol": { "content": "contract SimpleVoting {}" } },
            "settings": { "optimizer": { "enabled": false, "runs": 200 } }
        },
        "output": {}
    });
    fs::write(root.join("build-info/b1.json"), build_info.to_string()).unwrap();
}
