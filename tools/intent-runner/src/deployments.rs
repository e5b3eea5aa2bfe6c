//! Machine-readable record of a run (deployed addresses + transaction hashes).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::scenario::RunReport;

pub struct RecordTarget<'a> {
    pub path: &'a Path,
    pub network: &'a str,
    pub rpc_url: &'a str,
}

/// Merge `report` into the JSON record at `target.path`, creating it if needed.
pub fn write_deployments_json(target: &RecordTarget<'_>, report: &RunReport) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if target.path.exists() {
        fs::read_to_string(target.path)
            .with_context(|| format!("failed reading {}", target.path.display()))?
    } else {
        String::new()
    };

    let root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", target.path.display()))?
    };

    let root = merge_report(root, target, report, &now);
    write_json_atomic(target.path, &root)
}

fn merge_report(
    mut root: Value,
    target: &RecordTarget<'_>,
    report: &RunReport,
    now: &str,
) -> Value {
    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(target.network);
    root["updated_at"] = json!(now);

    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }
    for contract in &report.deployments {
        root["deployments"][contract.name.as_str()] = json!({
            "address": contract.address,
            "tx_hash": contract.tx_hash,
            "rpc_url": target.rpc_url,
            "deployed_at": now,
        });
    }

    let mut transactions = json!({
        "fund": report.fund_tx,
        "execute": report.execute_tx,
    });
    if let Some(hash) = report.register_tx {
        transactions["register"] = json!(hash);
    }
    if let Some(hash) = report.enable_tx {
        transactions["enable_plugin"] = json!(hash);
    }

    root["last_run"] = json!({
        "intent": report.intent,
        "account": report.account,
        "plugin": report.plugin,
        "manager": report.manager,
        "registry": report.registry,
        "transactions": transactions,
        "finished_at": now,
    });
    root
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::DeployedContract;
    use alloy_primitives::{Address, B256};

    fn report() -> RunReport {
        let account = Address::repeat_byte(0x01);
        let plugin = Address::repeat_byte(0x03);
        RunReport {
            intent: "executeATO",
            account,
            manager: Address::repeat_byte(0x02),
            plugin,
            registry: None,
            deployments: vec![
                DeployedContract {
                    name: "SampleAccount".to_string(),
                    address: account,
                    tx_hash: B256::repeat_byte(0x11),
                },
                DeployedContract {
                    name: "IntentPlugin".to_string(),
                    address: plugin,
                    tx_hash: B256::repeat_byte(0x13),
                },
            ],
            register_tx: None,
            enable_tx: None,
            fund_tx: B256::repeat_byte(0x21),
            execute_tx: B256::repeat_byte(0x22),
        }
    }

    fn target(path: &Path) -> RecordTarget<'_> {
        RecordTarget {
            path,
            network: "devnet",
            rpc_url: "http://127.0.0.1:8545",
        }
    }

    #[test]
    fn writes_fresh_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deployments.devnet.json");

        write_deployments_json(&target(&path), &report()).unwrap();

        let root: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(root["network"], "devnet");
        let account = &root["deployments"]["SampleAccount"];
        assert_eq!(
            account["address"].as_str().unwrap().to_lowercase(),
            format!("0x{}", "01".repeat(20))
        );
        assert_eq!(account["rpc_url"], "http://127.0.0.1:8545");
        assert_eq!(root["last_run"]["intent"], "executeATO");
        assert!(root["last_run"]["transactions"].get("register").is_none());
        assert!(root["last_run"]["registry"].is_null());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn keeps_unrelated_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(
            &path,
            json!({"custom": 1, "deployments": {"Other": {"address": "0x00"}}}).to_string(),
        )
        .unwrap();

        write_deployments_json(&target(&path), &report()).unwrap();

        let root: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(root["custom"], 1);
        assert_eq!(root["deployments"]["Other"]["address"], "0x00");
        assert!(root["deployments"]["IntentPlugin"].is_object());
    }

    #[test]
    fn replaces_non_object_root() {
        let mut r = report();
        r.register_tx = Some(B256::repeat_byte(0x31));
        r.enable_tx = Some(B256::repeat_byte(0x32));
        let path = PathBuf::from("unused.json");

        let root = merge_report(json!([1, 2, 3]), &target(&path), &r, "2026-01-01T00:00:00Z");

        assert_eq!(root["updated_at"], "2026-01-01T00:00:00Z");
        let txs = &root["last_run"]["transactions"];
        assert!(txs["register"].is_string());
        assert!(txs["enable_plugin"].is_string());
    }

    #[test]
    fn rejects_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, "{not json").unwrap();

        assert!(write_deployments_json(&target(&path), &report()).is_err());
    }
}
