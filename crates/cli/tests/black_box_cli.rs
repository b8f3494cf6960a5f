use std::io::Write;
use std::process::{Command, Output};

use serde_json::json;
use tempfile::NamedTempFile;

use claimguard_auth::claims::saml;

struct Cli {
    command: Command,
}

impl Cli {
    fn new() -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_claimguard"));
        command
            .env_remove("CLAIMGUARD_CONFIG")
            .env("RUST_LOG", "off");
        Self { command }
    }

    fn args<const N: usize>(mut self, args: [&str; N]) -> Self {
        self.command.args(args);
        self
    }

    fn config(mut self, config: &NamedTempFile) -> Self {
        self.command.arg("--config").arg(config.path());
        self
    }

    /// Run `subcommand` against a principal document.
    fn on(mut self, subcommand: &str, principal: &NamedTempFile) -> Self {
        self.command
            .arg(subcommand)
            .arg("--principal")
            .arg(principal.path());
        self
    }

    fn run(mut self) -> Output {
        self.command.output().unwrap()
    }
}

fn write_temp(value: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn keycloak_admin() -> NamedTempFile {
    write_temp(&json!({
        "authenticated": true,
        "claims": [
            { "type": "sub", "value": "u1" },
            { "type": "email", "value": "a@b.com" },
            { "type": "realm_access", "value": "{\"roles\":[\"admin\"]}" }
        ]
    }))
}

fn saml_manager() -> NamedTempFile {
    write_temp(&json!({
        "authenticated": true,
        "claims": [
            { "type": saml::NAME_IDENTIFIER, "value": "nid-1" },
            { "type": saml::EMAIL, "value": "s@example.com" },
            { "type": saml::ROLE, "value": "Manager" }
        ]
    }))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn allowed_check_exits_zero() {
    let principal = keycloak_admin();
    let output = Cli::new()
        .on("check", &principal)
        .args(["--policy", "AdminOnly"])
        .run();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "allow");
}

#[test]
fn denied_check_exits_one() {
    let principal = keycloak_admin();
    let output = Cli::new()
        .on("check", &principal)
        .args(["--role", "auditor"])
        .run();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "deny");
}

#[test]
fn unauthenticated_inspect_exits_one() {
    let principal = write_temp(&json!({ "authenticated": false, "claims": [] }));
    let output = Cli::new().on("inspect", &principal).run();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "not authenticated");
}

#[test]
fn unknown_policy_exits_two() {
    let principal = keycloak_admin();
    let output = Cli::new()
        .on("check", &principal)
        .args(["--policy", "Nope"])
        .run();

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn check_without_requirement_exits_two() {
    let principal = keycloak_admin();
    let output = Cli::new().on("check", &principal).run();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("either --policy or at least one --role is required"));
}

#[test]
fn mapping_flag_selects_saml_extraction() {
    let principal = saml_manager();

    let keycloak = Cli::new().on("inspect", &principal).run();
    assert_eq!(keycloak.status.code(), Some(1));

    let saml = Cli::new()
        .args(["--mapping", "saml"])
        .on("inspect", &principal)
        .run();
    assert_eq!(saml.status.code(), Some(0));
    let user: serde_json::Value = serde_json::from_str(&stdout(&saml)).unwrap();
    assert_eq!(user["id"], "nid-1");
    assert_eq!(user["roles"], json!(["Manager"]));
}

#[test]
fn mapping_flag_overrides_config_file() {
    let config = write_temp(&json!({ "claim_mapping": "keycloak" }));
    let principal = saml_manager();
    let output = Cli::new()
        .config(&config)
        .args(["--mapping", "saml"])
        .on("check", &principal)
        .args(["--role", "manager"])
        .run();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "allow");
}

#[test]
fn unknown_mapping_preset_exits_two() {
    let principal = keycloak_admin();
    let output = Cli::new()
        .args(["--mapping", "ldap"])
        .on("inspect", &principal)
        .run();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn policies_lists_the_standard_table() {
    let output = Cli::new().args(["policies"]).run();

    assert_eq!(output.status.code(), Some(0));
    let policies: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(policies.as_array().map(Vec::len), Some(3));
}
