//! End-to-end tests for `ekscluster create`.
//!
//! Each test builds a sandbox with fake `kubectl`, `aws-iam-authenticator`
//! and `terraform` shell scripts. The fakes append every invocation to a log
//! file so tests can assert which commands ran and in what order. The child
//! environment is cleared, so the host's PATH and AWS credentials never leak
//! into a run.

#![cfg(unix)]
#![allow(clippy::expect_used)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

const FAKE_KUBECTL: &str = r#"#!/bin/sh
if [ "$1" = "version" ]; then
  echo "Client Version: v${FAKE_KUBECTL_VERSION:-1.11.0}"
  exit 0
fi
echo "kubectl $*" >> "$FAKE_LOG"
echo "configmap/aws-auth created"
"#;

const FAKE_AUTHENTICATOR: &str = "#!/bin/sh\nexit 0\n";

const FAKE_TERRAFORM: &str = r#"#!/bin/sh
echo "terraform $*" >> "$FAKE_LOG"
case "$1" in
  version) echo "Terraform v0.11.7" ;;
  init) echo "Terraform has been successfully initialized!" ;;
  apply)
    if [ -n "$FAKE_APPLY_FAIL" ]; then
      echo "Error: creating EKS Cluster: AccessDeniedException" >&2
      exit 1
    fi
    echo "aws_eks_cluster.demo: Creating..." >&2
    echo "Apply complete! Resources: 28 added, 0 changed, 0 destroyed."
    ;;
  output)
    case "$2" in
      kubeconfig) printf 'apiVersion: v1\nkind: Config\n' ;;
      config-map) printf 'apiVersion: v1\nkind: ConfigMap\n' ;;
    esac
    ;;
esac
"#;

struct Sandbox {
    _root: TempDir,
    bin: PathBuf,
    work: PathBuf,
    log: PathBuf,
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

impl Sandbox {
    /// Fully provisioned host: every binary present, no state file.
    fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let bin = root.path().join("bin");
        let work = root.path().join("work");
        fs::create_dir_all(&bin).expect("bin dir");
        fs::create_dir_all(&work).expect("work dir");
        write_script(&bin.join("kubectl"), FAKE_KUBECTL);
        write_script(&bin.join("aws-iam-authenticator"), FAKE_AUTHENTICATOR);
        write_script(&work.join("terraform"), FAKE_TERRAFORM);
        let log = root.path().join("calls.log");
        Self {
            _root: root,
            bin,
            work,
            log,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ekscluster"));
        cmd.env_clear()
            .current_dir(&self.work)
            .env("PATH", format!("{}:/usr/bin:/bin", self.bin.display()))
            .env("FAKE_LOG", &self.log)
            .env("NO_COLOR", "1")
            .env("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE")
            .env("AWS_SECRET_ACCESS_KEY", "secret")
            .arg("create");
        cmd
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn work_file(&self, name: &str) -> PathBuf {
        self.work.join(name)
    }
}

#[test]
#[serial]
fn test_create_runs_full_sequence() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Found kubectl at"))
        .stdout(predicate::str::contains("Terraform v0.11.7"))
        .stdout(predicate::str::contains(
            "Terraform has been successfully initialized!",
        ))
        .stdout(predicate::str::contains("aws_eks_cluster.demo: Creating..."))
        .stdout(predicate::str::contains("export KUBECONFIG="))
        .stdout(predicate::str::contains("configmap/aws-auth created"))
        .stdout(predicate::str::contains("Worker nodes are coming up"));

    let kubeconfig = sandbox.work_file("kubeconfig");
    let config_map = sandbox.work_file("config-map-aws-auth.yaml");
    assert_eq!(
        fs::read_to_string(kubeconfig).expect("kubeconfig"),
        "apiVersion: v1\nkind: Config\n"
    );
    assert_eq!(
        fs::read_to_string(config_map).expect("config map"),
        "apiVersion: v1\nkind: ConfigMap\n"
    );

    let calls = sandbox.calls();
    assert_eq!(
        calls[..5],
        [
            "terraform version",
            "terraform init",
            "terraform apply -auto-approve",
            "terraform output kubeconfig",
            "terraform output config-map",
        ]
    );
    assert_eq!(calls.len(), 6);
    let register = &calls[5];
    assert!(register.starts_with("kubectl --kubeconfig "), "{register}");
    assert!(register.contains("kubeconfig apply -f "), "{register}");
    assert!(register.ends_with("config-map-aws-auth.yaml"), "{register}");
}

#[test]
#[serial]
fn test_create_creates_exactly_two_files() {
    let sandbox = Sandbox::new();
    sandbox.command().assert().success();

    let mut names: Vec<String> = fs::read_dir(&sandbox.work)
        .expect("read work dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["config-map-aws-auth.yaml", "kubeconfig", "terraform"]);
}

#[test]
#[serial]
fn test_create_overwrites_stale_kubeconfig() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.work_file("kubeconfig"),
        "stale kubeconfig from a previous installation that is much longer\n",
    )
    .expect("seed");
    sandbox.command().assert().success();
    assert_eq!(
        fs::read_to_string(sandbox.work_file("kubeconfig")).expect("kubeconfig"),
        "apiVersion: v1\nkind: Config\n"
    );
}

#[test]
#[serial]
fn test_create_with_existing_state_file_mutates_nothing() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.work_file("terraform.tfstate"), "{}").expect("state");

    sandbox
        .command()
        .assert()
        .code(5)
        .stderr(predicate::str::contains("There is an existing cluster"))
        .stderr(predicate::str::contains("terraform.tfstate"));

    assert_eq!(sandbox.calls(), vec!["terraform version"]);
    assert!(!sandbox.work_file("kubeconfig").exists());
}

#[test]
#[serial]
fn test_create_without_access_key_stops_before_init() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env_remove("AWS_ACCESS_KEY_ID")
        .assert()
        .code(6)
        .stderr(predicate::str::contains(
            "AWS_ACCESS_KEY_ID not exported as environment variable",
        ));
    assert!(!sandbox.calls().iter().any(|c| c == "terraform init"));
}

#[test]
#[serial]
fn test_create_with_empty_secret_key_stops_before_init() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env("AWS_SECRET_ACCESS_KEY", "")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("AWS_SECRET_ACCESS_KEY"));
    assert!(!sandbox.calls().iter().any(|c| c == "terraform init"));
}

#[test]
#[serial]
fn test_create_rejects_old_kubectl() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env("FAKE_KUBECTL_VERSION", "1.9.5")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("1.9.5"))
        .stderr(predicate::str::contains("1.10.0"));
    assert!(sandbox.calls().is_empty());
}

#[test]
#[serial]
fn test_create_accepts_minimum_kubectl() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env("FAKE_KUBECTL_VERSION", "1.10.0")
        .assert()
        .success();
}

#[test]
#[serial]
fn test_create_without_kubectl_fails() {
    let sandbox = Sandbox::new();
    fs::remove_file(sandbox.bin.join("kubectl")).expect("remove");
    sandbox
        .command()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("kubectl not found"));
}

#[test]
#[serial]
fn test_create_without_authenticator_fails() {
    let sandbox = Sandbox::new();
    fs::remove_file(sandbox.bin.join("aws-iam-authenticator")).expect("remove");
    sandbox
        .command()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("AWS Authenticator binary not found"));
}

#[test]
#[serial]
fn test_create_without_terraform_binary_fails() {
    let sandbox = Sandbox::new();
    fs::remove_file(sandbox.work_file("terraform")).expect("remove");
    sandbox
        .command()
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Terraform binary not found in the installation folder",
        ));
}

#[test]
#[serial]
fn test_create_stops_after_failed_apply() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env("FAKE_APPLY_FAIL", "1")
        .assert()
        .code(7)
        .stdout(predicate::str::contains("AccessDeniedException"))
        .stderr(predicate::str::contains("terraform apply failed"));

    assert_eq!(
        sandbox.calls(),
        vec![
            "terraform version",
            "terraform init",
            "terraform apply -auto-approve"
        ]
    );
    assert!(!sandbox.work_file("kubeconfig").exists());
    assert!(!sandbox.work_file("config-map-aws-auth.yaml").exists());
}

#[test]
#[serial]
fn test_create_with_arguments_touches_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .arg("unexpected")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Simple use : ekscluster create"));
    assert!(!sandbox.log.exists());
}

#[test]
#[serial]
fn test_create_honours_working_dir_override() {
    let sandbox = Sandbox::new();
    let elsewhere = TempDir::new().expect("tempdir");
    sandbox
        .command()
        .current_dir(elsewhere.path())
        .env("EKSCLUSTER_WORKING_DIR", &sandbox.work)
        .assert()
        .success();
    assert!(sandbox.work_file("kubeconfig").exists());
    assert!(!elsewhere.path().join("kubeconfig").exists());
}

#[test]
#[serial]
fn test_create_rejects_invalid_minimum_version_config() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env("EKSCLUSTER_MIN_KUBECTL_VERSION", "latest")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("MIN_KUBECTL_VERSION"));
    assert!(sandbox.calls().is_empty());
}
