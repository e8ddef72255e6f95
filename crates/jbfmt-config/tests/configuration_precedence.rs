//! Behavioural coverage for layered configuration loading.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use jbfmt_config::{
    Config, DEFAULT_CHARSET, DEFAULT_MASK, default_log_filter, default_log_format,
};
use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const FORMATTER_PATH_ENV: &str = "JBFMT_FORMAT_SH_PATH";

// Scenarios run on parallel test threads but share the process environment.
static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _env_lock: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let env_lock = ENV_MUTEX
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("jbfmt")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _env_lock: env_lock,
        }
    }

    fn write_config(&self, toml: &str) {
        let path = self.temp_dir.path().join("jbfmt.toml");
        if let Err(error) = fs::write(&path, toml) {
            panic!("failed to write configuration: {error}");
        }

        let mut args = self.cli_args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn set_env(&self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` in edition 2024. The mutex held by
        // the harness serialises scenarios and `Drop` restores the values.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides
            .borrow_mut()
            .push((key.to_owned(), previous));
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }

        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => {
                *self.loaded.borrow_mut() = Some(config);
            }
            Err(error) => {
                *self.error.borrow_mut() = Some(error.to_string());
            }
        }
    }

    fn loaded_config(&self) -> Config {
        self.load();

        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }

        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            if let Some(os_value) = value {
                unsafe { std::env::set_var(&key, os_value) };
            } else {
                unsafe { std::env::remove_var(&key) };
            }
        }
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the formatter path to {path}")]
fn given_configuration_file(harness: &Harness, path: String) {
    let value = unquote(&path);
    harness.write_config(&format!("format_sh_path = \"{value}\"\n"));
}

#[given("a configuration file disabling recursion with mask {mask}")]
fn given_configuration_without_recursion(harness: &Harness, mask: String) {
    let value = unquote(&mask);
    harness.write_config(&format!("recursive = false\nmask = \"{value}\"\n"));
}

#[given("the environment overrides the formatter path to {path}")]
fn given_environment_override(harness: &Harness, path: String) {
    harness.set_env(FORMATTER_PATH_ENV, unquote(&path));
}

#[when("the CLI sets the formatter path to {path}")]
fn when_cli_override(harness: &Harness, path: String) {
    harness.push_cli_arg("--format-sh-path");
    harness.push_cli_arg(unquote(&path));
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves the formatter path to {path}")]
fn then_resolved_path(harness: &Harness, path: String) {
    let config = harness.loaded_config();
    assert_eq!(config.format_sh_path(), unquote(&path));
}

#[then("loading the configuration disables recursion with mask {mask}")]
fn then_recursion_disabled(harness: &Harness, mask: String) {
    let config = harness.loaded_config();
    assert!(!config.recursive, "recursion should be disabled");
    assert!(config.allow_defaults, "allow defaults keeps its default");
    assert_eq!(config.mask, unquote(&mask));
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.loaded_config();

    assert!(config.allow_defaults);
    assert!(config.recursive);
    assert!(!config.format_on_save());
    assert_eq!(config.mask, DEFAULT_MASK);
    assert_eq!(config.charset(), DEFAULT_CHARSET);
    assert_eq!(config.settings, "");
    assert_eq!(config.timeout(), None);
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(harness)] harness: Harness) {
    let _ = harness;
}
