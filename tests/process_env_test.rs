//! Resolution against the real process environment.

use serial_test::serial;
use vulnmap_iac_capture::cli::FlagValues;
use vulnmap_iac_capture::config::{
    ENV_PREFIX, ProcessEnv, ValueSource, bind_schema, capture_schema, resolve,
};

#[test]
#[serial]
fn test_process_env_binding() {
    // SAFETY: serialized with every other test that touches these variables.
    unsafe {
        std::env::set_var("VULNMAP_IAC_CAPTURE_API_REST_URL", "https://custom");
        std::env::set_var("NODE_EXTRA_CA_CERTS", "/tmp/ca.pem");
        std::env::remove_var("VULNMAP_IAC_CAPTURE_ORG");
    }

    let schema = capture_schema().unwrap();
    let bindings = bind_schema(&schema, ENV_PREFIX).unwrap();
    let config = resolve(&schema, &bindings, &FlagValues::new(), &ProcessEnv).unwrap();

    assert_eq!(config.api_rest_url.value, "https://custom");
    assert_eq!(
        config.api_rest_url.source,
        ValueSource::EnvVar("VULNMAP_IAC_CAPTURE_API_REST_URL".to_string())
    );
    assert_eq!(config.extra_ca_certs.value, "/tmp/ca.pem");
    assert_eq!(config.org.source, ValueSource::Default);

    unsafe {
        std::env::remove_var("VULNMAP_IAC_CAPTURE_API_REST_URL");
        std::env::remove_var("NODE_EXTRA_CA_CERTS");
    }
}

#[test]
#[serial]
fn test_process_env_empty_value_is_unset() {
    unsafe {
        std::env::set_var("VULNMAP_IAC_CAPTURE_PATH", "");
    }

    let schema = capture_schema().unwrap();
    let bindings = bind_schema(&schema, ENV_PREFIX).unwrap();
    let config = resolve(&schema, &bindings, &FlagValues::new(), &ProcessEnv).unwrap();

    assert_eq!(config.path.value, ".");
    assert_eq!(config.path.source, ValueSource::Default);

    unsafe {
        std::env::remove_var("VULNMAP_IAC_CAPTURE_PATH");
    }
}
