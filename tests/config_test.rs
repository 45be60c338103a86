// Environment-driven configuration tests
// Each test mutates process env, so they run serially

use std::env;

use serial_test::serial;
use sheet_content_loader::config::{Config, ConfigError};
use sheet_content_loader::section::SectionId;

fn clear_env() {
    env::remove_var("SHEET_ID");
    env::remove_var("SHEET_BASE_URL");
    env::remove_var("SHEET_SECTIONS");
}

#[test]
#[serial]
fn test_base_url_takes_precedence_over_sheet_id() {
    clear_env();
    env::set_var("SHEET_ID", "abc123");
    env::set_var("SHEET_BASE_URL", "http://localhost:8080/sheets/");

    let config = Config::from_env().unwrap();
    assert_eq!(config.sheet_base_url, "http://localhost:8080/sheets/");

    clear_env();
}

#[test]
#[serial]
fn test_sheet_id_builds_gviz_url() {
    clear_env();
    env::set_var("SHEET_ID", "abc123");

    let config = Config::from_env().unwrap();
    assert_eq!(
        config.sheet_base_url,
        "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:csv&headers=1&sheet="
    );
    assert_eq!(config.sections, SectionId::ALL.to_vec());

    clear_env();
}

#[test]
#[serial]
fn test_blank_base_url_falls_back_to_sheet_id() {
    clear_env();
    env::set_var("SHEET_BASE_URL", "   ");
    env::set_var("SHEET_ID", "xyz");

    let config = Config::from_env().unwrap();
    assert!(config.sheet_base_url.contains("/d/xyz/"));

    clear_env();
}

#[test]
#[serial]
fn test_missing_sheet_source() {
    clear_env();

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing(ref var) if var == "SHEET_ID"));
}

#[test]
#[serial]
fn test_section_list_is_parsed_in_order() {
    clear_env();
    env::set_var("SHEET_ID", "abc123");
    env::set_var("SHEET_SECTIONS", "footer, hero,about,hero");

    let config = Config::from_env().unwrap();
    assert_eq!(
        config.sections,
        vec![SectionId::Footer, SectionId::Hero, SectionId::About]
    );

    clear_env();
}

#[test]
#[serial]
fn test_unknown_section_is_rejected() {
    clear_env();
    env::set_var("SHEET_ID", "abc123");
    env::set_var("SHEET_SECTIONS", "hero,pricing");

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownSection(ref s) if s == "pricing"));
    assert!(err.to_string().contains("pricing"));

    clear_env();
}
