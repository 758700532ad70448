use library_core::{
    Author, ConfigError, LibraryConfig, LibraryContext, LibraryEntities, RepoError,
};

#[test]
fn parses_classic_connection_string() {
    let config = LibraryConfig::from_connection_string(
        "Data Source=(local);Integrated Security=true;Initial Catalog=Library;\
         MultipleActiveResultSets=True;TrustServerCertificate=True;Encrypt=False",
    )
    .unwrap();

    assert_eq!(config.data_source, ".");
    assert_eq!(config.initial_catalog, "Library");
    assert!(config.integrated_security);
    assert!(config.multiple_active_result_sets);
    assert!(config.trust_server_certificate);
    assert!(!config.encrypt);
    assert_eq!(config.log_dir, None);
    assert!(config.validate().is_ok());
}

#[test]
fn connection_string_keys_are_case_and_space_insensitive() {
    let config = LibraryConfig::from_connection_string(
        " server = \"/srv/catalogs\" ; DATABASE=archive; integrated security=SSPI; busy timeout=250;",
    )
    .unwrap();

    assert_eq!(config.data_source, "/srv/catalogs");
    assert_eq!(config.initial_catalog, "archive");
    assert!(config.integrated_security);
    assert_eq!(config.busy_timeout_ms, 250);
}

#[test]
fn connection_string_errors_are_reported() {
    assert!(matches!(
        LibraryConfig::from_connection_string("Initial Catalog=Library"),
        Err(ConfigError::MissingKey("Data Source"))
    ));
    assert!(matches!(
        LibraryConfig::from_connection_string("Data Source=.;Pooling=true"),
        Err(ConfigError::UnknownKey(key)) if key == "Pooling"
    ));
    assert!(matches!(
        LibraryConfig::from_connection_string("Data Source=.;Encrypt=maybe"),
        Err(ConfigError::InvalidBool { .. })
    ));
    assert!(matches!(
        LibraryConfig::from_connection_string("Data Source=.;Busy Timeout=-1"),
        Err(ConfigError::InvalidNumber { .. })
    ));
    assert!(matches!(
        LibraryConfig::from_connection_string("Data Source"),
        Err(ConfigError::MalformedPair(_))
    ));
}

#[test]
fn encrypt_request_is_rejected_at_open() {
    let mut config = LibraryConfig::in_memory();
    config.encrypt = true;

    let err = LibraryContext::open(&config).err().expect("open should fail");
    assert!(matches!(
        err,
        RepoError::Config(ConfigError::UnsupportedOption {
            option: "encrypt",
            ..
        })
    ));
}

#[test]
fn catalog_name_cannot_escape_data_source() {
    let config = LibraryConfig::new("/tmp").with_catalog("../etc/library");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            key: "initial_catalog",
            ..
        })
    ));
}

#[test]
fn unreachable_store_is_a_connectivity_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let config = LibraryConfig::new(missing.to_str().unwrap());

    let err = LibraryContext::open(&config).err().expect("open should fail");
    assert!(matches!(err, RepoError::Connectivity(_)), "unexpected error: {err}");
}

#[test]
fn file_backed_catalog_persists_across_contexts() {
    let dir = tempfile::tempdir().unwrap();
    let config = LibraryConfig::new(dir.path().to_str().unwrap()).with_catalog("catalog");
    assert_eq!(
        config.database_path(),
        Some(dir.path().join("catalog.sqlite3"))
    );

    let id = {
        let ctx = LibraryContext::open(&config).unwrap();
        let id = ctx.add_author(&Author::new("Jane", "Austen")).unwrap();
        ctx.close().unwrap();
        id
    };

    let ctx = LibraryContext::open(&config).unwrap();
    assert_eq!(ctx.config(), &config);
    let author = ctx.find_author(id).unwrap().unwrap();
    assert_eq!(author.last_name, "Austen");
}

#[test]
fn in_memory_contexts_are_isolated() {
    let first = LibraryContext::open_in_memory().unwrap();
    let second = LibraryContext::open_in_memory().unwrap();

    first.add_author(&Author::new("Jane", "Austen")).unwrap();

    assert_eq!(first.author_entities().count().unwrap(), 1);
    assert_eq!(second.author_entities().count().unwrap(), 0);
}
