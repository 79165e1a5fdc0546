/// End-to-end proxy tests
///
/// These tests drive both backends through the public API:
/// - Chained writes, reads and deletes against a TOML file on disk
/// - Flattened writes into a hash store
/// - Liveness gating of the hash-backed proxy
/// - Code written once against `PathProxy` working on either backend
///
/// Run with: cargo test --test proxy_scenarios

#[cfg(test)]
mod proxy_scenarios {
    use pathconf_core::hash_store::{ConnectionState, HashClient, HashStoreError};
    use pathconf_core::nested_store::StoreError;
    use pathconf_core::proxy::check_liveness;
    use pathconf_core::{
        Config, ContainerKind, FlatStoreProxy, LivenessError, MemoryHashClient,
        NestedStore, NestedStoreProxy, Path, PathProxy, PathSegment, ProxyError, TomlFileStore,
    };
    use std::cell::{Cell, RefCell};
    use tempfile::TempDir;

    fn toml_file(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Backend-agnostic write of `value` at `parent.leaf`.
    fn write_at<P: PathProxy>(proxy: P, parent: &[&str], leaf: &str, value: &str) -> anyhow::Result<()> {
        proxy.at(parent.iter().copied())?.assign(leaf, value)?;
        Ok(())
    }

    /// Backend-agnostic read of `parent.leaf`.
    fn read_at<P: PathProxy>(proxy: P, parent: &[&str], leaf: &str) -> anyhow::Result<String> {
        Ok(proxy.at(parent.iter().copied())?.index(leaf)?.render()?)
    }

    #[test]
    fn test_nested_file_scenario() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = toml_file(&dir, "[a]\nb = 1\n");
        let mut store = TomlFileStore::open(&path)?;

        NestedStoreProxy::new(&mut store).index("a")?.assign("b", "2")?;

        let rendered = NestedStoreProxy::new(&mut store).index("a")?.index("b")?.render()?;
        assert_eq!(rendered, "2");
        assert_eq!(store.flush_count(), 1);

        // The flush reached the file
        let mut reopened = TomlFileStore::open(&path)?;
        let on_disk = NestedStoreProxy::new(&mut reopened).at(["a", "b"])?.render()?;
        assert_eq!(on_disk, "2");
        Ok(())
    }

    #[test]
    fn test_nested_delete_then_render_is_address_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = toml_file(&dir, "[a]\nb = 1\nc = 3\n");
        let mut store = TomlFileStore::open(&path)?;

        let proxy = NestedStoreProxy::new(&mut store).index("a")?.remove("b")?;
        let err = proxy.render().unwrap_err();
        assert!(err.is_address());
        assert!(err.to_string().contains("a.b"));

        // Removal alone does not rewrite the file; the next persist carries it
        assert_eq!(store.flush_count(), 0);
        store.persist()?;
        let mut reopened = TomlFileStore::open(&path)?;
        assert!(NestedStoreProxy::new(&mut reopened).at(["a", "b"]).is_err());
        assert_eq!(NestedStoreProxy::new(&mut reopened).at(["a", "c"])?.render()?, "3");
        Ok(())
    }

    #[test]
    fn test_nested_assign_surfaces_flush_failure() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = toml_file(&dir, "[a]\nb = 1\n");
        let mut store = TomlFileStore::open(&path)?;

        // The backing file is replaced by a directory, so the flush cannot land
        std::fs::remove_file(&path)?;
        std::fs::create_dir(&path)?;
        std::fs::write(path.join("keep"), "x")?;

        let err = NestedStoreProxy::new(&mut store)
            .index("a")?
            .assign("b", "2")
            .err()
            .unwrap();
        assert!(matches!(err, ProxyError::Store(StoreError::Write { .. })));
        assert_eq!(store.flush_count(), 0);

        // Memory already holds the new value; disk does not
        assert_eq!(store.root()["a"]["b"], toml::Value::String("2".to_string()));
        assert!(path.is_dir());
        Ok(())
    }

    #[test]
    fn test_flat_scenario_writes_one_field() -> anyhow::Result<()> {
        let client = MemoryHashClient::new();

        let proxy = FlatStoreProxy::new(&client, "cfg")
            .index("net")?
            .index(0usize)?
            .assign("host", "x")?;
        assert_eq!(proxy.flat_key(), "net[0].host");

        let fields = client.hgetall("cfg")?;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("net[0].host").map(String::as_str), Some("x"));
        Ok(())
    }

    #[test]
    fn test_flat_scenario_container_kinds() -> anyhow::Result<()> {
        let kinds = RefCell::new(Vec::new());
        let composer = |acc: &str, seg: &PathSegment, kind: ContainerKind| {
            kinds.borrow_mut().push((seg.clone(), kind));
            pathconf_core::compose_keys(acc, seg, kind)
        };
        let client = MemoryHashClient::new();

        FlatStoreProxy::with_composer(&client, "cfg", composer)
            .index("net")?
            .index(0usize)?
            .assign("host", "x")?;

        assert_eq!(
            *kinds.borrow(),
            vec![
                (PathSegment::from("net"), ContainerKind::Mapping),
                (PathSegment::from(0usize), ContainerKind::Sequence),
                (PathSegment::from("host"), ContainerKind::Mapping),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_flat_delete_then_render_is_empty() -> anyhow::Result<()> {
        let client = MemoryHashClient::new();
        FlatStoreProxy::new(&client, "cfg").index("db")?.assign("user", "admin")?;

        let proxy = FlatStoreProxy::new(&client, "cfg").index("db")?.remove("user")?;
        // The store reports an absent field, which renders as ""
        assert_eq!(proxy.value()?, None);
        assert_eq!(proxy.render()?, "");
        Ok(())
    }

    #[test]
    fn test_round_trip_through_generic_code() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = toml_file(&dir, "[server]\n[server.tls]\n");
        let mut store = TomlFileStore::open(&path)?;
        let client = MemoryHashClient::new();

        let parent = ["server", "tls"];
        write_at(NestedStoreProxy::new(&mut store), &parent, "cert", "/etc/cert.pem")?;
        write_at(FlatStoreProxy::new(&client, "cfg"), &parent, "cert", "/etc/cert.pem")?;

        assert_eq!(read_at(NestedStoreProxy::new(&mut store), &parent, "cert")?, "/etc/cert.pem");
        assert_eq!(read_at(FlatStoreProxy::new(&client, "cfg"), &parent, "cert")?, "/etc/cert.pem");
        assert_eq!(client.hget("cfg", "server.tls.cert")?, Some("/etc/cert.pem".to_string()));
        Ok(())
    }

    #[test]
    fn test_liveness_gates_every_mutation() {
        let failures = [
            LivenessError::NotReady,
            LivenessError::NoConnection,
            LivenessError::Closed,
        ];

        for expected in failures {
            let mut client = MemoryHashClient::new();
            match expected {
                LivenessError::NotReady => client.set_ready(false),
                LivenessError::NoConnection => client.disconnect(),
                LivenessError::Closed => client.close(),
            }

            let results = [
                FlatStoreProxy::new(&client, "cfg").index("a").err(),
                FlatStoreProxy::new(&client, "cfg").assign("a", "1").err(),
                FlatStoreProxy::new(&client, "cfg").remove("a").err(),
            ];
            for result in results {
                match result {
                    Some(ProxyError::Liveness(err)) => assert_eq!(err, expected),
                    other => panic!("{:?}: expected liveness error, got {:?}", expected, other),
                }
            }
            assert_eq!(client.call_count(), 0, "{:?}: backend touched", expected);
            assert!(client.hgetall("cfg").unwrap().is_empty());
        }
    }

    /// Always-live client whose field operations all fail.
    struct FlakyClient {
        connection: FlakyConnection,
        calls: Cell<usize>,
    }

    struct FlakyConnection;

    impl ConnectionState for FlakyConnection {
        fn is_closed(&self) -> bool {
            false
        }
    }

    impl HashClient for FlakyClient {
        type Connection = FlakyConnection;

        fn is_ready(&self) -> bool {
            true
        }

        fn connection(&self) -> Option<&FlakyConnection> {
            Some(&self.connection)
        }

        fn hset(&self, _key: &str, _field: &str, _value: &str) -> Result<(), HashStoreError> {
            self.calls.set(self.calls.get() + 1);
            Err(HashStoreError::Backend("READONLY replica".to_string()))
        }

        fn hget(&self, _key: &str, _field: &str) -> Result<Option<String>, HashStoreError> {
            self.calls.set(self.calls.get() + 1);
            Err(HashStoreError::Backend("timeout".to_string()))
        }

        fn hdel(&self, _key: &str, _field: &str) -> Result<bool, HashStoreError> {
            self.calls.set(self.calls.get() + 1);
            Err(HashStoreError::Backend("timeout".to_string()))
        }
    }

    #[test]
    fn test_backend_errors_propagate_unmodified() {
        let client = FlakyClient {
            connection: FlakyConnection,
            calls: Cell::new(0),
        };
        assert!(check_liveness(&client).is_ok());

        let err = FlatStoreProxy::new(&client, "cfg").assign("a", "1").err().unwrap();
        assert!(matches!(
            err,
            ProxyError::Hash(HashStoreError::Backend(ref msg)) if msg == "READONLY replica"
        ));
        assert_eq!(err.to_string(), "hash store backend error: READONLY replica");

        let proxy = FlatStoreProxy::new(&client, "cfg").index("a").unwrap();
        assert!(matches!(proxy.render(), Err(ProxyError::Hash(_))));
        assert_eq!(client.calls.get(), 2);
    }

    #[test]
    fn test_config_drives_both_backends() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("fresh.toml");
        let file_str = file.to_string_lossy().to_string();

        let config = Config::from_lookup(|key| match key {
            "PATHCONF_STORE_FILE_PATH" => Some(file_str.clone()),
            "PATHCONF_STORE_HASH_ROOT" => Some("service".to_string()),
            _ => None,
        })?;

        let mut store = TomlFileStore::from_config(&config.store)?;
        NestedStoreProxy::new(&mut store).assign("name", "demo")?;
        assert!(file.exists());

        let client = MemoryHashClient::new();
        FlatStoreProxy::from_config(&client, &config.store).assign("name", "demo")?;
        assert_eq!(client.hget("service", "name")?, Some("demo".to_string()));
        Ok(())
    }

    #[test]
    fn test_parsed_path_drives_proxies() -> anyhow::Result<()> {
        let path = Path::parse("servers[1].port")?;

        let mut store = pathconf_core::MemoryNestedStore::from_toml(
            "[[servers]]\nport = 80\n[[servers]]\nport = 8080\n",
        )?;
        let rendered = NestedStoreProxy::new(&mut store).at(&path)?.render()?;
        assert_eq!(rendered, "8080");

        let client = MemoryHashClient::new();
        let proxy = FlatStoreProxy::new(&client, "cfg").at(&path)?;
        assert_eq!(proxy.flat_key(), path.to_string());
        Ok(())
    }
}
