pub mod edge_config;
pub mod file;
pub mod memory;
pub mod redis_store;

/// Which [`WaitlistStore`](crate::use_cases::waitlist::WaitlistStore)
/// backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    EdgeConfig,
    Redis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("file".parse::<StoreBackend>().unwrap(), StoreBackend::File);
        assert_eq!("edge-config".parse::<StoreBackend>().unwrap(), StoreBackend::EdgeConfig);
        assert_eq!("Redis".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert!("postgres".parse::<StoreBackend>().is_err());
        assert_eq!(StoreBackend::EdgeConfig.to_string(), "edge-config");
    }
}
